//! Skill Normalizer — trims, lower-cases and folds synonyms, one output per input.

use crate::matching::synonyms::SynonymTable;

/// Trim + lower-case. The key format used both for skills and synonym table entries.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes a single raw skill string.
pub fn normalize_skill(raw: &str, synonyms: &SynonymTable) -> String {
    let key = normalize_key(raw);
    match synonyms.canonical_for(&key) {
        Some(canonical) => canonical.to_string(),
        None => key,
    }
}

/// Normalizes a skill list. Order and length are preserved; duplicates are kept.
pub fn normalize<S: AsRef<str>>(raw_skills: &[S], synonyms: &SynonymTable) -> Vec<String> {
    raw_skills
        .iter()
        .map(|s| normalize_skill(s.as_ref(), synonyms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js_table() -> SynonymTable {
        SynonymTable::from_entries([("javascript", vec!["js"])]).unwrap()
    }

    #[test]
    fn test_trims_and_lowercases() {
        let out = normalize(&["  Python ", "SQL"], &SynonymTable::default());
        assert_eq!(out, vec!["python", "sql"]);
    }

    #[test]
    fn test_folds_alias_case_insensitively() {
        assert_eq!(normalize(&["JS"], &js_table()), vec!["javascript"]);
        assert_eq!(normalize(&[" js "], &js_table()), vec!["javascript"]);
    }

    #[test]
    fn test_unknown_skill_kept_as_is() {
        assert_eq!(normalize(&["Django"], &js_table()), vec!["django"]);
    }

    #[test]
    fn test_preserves_order_length_and_duplicates() {
        let out = normalize(&["js", "JavaScript", "rust", "js"], &js_table());
        assert_eq!(out, vec!["javascript", "javascript", "rust", "javascript"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let empty: [&str; 0] = [];
        assert!(normalize(&empty, &js_table()).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let table = SynonymTable::builtin().unwrap();
        let raw = [" JS", "K8s", "ReactJS", "Go", "golang", "  ", "Rust", "Machine Learning"];
        let once = normalize(&raw, &table);
        let twice = normalize(&once, &table);
        assert_eq!(once, twice);
    }
}
