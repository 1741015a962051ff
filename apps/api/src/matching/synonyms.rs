//! Synonym table — folds known alias spellings of a skill into one canonical name.
//!
//! Loaded once at startup (built-in table or a JSON file) and shared read-only
//! behind an `Arc` for the life of the process.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::matching::normalizer::normalize_key;

/// Built-in aliases used when no `SYNONYMS_PATH` is configured.
const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript", "es6"]),
    ("typescript", &["ts"]),
    ("python", &["py", "python3"]),
    ("go", &["golang"]),
    ("c++", &["cpp"]),
    ("c#", &["csharp", "c sharp"]),
    ("node.js", &["node", "nodejs", "node js"]),
    ("react", &["reactjs", "react.js"]),
    ("vue", &["vuejs", "vue.js"]),
    ("angular", &["angularjs", "angular.js"]),
    ("postgresql", &["postgres", "psql"]),
    ("mongodb", &["mongo"]),
    ("kubernetes", &["k8s"]),
    ("aws", &["amazon web services"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("machine learning", &["ml"]),
    ("artificial intelligence", &["ai"]),
    ("natural language processing", &["nlp"]),
    ("ci/cd", &["cicd", "continuous integration"]),
    ("html", &["html5"]),
    ("css", &["css3"]),
];

#[derive(Debug, Error, PartialEq)]
pub enum SynonymError {
    #[error("alias '{alias}' is registered under both '{first}' and '{second}'")]
    AliasConflict {
        alias: String,
        first: String,
        second: String,
    },

    #[error("alias '{alias}' of '{canonical}' is itself a canonical skill name")]
    AliasIsCanonical { alias: String, canonical: String },

    #[error("empty canonical skill name")]
    EmptyCanonical,
}

/// Immutable alias → canonical lookup. Keys and values are stored normalized
/// (trimmed, lower-case).
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    aliases: HashMap<String, String>,
    canonical_count: usize,
}

impl SynonymTable {
    /// Builds a table from `canonical → aliases` pairs.
    ///
    /// Rejects an alias claimed by two canonical names and an alias that is also
    /// a canonical name, since either would make folding order-dependent.
    pub fn from_entries<I, C, A, S>(entries: I) -> Result<Self, SynonymError>
    where
        I: IntoIterator<Item = (C, A)>,
        C: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (canonical, aliases) in entries {
            let canonical = normalize_key(canonical.as_ref());
            if canonical.is_empty() {
                return Err(SynonymError::EmptyCanonical);
            }
            grouped
                .entry(canonical)
                .or_default()
                .extend(aliases.into_iter().map(|a| normalize_key(a.as_ref())));
        }

        let mut table: HashMap<String, String> = HashMap::new();
        for (canonical, aliases) in &grouped {
            for alias in aliases {
                if alias.is_empty() || alias == canonical {
                    continue;
                }
                if grouped.contains_key(alias) {
                    return Err(SynonymError::AliasIsCanonical {
                        alias: alias.clone(),
                        canonical: canonical.clone(),
                    });
                }
                if let Some(first) = table.get(alias) {
                    if first != canonical {
                        return Err(SynonymError::AliasConflict {
                            alias: alias.clone(),
                            first: first.clone(),
                            second: canonical.clone(),
                        });
                    }
                }
                table.insert(alias.clone(), canonical.clone());
            }
        }

        Ok(Self {
            aliases: table,
            canonical_count: grouped.len(),
        })
    }

    /// The table shipped with the service.
    pub fn builtin() -> Result<Self, SynonymError> {
        Self::from_entries(
            BUILTIN_SYNONYMS
                .iter()
                .map(|(canonical, aliases)| (*canonical, aliases.iter().copied())),
        )
    }

    /// Loads a JSON object of the form `{"javascript": ["js", "ecmascript"], ...}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)
            .context("synonym table must be a JSON object of string arrays")?;
        Ok(Self::from_entries(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read synonym table at {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("invalid synonym table at {}", path.display()))
    }

    /// Returns the canonical name for an already-normalized skill, if it is a known alias.
    pub fn canonical_for(&self, normalized: &str) -> Option<&str> {
        self.aliases.get(normalized).map(String::as_str)
    }

    pub fn canonical_count(&self) -> usize {
        self.canonical_count
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}
