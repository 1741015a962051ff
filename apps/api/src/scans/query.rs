//! Scan listing — filter and pagination parameters and the SQL built from them.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ScanListQuery {
    pub search: Option<String>,
    pub min_score: Option<i16>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn from_query(query: &ScanListQuery) -> Self {
        Self {
            page: query.page.unwrap_or(1).max(1),
            per_page: query
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ScanListQuery) {
    builder.push(" WHERE TRUE");

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (filename ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR candidate_info->>'name' ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR candidate_info->>'email' ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(min_score) = query.min_score {
        builder.push(" AND top_score >= ").push_bind(min_score);
    }
}

pub fn build_count_query(query: &ScanListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM scans");
    push_filters(&mut builder, query);
    builder
}

pub fn build_list_query(
    query: &ScanListQuery,
    pagination: Pagination,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM scans");
    push_filters(&mut builder, query);
    builder
        .push(" ORDER BY created_at DESC, id LIMIT ")
        .push_bind(i64::from(pagination.per_page))
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::from_query(&ScanListQuery::default());
        assert_eq!(p, Pagination { page: 1, per_page: DEFAULT_PER_PAGE });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::from_query(&ScanListQuery {
            page: Some(0),
            per_page: Some(500),
            ..Default::default()
        });
        assert_eq!(p, Pagination { page: 1, per_page: MAX_PER_PAGE });

        let p = Pagination::from_query(&ScanListQuery {
            page: Some(3),
            per_page: Some(10),
            ..Default::default()
        });
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("asha"), "asha");
    }

    #[test]
    fn test_list_query_without_filters() {
        let query = ScanListQuery::default();
        let builder = build_list_query(&query, Pagination::from_query(&query));
        assert_eq!(
            builder.sql(),
            "SELECT * FROM scans WHERE TRUE ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_list_query_with_filters() {
        let query = ScanListQuery {
            search: Some(" asha ".to_string()),
            min_score: Some(50),
            ..Default::default()
        };
        let builder = build_count_query(&query);
        let sql = builder.sql();
        assert!(sql.starts_with("SELECT COUNT(*) FROM scans WHERE TRUE AND (filename ILIKE $1"));
        assert!(sql.contains("candidate_info->>'email' ILIKE $3)"));
        assert!(sql.ends_with("AND top_score >= $4"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = ScanListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(build_count_query(&query).sql(), "SELECT COUNT(*) FROM scans WHERE TRUE");
    }
}
