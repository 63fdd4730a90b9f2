use rusqlite::types::Value as SqlValue;

use crate::query::ItemQuery;
use wardrobe_domain::FilterCriteria;

/// Compiled SQL query fragment with bound parameters.
pub(crate) struct CompiledQuery {
    pub where_clause: String,
    pub params: Vec<SqlValue>,
    pub order_clause: String,
    pub limit_offset: String,
}

/// Translate an ItemQuery into SQL fragments.
pub(crate) fn compile_query(q: &ItemQuery) -> CompiledQuery {
    let (where_clause, params) = compile_filter(&q.filters);

    // Newest first; id breaks ties so pages never overlap.
    let order_clause = "ORDER BY created DESC, id ASC".to_string();

    // LIMIT / OFFSET
    let mut limit_offset = String::new();
    match (q.limit, q.offset) {
        (Some(limit), Some(offset)) => {
            limit_offset.push_str(&format!("LIMIT {} OFFSET {}", limit, offset));
        }
        (Some(limit), None) => limit_offset.push_str(&format!("LIMIT {}", limit)),
        // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
        (None, Some(offset)) => limit_offset.push_str(&format!("LIMIT -1 OFFSET {}", offset)),
        (None, None) => {}
    }

    CompiledQuery {
        where_clause,
        params,
        order_clause,
        limit_offset,
    }
}

/// Translate filter criteria into a WHERE clause with bound parameters.
pub(crate) fn compile_filter(filters: &FilterCriteria) -> (String, Vec<SqlValue>) {
    let mut params = Vec::new();
    let mut conditions = Vec::new();

    if let Some(category) = filters.category {
        conditions.push("category = ?".to_string());
        params.push(SqlValue::Text(category.as_str().to_string()));
    }
    if let Some(size) = filters.size {
        conditions.push("size = ?".to_string());
        params.push(SqlValue::Text(size.as_str().to_string()));
    }
    if let Some(fav) = filters.is_favorite {
        conditions.push("is_favorite = ?".to_string());
        params.push(SqlValue::Integer(fav as i64));
    }
    if let Some(brand) = filters.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        conditions.push("brand_key LIKE ? ESCAPE '\\'".to_string());
        params.push(SqlValue::Text(format!("%{}%", like_escape(&brand.to_lowercase()))));
    }
    for tag in &filters.tags {
        conditions.push("id IN (SELECT item_id FROM item_tags WHERE tag = ?)".to_string());
        params.push(SqlValue::Text(tag.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, params)
}

/// Escape LIKE wildcards so user text matches literally.
fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wardrobe_domain::{Category, Size};

    #[test]
    fn empty_filter_has_no_where() {
        let compiled = compile_query(&ItemQuery::default());
        assert!(compiled.where_clause.is_empty());
        assert!(compiled.params.is_empty());
        assert!(compiled.limit_offset.is_empty());
        assert_eq!(compiled.order_clause, "ORDER BY created DESC, id ASC");
    }

    #[test]
    fn compile_all_fields() {
        let filters = FilterCriteria::new()
            .category(Category::Tops)
            .size(Size::M)
            .favorites_only()
            .brand("Zara")
            .tag("summer")
            .tag("work");
        let (sql, params) = compile_filter(&filters);

        assert!(sql.starts_with("WHERE category = ?"));
        assert!(sql.contains("size = ?"));
        assert!(sql.contains("is_favorite = ?"));
        assert!(sql.contains("brand_key LIKE ?"));
        assert_eq!(sql.matches("item_tags").count(), 2);
        assert_eq!(params.len(), 6);
        assert_eq!(params[3], SqlValue::Text("%zara%".into()));
    }

    #[test]
    fn compile_limit_offset() {
        let compiled = compile_query(&ItemQuery::page(FilterCriteria::new(), 20, 40));
        assert_eq!(compiled.limit_offset, "LIMIT 20 OFFSET 40");

        let q = ItemQuery {
            offset: Some(5),
            ..Default::default()
        };
        assert_eq!(compile_query(&q).limit_offset, "LIMIT -1 OFFSET 5");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_escape("50%_off\\"), "50\\%\\_off\\\\");
    }
}
