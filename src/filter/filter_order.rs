use super::types::{FilterOrderInfo, SortDirection, SortField};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse a `sortBy` value such as `-createdAt,+name` or `name desc`.
    /// Unknown fields are skipped; an empty result means "order by name".
    pub fn parse(sort_by: &str) -> Vec<FilterOrderInfo> {
        let mut out = Vec::new();
        for part in sort_by.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (prefixed, token) = match trimmed.chars().next() {
                Some('-') => (Some(SortDirection::Desc), &trimmed[1..]),
                Some('+') => (Some(SortDirection::Asc), &trimmed[1..]),
                _ => (None, trimmed),
            };

            let mut it = token.split_whitespace();
            let Some(column) = it.next() else { continue };
            let sort = prefixed.unwrap_or_else(|| match it.next() {
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                _ => SortDirection::Asc,
            });

            match SortField::parse(column) {
                Some(field) => out.push(FilterOrderInfo { field, sort }),
                None => tracing::debug!("Ignoring unknown sort field '{}'", column),
            }
        }
        out
    }

    /// Order used when the caller gave none
    pub fn default_order() -> Vec<FilterOrderInfo> {
        vec![FilterOrderInfo { field: SortField::Name, sort: SortDirection::Asc }]
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {} NULLS LAST", i.field.order_expr(), i.sort.to_sql()))
            .collect();
        // Stable paging across equal keys
        parts.push("\"id\" ASC".to_string());
        format!("ORDER BY {}", parts.join(", "))
    }
}
