use serde_json::Value;

use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, SortDirection, SqlResult};
use crate::database::gateway::PageRequest;
use crate::database::models::Project;
use crate::types::RoleSet;

/// Complete listing query: visibility, criteria, order and page window
#[derive(Debug, Clone)]
pub struct Filter {
    where_data: FilterWhere,
    order_data: Vec<FilterOrderInfo>,
    limit: i64,
    offset: i64,
}

impl Filter {
    pub fn new(roles: RoleSet, page: &PageRequest) -> Self {
        let mut order_data = FilterOrder::parse(&page.sort_by);
        if order_data.is_empty() {
            order_data = FilterOrder::default_order();
        }

        let limit = page.page_size.max(1);
        let offset = (page.page_number.max(1) - 1).saturating_mul(limit);

        Self {
            where_data: FilterWhere::new(!roles.is_elevated(), &page.keywords, &page.query),
            order_data,
            limit,
            offset,
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn to_sql(&self, select: &str) -> SqlResult {
        let mut params = vec![];
        let where_clause = self.where_data.generate(&mut params);
        let order_clause = FilterOrder::generate(&self.order_data);

        params.push(Value::from(self.limit));
        let l = params.len();
        params.push(Value::from(self.offset));
        let o = params.len();

        let query = format!(
            "SELECT {select} FROM \"projects\" WHERE {where_clause} {order_clause} LIMIT ${l} OFFSET ${o}"
        );
        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let mut params = vec![];
        let where_clause = self.where_data.generate(&mut params);
        SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM \"projects\" WHERE {where_clause}"),
            params,
        }
    }

    /// Apply the filter to an in-memory collection. Returns the page and the
    /// number of matches before paging.
    pub fn apply<'a, I>(&self, projects: I) -> (Vec<Project>, i64)
    where
        I: IntoIterator<Item = &'a Project>,
    {
        let mut matched: Vec<&Project> = projects
            .into_iter()
            .filter(|p| self.where_data.matches(p))
            .collect();

        matched.sort_by(|a, b| {
            for info in &self.order_data {
                let key = info.field.record_key();
                let ordering = compare_values(a.get(key), b.get(key), info.sort);
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            a.id().cmp(&b.id())
        });

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect();
        (page, total)
    }
}

/// Case-insensitive text comparison; missing values sort last in either
/// direction, like `NULLS LAST`
fn compare_values(a: Option<&Value>, b: Option<&Value>, sort: SortDirection) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let text = |v: Option<&Value>| match v {
        Some(Value::String(s)) => Some(s.to_lowercase()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    match (text(a), text(b)) {
        (Some(x), Some(y)) => match sort {
            SortDirection::Asc => x.cmp(&y),
            SortDirection::Desc => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PUBLIC_ROLES, SECURE_ROLES};
    use serde_json::json;

    fn page(number: i64, size: i64, sort_by: &str) -> PageRequest {
        PageRequest {
            page_number: number,
            page_size: size,
            sort_by: sort_by.to_string(),
            keywords: String::new(),
            query: String::new(),
        }
    }

    fn project(id: &str, name: &str, published: bool) -> Project {
        serde_json::from_value(json!({"_id": id, "name": name, "published": published})).unwrap()
    }

    #[test]
    fn computes_window_from_page_number() {
        let f = Filter::new(SECURE_ROLES, &page(3, 25, ""));
        assert_eq!(f.limit(), 25);
        assert_eq!(f.offset(), 50);
    }

    #[test]
    fn builds_select_with_paging_params() {
        let sql = Filter::new(PUBLIC_ROLES, &page(2, 10, "-name")).to_sql("*");
        assert_eq!(
            sql.query,
            "SELECT * FROM \"projects\" WHERE \"published\" = TRUE ORDER BY lower(\"name\") DESC NULLS LAST, \"id\" ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(sql.params, vec![json!(10), json!(10)]);
    }

    #[test]
    fn count_sql_shares_where_clause() {
        let sql = Filter::new(SECURE_ROLES, &page(1, 10, "")).to_count_sql();
        assert_eq!(sql.query, "SELECT COUNT(*) AS count FROM \"projects\" WHERE 1=1");
    }

    #[test]
    fn applies_visibility_order_and_window_in_memory() {
        let projects = vec![
            project("1", "Charlie", true),
            project("2", "alpha", true),
            project("3", "Bravo", false),
            project("4", "Delta", true),
        ];

        let (items, total) = Filter::new(PUBLIC_ROLES, &page(1, 2, "")).apply(&projects);
        assert_eq!(total, 3);
        let names: Vec<_> = items.iter().filter_map(Project::name).collect();
        assert_eq!(names, vec!["alpha", "Charlie"]);

        let (items, total) = Filter::new(SECURE_ROLES, &page(2, 2, "-name")).apply(&projects);
        assert_eq!(total, 4);
        let names: Vec<_> = items.iter().filter_map(Project::name).collect();
        assert_eq!(names, vec!["Bravo", "alpha"]);
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let dated = |id: &str, at: Value| -> Project {
            serde_json::from_value(json!({"_id": id, "name": id, "published": true, "publishedAt": at})).unwrap()
        };
        let projects = vec![
            dated("a", json!("2024-01-02T00:00:00.000Z")),
            dated("b", Value::Null),
            dated("c", json!("2024-01-01T00:00:00.000Z")),
        ];

        for (sort_by, expected) in [("-publishedAt", vec!["a", "c", "b"]), ("publishedAt", vec!["c", "a", "b"])] {
            let (items, _) = Filter::new(SECURE_ROLES, &page(1, 10, sort_by)).apply(&projects);
            let ids: Vec<_> = items.iter().filter_map(Project::id).collect();
            assert_eq!(ids, expected, "sortBy {}", sort_by);
        }
    }
}
