use serde_json::Value;

use crate::database::models::project::SYSTEM_FIELDS;
use crate::database::models::Project;

/// Row-selection criteria for a project listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterWhere {
    pub published_only: bool,
    /// Every term must appear in the name or description
    pub keywords: Vec<String>,
    /// `field=value` pairs matched exactly against payload fields
    pub pairs: Vec<(String, String)>,
}

impl FilterWhere {
    pub fn new(published_only: bool, keywords: &str, query: &str) -> Self {
        Self {
            published_only,
            keywords: Self::parse_keywords(keywords),
            pairs: Self::parse_query(query),
        }
    }

    fn parse_keywords(keywords: &str) -> Vec<String> {
        keywords
            .split_whitespace()
            .map(|k| k.to_lowercase())
            .collect()
    }

    fn parse_query(query: &str) -> Vec<(String, String)> {
        query
            .split(',')
            .filter_map(|pair| {
                let (field, value) = pair.split_once('=')?;
                let field = field.trim();
                if field.is_empty() {
                    return None;
                }
                Some((field.to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// In-memory evaluation, mirrors `generate`
    pub fn matches(&self, project: &Project) -> bool {
        if self.published_only && !project.is_published() {
            return false;
        }

        let text_of = |field: &str| {
            project
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_lowercase)
                .unwrap_or_default()
        };
        let name = text_of("name");
        let description = text_of("description");
        let keywords_match = self
            .keywords
            .iter()
            .all(|k| name.contains(k.as_str()) || description.contains(k.as_str()));
        if !keywords_match {
            return false;
        }

        // System fields live outside the payload and never match a pair
        self.pairs.iter().all(|(field, expected)| match project.get(field) {
            _ if SYSTEM_FIELDS.contains(&field.as_str()) => false,
            Some(Value::String(s)) => s == expected,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == *expected,
        })
    }

    /// SQL condition over the `projects` table; appends bind values to `params`
    pub fn generate(&self, params: &mut Vec<Value>) -> String {
        let mut conditions = vec![];

        if self.published_only {
            conditions.push("\"published\" = TRUE".to_string());
        }

        for keyword in &self.keywords {
            params.push(Value::String(format!("%{}%", Self::escape_like(keyword))));
            let n = params.len();
            conditions.push(format!(
                "(\"name\" ILIKE ${n} OR COALESCE(\"data\"->>'description', '') ILIKE ${n})"
            ));
        }

        for (field, value) in &self.pairs {
            params.push(Value::String(field.clone()));
            let f = params.len();
            params.push(Value::String(value.clone()));
            let v = params.len();
            conditions.push(format!("\"data\"->>${f} = ${v}"));
        }

        if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        }
    }

    fn escape_like(term: &str) -> String {
        let mut out = String::with_capacity(term.len());
        for c in term.chars() {
            if matches!(c, '\\' | '%' | '_') {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }
}
