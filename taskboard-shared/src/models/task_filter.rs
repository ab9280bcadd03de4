/// Task list filtering
///
/// [`TaskFilter`] holds the optional criteria accepted by the task list
/// endpoint and appends the matching predicates to a `sqlx::QueryBuilder`.
/// Criteria that are not set impose no constraint; set criteria are combined
/// with `AND`.
///
/// The builder expects the query to select from `tasks t` joined with
/// `task_statuses ts`.
///
/// # Example
///
/// ```
/// use sqlx::{Postgres, QueryBuilder};
/// use taskboard_shared::models::task_filter::TaskFilter;
///
/// let filter = TaskFilter::new().with_status("draft").with_assignee(5);
///
/// let mut query = QueryBuilder::<Postgres>::new(
///     "SELECT t.id FROM tasks t JOIN task_statuses ts ON ts.id = t.task_status_id",
/// );
/// filter.push_predicates(&mut query);
///
/// assert!(query.sql().ends_with("WHERE t.assignee_id = $1 AND ts.slug = $2"));
/// ```

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

/// Optional task list criteria, deserialized from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    /// Case-insensitive substring of the task title
    pub title_cont: Option<String>,

    /// Exact assignee id
    pub assignee_id: Option<i64>,

    /// Exact status slug
    pub status: Option<String>,

    /// Task carries this label
    pub label_id: Option<i64>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_cont(mut self, title: impl Into<String>) -> Self {
        self.title_cont = Some(title.into());
        self
    }

    pub fn with_assignee(mut self, assignee_id: i64) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    pub fn with_status(mut self, slug: impl Into<String>) -> Self {
        self.status = Some(slug.into());
        self
    }

    pub fn with_label(mut self, label_id: i64) -> Self {
        self.label_id = Some(label_id);
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.title_cont.is_none()
            && self.assignee_id.is_none()
            && self.status.is_none()
            && self.label_id.is_none()
    }

    /// Appends a `WHERE ...` clause for the set criteria
    ///
    /// Pushes nothing when the filter is empty.
    pub fn push_predicates(&self, query: &mut QueryBuilder<'_, Postgres>) {
        if self.is_empty() {
            return;
        }

        let mut keyword = " WHERE ";

        if let Some(title) = &self.title_cont {
            query
                .push(keyword)
                .push("t.name ILIKE ")
                .push_bind(contains_pattern(title));
            keyword = " AND ";
        }

        if let Some(assignee_id) = self.assignee_id {
            query.push(keyword).push("t.assignee_id = ").push_bind(assignee_id);
            keyword = " AND ";
        }

        if let Some(slug) = &self.status {
            query.push(keyword).push("ts.slug = ").push_bind(slug.clone());
            keyword = " AND ";
        }

        if let Some(label_id) = self.label_id {
            query
                .push(keyword)
                .push("EXISTS (SELECT 1 FROM task_labels fl WHERE fl.task_id = t.id AND fl.label_id = ")
                .push_bind(label_id)
                .push(")");
        }
    }
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with wildcards escaped
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT t.id FROM tasks t JOIN task_statuses ts ON ts.id = t.task_status_id";

    fn render(filter: &TaskFilter) -> String {
        let mut query = QueryBuilder::<Postgres>::new(BASE);
        filter.push_predicates(&mut query);
        query.sql().to_string()
    }

    #[test]
    fn test_empty_filter_adds_nothing() {
        let filter = TaskFilter::new();
        assert!(filter.is_empty());
        assert_eq!(render(&filter), BASE);
    }

    #[test]
    fn test_single_criterion() {
        let sql = render(&TaskFilter::new().with_label(3));
        assert_eq!(
            sql,
            format!(
                "{BASE} WHERE EXISTS (SELECT 1 FROM task_labels fl WHERE fl.task_id = t.id AND fl.label_id = $1)"
            )
        );
    }

    #[test]
    fn test_all_criteria_are_combined_with_and() {
        let filter = TaskFilter::new()
            .with_title_cont("report")
            .with_assignee(5)
            .with_status("draft")
            .with_label(2);
        assert!(!filter.is_empty());

        let sql = render(&filter);
        assert!(sql.contains(" WHERE t.name ILIKE $1 AND t.assignee_id = $2 AND ts.slug = $3 AND EXISTS"));
        assert!(sql.ends_with("fl.label_id = $4)"));
        assert_eq!(sql.matches(" WHERE ").count(), 2);
    }

    #[test]
    fn test_status_and_assignee() {
        let sql = render(&TaskFilter::new().with_status("draft").with_assignee(5));
        assert_eq!(sql, format!("{BASE} WHERE t.assignee_id = $1 AND ts.slug = $2"));
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("fix"), "%fix%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\tmp"), "%c:\\\\tmp%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_deserialize_from_query_params() {
        let filter: TaskFilter = serde_json::from_str(
            r#"{"titleCont": "bug", "assigneeId": 5, "status": "draft", "labelId": 1}"#,
        )
        .unwrap();

        assert_eq!(
            filter,
            TaskFilter::new()
                .with_title_cont("bug")
                .with_assignee(5)
                .with_status("draft")
                .with_label(1)
        );
    }
}
