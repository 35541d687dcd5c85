use crate::pagination::PAGE_SIZE;
use serde::Serialize;

/// Page cursor sent with every list request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    pub page: u32,
    pub per_page: u32,
}

impl ListOptions {
    pub fn page(page: u32) -> Self {
        ListOptions {
            page,
            per_page: PAGE_SIZE,
        }
    }
}

/// Filters accepted by both `GET /issues` and `GET /projects/:id/issues`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl IssueFilters {
    /// Issues visible to the token, not only those created by or assigned to it.
    pub fn all_scope() -> Self {
        IssueFilters {
            scope: Some("all".to_string()),
            ..Default::default()
        }
    }
}
