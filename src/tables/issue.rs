use crate::error::{Error, Result};
use crate::gitlab::client::GitlabClient;
use crate::gitlab::options::{IssueFilters, ListOptions};
use crate::pagination::paginate;
use crate::plugin::quals::KeyColumnQuals;
use crate::plugin::query::{QueryData, RowSink};
use crate::plugin::table::{Column, ColumnType, ListConfig, Table};
use crate::predicates::apply_issue_quals;
use crate::transforms::{assignee_usernames, iso_date_to_timestamp};
use futures::FutureExt;
use futures::future::BoxFuture;

pub const TABLE_NAME: &str = "gitlab_issue";

/// On gitlab.com, at least one of these must carry an `=` qual or the
/// instance-wide listing is rejected upstream as too expensive.
pub const CLOUD_REQUIRED_QUALS: [&str; 4] = ["assignee", "assignee_id", "author_id", "project_id"];

fn issue_columns() -> Vec<Column> {
    use ColumnType::*;
    vec![
        Column::new("id", Int, "The ID of the Issue."),
        Column::new("title", String, "The title of the Issue."),
        Column::new("description", String, "The description of the Issue."),
        Column::new("state", String, "The state of the Issue (opened, closed, etc)."),
        Column::new("project_id", Int, "The ID of the project - link to `gitlab_project.id`."),
        Column::new("external_id", String, "The external ID of the issue."),
        Column::new("author_id", Int, "The ID of the author - link to `gitlab_user.id`.")
            .from_field("author.id"),
        Column::new(
            "author",
            String,
            "The username of the author - link to `gitlab_user.username`.",
        )
        .from_field("author.username"),
        Column::new("created_at", Timestamp, "Timestamp of issue creation."),
        Column::new("updated_at", Timestamp, "Timestamp of last update to the issue."),
        Column::new(
            "closed_at",
            Timestamp,
            "Timestamp of when issue was closed. (null if not closed).",
        ),
        Column::new(
            "closed_by_id",
            Int,
            "The ID of the user whom closed the issue - link to `gitlab_user.id`.",
        )
        .from_field("closed_by.id"),
        Column::new(
            "closed_by",
            String,
            "The username of the user whom closed the issue - link to `gitlab_user.username`.",
        )
        .from_field("closed_by.username"),
        Column::new(
            "assignee_id",
            Int,
            "The ID of the user assigned to the issue - link to `gitlab_user.id`.",
        )
        .from_field("assignee.id"),
        Column::new(
            "assignee",
            String,
            "The username of the user assigned to the issue - link to `gitlab_user.username`",
        )
        .from_field("assignee.username"),
        Column::new(
            "assignees",
            Json,
            "An array of assigned usernames, for when more than one user is assigned.",
        )
        .transform_with("assignees", assignee_usernames),
        Column::new("upvotes", Int, "Count of up-votes received on the issue."),
        Column::new("downvotes", Int, "Count of down-votes received on the issue."),
        Column::new(
            "due_date",
            Timestamp,
            "Timestamp of due date for the issue to be completed by.",
        )
        .transform_with("due_date", iso_date_to_timestamp),
        Column::new("web_url", String, "The url to access the issue."),
        Column::new("confidential", Bool, "Indicates if the issue is marked as confidential."),
        Column::new(
            "discussion_locked",
            Bool,
            "Indicates if the issue has the discussions locked against new input.",
        ),
        Column::new("search_string", String, "Search string to limit results").from_qual(),
    ]
}

pub fn table_issue() -> Table {
    Table {
        name: TABLE_NAME,
        description: "All GitLab Issues",
        list: ListConfig {
            hydrate: list_issues,
            optional_key_columns: vec![
                "assignee",
                "assignee_id",
                "author",
                "author_id",
                "confidential",
                "search_string",
                "project_id",
            ],
        },
        get: None,
        columns: issue_columns(),
    }
}

/// Fails before any request when an issue listing against gitlab.com lacks
/// every qual in [`CLOUD_REQUIRED_QUALS`].
pub fn check_cloud_quals(is_gitlab_cloud: bool, quals: &KeyColumnQuals) -> Result<()> {
    if is_gitlab_cloud && !CLOUD_REQUIRED_QUALS.iter().any(|q| quals.contains_key(*q)) {
        return Err(Error::UnsupportedQuery(format!(
            "When using this table with gitlab cloud, 'List' call requires an '=' qual for one or more of the following columns: {}",
            CLOUD_REQUIRED_QUALS.join(", ")
        )));
    }
    Ok(())
}

pub fn list_issues<'a>(
    d: &'a QueryData,
    sink: &'a mut (dyn RowSink + Send),
) -> BoxFuture<'a, Result<()>> {
    async move {
        check_cloud_quals(d.settings.is_gitlab_cloud(), &d.quals)?;

        let mut filters = IssueFilters::all_scope();
        apply_issue_quals(&mut filters, &d.quals);

        let client = GitlabClient::new(&d.settings)?;
        let (client, filters) = (&client, &filters);

        match d.quals.get("project_id").and_then(|q| q.int64_value()) {
            Some(project_id) => {
                paginate(
                    move |page| client.list_project_issues(project_id, filters, ListOptions::page(page)),
                    sink,
                )
                .await
            }
            None => {
                paginate(
                    move |page| client.list_issues(filters, ListOptions::page(page)),
                    sink,
                )
                .await
            }
        }
    }
    .boxed()
}
