use crate::error::{Error, Result};
use crate::gitlab::client::GitlabClient;
use crate::gitlab::options::ListOptions;
use crate::pagination::paginate;
use crate::plugin::query::{QueryData, RowSink};
use crate::plugin::table::{Column, ColumnType, GetConfig, ListConfig, Table};
use crate::transforms::{access_level, iso_date_to_timestamp};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

pub const TABLE_NAME: &str = "gitlab_project";

fn project_columns() -> Vec<Column> {
    use ColumnType::*;
    vec![
        Column::new("id", Int, "The ID of the project."),
        Column::new("name", String, "The projects name."),
        Column::new("path", String, "The projects path."),
        Column::new("description", String, "The projects description."),
        Column::new("default_branch", String, "The projects default branch name."),
        Column::new("full_name", String, "The projects name including namespace.")
            .from_field("name_with_namespace"),
        Column::new("full_path", String, "The projects path including namespace.")
            .from_field("path_with_namespace"),
        Column::new("public", Bool, "Indicates if the project is public"),
        Column::new("visibility", String, "The projects visibility level (private/public/internal)"),
        Column::new("web_url", String, "The projects url."),
        Column::new("tag_list", Json, "An array of tags associated to the project."),
        Column::new("issues_enabled", Bool, "Indicates if project has issues enabled."),
        Column::new("open_issues_count", Int, "A count of open issues on the project."),
        Column::new("merge_requests_enabled", Bool, "Indicates if merge requests are enabled on the project"),
        Column::new(
            "approvals_before_merge",
            Int,
            "The project setting for number of approvals required before a merge request can be merged.",
        ),
        Column::new("jobs_enabled", Bool, "Indicates if the project has jobs enabled."),
        Column::new("wiki_enabled", Bool, "Indicates if the project has the wiki enabled."),
        Column::new("snippets_enabled", Bool, "Indicates if the project has snippets enabled."),
        Column::new(
            "container_registry_enabled",
            Bool,
            "Indicates if the project has the container registry enabled.",
        ),
        Column::new("creator_id", Int, "The ID of the projects creator. - link to `gitlab_user.id`"),
        Column::new("created_at", Timestamp, "Timestamp of when project was created."),
        Column::new("last_activity_at", Timestamp, "Timestamp of when last activity happened on the project."),
        Column::new(
            "marked_for_deletion_at",
            Timestamp,
            "Timestamp of when project was marked for deletion.",
        )
        .transform_with("marked_for_deletion_at", iso_date_to_timestamp),
        Column::new("empty_repo", Bool, "Indicates if the repository of the project is empty."),
        Column::new("archived", Bool, "Indicates if the project is archived."),
        Column::new("avatar_url", String, "The url for the projects avatar."),
        Column::new("forks_count", Int, "The number of forks of the project."),
        Column::new("star_count", Int, "The number of stars given to the project."),
        Column::new("lfs_enabled", Bool, "Indicates if the project has large file system enabled."),
        Column::new("request_access_enabled", Bool, "Indicates if the project has request access enabled."),
        Column::new("packages_enabled", Bool, "Indicates if the project has packages enabled."),
        Column::new(
            "owner_id",
            Int,
            "The projects owner ID. (null if owned by a group) - link to `gitlab_user.id`",
        )
        .from_field("owner.id"),
        Column::new(
            "owner_username",
            String,
            "The projects owner username. (null if owned by a group) - link to `gitlab_user.username`",
        )
        .from_field("owner.username"),
        Column::new(
            "project_access_level",
            String,
            "The token owner's access level granted directly on the project.",
        )
        .transform_with("permissions.project_access.access_level", access_level),
        Column::new(
            "group_access_level",
            String,
            "The token owner's access level inherited from the project's group.",
        )
        .transform_with("permissions.group_access.access_level", access_level),
    ]
}

pub fn table_project() -> Table {
    Table {
        name: TABLE_NAME,
        description: "Projects in the GitLab instance.",
        list: ListConfig {
            hydrate: list_projects,
            optional_key_columns: vec![],
        },
        get: Some(GetConfig {
            hydrate: get_project,
            key_columns: vec!["id"],
        }),
        columns: project_columns(),
    }
}

pub fn list_projects<'a>(
    d: &'a QueryData,
    sink: &'a mut (dyn RowSink + Send),
) -> BoxFuture<'a, Result<()>> {
    async move {
        let client = GitlabClient::new(&d.settings)?;
        let client = &client;
        paginate(move |page| client.list_projects(ListOptions::page(page)), sink).await
    }
    .boxed()
}

pub fn get_project<'a>(d: &'a QueryData) -> BoxFuture<'a, Result<Value>> {
    async move {
        let id = d
            .quals
            .get("id")
            .and_then(|q| q.int64_value())
            .ok_or_else(|| Error::UnsupportedQuery("Get requires an '=' qual on id".to_string()))?;
        let client = GitlabClient::new(&d.settings)?;
        client.get_project(id).await
    }
    .boxed()
}
