use crate::{GitlabWorld, Upstream};
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TOKEN: &str = "test-token";

async fn upstream(world: &mut GitlabWorld) -> &MockServer {
    if world.upstream.is_none() {
        let server = MockServer::start().await;
        world
            .env
            .insert("GITLAB_ADDR".to_string(), format!("{}/api/v4", server.uri()));
        world
            .env
            .insert("GITLAB_TOKEN".to_string(), TEST_TOKEN.to_string());
        world.upstream = Some(Upstream(server));
    }
    &world
        .upstream
        .as_ref()
        .expect("upstream should be running")
        .0
}

fn page(body: Value, next_page: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(body)
        .insert_header("X-Next-Page", next_page)
}

fn output(world: &GitlabWorld) -> String {
    String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8")
}

fn run_error(world: &GitlabWorld) -> String {
    match &world.run_result {
        Some(Err(err)) => err.to_string(),
        other => panic!("Command should have failed but got: {:?}", other),
    }
}

#[given(regex = r#"^the environment variable (\w+) is "(.*)"$"#)]
async fn given_env_var(world: &mut GitlabWorld, name: String, value: String) {
    world.env.insert(name, value);
}

#[given("a GitLab server with projects:")]
async fn given_server_with_projects(world: &mut GitlabWorld, step: &Step) {
    let table = step.table.as_ref().expect("Expected a projects table");
    let projects: Vec<Value> = table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            let id: i64 = row[0].trim().parse().expect("project id must be an integer");
            json!({
                "id": id,
                "name": row[1].trim(),
                "path_with_namespace": format!("acme/{}", row[1].trim()),
            })
        })
        .collect();

    let server = upstream(world).await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .respond_with(page(Value::Array(projects.clone()), ""))
        .mount(server)
        .await;

    for project in projects {
        Mock::given(method("GET"))
            .and(path(format!("/api/v4/projects/{}", project["id"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(project))
            .mount(server)
            .await;
    }
}

#[given(regex = r"^a GitLab server with (\d+) pages of projects$")]
async fn given_server_with_project_pages(world: &mut GitlabWorld, pages: u32) {
    let server = upstream(world).await;

    for page_no in 1..=pages {
        // Two projects per page, one on the last.
        let count = if page_no == pages { 1 } else { 2 };
        let body: Vec<Value> = (0..count)
            .map(|i| json!({"id": page_no * 10 + i, "name": format!("project-{page_no}-{i}")}))
            .collect();
        let next = if page_no == pages {
            String::new()
        } else {
            (page_no + 1).to_string()
        };

        Mock::given(method("GET"))
            .and(path("/api/v4/projects"))
            .and(query_param("page", page_no.to_string()))
            .respond_with(page(Value::Array(body), &next))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[given(regex = r"^a GitLab server with issues in project (\d+)$")]
async fn given_server_with_project_issues(world: &mut GitlabWorld, project_id: i64) {
    let server = upstream(world).await;
    let issues_path = format!("/api/v4/projects/{project_id}/issues");

    Mock::given(method("GET"))
        .and(path(issues_path.clone()))
        .and(query_param("page", "1"))
        .respond_with(page(
            json!([{"id": 1, "project_id": project_id, "title": "First", "state": "opened"}]),
            "2",
        ))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(issues_path))
        .and(query_param("page", "2"))
        .respond_with(page(
            json!([{"id": 2, "project_id": project_id, "title": "Second", "state": "closed"}]),
            "",
        ))
        .expect(1)
        .mount(server)
        .await;
}

#[given(regex = r#"^the connection config points at the GitLab server with token "(.*)"$"#)]
async fn given_connection_config(world: &mut GitlabWorld, token: String) {
    let base_url = format!("{}/api/v4", upstream(world).await.uri());
    let dir = tempfile::tempdir().expect("Failed to create connection config dir");
    let content = json!({"base_url": base_url, "token": token}).to_string();
    std::fs::write(dir.path().join("connection.json"), content)
        .expect("Failed to write connection config");
    world.connection_dir = Some(dir);
}

#[when(regex = r"^I run `gitlab-tables(.*)`$")]
async fn when_run_gitlab_tables(world: &mut GitlabWorld, command: String) {
    let mut args = vec!["gitlab-tables".to_string()];
    args.extend(command.split_whitespace().map(str::to_string));

    if world.connection_dir.is_none() {
        world.connection_dir =
            Some(tempfile::tempdir().expect("Failed to create connection config dir"));
    }
    let dir = world
        .connection_dir
        .as_ref()
        .map(|d| d.path().to_path_buf());
    let env = world.env.clone();

    let mut buffer: Vec<u8> = Vec::new();
    let writer_option: Option<&mut dyn std::io::Write> = Some(&mut buffer);

    let result = gitlab_tables::run::run(
        args,
        move |key| env.get(key).cloned(),
        dir.as_deref(),
        writer_option,
    )
    .await;

    world.captured_output = buffer;
    world.run_result = Some(result);
}

#[then("the command should succeed")]
async fn then_command_should_succeed(world: &mut GitlabWorld) {
    match &world.run_result {
        Some(Ok(())) => {}
        other => panic!("Command failed: {:?}", other),
    }
}

#[then(regex = r#"^the error should be "(.*)"$"#)]
async fn then_error_should_be(world: &mut GitlabWorld, expected: String) {
    assert_eq!(run_error(world), expected);
}

#[then(regex = r#"^the error should contain "(.*)"$"#)]
async fn then_error_should_contain(world: &mut GitlabWorld, expected: String) {
    let error = run_error(world);
    assert!(
        error.contains(&expected),
        "Expected error to contain '{}', but got:\n---\n{}\n---",
        expected,
        error
    );
}

#[then(regex = r"^the output should contain (\d+) rows$")]
async fn then_output_should_contain_rows(world: &mut GitlabWorld, count: usize) {
    let output = output(world);
    let rows = output
        .lines()
        .filter(|line| {
            serde_json::from_str::<Value>(line)
                .map(|v| v.is_object())
                .unwrap_or(false)
        })
        .count();
    assert_eq!(
        rows, count,
        "Expected {} rows, but got:\n---\n{}\n---",
        count, output
    );
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_should_contain(world: &mut GitlabWorld, expected: String) {
    let output = output(world);
    assert!(
        output.contains(&expected),
        "Expected output to contain '{}', but got:\n---\n{}\n---",
        expected,
        output
    );
}
