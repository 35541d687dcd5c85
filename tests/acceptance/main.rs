use cucumber::World;
use std::collections::HashMap;
use std::fmt;

/// Keeps the mock GitLab alive for the duration of a scenario.
pub struct Upstream(pub wiremock::MockServer);

impl fmt::Debug for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Upstream").field(&self.0.uri()).finish()
    }
}

#[derive(Debug, Default, World)]
pub struct GitlabWorld {
    pub upstream: Option<Upstream>,
    pub env: HashMap<String, String>,
    pub connection_dir: Option<tempfile::TempDir>,
    pub captured_output: Vec<u8>,
    pub run_result: Option<Result<(), anyhow::Error>>,
}

#[tokio::main]
async fn main() {
    GitlabWorld::run("features").await;
}

mod steps;
