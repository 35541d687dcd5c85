#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gitlab_tables::logging::init();

    let args: Vec<String> = std::env::args().collect();
    gitlab_tables::run::run(args, |key| std::env::var(key).ok(), None, None).await
}
