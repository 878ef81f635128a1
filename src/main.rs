#[tokio::main]
async fn main() -> std::io::Result<()> {
    coach_server::run_with_config().await
}
