use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials come from .env or the environment.
    dotenvy::dotenv().ok();
    slated::init_logger();
    slated::run().await
}
