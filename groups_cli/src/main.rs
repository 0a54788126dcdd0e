use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    groups_lib::cli().await
}
