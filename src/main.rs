#[tokio::main]
async fn main() -> anyhow::Result<()> {
    csv_summary::run().await
}
