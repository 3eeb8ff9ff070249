#[tokio::main]
async fn main() -> eyre::Result<()> {
    accrual_worker::run().await
}
