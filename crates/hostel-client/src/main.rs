#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hostel_client_lib::run().await
}
