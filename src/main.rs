#[tokio::main]
async fn main() {
    stockchart::cli::run().await;
}
