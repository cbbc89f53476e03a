#[tokio::main]
async fn main() {
    if let Err(e) = chain_consistency::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
