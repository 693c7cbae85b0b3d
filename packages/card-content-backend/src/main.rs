use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Err(e) = card_content_backend::run(config_path).await {
        eprintln!("card-content-backend: {}", e);
        std::process::exit(1);
    }
}
