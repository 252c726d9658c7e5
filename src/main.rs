use clap::Parser;
use lifeplan::api::{self, Cli};

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = api::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
