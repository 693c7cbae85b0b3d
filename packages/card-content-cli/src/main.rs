mod cli;
mod commands;
mod output;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json = cli.json;
    if let Err(e) = commands::run(cli).await {
        output::print_error(json, &e);
        std::process::exit(1);
    }
}
