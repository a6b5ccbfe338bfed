use clap::Parser;
use evidence_sheet::cli::{Cli, Commands, handle_compose, handle_guide};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compose(args) => handle_compose(args).await,
        Commands::Guide { method } => handle_guide(method),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
