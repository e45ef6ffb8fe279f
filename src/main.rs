use clap::Parser;
use iris_client::cli::{run, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(message) = run(cli) {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}
