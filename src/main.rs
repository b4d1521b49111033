use clap::Parser;
use kanmd::cli::commands::Cli;
use kanmd::cli::handlers;
use kanmd::cli::output::ErrorJson;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = handlers::dispatch(cli) {
        if json {
            let payload = serde_json::to_string(&ErrorJson::from(&e)).unwrap_or_default();
            eprintln!("{}", payload);
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}
