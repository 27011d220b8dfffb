//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use nutriscore_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match nutriscore_cli::run() {
        Ok(()) => {}
        // Help, version and usage errors print and exit the way clap formats them.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("nutriscore: {err}");
            std::process::exit(1);
        }
    }
}
