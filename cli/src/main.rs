use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vaul_cli::Cli;

fn main() -> ExitCode {
    // Logs go to stderr so a run command's stdout stays untouched.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match vaul_cli::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
