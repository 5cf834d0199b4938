mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = platform::cli::Cli::parse();
    let succeeded = platform::run_app(cli)?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
