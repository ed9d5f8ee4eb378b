use assembly_config::cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("assembly_config=debug,info")
    } else {
        EnvFilter::new("assembly_config=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Tracks(args) => {
            cli::tracks::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Verify(args) => {
            cli::verify::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Reads(args) => {
            cli::reads::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Formula(args) => {
            cli::formula::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Contrasts(args) => {
            cli::contrasts::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
