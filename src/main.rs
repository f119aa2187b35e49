use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scanctl::{cli, config, errors};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let result = match cli.command {
        cli::Commands::Stop(args) => cli::stop::handle_stop(args).await.map(|record| match record {
            Some(record) if !record.success => 3,
            _ => 0,
        }),
        cli::Commands::Validate(args) => handle_validate(args).await.map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let class = e.classify();
            debug!(error_type = class.error_type, retryable = class.retryable, "Command failed");
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), errors::ScanCtlError> {
    let path = std::path::PathBuf::from(&args.config);
    let _config = config::parse_config(&path).await?;
    println!(
        "Configuration is valid: {} (scanctl {} {} built {})",
        args.config,
        env!("CARGO_PKG_VERSION"),
        option_env!("SCANCTL_GIT_HASH").unwrap_or("unknown"),
        option_env!("SCANCTL_BUILD_TIMESTAMP").unwrap_or("unknown")
    );
    Ok(())
}
