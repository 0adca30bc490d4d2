// src/main.rs
use clap::Parser;
use crossterm::style::Stylize;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
};
use wardrobe::cli::args::Cli;
use wardrobe::cli::error::CliError;
use wardrobe::config::{load_settings, Settings};
use wardrobe::exitcode;
use wardrobe::infrastructure::di::ServiceContainer;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug, cli.no_color);

    if cli.generate_config {
        println!("{}", wardrobe::config::generate_default_config());
        return;
    }

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) if cli.config.is_some() => {
            report(&format!("Failed to load config: {}", e), cli.no_color);
            std::process::exit(exitcode::USAGE);
        }
        Err(e) => {
            debug!("Failed to load settings: {}. Using defaults.", e);
            Settings::default()
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report(&format!("Failed to create async runtime: {}", e), cli.no_color);
            std::process::exit(exitcode::IOERR);
        }
    };

    let no_color = cli.no_color;
    if let Err(e) = runtime.block_on(run(cli, settings)) {
        report(&format!("Error: {}", e), no_color);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<(), CliError> {
    // Single composition root for both stores
    let services = ServiceContainer::new(&settings)
        .await
        .map_err(|e| CliError::from(e).context("Failed to create service container"))?;
    wardrobe::cli::execute_command(cli, &services).await
}

fn report(message: &str, no_color: bool) {
    if no_color {
        eprintln!("{}", message);
    } else {
        eprintln!("{}", message.red());
    }
}

fn setup_logging(verbosity: u8, no_color: bool) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let module_filter = filter_fn(|metadata| metadata.target().starts_with("wardrobe"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_cli_command_when_verify_then_debug_asserts_pass() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }
}
