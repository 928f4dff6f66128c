//! Exploration Stats CLI entry point.

use clap::Parser;

use exploration_stats::cli::{commands, AppContext, Cli, Commands};
use exploration_stats::infrastructure::logging::{LogConfig, LoggerImpl};
use exploration_stats::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => exploration_stats::cli::handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => exploration_stats::cli::handle_error(err, cli.json),
    };

    let ctx = match AppContext::from_config(config).await {
        Ok(ctx) => ctx,
        Err(err) => exploration_stats::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Record(args) => commands::record::execute(args, &ctx, cli.json).await,
        Commands::Stats(args) => commands::stats::execute(args, &ctx, cli.json).await,
        Commands::Answers(args) => commands::answers::execute(args, &ctx, cli.json).await,
        Commands::Report(args) => commands::report::execute(args, &ctx, cli.json).await,
    };

    if let Err(err) = result {
        exploration_stats::cli::handle_error(err, cli.json);
    }
}
