use clap::Parser;
use colored::Colorize;
use tracing::debug;

use foodgram::cli::{Cli, Commands};
use foodgram::config::init_config;
use foodgram::runtime::modes::{run_cli, run_server};
use foodgram::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = init_config(cli.config.as_deref());

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
            std::process::exit(1);
        }
    };
    debug!("Configuration initialized");

    let result = match cli.command {
        None | Some(Commands::Serve) => run_server(&config).await,
        Some(command) => run_cli(command, &config).await,
    };

    if let Err(e) = result {
        // 尽量给出业务错误的彩色格式
        match e.downcast_ref::<foodgram::errors::FoodgramError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
        }
        std::process::exit(1);
    }
}
