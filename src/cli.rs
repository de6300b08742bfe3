use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::commands;
use crate::constants::{DATA_DIR_ENV, DEFAULT_HOST, DEFAULT_PORT};
use crate::models::TickerOptionSource;
use crate::utils::get_data_dir;

#[derive(Parser)]
#[command(name = "stockchart")]
#[command(about = "Stock closing-price charts from bhavcopy CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the data directory and start the web server
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_HOST)]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory containing *.CSV files
        #[arg(short, long, env = DATA_DIR_ENV)]
        data_dir: Option<PathBuf>,

        /// Where the ticker dropdown gets its entries
        #[arg(long, value_enum, default_value_t = TickerOptionSource::Static)]
        ticker_options: TickerOptionSource,
    },
    /// Load the data directory and print a summary
    Status {
        /// Directory containing *.CSV files
        #[arg(short, long, env = DATA_DIR_ENV)]
        data_dir: Option<PathBuf>,
    },
}

/// Initialize tracing from RUST_LOG, defaulting to info
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

pub async fn run() {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
            ticker_options,
        } => {
            let data_dir = data_dir.unwrap_or_else(get_data_dir);
            commands::serve::run(host, port, data_dir, ticker_options).await;
        }
        Commands::Status { data_dir } => {
            commands::status::run(data_dir.unwrap_or_else(get_data_dir));
        }
    }
}
