use crate::commands::status::{format_number, print_preview};
use crate::models::{PageOptions, TickerOptionSource};
use crate::server::{self, AppState};
use crate::services::DataStore;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(host: IpAddr, port: u16, data_dir: PathBuf, ticker_options: TickerOptionSource) {
    println!("🚀 Starting stockchart server on {}:{}", host, port);
    println!("📁 Data directory: {}", data_dir.display());

    // Load once before serving; any failure here is fatal
    let store = match DataStore::load(&data_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to load data: {}", e);
            std::process::exit(1);
        }
    };

    println!("✅ Data loaded successfully:");
    println!("   📄 Files:   {}", format_number(store.files().len()));
    println!("   🧾 Records: {}", format_number(store.record_count()));
    println!("   📈 Tickers: {}", format_number(store.ticker_symbols().len()));
    println!("   🔤 Symbols: {}", store.ticker_symbols().join(", "));
    println!();
    print_preview(&store);
    println!();

    let options = PageOptions::new(ticker_options, store.ticker_symbols());
    println!("🔽 Ticker dropdown: {:?} ({} entries)", ticker_options, options.tickers.len());

    let app_state = AppState::new(Arc::new(store), options);

    println!("🌐 Starting HTTP server...");
    if let Err(e) = server::serve(app_state, SocketAddr::new(host, port)).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
