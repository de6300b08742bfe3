use crate::constants::{csv_column, TABLE_PREVIEW_ROWS};
use crate::error::Result;
use crate::services::DataStore;
use std::path::PathBuf;

pub fn run(data_dir: PathBuf) {
    println!("📊 Stock Data Status\n");

    match show_status(data_dir) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_status(data_dir: PathBuf) -> Result<()> {
    let store = DataStore::load(&data_dir)?;
    let stats = store.stats();

    println!("📁 Data directory: {}", stats.data_dir);
    println!("📄 Files:          {}", format_number(stats.file_count));
    println!("🧾 Records:        {}", format_number(stats.record_count));
    println!("📈 Tickers:        {}\n", format_number(stats.ticker_count));

    println!("═══════════════════════════════════════════════════════════\n");

    println!("{:<14} {:>8}  {:<12} {:<12}", "Ticker", "Rows", "First", "Last");
    for summary in store.ticker_summaries() {
        println!(
            "{:<14} {:>8}  {:<12} {:<12}",
            summary.ticker,
            format_number(summary.record_count),
            summary.first_trade_date,
            summary.last_trade_date
        );
    }

    println!("\n═══════════════════════════════════════════════════════════\n");
    print_preview(&store);

    Ok(())
}

/// Print the head and tail of the combined table
pub fn print_preview(store: &DataStore) {
    let records = store.records();
    println!("Combined table ({} rows):", format_number(records.len()));
    println!(
        "{:>8}  {:<14} {:<12} {:>12}",
        "",
        csv_column::TICKER,
        csv_column::TRADE_DATE,
        csv_column::CLOSE_PRICE
    );

    let print_row = |i: usize| {
        let r = &records[i];
        println!("{:>8}  {:<14} {:<12} {:>12.2}", i, r.ticker, r.trade_date, r.close);
    };

    if records.len() <= TABLE_PREVIEW_ROWS * 2 {
        (0..records.len()).for_each(print_row);
    } else {
        (0..TABLE_PREVIEW_ROWS).for_each(print_row);
        println!("{:>8}", "...");
        (records.len() - TABLE_PREVIEW_ROWS..records.len()).for_each(print_row);
    }
}

pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
