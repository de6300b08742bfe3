use crate::constants::CSV_EXTENSION;
use crate::error::{Error, Result};
use crate::models::PriceRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

// Shared data store for passing between handlers
pub type SharedDataStore = Arc<DataStore>;

/// In-memory table of every price record found in the data directory
///
/// Built once by [`DataStore::load`] and never mutated afterwards. Handlers
/// get owned copies of the rows they need through [`DataStore::records_for`].
#[derive(Debug)]
pub struct DataStore {
    data_dir: PathBuf,
    files: Vec<PathBuf>,
    records: Vec<PriceRecord>,
    tickers: Vec<String>,
    loaded_at: DateTime<Utc>,
}

/// Load statistics for health and status reporting
#[derive(Clone, Debug, Serialize)]
pub struct StoreStats {
    pub data_dir: String,
    pub file_count: usize,
    pub record_count: usize,
    pub ticker_count: usize,
    pub loaded_at: String,
}

/// Per-ticker summary for the status command
#[derive(Clone, Debug, PartialEq)]
pub struct TickerSummary {
    pub ticker: String,
    pub record_count: usize,
    pub first_trade_date: String,
    pub last_trade_date: String,
}

impl DataStore {
    /// Read every `*.CSV` file in `data_dir` into one table.
    ///
    /// Files are read in file-name order and rows keep their order within a
    /// file. A missing directory, an empty match or a malformed file is an error.
    pub fn load(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let files = discover_csv_files(&data_dir)?;
        info!(dir = %data_dir.display(), files = files.len(), "Discovered CSV files");

        if files.is_empty() {
            return Err(Error::Config(format!(
                "No *.{} files found in {}",
                CSV_EXTENSION,
                data_dir.display()
            )));
        }

        let mut records = Vec::new();
        for path in &files {
            let rows = read_csv_file(path)?;
            debug!(path = %path.display(), rows = rows.len(), "Loaded CSV file");
            records.extend(rows);
        }

        let store = Self::from_parts(data_dir, files, records);
        info!(
            records = store.records.len(),
            tickers = store.tickers.len(),
            "Combined table loaded"
        );
        Ok(store)
    }

    /// Build a store from rows already in memory
    pub fn from_records(records: Vec<PriceRecord>) -> Self {
        Self::from_parts(PathBuf::new(), Vec::new(), records)
    }

    fn from_parts(data_dir: PathBuf, files: Vec<PathBuf>, records: Vec<PriceRecord>) -> Self {
        let tickers = records
            .iter()
            .map(|r| r.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            data_dir,
            files,
            records,
            tickers,
            loaded_at: Utc::now(),
        }
    }

    /// All rows in load order
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Owned copy of the rows for one ticker, in load order
    pub fn records_for(&self, ticker: &str) -> Vec<PriceRecord> {
        self.records.iter().filter(|r| r.ticker == ticker).cloned().collect()
    }

    /// Distinct ticker symbols, sorted
    pub fn ticker_symbols(&self) -> &[String] {
        &self.tickers
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            data_dir: self.data_dir.display().to_string(),
            file_count: self.files.len(),
            record_count: self.records.len(),
            ticker_count: self.tickers.len(),
            loaded_at: self.loaded_at.to_rfc3339(),
        }
    }

    /// Row counts and raw first/last trade dates per ticker, sorted by ticker
    pub fn ticker_summaries(&self) -> Vec<TickerSummary> {
        let mut summaries: BTreeMap<&str, TickerSummary> = BTreeMap::new();

        for record in &self.records {
            summaries
                .entry(record.ticker.as_str())
                .and_modify(|s| {
                    s.record_count += 1;
                    s.last_trade_date = record.trade_date.clone();
                })
                .or_insert_with(|| TickerSummary {
                    ticker: record.ticker.clone(),
                    record_count: 1,
                    first_trade_date: record.trade_date.clone(),
                    last_trade_date: record.trade_date.clone(),
                });
        }

        summaries.into_values().collect()
    }
}

/// List regular files with an exact `CSV` extension, sorted by file name
fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::Io(format!("Cannot read data directory {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path.extension().and_then(|e| e.to_str()) == Some(CSV_EXTENSION);
        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Read one bhavcopy file; extra columns are ignored
fn read_csv_file(path: &Path) -> Result<Vec<PriceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| Error::Io(format!("Cannot open {}: {}", path.display(), e)))?;

    let mut rows = Vec::with_capacity(1000);
    for result in reader.deserialize::<PriceRecord>() {
        let record = result.map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;
        rows.push(record);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "TradDt,BizDt,Sgmt,TckrSymb,OpnPric,ClsPric\n";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), format!("{}{}", HEADER, body)).unwrap();
    }

    #[test]
    fn test_load_concatenates_in_file_name_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.CSV", "2024-07-02,2024-07-02,CM,ABB,10,11.5\n2024-07-02,2024-07-02,CM,ATUL,20,21\n");
        write(temp.path(), "a.CSV", "2024-07-01,2024-07-01,CM,ABB,9,10.5\n");

        let store = DataStore::load(temp.path()).unwrap();
        assert_eq!(store.record_count(), 3);
        assert_eq!(store.files().len(), 2);
        assert_eq!(store.records()[0], PriceRecord::new("ABB", "2024-07-01", 10.5));
        assert_eq!(store.records()[1], PriceRecord::new("ABB", "2024-07-02", 11.5));
        assert_eq!(store.records()[2].ticker, "ATUL");
        assert_eq!(store.ticker_symbols(), ["ABB".to_string(), "ATUL".to_string()]);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "keep.CSV", "2024-07-01,2024-07-01,CM,ABB,9,10.5\n");
        write(temp.path(), "skip.csv", "2024-07-01,2024-07-01,CM,ATUL,9,10.5\n");
        fs::create_dir(temp.path().join("nested.CSV")).unwrap();

        let store = DataStore::load(temp.path()).unwrap();
        assert_eq!(store.files().len(), 1);
        assert_eq!(store.ticker_symbols(), ["ABB".to_string()]);
    }

    #[test]
    fn test_load_errors() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(DataStore::load(temp.path()), Err(Error::Config(_))));
        assert!(matches!(DataStore::load(temp.path().join("missing")), Err(Error::Io(_))));

        fs::write(temp.path().join("bad.CSV"), "TckrSymb,TradDt\nABB,2024-07-01\n").unwrap();
        assert!(matches!(DataStore::load(temp.path()), Err(Error::Parse(_))));
    }

    #[test]
    fn test_non_numeric_close_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "x.CSV", "2024-07-01,2024-07-01,CM,ABB,9,n/a\n");
        assert!(matches!(DataStore::load(temp.path()), Err(Error::Parse(_))));
    }

    #[test]
    fn test_records_for_returns_owned_copy() {
        let store = DataStore::from_records(vec![
            PriceRecord::new("ABB", "2024-07-01", 1.0),
            PriceRecord::new("ATUL", "2024-07-01", 2.0),
            PriceRecord::new("ABB", "2024-07-02", 3.0),
        ]);

        let mut rows = store.records_for("ABB");
        assert_eq!(rows.len(), 2);
        rows[0].close = 99.0;
        assert_eq!(store.records()[0].close, 1.0);

        assert!(store.records_for("abb").is_empty());
        assert!(store.records_for("NOPE").is_empty());
    }

    #[test]
    fn test_ticker_summaries_and_stats() {
        let store = DataStore::from_records(vec![
            PriceRecord::new("ATUL", "2024-07-01", 2.0),
            PriceRecord::new("ABB", "2024-07-01", 1.0),
            PriceRecord::new("ABB", "2024-07-02", 3.0),
        ]);

        let summaries = store.ticker_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].ticker, "ABB");
        assert_eq!(summaries[0].record_count, 2);
        assert_eq!(summaries[0].first_trade_date, "2024-07-01");
        assert_eq!(summaries[0].last_trade_date, "2024-07-02");

        let stats = store.stats();
        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.ticker_count, 2);
        assert_eq!(stats.file_count, 0);
    }
}
