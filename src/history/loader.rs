//! CSV-based price table loader
//!
//! Loads an override of the bundled table from `data/historical_prices.csv`
//! (columns `year,month,price_usd`).

use std::fs::File;
use std::path::Path;

use log::info;

use super::table::{GapPolicy, PricePoint, PriceTable, TableError};
use crate::date::YearMonth;

/// Default path to the historical price CSV
pub const DEFAULT_HISTORY_PATH: &str = "data/historical_prices.csv";

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    year: i32,
    month: u32,
    price_usd: f64,
}

/// Load price points from a CSV file
pub fn load_price_points(path: &Path) -> Result<Vec<PricePoint>, TableError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut points = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        points.push(PricePoint {
            date: YearMonth::new(row.year, row.month)?,
            price: row.price_usd,
        });
    }

    Ok(points)
}

impl PriceTable {
    /// Load a table from a specific CSV file
    pub fn from_csv_path(path: &Path, policy: GapPolicy) -> Result<Self, TableError> {
        let table = Self::new(load_price_points(path)?, policy)?;
        let (first, last) = table.range();
        info!(
            "Loaded {} historical prices ({} to {}) from {}",
            table.len(),
            first,
            last,
            path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_HISTORY_PATH)
    }

    #[test]
    fn test_load_default_csv_matches_bundled() {
        let loaded = PriceTable::from_csv_path(&data_path(), GapPolicy::NearestEarlier);
        assert!(loaded.is_ok(), "Failed to load prices: {:?}", loaded.err());

        let loaded = loaded.unwrap();
        let bundled = PriceTable::bundled(GapPolicy::NearestEarlier).unwrap();
        assert_eq!(loaded.len(), bundled.len());
        assert_eq!(loaded.range(), bundled.range());
        for (a, b) in loaded.points().zip(bundled.points()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PriceTable::from_csv_path(Path::new("does/not/exist.csv"), GapPolicy::Exact);
        assert!(matches!(result, Err(TableError::Io(_))));
    }

    #[test]
    fn test_invalid_month_in_csv_rejected() {
        let path = std::env::temp_dir().join("btc_calculator_bad_month.csv");
        std::fs::write(&path, "year,month,price_usd\n2020,13,7200.0\n").unwrap();

        let result = load_price_points(&path);
        assert!(matches!(result, Err(TableError::Invalid(_))));

        let _ = std::fs::remove_file(&path);
    }
}
