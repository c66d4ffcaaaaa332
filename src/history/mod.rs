//! Historical Bitcoin prices: bundled monthly table and lookup

mod bundled;
mod table;
pub mod loader;

pub use bundled::BUNDLED_PRICES;
pub use table::{GapPolicy, LookupError, PricePoint, PriceTable, TableError};
pub use loader::DEFAULT_HISTORY_PATH;
