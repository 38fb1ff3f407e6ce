pub mod csv;

use std::collections::HashSet;

use crate::app::Result;
use crate::domain::{CharterNumber, ErrorEntry, ResultRow};

pub use csv::CsvStore;

pub trait Store {
    /// Charters that already have a row in the result file.
    fn processed(&self) -> Result<HashSet<CharterNumber>>;

    fn append_result(&self, row: &ResultRow) -> Result<()>;
    fn append_error(&self, entry: &ErrorEntry) -> Result<()>;

    /// Overwrite the progress marker with the last charter stored.
    fn record_progress(&self, charter: CharterNumber) -> Result<()>;
}
