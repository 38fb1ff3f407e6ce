pub mod charter;
pub mod record;

pub use charter::CharterNumber;
pub use record::{ErrorEntry, ResultRow, Website, UNKNOWN_WEBSITE};
