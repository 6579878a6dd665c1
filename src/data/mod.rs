pub mod loader;
pub mod parse;
pub mod series;

pub use loader::{load_raw_rows, read_raw_rows, RawRow};
pub use parse::{parse_calendar_date, parse_price_field};
pub use series::{CleaningReport, HistoricalSeries};
