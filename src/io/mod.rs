/// CSV and JSON export of step results.
pub mod export;
/// CSV import of demand series.
pub mod import;
