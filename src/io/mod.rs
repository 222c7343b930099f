mod export;

pub use export::{Exporter, LedgerExport};
