mod error;
mod service;

pub use error::LedgerError;
pub use service::{LedgerService, Receipt};
