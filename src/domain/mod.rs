mod account;
mod credential;
mod ledger;
mod money;
mod transaction;

pub use account::*;
pub use credential::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
