mod snapshot;
mod store;

pub use snapshot::StoreSnapshot;
pub use store::{AccountStore, StoreError};
