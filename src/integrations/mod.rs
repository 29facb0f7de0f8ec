//! External service integrations.

pub mod upstream_client {
    pub use crate::upstream_client::*;
}

pub mod account_store {
    pub use crate::account_store::*;
}
