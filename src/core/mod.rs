// Domain-layer modules and shared errors/models
pub mod summary {
    pub use crate::summary::*;
}

pub mod authenticator {
    pub use crate::authenticator::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
