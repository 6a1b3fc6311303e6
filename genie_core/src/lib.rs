pub mod config;
pub mod constraints;
pub mod form;
pub mod gateway;
pub mod request;
pub mod result;

pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::config::{ApiConfig, Endpoints, LoadFromEnv};
    pub use crate::constraints::Constraints;
    pub use crate::form::{Field, RequestBuilder};
    pub use crate::gateway::Gateway;
    pub use crate::request::{CaseType, DataType, ElementType, GenerationRequest, OutputFormat};
    pub use crate::result::GenerationResult;
}

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
