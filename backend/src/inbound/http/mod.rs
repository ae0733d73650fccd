//! HTTP inbound adapter: callable operations, change-feed delivery and
//! operational endpoints.

pub mod callable;
pub mod caller;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod triggers;
pub(crate) mod validation;

pub use error::ApiResult;
