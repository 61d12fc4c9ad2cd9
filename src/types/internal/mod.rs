pub mod auth;
pub mod context;

pub use context::{RequestContext, RequestId, RequestSource};
