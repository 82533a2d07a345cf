pub mod context;
pub mod users;

pub use context::{require_role, RequestContext};
