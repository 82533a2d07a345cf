pub mod report;
pub mod issue;
pub mod schedule;
pub mod financial;
pub mod appendix;
pub mod snapshot;
pub mod user;

pub use report::*;
pub use issue::*;
pub use schedule::*;
pub use financial::*;
pub use appendix::*;
pub use snapshot::*;
pub use user::*;
