pub mod metrics;
pub mod session;

pub use session::SessionUser;
