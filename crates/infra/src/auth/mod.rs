//! Authentication adapters

mod session;

pub use session::SessionAuth;
