pub mod error;
pub mod msg;
pub mod session;
pub mod state;

pub use crate::error::TableError;
pub use crate::session::{execute, instantiate, query, Session};
