mod error;
pub mod list;

pub use error::Error;
