//! Report transport implementations

mod http;
mod log;

pub use http::HttpTransport;
pub use log::LogTransport;
