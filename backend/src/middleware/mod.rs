pub mod access_control;
pub mod security_headers;

pub use access_control::access_control;
