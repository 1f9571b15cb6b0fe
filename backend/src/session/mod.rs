pub mod policy;
pub mod routes;
pub mod token;

pub use policy::{SessionPolicy, SessionStatus};
pub use token::{SessionClaims, TokenError};
