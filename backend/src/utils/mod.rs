pub mod cookies;
pub mod password;
