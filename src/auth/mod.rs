//! Credentials and OAuth2 token acquisition

pub mod credentials;
pub mod token;

pub use credentials::Credentials;
pub use token::{TokenCredential, TokenInfo};
