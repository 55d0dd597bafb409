pub mod credentials;
pub mod jwt;
pub mod password;
mod types;

pub use credentials::{CredentialError, CredentialStore};
pub use jwt::{IssuedToken, JwtKeys, TokenError, TokenService};
pub use types::{Claims, Identity, Role};
