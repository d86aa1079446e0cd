//! Auth-domain identifiers, secrets, claims, token issuance, and credential hashing.

pub mod api_key;
pub mod claims;
pub mod id;
pub mod password;
pub mod secret;
pub mod token;

pub use api_key::*;
pub use claims::*;
pub use id::*;
pub use password::*;
pub use secret::*;
pub use token::{kind::*, service::*, verdict::*};
