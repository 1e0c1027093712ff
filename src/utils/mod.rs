pub mod identity;
pub mod password;

pub use identity::{classify_identity, LoginIdentity};
pub use password::{hash_password, verify_password, Password, PasswordHashString};
