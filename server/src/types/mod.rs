pub mod credentials;
pub mod identity;
pub mod user_id;

pub use credentials::{Credentials, ValidationError};
pub use identity::{CredentialRecord, Identity};
pub use user_id::UserId;
