//! Identity-provider gateway
//!
//! Principals (email + credential accounts) live in an external identity
//! provider, distinct from the profile documents in the store. The
//! provisioning workflow creates a principal first and deletes it again if
//! a later step fails, so the trait is exactly those two operations.

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod rest;

pub use memory::MemoryIdentity;
pub use rest::RestIdentity;

/// Identity-provider failures. `Rejected` is the provider refusing the
/// operation (duplicate email, malformed email, unknown principal) and maps
/// to an `AuthenticationError` response; everything else is internal.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("{message}")]
    Rejected { code: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IdentityError {
    pub fn rejected(code: impl Into<String>) -> Self {
        let code = code.into();
        let message = friendly_message(&code);
        Self::Rejected { code, message }
    }
}

/// Human messages for the provider's error codes; unknown codes pass
/// through verbatim.
fn friendly_message(code: &str) -> String {
    match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.".to_string(),
        "INVALID_EMAIL" => "The email address is improperly formatted.".to_string(),
        "USER_NOT_FOUND" => {
            "There is no user record corresponding to this identifier.".to_string()
        }
        other => other.to_string(),
    }
}

/// External identity-provider operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a principal with the given email and password (email
    /// verification disabled, account enabled); returns its stable id.
    async fn create_principal(&self, email: &str, password: &str)
        -> Result<String, IdentityError>;

    /// Delete a principal by id.
    async fn delete_principal(&self, uid: &str) -> Result<(), IdentityError>;
}
