//! In-memory identity provider
//!
//! Used by tests and credential-less local runs. Mirrors the remote
//! provider's observable behavior where the workflow depends on it:
//! duplicate emails are rejected with `EMAIL_EXISTS`, deleting an unknown
//! principal is `USER_NOT_FOUND`, and a deleted principal's email becomes
//! usable again.

use super::{IdentityError, IdentityProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryIdentity {
    // uid -> email
    accounts: Mutex<HashMap<String, String>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a principal with this email exists (test inspection).
    pub fn has_email(&self, email: &str) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .any(|existing| existing == email)
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_principal(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<String, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|existing| existing == email) {
            return Err(IdentityError::rejected("EMAIL_EXISTS"));
        }
        let uid = Uuid::new_v4().simple().to_string();
        accounts.insert(uid.clone(), email.to_string());
        Ok(uid)
    }

    async fn delete_principal(&self, uid: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.remove(uid).is_none() {
            return Err(IdentityError::rejected("USER_NOT_FOUND"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let identity = MemoryIdentity::new();
        identity
            .create_principal("asha@example.com", "pw")
            .await
            .unwrap();
        let err = identity
            .create_principal("asha@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { ref code, .. } if code == "EMAIL_EXISTS"));
    }

    #[tokio::test]
    async fn delete_frees_the_email() {
        let identity = MemoryIdentity::new();
        let uid = identity
            .create_principal("asha@example.com", "pw")
            .await
            .unwrap();
        identity.delete_principal(&uid).await.unwrap();
        assert!(!identity.has_email("asha@example.com"));
        // Email is usable again after deletion.
        identity
            .create_principal("asha@example.com", "pw")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_unknown_principal_is_rejected() {
        let identity = MemoryIdentity::new();
        let err = identity.delete_principal("ghost").await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { ref code, .. } if code == "USER_NOT_FOUND"));
    }
}
