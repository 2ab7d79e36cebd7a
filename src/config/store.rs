//! Shared credential and runtime configuration holder.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::credentials::Credentials;
use super::error::ValidationError;
use super::runtime::{validate_base_url, RuntimeConfig};

/// Owner of the merchant key material and the mutable runtime knobs.
///
/// Build one per process and hand out clones of the `Arc` to every component
/// that signs or verifies. Reads are safe from any number of tasks.
/// Reconfiguration must happen-before concurrent signing; callers serialize
/// their own configuration changes.
#[derive(Debug)]
pub struct CredentialStore {
    credentials: Credentials,
    runtime: RwLock<RuntimeConfig>,
}

impl CredentialStore {
    /// Create a store after validating both credentials and runtime knobs.
    pub fn new(credentials: Credentials, runtime: RuntimeConfig) -> Result<Self, ValidationError> {
        credentials.validate()?;
        runtime.validate()?;
        Ok(Self {
            credentials,
            runtime: RwLock::new(runtime),
        })
    }

    /// Same as [`CredentialStore::new`], wrapped for sharing.
    pub fn shared(
        credentials: Credentials,
        runtime: RuntimeConfig,
    ) -> Result<Arc<Self>, ValidationError> {
        Self::new(credentials, runtime).map(Arc::new)
    }

    /// Skips validation, for exercising key faults that only surface at use.
    #[cfg(test)]
    pub(crate) fn unchecked(credentials: Credentials, runtime: RuntimeConfig) -> Arc<Self> {
        Arc::new(Self {
            credentials,
            runtime: RwLock::new(runtime),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Snapshot of the current runtime knobs.
    pub fn runtime(&self) -> RuntimeConfig {
        self.read().clone()
    }

    /// Point subsequent requests at a different API endpoint.
    pub fn set_base_url(&self, base_url: impl Into<String>) -> Result<(), ValidationError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;
        self.write().base_url = base_url;
        Ok(())
    }

    /// Change the signature scheme version announced in request headers.
    pub fn set_sign_version(&self, sign_version: u32) -> Result<(), ValidationError> {
        if sign_version == 0 {
            return Err(ValidationError::InvalidSignVersion);
        }
        self.write().sign_version = sign_version;
        Ok(())
    }

    /// Apply several changes at once. Nothing is committed unless the
    /// resulting configuration validates.
    pub fn update_runtime<F>(&self, update: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut RuntimeConfig),
    {
        let mut guard = self.write();
        let mut candidate = guard.clone();
        update(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, RuntimeConfig> {
        // Writers never panic mid-update, so a poisoned lock still holds a valid value.
        self.runtime.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuntimeConfig> {
        self.runtime.write().unwrap_or_else(|e| e.into_inner())
    }
}
