use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::KeyValueStore;

pub const DEVICE_ID_KEY: &str = "deviceId";

/// Opaque per-installation identifier used only for throttling.
///
/// Generated once, persisted, and never rotated automatically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the stored identity, generating and persisting one on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read or the new identity
    /// cannot be written.
    pub async fn load_or_create(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        if let Some(existing) = store.get(DEVICE_ID_KEY).await? {
            if !existing.trim().is_empty() {
                return Ok(Self(existing));
            }
            tracing::warn!("stored device id is blank; generating a new one");
        }

        let id = Uuid::new_v4().simple().to_string();
        store.set(DEVICE_ID_KEY, &id).await?;
        tracing::info!(device_id = %id, "generated device id");
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
