//! Admin gate: password, restore point, destructive operations.
//!
//! Clearing and importing data require the admin password and always save
//! a restore point first. The password itself is never cleared.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use platetrack_core::{ServiceError, format_rfc3339};

use super::{PlateService, keys, read_json, read_usage, storage, to_json};
use crate::model::{Plate, PlateState, TransactionLog};
use crate::snapshot::DataSnapshot;

pub const MIN_PASSWORD_LEN: usize = 4;

/// Plates and logs as they were just before a destructive operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePoint {
    pub plates: Vec<Plate>,
    #[serde(default)]
    pub logs: Vec<TransactionLog>,
    pub timestamp: String,
}

/// Hash a plain password with argon2id.
fn hash_password(password: &str) -> Result<String, ServiceError> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

/// Verify a password against an argon2id hash.
fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

impl PlateService {
    pub fn has_admin_password(&self) -> Result<bool, ServiceError> {
        Ok(self.admin_hash()?.is_some())
    }

    /// Set or change the admin password. Changing it requires the current
    /// one.
    pub fn set_admin_password(
        &self,
        current: Option<&str>,
        password: &str,
        confirmation: &str,
    ) -> Result<(), ServiceError> {
        if let Some(hash) = self.admin_hash()? {
            if !current.is_some_and(|c| verify_password(c, &hash)) {
                return Err(ServiceError::PermissionDenied("current admin password is incorrect".into()));
            }
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "password must have at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if password != confirmation {
            return Err(ServiceError::Validation("passwords do not match".into()));
        }

        let hash = hash_password(password)?;
        self.kv
            .set(keys::ADMIN_PASSWORD, hash.as_bytes())
            .map_err(storage)?;
        info!("Admin password updated");
        Ok(())
    }

    /// Remove all plates, logs and usage overrides.
    pub fn clear_all(&mut self, password: &str) -> Result<(), ServiceError> {
        self.authorize(password)?;
        self.save_restore_point()?;

        let mut doomed = vec![keys::PLATES, keys::LOGS];
        if !self.kv.is_readonly(keys::USAGE) {
            doomed.push(keys::USAGE);
        }
        self.kv.batch_delete(&doomed).map_err(storage)?;

        self.state = PlateState::default();
        self.usage = read_usage(self.kv.as_ref())?;
        warn!("All plate data cleared");
        Ok(())
    }

    /// Replace plates and logs with a snapshot's. Usage overrides are
    /// replaced only when the snapshot carries them. All keys are written
    /// in one batch, so a pinned usage file fails the import untouched.
    pub fn import(&mut self, password: &str, snapshot: DataSnapshot) -> Result<(), ServiceError> {
        self.authorize(password)?;
        self.save_restore_point()?;

        let (state, usage) = snapshot.into_state();
        let plates_json = to_json(&state.plates)?;
        let logs_json = to_json(&state.logs)?;
        let usage_json = usage.as_ref().map(to_json).transpose()?;

        let mut entries = vec![
            (keys::PLATES, plates_json.as_slice()),
            (keys::LOGS, logs_json.as_slice()),
        ];
        if let Some(json) = &usage_json {
            entries.push((keys::USAGE, json.as_slice()));
        }
        self.kv.batch_set(&entries).map_err(storage)?;

        info!("Imported {} plates and {} logs", state.plates.len(), state.logs.len());
        self.state = state;
        if let Some(usage) = usage {
            self.usage = usage;
        }
        Ok(())
    }

    pub fn export(&self) -> DataSnapshot {
        DataSnapshot::export(&self.state, &self.usage, self.clock.now())
    }

    pub fn restore_point(&self) -> Result<Option<RestorePoint>, ServiceError> {
        read_json(self.kv.as_ref(), keys::RESTORE_POINT)
    }

    /// When the saved restore point was taken, if there is one.
    pub fn restore_point_timestamp(&self) -> Result<Option<String>, ServiceError> {
        Ok(self.restore_point()?.map(|p| p.timestamp))
    }

    /// Roll plates and logs back to the restore point. Returns false when
    /// there is none.
    pub fn restore_from_point(&mut self) -> Result<bool, ServiceError> {
        let Some(point) = self.restore_point()? else {
            return Ok(false);
        };
        self.commit(PlateState::new(point.plates, point.logs))?;
        info!("Restored state from restore point taken at {}", point.timestamp);
        Ok(true)
    }

    fn admin_hash(&self) -> Result<Option<String>, ServiceError> {
        self.kv
            .get(keys::ADMIN_PASSWORD)
            .map_err(storage)?
            .map(|bytes| String::from_utf8(bytes).map_err(|e| ServiceError::Internal(e.to_string())))
            .transpose()
    }

    fn authorize(&self, password: &str) -> Result<(), ServiceError> {
        let Some(hash) = self.admin_hash()? else {
            return Err(ServiceError::PermissionDenied(
                "set an admin password before running destructive operations".into(),
            ));
        };
        if !verify_password(password, &hash) {
            warn!("Rejected admin operation: wrong password");
            return Err(ServiceError::PermissionDenied("admin password is incorrect".into()));
        }
        Ok(())
    }

    fn save_restore_point(&self) -> Result<(), ServiceError> {
        let point = RestorePoint {
            plates: self.state.plates.clone(),
            logs: self.state.logs.clone(),
            timestamp: format_rfc3339(self.clock.now()),
        };
        self.kv
            .set(keys::RESTORE_POINT, &to_json(&point)?)
            .map_err(storage)?;
        info!("Restore point saved ({} plates)", point.plates.len());
        Ok(())
    }
}
