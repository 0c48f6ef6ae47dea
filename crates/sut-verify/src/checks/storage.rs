//! Removable storage check

use sut_core::config::StorageConfig;
use sut_core::error::StorageFailure;
use sut_core::traits::DeviceSession;
use sut_core::DeviceError;

use super::ensure_alive;
use crate::context::ActiveSession;

/// Write, inspect and remove a scratch file on the device's storage
pub async fn validate_storage(session: &mut ActiveSession<'_>, config: &StorageConfig) -> bool {
    if !ensure_alive(session).await {
        return false;
    }

    match exercise_storage(session.handle(), config).await {
        Ok(()) => {
            tracing::info!("{} is writable", config.mount);
            true
        }
        Err(failure) => {
            session.ctx().raise(failure.into());
            false
        }
    }
}

async fn exercise_storage(
    handle: &mut dyn DeviceSession,
    config: &StorageConfig,
) -> Result<(), StorageFailure> {
    let transport = |source: DeviceError| StorageFailure::Transport {
        mount: config.mount.clone(),
        source,
    };
    let test_file = config.test_file.as_str();

    if !handle.dir_exists(&config.mount).await.map_err(transport)? {
        return Err(StorageFailure::MountMissing(config.mount.clone()));
    }

    if handle.file_exists(test_file).await.map_err(transport)? {
        tracing::info!("{} left over from previous run, cleaning", test_file);
        if !handle.remove_file(test_file).await.map_err(transport)? {
            tracing::warn!("Unable to remove leftover {}", test_file);
        }
    }

    tracing::info!("Attempting to create file {}", test_file);
    let written = handle
        .push_data(&config.scratch_payload, test_file)
        .await
        .map_err(transport)?;
    if !written {
        return Err(StorageFailure::WriteFailed(config.mount.clone()));
    }

    if !handle.file_exists(test_file).await.map_err(transport)? {
        return Err(StorageFailure::VerifyFailed);
    }

    if !handle.remove_file(test_file).await.map_err(transport)? {
        return Err(StorageFailure::DeleteFailed);
    }

    Ok(())
}
