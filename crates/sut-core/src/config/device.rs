//! On-device check configuration

use crate::types::ScreenMode;

/// Contents of the scratch file written by the storage check
///
/// Kept small so a slow link cannot turn a write test into a timeout.
pub const SCRATCH_PAYLOAD: &[u8] = b"sut-verify storage check\n";

/// Removable storage check settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Mount point that must exist on the device
    pub mount: String,

    /// Scratch file written and removed under the mount
    pub test_file: String,

    /// Bytes written to the scratch file
    pub scratch_payload: Vec<u8>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mount: "/mnt/sdcard".to_string(),
            test_file: "/mnt/sdcard/writetest".to_string(),
            scratch_payload: SCRATCH_PAYLOAD.to_vec(),
        }
    }
}

/// Display resolution check settings
///
/// The check is off unless explicitly enabled; devices whose display cannot
/// be switched would otherwise reboot on every run.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Run the resolution check
    pub enabled: bool,

    /// Resolution the device should report
    pub expected: ScreenMode,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            expected: ScreenMode::new(1024, 768, "crt"),
        }
    }
}

/// Device cleanup settings
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Processes left behind by earlier test jobs
    pub stale_processes: Vec<String>,

    /// Directories left behind by earlier test jobs
    pub leftover_dirs: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            stale_processes: vec![
                "org.mozilla.fennec".to_string(),
                "org.mozilla.firefox".to_string(),
            ],
            leftover_dirs: vec!["/mnt/sdcard/tests".to_string()],
        }
    }
}
