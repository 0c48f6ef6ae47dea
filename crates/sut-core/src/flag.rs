//! Diagnostic flag file
//!
//! A device that fails verification gets a one-line flag file at
//! `<root>/<device>/error.flg`. Its presence tells operators and the job
//! scheduler that the device needs attention. The pipeline only ever
//! writes the flag; clearing it is someone else's job.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::FLAG_FILE_NAME;
use crate::traits::FlagWriter;
use crate::types::DeviceId;

/// Get the flag file path for a device
pub fn flag_path(root: &Path, device: &DeviceId) -> PathBuf {
    root.join(device.as_str()).join(FLAG_FILE_NAME)
}

/// Write a message to the flag file, replacing any previous content
///
/// Creates parent directories if they don't exist.
pub fn write_flag(path: &Path, message: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    writeln!(file, "{}", message)?;
    Ok(())
}

/// Flag file for one device
#[derive(Debug, Clone)]
pub struct FlagFile {
    path: PathBuf,
}

impl FlagFile {
    /// Flag file for `device` under `root`
    pub fn new(root: &Path, device: &DeviceId) -> Self {
        Self {
            path: flag_path(root, device),
        }
    }

    /// Location of the flag file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagWriter for FlagFile {
    fn set_flag(&self, message: &str) {
        tracing::info!("Setting flag {:?}: {}", self.path, message);
        if let Err(e) = write_flag(&self.path, message) {
            tracing::error!("Failed to write flag file {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flag_path_layout() {
        let path = flag_path(Path::new("/builds"), &DeviceId::from("tegra-042"));
        assert_eq!(path, PathBuf::from("/builds/tegra-042/error.flg"));
    }

    #[test]
    fn test_write_creates_device_dir() {
        let dir = TempDir::new().unwrap();
        let path = flag_path(dir.path(), &DeviceId::from("tegra-042"));

        write_flag(&path, "Unable to ping device after 5 retries").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Unable to ping device after 5 retries\n");
    }

    #[test]
    fn test_write_overwrites_previous_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error.flg");

        write_flag(&path, "first failure").unwrap();
        write_flag(&path, "second failure").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second failure\n");
    }

    #[test]
    fn test_flag_file_writer() {
        let dir = TempDir::new().unwrap();
        let flag = FlagFile::new(dir.path(), &DeviceId::from("tegra-007"));

        flag.set_flag("Device session lost connection to device");

        assert!(flag.path().exists());
        assert!(fs::read_to_string(flag.path())
            .unwrap()
            .contains("lost connection"));
    }

    #[test]
    fn test_unwritable_flag_does_not_panic() {
        let dir = TempDir::new().unwrap();
        // A regular file where the device directory should be
        let blocker = dir.path().join("tegra-009");
        fs::write(&blocker, "not a directory").unwrap();

        let flag = FlagFile::new(dir.path(), &DeviceId::from("tegra-009"));
        flag.set_flag("anything");

        assert!(!flag.path().exists());
    }
}
