//! Agent version check

use sut_core::Failure;

use super::ensure_alive;
use crate::context::ActiveSession;

/// Check that the agent reports exactly `expected`
///
/// With `flag_on_mismatch` set, a mismatch is recorded in the device's flag
/// with both the observed and the expected version.
pub async fn check_version(
    session: &mut ActiveSession<'_>,
    expected: &str,
    flag_on_mismatch: bool,
) -> bool {
    if !ensure_alive(session).await {
        return false;
    }

    let found = match session.handle().agent_version().await {
        Ok(version) => version,
        Err(e) => format!("<{}>", e),
    };

    if found != expected {
        if flag_on_mismatch {
            session.ctx().raise(Failure::VersionMismatch {
                found,
                expected: expected.to_string(),
            });
        } else {
            tracing::info!("Agent reports '{}', expected '{}'", found, expected);
        }
        return false;
    }

    tracing::info!("Got expected agent version '{}'", expected);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeDevice, EXPECTED_VERSION};

    #[tokio::test]
    async fn test_matching_version() {
        let (ctx, flag) = testing::context();
        let device = FakeDevice::healthy().shared();
        let mut session = testing::active(&ctx, &device);

        assert!(check_version(&mut session, EXPECTED_VERSION, true).await);
        assert!(flag.messages().is_empty());
    }

    #[tokio::test]
    async fn test_mismatch_without_flag_option_is_silent() {
        let (ctx, flag) = testing::context();
        let device = FakeDevice {
            version: "SUTAgentAndroid Version 1.08".into(),
            ..FakeDevice::healthy()
        }
        .shared();
        let mut session = testing::active(&ctx, &device);

        assert!(!check_version(&mut session, EXPECTED_VERSION, false).await);
        assert!(flag.messages().is_empty());
    }

    #[tokio::test]
    async fn test_mismatch_with_flag_option_records_both_versions() {
        let (ctx, flag) = testing::context();
        let device = FakeDevice {
            version: "SUTAgentAndroid Version 1.08".into(),
            ..FakeDevice::healthy()
        }
        .shared();
        let mut session = testing::active(&ctx, &device);

        assert!(!check_version(&mut session, EXPECTED_VERSION, true).await);

        let messages = flag.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("'SUTAgentAndroid Version 1.08'"));
        assert!(messages[0].contains(&format!("'{}'", EXPECTED_VERSION)));
    }

    #[tokio::test]
    async fn test_comparison_is_exact() {
        let (ctx, _flag) = testing::context();
        let device = FakeDevice {
            version: "sutagentandroid version 1.13".into(),
            ..FakeDevice::healthy()
        }
        .shared();
        let mut session = testing::active(&ctx, &device);

        assert!(!check_version(&mut session, EXPECTED_VERSION, false).await);

        device.lock().unwrap().version = format!("{} ", EXPECTED_VERSION);
        assert!(!check_version(&mut session, EXPECTED_VERSION, false).await);
    }

    #[tokio::test]
    async fn test_transport_error_counts_as_mismatch() {
        let (ctx, flag) = testing::context();
        let device = FakeDevice {
            fail_on: Some("ver"),
            ..FakeDevice::healthy()
        }
        .shared();
        let mut session = testing::active(&ctx, &device);

        assert!(!check_version(&mut session, EXPECTED_VERSION, true).await);

        let messages = flag.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("injected fault"));
    }

    #[tokio::test]
    async fn test_dead_session_skips_version_fetch() {
        let (ctx, flag) = testing::context();
        let device = FakeDevice {
            clock: None,
            ..FakeDevice::healthy()
        }
        .shared();
        let mut session = testing::active(&ctx, &device);

        assert!(!check_version(&mut session, EXPECTED_VERSION, true).await);
        assert_eq!(testing::calls(&device), vec!["clok"]);
        assert_eq!(flag.messages().len(), 1);
    }
}
