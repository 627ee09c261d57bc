//! Authentication policy selection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AuthOptions;

/// Platform-defined rule describing which local factors satisfy an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Either an enrolled biometric or a reachable companion device
    BiometricsOrCompanionDevice,
    /// Enrolled biometric only
    BiometricsOnly,
    /// Reachable companion device only
    CompanionDeviceOnly,
}

impl PolicyKind {
    /// Pick the policy for the given options.
    ///
    /// Returns `None` when no factor is allowed; the trigger must be
    /// disabled in that case.
    pub fn select(options: &AuthOptions) -> Option<Self> {
        match (options.allow_companion_device, options.allow_biometric) {
            (true, true) => Some(Self::BiometricsOrCompanionDevice),
            (false, true) => Some(Self::BiometricsOnly),
            (true, false) => Some(Self::CompanionDeviceOnly),
            (false, false) => None,
        }
    }

    /// Whether a biometric match satisfies this policy
    pub fn accepts_biometric(&self) -> bool {
        matches!(self, Self::BiometricsOrCompanionDevice | Self::BiometricsOnly)
    }

    /// Whether a companion device satisfies this policy
    pub fn accepts_companion_device(&self) -> bool {
        matches!(
            self,
            Self::BiometricsOrCompanionDevice | Self::CompanionDeviceOnly
        )
    }

    /// Short human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::BiometricsOrCompanionDevice => "Touch ID or Apple Watch",
            Self::BiometricsOnly => "Touch ID",
            Self::CompanionDeviceOnly => "Apple Watch",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_table() {
        assert_eq!(
            PolicyKind::select(&AuthOptions::new(true, true)),
            Some(PolicyKind::BiometricsOrCompanionDevice)
        );
        assert_eq!(
            PolicyKind::select(&AuthOptions::new(false, true)),
            Some(PolicyKind::BiometricsOnly)
        );
        assert_eq!(
            PolicyKind::select(&AuthOptions::new(true, false)),
            Some(PolicyKind::CompanionDeviceOnly)
        );
        assert_eq!(PolicyKind::select(&AuthOptions::new(false, false)), None);
    }

    #[test]
    fn test_accepted_factors() {
        let either = PolicyKind::BiometricsOrCompanionDevice;
        assert!(either.accepts_biometric());
        assert!(either.accepts_companion_device());

        assert!(PolicyKind::BiometricsOnly.accepts_biometric());
        assert!(!PolicyKind::BiometricsOnly.accepts_companion_device());

        assert!(!PolicyKind::CompanionDeviceOnly.accepts_biometric());
        assert!(PolicyKind::CompanionDeviceOnly.accepts_companion_device());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PolicyKind::CompanionDeviceOnly).unwrap();
        assert_eq!(json, "\"companion_device_only\"");
    }
}
