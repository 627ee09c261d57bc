//! User-selectable authentication options

use serde::{Deserialize, Serialize};

use crate::PolicyKind;

/// Which local factors the user allows for the next attempt.
///
/// Both factors are allowed on start; the options live only in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOptions {
    /// Allow unlocking with a paired companion device (e.g. a watch)
    pub allow_companion_device: bool,
    /// Allow unlocking with an enrolled biometric (e.g. a fingerprint)
    pub allow_biometric: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            allow_companion_device: true,
            allow_biometric: true,
        }
    }
}

impl AuthOptions {
    /// Create options from explicit flags
    pub fn new(allow_companion_device: bool, allow_biometric: bool) -> Self {
        Self {
            allow_companion_device,
            allow_biometric,
        }
    }

    /// Policy these options request, if any factor is allowed
    pub fn policy(&self) -> Option<PolicyKind> {
        PolicyKind::select(self)
    }

    /// Whether at least one factor is allowed
    pub fn any_allowed(&self) -> bool {
        self.allow_companion_device || self.allow_biometric
    }
}
