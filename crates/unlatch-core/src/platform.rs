//! Platform authentication capability abstraction
//!
//! The controller never talks to biometric hardware directly. Instead it
//! asks a [`PlatformAuthenticator`] two questions:
//! - can this policy be satisfied right now (synchronous, side-effect free)
//! - evaluate this policy (asynchronous, resolves exactly once)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{PolicyKind, DEFAULT_CANCEL_LABEL, DEFAULT_REASON};

/// Text shown by the platform while it evaluates a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Justification presented to the user
    pub reason: String,
    /// Label of the cancel affordance
    pub cancel_label: String,
}

impl Default for EvaluationRequest {
    fn default() -> Self {
        Self {
            reason: DEFAULT_REASON.to_string(),
            cancel_label: DEFAULT_CANCEL_LABEL.to_string(),
        }
    }
}

impl EvaluationRequest {
    /// Create a request with custom text
    pub fn new(reason: impl Into<String>, cancel_label: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            cancel_label: cancel_label.into(),
        }
    }
}

/// Result reported by the platform for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The user satisfied the policy
    pub succeeded: bool,
    /// The platform failed for reasons unrelated to the user
    pub system_error: bool,
}

impl Evaluation {
    /// The user was authenticated
    pub const fn success() -> Self {
        Self {
            succeeded: true,
            system_error: false,
        }
    }

    /// The user did not authenticate (no match, cancel, lockout, timeout)
    pub const fn failure() -> Self {
        Self {
            succeeded: false,
            system_error: false,
        }
    }

    /// The platform itself malfunctioned
    pub const fn system_error() -> Self {
        Self {
            succeeded: false,
            system_error: true,
        }
    }
}

/// Trait for the device-local authentication capability
#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    /// Whether `policy` can be evaluated right now
    fn can_satisfy(&self, policy: PolicyKind) -> bool;

    /// Evaluate `policy`, presenting `request` to the user.
    ///
    /// Must resolve exactly once. User cancellation resolves as a failed
    /// evaluation, not as a system error.
    async fn evaluate(&self, policy: PolicyKind, request: &EvaluationRequest) -> Evaluation;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Factors a device can currently offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// A biometric is enrolled and the sensor is present
    #[serde(default = "default_true")]
    pub biometric_enrolled: bool,

    /// A paired companion device is reachable
    #[serde(default = "default_true")]
    pub companion_device_reachable: bool,

    /// Local authentication is switched off by device management
    #[serde(default)]
    pub disabled_by_policy: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Enrollment {
    fn default() -> Self {
        Self {
            biometric_enrolled: true,
            companion_device_reachable: true,
            disabled_by_policy: false,
        }
    }
}

impl Enrollment {
    /// A device with no usable factor
    pub fn none() -> Self {
        Self {
            biometric_enrolled: false,
            companion_device_reachable: false,
            disabled_by_policy: false,
        }
    }

    /// Whether this enrollment can satisfy `policy`
    pub fn satisfies(&self, policy: PolicyKind) -> bool {
        if self.disabled_by_policy {
            return false;
        }

        (policy.accepts_biometric() && self.biometric_enrolled)
            || (policy.accepts_companion_device() && self.companion_device_reachable)
    }
}
