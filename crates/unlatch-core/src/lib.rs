//! Unlatch Core - Authentication policy selection and session gating
//!
//! This crate decides which local authentication policy to request from the
//! platform, runs a single evaluation at a time, and maps its outcome onto
//! an observable session/notice state that a front end can render.

pub mod controller;
pub mod error;
pub mod notice;
pub mod options;
pub mod platform;
pub mod policy;
pub mod prompt;
pub mod simulated;
pub mod state;

pub use controller::{Attempt, AttemptOutcome, AuthController, Toggle};
pub use error::{Result, UnlatchError};
pub use notice::Notice;
pub use options::AuthOptions;
pub use platform::{Enrollment, Evaluation, EvaluationRequest, PlatformAuthenticator};
pub use policy::PolicyKind;
pub use prompt::{PromptAuthenticator, PromptRequest};
pub use simulated::SimulatedAuthenticator;
pub use state::{AuthSnapshot, SessionState};

/// Default user-facing justification shown by the platform prompt
pub const DEFAULT_REASON: &str = "Sign in.";

/// Default label of the cancel affordance inside the platform prompt
pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";
