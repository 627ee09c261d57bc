//! User-facing notices for attempts that did not sign the user in

use std::fmt;

use serde::{Deserialize, Serialize};

/// Most recent outcome that needs the user's attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The platform cannot evaluate the requested policy
    Unavailable,
    /// The attempt ran but did not succeed (no match, cancel, lockout)
    Failed,
    /// The platform capability itself malfunctioned
    Errored,
}

impl Notice {
    /// Alert title
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Unavailable => "No Authentication",
            Notice::Failed => "Authentication Failed",
            Notice::Errored => "Authentication Error",
        }
    }

    /// Alert body
    pub fn description(&self) -> &'static str {
        match self {
            Notice::Unavailable => {
                "Authentication won't work because your machine doesn't have any of the options you selected."
            }
            Notice::Failed => "Authentication failed or it was canceled.",
            Notice::Errored => "Something went wrong when trying to authenticate you.",
        }
    }

    /// Whether retrying without changing anything can help
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Notice::Unavailable)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
