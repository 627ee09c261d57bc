//! Platform backed by an interactive prompt
//!
//! `evaluate` forwards a [`PromptRequest`] to whatever front end owns the
//! receiving half of the channel and waits for its one-shot answer. If the
//! front end goes away without answering, the evaluation resolves as a
//! system error.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::{Enrollment, Evaluation, EvaluationRequest, PlatformAuthenticator, PolicyKind};

/// Evaluation waiting for the user
#[derive(Debug)]
pub struct PromptRequest {
    /// Policy being evaluated
    pub policy: PolicyKind,
    /// Text to present
    pub request: EvaluationRequest,
    responder: oneshot::Sender<Evaluation>,
}

impl PromptRequest {
    /// Answer the prompt. Consumes the request so it resolves exactly once.
    pub fn respond(self, evaluation: Evaluation) {
        if self.responder.send(evaluation).is_err() {
            debug!("Prompt for {} answered after the attempt was dropped", self.policy);
        }
    }

    /// User satisfied the policy
    pub fn approve(self) {
        self.respond(Evaluation::success());
    }

    /// Factor did not match
    pub fn reject(self) {
        self.respond(Evaluation::failure());
    }

    /// User pressed the cancel affordance
    pub fn cancel(self) {
        self.respond(Evaluation::failure());
    }

    /// Whether the attempt waiting on this prompt is gone
    pub fn is_abandoned(&self) -> bool {
        self.responder.is_closed()
    }
}

/// Platform that asks a front end to resolve each evaluation
pub struct PromptAuthenticator {
    enrollment: Mutex<Enrollment>,
    sender: mpsc::Sender<PromptRequest>,
}

impl PromptAuthenticator {
    /// Create the platform and the receiver its prompts arrive on
    pub fn channel(enrollment: Enrollment) -> (Self, mpsc::Receiver<PromptRequest>) {
        // One attempt is outstanding at a time
        let (sender, receiver) = mpsc::channel(1);
        let platform = Self {
            enrollment: Mutex::new(enrollment),
            sender,
        };
        (platform, receiver)
    }

    /// Change which factors are available
    pub fn set_enrollment(&self, enrollment: Enrollment) {
        *self
            .enrollment
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = enrollment;
    }

    /// Current enrollment
    pub fn enrollment(&self) -> Enrollment {
        *self
            .enrollment
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PlatformAuthenticator for PromptAuthenticator {
    fn can_satisfy(&self, policy: PolicyKind) -> bool {
        self.enrollment().satisfies(policy)
    }

    async fn evaluate(&self, policy: PolicyKind, request: &EvaluationRequest) -> Evaluation {
        let (responder, answer) = oneshot::channel();
        let prompt = PromptRequest {
            policy,
            request: request.clone(),
            responder,
        };

        if self.sender.send(prompt).await.is_err() {
            error!("No prompt front end is listening");
            return Evaluation::system_error();
        }

        match answer.await {
            Ok(evaluation) => evaluation,
            Err(_) => {
                error!("Prompt for {} closed without an answer", policy);
                Evaluation::system_error()
            }
        }
    }

    fn name(&self) -> &'static str {
        "prompt"
    }
}
