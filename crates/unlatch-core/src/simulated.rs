//! Scripted platform for headless use and tests

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::{Enrollment, Evaluation, EvaluationRequest, PlatformAuthenticator, PolicyKind};

/// Platform whose enrollment and evaluation results are set by the caller.
///
/// Evaluations are taken from a queue; once the queue is empty every
/// evaluation returns the fallback result (success unless changed).
pub struct SimulatedAuthenticator {
    enrollment: Mutex<Enrollment>,
    script: Mutex<VecDeque<Evaluation>>,
    fallback: Mutex<Evaluation>,
    evaluated: Mutex<Vec<(PolicyKind, EvaluationRequest)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SimulatedAuthenticator {
    /// Create a platform with the given enrollment
    pub fn new(enrollment: Enrollment) -> Self {
        Self {
            enrollment: Mutex::new(enrollment),
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Evaluation::success()),
            evaluated: Mutex::new(Vec::new()),
        }
    }

    /// Create a platform that always answers `evaluation`
    pub fn always(enrollment: Enrollment, evaluation: Evaluation) -> Self {
        let platform = Self::new(enrollment);
        platform.set_fallback(evaluation);
        platform
    }

    /// Queue the result of the next evaluation
    pub fn push_evaluation(&self, evaluation: Evaluation) {
        lock(&self.script).push_back(evaluation);
    }

    /// Result used when the queue is empty
    pub fn set_fallback(&self, evaluation: Evaluation) {
        *lock(&self.fallback) = evaluation;
    }

    /// Change which factors are available
    pub fn set_enrollment(&self, enrollment: Enrollment) {
        *lock(&self.enrollment) = enrollment;
    }

    /// Current enrollment
    pub fn enrollment(&self) -> Enrollment {
        *lock(&self.enrollment)
    }

    /// Number of evaluations performed so far
    pub fn evaluate_calls(&self) -> usize {
        lock(&self.evaluated).len()
    }

    /// Policies evaluated so far, oldest first
    pub fn evaluated_policies(&self) -> Vec<PolicyKind> {
        lock(&self.evaluated).iter().map(|(policy, _)| *policy).collect()
    }

    /// Prompt text of the most recent evaluation
    pub fn last_request(&self) -> Option<EvaluationRequest> {
        lock(&self.evaluated).last().map(|(_, request)| request.clone())
    }
}

impl Default for SimulatedAuthenticator {
    fn default() -> Self {
        Self::new(Enrollment::default())
    }
}

#[async_trait]
impl PlatformAuthenticator for SimulatedAuthenticator {
    fn can_satisfy(&self, policy: PolicyKind) -> bool {
        lock(&self.enrollment).satisfies(policy)
    }

    async fn evaluate(&self, policy: PolicyKind, request: &EvaluationRequest) -> Evaluation {
        lock(&self.evaluated).push((policy, request.clone()));

        let scripted = lock(&self.script).pop_front();
        let evaluation = scripted.unwrap_or_else(|| *lock(&self.fallback));
        debug!(?evaluation, "Simulated evaluation of {}", policy);
        evaluation
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
