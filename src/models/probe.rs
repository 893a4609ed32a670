use crate::models::payment::{NormalizedResult, RawApiResponse};
use serde::Serialize;

/// Result of trying one candidate base URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeOutcome {
    pub url: String,
    #[serde(flatten)]
    pub attempt: ProbeAttempt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProbeAttempt {
    Completed {
        response: RawApiResponse,
        result: NormalizedResult,
    },
    /// The attempt aborted before producing a response.
    Errored { error: String },
}

impl ProbeOutcome {
    pub fn result(&self) -> Option<&NormalizedResult> {
        match &self.attempt {
            ProbeAttempt::Completed { result, .. } => Some(result),
            ProbeAttempt::Errored { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result().is_some_and(NormalizedResult::is_success)
    }
}
