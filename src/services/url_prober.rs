use crate::models::payment::{NormalizedResult, RawApiResponse};
use crate::models::probe::{ProbeAttempt, ProbeOutcome};
use crate::services::pacing::ProbeDelay;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

/// Runs `attempt` for each URL in order, pausing after every attempt. A panic
/// inside one attempt is recorded for that URL and the loop moves on.
pub async fn run_probes<S, F, Fut>(
    urls: &[S],
    delay: &dyn ProbeDelay,
    mut attempt: F,
) -> Vec<ProbeOutcome>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = (RawApiResponse, NormalizedResult)>,
{
    let mut outcomes = Vec::with_capacity(urls.len());

    for url in urls {
        let url = url.as_ref();
        info!("Probing payment endpoint {}", url);

        let guarded = AssertUnwindSafe(async { attempt(url).await }).catch_unwind();
        let attempt_result = match guarded.await {
            Ok((response, result)) => {
                if result.is_success() {
                    info!("Endpoint {} accepted the payment", url);
                } else {
                    warn!("Endpoint {} did not accept the payment: {:?}", url, result);
                }
                ProbeAttempt::Completed { response, result }
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Probe of {} aborted: {}", url, message);
                ProbeAttempt::Errored { error: message }
            }
        };

        outcomes.push(ProbeOutcome {
            url: url.to_string(),
            attempt: attempt_result,
        });

        delay.pause().await;
    }

    outcomes
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "probe attempt panicked".to_string()
    }
}
