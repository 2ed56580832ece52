//! Fixed-interval polling for backend jobs.
//!
//! Generation and training share the same lifecycle: start a job, poll its
//! status on a timer, stop at the first terminal status or the first poll
//! failure. Nothing is retried. A poller owned by a torn-down view must
//! not keep mutating state, so spawned polls are wrapped in a handle that
//! aborts the task when stopped or dropped.

use atelier_api::ApiError;
use atelier_common_core::JobStatus;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Polling errors.
#[derive(Debug, Error)]
pub enum JobError {
    /// A status fetch failed; the poll stops and the job counts as errored.
    #[error("status poll failed: {0}")]
    Poll(#[source] ApiError),

    /// The poll loop was stopped before reaching a terminal status.
    #[error("job polling was cancelled")]
    Cancelled,

    /// The poll loop gave up after the configured number of polls.
    #[error("job still not terminal after {0} polls")]
    TimedOut(u32),
}

/// Poll loop configuration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status fetches.
    pub interval: Duration,
    /// Upper bound on fetches, if any.
    pub max_polls: Option<u32>,
}

impl PollConfig {
    /// Poll every `interval` with no upper bound.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_polls: None,
        }
    }
}

/// Something a job status can be read from.
pub trait JobState {
    /// Typed status of this observation.
    fn status(&self) -> JobStatus;
}

impl JobState for atelier_api::knowledge_base::GenerationStatus {
    fn status(&self) -> JobStatus {
        self.job_status()
    }
}

impl JobState for atelier_api::training::TrainingProgress {
    fn status(&self) -> JobStatus {
        self.job_status()
    }
}

/// Fetch a job's status on a fixed interval until it is terminal.
///
/// Every observation, terminal included, is passed to `observe`. The final
/// observation is returned; a fetch error ends the loop immediately.
pub async fn poll_until_terminal<S, F, Fut>(
    config: PollConfig,
    mut fetch: F,
    mut observe: impl FnMut(&S),
) -> Result<S, JobError>
where
    S: JobState,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, ApiError>>,
{
    let mut interval = tokio::time::interval(config.interval);
    let mut polls = 0u32;

    loop {
        interval.tick().await;
        polls += 1;

        let state = fetch().await.map_err(JobError::Poll)?;
        observe(&state);

        if state.status().is_terminal() {
            return Ok(state);
        }

        if let Some(max) = config.max_polls {
            if polls >= max {
                return Err(JobError::TimedOut(polls));
            }
        }
    }
}

/// A spawned poll task that dies with its owner.
pub struct JobHandle<T> {
    handle: Option<tokio::task::JoinHandle<Result<T, JobError>>>,
}

impl<T: Send + 'static> JobHandle<T> {
    /// Spawn a poll future on the current runtime.
    pub fn spawn<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, JobError>> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(fut)),
        }
    }

    /// Abort the poll task.
    pub fn stop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Wait for the poll to finish. An aborted task yields
    /// [`JobError::Cancelled`].
    pub async fn join(mut self) -> Result<T, JobError> {
        let handle = self.handle.take().expect("join consumes the handle once");
        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(JobError::Cancelled),
            Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
        }
    }
}

impl<T> Drop for JobHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_api::knowledge_base::GenerationStatus;
    use atelier_common_core::JobId;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    fn status(status: &str, generated: u32) -> GenerationStatus {
        serde_json::from_value(serde_json::json!({
            "jobId": "job-1",
            "status": status,
            "progress": 0.0,
            "samplesGenerated": generated,
            "totalSamples": 36,
        }))
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_at_terminal_status() {
        let script = Arc::new(Mutex::new(VecDeque::from(vec![
            status("processing", 10),
            status("processing", 25),
            status("completed", 36),
            status("completed", 36), // never fetched
        ])));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_observer = Arc::clone(&seen);

        let script_for_fetch = Arc::clone(&script);
        let last = poll_until_terminal(
            PollConfig::every(Duration::from_secs(2)),
            move || {
                let script = Arc::clone(&script_for_fetch);
                async move { Ok(script.lock().unwrap().pop_front().unwrap()) }
            },
            move |s: &GenerationStatus| {
                seen_by_observer.lock().unwrap().push(s.samples_generated);
            },
        )
        .await
        .unwrap();

        assert_eq!(last.samples_generated, 36);
        assert_eq!(*seen.lock().unwrap(), vec![10, 25, 36]);
        assert_eq!(script.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_stops_the_loop() {
        let mut calls = 0u32;
        let result = poll_until_terminal(
            PollConfig::every(Duration::from_secs(1)),
            move || {
                calls += 1;
                let fail = calls >= 2;
                async move {
                    if fail {
                        Err(ApiError::InvalidResponse("boom".to_string()))
                    } else {
                        Ok(status("processing", 1))
                    }
                }
            },
            |_: &GenerationStatus| {},
        )
        .await;

        assert!(matches!(result, Err(JobError::Poll(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out() {
        let result = poll_until_terminal(
            PollConfig {
                interval: Duration::from_secs(1),
                max_polls: Some(3),
            },
            || async { Ok(status("processing", 0)) },
            |_: &GenerationStatus| {},
        )
        .await;

        assert!(matches!(result, Err(JobError::TimedOut(3))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_handle_stop_cancels() {
        let mut handle = JobHandle::spawn(poll_until_terminal(
            PollConfig::every(Duration::from_secs(1)),
            || async { Ok(status("processing", 0)) },
            |_: &GenerationStatus| {},
        ));

        handle.stop();
        let result = handle.join().await;
        assert!(matches!(result, Err(JobError::Cancelled)));
    }

    #[test]
    fn test_job_id_display_in_path() {
        // Path formatting relies on Display of JobId.
        let id = JobId::new("job-9");
        assert_eq!(format!("/knowledge-bases/jobs/{id}"), "/knowledge-bases/jobs/job-9");
    }
}
