//! Bounded polling of asynchronous server-side jobs.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::error::{PlatformError, Result};

/// Outcome of a single status check
#[derive(Debug)]
pub(crate) enum JobProgress<T> {
    Pending,
    Done(T),
}

#[derive(Debug)]
enum PollState<T> {
    Pending { attempts: u32 },
    Ready(T),
    Failed(PlatformError),
    TimedOut { attempts: u32 },
}

/// Polls a job until it finishes, fails, or the attempt bound is reached.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JobPoller {
    delay: Duration,
    max_attempts: u32,
}

impl JobPoller {
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Run `check` until it reports a terminal result.
    ///
    /// The first check happens immediately; later ones wait `delay`. The
    /// first error or completed value ends the loop.
    pub async fn run<T, F, Fut>(&self, job_id: &str, mut check: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<JobProgress<T>>>,
    {
        let mut state = PollState::Pending { attempts: 0 };

        loop {
            state = match state {
                PollState::Pending { attempts } if attempts >= self.max_attempts => {
                    PollState::TimedOut { attempts }
                }
                PollState::Pending { attempts } => {
                    if attempts > 0 {
                        sleep(self.delay).await;
                    }
                    match check().await {
                        Ok(JobProgress::Pending) => {
                            debug!("Job {} still pending (check {})", job_id, attempts + 1);
                            PollState::Pending {
                                attempts: attempts + 1,
                            }
                        }
                        Ok(JobProgress::Done(value)) => PollState::Ready(value),
                        Err(err) => PollState::Failed(err),
                    }
                }
                PollState::Ready(value) => {
                    debug!("Job {} completed", job_id);
                    return Ok(value);
                }
                PollState::Failed(err) => {
                    debug!("Job {} failed: {}", job_id, err);
                    return Err(err);
                }
                PollState::TimedOut { attempts } => {
                    return Err(PlatformError::timeout(format!(
                        "Job {} did not complete after {} status checks ({:?} apart)",
                        job_id, attempts, self.delay
                    )));
                }
            };
        }
    }
}
