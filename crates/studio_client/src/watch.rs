use std::sync::mpsc;
use std::time::Duration;

use tokio::time::Instant;

use crate::{AttemptId, ClientEvent, JobFailure, JobState, SwapApi, SwapResult, TaskId};

/// Receives lifecycle events as they happen.
pub trait StatusSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelStatusSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelStatusSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelStatusSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Polls the job at `poll_interval` until a terminal status arrives or
/// `max_poll_time` has elapsed since entry, emitting every snapshot through
/// the sink.
///
/// The deadline is checked before each request, so a snapshot already in
/// flight when it passes may still terminate the job normally.
pub async fn poll_until_terminal(
    api: &dyn SwapApi,
    attempt: AttemptId,
    task_id: &TaskId,
    poll_interval: Duration,
    max_poll_time: Duration,
    sink: &dyn StatusSink,
) -> Result<SwapResult, JobFailure> {
    let deadline = Instant::now() + max_poll_time;
    loop {
        if Instant::now() >= deadline {
            return Err(JobFailure::TimedOut);
        }

        let snapshot = api.poll(task_id).await.map_err(JobFailure::StatusQuery)?;
        sink.emit(ClientEvent::Snapshot {
            attempt,
            snapshot: snapshot.clone(),
        });

        match snapshot.state {
            JobState::Completed => {
                return match snapshot.result_url {
                    Some(result_url) if !result_url.is_empty() => Ok(SwapResult {
                        result_url,
                        template_name: snapshot.template_name,
                    }),
                    // Completion without a result reference is a
                    // service-contract violation.
                    _ => Err(JobFailure::MissingResult),
                };
            }
            JobState::Failed => {
                return Err(JobFailure::Reported(snapshot.error.unwrap_or_else(
                    || "the job failed during processing".to_string(),
                )));
            }
            JobState::Processing => tokio::time::sleep(poll_interval).await,
        }
    }
}
