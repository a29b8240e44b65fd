use std::sync::{mpsc, Arc};
use std::thread;

use crate::api::{ApiSettings, HttpSwapApi, SwapApi};
use crate::watch::{poll_until_terminal, ChannelStatusSink};
use crate::{ApiSetupError, AttemptId, ClientEvent, JobFailure, JobRequest};

enum ClientCommand {
    CheckHealth,
    Submit {
        attempt: AttemptId,
        request: JobRequest,
    },
}

/// Clonable command side of a [`ClientHandle`].
#[derive(Clone)]
pub struct ClientCommander {
    cmd_tx: mpsc::Sender<ClientCommand>,
}

impl ClientCommander {
    pub fn check_health(&self) {
        let _ = self.cmd_tx.send(ClientCommand::CheckHealth);
    }

    pub fn submit(&self, attempt: AttemptId, request: JobRequest) {
        let _ = self.cmd_tx.send(ClientCommand::Submit { attempt, request });
    }
}

/// Runs transport commands on a dedicated runtime thread and reports
/// [`ClientEvent`]s back over a channel.
pub struct ClientHandle {
    commander: ClientCommander,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiSetupError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let api = Arc::new(HttpSwapApi::new(settings.clone())?);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                let settings = settings.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), &settings, command, event_tx).await;
                });
            }
        });

        Ok(Self {
            commander: ClientCommander { cmd_tx },
            event_rx,
        })
    }

    pub fn commander(&self) -> ClientCommander {
        self.commander.clone()
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks for the next event; `None` once the command thread is gone.
    pub fn recv(&self) -> Option<ClientEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    api: &dyn SwapApi,
    settings: &ApiSettings,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::CheckHealth => {
            let result = api.health().await;
            let _ = event_tx.send(ClientEvent::HealthChecked { result });
        }
        ClientCommand::Submit { attempt, request } => {
            let task_id = match api.submit(&request).await {
                Ok(task_id) => task_id,
                Err(err) => {
                    let _ = event_tx.send(ClientEvent::Finished {
                        attempt,
                        result: Err(JobFailure::Submit(err)),
                    });
                    return;
                }
            };
            let _ = event_tx.send(ClientEvent::Submitted {
                attempt,
                task_id: task_id.clone(),
            });

            let sink = ChannelStatusSink::new(event_tx.clone());
            let result = poll_until_terminal(
                api,
                attempt,
                &task_id,
                settings.poll_interval,
                settings.max_poll_time,
                &sink,
            )
            .await;
            let _ = event_tx.send(ClientEvent::Finished { attempt, result });
        }
    }
}
