use std::sync::mpsc;
use std::thread;

use client_logging::{client_info, client_warn};
use studio_client::{
    ApiSetupError, ApiSettings, ClientCommander, ClientEvent, ClientHandle, ImagePayload,
    JobRequest, TemplateSelector,
};
use studio_core::{Effect, Msg, SelectedImage, SwapRequest, TemplateChoice};

/// Maps core effects onto the transport and pumps transport events back as
/// messages.
pub struct EffectRunner {
    commander: ClientCommander,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, ApiSetupError> {
        let handle = ClientHandle::new(settings)?;
        let commander = handle.commander();
        spawn_event_pump(handle, msg_tx);
        Ok(Self { commander })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckHealth => {
                    client_info!("CheckHealth");
                    self.commander.check_health();
                }
                Effect::SubmitJob { attempt, request } => {
                    client_info!(
                        "SubmitJob attempt={} source={} bytes={}",
                        attempt,
                        request.source.file_name,
                        request.source.bytes.len()
                    );
                    self.commander.submit(attempt, map_request(request));
                }
            }
        }
    }
}

fn spawn_event_pump(handle: ClientHandle, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = handle.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_request(request: SwapRequest) -> JobRequest {
    JobRequest {
        source: map_image(request.source),
        template: match request.template {
            TemplateChoice::Catalog { id } => TemplateSelector::Catalog { id },
            TemplateChoice::Custom(image) => TemplateSelector::Custom(map_image(image)),
        },
        source_face_index: request.source_face_index,
        target_face_index: request.target_face_index,
    }
}

fn map_image(image: SelectedImage) -> ImagePayload {
    ImagePayload {
        file_name: image.file_name,
        mime: image.mime,
        bytes: image.bytes,
    }
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::HealthChecked { result } => match result {
            Ok(()) => Msg::HealthReport {
                healthy: true,
                message: String::new(),
            },
            Err(err) => {
                client_warn!("health check failed: {err}");
                Msg::HealthReport {
                    healthy: false,
                    message: err.to_string(),
                }
            }
        },
        ClientEvent::Submitted { attempt, task_id } => Msg::SubmitAccepted {
            attempt,
            task_id: task_id.to_string(),
        },
        ClientEvent::Snapshot { attempt, snapshot } => Msg::SnapshotArrived {
            attempt,
            progress: snapshot.progress,
            message: snapshot.message,
        },
        ClientEvent::Finished { attempt, result } => match result {
            Ok(result) => Msg::AttemptCompleted {
                attempt,
                result_url: result.result_url,
                template_name: result.template_name,
            },
            Err(failure) => Msg::AttemptFailed {
                attempt,
                message: failure.to_string(),
            },
        },
    }
}
