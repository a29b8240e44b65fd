use crate::{AppState, Effect, Msg, Notice, TemplateChoice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::CheckHealth],
        Msg::HealthReport { healthy, message } => {
            if healthy {
                state.set_backend_warning(None);
            } else {
                state.set_backend_warning(Some(message));
            }
            Vec::new()
        }
        Msg::SourceSelected(image) => {
            match state.validate_upload(&image) {
                Ok(()) => {
                    state.set_notice(Notice::info(format!("image ready: {}", image.file_name)));
                    state.set_source(Some(image));
                }
                Err(err) => state.set_notice(Notice::error(err.to_string())),
            }
            Vec::new()
        }
        Msg::SourceCleared => {
            state.set_source(None);
            state.set_notice(Notice::info("image removed"));
            Vec::new()
        }
        Msg::TemplatePicked { id } => {
            match crate::template_name(&id) {
                Some(name) => {
                    state.set_notice(Notice::info(format!("template selected: {name}")));
                    state.set_template(Some(TemplateChoice::Catalog { id }));
                }
                None => state.set_notice(Notice::error(format!("unknown template id: {id}"))),
            }
            Vec::new()
        }
        Msg::CustomTemplateSelected(image) => {
            match state.validate_upload(&image) {
                Ok(()) => {
                    state.set_notice(Notice::info("custom template ready"));
                    state.set_template(Some(TemplateChoice::Custom(image)));
                }
                Err(err) => state.set_notice(Notice::error(err.to_string())),
            }
            Vec::new()
        }
        Msg::TemplateCleared => {
            state.set_template(None);
            state.set_notice(Notice::info("template removed"));
            Vec::new()
        }
        Msg::FaceIndicesChanged { source, target } => {
            state.set_face_indices(source, target);
            Vec::new()
        }
        Msg::ProcessClicked => {
            // The guard must hold before any asynchronous work starts: a
            // second click while an attempt is in flight is a no-op.
            if !state.can_process() {
                return (state, Vec::new());
            }
            match state.begin_attempt() {
                Some((attempt, request)) => vec![Effect::SubmitJob { attempt, request }],
                None => Vec::new(),
            }
        }
        Msg::SubmitAccepted { attempt, task_id } => {
            state.apply_accepted(attempt, task_id);
            Vec::new()
        }
        Msg::SnapshotArrived {
            attempt,
            progress,
            message,
        } => {
            state.apply_snapshot(attempt, progress, message);
            Vec::new()
        }
        Msg::AttemptCompleted {
            attempt,
            result_url,
            template_name,
        } => {
            state.apply_completed(attempt, result_url, template_name);
            Vec::new()
        }
        Msg::AttemptFailed { attempt, message } => {
            state.apply_failed(attempt, message);
            Vec::new()
        }
        Msg::ResetRequested => {
            state.reset();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
