use std::path::Path;
use std::sync::mpsc;

use anyhow::{bail, Context};
use clap::Parser;
use client_logging::client_info;
use studio_client::ApiSettings;
use studio_core::{guess_mime, update, AppState, LifecyclePhase, Msg, SelectedImage};

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::logging::{self, LogDestination};
use crate::render;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(LogDestination::File);
    client_info!("studio starting, api={}", cli.api);

    let source = load_image(&cli.source)?;
    let template_msg = match (&cli.template, &cli.template_file) {
        (Some(id), _) => Msg::TemplatePicked { id: id.clone() },
        (None, Some(path)) => Msg::CustomTemplateSelected(load_image(path)?),
        (None, None) => unreachable!("clap enforces the template group"),
    };

    let (msg_tx, msg_rx) = mpsc::channel();
    let settings = ApiSettings {
        base_url: cli.api.clone(),
        ..ApiSettings::default()
    };
    let runner = EffectRunner::new(settings, msg_tx)?;

    let mut state = AppState::new();
    let seed = [
        Msg::Started,
        Msg::SourceSelected(source),
        template_msg,
        Msg::FaceIndicesChanged {
            source: cli.source_face.saturating_sub(1),
            target: cli.target_face.saturating_sub(1),
        },
        Msg::ProcessClicked,
    ];
    for msg in seed {
        state = dispatch(state, msg, &runner);
    }

    if !state.view().in_flight {
        let reason = state
            .view()
            .notice
            .map(|notice| notice.text)
            .unwrap_or_else(|| "unable to start processing".to_string());
        bail!(reason);
    }

    while let Ok(msg) = msg_rx.recv() {
        state = dispatch(state, msg, &runner);
        match &state.view().phase {
            LifecyclePhase::Completed { .. } => return Ok(()),
            LifecyclePhase::Failed { message } => bail!("face swap failed: {message}"),
            _ => {}
        }
    }

    bail!("transport channel closed before the job finished")
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        render::render(&state.view());
    }
    state
}

fn load_image(path: &Path) -> anyhow::Result<SelectedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = guess_mime(&file_name)
        .with_context(|| format!("unrecognized image type: {file_name}"))?;
    Ok(SelectedImage {
        mime: mime.to_string(),
        file_name,
        bytes,
    })
}
