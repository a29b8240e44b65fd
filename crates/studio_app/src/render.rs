use studio_core::{AppViewModel, EntryKind, LifecyclePhase};

/// Print the current view model to the terminal.
///
/// The renderer is dumb on purpose. Everything it shows comes from the view
/// model, so the same state always produces the same output.
pub fn render(view: &AppViewModel) {
    println!();

    if let Some(warning) = &view.backend_warning {
        println!("!! {warning}");
    }

    if let Some(notice) = &view.notice {
        println!("{}", notice.text);
    }

    match &view.phase {
        LifecyclePhase::Idle => println!("ready"),
        LifecyclePhase::Submitting => println!("uploading..."),
        LifecyclePhase::Polling {
            progress, message, ..
        } => {
            println!("[{}] {}% {}", bar(*progress), progress, message);
        }
        LifecyclePhase::Completed {
            result_url,
            template_name,
        } => {
            println!("done: {result_url}");
            if let Some(name) = template_name {
                println!("template: {name}");
            }
        }
        LifecyclePhase::Failed { message } => println!("failed: {message}"),
    }

    if !view.status_rows.is_empty() {
        println!("recent attempts:");
        for row in &view.status_rows {
            println!(
                "  [{}] {} {} - {}",
                row.created_at.format("%H:%M:%S"),
                symbol(row.kind),
                row.title,
                row.description
            );
        }
    }
}

fn bar(progress: u8) -> String {
    const SLOTS: usize = 20;
    let filled = (progress as usize * SLOTS) / 100;
    let mut out = String::with_capacity(SLOTS);
    for slot in 0..SLOTS {
        out.push(if slot < filled { '#' } else { '-' });
    }
    out
}

fn symbol(kind: EntryKind) -> char {
    match kind {
        EntryKind::Processing => '…',
        EntryKind::Completed => '✓',
        EntryKind::Error => '✗',
    }
}
