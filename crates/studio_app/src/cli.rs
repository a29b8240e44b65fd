use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(name = "studio", about = "Command-line client for the avatar face-swap service")]
#[command(group = ArgGroup::new("template_choice").required(true).args(["template", "template_file"]))]
pub struct Cli {
    /// Source image containing the face to transplant.
    pub source: PathBuf,

    /// Catalog template id (1-6).
    #[arg(long)]
    pub template: Option<String>,

    /// Custom template image used instead of a catalog entry.
    #[arg(long)]
    pub template_file: Option<PathBuf>,

    /// Base URL of the face-swap API.
    #[arg(long, default_value = "http://127.0.0.1:8000/api")]
    pub api: String,

    /// 1-based index of the face to take from the source image.
    #[arg(long, default_value_t = 1)]
    pub source_face: u32,

    /// 1-based index of the face to replace in the template.
    #[arg(long, default_value_t = 1)]
    pub target_face: u32,
}
