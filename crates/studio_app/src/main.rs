mod app;
mod cli;
mod effects;
mod logging;
mod render;

fn main() -> anyhow::Result<()> {
    app::run()
}
