mod app;
mod config;
mod error;
mod food;
mod game;
mod grid;
mod input;
mod logging;
mod render;
mod snake;
mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> anyhow::Result<()> {
    logging::init()?;

    // The terminal is handed back before any error reaches the caller
    app::run(config::GameConfig::default())
}
