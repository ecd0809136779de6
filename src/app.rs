use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::config::GameConfig;
use crate::game::{Control, Game};
use crate::input::key_action;
use crate::render::{self, Layout};
use crate::term::TermManager;

/// Steps owed after a stall are dropped past this many.
const MAX_CATCH_UP_STEPS: u32 = 3;

/// Frame-time accumulator that turns wall-clock time into whole simulation steps.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    accumulated: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval, accumulated: Duration::from_millis(0) }
    }

    /// Adds `elapsed` and returns how many steps are now due.
    pub fn add(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;

        let mut steps = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            steps += 1;
            if steps == MAX_CATCH_UP_STEPS {
                self.reset();
                break;
            }
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::from_millis(0);
    }
}

/// Runs the game until the player quits. The terminal is restored however this returns.
pub fn run(config: GameConfig) -> Result<()> {
    let mut term = TermManager::new()?;

    let (width, height) = term.get_terminal_size();
    let (min_w, min_h) = Layout::min_size(&config.grid);
    if width < min_w || height < min_h {
        bail!("terminal is {}x{}, the board needs at least {}x{}", width, height, min_w, min_h);
    }

    term.setup().context("Failed to set up the terminal")?;
    info!(
        width = config.grid.width(),
        height = config.grid.height(),
        cell_size = config.grid.cell_size(),
        "starting game"
    );

    let mut game = Game::new(config.clone(), rand::thread_rng());
    let mut ticker = Ticker::new(config.step_interval);
    let mut last_frame = Instant::now();

    render::draw(&mut term, &game)?;

    loop {
        for key_ev in term.read_key_events_queue(config.frame_interval)? {
            let was_over = !game.is_running();
            if game.handle(key_action(&key_ev)) == Control::Quit {
                info!(score = game.score(), "quitting");
                return Ok(());
            }
            if was_over && game.is_running() {
                // Full step interval before the fresh snake moves
                ticker.reset();
            }
        }

        let now = Instant::now();
        for _ in 0..ticker.add(now - last_frame) {
            game.tick();
        }
        last_frame = now;

        render::draw(&mut term, &game)?;
    }
}
