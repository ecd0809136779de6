use crate::{TermInt, Coords};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style::{self, Color}, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use tracing::{debug, warn};

const TITLE: &str = "Snake";

type Cell = (char, Color);
const BLANK: Cell = (' ', Color::Reset);

/// Owns the terminal while the game runs. Dropping it puts the terminal back the way it was.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    active: bool,
    resized: bool,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, active: false, resized: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        // Flag first so a half-finished setup still gets undone on drop
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(TITLE))
            .context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        debug!("terminal restored");
        Ok(())
    }

    /// Waits up to `timeout` for input, then drains whatever else is already queued.
    pub fn read_key_events_queue(&mut self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Error polling events")? {
            match read().context("Error reading event")? {
                Event::Key(ev) => events.push(ev),
                Event::Resize(width, height) => self.resize(width, height),
                _ => {}
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// True once after the terminal changed size. The caller should `clear` before redrawing.
    pub fn take_resized(&mut self) -> bool {
        std::mem::replace(&mut self.resized, false)
    }

    /// Queues `ch` unless that exact cell is already on screen.
    pub fn print_at(&mut self, pos: Coords, ch: char, color: Color) -> Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }

        let idx = self.width as usize * pos.1 as usize + pos.0 as usize;
        if self.screen[idx] == (ch, color) {
            return Ok(());
        }

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(color), style::Print(ch))?;
        self.screen[idx] = (ch, color);
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: Coords, s: &str, color: Color) -> Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch, color)?;
        }
        Ok(())
    }

    pub fn draw_borders(&mut self, top_left: Coords, size: Coords, color: Color) -> Result<()> {
        let (width, height) = size;
        let end_x = top_left.0 + width - 1;
        let end_y = top_left.1 + height - 1;

        for x in top_left.0..=end_x {
            let ch = if x == top_left.0 || x == end_x {'+'} else {'-'};
            self.print_at((x, top_left.1), ch, color)?;
            self.print_at((x, end_y), ch, color)?;
        }

        for y in top_left.1 + 1..end_y {
            self.print_at((top_left.0, y), '|', color)?;
            self.print_at((end_x, y), '|', color)?;
        }

        Ok(())
    }

    /// Top-left corner and size of the box `show_message` would draw for `lines`.
    pub fn message_bounds(&self, lines: &[&str]) -> (Coords, Coords) {
        message_bounds((self.width, self.height), lines)
    }

    /// Draws a padded box of centered lines in the middle of the screen.
    pub fn show_message(&mut self, lines: &[&str], color: Color) -> Result<()> {
        let (top_left, (msg_width, msg_height)) = self.message_bounds(lines);

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, *y), ' ', color)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            self.print_str_at((top_left.0, y), &padded_line, color)?;
        }

        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn resize(&mut self, width: TermInt, height: TermInt) {
        debug!(width, height, "terminal resized");
        self.width = width;
        self.height = height;
        self.screen = vec![BLANK; width as usize * height as usize];
        self.resized = true;
    }
}

fn message_bounds(term_size: Coords, lines: &[&str]) -> (Coords, Coords) {
    let msg_height = (lines.len() + 2) as TermInt;
    let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 4) as TermInt;
    let center = (term_size.0 / 2, term_size.1 / 2);
    let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));
    (top_left, (msg_width, msg_height))
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("failed to restore terminal: {:#}", e);
        }
    }
}
