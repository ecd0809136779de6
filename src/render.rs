use anyhow::Result;
use crossterm::style::Color;
use rand::Rng;

use crate::game::{Game, GameState};
use crate::grid::{Grid, Position};
use crate::term::TermManager;
use crate::{Coords, TermInt};

/// Terminal columns per grid cell; two keeps cells roughly square.
const CELL_WIDTH: TermInt = 2;
const HUD_HEIGHT: TermInt = 1;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = '·';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Head,
    Body,
    Dead,
    Apple,
    Empty,
}

/// Glyph for the `index`-th body segment, head first.
pub fn segment_glyph<R: Rng>(game: &Game<R>, index: usize) -> Glyph {
    let crashed = matches!(game.state(), GameState::GameOver(e) if !e.is_win());

    if crashed {
        Glyph::Dead
    } else if index == 0 {
        Glyph::Head
    } else {
        Glyph::Body
    }
}

/// Glyph for a cell the snake does not occupy.
pub fn floor_glyph<R: Rng>(game: &Game<R>, pos: Position) -> Glyph {
    if pos == game.food().position() {
        Glyph::Apple
    } else {
        Glyph::Empty
    }
}

/// True if `pos` falls inside the box given as top-left corner and size.
pub fn covered(bounds: Option<(Coords, Coords)>, pos: Coords) -> bool {
    match bounds {
        Some(((left, top), (width, height))) => {
            pos.0 >= left && pos.0 < left + width && pos.1 >= top && pos.1 < top + height
        },
        None => false,
    }
}

/// Where the HUD and the bordered board sit on a terminal of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub hud: Coords,
    pub board: Coords,
    pub board_size: Coords,
}

impl Layout {
    /// Smallest terminal that fits the whole board, border and HUD included.
    pub fn min_size(grid: &Grid) -> Coords {
        let board = board_size(grid);
        (board.0, board.1 + HUD_HEIGHT)
    }

    /// Centers the board; `None` if the terminal is too small.
    pub fn fit(term_size: Coords, grid: &Grid) -> Option<Layout> {
        let (min_w, min_h) = Layout::min_size(grid);
        if term_size.0 < min_w || term_size.1 < min_h {
            return None;
        }

        let left = (term_size.0 - min_w) / 2;
        let top = (term_size.1 - min_h) / 2;
        Some(Layout {
            hud: (left, top),
            board: (left, top + HUD_HEIGHT),
            board_size: board_size(grid),
        })
    }

    /// Terminal coordinates of the left column of a grid cell.
    pub fn cell(&self, pos: Position) -> Coords {
        (
            self.board.0 + 1 + pos.x as TermInt * CELL_WIDTH,
            self.board.1 + 1 + pos.y as TermInt,
        )
    }
}

fn board_size(grid: &Grid) -> Coords {
    (grid.width() as TermInt * CELL_WIDTH + 2, grid.height() as TermInt + 2)
}

fn game_over_lines<R: Rng>(game: &Game<R>) -> Option<Vec<String>> {
    match game.state() {
        GameState::GameOver(reason) => {
            let title = if reason.is_win() {"You won!"} else {"GAME OVER"};
            Some(vec![
                title.to_string(),
                format!("Score: {}", game.score()),
                String::new(),
                "Press R to Restart or ESC to Quit".to_string(),
            ])
        },
        GameState::Running => None,
    }
}

fn paint_cell(term: &mut TermManager, banner: Option<(Coords, Coords)>, at: Coords, glyph: Glyph, head_char: char) -> Result<()> {
    let (left, right, color) = match glyph {
        Glyph::Head => (head_char, head_char, Color::Green),
        Glyph::Body => (SNAKE_BODY_CHAR, SNAKE_BODY_CHAR, Color::DarkGreen),
        Glyph::Dead => (DEAD_SNAKE_CHAR, DEAD_SNAKE_CHAR, Color::DarkRed),
        Glyph::Apple => (APPLE_CHAR, ' ', Color::Red),
        Glyph::Empty => (EMPTY_CHAR, ' ', Color::DarkGrey),
    };

    // Cells under the game-over banner are skipped so the banner is not repainted each frame
    if !covered(banner, at) {
        term.print_at(at, left, color)?;
    }
    let next = (at.0 + 1, at.1);
    if !covered(banner, next) {
        term.print_at(next, right, color)?;
    }
    Ok(())
}

/// Paints one full frame: score line, board and, once the round is over, the banner.
pub fn draw<R: Rng>(term: &mut TermManager, game: &Game<R>) -> Result<()> {
    if term.take_resized() {
        term.clear()?;
    }

    let layout = match Layout::fit(term.get_terminal_size(), game.grid()) {
        Some(layout) => layout,
        None => {
            let (w, h) = Layout::min_size(game.grid());
            term.show_message(&["Terminal too small", &*format!("Need {}x{}", w, h)], Color::Yellow)?;
            return term.flush();
        },
    };

    let lines = game_over_lines(game);
    let lines: Option<Vec<&str>> = lines.as_ref().map(|lines| lines.iter().map(|l| l.as_str()).collect());
    let banner = lines.as_ref().map(|lines| term.message_bounds(lines));

    let hud = format!("Score: {:<6}", game.score());
    term.print_str_at(layout.hud, &hud, Color::White)?;
    term.draw_borders(layout.board, layout.board_size, Color::Grey)?;

    let snake = game.snake();
    let head_char = snake.head_char();

    for pos in game.grid().cells().filter(|pos| !snake.contains(*pos)) {
        paint_cell(term, banner, layout.cell(pos), floor_glyph(game, pos), head_char)?;
    }

    for (i, pos) in snake.body().enumerate() {
        paint_cell(term, banner, layout.cell(*pos), segment_glyph(game, i), head_char)?;
    }

    if let Some(lines) = &lines {
        term.show_message(lines, Color::White)?;
    }

    term.flush()
}
