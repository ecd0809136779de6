use std::collections::{HashSet, VecDeque};

use crate::error::SimError;
use crate::grid::{Direction::{self, *}, Grid, Position};

/// Outcome of a successful step. `old_tail` is `None` when the snake grew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub new_head: Position,
    pub old_tail: Option<Position>,
}

impl Step {
    pub fn grew(&self) -> bool {
        self.old_tail.is_none()
    }
}

/// Body segments head first, mirrored by `occupied` for constant-time lookups.
/// Both are only ever changed together inside `advance`.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    direction: Direction,
    pending: Direction,
}

impl Snake {
    /// Lays out `size` segments in a straight line trailing behind `head`.
    pub fn new(head: Position, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();

        let body = (0..size.max(1) as i32)
            .map(|i| Position::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake::from_body(body, direction)
    }

    /// Builds a snake from explicit segments, head first. Segments must be distinct and non-empty.
    pub fn from_body(body: Vec<Position>, direction: Direction) -> Self {
        let body: VecDeque<Position> = body.into();
        let occupied = body.iter().copied().collect();
        Snake { body, occupied, direction, pending: direction }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn occupied(&self) -> &HashSet<Position> {
        &self.occupied
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    /// Direction of the last step taken.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction the next step will take.
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Queues a turn for the next step. Reversing onto the neck is ignored.
    pub fn turn(&mut self, new_direction: Direction) {
        if !self.direction.is_opposite(new_direction) {
            self.pending = new_direction;
        }
    }

    /// Moves one cell in the pending direction, growing if the new head lands on `food`.
    ///
    /// Collisions are judged against the body as it will be after the step, so the cell
    /// the tail vacates is fair game. On collision the body is left untouched.
    pub fn advance(&mut self, grid: &Grid, food: Position) -> Result<Step, SimError> {
        self.direction = self.pending;

        let new_head = self.head().moved_in(self.direction);

        if !grid.contains(new_head) {
            return Err(SimError::WallCollision(new_head));
        }

        let grows = new_head == food;
        if self.occupied.contains(&new_head) && (grows || new_head != self.tail()) {
            return Err(SimError::SelfCollision(new_head));
        }

        let old_tail = if grows {
            None
        } else {
            let tail = self.body.pop_back();
            if let Some(tail) = tail {
                self.occupied.remove(&tail);
            }
            tail
        };

        self.body.push_front(new_head);
        self.occupied.insert(new_head);

        Ok(Step { new_head, old_tail })
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
