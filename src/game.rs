use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::SimError;
use crate::food::Food;
use crate::grid::{Direction, Grid};
use crate::input::KeyAction;
use crate::snake::{Snake, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver(SimError),
}

/// What the outer loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// One round of Snake plus everything needed to start the next.
pub struct Game<R> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    food: Food,
    score: u32,
    state: GameState,
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let snake = Snake::new(config.grid.center(), config.initial_length, config.initial_direction);
        let food = Food::at(snake.head());
        let mut game = Game { config, rng, snake, food, score: 0, state: GameState::Running };
        game.reset();
        game
    }

    pub fn grid(&self) -> &Grid {
        &self.config.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn handle(&mut self, action: KeyAction) -> Control {
        match action {
            KeyAction::Turn(dir) => self.turn(dir),
            KeyAction::Restart => {
                self.restart();
            },
            KeyAction::Quit => return Control::Quit,
            KeyAction::None => {},
        }
        Control::Continue
    }

    /// Takes effect on the next tick.
    pub fn turn(&mut self, dir: Direction) {
        if self.is_running() {
            self.snake.turn(dir);
            debug!(
                current = ?self.snake.direction(),
                requested = ?dir,
                pending = ?self.snake.pending_direction(),
                "turn"
            );
        }
    }

    /// Starts a fresh round, but only once the current one is over.
    pub fn restart(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        info!(score = self.score, "restarting");
        self.reset();
        true
    }

    /// Advances the simulation by one step. Does nothing after game over.
    pub fn tick(&mut self) -> Option<Step> {
        if !self.is_running() {
            return None;
        }

        let step = match self.snake.advance(&self.config.grid, self.food.position()) {
            Ok(step) => step,
            Err(e) => {
                self.end(e);
                return None;
            },
        };

        if step.grew() {
            self.score += 1;
            debug!(head = %step.new_head, score = self.score, "ate");
            let relocated = self.food.relocate(&self.config.grid, self.snake.occupied(), self.config.food_attempts, &mut self.rng);
            if let Err(e) = relocated {
                self.end(e);
            }
        }

        Some(step)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn reset(&mut self) {
        let grid = self.config.grid;
        self.snake = Snake::new(grid.center(), self.config.initial_length, self.config.initial_direction);
        self.score = 0;
        self.state = GameState::Running;

        match Food::place(&grid, self.snake.occupied(), self.config.food_attempts, &mut self.rng) {
            Ok(food) => self.food = food,
            Err(e) => {
                self.food = Food::at(self.snake.head());
                self.end(e);
            },
        }
    }

    fn end(&mut self, reason: SimError) {
        info!(score = self.score, length = self.snake.len(), %reason, "game over");
        self.state = GameState::GameOver(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Direction::*, Position};
    use rand::{rngs::StdRng, SeedableRng};

    fn game() -> Game<StdRng> {
        Game::new(GameConfig::default(), StdRng::seed_from_u64(42))
    }

    /// Swaps in a hand-made snake and keeps the apple out of the way unless told otherwise.
    fn with_snake(game: &mut Game<StdRng>, snake: Snake, food: Option<Position>) {
        game.snake = snake;
        game.food = Food::at(food.unwrap_or_else(|| Position::new(0, 0)));
    }

    fn body(game: &Game<StdRng>) -> Vec<Position> {
        game.snake().body().copied().collect()
    }

    #[test]
    fn initial_state() {
        let game = game();
        assert!(game.is_running());
        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.snake().head(), Position::new(15, 10));
        assert_eq!(game.snake().direction(), Right);
        assert!(!game.snake().contains(game.food().position()));
        assert!(game.grid().contains(game.food().position()));
    }

    #[test]
    fn three_ticks_right() {
        let mut game = game();
        with_snake(&mut game, Snake::new(Position::new(15, 10), 3, Right), None);

        for _ in 0..3 {
            assert!(game.tick().is_some());
        }

        assert!(game.is_running());
        assert_eq!(game.snake().head(), Position::new(18, 10));
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn right_edge_is_a_wall() {
        let mut game = game();
        with_snake(&mut game, Snake::new(Position::new(29, 10), 3, Right), None);

        assert_eq!(game.tick(), None);
        assert_eq!(game.state(), GameState::GameOver(SimError::WallCollision(Position::new(30, 10))));
        assert_eq!(game.snake().head(), Position::new(29, 10));
    }

    #[test]
    fn curled_snake_bites_its_neck() {
        // Head at (5,5) moving Left with the body looped above it; turning Up bites (5,4)
        let mut game = game();
        let curled = vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 4),
            Position::new(5, 4),
            Position::new(4, 4),
        ];
        with_snake(&mut game, Snake::from_body(curled, Left), None);

        game.turn(Up);
        assert_eq!(game.tick(), None);
        assert_eq!(game.state(), GameState::GameOver(SimError::SelfCollision(Position::new(5, 4))));
        assert_eq!(game.snake().len(), 5);
    }

    #[test]
    fn eating_scores_and_moves_food() {
        let mut game = game();
        with_snake(&mut game, Snake::new(Position::new(15, 10), 3, Right), Some(Position::new(16, 10)));

        let step = game.tick().unwrap();

        assert!(step.grew());
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake().len(), 4);
        assert!(game.is_running());
        assert!(!game.snake().contains(game.food().position()));
        assert!(game.grid().contains(game.food().position()));
    }

    #[test]
    fn filling_the_board_wins() {
        let config = GameConfig { initial_length: 2, ..GameConfig::with_grid(Grid::new(3, 1, 20)) };
        let mut game = Game::new(config, StdRng::seed_from_u64(5));
        // Center of a 3x1 board is (1,0); the snake covers (1,0),(0,0) so food must be at (2,0)
        assert_eq!(game.food().position(), Position::new(2, 0));

        assert!(game.tick().unwrap().grew());
        assert_eq!(game.score(), 1);
        assert_eq!(game.state(), GameState::GameOver(SimError::BoardFull));
        assert!(SimError::BoardFull.is_win());
    }

    #[test]
    fn no_movement_after_game_over() {
        let mut game = game();
        with_snake(&mut game, Snake::new(Position::new(29, 10), 3, Right), None);
        game.tick();
        let frozen = body(&game);

        game.turn(Up);
        assert_eq!(game.tick(), None);
        assert_eq!(body(&game), frozen);
    }

    #[test]
    fn restart_only_after_game_over() {
        let mut game = game();
        game.tick();
        let moved = body(&game);

        assert!(!game.restart());
        assert_eq!(body(&game), moved);
    }

    #[test]
    fn restart_resets_everything() {
        let fresh = game();
        let mut game = game();
        with_snake(&mut game, Snake::new(Position::new(28, 3), 3, Right), Some(Position::new(29, 3)));
        game.turn(Up);
        game.turn(Right);
        game.tick();
        assert_eq!(game.score(), 1);
        game.tick();
        assert!(!game.is_running());

        assert_eq!(game.handle(KeyAction::Restart), Control::Continue);

        assert!(game.is_running());
        assert_eq!(game.score(), 0);
        assert_eq!(body(&game), body(&fresh));
        assert_eq!(game.snake().direction(), fresh.snake().direction());
        assert_eq!(game.snake().pending_direction(), Right);
        assert!(!game.snake().contains(game.food().position()));
    }

    #[test]
    fn input_routing() {
        let mut game = game();
        assert_eq!(game.handle(KeyAction::Turn(Down)), Control::Continue);
        assert_eq!(game.snake().pending_direction(), Down);
        assert_eq!(game.handle(KeyAction::Turn(Left)), Control::Continue);
        assert_eq!(game.snake().pending_direction(), Down);
        assert_eq!(game.handle(KeyAction::None), Control::Continue);
        assert_eq!(game.handle(KeyAction::Quit), Control::Quit);
    }
}
