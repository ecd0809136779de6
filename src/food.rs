use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::error::SimError;
use crate::grid::{Grid, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Position,
}

impl Food {
    /// Puts the first apple of a round on a free cell.
    pub fn place<R: Rng>(grid: &Grid, forbidden: &HashSet<Position>, attempts: usize, rng: &mut R) -> Result<Self, SimError> {
        let position = free_cell(grid, forbidden, attempts, rng)?;
        Ok(Food { position })
    }

    pub fn at(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the apple somewhere outside `forbidden`. On `BoardFull` the apple stays put.
    pub fn relocate<R: Rng>(&mut self, grid: &Grid, forbidden: &HashSet<Position>, attempts: usize, rng: &mut R) -> Result<Position, SimError> {
        self.position = free_cell(grid, forbidden, attempts, rng)?;
        Ok(self.position)
    }
}

fn free_cell<R: Rng>(grid: &Grid, forbidden: &HashSet<Position>, attempts: usize, rng: &mut R) -> Result<Position, SimError> {
    let free = grid.cell_count().saturating_sub(forbidden.iter().filter(|pos| grid.contains(**pos)).count());
    if free == 0 {
        return Err(SimError::BoardFull);
    }

    for _ in 0..attempts {
        let candidate = Position::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));
        if !forbidden.contains(&candidate) {
            return Ok(candidate);
        }
    }

    debug!(free, attempts, "random placement exhausted, scanning the board");
    grid.cells()
        .find(|pos| !forbidden.contains(pos))
        .ok_or(SimError::BoardFull)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn all_but(grid: &Grid, keep: Position) -> HashSet<Position> {
        grid.cells().filter(|pos| *pos != keep).collect()
    }

    #[test]
    fn lands_on_free_cell() {
        let grid = Grid::new(30, 20, 20);
        let mut rng = StdRng::seed_from_u64(7);
        let forbidden: HashSet<_> = (10..16).map(|x| Position::new(x, 10)).collect();

        for _ in 0..200 {
            let food = Food::place(&grid, &forbidden, 20, &mut rng).unwrap();
            assert!(grid.contains(food.position()));
            assert!(!forbidden.contains(&food.position()));
        }
    }

    #[test]
    fn scan_finds_the_last_hole() {
        let grid = Grid::new(30, 20, 20);
        let hole = Position::new(29, 19);
        let forbidden = all_but(&grid, hole);
        let mut rng = StdRng::seed_from_u64(1);

        let mut food = Food::place(&grid, &HashSet::new(), 20, &mut rng).unwrap();
        assert_eq!(food.relocate(&grid, &forbidden, 20, &mut rng), Ok(hole));
        assert_eq!(food.position(), hole);
    }

    #[test]
    fn scan_is_row_major() {
        let grid = Grid::new(4, 4, 20);
        let mut forbidden = all_but(&grid, Position::new(3, 1));
        forbidden.remove(&Position::new(0, 2));
        let mut rng = StdRng::seed_from_u64(3);

        // With no random probes the scan decides alone
        let food = Food::place(&grid, &forbidden, 0, &mut rng).unwrap();
        assert_eq!(food.position(), Position::new(3, 1));
    }

    #[test]
    fn full_board() {
        let grid = Grid::new(3, 3, 20);
        let forbidden: HashSet<_> = grid.cells().collect();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(Food::place(&grid, &forbidden, 20, &mut rng), Err(SimError::BoardFull));

        let mut food = Food::place(&grid, &HashSet::new(), 20, &mut rng).unwrap();
        let before = food.position();
        assert_eq!(food.relocate(&grid, &forbidden, 20, &mut rng), Err(SimError::BoardFull));
        assert_eq!(food.position(), before);
    }

    proptest! {
        #[test]
        fn never_inside_forbidden(
            seed in any::<u64>(),
            cells in prop::collection::hash_set((0..8i32, 0..6i32), 0..47),
        ) {
            let grid = Grid::new(8, 6, 20);
            let forbidden: HashSet<_> = cells.into_iter().map(|(x, y)| Position::new(x, y)).collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let food = Food::place(&grid, &forbidden, 20, &mut rng).unwrap();
            prop_assert!(grid.contains(food.position()));
            prop_assert!(!forbidden.contains(&food.position()));
        }
    }
}
