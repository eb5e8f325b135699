use tracing::{debug, info};

use crate::carver::{Carver, Maze};
use crate::config::Config;
use crate::grid::{Grid, Pos};
use crate::observer::CellObserver;
use crate::policy::BacktrackPolicy;
use crate::rng::Lfsr16;
use crate::{MAZE_HEIGHT, MAZE_WIDTH, START};

/// Owns the state that outlives a single generation: the random register
/// and the choices made at startup.
pub struct Session {
    rng: Lfsr16,
    policy: BacktrackPolicy,
    width: usize,
    height: usize,
    start: Pos,
}

impl Session {
    pub fn new(seed: u16, policy: BacktrackPolicy) -> Self {
        Self::with_dimensions(seed, policy, MAZE_WIDTH, MAZE_HEIGHT, START)
    }

    pub fn with_dimensions(
        seed: u16,
        policy: BacktrackPolicy,
        width: usize,
        height: usize,
        start: Pos,
    ) -> Self {
        assert!(
            start.x < width && start.y < height,
            "start {:?} outside {}x{} grid",
            start,
            width,
            height
        );
        Self {
            rng: Lfsr16::new(seed),
            policy,
            width,
            height,
            start,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.seed, config.policy)
    }

    pub fn policy(&self) -> BacktrackPolicy {
        self.policy
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets a grid and hands back a carver positioned on the start cell.
    /// The carver borrows the session's register until it is finished.
    pub fn begin(&mut self, observer: &mut impl CellObserver) -> Carver<&mut Lfsr16> {
        debug!(
            "resetting {}x{} grid, start {:?}, rng state {:#06x}",
            self.width,
            self.height,
            self.start,
            self.rng.state()
        );
        let mut grid = Grid::new(self.width, self.height);
        grid.reset(observer);
        Carver::new(&mut self.rng, grid, self.start, self.policy, observer)
    }

    /// Runs a whole generation without yielding.
    pub fn generate(&mut self, observer: &mut impl CellObserver) -> Maze {
        let policy = self.policy;
        let maze = self.begin(observer).finish(observer);
        log_finished(&maze, policy);
        maze
    }
}

pub fn log_finished(maze: &Maze, policy: BacktrackPolicy) {
    let stats = maze.stats();
    info!(
        "maze carved with {} policy: goal {:?} at depth {}, {} carved, {} backtracks, {} discarded draws",
        policy,
        maze.goal(),
        maze.goal_depth(),
        stats.carved,
        stats.backtracks,
        stats.discarded_draws
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GOAL_TILE, UNVISITED};
    use crate::observer::Screen;

    #[test]
    fn test_generate_full_size_maze() {
        let mut session = Session::new(1, BacktrackPolicy::Trackback);
        let mut screen = Screen::new(MAZE_WIDTH, MAZE_HEIGHT, crate::CELL_PIXELS);
        let maze = session.generate(&mut screen);

        assert_eq!(maze.grid().width(), 32);
        assert_eq!(maze.grid().height(), 24);
        assert_eq!(maze.grid().open_edges(), 32 * 24 - 1);
        assert_eq!(maze.start(), Pos::new(0, 11));
        assert_eq!(
            screen.tile(maze.goal()),
            GOAL_TILE | maze.grid().encoding(maze.goal())
        );
        assert_eq!(screen.sprite(), Some(START));
        for idx in 0..maze.grid().len() {
            let pos = maze.grid().pos_of(idx);
            if pos != maze.goal() {
                assert_eq!(screen.tile(pos), maze.grid().encoding(pos));
                assert_eq!(screen.tile(pos) & UNVISITED, 0);
            }
        }
    }

    #[test]
    fn test_rng_keeps_running_across_generations() {
        let mut session = Session::with_dimensions(1, BacktrackPolicy::Trackback, 6, 4, Pos::new(0, 0));
        let first = session.generate(&mut crate::NullObserver);
        let second = session.generate(&mut crate::NullObserver);
        assert_eq!(second.grid().open_edges(), 6 * 4 - 1);
        assert_ne!(first.grid(), second.grid());
    }
}
