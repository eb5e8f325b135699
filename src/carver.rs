//! Randomized depth-first maze carver.
//!
//! The carver alternates between two states:
//! - carving: the cursor has an unvisited neighbor; draw directions until
//!   one lands on it, knock the shared wall down, move there and push it
//!   onto the history;
//! - backtracking: no unvisited neighbor remains; the backtrack policy
//!   removes a history entry and the cursor jumps to it.
//!
//! It halts when backtracking finds the history empty. Every cell then
//! belongs to one spanning tree rooted at the start cell.

use crate::grid::{Dir, Grid, Pos, GOAL_TILE};
use crate::history::History;
use crate::observer::CellObserver;
use crate::policy::BacktrackPolicy;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStep {
    Carved { from: Pos, to: Pos },
    Backtracked(Pos),
    Finished,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveStats {
    pub carved: usize,
    pub backtracks: usize,
    pub discarded_draws: usize,
}

pub struct Carver<R: RandomSource> {
    rng: R,
    grid: Grid,
    history: History,
    cursor: Pos,
    start: Pos,
    policy: BacktrackPolicy,
    stats: CarveStats,
    finished: bool,
}

impl<R: RandomSource> Carver<R> {
    /// Starts carving from `start` on a freshly reset grid. The start cell is
    /// visited immediately and sits at history depth 1.
    pub fn new(
        rng: R,
        mut grid: Grid,
        start: Pos,
        policy: BacktrackPolicy,
        observer: &mut impl CellObserver,
    ) -> Self {
        assert!(grid.contains(start), "start {:?} lies outside the grid", start);
        debug_assert_eq!(grid.unvisited_count(), grid.len(), "grid was not reset");

        let mut history = History::with_capacity(grid.len());
        grid.mark_visited(start);
        observer.on_cell_encoding_changed(start, grid.encoding(start));
        history.push(grid.index_of(start) as u16);
        observer.on_cursor_advanced(start);

        Self {
            rng,
            grid,
            history,
            cursor: start,
            start,
            policy,
            stats: CarveStats::default(),
            finished: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn max_depth(&self) -> usize {
        self.history.max_depth()
    }

    pub fn stats(&self) -> CarveStats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Performs one transition of the state machine.
    pub fn step(&mut self, observer: &mut impl CellObserver) -> CarveStep {
        if self.finished {
            return CarveStep::Finished;
        }

        if !self.grid.has_unvisited_neighbor(self.cursor) {
            return match self.policy.take_next(&mut self.history, &mut self.rng) {
                Some(idx) => {
                    self.cursor = self.grid.pos_of(idx as usize);
                    self.stats.backtracks += 1;
                    CarveStep::Backtracked(self.cursor)
                }
                None => {
                    self.finished = true;
                    CarveStep::Finished
                }
            };
        }

        // At least one direction is valid, so this loop terminates.
        let (dir, next) = loop {
            let dir = Dir::from_draw(self.rng.next_u16());
            match self.grid.neighbor(self.cursor, dir) {
                Some(next) if self.grid.is_unvisited(next) => break (dir, next),
                _ => self.stats.discarded_draws += 1,
            }
        };

        let from = self.cursor;
        let owner = self.grid.clear_wall(from, dir);
        observer.on_cell_encoding_changed(owner, self.grid.encoding(owner));

        self.cursor = next;
        self.grid.mark_visited(next);
        observer.on_cell_encoding_changed(next, self.grid.encoding(next));
        self.history.push(self.grid.index_of(next) as u16);
        self.stats.carved += 1;
        observer.on_cursor_advanced(next);

        CarveStep::Carved { from, to: next }
    }

    /// Carves whatever is left, marks the goal tile (goal bit plus the cell's
    /// walls) and returns the cursor to the start.
    pub fn finish(mut self, observer: &mut impl CellObserver) -> Maze {
        while self.step(observer) != CarveStep::Finished {}

        let goal = self
            .history
            .goal()
            .map_or(self.start, |idx| self.grid.pos_of(idx as usize));
        observer.on_cell_encoding_changed(goal, GOAL_TILE | self.grid.encoding(goal));
        observer.on_cursor_advanced(self.start);

        Maze {
            grid: self.grid,
            start: self.start,
            goal,
            goal_depth: self.history.max_depth(),
            stats: self.stats,
        }
    }
}

/// A finished maze. The grid is read-only from here on.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: Grid,
    start: Pos,
    goal: Pos,
    goal_depth: usize,
    stats: CarveStats,
}

impl Maze {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn goal_index(&self) -> usize {
        self.grid.index_of(self.goal)
    }

    /// History depth at which the goal was pushed.
    pub fn goal_depth(&self) -> usize {
        self.goal_depth
    }

    pub fn stats(&self) -> CarveStats {
        self.stats
    }
}
