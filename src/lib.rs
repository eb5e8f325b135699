//! Carves a perfect maze over a fixed 32x24 grid with a randomized
//! depth-first backtracker, then lets a player walk its passages.
//!
//! The carver and navigator report every visible change through
//! [`CellObserver`]; the `maze` binary renders those changes in a terminal.

pub mod carver;
pub mod config;
pub mod error;
pub mod grid;
pub mod history;
pub mod navigation;
pub mod observer;
pub mod policy;
pub mod rng;
pub mod session;
pub mod terminal;

pub use carver::{CarveStats, CarveStep, Carver, Maze};
pub use config::Config;
pub use error::{ConfigError, MazeError};
pub use grid::{Dir, Grid, Pos};
pub use navigation::{Frame, Gameplay, InputSample, Navigator};
pub use observer::{CellObserver, NullObserver, Screen};
pub use policy::BacktrackPolicy;
pub use rng::{Lfsr16, RandomSource};
pub use session::Session;

pub const MAZE_WIDTH: usize = 32;
pub const MAZE_HEIGHT: usize = 24;
/// Display size of one cell, used for sprite positions.
pub const CELL_PIXELS: usize = 8;
pub const START: Pos = Pos::new(0, 11);
