use tracing::{debug, info};

use crate::carver::Maze;
use crate::grid::{Dir, Pos};
use crate::observer::CellObserver;

/// Keys seen during one gameplay frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSample {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub pause: bool,
    pub quit: bool,
}

impl InputSample {
    pub fn press(&mut self, dir: Dir) {
        match dir {
            Dir::Up => self.up = true,
            Dir::Down => self.down = true,
            Dir::Left => self.left = true,
            Dir::Right => self.right = true,
        }
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Moves the player through a finished maze one cell at a time.
pub struct Navigator {
    maze: Maze,
    cursor: Pos,
    moves: usize,
}

impl Navigator {
    pub fn new(maze: Maze) -> Self {
        let cursor = maze.start();
        Self {
            maze,
            cursor,
            moves: 0,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn at_goal(&self) -> bool {
        self.cursor == self.maze.goal()
    }

    /// Steps one cell towards `dir` if the grid allows it. Illegal moves are
    /// no-ops.
    pub fn try_move(&mut self, dir: Dir, observer: &mut impl CellObserver) -> bool {
        let grid = self.maze.grid();
        if !grid.is_open(self.cursor, dir) {
            return false;
        }
        let Some(next) = grid.neighbor(self.cursor, dir) else {
            return false;
        };
        self.cursor = next;
        self.moves += 1;
        observer.on_cursor_advanced(next);
        true
    }

    /// Resolves one frame of input: left before right, then up before down.
    /// A blocked preferred direction falls through to the other one.
    pub fn apply(&mut self, input: &InputSample, observer: &mut impl CellObserver) -> bool {
        let horizontal = (input.left && self.try_move(Dir::Left, observer))
            || (input.right && self.try_move(Dir::Right, observer));
        let vertical = (input.up && self.try_move(Dir::Up, observer))
            || (input.down && self.try_move(Dir::Down, observer));
        horizontal || vertical
    }
}

/// Outcome of one gameplay frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    Quit,
    Paused,
    Running,
    /// The player stood on the goal for the first time this session.
    GoalReached,
}

/// The post-generation phase: pause state, the frame tick and the
/// goal-reached latch around a [`Navigator`].
pub struct Gameplay {
    nav: Navigator,
    paused: bool,
    ticks: u64,
    reached: bool,
}

impl Gameplay {
    pub fn new(maze: Maze) -> Self {
        Self {
            nav: Navigator::new(maze),
            paused: false,
            ticks: 0,
            reached: false,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames played while not paused.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn goal_reached(&self) -> bool {
        self.reached
    }

    /// Runs one frame. A pause edge flips the pause state first; while
    /// paused, neither movement nor the tick advance.
    pub fn frame(&mut self, input: &InputSample, observer: &mut impl CellObserver) -> Frame {
        if input.quit {
            info!("quit after {} moves", self.nav.moves());
            return Frame::Quit;
        }
        if input.pause {
            self.paused = !self.paused;
            debug!("paused: {}", self.paused);
        }
        if self.paused {
            return Frame::Paused;
        }

        self.ticks += 1;
        self.nav.apply(input, observer);
        if self.nav.at_goal() && !self.reached {
            self.reached = true;
            info!("goal {:?} reached after {} moves", self.nav.cursor(), self.nav.moves());
            return Frame::GoalReached;
        }
        Frame::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carver::Carver;
    use crate::grid::Grid;
    use crate::observer::{NullObserver, Screen};
    use crate::policy::BacktrackPolicy;
    use crate::rng::RandomSource;

    struct Script(Vec<u16>, usize);

    impl RandomSource for Script {
        fn next_u16(&mut self) -> u16 {
            let draw = self.0[self.1 % self.0.len()];
            self.1 += 1;
            draw
        }
    }

    /// 2x2 maze with passages (0,0)-(1,0), (1,0)-(1,1), (1,1)-(0,1).
    fn u_shaped_maze() -> Maze {
        let carver = Carver::new(
            Script(vec![3, 1, 0, 2], 0),
            Grid::new(2, 2),
            Pos::new(0, 0),
            BacktrackPolicy::Trackback,
            &mut NullObserver,
        );
        carver.finish(&mut NullObserver)
    }

    #[test]
    fn test_walls_block_moves() {
        let mut nav = Navigator::new(u_shaped_maze());
        assert_eq!(nav.cursor(), Pos::new(0, 0));
        assert!(!nav.try_move(Dir::Down, &mut NullObserver));
        assert!(!nav.try_move(Dir::Up, &mut NullObserver));
        assert!(!nav.try_move(Dir::Left, &mut NullObserver));
        assert_eq!(nav.cursor(), Pos::new(0, 0));
        assert_eq!(nav.moves(), 0);
    }

    #[test]
    fn test_walk_to_goal() {
        let mut screen = Screen::new(2, 2, 8);
        let mut nav = Navigator::new(u_shaped_maze());
        assert!(nav.try_move(Dir::Right, &mut screen));
        assert!(nav.try_move(Dir::Down, &mut screen));
        assert!(!nav.at_goal());
        assert!(nav.try_move(Dir::Left, &mut screen));
        assert!(nav.at_goal());
        assert_eq!(screen.sprite_pixels(), Some((0, 8)));
        assert_eq!(nav.moves(), 3);

        // and back the way we came
        assert!(nav.try_move(Dir::Right, &mut screen));
        assert!(nav.try_move(Dir::Up, &mut screen));
        assert!(nav.try_move(Dir::Left, &mut screen));
        assert_eq!(nav.cursor(), Pos::new(0, 0));
    }

    #[test]
    fn test_apply_prefers_left_then_falls_back_to_right() {
        let mut nav = Navigator::new(u_shaped_maze());
        let input = InputSample {
            left: true,
            right: true,
            ..InputSample::default()
        };
        assert!(nav.apply(&input, &mut NullObserver));
        assert_eq!(nav.cursor(), Pos::new(1, 0));
    }

    #[test]
    fn test_apply_resolves_horizontal_then_vertical() {
        let mut nav = Navigator::new(u_shaped_maze());
        let mut input = InputSample::default();
        input.press(Dir::Right);
        input.press(Dir::Down);
        assert!(nav.apply(&input, &mut NullObserver));
        assert_eq!(nav.cursor(), Pos::new(1, 1));
        assert_eq!(nav.moves(), 2);
    }

    #[test]
    fn test_apply_without_direction_is_noop() {
        let mut nav = Navigator::new(u_shaped_maze());
        let input = InputSample {
            pause: true,
            ..InputSample::default()
        };
        assert!(!input.any_direction());
        assert!(!nav.apply(&input, &mut NullObserver));
        assert_eq!(nav.cursor(), Pos::new(0, 0));
    }

    fn pressed(dir: Dir) -> InputSample {
        let mut input = InputSample::default();
        input.press(dir);
        input
    }

    #[test]
    fn test_pause_freezes_movement_and_ticks() {
        let mut game = Gameplay::new(u_shaped_maze());
        let toggle = InputSample {
            pause: true,
            right: true,
            ..InputSample::default()
        };
        assert_eq!(game.frame(&toggle, &mut NullObserver), Frame::Paused);
        assert!(game.is_paused());
        assert_eq!(game.frame(&pressed(Dir::Right), &mut NullObserver), Frame::Paused);
        assert_eq!(game.navigator().cursor(), Pos::new(0, 0));
        assert_eq!(game.ticks(), 0);

        // the second edge resumes, and that frame's direction is honoured
        assert_eq!(game.frame(&toggle, &mut NullObserver), Frame::Running);
        assert!(!game.is_paused());
        assert_eq!(game.navigator().cursor(), Pos::new(1, 0));
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn test_goal_notice_latches_once() {
        let mut game = Gameplay::new(u_shaped_maze());
        assert_eq!(game.frame(&pressed(Dir::Right), &mut NullObserver), Frame::Running);
        assert_eq!(game.frame(&pressed(Dir::Down), &mut NullObserver), Frame::Running);
        assert!(!game.goal_reached());
        assert_eq!(game.frame(&pressed(Dir::Left), &mut NullObserver), Frame::GoalReached);
        assert!(game.goal_reached());

        assert_eq!(game.frame(&pressed(Dir::Right), &mut NullObserver), Frame::Running);
        assert_eq!(game.frame(&pressed(Dir::Left), &mut NullObserver), Frame::Running);
        assert!(game.navigator().at_goal());
        assert!(game.goal_reached());
        assert_eq!(game.ticks(), 5);
    }

    #[test]
    fn test_quit_skips_the_frame() {
        let mut game = Gameplay::new(u_shaped_maze());
        let input = InputSample {
            quit: true,
            right: true,
            ..InputSample::default()
        };
        assert_eq!(game.frame(&input, &mut NullObserver), Frame::Quit);
        assert_eq!(game.navigator().cursor(), Pos::new(0, 0));
        assert_eq!(game.ticks(), 0);
    }
}
