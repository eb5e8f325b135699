use crate::observer::CellObserver;

pub const BOTTOM_WALL: u8 = 0x01;
pub const RIGHT_WALL: u8 = 0x02;
pub const UNVISITED: u8 = 0x04;
/// Marks the goal cell on screen. Sent together with the cell's wall bits,
/// so the tile value always lies outside the plain wall/visited range.
pub const GOAL_TILE: u8 = 0x08;

const FRESH_CELL: u8 = BOTTOM_WALL | RIGHT_WALL | UNVISITED;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn to_pixels(self, cell_size: usize) -> (usize, usize) {
        (self.x * cell_size, self.y * cell_size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Maps a raw draw onto a direction: 0 up, 1 down, 2 left, 3 right.
    pub fn from_draw(draw: u16) -> Dir {
        match draw % 4 {
            0 => Dir::Up,
            1 => Dir::Down,
            2 => Dir::Left,
            _ => Dir::Right,
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Bit-packed cell grid. Each cell stores only its south and east walls;
/// the north wall of (x, y) lives in (x, y - 1) and the west wall in
/// (x - 1, y).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        assert!(
            width * height <= u16::MAX as usize + 1,
            "linear cell indices must fit in 16 bits"
        );
        Self {
            width,
            height,
            cells: vec![FRESH_CELL; width * height],
        }
    }

    /// Walls every cell back in and marks it unvisited, reporting each
    /// cell's encoding to the observer.
    pub fn reset(&mut self, observer: &mut impl CellObserver) {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { x, y };
                let idx = self.index_of(pos);
                self.cells[idx] = FRESH_CELL;
                observer.on_cell_encoding_changed(pos, FRESH_CELL);
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn index_of(&self, pos: Pos) -> usize {
        debug_assert!(self.contains(pos));
        pos.x + self.width * pos.y
    }

    pub fn pos_of(&self, index: usize) -> Pos {
        debug_assert!(index < self.cells.len());
        Pos {
            x: index % self.width,
            y: index / self.width,
        }
    }

    pub fn encoding(&self, pos: Pos) -> u8 {
        self.cells[self.index_of(pos)]
    }

    pub fn has_bottom_wall(&self, pos: Pos) -> bool {
        self.encoding(pos) & BOTTOM_WALL != 0
    }

    pub fn has_right_wall(&self, pos: Pos) -> bool {
        self.encoding(pos) & RIGHT_WALL != 0
    }

    pub fn is_unvisited(&self, pos: Pos) -> bool {
        self.encoding(pos) & UNVISITED != 0
    }

    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x.checked_add_signed(dx)?;
        let ny = pos.y.checked_add_signed(dy)?;
        let next = Pos { x: nx, y: ny };
        self.contains(next).then_some(next)
    }

    pub fn has_unvisited_neighbor(&self, pos: Pos) -> bool {
        Dir::ALL.iter().any(|&dir| {
            self.neighbor(pos, dir)
                .is_some_and(|next| self.is_unvisited(next))
        })
    }

    /// Whether the edge crossed by stepping from `pos` towards `dir` is open.
    /// Moving right/down consults `pos`; moving left/up consults the target,
    /// since that is where the shared edge is stored. Out-of-bounds steps are
    /// never open.
    pub fn is_open(&self, pos: Pos, dir: Dir) -> bool {
        let Some(next) = self.neighbor(pos, dir) else {
            return false;
        };
        match dir {
            Dir::Right => !self.has_right_wall(pos),
            Dir::Down => !self.has_bottom_wall(pos),
            Dir::Left => !self.has_right_wall(next),
            Dir::Up => !self.has_bottom_wall(next),
        }
    }

    /// Number of interior edges with the wall knocked down.
    pub fn open_edges(&self) -> usize {
        let mut open = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { x, y };
                if self.is_open(pos, Dir::Right) {
                    open += 1;
                }
                if self.is_open(pos, Dir::Down) {
                    open += 1;
                }
            }
        }
        open
    }

    pub fn unvisited_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c & UNVISITED != 0).count()
    }

    /// Knocks down the wall between `pos` and its neighbor towards `dir`,
    /// returning the cell whose encoding changed.
    pub(crate) fn clear_wall(&mut self, pos: Pos, dir: Dir) -> Pos {
        let next = self
            .neighbor(pos, dir)
            .expect("wall cleared towards a neighbor outside the grid");
        let (owner, bit) = match dir {
            Dir::Right => (pos, RIGHT_WALL),
            Dir::Down => (pos, BOTTOM_WALL),
            Dir::Left => (next, RIGHT_WALL),
            Dir::Up => (next, BOTTOM_WALL),
        };
        let idx = self.index_of(owner);
        self.cells[idx] &= !bit;
        owner
    }

    pub(crate) fn mark_visited(&mut self, pos: Pos) {
        let idx = self.index_of(pos);
        debug_assert!(self.cells[idx] & UNVISITED != 0, "cell visited twice");
        self.cells[idx] &= !UNVISITED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;

    #[test]
    fn test_fresh_grid_is_fully_walled() {
        let grid = Grid::new(4, 3);
        for idx in 0..grid.len() {
            let pos = grid.pos_of(idx);
            assert_eq!(grid.encoding(pos), BOTTOM_WALL | RIGHT_WALL | UNVISITED);
        }
        assert_eq!(grid.open_edges(), 0);
        assert_eq!(grid.unvisited_count(), 12);
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(32, 24);
        assert_eq!(grid.index_of(Pos::new(0, 11)), 352);
        assert_eq!(grid.pos_of(352), Pos::new(0, 11));
        assert_eq!(grid.pos_of(767), Pos::new(31, 23));
    }

    #[test]
    fn test_neighbor_bounds() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.neighbor(Pos::new(0, 0), Dir::Up), None);
        assert_eq!(grid.neighbor(Pos::new(0, 0), Dir::Left), None);
        assert_eq!(grid.neighbor(Pos::new(2, 2), Dir::Right), None);
        assert_eq!(grid.neighbor(Pos::new(2, 2), Dir::Down), None);
        assert_eq!(grid.neighbor(Pos::new(1, 1), Dir::Up), Some(Pos::new(1, 0)));
    }

    #[test]
    fn test_clear_wall_stores_on_north_and_west_owner() {
        let mut grid = Grid::new(3, 3);
        let owner = grid.clear_wall(Pos::new(1, 1), Dir::Up);
        assert_eq!(owner, Pos::new(1, 0));
        assert!(!grid.has_bottom_wall(Pos::new(1, 0)));
        assert!(grid.has_bottom_wall(Pos::new(1, 1)));

        let owner = grid.clear_wall(Pos::new(1, 1), Dir::Left);
        assert_eq!(owner, Pos::new(0, 1));
        assert!(!grid.has_right_wall(Pos::new(0, 1)));
        assert!(grid.has_right_wall(Pos::new(1, 1)));
    }

    #[test]
    fn test_is_open_is_symmetric() {
        let mut grid = Grid::new(2, 2);
        grid.clear_wall(Pos::new(0, 0), Dir::Right);
        grid.clear_wall(Pos::new(1, 0), Dir::Down);
        assert!(grid.is_open(Pos::new(0, 0), Dir::Right));
        assert!(grid.is_open(Pos::new(1, 0), Dir::Left));
        assert!(grid.is_open(Pos::new(1, 0), Dir::Down));
        assert!(grid.is_open(Pos::new(1, 1), Dir::Up));
        assert!(!grid.is_open(Pos::new(0, 0), Dir::Down));
        assert!(!grid.is_open(Pos::new(0, 1), Dir::Up));
        assert_eq!(grid.open_edges(), 2);
    }

    #[test]
    fn test_border_walls_never_open() {
        let mut grid = Grid::new(2, 2);
        grid.clear_wall(Pos::new(0, 0), Dir::Right);
        grid.clear_wall(Pos::new(0, 0), Dir::Down);
        // the east wall of the last column is stored but never crossable
        assert!(!grid.is_open(Pos::new(1, 0), Dir::Right));
        assert!(!grid.is_open(Pos::new(0, 1), Dir::Down));
        assert!(!grid.is_open(Pos::new(0, 0), Dir::Up));
    }

    #[test]
    fn test_reset_discards_previous_maze() {
        let mut grid = Grid::new(2, 2);
        grid.clear_wall(Pos::new(0, 0), Dir::Right);
        grid.mark_visited(Pos::new(0, 0));
        grid.reset(&mut NullObserver);
        assert_eq!(grid, Grid::new(2, 2));
    }

    #[test]
    fn test_from_draw() {
        assert_eq!(Dir::from_draw(0), Dir::Up);
        assert_eq!(Dir::from_draw(5), Dir::Down);
        assert_eq!(Dir::from_draw(0xB402), Dir::Left);
        assert_eq!(Dir::from_draw(u16::MAX), Dir::Right);
    }

    #[test]
    fn test_to_pixels() {
        assert_eq!(Pos::new(3, 11).to_pixels(8), (24, 88));
    }
}
