use crate::grid::Pos;

/// Receives every visible change the carver and navigator make.
///
/// Calls are synchronous; nothing is queued.
pub trait CellObserver {
    /// A cell's wall/visited bits changed, or a tile such as the goal marker
    /// was placed on it.
    fn on_cell_encoding_changed(&mut self, pos: Pos, encoded: u8);

    /// The single cursor marker moved.
    fn on_cursor_advanced(&mut self, pos: Pos);
}

impl<O: CellObserver + ?Sized> CellObserver for &mut O {
    fn on_cell_encoding_changed(&mut self, pos: Pos, encoded: u8) {
        (**self).on_cell_encoding_changed(pos, encoded)
    }

    fn on_cursor_advanced(&mut self, pos: Pos) {
        (**self).on_cursor_advanced(pos)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl CellObserver for NullObserver {
    fn on_cell_encoding_changed(&mut self, _pos: Pos, _encoded: u8) {}

    fn on_cursor_advanced(&mut self, _pos: Pos) {}
}

/// In-memory tile map plus one sprite. The terminal renderer presents it;
/// tests inspect it directly.
#[derive(Clone, Debug)]
pub struct Screen {
    width: usize,
    height: usize,
    cell_pixels: usize,
    tiles: Vec<u8>,
    sprite: Option<Pos>,
    tile_writes: usize,
}

impl Screen {
    pub fn new(width: usize, height: usize, cell_pixels: usize) -> Self {
        Self {
            width,
            height,
            cell_pixels,
            tiles: vec![0; width * height],
            sprite: None,
            tile_writes: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, pos: Pos) -> u8 {
        self.tiles[pos.x + self.width * pos.y]
    }

    pub fn sprite(&self) -> Option<Pos> {
        self.sprite
    }

    /// Sprite position in display pixels.
    pub fn sprite_pixels(&self) -> Option<(usize, usize)> {
        self.sprite.map(|pos| pos.to_pixels(self.cell_pixels))
    }

    pub fn tile_writes(&self) -> usize {
        self.tile_writes
    }
}

impl CellObserver for Screen {
    fn on_cell_encoding_changed(&mut self, pos: Pos, encoded: u8) {
        debug_assert!(pos.x < self.width && pos.y < self.height);
        self.tiles[pos.x + self.width * pos.y] = encoded;
        self.tile_writes += 1;
    }

    fn on_cursor_advanced(&mut self, pos: Pos) {
        self.sprite = Some(pos);
    }
}
