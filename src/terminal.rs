use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::grid::{Dir, Pos, BOTTOM_WALL, GOAL_TILE, RIGHT_WALL, UNVISITED};
use crate::navigation::InputSample;
use crate::observer::Screen;

const CELL_W: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Glyph {
    Open,
    Ledge,
    Unvisited,
    Goal,
    Player,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    glyph: Glyph,
    right_wall: bool,
    color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: Glyph::Open,
        right_wall: false,
        color: Color::Reset,
    };

    fn text(self) -> String {
        let body = match self.glyph {
            Glyph::Open => " ",
            Glyph::Ledge => "_",
            Glyph::Unvisited => "░",
            Glyph::Goal => "◆",
            Glyph::Player => "@",
        };
        let edge = match (self.glyph, self.right_wall) {
            (Glyph::Unvisited, _) => "░",
            (_, true) => "|",
            (_, false) => " ",
        };
        format!("{}{}", body, edge)
    }
}

/// Draws a [`Screen`] into the terminal, only touching cells that changed
/// since the last frame.
pub struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![Cell::BLANK; width * height],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 1,
            origin_y: 2,
        }
    }

    pub fn present(&mut self, out: &mut impl Write, screen: &Screen, hud: &str) -> io::Result<()> {
        // board plus left border, HUD and top border rows
        let needed_w = (self.width * CELL_W + 1) as u16;
        let needed_h = (self.height + 2) as u16;

        out.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2 + 1;
        let origin_y = (term_h - needed_h) / 2 + 2;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }

        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
            self.draw_border(out)?;
        }

        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x - 1, self.origin_y - 2))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud.to_string();
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = cell_for(screen, Pos { x, y });
                let idx = y * self.width + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(out, x, y, cell)?;
                }
            }
        }
        self.needs_full = false;

        out.flush()
    }

    fn draw_border(&self, out: &mut impl Write) -> io::Result<()> {
        out.queue(SetForegroundColor(Color::Blue))?;
        out.queue(MoveTo(self.origin_x - 1, self.origin_y - 1))?;
        out.queue(Print(format!(" {}", "_".repeat(self.width * CELL_W - 1))))?;
        for y in 0..self.height {
            out.queue(MoveTo(self.origin_x - 1, self.origin_y + y as u16))?;
            out.queue(Print('|'))?;
        }
        out.queue(ResetColor)?;
        Ok(())
    }

    fn draw_cell(&self, out: &mut impl Write, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = cell.text();
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        out.queue(MoveTo(x_pos, y_pos))?;
        out.queue(SetForegroundColor(cell.color))?;
        out.queue(Print(&text))?;
        let w = UnicodeWidthStr::width(text.as_str());
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

fn cell_for(screen: &Screen, pos: Pos) -> Cell {
    let tile = screen.tile(pos);
    let right_wall = tile & RIGHT_WALL != 0;
    if screen.sprite() == Some(pos) {
        return Cell {
            glyph: Glyph::Player,
            right_wall,
            color: Color::Yellow,
        };
    }
    if tile & GOAL_TILE != 0 {
        return Cell {
            glyph: Glyph::Goal,
            right_wall,
            color: Color::Green,
        };
    }
    if tile & UNVISITED != 0 {
        return Cell {
            glyph: Glyph::Unvisited,
            right_wall,
            color: Color::DarkGrey,
        };
    }
    Cell {
        glyph: if tile & BOTTOM_WALL != 0 {
            Glyph::Ledge
        } else {
            Glyph::Open
        },
        right_wall,
        color: Color::Blue,
    }
}

/// Folds one key into the frame's input sample.
pub fn sample_key(code: KeyCode, sample: &mut InputSample) {
    match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => sample.press(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => sample.press(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => sample.press(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => sample.press(Dir::Right),
        KeyCode::Char('p') => sample.pause = true,
        KeyCode::Char('q') | KeyCode::Esc => sample.quit = true,
        _ => {}
    }
}

/// Presses and auto-repeats count, so a held key keeps moving; releases
/// are ignored.
pub fn sample_key_event(key: KeyEvent, sample: &mut InputSample) {
    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        sample_key(key.code, sample);
    }
}

/// Drains pending terminal events into one sample without blocking.
pub fn poll_input() -> io::Result<InputSample> {
    let mut sample = InputSample::default();
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            sample_key_event(key, &mut sample);
        }
    }
    Ok(sample)
}

pub struct FramePacer {
    frame_time: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(frame_time: Duration) -> Self {
        Self {
            frame_time,
            frame_start: Instant::now(),
        }
    }

    /// Blocks until one frame time has passed since the previous call.
    pub fn wait_for_next_frame(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_time {
            thread::sleep(self.frame_time - elapsed);
        }
        self.frame_start = Instant::now();
    }
}
