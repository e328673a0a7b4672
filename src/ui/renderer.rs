/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The field is measured in pixels. Every frame it is projected onto as many
/// terminal cells as the current terminal size allows (see `Projection`),
/// keeping cells twice as tall as wide. The renderer only reads the world.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{ItemKind, Sprite, StaticItem, ANIM_FRAMES};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell, so the terminal's own default
    /// never shows through between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
    const GRASS_BG: Color = Color::Rgb { r: 28, g: 58, b: 30 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real
    /// cell, so every position is re-emitted on the next flush.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_str_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }
}

// ── Projection ──

const HUD_ROW: usize = 0;
/// Terminal row of the field's top border.
const FIELD_ROW: usize = 2;
const FIELD_COL: usize = 1;

/// Rows not available to the field: HUD, gap, two borders, gap, help line.
const RESERVED_ROWS: usize = FIELD_ROW + 4;
/// Columns not available to the field: left margin and two borders.
const RESERVED_COLS: usize = FIELD_COL + 2;

const MIN_FIELD_COLS: usize = 8;
const MIN_FIELD_ROWS: usize = 4;

/// How field pixels map onto terminal cells for one terminal size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Projection {
    pub px_per_col: i32,
    pub px_per_row: i32,
    /// Field size in cells.
    pub cols: usize,
    pub rows: usize,
}

impl Projection {
    /// Finest projection of a `field_px` square field that fits a
    /// `term_w` × `term_h` terminal, with cells twice as tall as wide.
    /// `None` when the terminal cannot hold a usable field.
    pub fn fit(field_px: i32, term_w: usize, term_h: usize) -> Option<Self> {
        let avail_cols = term_w.checked_sub(RESERVED_COLS)?;
        let avail_rows = term_h.checked_sub(RESERVED_ROWS)?;
        if field_px <= 0 || avail_cols < MIN_FIELD_COLS || avail_rows < MIN_FIELD_ROWS {
            return None;
        }

        let per_col = div_ceil(field_px, avail_cols as i32);
        let per_row = div_ceil(field_px, avail_rows as i32);
        let px_per_col = per_col.max(div_ceil(per_row, 2)).max(1);
        let px_per_row = px_per_col * 2;

        Some(Projection {
            px_per_col,
            px_per_row,
            cols: div_ceil(field_px, px_per_col) as usize,
            rows: div_ceil(field_px, px_per_row) as usize,
        })
    }

    /// Cell (col, row) of a field pixel, relative to the field's top-left
    /// inner corner.
    pub fn project(&self, px: i32, py: i32) -> (usize, usize) {
        ((px.max(0) / self.px_per_col) as usize, (py.max(0) / self.px_per_row) as usize)
    }
}

#[inline]
fn div_ceil(a: i32, b: i32) -> i32 {
    (a + b - 1) / b
}

// ── Glyphs ──

/// Pixel height of one strip in the sprite sheet `Facing::row` indexes.
const SHEET_ROW_PX: u32 = 64;
const FRAMES: usize = ANIM_FRAMES as usize;

/// Terminal stand-ins for the sprite sheets: one row per facing strip
/// (Down, Right, Up, Left, Rest), one column per animation frame.
const DOG_SHEET: [[char; FRAMES]; 5] = [
    ['v', 'v', 'v', 'v'],
    ['>', '>', '>', '>'],
    ['^', '^', '^', '^'],
    ['<', '<', '<', '<'],
    ['v', 'v', 'v', 'v'],
];
const CAT_SHEET: [[char; FRAMES]; 5] = [
    ['c', 'C', 'c', 'C'],
    ['c', 'C', 'c', 'C'],
    ['c', 'C', 'c', 'C'],
    ['c', 'C', 'c', 'C'],
    ['z', 'Z', 'z', 'Z'],
];

/// Glyph for a sprite: the dog points where it last moved, cats doze
/// when resting and scamper otherwise.
pub fn sprite_glyph(sprite: &Sprite) -> char {
    let sheet = if sprite.is_cat() { &CAT_SHEET } else { &DOG_SHEET };
    let strip = (sprite.facing.row() / SHEET_ROW_PX) as usize;
    sheet[strip.min(sheet.len() - 1)][sprite.frame as usize % FRAMES]
}

fn item_style(kind: ItemKind) -> (char, Color) {
    match kind {
        ItemKind::Goal => ('#', Color::Rgb { r: 200, g: 150, b: 80 }),
        ItemKind::Trap => ('^', Color::Rgb { r: 220, g: 60, b: 60 }),
    }
}

/// Greedy word wrap to at most `width` columns. A single word longer than
/// `width` gets a line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() { line.push(' '); }
        line.push_str(word);
    }
    if !line.is_empty() { lines.push(line); }
    lines
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, pad_connected: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.compose(world, pad_connected);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Color> = None;
        let mut last_bg: Option<Color> = None;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Composition ──

    /// Build the whole next frame into `front`.
    fn compose(&mut self, world: &WorldState, pad_connected: bool) {
        self.front.clear();
        self.compose_hud(world, pad_connected);

        match Projection::fit(world.field.size, self.front.width, self.front.height) {
            Some(proj) => self.compose_field(world, &proj),
            None => self.compose_too_small(),
        }

        if let Some(prompt) = world.prompt() {
            self.compose_prompt(&prompt.text());
        }
    }

    fn compose_hud(&mut self, w: &WorldState, pad_connected: bool) {
        let remaining = w.active_cats().count();
        let mut hud = format!(
            " SCORE: {:<4}  LEVEL: {:<3}  CATS LEFT: {}",
            w.score, w.difficulty, remaining
        );
        if pad_connected {
            hud.push_str("  [PAD]");
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::Yellow, Cell::BASE_BG);
    }

    fn compose_too_small(&mut self) {
        let need_w = RESERVED_COLS + MIN_FIELD_COLS;
        let need_h = RESERVED_ROWS + MIN_FIELD_ROWS;
        let msg = format!("Terminal too small (need {}x{})", need_w, need_h);
        let y = (self.front.height / 2).max(HUD_ROW + 1);
        self.front.put_str_centered(y, &msg, Color::Red, Cell::BASE_BG);
    }

    fn compose_field(&mut self, w: &WorldState, proj: &Projection) {
        let (cols, rows) = (proj.cols, proj.rows);
        let border = Color::Rgb { r: 160, g: 160, b: 170 };

        // Border + grass
        for row in 0..=rows + 1 {
            for col in 0..=cols + 1 {
                let edge_x = col == 0 || col == cols + 1;
                let edge_y = row == 0 || row == rows + 1;
                let ch = match (edge_x, edge_y) {
                    (true, true) => '+',
                    (false, true) => '-',
                    (true, false) => '|',
                    (false, false) => ' ',
                };
                let bg = if edge_x || edge_y { Cell::BASE_BG } else { Cell::GRASS_BG };
                self.front.set(FIELD_COL + col, FIELD_ROW + row, Cell::new(ch, border, bg));
            }
        }

        if let Some(goal) = &w.goal {
            self.compose_item(goal, proj);
        }
        for trap in &w.traps {
            self.compose_item(trap, proj);
        }

        let sprite_px = w.field.sprite_size;
        for cat in w.active_cats() {
            self.compose_sprite(cat, sprite_px, Color::Rgb { r: 250, g: 200, b: 120 }, proj);
        }
        if let Some(player) = &w.player {
            self.compose_sprite(player, sprite_px, Color::White, proj);
        }

        let help = "[Arrows/WASD] Move   [Q] Quit";
        self.front.put_str(FIELD_COL, FIELD_ROW + rows + 3, help, Color::DarkGrey, Cell::BASE_BG);
    }

    /// Fill an item's footprint with its glyph.
    fn compose_item(&mut self, item: &StaticItem, proj: &Projection) {
        let (ch, fg) = item_style(item.kind);
        let (c0, r0) = proj.project(item.x, item.y);
        let (c1, r1) = proj.project(item.x + item.size - 1, item.y + item.size - 1);
        for r in r0..=r1.min(proj.rows.saturating_sub(1)) {
            for c in c0..=c1.min(proj.cols.saturating_sub(1)) {
                self.front.set(FIELD_COL + c + 1, FIELD_ROW + r + 1, Cell::new(ch, fg, Cell::GRASS_BG));
            }
        }
    }

    /// A sprite is drawn as one glyph at the center of its square.
    fn compose_sprite(&mut self, s: &Sprite, sprite_px: i32, fg: Color, proj: &Projection) {
        let (c, r) = proj.project(s.x + sprite_px / 2, s.y + sprite_px / 2);
        if c >= proj.cols || r >= proj.rows { return; }
        let cell = Cell::new(sprite_glyph(s), fg, Cell::GRASS_BG);
        self.front.set(FIELD_COL + c + 1, FIELD_ROW + r + 1, cell);
    }

    /// Centered box with the question wrapped to the terminal width.
    fn compose_prompt(&mut self, text: &str) {
        const ANSWER: &str = "[Y]es    [N]o";
        let max_text = self.front.width.saturating_sub(6).max(ANSWER.len());
        let lines = wrap_words(text, max_text);
        let inner = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .max(ANSWER.len());

        let bg = Color::Rgb { r: 40, g: 40, b: 70 };
        let bar: String = " ".repeat(inner + 6);
        let box_h = lines.len() + 3;
        let top = (self.front.height / 2).saturating_sub(box_h / 2);

        self.front.put_str_centered(top, &bar, Color::White, bg);
        for (i, line) in lines.iter().enumerate() {
            let padded = format!("   {:^inner$}   ", line, inner = inner);
            self.front.put_str_centered(top + 1 + i, &padded, Color::White, bg);
        }
        let answer = format!("   {:^inner$}   ", ANSWER, inner = inner);
        self.front.put_str_centered(top + 1 + lines.len(), &answer, Color::Yellow, bg);
        self.front.put_str_centered(top + 2 + lines.len(), &bar, Color::White, bg);
    }
}
