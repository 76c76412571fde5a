pub const BLANK: char = ' ';
pub const FULL_BLOCK: char = '\u{2588}';
pub const DARK_SHADE: char = '\u{2593}';
pub const GROUND: char = '=';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fill {
    #[default]
    Empty,
    Full,
    Shaded,
}

impl Fill {
    pub fn glyph(self) -> char {
        match self {
            Fill::Empty => BLANK,
            Fill::Full => FULL_BLOCK,
            Fill::Shaded => DARK_SHADE,
        }
    }
}

/// Row-major grid of fill states, rebuilt every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    height: u16,
    width: u16,
    cells: Vec<Fill>,
}

impl Canvas {
    pub fn new(height: u16, width: u16) -> Self {
        Self {
            height,
            width,
            cells: vec![Fill::Empty; height as usize * width as usize],
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    fn idx(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    pub fn get(&self, row: i64, col: i64) -> Option<Fill> {
        self.idx(row, col).map(|i| self.cells[i])
    }

    /// Out-of-range writes are dropped.
    pub fn set(&mut self, row: i64, col: i64, fill: Fill) {
        if let Some(i) = self.idx(row, col) {
            self.cells[i] = fill;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Fill::Empty);
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Fill]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// One string per row, plus a line of ground glyphs when `ground` is set.
    pub fn lines(&self, ground: bool) -> Vec<String> {
        let mut out: Vec<String> = self
            .rows()
            .map(|row| row.iter().map(|f| f.glyph()).collect())
            .collect();
        if ground {
            out.push(std::iter::repeat(GROUND).take(self.width as usize).collect());
        }
        out
    }

    pub fn count(&self, fill: Fill) -> usize {
        self.cells.iter().filter(|&&f| f == fill).count()
    }
}
