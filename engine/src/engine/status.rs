// engine/src/engine/status.rs
#![forbid(unsafe_code)]

use std::fmt;

use thiserror::Error;

use crate::engine::amoeba::Colour;
use crate::engine::constants::{
    cell_index, chain_step_score, checked_index, ghosts_for_score, GRID_CELLS, GRID_HEIGHT,
    GRID_WIDTH, MIN_GROUP_SIZE, OVERFLOW_COLUMN, OVERFLOW_ROW,
};
use crate::engine::groups::find_groups;
use crate::engine::pair::{Move, Orientation};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("too many rows: {0} (grid height is {GRID_HEIGHT})")]
    TooManyRows(usize),
    #[error("row {row} has {len} cells (grid width is {GRID_WIDTH})")]
    RowWidth { row: usize, len: usize },
    #[error("unknown colour glyph {glyph:?} in row {row}")]
    UnknownGlyph { row: usize, glyph: char },
}

/// Outcome of dropping one pair on a `GridStatus` and resolving every chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionResult {
    /// Non-ghost amoebas removed per chain step; index 0 is the immediate chain.
    pub step_chains: Vec<u32>,
    pub ghosts_removed: u32,
    /// Amoebas in groups of 2..MIN_GROUP_SIZE on the settled board.
    pub grouped_amoebas: u32,
    pub groups: u32,
    pub column_heights: [u8; GRID_WIDTH],
    pub max_height: u8,
    pub mean_height: f32,
    pub overflow_column_height: u8,
    /// Amoebas of the pair that found their column full.
    pub lost_amoebas: u8,
    pub filled: bool,
}

impl PositionResult {
    #[inline]
    pub fn chain_steps(&self) -> usize {
        self.step_chains.len()
    }

    #[inline]
    pub fn total_removed(&self) -> u32 {
        self.step_chains.iter().sum()
    }

    /// Points the live grid awards for the same resolution.
    pub fn score(&self) -> u64 {
        self.step_chains
            .iter()
            .enumerate()
            .map(|(step, &n)| chain_step_score(n, step as u32))
            .sum()
    }

    /// Ghosts produced (before cancelling any waiting ghosts).
    pub fn ghosts_sent(&self) -> u32 {
        self.step_chains
            .iter()
            .enumerate()
            .map(|(step, &n)| ghosts_for_score(chain_step_score(n, step as u32)))
            .sum()
    }
}

/// Colour-only copy of a board. Cheap to copy; the AI simulates on throwaway copies.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridStatus {
    cells: [Colour; GRID_CELLS],
}

impl Default for GridStatus {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for GridStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_ascii())
    }
}

impl GridStatus {
    pub fn empty() -> Self {
        Self {
            cells: [Colour::None; GRID_CELLS],
        }
    }

    pub(crate) fn from_cells(cells: [Colour; GRID_CELLS]) -> Self {
        Self { cells }
    }

    /// Parse a bottom-aligned board: the last row string is the bottom row.
    ///
    /// Glyphs follow `Colour::glyph()` (`R B G O P # .`).
    pub fn from_rows(rows: &[&str]) -> Result<Self, StatusParseError> {
        if rows.len() > GRID_HEIGHT {
            return Err(StatusParseError::TooManyRows(rows.len()));
        }
        let mut s = Self::empty();
        let top = GRID_HEIGHT - rows.len();
        for (i, row) in rows.iter().enumerate() {
            let glyphs: Vec<char> = row.chars().collect();
            if glyphs.len() != GRID_WIDTH {
                return Err(StatusParseError::RowWidth {
                    row: i,
                    len: glyphs.len(),
                });
            }
            for (x, &g) in glyphs.iter().enumerate() {
                let colour =
                    Colour::from_glyph(g).ok_or(StatusParseError::UnknownGlyph { row: i, glyph: g })?;
                s.cells[cell_index(x, top + i)] = colour;
            }
        }
        Ok(s)
    }

    /// `Colour::None` outside the board.
    #[inline]
    pub fn colour_at(&self, x: i32, y: i32) -> Colour {
        checked_index(x, y).map_or(Colour::None, |i| self.cells[i])
    }

    /// Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_colour(&mut self, x: i32, y: i32, colour: Colour) {
        if let Some(i) = checked_index(x, y) {
            self.cells[i] = colour;
        }
    }

    #[inline]
    pub fn is_empty_at(&self, x: i32, y: i32) -> bool {
        self.colour_at(x, y).is_empty()
    }

    /// Occupied rows counted from the bottom up to the topmost occupant.
    pub fn column_height(&self, x: usize) -> usize {
        if x >= GRID_WIDTH {
            return 0;
        }
        (0..GRID_HEIGHT)
            .find(|&y| !self.cells[cell_index(x, y)].is_empty())
            .map_or(0, |y| GRID_HEIGHT - y)
    }

    /// Lowest empty row of column `x` (bottom-up scan); `None` if the column is full.
    pub fn landing_row(&self, x: usize) -> Option<usize> {
        if x >= GRID_WIDTH {
            return None;
        }
        (0..GRID_HEIGHT)
            .rev()
            .find(|&y| self.cells[cell_index(x, y)].is_empty())
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        !self.cells[cell_index(OVERFLOW_COLUMN, OVERFLOW_ROW)].is_empty()
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Drop `main` and `satellite` as placed by `mv`, resolve gravity and every cascading
    /// chain on this copy, and report what happened.
    pub fn check_positions(&mut self, main: Colour, satellite: Colour, mv: Move) -> PositionResult {
        let mut result = PositionResult::default();

        // The lower amoeba of a vertical pair lands first.
        let drops = if mv.orientation == Orientation::Bottom {
            [(satellite, mv.satellite_x()), (main, mv.main_x)]
        } else {
            [(main, mv.main_x), (satellite, mv.satellite_x())]
        };
        for (colour, x) in drops {
            if !self.drop_amoeba(colour, x) {
                result.lost_amoebas += 1;
            }
        }

        self.resolve_chains(&mut result);
        self.fill_heights(&mut result);
        result.filled = self.is_filled();
        result
    }

    fn drop_amoeba(&mut self, colour: Colour, x: usize) -> bool {
        match self.landing_row(x) {
            Some(y) => {
                self.cells[cell_index(x, y)] = colour;
                true
            }
            None => false,
        }
    }

    /// Collapse every column so no occupant sits above an empty cell.
    fn settle(&mut self) {
        for x in 0..GRID_WIDTH {
            let mut write = GRID_HEIGHT;
            for y in (0..GRID_HEIGHT).rev() {
                let c = self.cells[cell_index(x, y)];
                if c.is_empty() {
                    continue;
                }
                write -= 1;
                if write != y {
                    self.cells[cell_index(x, write)] = c;
                    self.cells[cell_index(x, y)] = Colour::None;
                }
            }
        }
    }

    fn resolve_chains(&mut self, result: &mut PositionResult) {
        loop {
            self.settle();

            let groups = find_groups(|i| self.cells[i]);
            let mut removed = 0u32;

            for g in groups.iter().filter(|g| g.len() >= MIN_GROUP_SIZE) {
                for &i in &g.cells {
                    self.cells[i] = Colour::None;
                }
                removed += g.len() as u32;
                for &i in &g.contact_ghosts {
                    // A ghost may touch two groups in the same pass.
                    if self.cells[i] == Colour::Ghost {
                        self.cells[i] = Colour::None;
                        result.ghosts_removed += 1;
                    }
                }
            }

            if removed == 0 {
                for g in groups.iter().filter(|g| g.len() >= 2) {
                    result.groups += 1;
                    result.grouped_amoebas += g.len() as u32;
                }
                return;
            }
            result.step_chains.push(removed);
        }
    }

    fn fill_heights(&self, result: &mut PositionResult) {
        let mut sum = 0u32;
        for x in 0..GRID_WIDTH {
            let h = self.column_height(x) as u8;
            result.column_heights[x] = h;
            result.max_height = result.max_height.max(h);
            sum += u32::from(h);
        }
        result.mean_height = sum as f32 / GRID_WIDTH as f32;
        result.overflow_column_height = result.column_heights[OVERFLOW_COLUMN];
    }

    pub fn render_ascii(&self) -> String {
        let mut s = String::with_capacity((GRID_WIDTH + 3) * (GRID_HEIGHT + 2));
        s.push('+');
        s.push_str(&"-".repeat(GRID_WIDTH));
        s.push_str("+\n");
        for y in 0..GRID_HEIGHT {
            s.push('|');
            for x in 0..GRID_WIDTH {
                s.push(self.cells[cell_index(x, y)].glyph());
            }
            s.push_str("|\n");
        }
        s.push('+');
        s.push_str(&"-".repeat(GRID_WIDTH));
        s.push_str("+\n");
        s
    }
}
