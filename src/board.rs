use serde::{Deserialize, Serialize};

use crate::types::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The first player always draws X.
    #[inline]
    pub fn owner(self) -> Player {
        match self {
            Mark::X => Player::First,
            Mark::O => Player::Second,
        }
    }

    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'x',
            Mark::O => 'o',
        }
    }
}

/// The eight winning lines of a 3x3 grid.
pub const LINES: [[u8; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 3x3 occupancy, cells laid out row-major (r*3 + c).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Option<Mark>; 9],
}

impl Grid {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse nine characters of `x`, `o` and `0`/`.`/`-` (empty).
    pub fn parse(s: &str) -> Option<Self> {
        let mut grid = Grid::new();
        let mut n = 0usize;
        for ch in s.chars() {
            if n >= 9 {
                return None;
            }
            grid.cells[n] = match ch.to_ascii_lowercase() {
                'x' => Some(Mark::X),
                'o' => Some(Mark::O),
                '0' | '.' | '-' | '_' => None,
                _ => return None,
            };
            n += 1;
        }
        (n == 9).then_some(grid)
    }

    #[inline]
    pub fn get(&self, idx: u8) -> Option<Mark> {
        self.cells[usize::from(idx)]
    }

    #[inline]
    pub fn set(&mut self, idx: u8, mark: Option<Mark>) {
        self.cells[usize::from(idx)] = mark;
    }

    #[inline]
    pub fn is_empty(&self, idx: u8) -> bool {
        self.cells[usize::from(idx)].is_none()
    }

    #[inline]
    pub fn filled_count(&self) -> u8 {
        self.cells.iter().map(|c| u8::from(c.is_some())).sum()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled_count() == 9
    }

    /// Mark owning a completed line, if any. Scans lines in `LINES` order.
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| {
            let m = self.get(a)?;
            (self.get(b) == Some(m) && self.get(c) == Some(m)).then_some(m)
        })
    }

    #[inline]
    pub fn has_line(&self) -> bool {
        self.winner().is_some()
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..9).filter(move |&i| self.is_empty(i))
    }

    /// Two bits per cell: 00 empty, 01 X, 10 O.
    #[inline]
    pub fn bits2(&self) -> u32 {
        self.cells.iter().enumerate().fold(0u32, |acc, (i, c)| {
            let v = match c {
                None => 0,
                Some(Mark::X) => 1,
                Some(Mark::O) => 2,
            };
            acc | (v << (2 * i))
        })
    }

    /// One bit per occupied cell.
    #[inline]
    pub fn occupancy(&self) -> u16 {
        self.cells
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, c)| if c.is_some() { acc | (1 << i) } else { acc })
    }

    pub fn write_canonical(&self, out: &mut String) {
        for c in &self.cells {
            out.push(c.map_or('0', Mark::as_char));
        }
    }
}
