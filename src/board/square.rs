/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: u8 = 8;

/// A location on the board, addressed as `(row, col)`.
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's back rank (rank 1).
/// Columns 0 through 7 are files `a` through `h`.
///
/// A [`Square`] can only be constructed in range, so holding one is proof that
/// indexing the board with it is sound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

    /// Creates a new [`Square`], or `None` if either coordinate is off the board.
    ///
    /// # Example
    /// ```
    /// # use chessh::Square;
    /// assert!(Square::new(7, 4).is_some());
    /// assert!(Square::new(8, 0).is_none());
    /// assert!(Square::new(0, -1).is_none());
    /// ```
    #[inline(always)]
    pub fn new(row: impl TryInto<u8>, col: impl TryInto<u8>) -> Option<Self> {
        let row = row.try_into().ok()?;
        let col = col.try_into().ok()?;
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Self { row, col })
    }

    /// The row of this square. Row 0 is rank 8.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// The column of this square. Column 0 is the `a` file.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// A unique index in `[0, 64)`, in reading order from White's perspective.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Returns the square `rows` and `cols` away from this one, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use chessh::Square;
    /// let e2 = Square::from_uci("e2").unwrap();
    /// assert_eq!(e2.offset(-2, 0), Some(Square::from_uci("e4").unwrap()));
    /// assert_eq!(e2.offset(2, 0), None);
    /// ```
    #[inline(always)]
    pub fn offset(&self, rows: i8, cols: i8) -> Option<Self> {
        let row = self.row as i8 + rows;
        let col = self.col as i8 + cols;
        Self::new(row, col)
    }

    /// An iterator over all 64 squares, in reading order from White's perspective (a8, b8, ..., h1).
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Self { row, col }))
    }

    /// The file letter of this square, `a` through `h`.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// The rank digit of this square, `1` through `8`.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }

    /// Parses a [`Square`] from its algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use chessh::Square;
    /// let e4 = Square::from_uci("e4").unwrap();
    /// assert_eq!((e4.row(), e4.col()), (4, 4));
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be a file and a rank, such as \"e4\". Got {square:?}");
        };

        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?} in square {square:?}: must be between [a, h]");
        }
        if !('1'..='8').contains(&rank) {
            bail!("Invalid rank {rank:?} in square {square:?}: must be between [1, 8]");
        }

        let col = file as u8 - b'a';
        let row = b'8' - rank as u8;
        Self::new(row, col).ok_or_else(|| anyhow!("Square {square:?} is off the board"))
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(0, 0).is_some());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 7).is_none());
        assert!(Square::new(7, 8).is_none());
        assert!(Square::new(-1, 3).is_none());
        assert!(Square::new(3, 300).is_none());
    }

    #[test]
    fn test_square_notation() {
        let a8 = Square::new(0, 0).unwrap();
        let h1 = Square::new(7, 7).unwrap();
        assert_eq!(a8.to_string(), "a8");
        assert_eq!(h1.to_string(), "h1");
        assert_eq!(Square::from_uci("a8").unwrap(), a8);
        assert_eq!("h1".parse::<Square>().unwrap(), h1);

        assert!(Square::from_uci("").is_err());
        assert!(Square::from_uci("e").is_err());
        assert!(Square::from_uci("e44").is_err());
        assert!(Square::from_uci("j4").is_err());
        assert!(Square::from_uci("e0").is_err());
    }

    #[test]
    fn test_square_iter() {
        let squares = Square::iter().collect::<Vec<_>>();
        assert_eq!(squares.len(), Square::COUNT);
        for (i, square) in squares.iter().enumerate() {
            assert_eq!(square.index(), i);
        }
    }

    #[test]
    fn test_square_offset() {
        let a1 = Square::from_uci("a1").unwrap();
        assert_eq!(a1.offset(-1, 1), Some(Square::from_uci("b2").unwrap()));
        assert_eq!(a1.offset(1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
    }
}
