/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

/// Represents the color of a player or a piece.
///
/// White always moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns the [`Color`] whose turn it is after `plies` half-moves have been played.
    ///
    /// # Example
    /// ```
    /// # use chessh::Color;
    /// assert_eq!(Color::from_ply(0), Color::White);
    /// assert_eq!(Color::from_ply(7), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn from_ply(plies: u32) -> Self {
        if plies % 2 == 0 {
            Self::White
        } else {
            Self::Black
        }
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns `true` if this [`Color`] is Black.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns this [`Color`]'s opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use chessh::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The row delta of a single pawn step for this [`Color`].
    ///
    /// Row 0 is Black's back rank, so White's pawns travel towards smaller rows.
    #[inline(always)]
    pub const fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// The row holding this [`Color`]'s pieces in the starting position.
    #[inline(always)]
    pub const fn back_row(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// The row holding this [`Color`]'s pawns in the starting position.
    #[inline(always)]
    pub const fn pawn_row(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// The row on which this [`Color`]'s pawns must promote.
    #[inline(always)]
    pub const fn promotion_row(&self) -> u8 {
        self.opponent().back_row()
    }

    /// The row a pawn of this [`Color`] lands on after a two-square advance.
    #[inline(always)]
    pub const fn double_push_row(&self) -> u8 {
        match self {
            Self::White => 4,
            Self::Black => 3,
        }
    }

    /// Creates a [`Color`] from a `char`, as found in the side-to-move field of a FEN string.
    ///
    /// # Example
    /// ```
    /// # use chessh::Color;
    /// assert_eq!(Color::from_uci('b').unwrap(), Color::Black);
    /// assert!(Color::from_uci('x').is_err());
    /// ```
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color:?}"),
        }
    }

    /// Converts this [`Color`] to a `char`: `w` for White and `b` for Black.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Returns a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" | "W" | "white" | "White" => Ok(Self::White),
            "b" | "B" | "black" | "Black" => Ok(Self::Black),
            _ => bail!("Invalid color {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    /// By default, a [`Color`] is displayed by name. The alternate formatter (`#`) displays its FEN char.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.to_uci())
        } else {
            write!(f, "{}", self.name())
        }
    }
}

/// The movement class of a piece.
///
/// Empty squares are not a [`PieceKind`]; a square holds an `Option<Piece>` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
    Pawn,
}

impl PieceKind {
    /// Number of piece kinds.
    pub const COUNT: usize = 6;

    /// The kinds a pawn may promote to, in the order they are enumerated by move generation.
    pub const PROMOTIONS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// An array of all piece kinds.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Rook,
            Self::Knight,
            Self::Bishop,
            Self::Queen,
            Self::King,
            Self::Pawn,
        ]
    }

    /// Returns `true` if a pawn may promote to this kind.
    #[inline(always)]
    pub const fn is_promotion_target(&self) -> bool {
        matches!(self, Self::Rook | Self::Knight | Self::Bishop | Self::Queen)
    }

    /// Creates a [`PieceKind`] from its lowercase letter (`p`, `n`, `b`, `r`, `q`, `k`).
    ///
    /// # Example
    /// ```
    /// # use chessh::PieceKind;
    /// assert_eq!(PieceKind::from_uci('n').unwrap(), PieceKind::Knight);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Must be one of [p, n, b, r, q, k]. Got {kind:?}"),
        }
    }

    /// Lowercase letter of this [`PieceKind`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Returns a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl FromStr for PieceKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_uci(c.to_ascii_lowercase()),
            _ => bail!("PieceKind must be a single char. Got {s:?}"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A piece on the board, along with its movement history.
///
/// The history is what the rules need to decide castling rights, pawn double-pushes and en passant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    /// What this piece moves like.
    pub kind: PieceKind,

    /// Who owns this piece.
    pub color: Color,

    /// Total number of times this piece has moved.
    pub moves: u32,

    /// The ply at which this piece last moved, if it has moved at all.
    pub last_move: Option<u32>,
}

impl Piece {
    /// Creates a new, unmoved [`Piece`].
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            kind,
            color,
            moves: 0,
            last_move: None,
        }
    }

    /// Returns `true` if this piece has never moved.
    #[inline(always)]
    pub const fn is_unmoved(&self) -> bool {
        self.moves == 0
    }

    /// Returns `true` if this piece is a `kind` owned by `color`.
    #[inline(always)]
    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color == color && self.kind == kind
    }

    /// Creates an unmoved [`Piece`] from a FEN char: uppercase for White, lowercase for Black.
    ///
    /// # Example
    /// ```
    /// # use chessh::{Color, Piece, PieceKind};
    /// let piece = Piece::from_uci('Q').unwrap();
    /// assert_eq!(piece.color, Color::White);
    /// assert_eq!(piece.kind, PieceKind::Queen);
    /// ```
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece.to_ascii_lowercase())?;
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Self::new(color, kind))
    }

    /// FEN char of this [`Piece`]: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self.color {
            Color::White => self.kind.char().to_ascii_uppercase(),
            Color::Black => self.kind.char(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}
