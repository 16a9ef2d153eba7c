/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{PieceKind, Square};

/// A list of moves, as produced by legal move enumeration.
pub type MoveList = Vec<Move>;

/// A proposed movement of a piece from one [`Square`] to another.
///
/// A [`Move`] carries no information about what piece is moving or whether it captures;
/// that is decided against a [`crate::Game`] when the move is validated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new [`Move`] without a promotion.
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new [`Move`] that promotes the moving pawn to `promotion`.
    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Creates a [`Move`] from raw board coordinates, as decoded by a transport or UI layer.
    ///
    /// Returns `None` if any coordinate is outside `[0, 8)`.
    ///
    /// # Example
    /// ```
    /// # use chessh::Move;
    /// let e2e4 = Move::from_coords(6, 4, 4, 4, None).unwrap();
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// assert!(Move::from_coords(6, 4, 8, 4, None).is_none());
    /// ```
    pub fn from_coords(
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
        promotion: Option<PieceKind>,
    ) -> Option<Self> {
        Some(Self {
            from: Square::new(from_row, from_col)?,
            to: Square::new(to_row, to_col)?,
            promotion,
        })
    }

    /// The square the piece moves from.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// The square the piece moves to.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece kind a pawn should promote to, if one was specified.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns a copy of this [`Move`] with its promotion replaced by `promotion`.
    #[inline(always)]
    pub const fn with_promotion(self, promotion: PieceKind) -> Self {
        Self::new_promotion(self.from, self.to, promotion)
    }

    /// Signed `(rows, cols)` distance travelled by this move.
    #[inline(always)]
    pub const fn delta(&self) -> (i8, i8) {
        (
            self.to.row() as i8 - self.from.row() as i8,
            self.to.col() as i8 - self.from.col() as i8,
        )
    }

    /// Parses a [`Move`] from coordinate notation: origin and destination squares,
    /// followed by an optional promotion letter (`q`, `r`, `b`, `n`).
    ///
    /// # Example
    /// ```
    /// # use chessh::{Move, PieceKind};
    /// let mv = Move::from_uci("e7e8q").unwrap();
    /// assert_eq!(mv.promotion(), Some(PieceKind::Queen));
    ///
    /// assert!(Move::from_uci("e7e8k").is_err());
    /// assert!(Move::from_uci("e7").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            bail!("Move must be 4 or 5 characters, such as \"e2e4\" or \"e7e8q\". Got {uci:?}");
        }

        let from = Square::from_uci(&uci[0..2]).context("Invalid origin square")?;
        let to = Square::from_uci(&uci[2..4]).context("Invalid destination square")?;

        let promotion = match uci.chars().nth(4) {
            Some(c) => {
                let kind = PieceKind::from_uci(c).context("Invalid promotion")?;
                if !kind.is_promotion_target() {
                    bail!("Pawns cannot promote to a {}", kind.name());
                }
                Some(kind)
            }
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }

    /// Converts this [`Move`] to coordinate notation, such as `e7e8q`.
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(promote) = self.promotion {
            write!(f, "{}{}{promote}", self.from, self.to)
        } else {
            write!(f, "{}{}", self.from, self.to)
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_uci().eq(other.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_move_from_uci() {
        let mv = Move::from_uci("a2a4").unwrap();
        assert_eq!(mv.from(), Square::from_uci("a2").unwrap());
        assert_eq!(mv.to(), Square::from_uci("a4").unwrap());
        assert_eq!(mv.promotion(), None);
        assert_eq!(mv.delta(), (-2, 0));

        let mv = Move::from_uci(" b2a1n\n").unwrap();
        assert_eq!(mv.promotion(), Some(PieceKind::Knight));
        assert_eq!(mv, "b2a1n");
    }

    #[test]
    fn test_move_from_uci_rejects_garbage() {
        for bad in ["", "e2", "e2e", "e2e4qq", "z2e4", "e2e9", "e7e8p", "e7e8x", "é2e4"] {
            assert!(Move::from_uci(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_move_from_coords() {
        assert_eq!(Move::from_coords(7, 6, 5, 5, None).unwrap(), "g1f3");
        assert!(Move::from_coords(-1, 0, 0, 0, None).is_none());
        assert!(Move::from_coords(0, 0, 0, 8, None).is_none());
    }
}
