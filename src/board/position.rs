/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use anyhow::{bail, Result};

use super::{Color, Piece, PieceKind, Square, BOARD_SIZE};

/// Piece placements of the standard starting position, in FEN notation.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back rank layout, from the `a` file to the `h` file.
const BACK_RANK: [PieceKind; BOARD_SIZE as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 grid of squares, each of which is empty or holds one [`Piece`].
///
/// This type has no notion of whose turn it is or of any rules; see [`crate::Game`] for that.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Position {
    /// Creates an empty [`Position`], with no pieces on it.
    ///
    /// Unlike [`Position::default`], this does not set up the standard starting position.
    /// Use [`Position::standard`] for that.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Creates the standard starting [`Position`], with every piece unmoved.
    pub fn standard() -> Self {
        let mut position = Self::new();

        for color in Color::all() {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                position.squares[color.back_row() as usize][col] = Some(Piece::new(color, kind));
                position.squares[color.pawn_row() as usize][col] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }

        position
    }

    /// The [`Piece`] standing on `square` in the standard starting position, if any.
    ///
    /// # Example
    /// ```
    /// # use chessh::{Color, Piece, PieceKind, Position, Square};
    /// let d8 = Square::from_uci("d8").unwrap();
    /// assert_eq!(Position::starting_piece(d8), Some(Piece::new(Color::Black, PieceKind::Queen)));
    ///
    /// let e4 = Square::from_uci("e4").unwrap();
    /// assert_eq!(Position::starting_piece(e4), None);
    /// ```
    pub fn starting_piece(square: Square) -> Option<Piece> {
        Color::all().into_iter().find_map(|color| {
            if square.row() == color.back_row() {
                Some(Piece::new(color, BACK_RANK[square.col() as usize]))
            } else if square.row() == color.pawn_row() {
                Some(Piece::new(color, PieceKind::Pawn))
            } else {
                None
            }
        })
    }

    /// Fetches the [`Piece`] at `square`, if there is one.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self[square]
    }

    /// Returns `true` if no piece occupies `square`.
    #[inline(always)]
    pub fn is_empty(&self, square: Square) -> bool {
        self[square].is_none()
    }

    /// Places `piece` on `square`, replacing whatever was there.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self[square] = Some(piece);
    }

    /// Removes and returns the piece on `square`, if there is one.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self[square].take()
    }

    /// An iterator over every occupied square and the piece on it.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self[square].map(|piece| (square, piece)))
    }

    /// An iterator over every square occupied by a piece of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// The number of pieces on the board.
    pub fn occupied(&self) -> usize {
        self.pieces().count()
    }

    /// Locates the King of `color`.
    ///
    /// Returns `None` if there isn't one, which only happens in hand-built positions.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(square, _)| square)
    }

    /// Parses the piece placement field of a FEN string.
    ///
    /// Every piece is created unmoved; movement history is reconstructed by [`crate::Game::from_fen`].
    ///
    /// # Example
    /// ```
    /// # use chessh::Position;
    /// let position = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
    /// assert_eq!(position, Position::standard());
    /// ```
    pub fn from_fen(placements: &str) -> Result<Self> {
        let mut position = Self::new();
        let rows = placements.split('/').collect::<Vec<_>>();
        if rows.len() != BOARD_SIZE as usize {
            bail!(
                "FEN placements must have {BOARD_SIZE} ranks separated by '/'. Got {}",
                rows.len()
            );
        }

        for (row, placement) in rows.into_iter().enumerate() {
            let mut col = 0;
            for c in placement.chars() {
                if let Some(empty) = c.to_digit(10) {
                    col += empty as usize;
                    continue;
                }

                let piece = Piece::from_uci(c)?;
                let Some(square) = Square::new(row, col) else {
                    bail!("Rank {:?} of FEN has more than {BOARD_SIZE} files", placement);
                };
                position.place(piece, square);
                col += 1;
            }

            if col != BOARD_SIZE as usize {
                bail!(
                    "Rank {:?} of FEN must cover exactly {BOARD_SIZE} files. Got {col}",
                    placement
                );
            }
        }

        Ok(position)
    }

    /// Generates the piece placement field of a FEN string for this position.
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(64);

        for (row, squares) in self.squares.iter().enumerate() {
            let mut empty = 0;
            for occupant in squares {
                if let Some(piece) = occupant {
                    if empty > 0 {
                        placements += &empty.to_string();
                        empty = 0;
                    }
                    placements.push(piece.char());
                } else {
                    empty += 1;
                }
            }

            if empty > 0 {
                placements += &empty.to_string();
            }
            if row + 1 < BOARD_SIZE as usize {
                placements.push('/');
            }
        }

        placements
    }

    /// Renders this position as seen by `perspective`, with that color's pieces at the bottom.
    pub fn render(&self, perspective: Color) -> String {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        let rows = (0..BOARD_SIZE).collect::<Vec<_>>();
        let cols = (0..BOARD_SIZE).collect::<Vec<_>>();
        let (rows, cols): (Vec<_>, Vec<_>) = match perspective {
            Color::White => (rows, cols),
            Color::Black => (rows.into_iter().rev().collect(), cols.into_iter().rev().collect()),
        };

        for &row in &rows {
            board.push((b'8' - row) as char);
            board += "| ";

            for &col in &cols {
                let occupant = Square::new(row, col)
                    .and_then(|square| self.piece_at(square))
                    .map(|piece| piece.char())
                    .unwrap_or('.');

                board.push(occupant);
                board.push(' ');
            }

            board += "\n";
        }
        board += " +";
        for _ in &cols {
            board += "--";
        }
        board += "\n   ";
        for &col in &cols {
            board.push((b'a' + col) as char);
            board.push(' ');
        }

        board
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, square: Square) -> &Self::Output {
        &self.squares[square.row() as usize][square.col() as usize]
    }
}

impl IndexMut<Square> for Position {
    #[inline(always)]
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.squares[square.row() as usize][square.col() as usize]
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Position {
    /// Draws the board from White's perspective.
    ///
    /// If the alternate format mode (`#`) was specified, the board is drawn from Black's perspective.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let perspective = if f.alternate() {
            Color::Black
        } else {
            Color::White
        };
        write!(f, "{}", self.render(perspective))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_standard_position() {
        let position = Position::standard();
        assert_eq!(position.occupied(), 32);
        assert_eq!(position.pieces_of(Color::White).count(), 16);
        assert_eq!(position.pieces_of(Color::Black).count(), 16);

        let e1 = Square::from_uci("e1").unwrap();
        let d8 = Square::from_uci("d8").unwrap();
        assert_eq!(position.king_square(Color::White), Some(e1));
        assert_eq!(
            position.piece_at(d8),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert!(position.pieces().all(|(_, piece)| piece.is_unmoved()));
    }

    #[test]
    fn test_new_is_empty() {
        assert_eq!(Position::new().occupied(), 0);
        assert_eq!(Position::default(), Position::standard());
        assert_ne!(Position::new(), Position::default());
    }

    #[test]
    fn test_starting_pieces_match_standard_position() {
        let standard = Position::standard();
        for square in Square::iter() {
            assert_eq!(Position::starting_piece(square), standard.piece_at(square), "{square}");
        }
    }

    #[test]
    fn test_fen_placements() {
        let placements = FEN_STARTPOS.split(' ').next().unwrap();
        let position = Position::from_fen(placements).unwrap();
        assert_eq!(position, Position::standard());
        assert_eq!(position.to_fen(), placements);

        let sparse = "4k3/8/8/3Q4/8/8/8/4K3";
        assert_eq!(Position::from_fen(sparse).unwrap().to_fen(), sparse);
    }

    #[test]
    fn test_fen_placements_rejects_bad_input() {
        assert!(Position::from_fen("8/8/8/8/8/8/8").is_err());
        assert!(Position::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Position::from_fen("ppppppppp/8/8/8/8/8/8/8").is_err());
        assert!(Position::from_fen("7/8/8/8/8/8/8/8").is_err());
        assert!(Position::from_fen("x7/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn test_render_perspective() {
        let position = Position::standard();
        let white = position.to_string();
        let black = format!("{position:#}");

        assert!(white.starts_with("8| r n b q k b n r"));
        assert!(white.ends_with("a b c d e f g h "));
        assert!(black.starts_with("1| R N B K Q B N R"));
        assert!(black.ends_with("h g f e d c b a "));
    }
}
