/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Color, Game, Move, Piece, PieceKind, Square};

/// The verdict of the move validator on a single [`Move`].
///
/// Validation only looks at piece movement; whether the move leaves the mover's own King
/// in check is decided afterwards by [`Game::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legality {
    /// The move breaks the movement rules of the piece, or isn't the mover's piece at all.
    Illegal,

    /// A pawn reached its last rank without saying what to promote to.
    ///
    /// The same coordinates should be resubmitted with a promotion.
    MissingPromotion,

    /// The move obeys the movement rules.
    Legal {
        /// A piece captured somewhere other than the destination square (en passant).
        extra_capture: Option<Square>,

        /// A second move made alongside this one (the Rook's half of castling).
        secondary: Option<Move>,
    },
}

impl Legality {
    /// An ordinary legal move, with no side effects beyond the move itself.
    pub const LEGAL: Self = Self::Legal {
        extra_capture: None,
        secondary: None,
    };

    /// Returns `true` if this is [`Legality::Legal`].
    #[inline(always)]
    pub const fn is_legal(&self) -> bool {
        matches!(self, Self::Legal { .. })
    }

    /// [`Legality::LEGAL`] if `cond` holds, otherwise [`Legality::Illegal`].
    #[inline(always)]
    const fn legal_if(cond: bool) -> Self {
        if cond {
            Self::LEGAL
        } else {
            Self::Illegal
        }
    }
}

/// How much of the rule set validation enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rules {
    /// Every movement rule, including castling and the promotion requirement.
    Full,

    /// Only whether the piece threatens the destination square.
    ///
    /// Castling never threatens anything, the promotion requirement is waived,
    /// and pawns threaten both forward diagonals whether or not anything stands there.
    Threat,
}

impl Game {
    /// Checks `mv` against the movement rules for the side to move.
    ///
    /// This never modifies the game, and it does not consider whether the mover's King
    /// would be left in check.
    ///
    /// # Example
    /// ```
    /// # use chessh::{Game, Legality, Move};
    /// let game = Game::new();
    /// assert_eq!(game.validate(Move::from_uci("g1f3").unwrap()), Legality::LEGAL);
    /// assert_eq!(game.validate(Move::from_uci("g1g3").unwrap()), Legality::Illegal);
    /// ```
    pub fn validate(&self, mv: Move) -> Legality {
        self.validate_as(mv, self.side_to_move(), Rules::Full)
    }

    /// Checks `mv` as though it were `side`'s turn, under `rules`.
    pub(crate) fn validate_as(&self, mv: Move, side: Color, rules: Rules) -> Legality {
        let position = self.position();

        let Some(piece) = position.piece_at(mv.from()) else {
            return Legality::Illegal;
        };

        // Out-of-turn moves
        if piece.color != side {
            return Legality::Illegal;
        }

        // Capturing your own piece, which includes moving to the square you're already on
        if position
            .piece_at(mv.to())
            .is_some_and(|target| target.color == piece.color)
        {
            return Legality::Illegal;
        }

        match piece.kind {
            PieceKind::Rook => Legality::legal_if(self.is_slide(mv, true, false)),
            PieceKind::Knight => Legality::legal_if(is_knight_jump(mv)),
            PieceKind::Bishop => Legality::legal_if(self.is_slide(mv, false, true)),
            PieceKind::Queen => Legality::legal_if(self.is_slide(mv, true, true)),
            PieceKind::King => self.validate_king(mv, piece, rules),
            PieceKind::Pawn => self.validate_pawn(mv, piece, rules),
        }
    }

    /// Returns `true` if `mv` is a straight line along an allowed direction with nothing in between.
    fn is_slide(&self, mv: Move, orthogonal: bool, diagonal: bool) -> bool {
        let (dr, dc) = mv.delta();

        let along_line = (dr == 0) != (dc == 0);
        let along_diagonal = dr != 0 && dr.abs() == dc.abs();
        if !(orthogonal && along_line || diagonal && along_diagonal) {
            return false;
        }

        self.is_path_clear(mv.from(), mv.to(), (dr.signum(), dc.signum()))
    }

    /// Returns `true` if every square strictly between `from` and `to`, walking by `step`, is empty.
    fn is_path_clear(&self, from: Square, to: Square, step: (i8, i8)) -> bool {
        let mut current = from.offset(step.0, step.1);
        while let Some(square) = current {
            if square == to {
                return true;
            }
            if !self.position().is_empty(square) {
                return false;
            }
            current = square.offset(step.0, step.1);
        }

        // Walked off the board without reaching `to`
        false
    }

    fn validate_king(&self, mv: Move, king: Piece, rules: Rules) -> Legality {
        let (dr, dc) = mv.delta();

        if dr.abs() <= 1 && dc.abs() <= 1 {
            return Legality::LEGAL;
        }

        if rules == Rules::Threat || dr != 0 || dc.abs() != 2 || !king.is_unmoved() {
            return Legality::Illegal;
        }

        self.validate_castle(mv, king, dc.signum())
    }

    /// Castling: the first piece found walking from the King towards `step` must be
    /// an unmoved friendly Rook, and the King may not start on, pass through, or land on
    /// an attacked square.
    fn validate_castle(&self, mv: Move, king: Piece, step: i8) -> Legality {
        let from = mv.from();

        let mut current = from.offset(0, step);
        while let Some(square) = current {
            if !self.position().is_empty(square) {
                break;
            }
            current = square.offset(0, step);
        }

        let Some(rook_square) = current else {
            return Legality::Illegal;
        };
        let is_unmoved_rook = self
            .position()
            .piece_at(rook_square)
            .is_some_and(|rook| rook.is(king.color, PieceKind::Rook) && rook.is_unmoved());
        if !is_unmoved_rook {
            return Legality::Illegal;
        }

        // En passant threats are not considered
        let Some(transit) = from.offset(0, step) else {
            return Legality::Illegal;
        };
        if [from, transit, mv.to()]
            .into_iter()
            .any(|square| self.is_attacked(square, king.color))
        {
            return Legality::Illegal;
        }

        Legality::Legal {
            extra_capture: None,
            secondary: Some(Move::new(rook_square, transit)),
        }
    }

    fn validate_pawn(&self, mv: Move, pawn: Piece, rules: Rules) -> Legality {
        let position = self.position();
        let dir = pawn.color.pawn_direction();
        let (dr, dc) = mv.delta();

        if rules == Rules::Threat {
            return Legality::legal_if(dr == dir && dc.abs() == 1);
        }

        let outcome = if dc == 0 {
            // Forward moves never capture
            let Some(one_step) = mv.from().offset(dir, 0) else {
                return Legality::Illegal;
            };

            if !position.is_empty(one_step) {
                Legality::Illegal
            } else if mv.to() == one_step {
                Legality::LEGAL
            } else {
                Legality::legal_if(
                    dr == 2 * dir && pawn.is_unmoved() && position.is_empty(mv.to()),
                )
            }
        } else if dc.abs() == 1 && dr == dir {
            if position.piece_at(mv.to()).is_some() {
                Legality::LEGAL
            } else {
                self.validate_en_passant(mv, pawn)
            }
        } else {
            Legality::Illegal
        };

        if outcome.is_legal() && mv.to().row() == pawn.color.promotion_row() {
            match mv.promotion() {
                Some(kind) if kind.is_promotion_target() => outcome,
                _ => Legality::MissingPromotion,
            }
        } else {
            outcome
        }
    }

    /// A diagonal step onto an empty square captures the enemy pawn beside the mover,
    /// but only on the ply right after that pawn advanced two squares.
    fn validate_en_passant(&self, mv: Move, pawn: Piece) -> Legality {
        let enemy = pawn.color.opponent();
        let (_, dc) = mv.delta();

        let Some(victim_square) = mv.from().offset(0, dc) else {
            return Legality::Illegal;
        };

        let is_fresh_double_push = self.position().piece_at(victim_square).is_some_and(|victim| {
            victim.is(enemy, PieceKind::Pawn)
                && victim.moves == 1
                && victim.last_move == Some(self.duration())
                && victim_square.row() == enemy.double_push_row()
        });

        if is_fresh_double_push {
            Legality::Legal {
                extra_capture: Some(victim_square),
                secondary: None,
            }
        } else {
            Legality::Illegal
        }
    }
}

/// Returns `true` if `mv` is an L-shaped jump.
#[inline(always)]
fn is_knight_jump(mv: Move) -> bool {
    let (dr, dc) = mv.delta();
    matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1))
}

#[cfg(test)]
mod test {
    use super::*;

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    fn sq(uci: &str) -> Square {
        Square::from_uci(uci).unwrap()
    }

    fn game_after(moves: &[&str]) -> Game {
        let mut game = Game::new();
        for uci in moves {
            assert!(game.make_move(mv(uci)).is_accepted(), "{uci} was rejected");
        }
        game
    }

    #[test]
    fn test_opening_moves() {
        let game = Game::new();
        assert!(game.validate(mv("e2e4")).is_legal());
        assert!(game.validate(mv("e2e3")).is_legal());
        assert!(game.validate(mv("b1c3")).is_legal());
        assert_eq!(game.validate(mv("e2e5")), Legality::Illegal);
        assert_eq!(game.validate(mv("f1c4")), Legality::Illegal);
        assert_eq!(game.validate(mv("a1a3")), Legality::Illegal);
        assert_eq!(game.validate(mv("d1d3")), Legality::Illegal);
        assert_eq!(game.validate(mv("e1e2")), Legality::Illegal);
    }

    #[test]
    fn test_wrong_side_and_empty_square() {
        let game = Game::new();
        assert_eq!(game.validate(mv("e7e5")), Legality::Illegal);
        assert_eq!(game.validate(mv("e4e5")), Legality::Illegal);
        assert_eq!(game.validate(mv("e2e2")), Legality::Illegal);
    }

    #[test]
    fn test_validate_has_no_side_effects() {
        let game = game_after(&["e2e4", "d7d5"]);
        let before = game;
        for uci in ["e4d5", "e4e5", "g1f3", "e1e2", "a2a5"] {
            let first = game.validate(mv(uci));
            assert_eq!(first, game.validate(mv(uci)));
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_sliders() {
        let game = Game::from_fen("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1").unwrap();
        for uci in ["d4d8", "d4a4", "d4h8", "d4a1", "d4g1", "d4d1"] {
            assert!(game.validate(mv(uci)).is_legal(), "{uci}");
        }
        for uci in ["d4e6", "d4c1", "d4h5"] {
            assert_eq!(game.validate(mv(uci)), Legality::Illegal, "{uci}");
        }

        let game = Game::from_fen("4k3/8/8/8/1p1R4/8/8/4K3 w - - 0 1").unwrap();
        assert!(game.validate(mv("d4b4")).is_legal());
        assert_eq!(game.validate(mv("d4a4")), Legality::Illegal);
        assert_eq!(game.validate(mv("d4e5")), Legality::Illegal);
    }

    #[test]
    fn test_knight_jumps() {
        let game = Game::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let jumps = Square::iter()
            .filter(|&to| game.validate(Move::new(sq("d4"), to)).is_legal())
            .count();
        assert_eq!(jumps, 8);
    }

    #[test]
    fn test_pawn_double_push_blocked() {
        let game = Game::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(game.validate(mv("e2e3")), Legality::Illegal);
        assert_eq!(game.validate(mv("e2e4")), Legality::Illegal);

        let game = Game::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(game.validate(mv("e2e3")).is_legal());
        assert_eq!(game.validate(mv("e2e4")), Legality::Illegal);
    }

    #[test]
    fn test_pawn_captures() {
        let game = game_after(&["e2e4", "d7d5"]);
        assert!(game.validate(mv("e4d5")).is_legal());
        assert_eq!(game.validate(mv("e4f5")), Legality::Illegal);
        assert_eq!(game.validate(mv("e4d3")), Legality::Illegal);
    }

    #[test]
    fn test_en_passant_window() {
        let game = game_after(&["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert_eq!(
            game.validate(mv("e5d6")),
            Legality::Legal {
                extra_capture: Some(sq("d5")),
                secondary: None
            }
        );

        // One ply later, the chance is gone
        let game = game_after(&["e2e4", "a7a6", "e4e5", "d7d5", "g1f3", "a6a5"]);
        assert_eq!(game.validate(mv("e5d6")), Legality::Illegal);
    }

    #[test]
    fn test_en_passant_needs_a_double_push() {
        // d7d6 then d6d5 is two moves; the d5 pawn's move count is not 1
        let game = game_after(&["e2e4", "d7d6", "e4e5", "a7a6", "h2h3", "d6d5"]);
        assert_eq!(game.validate(mv("e5d6")), Legality::Illegal);
    }

    #[test]
    fn test_missing_promotion() {
        let game = Game::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.validate(mv("a7a8")), Legality::MissingPromotion);
        assert!(game.validate(mv("a7a8q")).is_legal());
        assert!(game.validate(mv("a7b8n")).is_legal());
        assert_eq!(game.validate(mv("a7b8")), Legality::MissingPromotion);
        assert_eq!(
            game.validate(Move::new_promotion(sq("a7"), sq("a8"), PieceKind::King)),
            Legality::MissingPromotion
        );
        // A geometry failure is reported as such, not as a missing promotion
        assert_eq!(game.validate(mv("a7c8")), Legality::Illegal);
    }

    #[test]
    fn test_castling_geometry() {
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            game.validate(mv("e1g1")),
            Legality::Legal {
                extra_capture: None,
                secondary: Some(mv("h1f1"))
            }
        );
        assert_eq!(
            game.validate(mv("e1c1")),
            Legality::Legal {
                extra_capture: None,
                secondary: Some(mv("a1d1"))
            }
        );
        assert_eq!(game.validate(mv("e1b1")), Legality::Illegal);
    }

    #[test]
    fn test_castling_blocked_or_rights_lost() {
        // Knight on b1 blocks the long castle even though the King never crosses b1
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        assert_eq!(game.validate(mv("e1c1")), Legality::Illegal);
        assert!(game.validate(mv("e1g1")).is_legal());

        // No kingside right means the h1 Rook counts as moved
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1").unwrap();
        assert_eq!(game.validate(mv("e1g1")), Legality::Illegal);
        assert!(game.validate(mv("e1c1")).is_legal());
    }

    #[test]
    fn test_castling_through_attack() {
        // Black Rook on f8 covers f1
        let game = Game::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(game.validate(mv("e1g1")), Legality::Illegal);
        assert!(game.validate(mv("e1c1")).is_legal());

        // Out of check only
        let game = Game::from_fen("4k3/4r3/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(game.validate(mv("e1g1")), Legality::Illegal);
        assert_eq!(game.validate(mv("e1c1")), Legality::Illegal);

        // A Rook attacking b1 does not stop the long castle
        let game = Game::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(game.validate(mv("e1c1")).is_legal());
    }

    #[test]
    fn test_pawn_threats_block_castling() {
        // The pawn on e2 threatens f1 and d1, but not e1 itself
        let game = Game::from_fen("4k3/8/8/8/8/8/4p3/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(game.validate(mv("e1g1")), Legality::Illegal);
        assert_eq!(game.validate(mv("e1c1")), Legality::Illegal);

        // A pawn directly in front of f1 threatens e1 and g1
        let game = Game::from_fen("4k3/8/8/8/8/8/5p2/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(game.validate(mv("e1g1")), Legality::Illegal);
    }
}
