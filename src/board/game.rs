/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Deref, DerefMut},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};

use super::{Color, Legality, Move, MoveList, PieceKind, Position, Square};

/// Plies without a capture or pawn move after which a draw is offered.
pub const DRAW_OFFER_PLIES: u32 = 100;

/// Plies without a capture or pawn move after which the game is drawn.
pub const FORCED_DRAW_PLIES: u32 = 150;

/// Largest full-move counter accepted in a FEN string.
pub const MAX_FULLMOVE: u32 = u32::MAX / 4;

/// What happened when a move was submitted to [`Game::make_move`].
///
/// [`MoveResult::IllegalMove`] and [`MoveResult::MissingPromotion`] leave the game untouched,
/// and the same side should be asked for another move.
/// Every other variant means the move was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveResult {
    /// The move was played and the game goes on.
    Ok,

    /// The move was rejected.
    IllegalMove,

    /// A pawn reached its last rank without a promotion. Resubmit the same move with one.
    MissingPromotion,

    /// The move was played and checkmated Black.
    WhiteWin,

    /// The move was played and checkmated White.
    BlackWin,

    /// The move was played and the game is drawn, by stalemate or by inactivity.
    ForcedDraw,

    /// The move was played and the game goes on, but it has been long enough since
    /// the last capture or pawn move that the players may agree to a draw.
    DrawOffer,
}

impl MoveResult {
    /// The result of checkmating `winner`'s opponent.
    #[inline(always)]
    pub const fn win_for(winner: Color) -> Self {
        match winner {
            Color::White => Self::WhiteWin,
            Color::Black => Self::BlackWin,
        }
    }

    /// Returns `true` if the move was played.
    #[inline(always)]
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::IllegalMove | Self::MissingPromotion)
    }

    /// Returns `true` if the game is over and no more moves should be made.
    #[inline(always)]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::WhiteWin | Self::BlackWin | Self::ForcedDraw)
    }

    /// The winner of the game, if this result ended it with a checkmate.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::WhiteWin => Some(Color::White),
            Self::BlackWin => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for MoveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Ok => "Ok",
            Self::IllegalMove => "Illegal move",
            Self::MissingPromotion => "Missing promotion",
            Self::WhiteWin => "White wins!",
            Self::BlackWin => "Black wins!",
            Self::ForcedDraw => "It's a draw!",
            Self::DrawOffer => "A draw may be claimed",
        };
        write!(f, "{msg}")
    }
}

/// A game of chess between two players.
///
/// This wraps a [`Position`] with the ply counter that decides whose turn it is and
/// the bookkeeping for the inactivity draw. The side to move is never stored: it is White
/// on even plies and Black on odd ones.
///
/// The only way to advance a game is [`Game::make_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Game {
    /// Piece placements and their movement history.
    position: Position,

    /// Number of plies played so far.
    duration: u32,

    /// The ply at which the last capture or pawn move happened.
    last_big_move: u32,
}

impl Game {
    /// Creates a new [`Game`] in the standard starting position.
    pub fn new() -> Self {
        Self::from_parts(Position::standard(), 0, 0)
    }

    /// Creates a [`Game`] from a position and its clocks.
    ///
    /// `last_big_move` is clamped to be no greater than `duration`.
    pub fn from_parts(position: Position, duration: u32, last_big_move: u32) -> Self {
        Self {
            position,
            duration,
            last_big_move: last_big_move.min(duration),
        }
    }

    /// Creates a new [`Game`] from the provided FEN string.
    ///
    /// FEN has no record of which pieces have moved, so that history is reconstructed:
    /// Kings and Rooks are unmoved only if they back a castling right, any other piece on
    /// its starting square is unmoved, the pawn behind an en passant target has just made
    /// its first move, and every other piece has moved once at some unknown point.
    ///
    /// The full-move counter must leave room for the game to go on, so it may not exceed
    /// [`MAX_FULLMOVE`].
    ///
    /// # Example
    /// ```
    /// # use chessh::{Game, FEN_STARTPOS};
    /// assert_eq!(Game::from_fen(FEN_STARTPOS).unwrap(), Game::new());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_ascii_whitespace();

        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;
        let mut position = Position::from_fen(placements)?;

        let side_to_move = split.next().unwrap_or("w").parse::<Color>()?;
        let castling = split.next().unwrap_or("-");
        let ep_target = split.next().unwrap_or("-");
        let halfmove = split
            .next()
            .unwrap_or("0")
            .parse::<u32>()
            .context("FEN half-move clock must be a non-negative integer")?;
        let fullmove = split
            .next()
            .unwrap_or("1")
            .parse::<u32>()
            .context("FEN full-move counter must be a positive integer")?;
        if fullmove == 0 {
            bail!("FEN full-move counter must be a positive integer");
        }
        if fullmove > MAX_FULLMOVE {
            bail!("FEN full-move counter must be at most {MAX_FULLMOVE}. Found {fullmove}");
        }

        let duration = 2 * (fullmove - 1) + side_to_move.is_black() as u32;

        for color in Color::all() {
            let kings = position
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if kings != 1 {
                bail!("FEN must have exactly one {color} King. Found {kings}");
            }
        }

        // Everything off its starting square has moved before
        let squares = position.pieces().map(|(square, _)| square).collect::<Vec<_>>();
        for square in squares {
            let Some(piece) = position[square].as_mut() else {
                continue;
            };

            if piece.kind == PieceKind::Pawn
                && (square.row() == Color::White.back_row() || square.row() == Color::Black.back_row())
            {
                bail!("FEN has a pawn on its back rank at {square}");
            }

            // Kings and Rooks are left to the castling rights
            let at_home = Position::starting_piece(square)
                .is_some_and(|home| home.is(piece.color, piece.kind));
            if at_home && !matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
                continue;
            }
            piece.moves = 1;
        }

        // Castling rights mark their King and Rook as unmoved
        for right in castling.chars().filter(|&c| c != '-') {
            let color = if right.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let rook_col = match right.to_ascii_lowercase() {
                'k' => 7,
                'q' => 0,
                _ => bail!("Invalid castling right {right:?} in FEN: must be one of [K, Q, k, q]"),
            };

            let row = color.back_row();
            for (col, kind) in [(4, PieceKind::King), (rook_col, PieceKind::Rook)] {
                let square = Square::new(row, col).ok_or(anyhow!("castling square off the board"))?;
                match position[square].as_mut() {
                    Some(piece) if piece.is(color, kind) => piece.moves = 0,
                    _ => bail!(
                        "FEN castling right {right:?} requires a {color} {} on {square}",
                        kind.name()
                    ),
                }
            }
        }

        // The pawn that can be taken en passant has just made its first move
        if ep_target != "-" {
            let target = Square::from_uci(ep_target).context("Invalid en passant square")?;
            let victim_color = side_to_move.opponent();
            let victim = target
                .offset(victim_color.pawn_direction(), 0)
                .ok_or(anyhow!("En passant square {target} is not behind a pawn"))?;

            match position[victim].as_mut() {
                Some(pawn)
                    if pawn.is(victim_color, PieceKind::Pawn)
                        && victim.row() == victim_color.double_push_row() =>
                {
                    pawn.moves = 1;
                    pawn.last_move = Some(duration);
                }
                _ => bail!("En passant square {target} is not behind a {victim_color} pawn"),
            }
        }

        Ok(Self::from_parts(
            position,
            duration,
            duration.saturating_sub(halfmove),
        ))
    }

    /// Generates a FEN string for this game.
    ///
    /// Castling rights are listed for every unmoved King and Rook on their starting squares,
    /// which may include rights that a real game would have lost in other ways.
    pub fn to_fen(&self) -> String {
        let placements = self.position.to_fen();
        let active_color = self.side_to_move().to_uci();

        let mut castling = String::new();
        for color in Color::all() {
            for (col, right) in [(7, 'k'), (0, 'q')] {
                if self.has_castling_pieces(color, col) {
                    castling.push(if color.is_white() {
                        right.to_ascii_uppercase()
                    } else {
                        right
                    });
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant_target = self
            .en_passant_target()
            .map(|square| square.to_string())
            .unwrap_or(String::from("-"));

        let halfmove = self.idle_plies();
        let fullmove = self.duration / 2 + 1;

        format!("{placements} {active_color} {castling} {en_passant_target} {halfmove} {fullmove}")
    }

    /// Returns `true` if `color` has an unmoved King on its starting square and an unmoved Rook in column `col`.
    fn has_castling_pieces(&self, color: Color, col: u8) -> bool {
        let row = color.back_row();
        [(4, PieceKind::King), (col, PieceKind::Rook)]
            .into_iter()
            .all(|(col, kind)| {
                Square::new(row, col)
                    .and_then(|square| self.position.piece_at(square))
                    .is_some_and(|piece| piece.is(color, kind) && piece.is_unmoved())
            })
    }

    /// The square a pawn skipped over on the previous ply, if it advanced two squares.
    pub fn en_passant_target(&self) -> Option<Square> {
        let mover = self.side_to_move().opponent();
        self.position
            .pieces_of(mover)
            .find(|(square, piece)| {
                piece.kind == PieceKind::Pawn
                    && piece.moves == 1
                    && piece.last_move == Some(self.duration)
                    && square.row() == mover.double_push_row()
            })
            .and_then(|(square, _)| square.offset(-mover.pawn_direction(), 0))
    }

    /// The current placement of pieces.
    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Number of plies played so far.
    #[inline(always)]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// The ply at which the last capture or pawn move happened.
    #[inline(always)]
    pub const fn last_big_move(&self) -> u32 {
        self.last_big_move
    }

    /// Number of plies since the last capture or pawn move.
    #[inline(always)]
    pub const fn idle_plies(&self) -> u32 {
        self.duration - self.last_big_move
    }

    /// The [`Color`] whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        Color::from_ply(self.duration)
    }

    /// Moves a piece without checking any rules.
    ///
    /// Does nothing if there is no piece on the origin square.
    /// Otherwise, if `advance_clock` is set, this counts as a new ply. Any piece on the destination
    /// or on `extra_capture` is removed, a pawn reaching its last rank becomes the move's
    /// promotion (if it has one), and `secondary` is then applied without advancing the clock again.
    pub(crate) fn apply(
        &mut self,
        mv: Move,
        extra_capture: Option<Square>,
        secondary: Option<Move>,
        advance_clock: bool,
    ) {
        // Nothing to move
        if self.position.is_empty(mv.from()) {
            return;
        }

        if advance_clock {
            self.duration += 1;
        }

        let is_capture = !self.position.is_empty(mv.to()) || extra_capture.is_some();
        let Some(mut piece) = self.position.take(mv.from()) else {
            return;
        };

        if is_capture || piece.kind == PieceKind::Pawn {
            self.last_big_move = self.duration;
        }

        if let Some(victim) = extra_capture {
            self.position.take(victim);
        }

        if piece.kind == PieceKind::Pawn && mv.to().row() == piece.color.promotion_row() {
            if let Some(promotion) = mv.promotion() {
                piece.kind = promotion;
            }
        }

        piece.moves += 1;
        piece.last_move = Some(self.duration);
        self.position.place(piece, mv.to());

        if let Some(secondary) = secondary {
            self.apply(secondary, None, None, false);
        }
    }

    /// Validates `mv` and, if it obeys the movement rules, plays it.
    ///
    /// If the move would leave the mover's King in check, the game is restored and
    /// [`Legality::Illegal`] is returned.
    fn try_play(&mut self, mv: Move) -> Legality {
        let mover = self.side_to_move();

        let legality = self.validate(mv);
        let Legality::Legal {
            extra_capture,
            secondary,
        } = legality
        else {
            return legality;
        };

        let mut checkpoint = Checkpoint::new(self);
        checkpoint.apply(mv, extra_capture, secondary, true);

        if checkpoint.is_in_check(mover) {
            // Dropping the checkpoint restores the game
            return Legality::Illegal;
        }

        checkpoint.commit();
        legality
    }

    /// Attempts to play `mv`, returning what happened.
    ///
    /// The game is only modified if the returned [`MoveResult`] is accepted
    /// (see [`MoveResult::is_accepted`]).
    ///
    /// # Example
    /// ```
    /// # use chessh::{Game, Move, MoveResult};
    /// let mut game = Game::new();
    /// assert_eq!(game.make_move(Move::from_uci("e2e5").unwrap()), MoveResult::IllegalMove);
    /// assert_eq!(game.make_move(Move::from_uci("e2e4").unwrap()), MoveResult::Ok);
    /// assert_eq!(game.duration(), 1);
    /// ```
    pub fn make_move(&mut self, mv: Move) -> MoveResult {
        let mover = self.side_to_move();

        match self.try_play(mv) {
            Legality::Illegal => {
                debug!("Rejected illegal move {mv} by {mover} at ply {}", self.duration);
                return MoveResult::IllegalMove;
            }
            Legality::MissingPromotion => {
                debug!("Move {mv} by {mover} needs a promotion");
                return MoveResult::MissingPromotion;
            }
            Legality::Legal { .. } => {}
        }

        let result = if self.idle_plies() >= FORCED_DRAW_PLIES {
            MoveResult::ForcedDraw
        } else if self.idle_plies() >= DRAW_OFFER_PLIES {
            MoveResult::DrawOffer
        } else if !self.has_legal_move() {
            if self.is_in_check(mover.opponent()) {
                MoveResult::win_for(mover)
            } else {
                MoveResult::ForcedDraw
            }
        } else {
            MoveResult::Ok
        };

        if result.is_game_over() {
            info!("Game over after {mover} played {mv} at ply {}: {result}", self.duration);
        } else {
            debug!("{mover} played {mv}; now at ply {}", self.duration);
        }

        result
    }

    /// Returns `true` if `mv` can be played by the side to move.
    pub fn is_legal(&self, mv: Move) -> bool {
        let mut copy = *self;
        copy.try_play(mv).is_legal()
    }

    /// Copies `self` and returns a [`Game`] after having applied `mv`, if it is legal.
    ///
    /// Unlike [`Game::make_move`], this does not look for the end of the game.
    pub fn with_move_made(&self, mv: Move) -> Option<Self> {
        let mut copy = *self;
        copy.try_play(mv).is_legal().then_some(copy)
    }

    /// Returns `true` if the side to move has at least one legal move.
    ///
    /// Pawn moves to the last rank are tried with a Queen promotion.
    pub fn has_legal_move(&self) -> bool {
        self.position
            .pieces_of(self.side_to_move())
            .any(|(from, _)| {
                Square::iter()
                    .any(|to| self.is_legal(Move::new_promotion(from, to, PieceKind::Queen)))
            })
    }

    /// Returns every legal move for the side to move.
    ///
    /// A pawn reaching its last rank contributes one move per promotion choice.
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::with_capacity(64);
        for (from, _) in self.position.pieces_of(self.side_to_move()) {
            self.push_legal_moves_from(from, &mut moves);
        }
        moves
    }

    /// Returns every legal move of the piece on `from`, if it belongs to the side to move.
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        self.push_legal_moves_from(from, &mut moves);
        moves
    }

    fn push_legal_moves_from(&self, from: Square, moves: &mut MoveList) {
        for to in Square::iter() {
            let mv = Move::new(from, to);
            match self.validate(mv) {
                Legality::Illegal => {}

                // Every promotion leaves the King equally safe
                Legality::MissingPromotion => {
                    if self.is_legal(mv.with_promotion(PieceKind::Queen)) {
                        moves.extend(PieceKind::PROMOTIONS.map(|kind| mv.with_promotion(kind)));
                    }
                }

                Legality::Legal { .. } => {
                    if self.is_legal(mv) {
                        moves.push(mv);
                    }
                }
            }
        }
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    /// Draws the board from White's perspective, along with the game's counters.
    ///
    /// If the alternate format mode (`#`) was specified, the board is drawn from Black's perspective.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let perspective = if f.alternate() {
            Color::Black
        } else {
            Color::White
        };

        writeln!(f, "{}", self.position.render(perspective))?;
        writeln!(f)?;
        writeln!(f, "       FEN: {}", self.to_fen())?;
        writeln!(f, "      Side: {}", self.side_to_move())?;
        writeln!(f, "       Ply: {}", self.duration)?;
        write!(f, "Idle plies: {}", self.idle_plies())
    }
}

/// A rollback point for speculatively playing moves on a [`Game`].
///
/// The game is restored to the state it was in when the checkpoint was created
/// once the checkpoint is dropped, unless [`Checkpoint::commit`] was called.
struct Checkpoint<'a> {
    game: &'a mut Game,
    snapshot: Game,
    committed: bool,
}

impl<'a> Checkpoint<'a> {
    fn new(game: &'a mut Game) -> Self {
        let snapshot = *game;
        Self {
            game,
            snapshot,
            committed: false,
        }
    }

    /// Keeps every change made through this checkpoint.
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for Checkpoint<'_> {
    type Target = Game;
    fn deref(&self) -> &Self::Target {
        self.game
    }
}

impl DerefMut for Checkpoint<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.game
    }
}

impl Drop for Checkpoint<'_> {
    fn drop(&mut self) {
        if !self.committed {
            *self.game = self.snapshot;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FEN_STARTPOS;

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    fn sq(uci: &str) -> Square {
        Square::from_uci(uci).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.duration(), 0);
        assert_eq!(game.last_big_move(), 0);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.to_fen(), FEN_STARTPOS);
        assert_eq!(game.legal_moves().len(), 20);

        let display = game.to_string();
        assert!(display.starts_with("8| r n b q k b n r"));
        assert!(display.contains("Side: White"));
        assert!(format!("{game:#}").starts_with("1| R N B K Q B N R"));
    }

    #[test]
    fn test_checkpoint_restores_on_drop() {
        let mut game = Game::new();
        let before = game;
        {
            let mut checkpoint = Checkpoint::new(&mut game);
            checkpoint.apply(mv("e2e4"), None, None, true);
            assert_eq!(checkpoint.duration(), 1);
        }
        assert_eq!(game, before);

        let checkpoint = {
            let mut checkpoint = Checkpoint::new(&mut game);
            checkpoint.apply(mv("e2e4"), None, None, true);
            checkpoint
        };
        checkpoint.commit();
        assert_eq!(game.duration(), 1);
    }

    #[test]
    fn test_apply_stamps_history() {
        let mut game = Game::new();
        game.apply(mv("g1f3"), None, None, true);

        let knight = game.position().piece_at(sq("f3")).unwrap();
        assert_eq!(knight.moves, 1);
        assert_eq!(knight.last_move, Some(1));
        assert!(game.position().is_empty(sq("g1")));
        assert_eq!(game.last_big_move(), 0);

        game.apply(mv("e7e5"), None, None, true);
        assert_eq!(game.last_big_move(), 2);
    }

    #[test]
    fn test_apply_from_empty_square_does_nothing() {
        let mut game = Game::new();
        let before = game;

        game.apply(mv("e4e5"), None, None, true);
        assert_eq!(game, before);
        assert_eq!(game.duration(), 0);
    }

    #[test]
    fn test_apply_secondary_does_not_advance_clock() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        game.apply(mv("e1g1"), None, Some(mv("h1f1")), true);

        assert_eq!(game.duration(), 1);
        let rook = game.position().piece_at(sq("f1")).unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert_eq!(rook.last_move, Some(1));
        assert_eq!(
            game.position().piece_at(sq("g1")).map(|piece| piece.kind),
            Some(PieceKind::King)
        );
    }

    #[test]
    fn test_make_move_rejects_self_check() {
        // The e2 Knight is pinned by the e8 Rook
        let mut game = Game::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let before = game;

        assert!(game.validate(mv("e2c3")).is_legal());
        assert_eq!(game.make_move(mv("e2c3")), MoveResult::IllegalMove);
        assert_eq!(game, before);

        assert_eq!(game.make_move(mv("e1d1")), MoveResult::Ok);
    }

    #[test]
    fn test_make_move_missing_promotion_leaves_game_untouched() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = game;

        assert_eq!(game.make_move(mv("a7a8")), MoveResult::MissingPromotion);
        assert_eq!(game, before);

        assert_eq!(game.make_move(mv("a7a8r")), MoveResult::Ok);
        assert_eq!(
            game.position().piece_at(sq("a8")).map(|piece| piece.kind),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn test_promotion_choices_are_enumerated() {
        let game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promotions = game
            .legal_moves_from(sq("a7"))
            .into_iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>();
        assert_eq!(promotions, ["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);
    }

    #[test]
    fn test_stalemate_is_a_draw() {
        let mut game = Game::from_fen("k7/8/8/2Q5/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.make_move(mv("e1d2")), MoveResult::Ok);

        let mut game = Game::from_fen("k7/8/8/2Q5/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.make_move(mv("c5b6")), MoveResult::ForcedDraw);
        assert!(!game.is_in_check(Color::Black));
    }

    #[test]
    fn test_back_rank_mate() {
        let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        assert_eq!(game.make_move(mv("a1a8")), MoveResult::WhiteWin);
    }

    #[test]
    fn test_fen_history_reconstruction() {
        let game =
            Game::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let unmoved = |uci: &str| game.position().piece_at(sq(uci)).unwrap().is_unmoved();

        assert!(unmoved("e1") && unmoved("a1") && unmoved("h8"));
        assert!(unmoved("a2") && unmoved("a7"));
        assert!(!unmoved("d5") && !unmoved("e5") && !unmoved("b4"));
        assert_eq!(game.duration(), 0);
        assert_eq!(game.en_passant_target(), None);
    }

    #[test]
    fn test_fen_en_passant_round_trip() {
        let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
        let mut game = Game::from_fen(fen).unwrap();
        assert_eq!(game.duration(), 5);
        assert_eq!(game.en_passant_target(), Some(sq("e3")));
        assert_eq!(game.to_fen(), fen);

        assert_eq!(game.make_move(mv("d4e3")), MoveResult::Ok);
        assert!(game.position().is_empty(sq("e4")));
        assert_eq!(game.last_big_move(), 6);
    }

    #[test]
    fn test_fen_rejects_bad_setups() {
        assert!(Game::from_fen("").is_err());
        assert!(Game::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K2K w - - 0 1").is_err());
        assert!(Game::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - e3 0 1").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 4294967295").is_err());
        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 2147483648").is_err());
    }

    #[test]
    fn test_fen_largest_fullmove_can_still_be_played() {
        let fen = format!("4k3/8/8/8/8/8/8/4K3 b - - 0 {MAX_FULLMOVE}");
        let mut game = Game::from_fen(&fen).unwrap();
        assert_eq!(game.duration(), 2 * (MAX_FULLMOVE - 1) + 1);

        assert_eq!(game.make_move(mv("e8d8")), MoveResult::Ok);
        assert_eq!(game.make_move(mv("e1d1")), MoveResult::Ok);
        assert_eq!(game.to_fen(), format!("3k4/8/8/8/8/8/8/3K4 b - - 2 {}", MAX_FULLMOVE + 1));
    }

    #[test]
    fn test_fen_startpos_matches_new_game() {
        assert_eq!(Game::from_fen(FEN_STARTPOS).unwrap(), Game::new());

        // Without castling rights, only the Kings and Rooks count as moved
        let game = Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").unwrap();
        for (square, piece) in game.position().pieces() {
            let castles = matches!(piece.kind, PieceKind::King | PieceKind::Rook);
            assert_eq!(piece.is_unmoved(), !castles, "{square}");
        }

        // A Knight that returned home is indistinguishable from one that never left
        let game = Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 2 2").unwrap();
        assert!(game.position().pieces().all(|(_, piece)| piece.is_unmoved()));
    }

    #[test]
    fn test_fen_clocks() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 12 30").unwrap();
        assert_eq!(game.duration(), 59);
        assert_eq!(game.last_big_move(), 47);
        assert_eq!(game.idle_plies(), 12);
        assert_eq!(game.side_to_move(), Color::Black);

        // A clock larger than the game so far is clamped
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 99 1").unwrap();
        assert_eq!(game.last_big_move(), 0);
    }

    #[test]
    fn test_move_result_classification() {
        assert!(MoveResult::Ok.is_accepted());
        assert!(MoveResult::DrawOffer.is_accepted());
        assert!(!MoveResult::DrawOffer.is_game_over());
        assert!(!MoveResult::IllegalMove.is_accepted());
        assert!(!MoveResult::MissingPromotion.is_accepted());
        assert!(MoveResult::ForcedDraw.is_game_over());
        assert_eq!(MoveResult::win_for(Color::Black), MoveResult::BlackWin);
        assert_eq!(MoveResult::WhiteWin.winner(), Some(Color::White));
        assert_eq!(MoveResult::ForcedDraw.winner(), None);
    }
}
