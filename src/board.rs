// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};

use crate::move_generator::{self, SquareVec};
use crate::types::{Color, Piece, PieceKind, Square, TableIndex, BOARD_SIZE, COLORS};

/// Possible errors that can arise when parsing a piece layout into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    RowDoesNotSumToEight,
    UnknownPiece(char),
    TooManyRows,
    DuplicateKing(Color),
}

impl fmt::Display for LayoutParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutParseError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            LayoutParseError::UnexpectedEnd => write!(f, "layout ended early"),
            LayoutParseError::InvalidDigit => write!(f, "empty-square counts must be 1 to 8"),
            LayoutParseError::RowDoesNotSumToEight => write!(f, "row does not sum to eight"),
            LayoutParseError::UnknownPiece(c) => write!(f, "unknown piece '{}'", c),
            LayoutParseError::TooManyRows => write!(f, "layout has more than eight rows"),
            LayoutParseError::DuplicateKing(color) => {
                write!(f, "{} has more than one king", color.name())
            }
        }
    }
}

impl Error for LayoutParseError {}

static BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 grid of optional pieces. Boards are small `Copy` values; hypothetical positions are
/// explored on a copy rather than by mutating and restoring the live board.
///
/// Boards serialize as their layout string and are validated like `from_layout` on the way in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

//
// Board state getters
//

impl Board {
    pub const fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting layout, Black on rows 0 and 1 and White on rows 6 and 7.
    pub fn starting() -> Board {
        let mut board = Board::empty();
        for &color in COLORS.iter() {
            let home = color.home_row() as usize;
            let pawns = color.pawn_row() as usize;
            for col in 0..BOARD_SIZE as usize {
                board.squares[home][col] = Some(Piece::new(BACK_ROW[col], color));
                board.squares[pawns][col] = Some(Piece::new(PieceKind::Pawn, color));
            }
        }

        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row() as usize][square.col() as usize]
    }

    /// Iterates the occupied squares holding pieces of the given color.
    pub fn pieces<'a>(&'a self, color: Color) -> impl Iterator<Item = (Square, Piece)> + 'a {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// Locates the king of the given color. Returns `None` if that color has no king, which is
    /// only possible for hand-built positions.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        Square::all().find(|&sq| self.piece_at(sq) == Some(king))
    }
}

//
// Move application and board manipulation
//

impl Board {
    /// Clears a square, returning whatever was on it.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.row() as usize][square.col() as usize].take()
    }

    /// Moves the piece on `from` to `to`, returning the piece that was captured on `to`, if any.
    ///
    /// The move is not checked for legality; callers are expected to have drawn `to` from
    /// `legal_moves(from)`. Moving from an empty square leaves the board untouched.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving_piece = match self.remove_piece(from) {
            Some(piece) => piece,
            None => {
                warn!("apply_move from empty square {}", from);
                return None;
            }
        };

        let captured = self.remove_piece(to);
        self.squares[to.row() as usize][to.col() as usize] = Some(moving_piece);
        captured
    }
}

//
// Board analysis (attack detection, check detection and legality)
//

impl Board {
    /// Returns whether any piece of color `by` has a pseudo-legal move onto `target`.
    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        self.pieces(by)
            .any(|(sq, _)| move_generator::generate(self, sq, by).contains(&target))
    }

    /// Returns whether the king of the given color is attacked. A color without a king is never
    /// in check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_attacked(king, color.toggle()),
            None => false,
        }
    }

    /// Returns the legal destinations for the piece on `square`: its pseudo-legal moves, minus
    /// any that would leave its own king attacked.
    pub fn legal_moves(&self, square: Square) -> SquareVec {
        let piece = match self.piece_at(square) {
            Some(piece) => piece,
            None => return SquareVec::new(),
        };

        let mut moves = move_generator::generate(self, square, piece.color);
        moves.retain(|&mut dest| {
            let mut scratch = *self;
            scratch.apply_move(square, dest);
            let legal = !scratch.is_check(piece.color);
            if !legal {
                trace!("{}{} rejected: leaves king in check", square, dest);
            }

            legal
        });

        moves
    }

    /// Returns whether the given color has at least one legal move. Stops at the first piece
    /// with a move.
    pub fn has_legal_moves(&self, color: Color) -> bool {
        self.pieces(color)
            .any(|(sq, _)| !self.legal_moves(sq).is_empty())
    }

    pub fn all_legal_moves(&self, color: Color) -> Vec<(Square, Square)> {
        let mut moves = Vec::new();
        for (sq, _) in self.pieces(color) {
            moves.extend(self.legal_moves(sq).into_iter().map(|dest| (sq, dest)));
        }

        moves
    }
}

//
// Layout parsing and generation.
//
// A layout is the piece-placement field of FEN: rows from row 0 (rank 8) downwards, separated
// by '/', with digits standing for runs of empty squares.
//

impl Board {
    pub fn from_layout<S: AsRef<str>>(layout: S) -> Result<Board, LayoutParseError> {
        let mut board = Board::empty();
        let mut kings = [0u32; 2];
        let mut rows = layout.as_ref().trim().split('/');
        for row in 0..BOARD_SIZE {
            let text = rows.next().ok_or(LayoutParseError::UnexpectedEnd)?;
            let mut col = 0u8;
            for c in text.chars() {
                if col >= BOARD_SIZE {
                    return Err(LayoutParseError::RowDoesNotSumToEight);
                }

                // digits 1 through 8 indicate empty squares.
                if let Some(value) = c.to_digit(10) {
                    if value < 1 || value > 8 {
                        return Err(LayoutParseError::InvalidDigit);
                    }

                    col += value as u8;
                    continue;
                }

                if !c.is_ascii_alphabetic() {
                    return Err(LayoutParseError::UnexpectedChar(c));
                }

                let piece = Piece::try_from(c).map_err(|_| LayoutParseError::UnknownPiece(c))?;
                if piece.kind == PieceKind::King {
                    kings[piece.color.as_index()] += 1;
                    if kings[piece.color.as_index()] > 1 {
                        return Err(LayoutParseError::DuplicateKing(piece.color));
                    }
                }

                board.squares[row as usize][col as usize] = Some(piece);
                col += 1;
            }

            if col != BOARD_SIZE {
                return Err(LayoutParseError::RowDoesNotSumToEight);
            }
        }

        if rows.next().is_some() {
            return Err(LayoutParseError::TooManyRows);
        }

        Ok(board)
    }

    pub fn as_layout(&self) -> String {
        let mut buf = String::new();
        for row in 0..BOARD_SIZE as usize {
            let mut empty_squares = 0;
            for col in 0..BOARD_SIZE as usize {
                if let Some(piece) = self.squares[row][col] {
                    if empty_squares != 0 {
                        buf.push_str(&empty_squares.to_string());
                    }
                    buf.push_str(&piece.to_string());
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                buf.push_str(&empty_squares.to_string());
            }

            if row != BOARD_SIZE as usize - 1 {
                buf.push('/');
            }
        }

        buf
    }
}

//
// Trait implementations
//

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_SIZE as usize {
            for col in 0..BOARD_SIZE as usize {
                if let Some(piece) = self.squares[row][col] {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", BOARD_SIZE as usize - row)?;
        }

        for _ in 0..BOARD_SIZE {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in b'a'..=b'h' {
            write!(f, " ")?;
            f.write_char(file as char)?;
            write!(f, " ")?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_layout())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Board, D::Error> {
        let layout = String::deserialize(deserializer)?;
        Board::from_layout(layout).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::move_generator;
    use crate::types::{Color, PieceKind, Square};

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn sorted(moves: impl IntoIterator<Item = Square>) -> Vec<Square> {
        let mut moves: Vec<_> = moves.into_iter().collect();
        moves.sort();
        moves
    }

    #[test]
    fn check_smoke() {
        let board = Board::from_layout("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert!(board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));
    }

    #[test]
    fn check_blocked_by_pawn() {
        let board = Board::from_layout("8/8/4q3/8/8/8/4P3/4K3").unwrap();
        assert!(!board.is_check(Color::White));
    }

    #[test]
    fn no_king_is_not_check() {
        let board = Board::from_layout("8/8/4q3/8/8/8/8/8").unwrap();
        assert!(!board.is_check(Color::White));
        assert!(!board.is_check(Color::Black));
    }

    #[test]
    fn knight_attacks() {
        let board = Board::from_layout("8/8/8/8/8/5n2/8/4K3").unwrap();
        assert!(board.is_attacked(sq("e1"), Color::Black));
        assert!(board.is_check(Color::White));
    }

    #[test]
    fn pawn_attacks_diagonally() {
        let board = Board::from_layout("8/8/8/8/8/8/3p4/4K3").unwrap();
        assert!(board.is_check(Color::White));

        let board = Board::from_layout("8/8/8/8/8/8/4p3/4K3").unwrap();
        assert!(!board.is_check(Color::White));
    }

    #[test]
    fn starting_legal_move_counts() {
        let board = Board::starting();
        for (square, piece) in board.pieces(Color::White).chain(board.pieces(Color::Black)) {
            let expected = match piece.kind {
                PieceKind::Pawn | PieceKind::Knight => 2,
                _ => 0,
            };
            assert_eq!(
                expected,
                board.legal_moves(square).len(),
                "{:?} on {}",
                piece,
                square
            );
        }

        assert_eq!(20, board.all_legal_moves(Color::White).len());
        assert_eq!(20, board.all_legal_moves(Color::Black).len());
    }

    #[test]
    fn legal_moves_are_repeatable() {
        let board = Board::from_layout("r3k3/8/8/3pP3/8/2N5/8/4K2R").unwrap();
        for (square, _) in board.pieces(Color::White) {
            assert_eq!(board.legal_moves(square), board.legal_moves(square));
        }
    }

    #[test]
    fn legal_moves_empty_square() {
        assert!(Board::starting().legal_moves(sq("e4")).is_empty());
    }

    #[test]
    fn pinned_bishop_cannot_move() {
        let board = Board::from_layout("k3r3/8/8/8/8/8/4B3/4K3").unwrap();
        assert!(!move_generator::generate(&board, sq("e2"), Color::White).is_empty());
        assert!(board.legal_moves(sq("e2")).is_empty());
    }

    #[test]
    fn pinned_rook_stays_on_line() {
        let board = Board::from_layout("k3r3/8/8/8/8/8/4R3/4K3").unwrap();
        assert_eq!(
            sorted(vec![sq("e3"), sq("e4"), sq("e5"), sq("e6"), sq("e7"), sq("e8")]),
            sorted(board.legal_moves(sq("e2")))
        );
    }

    #[test]
    fn king_cannot_step_into_check() {
        let board = Board::from_layout("k7/8/8/8/8/8/r7/4K3").unwrap();
        assert_eq!(
            sorted(vec![sq("d1"), sq("f1")]),
            sorted(board.legal_moves(sq("e1")))
        );
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let board = Board::from_layout("k7/8/8/8/8/8/3q4/3rK3").unwrap();
        assert!(board.legal_moves(sq("e1")).is_empty());
    }

    #[test]
    fn check_must_be_answered() {
        // the only legal replies are blocking on the e-file or moving the king aside.
        let board = Board::from_layout("k3r3/8/8/8/8/8/3N4/3QK3").unwrap();
        assert!(board.is_check(Color::White));
        assert!(board.legal_moves(sq("d2")).contains(&sq("e4")));
        assert_eq!(1, board.legal_moves(sq("d2")).len());
        assert_eq!(
            sorted(vec![sq("e2")]),
            sorted(board.legal_moves(sq("d1")))
        );
        assert_eq!(
            sorted(vec![sq("f1"), sq("f2")]),
            sorted(board.legal_moves(sq("e1")))
        );
    }

    #[test]
    fn legal_moves_do_not_mutate() {
        let board = Board::from_layout("k3r3/8/8/8/8/8/4R3/4K3").unwrap();
        let before = board;
        let _ = board.legal_moves(sq("e2"));
        let _ = board.has_legal_moves(Color::White);
        assert_eq!(before, board);
    }

    mod layout {
        use crate::board::{Board, LayoutParseError};
        use crate::types::{Color, Piece, PieceKind, Square};

        #[test]
        fn starting_layout() {
            let board = Board::starting();
            assert_eq!(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
                board.as_layout()
            );
            assert_eq!(
                board,
                Board::from_layout("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap()
            );
        }

        #[test]
        fn starting_pieces() {
            let board = Board::starting();
            let check_square = |name: &str, piece: Piece| {
                let square: Square = name.parse().unwrap();
                assert_eq!(Some(piece), board.piece_at(square), "square {}", name);
            };

            check_square("a1", Piece::new(PieceKind::Rook, Color::White));
            check_square("b1", Piece::new(PieceKind::Knight, Color::White));
            check_square("c1", Piece::new(PieceKind::Bishop, Color::White));
            check_square("d1", Piece::new(PieceKind::Queen, Color::White));
            check_square("e1", Piece::new(PieceKind::King, Color::White));
            check_square("h2", Piece::new(PieceKind::Pawn, Color::White));
            check_square("a7", Piece::new(PieceKind::Pawn, Color::Black));
            check_square("d8", Piece::new(PieceKind::Queen, Color::Black));
            check_square("e8", Piece::new(PieceKind::King, Color::Black));
            check_square("h8", Piece::new(PieceKind::Rook, Color::Black));

            for row in 2..6 {
                for col in 0..8 {
                    assert!(board.piece_at(Square::new(row, col).unwrap()).is_none());
                }
            }

            assert_eq!(16, board.pieces(Color::White).count());
            assert_eq!(16, board.pieces(Color::Black).count());
        }

        #[test]
        fn empty() {
            assert_eq!(
                LayoutParseError::UnexpectedEnd,
                Board::from_layout("8/8/8").unwrap_err()
            );
        }

        #[test]
        fn unknown_piece() {
            assert_eq!(
                LayoutParseError::UnknownPiece('z'),
                Board::from_layout("z7/8/8/8/8/8/8/8").unwrap_err()
            );
        }

        #[test]
        fn invalid_digit() {
            assert_eq!(
                LayoutParseError::InvalidDigit,
                Board::from_layout("09/8/8/8/8/8/8/8").unwrap_err()
            );
        }

        #[test]
        fn not_sum_to_8() {
            assert_eq!(
                LayoutParseError::RowDoesNotSumToEight,
                Board::from_layout("7/8/8/8/8/8/8/8").unwrap_err()
            );
            assert_eq!(
                LayoutParseError::RowDoesNotSumToEight,
                Board::from_layout("8p/8/8/8/8/8/8/8").unwrap_err()
            );
        }

        #[test]
        fn too_many_rows() {
            assert_eq!(
                LayoutParseError::TooManyRows,
                Board::from_layout("8/8/8/8/8/8/8/8/8").unwrap_err()
            );
        }

        #[test]
        fn duplicate_king() {
            assert_eq!(
                LayoutParseError::DuplicateKing(Color::Black),
                Board::from_layout("k6k/8/8/8/8/8/8/8").unwrap_err()
            );
        }

        #[test]
        fn unexpected_char() {
            assert_eq!(
                LayoutParseError::UnexpectedChar('-'),
                Board::from_layout("-7/8/8/8/8/8/8/8").unwrap_err()
            );
        }

        #[test]
        fn serializes_as_layout() {
            let board = Board::from_layout("k7/8/8/8/8/8/8/K7").unwrap();
            let json = serde_json::to_string(&board).unwrap();
            assert_eq!("\"k7/8/8/8/8/8/8/K7\"", json);
            assert_eq!(board, serde_json::from_str::<Board>(&json).unwrap());
        }

        #[test]
        fn deserialize_rejects_duplicate_king() {
            let err = serde_json::from_str::<Board>("\"k7/8/8/8/8/8/8/K6K\"").unwrap_err();
            assert!(err.to_string().contains("White has more than one king"));
        }

        #[test]
        fn deserialize_rejects_bad_layout() {
            assert!(serde_json::from_str::<Board>("\"8/8/8\"").is_err());
            assert!(serde_json::from_str::<Board>("[[null]]").is_err());
        }
    }

    mod apply {
        use crate::board::Board;
        use crate::types::{Color, Piece, PieceKind, Square};

        fn sq(name: &str) -> Square {
            name.parse().unwrap()
        }

        #[test]
        fn quiet_move() {
            let mut board = Board::starting();
            assert_eq!(None, board.apply_move(sq("e2"), sq("e4")));
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::White)),
                board.piece_at(sq("e4"))
            );
            assert!(board.piece_at(sq("e2")).is_none());
        }

        #[test]
        fn basic_capture() {
            let mut board = Board::from_layout("8/8/8/8/5p2/4P3/8/8").unwrap();
            let captured = board.apply_move(sq("e3"), sq("f4"));
            assert_eq!(Some(Piece::new(PieceKind::Pawn, Color::Black)), captured);
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::White)),
                board.piece_at(sq("f4"))
            );
            assert!(board.piece_at(sq("e3")).is_none());
        }

        #[test]
        fn from_empty_square_is_noop() {
            let mut board = Board::starting();
            assert_eq!(None, board.apply_move(sq("e4"), sq("e5")));
            assert_eq!(Board::starting(), board);
        }

        #[test]
        fn remove_piece() {
            let mut board = Board::starting();
            let rook = Piece::new(PieceKind::Rook, Color::White);
            assert_eq!(Some(rook), board.remove_piece(sq("a1")));
            assert_eq!(None, board.remove_piece(sq("a1")));
            assert_eq!(15, board.pieces(Color::White).count());
        }
    }
}
