// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation. Generators look at piece placement only; they do not consider
//! whether the move would leave the mover's own king attacked. That filtering is done by
//! `Board::legal_moves`.
use arrayvec::ArrayVec;

use crate::attacks::{self, Offset, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::board::Board;
use crate::types::{Color, PieceKind, Square};

/// Destination squares for a single piece. A queen in the middle of an empty board reaches 27
/// squares, the most of any piece.
pub type SquareVec = ArrayVec<[Square; 32]>;

/// Generates the pseudo-legal destinations for the piece on `square`, moving as `color`. Returns
/// an empty set if the square is empty.
pub fn generate(board: &Board, square: Square, color: Color) -> SquareVec {
    let mut moves = SquareVec::new();
    let piece = match board.piece_at(square) {
        Some(piece) => piece,
        None => return moves,
    };

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, square, color, &mut moves),
        PieceKind::Knight => step_moves(board, attacks::knight_steps(square), color, &mut moves),
        PieceKind::Bishop => ray_walk(board, square, color, &BISHOP_DIRECTIONS, &mut moves),
        PieceKind::Rook => ray_walk(board, square, color, &ROOK_DIRECTIONS, &mut moves),
        PieceKind::Queen => ray_walk(board, square, color, &QUEEN_DIRECTIONS, &mut moves),
        PieceKind::King => step_moves(board, attacks::king_steps(square), color, &mut moves),
    }

    moves
}

fn pawn_moves(board: &Board, square: Square, color: Color, moves: &mut SquareVec) {
    let forward = color.forward();

    // Pushes only land on empty squares. The double push additionally requires the square
    // being jumped over to be empty.
    if let Some(one) = square.offset(forward, 0) {
        if board.piece_at(one).is_none() {
            moves.push(one);
            if square.row() == color.pawn_row() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.piece_at(two).is_none() {
                        moves.push(two);
                    }
                }
            }
        }
    }

    // Diagonal steps are only moves when they capture.
    for &d_col in &[-1, 1] {
        if let Some(target) = square.offset(forward, d_col) {
            match board.piece_at(target) {
                Some(piece) if piece.color != color => moves.push(target),
                _ => {}
            }
        }
    }
}

fn step_moves(board: &Board, steps: &[Square], color: Color, moves: &mut SquareVec) {
    for &target in steps {
        match board.piece_at(target) {
            Some(piece) if piece.color == color => {}
            _ => moves.push(target),
        }
    }
}

/// Walks outward from `square` along each direction. Empty squares are destinations and the
/// walk continues; an enemy piece is a destination and ends the walk; a friendly piece ends
/// the walk without being included.
fn ray_walk(
    board: &Board,
    square: Square,
    color: Color,
    directions: &[Offset],
    moves: &mut SquareVec,
) {
    for &(d_row, d_col) in directions {
        let mut cursor = square.offset(d_row, d_col);
        while let Some(target) = cursor {
            match board.piece_at(target) {
                None => moves.push(target),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(target);
                    }
                    break;
                }
            }

            cursor = target.offset(d_row, d_col);
        }
    }
}
