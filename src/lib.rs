// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rules engine for a two-player chess game played on one device. The engine knows piece
//! movement, check, checkmate and stalemate; castling, en passant and promotion are not part
//! of its rule set. Rendering and input are left to the caller, which owns the `Board` and
//! `GameState` and passes them into every call.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod attacks;
mod board;
pub mod game;
pub mod move_generator;
mod perft;
mod status;
mod types;

pub use board::{Board, LayoutParseError};
pub use game::{
    handle_click, new_game, reset, select_square, try_move, ClickOutcome, GameState,
    MoveOutcome, RejectReason,
};
pub use move_generator::SquareVec;
pub use perft::perft;
pub use status::{evaluate, Outcome, Status};
pub use types::{Color, Piece, PieceKind, Square, SquareParseError, TableIndex, COLORS, PIECE_KINDS};
