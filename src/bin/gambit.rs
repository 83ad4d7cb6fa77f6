// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_json;

use std::io::{self, BufRead, Write};
use std::process;
use std::time::Instant;

use clap::{App, Arg, ArgMatches, SubCommand};
use gambit::{
    evaluate, handle_click, new_game, perft, reset, Board, ClickOutcome, Color, GameState, Piece,
    Square, TableIndex,
};

static GLYPHS: [[char; 6]; 2] = [
    ['♙', '♘', '♗', '♖', '♕', '♔'],
    ['♟', '♞', '♝', '♜', '♛', '♚'],
];

fn main() {
    env_logger::init();
    let layout_arg = || {
        Arg::with_name("LAYOUT")
            .help("Piece placement, e.g. rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
            .required(true)
            .index(1)
    };
    let side_arg = || {
        Arg::with_name("side")
            .help("Side to move")
            .value_name("SIDE")
            .short("s")
            .long("side")
            .possible_values(&["white", "black"])
            .default_value("white")
            .takes_value(true)
    };

    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a two-player game in the terminal")
                .arg(
                    Arg::with_name("json")
                        .help("Print the game state as JSON after every input")
                        .long("json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves of a piece")
                .arg(layout_arg())
                .arg(
                    Arg::with_name("SQUARE")
                        .help("Square of the piece, e.g. e2")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("Count legal move sequences from a position")
                .arg(layout_arg())
                .arg(side_arg())
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("d")
                        .long("depth")
                        .default_value("3")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("status")
                .about("Report check, checkmate or stalemate for a position")
                .arg(layout_arg())
                .arg(side_arg()),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("moves", Some(matches)) => run_moves(matches),
        ("perft", Some(matches)) => run_perft(matches),
        ("status", Some(matches)) => run_status(matches),
        ("play", Some(matches)) => run_play(matches.is_present("json")),
        _ => run_play(false),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn parse_board(matches: &ArgMatches) -> Board {
    let layout = matches.value_of("LAYOUT").unwrap_or_default();
    match Board::from_layout(layout) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("invalid layout: {}", err);
            process::exit(1);
        }
    }
}

fn parse_side(matches: &ArgMatches) -> Color {
    match matches.value_of("side") {
        Some("black") => Color::Black,
        _ => Color::White,
    }
}

fn run_moves(matches: &ArgMatches) -> io::Result<()> {
    let board = parse_board(matches);
    let square: Square = match matches.value_of("SQUARE").unwrap_or_default().parse() {
        Ok(square) => square,
        Err(err) => {
            eprintln!("invalid square: {}", err);
            process::exit(1);
        }
    };

    println!("{}", board);
    let moves: Vec<_> = board
        .legal_moves(square)
        .iter()
        .map(|dest| dest.to_string())
        .collect();
    println!("{}: {}", square, moves.join(" "));
    Ok(())
}

fn run_perft(matches: &ArgMatches) -> io::Result<()> {
    let board = parse_board(matches);
    let side = parse_side(matches);
    let depth = value_t_or_exit!(matches, "depth", u32);

    println!("layout: {}", board.as_layout());
    println!("side:   {}", side.name());
    println!("depth:  {}", depth);
    println!();
    println!("{}", board);
    for i in 1..=depth {
        let start = Instant::now();
        let results = perft(&board, side, i);
        println!(
            "perft({}) = {} ({} ms)",
            i,
            results,
            start.elapsed().as_millis()
        );
    }

    Ok(())
}

fn run_status(matches: &ArgMatches) -> io::Result<()> {
    let board = parse_board(matches);
    let side = parse_side(matches);
    println!("{}", board);
    println!("{}", evaluate(&board, side));
    Ok(())
}

//
// Terminal presentation layer
//

fn glyph(piece: Piece) -> char {
    GLYPHS[piece.color.as_index()][piece.kind.as_index()]
}

fn render<W: Write>(w: &mut W, board: &Board, state: &GameState) -> io::Result<()> {
    for row in 0..8 {
        write!(w, "{} ", 8 - row)?;
        for col in 0..8 {
            let square = match Square::new(row, col) {
                Some(square) => square,
                None => continue,
            };

            let mark = state.legal_moves().contains(&square);
            let contents = match board.piece_at(square) {
                Some(piece) => glyph(piece),
                None if mark => '·',
                None => ' ',
            };

            if state.selected() == Some(square) {
                write!(w, "[{}]", contents)?;
            } else if mark && board.piece_at(square).is_some() {
                write!(w, "x{} ", contents)?;
            } else {
                write!(w, " {} ", contents)?;
            }
        }

        writeln!(w)?;
    }

    writeln!(w, "   a  b  c  d  e  f  g  h")?;
    for &color in &[Color::White, Color::Black] {
        let captured: String = state.captured(color).iter().map(|&p| glyph(p)).collect();
        writeln!(w, "captured {}: {}", color.name().to_lowercase(), captured)?;
    }

    writeln!(w, "{}", state.status())
}

fn run_play(print_json: bool) -> io::Result<()> {
    let (mut board, mut state) = new_game();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    render(&mut out, &board, &state)?;
    writeln!(out, "enter a square to select or move, 'reset' or 'quit'")?;
    for maybe_line in stdin.lock().lines() {
        let line = maybe_line?;
        let words: Vec<_> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] => break,
            ["reset"] => {
                let (new_board, new_state) = reset();
                board = new_board;
                state = new_state;
            }
            squares => {
                for word in squares {
                    match word.parse::<Square>() {
                        Ok(square) => report(&mut out, handle_click(&mut board, &mut state, square))?,
                        Err(err) => writeln!(out, "invalid square '{}': {}", word, err)?,
                    }
                }
            }
        }

        render(&mut out, &board, &state)?;
        if print_json {
            let snapshot = json!({ "board": board.as_layout(), "state": state });
            writeln!(out, "{}", snapshot)?;
        }
    }

    Ok(())
}

fn report<W: Write>(w: &mut W, outcome: ClickOutcome) -> io::Result<()> {
    match outcome {
        ClickOutcome::Moved {
            from,
            to,
            captured: Some(piece),
            ..
        } => {
            debug!("{}{} captured {:?}", from, to, piece);
            writeln!(w, "{} to {}, captures {}", from, to, glyph(piece))
        }
        ClickOutcome::Moved { from, to, .. } => writeln!(w, "{} to {}", from, to),
        ClickOutcome::Selected(square) => writeln!(w, "selected {}", square),
        ClickOutcome::Deselected => writeln!(w, "selection cleared"),
        ClickOutcome::Ignored => Ok(()),
    }
}
