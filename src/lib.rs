//! Chess rules core: bitboards, strictly legal move generation, FEN and
//! SAN codecs.
//!
//! Positions are immutable values. Raw FEN text parses into an
//! unvalidated [`Setup`]; validating it yields a [`Position`], and every
//! move application returns a fresh position.
//!
//! # Quick Start
//!
//! ```
//! use chess_rules::{Move, Position};
//!
//! let pos = Position::new();
//! assert_eq!(pos.legal_moves().len(), 20);
//!
//! let pos = pos.play(&Move::from_uci("e2e4").unwrap()).unwrap();
//! assert_eq!(pos.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
//! ```
//!
//! # Loading Positions
//!
//! ```
//! use chess_rules::{fen, Position};
//!
//! let setup = fen::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
//! let pos = Position::from_setup(&setup).unwrap();
//! assert!(!pos.is_check());
//! ```
//!
//! # Reading and Writing Moves
//!
//! ```
//! use chess_rules::Position;
//!
//! let pos = Position::new();
//! let m = pos.parse_san("Nf3").unwrap();
//! assert_eq!(m.uci(), "g1f3");
//! assert_eq!(pos.to_san(&m), "Nf3");
//! ```
//!
//! # Features
//!
//! - `serde` - Enable serialization for `Piece`, `Color`, `Square`, `Bitboard`, `CastlingSide`, and `Move`
//! - `logging` - Enable optional debug logging via the `log` crate

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Bitboard hex literals are clearer without separators (bit patterns visible)
#![allow(clippy::unreadable_literal)]
// Index casts are ubiquitous and safe in chess (board indices, square indices)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod attacks;
mod board;
mod castles;
pub mod error;
pub mod fen;
mod movegen;
pub mod perft;
mod position;
mod san;
mod setup;
mod types;


pub use board::Board;
pub use castles::Castles;
pub use error::{FenError, MoveParseError, PlayError, PositionError, SquareError};
pub use movegen::Context;
pub use position::{Outcome, Position, Rules, ValidationMode};
pub use san::{make_san, parse_san};
pub use setup::{RemainingChecks, Setup};
pub use types::{Bitboard, BitboardIter, CastlingSide, Color, Move, Piece, Square};
