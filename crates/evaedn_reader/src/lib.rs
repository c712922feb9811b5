//! Lexer, grammar rules and parse entry points for the eva notation.
//!
//! This crate provides:
//! - [`Grammar`] - Prioritized literal rules and collection delimiters
//! - [`Lexer`] - Tokenization of notation text against a grammar
//! - [`Reader`] - Reduction of a text to exactly one element
//! - [`ReaderConfig`] - Nesting and input size limits

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod rules;
pub mod span;
pub mod token;

pub use config::ReaderConfig;
pub use grammar::{CollectionProcessor, Grammar, PrimitiveProcessor, Priority};
pub use lexer::Lexer;
pub use parser::{Reader, parse, parse_collection};
pub use span::Span;
pub use token::{Token, TokenKind};
