//! Lexing stage
//!
//!     The lexer turns source text into `(Token, byte span)` pairs. Everything above this
//!     stage (statement splitting, tree building) works on that stream and never looks at
//!     raw characters again, except to decide whether two tokens were adjacent in the
//!     source.

pub mod base_tokenization;
pub mod tokens;

pub use base_tokenization::{tokenize, SpannedToken};
pub use tokens::Token;
