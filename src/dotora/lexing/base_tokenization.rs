//! Base tokenization implementation for the dot-ora lexer
//!
//! This module provides the raw tokenization using the logos lexer library.
//! This is the entry point where source strings become token streams.

use crate::dotora::lexing::tokens::Token;
use logos::Logos;

/// A token paired with its byte range in the source
pub type SpannedToken = (Token, logos::Span);

/// Tokenize source code with location information
///
/// Characters logos cannot match (an unterminated quote, for instance) are returned as
/// `Err` spans so the statement splitter can report them against the statement they
/// belong to instead of silently dropping them.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, logos::Span>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(Ok((token, lexer.span()))),
            Err(()) => tokens.push(Err(lexer.span())),
        }
    }

    tokens
}
