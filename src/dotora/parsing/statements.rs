//! Top-level statement splitting
//!
//! Statement boundaries are line oriented: at parenthesis depth 0, any token at column 0
//! other than `(` starts a new statement. Indented lines, a `(` at column 0 and a line
//! following a dangling `=` or `,` continue the current one. A column-0 `NAME =` always
//! starts a statement, so an empty value (`X=`) cannot swallow the next param.
//! Parenthesis matching is character oriented and spans lines freely.
//!
//! Balance is checked here, over the whole file, with an explicit stack of open
//! parentheses. An unclosed `(` or a stray `)` cannot be attributed to a single
//! statement and fails the whole parse.

use crate::dotora::ast::error::MalformedDescriptor;
use crate::dotora::ast::range::SourceLocation;
use crate::dotora::lexing::{tokenize, SpannedToken, Token};
use std::ops::Range as ByteRange;

/// The significant tokens of one top-level statement
#[derive(Debug, Clone, Default)]
pub struct RawStatement {
    pub tokens: Vec<SpannedToken>,
    /// First span the lexer could not make sense of, if any
    pub invalid: Option<ByteRange<usize>>,
}

impl RawStatement {
    /// Byte range from the first to the last token
    pub fn span(&self) -> ByteRange<usize> {
        let start = self
            .tokens
            .first()
            .map(|(_, s)| s.start)
            .into_iter()
            .chain(self.invalid.as_ref().map(|s| s.start))
            .min()
            .unwrap_or(0);
        let end = self
            .tokens
            .last()
            .map(|(_, s)| s.end)
            .into_iter()
            .chain(self.invalid.as_ref().map(|s| s.end))
            .max()
            .unwrap_or(start);
        start..end
    }
}

/// Whether the next significant token after `from` is `=`
fn assignment_follows(items: &[Result<SpannedToken, ByteRange<usize>>], from: usize) -> bool {
    items[from..]
        .iter()
        .filter_map(|item| item.as_ref().ok())
        .map(|(token, _)| token)
        .find(|token| !token.is_trivia())
        .is_some_and(|token| *token == Token::Equals)
}

/// Split `source` into statements, failing on unbalanced parentheses
pub fn split_statements(
    source: &str,
    locator: &SourceLocation,
) -> Result<Vec<RawStatement>, MalformedDescriptor> {
    let items = tokenize(source);
    let mut statements = Vec::new();
    let mut current: Option<RawStatement> = None;
    let mut open_parens: Vec<ByteRange<usize>> = Vec::new();
    let mut at_line_start = true;
    let mut last_significant: Option<Token> = None;

    for (position, item) in items.iter().enumerate() {
        let continues_previous = matches!(last_significant, Some(Token::Equals | Token::Comma));
        let column_zero = at_line_start && open_parens.is_empty();

        let (token, span) = match item {
            Ok((token, span)) => (token.clone(), span.clone()),
            Err(span) => {
                if current.is_none() || (column_zero && !continues_previous) {
                    if let Some(done) = current.take() {
                        statements.push(done);
                    }
                }
                let statement = current.get_or_insert_with(RawStatement::default);
                statement.invalid.get_or_insert(span.clone());
                at_line_start = false;
                continue;
            }
        };

        match token {
            Token::Newline => {
                at_line_start = true;
                continue;
            }
            Token::Whitespace => {
                at_line_start = false;
                continue;
            }
            Token::Comment => continue,
            _ => {}
        }

        // `NAME =` at column 0 always opens a statement, even after a dangling `=`
        let starts_statement = current.is_none()
            || (column_zero
                && token != Token::OpenParen
                && (!continues_previous
                    || (token.is_text() && assignment_follows(&items, position + 1))));

        if starts_statement {
            if let Some(done) = current.take() {
                statements.push(done);
            }
            current = Some(RawStatement::default());
        }

        match token {
            Token::OpenParen => open_parens.push(span.clone()),
            Token::CloseParen => {
                if open_parens.pop().is_none() {
                    return Err(MalformedDescriptor::new(
                        "unbalanced ')' with no matching '('",
                        locator.byte_to_position(span.start),
                    ));
                }
            }
            _ => {}
        }

        last_significant = Some(token.clone());
        at_line_start = false;
        if let Some(statement) = current.as_mut() {
            statement.tokens.push((token, span));
        }
    }

    if let Some(unclosed) = open_parens.first() {
        return Err(MalformedDescriptor::new(
            format!(
                "unbalanced '(' is never closed ({} open at end of input)",
                open_parens.len()
            ),
            locator.byte_to_position(unclosed.start),
        ));
    }

    if let Some(done) = current {
        statements.push(done);
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dotora::ast::range::Position;

    fn split(source: &str) -> Result<Vec<RawStatement>, MalformedDescriptor> {
        split_statements(source, &SourceLocation::new(source))
    }

    fn first_words(statements: &[RawStatement]) -> Vec<String> {
        statements
            .iter()
            .map(|s| format!("{}", s.tokens[0].0))
            .collect()
    }

    #[test]
    fn test_splits_on_column_zero_words() {
        let source = "A = 1\nB =\n  (X = 2)\n# comment\nC = (Y = 3)\n";
        let statements = split(source).unwrap();
        assert_eq!(first_words(&statements), vec!["`A`", "`B`", "`C`"]);
    }

    #[test]
    fn test_multiline_groups_stay_together() {
        let source = "ORCL =\n  (DESCRIPTION =\n(ADDRESS = (HOST = x))\n)\nNEXT = 1\n";
        let statements = split(source).unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_column_zero_paren_continues_statement() {
        let source = "LISTENER =\n(ADDRESS = (PORT = 1521))\n";
        let statements = split(source).unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_dangling_equals_continues_statement() {
        let source = "NAMES.DEFAULT_DOMAIN =\nexample.com\n";
        assert_eq!(split(source).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_value_does_not_swallow_next_statement() {
        let statements = split("X=\nY=1\nZ =\nvalue\n").unwrap();
        assert_eq!(first_words(&statements), vec!["`X`", "`Y`", "`Z`"]);
        assert_eq!(statements[0].tokens.len(), 2);
        assert_eq!(statements[2].tokens.len(), 3);
    }

    #[test]
    fn test_column_zero_junk_starts_its_own_statement() {
        let statements = split("A = 1\n= junk\n, more\nB = 2\n").unwrap();
        assert_eq!(first_words(&statements), vec!["`A`", "'='", "','", "`B`"]);
        assert_eq!(statements[0].tokens.len(), 3);
    }

    #[test]
    fn test_column_zero_invalid_input_starts_its_own_statement() {
        let statements = split("A = 1\n\"oops\nB = 2\n").unwrap();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].invalid.is_none());
        assert!(statements[1].invalid.is_some());
    }

    #[test]
    fn test_unclosed_paren_is_fatal() {
        let source = "A = 1\nORCL = (DESCRIPTION = (ADDRESS = (HOST = x))\nB = 2\n";
        let err = split(source).unwrap_err();
        assert_eq!(err.position, Position::new(1, 7));
    }

    #[test]
    fn test_stray_close_paren_is_fatal() {
        let err = split("A = 1)\n").unwrap_err();
        assert_eq!(err.position, Position::new(0, 5));
    }

    #[test]
    fn test_invalid_characters_are_attached_to_statement() {
        let statements = split("A = \"unterminated\nB = 2\n").unwrap();
        assert!(statements[0].invalid.is_some());
        assert_eq!(statements.len(), 2);
    }
}
