//! Parsing stage
//!
//!     Parsing runs in two passes over the token stream:
//!
//!     1. [`statements`] splits the file into top-level statements and checks
//!        parenthesis balance for the whole file. Imbalance is fatal.
//!     2. [`descriptor`] builds one attribute tree per statement. A statement that fails
//!        here is skipped and reported as a warning; the rest of the file still parses.

pub mod descriptor;
pub mod statements;

use crate::dotora::ast::error::{MalformedDescriptor, PathError};
use crate::dotora::ast::node::NodeValue;
use crate::dotora::ast::param::Param;
use crate::dotora::ast::range::SourceLocation;
use crate::dotora::lexing::{tokenize, Token};
use tracing::{debug, warn};

/// Params in file order plus the non-fatal anomalies met on the way
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub params: Vec<Param>,
    pub warnings: Vec<String>,
}

/// Parse the full text of a dot-ora file
pub fn parse(source: &str) -> Result<ParseOutput, MalformedDescriptor> {
    let locator = SourceLocation::new(source);
    let statements = statements::split_statements(source, &locator)?;

    let mut output = ParseOutput::default();
    for statement in &statements {
        let range = locator.byte_range_to_range(&statement.span());

        if let Some(invalid) = &statement.invalid {
            let warning = format!(
                "line {}: unrecognized input `{}`; statement skipped",
                locator.byte_to_position(invalid.start).line + 1,
                source.get(invalid.clone()).unwrap_or_default().trim()
            );
            warn!("{}", warning);
            output.warnings.push(warning);
            continue;
        }

        match descriptor::build_statement(&statement.tokens) {
            Ok(root) => {
                if root.key_matches("IFILE") {
                    let warning = format!(
                        "line {}: IFILE directive is kept but the included file is not followed",
                        range.start.line + 1
                    );
                    warn!("{}", warning);
                    output.warnings.push(warning);
                }
                let index = output.params.len();
                output.params.push(Param::new(root.key, root.value, index).at(range));
            }
            Err(e) => {
                let position = locator.byte_to_position(e.span.start);
                let warning = format!(
                    "line {}, column {}: {}; statement skipped",
                    position.line + 1,
                    position.column + 1,
                    e.message
                );
                warn!("{}", warning);
                output.warnings.push(warning);
            }
        }
    }

    debug!(
        params = output.params.len(),
        warnings = output.warnings.len(),
        "parsed dot-ora source"
    );
    Ok(output)
}

/// Parse the right-hand side of a statement on its own, as handed to
/// [`DotOraFile::upsert_alias`](crate::dotora::editing::DotOraFile::upsert_alias).
/// Any problem, including a garbled value, is a [`MalformedDescriptor`].
pub fn parse_value(text: &str) -> Result<NodeValue, MalformedDescriptor> {
    let locator = SourceLocation::new(text);
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    for item in tokenize(text) {
        let (token, span) = item.map_err(|span| {
            MalformedDescriptor::new(
                format!("unrecognized input `{}`", &text[span.clone()]),
                locator.byte_to_position(span.start),
            )
        })?;
        if token.is_trivia() {
            continue;
        }
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    MalformedDescriptor::new(
                        "unbalanced ')' with no matching '('",
                        locator.byte_to_position(span.start),
                    )
                })?;
            }
            _ => {}
        }
        tokens.push((token, span));
    }

    if depth > 0 {
        return Err(MalformedDescriptor::new(
            "unbalanced '(' is never closed",
            locator.byte_to_position(text.len()),
        ));
    }

    descriptor::build_value(&tokens)
        .map_err(|e| MalformedDescriptor::new(e.message, locator.byte_to_position(e.span.start)))
}

/// A key must lex as exactly one word, so it reads back as the same key
pub fn check_key(key: &str) -> Result<(), PathError> {
    match tokenize(key).as_slice() {
        [Ok((Token::Word(word), _))] if word == key => Ok(()),
        _ => Err(PathError::InvalidKey {
            key: key.to_string(),
        }),
    }
}

/// A scalar must parse back to exactly itself: unquoted `(`, `)`, `=`, a leading `#`
/// or irregular whitespace would change the file's structure once written.
pub fn check_scalar(text: &str) -> Result<(), PathError> {
    match parse_value(text) {
        Ok(NodeValue::Scalar(parsed)) if parsed == text => Ok(()),
        _ => Err(PathError::InvalidValue {
            value: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dotora::ast::range::Position;

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let output = parse("A = 1\nORCL = (X = 1)\nB = 2\norcl = (X = 2)\n").unwrap();
        let names: Vec<_> = output.params.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["A", "ORCL", "B", "orcl"]);
        let indexes: Vec<_> = output.params.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_garbled_statement_gives_one_warning() {
        let output = parse("A = 1\nTHIS IS NOT A STATEMENT\nB = (X = 2)\n").unwrap();
        let names: Vec<_> = output.params.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].starts_with("line 2, column 6:"));
    }

    #[test]
    fn test_junk_line_does_not_take_previous_statement() {
        let output = parse("A = 1\n= junk\nB = 2\n").unwrap();
        let names: Vec<_> = output.params.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].starts_with("line 2, column 1:"));
    }

    #[test]
    fn test_empty_top_level_value_keeps_next_param() {
        let output = parse("X=\nY=1\n").unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(output.params.len(), 2);
        assert_eq!(output.params[0].value(), &NodeValue::Scalar(String::new()));
        assert_eq!(output.params[1].value(), &NodeValue::Scalar("1".into()));
    }

    #[test]
    fn test_unbalanced_file_is_fatal() {
        let err = parse("A = 1\nB = (X = (Y = 2)\n").unwrap_err();
        assert_eq!(err.position, Position::new(1, 4));
    }

    #[test]
    fn test_ifile_is_kept_with_warning() {
        let output = parse("IFILE = /u01/app/oracle/network/admin/common.ora\n").unwrap();
        assert_eq!(output.params.len(), 1);
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("IFILE"));
    }

    #[test]
    fn test_locations_are_recorded() {
        let output = parse("A = 1\n\nB =\n  (X = 2)\n").unwrap();
        let location = output.params[1].location.clone().unwrap();
        assert_eq!(location.start, Position::new(2, 0));
        assert_eq!(location.end, Position::new(3, 9));
    }

    #[test]
    fn test_parse_value() {
        let value = parse_value("(DESCRIPTION = (ADDRESS = (HOST = x)))").unwrap();
        assert!(value.is_group());
        assert_eq!(parse_value("ON").unwrap(), NodeValue::Scalar("ON".into()));
        assert!(parse_value("(A = 1").is_err());
        assert!(parse_value("(A 1)").is_err());
    }

    #[test]
    fn test_check_key() {
        assert!(check_key("SERVICE_NAME").is_ok());
        assert!(check_key("NAMES.DIRECTORY_PATH").is_ok());
        for key in ["", "A(B", "A=B", "A B", "#A", "\"A\""] {
            assert_eq!(
                check_key(key),
                Err(PathError::InvalidKey { key: key.to_string() }),
                "{key}"
            );
        }
    }

    #[test]
    fn test_check_scalar() {
        for value in ["db01", "", "a b", "(TNSNAMES, EZCONNECT)", "\"CN=x, O=y\"", "x,y"] {
            assert!(check_scalar(value).is_ok(), "{value}");
        }
        for value in ["b)", "(b", "x #y", "a=b", "a  b", "()", "(A = 1)", "a\nb"] {
            assert!(check_scalar(value).is_err(), "{value}");
        }
    }
}
