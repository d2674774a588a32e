//! Descriptor tree building
//!
//! Turns the significant tokens of one statement into an attribute tree.
//!
//! Grammar:
//!
//!     statement := NAME "=" value
//!     value     := scalar | list | "()" | group+
//!     group     := "(" KEY "=" value ")"
//!     list      := "(" item ("," item)* ")"
//!     scalar    := (WORD | QUOTED | ",")*
//!
//! Sibling groups may be adjacent or separated by commas. Nesting is handled with an
//! explicit stack of open frames, so deeply nested input cannot exhaust the call stack.

use crate::dotora::ast::node::{AttributeNode, NodeValue};
use crate::dotora::lexing::{SpannedToken, Token};
use std::ops::Range as ByteRange;

/// Why a statement could not be turned into a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementError {
    pub message: String,
    pub span: ByteRange<usize>,
}

impl StatementError {
    fn new(message: impl Into<String>, span: ByteRange<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

struct Cursor<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [SpannedToken]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<&'a SpannedToken> {
        let item = self.tokens.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    /// Span used when the input ends early
    fn end_span(&self) -> ByteRange<usize> {
        let end = self.tokens.last().map(|(_, s)| s.end).unwrap_or(0);
        end..end
    }

    fn expect(&mut self, expected: &Token, context: &str) -> Result<(), StatementError> {
        match self.next() {
            Some((token, _)) if token == expected => Ok(()),
            Some((token, span)) => Err(StatementError::new(
                format!("expected {} {}, found {}", expected, context, token),
                span.clone(),
            )),
            None => Err(StatementError::new(
                format!("expected {} {}, found end of statement", expected, context),
                self.end_span(),
            )),
        }
    }

    fn expect_word(&mut self, context: &str) -> Result<&'a str, StatementError> {
        match self.next() {
            Some((Token::Word(word), _)) => Ok(word),
            Some((token, span)) => Err(StatementError::new(
                format!("expected a name {}, found {}", context, token),
                span.clone(),
            )),
            None => Err(StatementError::new(
                format!("expected a name {}, found end of statement", context),
                self.end_span(),
            )),
        }
    }

    /// `(` followed by an item and then `,` or `)`: a bare value list
    fn at_list(&self) -> bool {
        matches!(self.peek_nth(0), Some(Token::OpenParen))
            && self.peek_nth(1).is_some_and(Token::is_text)
            && matches!(self.peek_nth(2), Some(Token::Comma | Token::CloseParen))
    }

    /// `()`: an empty group
    fn at_empty_group(&self) -> bool {
        matches!(self.peek_nth(0), Some(Token::OpenParen))
            && matches!(self.peek_nth(1), Some(Token::CloseParen))
    }
}

/// Collect text tokens (and commas) up to the next structural token. Tokens that were
/// separated by whitespace in the source are joined with a single space.
fn scalar_text(cursor: &mut Cursor<'_>) -> String {
    let mut text = String::new();
    let mut previous_end: Option<usize> = None;

    while let Some((token, span)) = cursor.peek() {
        let piece = match token {
            Token::Word(s) | Token::Quoted(s) => s.as_str(),
            Token::Comma => ",",
            _ => break,
        };
        if previous_end.is_some_and(|end| span.start > end) {
            text.push(' ');
        }
        text.push_str(piece);
        previous_end = Some(span.end);
        cursor.next();
    }

    text
}

/// `(A, B C, D)` normalized to `(A, B C, D)`
fn list_text(cursor: &mut Cursor<'_>) -> Result<String, StatementError> {
    cursor.expect(&Token::OpenParen, "to open the value list")?;
    let mut items = Vec::new();
    loop {
        let mut item = String::new();
        let mut previous_end: Option<usize> = None;
        while let Some((token, span)) = cursor.peek() {
            let Some(piece) = token.text() else { break };
            if previous_end.is_some_and(|end| span.start > end) {
                item.push(' ');
            }
            item.push_str(piece);
            previous_end = Some(span.end);
            cursor.next();
        }
        items.push(item);

        match cursor.next() {
            Some((Token::Comma, _)) => continue,
            Some((Token::CloseParen, _)) => break,
            Some((token, span)) => {
                return Err(StatementError::new(
                    format!("unexpected {} in value list", token),
                    span.clone(),
                ))
            }
            None => {
                return Err(StatementError::new(
                    "value list is not closed",
                    cursor.end_span(),
                ))
            }
        }
    }
    Ok(format!("({})", items.join(", ")))
}

struct Frame<'a> {
    key: &'a str,
    children: Vec<AttributeNode>,
}

/// Parse a value that ends where the token slice ends
fn parse_value(cursor: &mut Cursor<'_>) -> Result<NodeValue, StatementError> {
    let value = match cursor.peek() {
        None => NodeValue::Scalar(String::new()),
        Some((Token::OpenParen, _)) if cursor.at_empty_group() => {
            cursor.next();
            cursor.next();
            NodeValue::empty_group()
        }
        Some((Token::OpenParen, _)) if cursor.at_list() => NodeValue::Scalar(list_text(cursor)?),
        Some((Token::OpenParen, _)) => NodeValue::Group(parse_groups(cursor)?),
        Some(_) => NodeValue::Scalar(scalar_text(cursor)),
    };

    match cursor.next() {
        None => Ok(value),
        Some((token, span)) => Err(StatementError::new(
            format!("unexpected {} after value", token),
            span.clone(),
        )),
    }
}

/// Parse a run of sibling groups until the token slice ends
fn parse_groups(cursor: &mut Cursor<'_>) -> Result<Vec<AttributeNode>, StatementError> {
    let mut top: Vec<AttributeNode> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    fn attach(top: &mut Vec<AttributeNode>, stack: &mut [Frame<'_>], node: AttributeNode) {
        match stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => top.push(node),
        }
    }

    while let Some((token, span)) = cursor.next() {
        match token {
            Token::Comma => {}
            Token::OpenParen => {
                let key = cursor.expect_word("after '('")?;
                cursor.expect(&Token::Equals, &format!("after `{}`", key))?;

                if cursor.at_empty_group() {
                    cursor.next();
                    cursor.next();
                    cursor.expect(&Token::CloseParen, &format!("to close `{}`", key))?;
                    attach(&mut top, &mut stack, AttributeNode::new(key, NodeValue::empty_group()));
                } else if cursor.at_list() {
                    let list = list_text(cursor)?;
                    cursor.expect(&Token::CloseParen, &format!("to close `{}`", key))?;
                    attach(&mut top, &mut stack, AttributeNode::scalar(key, list));
                } else if matches!(cursor.peek(), Some((Token::OpenParen, _))) {
                    stack.push(Frame {
                        key,
                        children: Vec::new(),
                    });
                } else {
                    let text = scalar_text(cursor);
                    cursor.expect(&Token::CloseParen, &format!("to close `{}`", key))?;
                    attach(&mut top, &mut stack, AttributeNode::scalar(key, text));
                }
            }
            Token::CloseParen => {
                let frame = stack.pop().ok_or_else(|| {
                    StatementError::new("unexpected ')' with no open group", span.clone())
                })?;
                let node = AttributeNode::group(frame.key, frame.children);
                attach(&mut top, &mut stack, node);
            }
            other => {
                return Err(StatementError::new(
                    format!("unexpected {} between groups", other),
                    span.clone(),
                ))
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(StatementError::new(
            format!("group `{}` is not closed", frame.key),
            cursor.end_span(),
        ));
    }

    Ok(top)
}

/// Build the tree of a `NAME = value` statement
pub fn build_statement(tokens: &[SpannedToken]) -> Result<AttributeNode, StatementError> {
    let mut cursor = Cursor::new(tokens);
    let name = cursor.expect_word("at the start of the statement")?;
    cursor.expect(&Token::Equals, &format!("after `{}`", name))?;
    let value = parse_value(&mut cursor)?;
    Ok(AttributeNode::new(name, value))
}

/// Build a bare value (the right-hand side of a statement)
pub fn build_value(tokens: &[SpannedToken]) -> Result<NodeValue, StatementError> {
    parse_value(&mut Cursor::new(tokens))
}
