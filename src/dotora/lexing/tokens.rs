//! Token definitions for the dot-ora format
//!
//! The tokens are defined using the logos derive macro. The grammar is small: parentheses
//! delimit groups, `=` binds a key to its value, `,` separates list items (and is tolerated
//! between sibling groups), and anything else is a word or a quoted string.
use logos::Logos;
use serde::Serialize;

/// All possible tokens in a dot-ora file
#[derive(Logos, Debug, PartialEq, Eq, Clone, Serialize)]
pub enum Token {
    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("=")]
    Equals,

    #[token(",")]
    Comma,

    #[token("\n")]
    Newline,

    // Carriage returns are folded into whitespace so CRLF files lex like LF files
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[regex(r"#[^\n]*")]
    Comment,

    // Quoted strings never span lines
    #[regex(r#""[^"\n]*""#, |lex| lex.slice().to_string())]
    #[regex(r"'[^'\n]*'", |lex| lex.slice().to_string())]
    Quoted(String),

    // A `#` only starts a comment at the beginning of a word
    #[regex(r#"[^\s()=,"'#][^\s()=,"']*"#, |lex| lex.slice().to_string())]
    Word(String),
}

impl Token {
    /// Whitespace, newlines and comments carry no meaning for the tree
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Newline | Token::Comment)
    }

    /// Words and quoted strings: the tokens that make up keys and scalar values
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Quoted(_))
    }

    /// The source text of a text token
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Word(s) | Token::Quoted(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenParen => write!(f, "'('"),
            Token::CloseParen => write!(f, "')'"),
            Token::Equals => write!(f, "'='"),
            Token::Comma => write!(f, "','"),
            Token::Newline => write!(f, "end of line"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Comment => write!(f, "comment"),
            Token::Quoted(s) | Token::Word(s) => write!(f, "`{}`", s),
        }
    }
}
