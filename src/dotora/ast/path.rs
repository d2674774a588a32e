//! Attribute paths
//!
//! A path is a sequence of keys walked from a param's root: `DESCRIPTION.ADDRESS.HOST`.
//! Segments may carry a zero-based index among same-key siblings: `ADDRESS[1].HOST`
//! picks the second `ADDRESS` group. Without an index the first match wins.
//!
//! Paths containing `/` are split on `/` instead (`DESCRIPTION/ADDRESS/HOST`), which
//! lets keys that contain dots be addressed. A path prints back with the separator it
//! was parsed with.
//!
//! Keys follow the lexer's word rule: no whitespace, parentheses, `=`, `,` or quotes,
//! and no leading `#`.

use super::error::PathError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([^\[\]\s()=,"'#][^\[\]\s()=,"']*)\s*(?:\[\s*(\d+)\s*\])?\s*$"#)
        .expect("segment regex is valid")
});

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: String,
    pub index: Option<usize>,
}

impl Segment {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Position among same-key siblings
    pub fn nth(&self) -> usize {
        self.index.unwrap_or(0)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.key, index),
            None => write!(f, "{}", self.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPath {
    segments: Vec<Segment>,
    separator: char,
}

impl AttrPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let separator = if path.contains('/') { '/' } else { '.' };
        let segments = path
            .split(separator)
            .map(|raw| {
                let captures = SEGMENT
                    .captures(raw)
                    .ok_or_else(|| PathError::InvalidSegment {
                        path: path.to_string(),
                        segment: raw.to_string(),
                    })?;
                let mut segment = Segment::new(&captures[1]);
                if let Some(index) = captures.get(2) {
                    let index = index
                        .as_str()
                        .parse()
                        .map_err(|_| PathError::InvalidSegment {
                            path: path.to_string(),
                            segment: raw.to_string(),
                        })?;
                    segment = segment.with_index(index);
                }
                Ok(segment)
            })
            .collect::<Result<Vec<_>, PathError>>()?;

        Ok(Self {
            segments,
            separator,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The last segment and everything before it. Never fails: a path has at least one
    /// segment.
    pub fn split_last(&self) -> (&Segment, &[Segment]) {
        let (last, parents) = self
            .segments
            .split_last()
            .unwrap_or_else(|| unreachable!("AttrPath is never empty"));
        (last, parents)
    }
}

impl FromStr for AttrPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_path() {
        let path = AttrPath::parse("DESCRIPTION.ADDRESS.HOST").unwrap();
        let keys: Vec<_> = path.segments().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["DESCRIPTION", "ADDRESS", "HOST"]);
        assert!(path.segments().iter().all(|s| s.index.is_none()));
    }

    #[test]
    fn test_indexed_segment() {
        let path = AttrPath::parse("DESCRIPTION.ADDRESS[1].PORT").unwrap();
        assert_eq!(path.segments()[1], Segment::new("ADDRESS").with_index(1));
        assert_eq!(path.to_string(), "DESCRIPTION.ADDRESS[1].PORT");
    }

    #[test]
    fn test_slash_separator_keeps_dots_in_keys() {
        let path = AttrPath::parse("SECURITY/SSL.VERSION").unwrap();
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.segments()[1].key, "SSL.VERSION");
        assert_eq!(path.to_string(), "SECURITY/SSL.VERSION");
        assert_eq!(AttrPath::parse(&path.to_string()), Ok(path));
    }

    #[test]
    fn test_rejects_empty_and_broken_segments() {
        assert_eq!(AttrPath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            AttrPath::parse("A..B"),
            Err(PathError::InvalidSegment { .. })
        ));
        assert!(matches!(
            AttrPath::parse("A[x]"),
            Err(PathError::InvalidSegment { .. })
        ));
        assert!(matches!(
            AttrPath::parse("A[1"),
            Err(PathError::InvalidSegment { .. })
        ));
        for broken in ["A(B.C", "A.B=C", "A.#B", "A.\"B\"", "A,B"] {
            assert!(
                matches!(AttrPath::parse(broken), Err(PathError::InvalidSegment { .. })),
                "{broken}"
            );
        }
    }

    #[test]
    fn test_split_last() {
        let path: AttrPath = "A.B.C".parse().unwrap();
        let (last, parents) = path.split_last();
        assert_eq!(last.key, "C");
        assert_eq!(parents.len(), 2);
    }
}
