//! Comment grammars.
//!
//! A [`GrammarDefinition`] describes how one file type writes comments:
//! - an optional block opener (`/*`, `<!--`, `#`, `@echo off`)
//! - an optional block closer (`*/`, `-->`)
//! - an optional per-line leader (`*`, `#`, `rem`) and trailer
//! - five indentation widths used when a comment is written back out
//!
//! All delimiter matchers are compiled once when the definition is built.
//! Definitions are immutable afterwards and shared read-only between threads.

mod registry;

pub use registry::{
    LanguageTag, detect_language_tag, grammar_for, lookup_grammar, no_comment_syntax,
};

use std::fmt;

use regex::Regex;

/// Error raised while building a [`GrammarDefinition`].
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// An opener was given without a closer or a leader, so the body of the
    /// block could never be recognized.
    InvalidGrammar { open: String },

    /// A delimiter could not be turned into a matcher.
    InvalidDelimiter { token: String, message: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrammar { open } => write!(
                f,
                "Invalid grammar: opener '{}' needs a closer or a leader",
                open
            ),
            Self::InvalidDelimiter { token, message } => {
                write!(f, "Invalid delimiter '{}': {}", token, message)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Indentation widths, in spaces, applied when rendering a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indent {
    pub before_open: usize,
    pub before_leader: usize,
    /// Minimum gap between the leader and the text of a line.
    pub after_leader: usize,
    pub before_trailer: usize,
    pub before_close: usize,
}

impl From<[usize; 5]> for Indent {
    fn from(widths: [usize; 5]) -> Self {
        Self {
            before_open: widths[0],
            before_leader: widths[1],
            after_leader: widths[2],
            before_trailer: widths[3],
            before_close: widths[4],
        }
    }
}

/// Raw description of a grammar, as written in a static table.
///
/// ```ignore
/// let spec = GrammarSpec {
///     open: Some("/*"),
///     leader: Some("*"),
///     close: Some("*/"),
///     indent: [0, 1, 1, 0, 1],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarSpec<'a> {
    pub open: Option<&'a str>,
    pub close: Option<&'a str>,
    pub leader: Option<&'a str>,
    pub trailer: Option<&'a str>,
    pub indent: [usize; 5],
}

/// A comment token together with the matcher compiled for its role.
#[derive(Debug, Clone)]
pub struct Delimiter {
    token: String,
    matcher: Regex,
}

impl Delimiter {
    fn compile(token: &str, pattern: String) -> Result<Self, GrammarError> {
        let matcher = Regex::new(&pattern).map_err(|e| GrammarError::InvalidDelimiter {
            token: token.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            token: token.to_string(),
            matcher,
        })
    }

    /// Opener at line start; leading whitespace is group 1.
    fn open(token: &str, alone: bool) -> Result<Self, GrammarError> {
        let mut pattern = format!(r"^(\s*){}", regex::escape(token));
        if alone {
            pattern.push_str(r"\s*$");
        }
        Self::compile(token, pattern)
    }

    /// Closer at line end.
    fn close(token: &str) -> Result<Self, GrammarError> {
        Self::compile(token, format!(r"{}\s*$", regex::escape(token)))
    }

    /// Leader at line start; leading whitespace is group 1, the rest group 2.
    fn leader(token: &str) -> Result<Self, GrammarError> {
        Self::compile(token, format!(r"^(\s*){}(.*)$", regex::escape(token)))
    }

    /// Trailer at line end; the text before it (minus whitespace) is group 1.
    fn trailer(token: &str) -> Result<Self, GrammarError> {
        Self::compile(token, format!(r"^(.*?)\s*{}\s*$", regex::escape(token)))
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Immutable comment syntax of one file type.
///
/// All `match_*` methods take a single line with its terminator removed.
#[derive(Debug, Clone)]
pub struct GrammarDefinition {
    open: Option<Delimiter>,
    close: Option<Delimiter>,
    leader: Option<Delimiter>,
    trailer: Option<Delimiter>,
    open_alone: bool,
    indent: Indent,
}

impl GrammarDefinition {
    /// Build a definition and compile its matchers.
    ///
    /// A grammar with a leader but no opener opens its blocks with the
    /// leader. An opener without either a closer or a leader is rejected.
    pub fn new(spec: GrammarSpec<'_>) -> Result<Self, GrammarError> {
        let open_token = spec.open.or(spec.leader);

        if let (Some(open), None, None) = (spec.open, spec.close, spec.leader) {
            return Err(GrammarError::InvalidGrammar {
                open: open.to_string(),
            });
        }

        let leader = spec.leader.map(Delimiter::leader).transpose()?;
        let close = spec.close.map(Delimiter::close).transpose()?;
        let trailer = spec.trailer.map(Delimiter::trailer).transpose()?;

        // The opener sits on its own line when a closer ends the block, or
        // when the opener is not itself a comment line (`@echo off`).
        let open_alone = match (open_token, &leader) {
            (Some(_), _) if close.is_some() => true,
            (Some(open), Some(leader)) => !leader.matcher.is_match(open),
            _ => false,
        };
        let open = open_token
            .map(|token| Delimiter::open(token, open_alone))
            .transpose()?;

        Ok(Self {
            open,
            close,
            leader,
            trailer,
            open_alone,
            indent: Indent::from(spec.indent),
        })
    }

    /// The definition used for file types without any comment syntax.
    pub fn without_syntax() -> Self {
        Self {
            open: None,
            close: None,
            leader: None,
            trailer: None,
            open_alone: false,
            indent: Indent::default(),
        }
    }

    /// `false` means every operation over this grammar is a no-op.
    pub fn has_comment_syntax(&self) -> bool {
        self.open.is_some()
    }

    pub fn open(&self) -> Option<&str> {
        self.open.as_ref().map(Delimiter::token)
    }

    pub fn close(&self) -> Option<&str> {
        self.close.as_ref().map(Delimiter::token)
    }

    pub fn leader(&self) -> Option<&str> {
        self.leader.as_ref().map(Delimiter::token)
    }

    pub fn trailer(&self) -> Option<&str> {
        self.trailer.as_ref().map(Delimiter::token)
    }

    pub fn indent(&self) -> Indent {
        self.indent
    }

    /// Whether the opener occupies a line of its own, both when parsing and
    /// when rendering.
    pub fn open_on_own_line(&self) -> bool {
        self.open.is_some() && self.open_alone
    }

    /// Returns the whitespace before the opener if `line` opens a block.
    pub fn match_open<'l>(&self, line: &'l str) -> Option<&'l str> {
        let caps = self.open.as_ref()?.matcher.captures(line)?;
        Some(caps.get(1).map_or("", |m| m.as_str()))
    }

    pub fn matches_open(&self, line: &str) -> bool {
        self.open
            .as_ref()
            .is_some_and(|open| open.matcher.is_match(line))
    }

    pub fn matches_close(&self, line: &str) -> bool {
        self.close
            .as_ref()
            .is_some_and(|close| close.matcher.is_match(line))
    }

    /// Splits a leader line into (whitespace before the leader, remainder).
    pub fn match_leader<'l>(&self, line: &'l str) -> Option<(&'l str, &'l str)> {
        let caps = self.leader.as_ref()?.matcher.captures(line)?;
        Some((
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
        ))
    }

    pub fn matches_leader(&self, line: &str) -> bool {
        self.leader
            .as_ref()
            .is_some_and(|leader| leader.matcher.is_match(line))
    }

    /// Removes the trailer (and the whitespace before it) from `line`.
    pub fn strip_trailer<'l>(&self, line: &'l str) -> Option<&'l str> {
        let caps = self.trailer.as_ref()?.matcher.captures(line)?;
        Some(caps.get(1).map_or("", |m| m.as_str()))
    }
}
