//! Documents as ordered comment and data segments.
//!
//! A [`Document`] is produced by [`split`] (or a configured [`Splitter`]) from
//! the raw lines of one file. Rendering an unmodified document gives back the
//! original text, so a caller can edit one segment, render, and compare with
//! the input to decide whether the file needs rewriting.

mod render;
mod splitter;

pub use splitter::{Splitter, split, split_text};

use crate::grammar::GrammarDefinition;

/// A comment block with its delimiter tokens stripped.
#[derive(Debug, Clone)]
pub struct CommentSegment<'g> {
    grammar: &'g GrammarDefinition,
    prefix: String,
    found_open: bool,
    found_close: bool,
    /// Whether the consumed opener and closer lines ended in `\r`.
    open_cr: bool,
    close_cr: bool,
    lines: Vec<String>,
}

impl<'g> CommentSegment<'g> {
    pub fn new(grammar: &'g GrammarDefinition) -> Self {
        Self {
            grammar,
            prefix: String::new(),
            found_open: false,
            found_close: false,
            open_cr: false,
            close_cr: false,
            lines: Vec::new(),
        }
    }

    /// Reads the first comment block found in `lines`.
    ///
    /// Under a grammar without any delimiters every line from the first
    /// non-blank one onwards is content; this is how plain-text reference
    /// licenses are read.
    pub fn from_lines<I, S>(grammar: &'g GrammarDefinition, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut comment = Self::new(grammar);
        for line in lines {
            comment.push_line(splitter::strip_terminator(line.as_ref()));
        }
        comment
    }

    /// Copies this block's content under another grammar, e.g. to insert a
    /// reference license into a file of a different language.
    pub fn retarget<'h>(&self, grammar: &'h GrammarDefinition) -> CommentSegment<'h> {
        CommentSegment {
            grammar,
            prefix: self.prefix.clone(),
            found_open: self.found_open,
            found_close: self.found_close,
            open_cr: self.open_cr,
            close_cr: self.close_cr,
            lines: self.lines.clone(),
        }
    }

    pub fn grammar(&self) -> &'g GrammarDefinition {
        self.grammar
    }

    /// Whitespace captured before the first delimiter of the block.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn found_open(&self) -> bool {
        self.found_open
    }

    pub fn found_close(&self) -> bool {
        self.found_close
    }

    /// Content lines as found after the leader, including the gap.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Content lines with the leader gap (up to the grammar's minimum width of
    /// leading whitespace) removed.
    pub fn body_lines(&self) -> Vec<&str> {
        let width = if self.grammar.leader().is_some() {
            self.grammar.indent().after_leader
        } else {
            0
        };
        self.lines
            .iter()
            .map(|line| trim_leading_whitespace(line, width))
            .collect()
    }

    /// Content joined with single spaces, undoing line wrapping.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// An own-line opener counts as content: dropping it would lose source
    /// text on render.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && !(self.found_open && self.grammar.open_on_own_line())
    }
}

/// A run of code lines, kept verbatim without terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSegment {
    lines: Vec<String>,
    ignore_blank_lines: bool,
}

impl DataSegment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop leading and trailing blank lines of this segment.
    pub fn with_ignore_blank_lines(ignore_blank_lines: bool) -> Self {
        Self {
            lines: Vec::new(),
            ignore_blank_lines,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if self.ignore_blank_lines && self.lines.is_empty() && is_blank(line) {
            return;
        }
        self.lines.push(line.to_string());
    }

    /// Called once the segment is complete.
    pub fn finish(&mut self) {
        if self.ignore_blank_lines {
            while self.lines.last().is_some_and(|line| is_blank(line)) {
                self.lines.pop();
            }
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Segment<'g> {
    Comment(CommentSegment<'g>),
    Data(DataSegment),
}

impl<'g> Segment<'g> {
    pub fn finish(&mut self) {
        if let Segment::Data(data) = self {
            data.finish();
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Segment::Comment(comment) => comment.is_empty(),
            Segment::Data(data) => data.is_empty(),
        }
    }

    pub fn as_comment(&self) -> Option<&CommentSegment<'g>> {
        match self {
            Segment::Comment(comment) => Some(comment),
            Segment::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&DataSegment> {
        match self {
            Segment::Data(data) => Some(data),
            Segment::Comment(_) => None,
        }
    }

    pub fn lines(&self) -> &[String] {
        match self {
            Segment::Comment(comment) => comment.lines(),
            Segment::Data(data) => data.lines(),
        }
    }
}

/// Ordered segments of one file.
#[derive(Debug, Clone, Default)]
pub struct Document<'g> {
    segments: Vec<Segment<'g>>,
    missing_final_newline: bool,
}

impl<'g> Document<'g> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            missing_final_newline: false,
        }
    }

    /// Finishes `segment` and appends it unless it ended up empty.
    pub fn push(&mut self, mut segment: Segment<'g>) {
        segment.finish();
        if !segment.is_empty() {
            self.segments.push(segment);
        }
    }

    /// Inserts `segment` at `index`; empty segments are ignored.
    pub fn insert(&mut self, index: usize, mut segment: Segment<'g>) {
        segment.finish();
        if !segment.is_empty() {
            self.segments.insert(index, segment);
        }
    }

    /// Replaces the segment at `index`, returning the old one.
    pub fn replace(&mut self, index: usize, segment: Segment<'g>) -> Segment<'g> {
        std::mem::replace(&mut self.segments[index], segment)
    }

    pub fn segments(&self) -> &[Segment<'g>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the first comment segment, if there is one.
    pub fn first_comment_index(&self) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| matches!(segment, Segment::Comment(_)))
    }

    pub fn first_comment(&self) -> Option<&CommentSegment<'g>> {
        self.segments.iter().find_map(Segment::as_comment)
    }

    /// Whether the input this document was split from lacked a final line
    /// terminator.
    pub fn missing_final_newline(&self) -> bool {
        self.missing_final_newline
    }

    pub(crate) fn set_missing_final_newline(&mut self, missing: bool) {
        self.missing_final_newline = missing;
    }
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

fn trim_leading_whitespace(line: &str, width: usize) -> &str {
    let cut = line
        .char_indices()
        .take(width)
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map_or(0, |(index, c)| index + c.len_utf8());
    &line[cut..]
}
