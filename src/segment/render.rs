//! Turning segments back into text.

use super::{CommentSegment, DataSegment, Document, Segment};

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n(' ', count));
}

fn push_terminator(out: &mut String, cr: bool) {
    if cr {
        out.push('\r');
    }
    out.push('\n');
}

/// Number of spaces to put between the leader and `content`.
///
/// Starts at `width` and loses one space for every leading whitespace
/// character `content` already carries, stopping at the first non-whitespace
/// character. The last character of `content` always counts as whitespace
/// here, so a one-character line gets no gap.
fn leader_gap(content: &str, width: usize) -> usize {
    let len = content.chars().count();
    let mut chars = content.chars();
    let mut gap = width;
    for position in 1..=width {
        let ch = chars.next();
        if position < len && ch.is_some_and(|c| !c.is_whitespace()) {
            break;
        }
        gap -= 1;
    }
    gap
}

impl CommentSegment<'_> {
    pub fn render(&self) -> String {
        let grammar = self.grammar;
        let indent = grammar.indent();
        let mut out = String::new();

        if let (true, Some(open)) = (grammar.open_on_own_line(), grammar.open()) {
            out.push_str(&self.prefix);
            push_spaces(&mut out, indent.before_open);
            out.push_str(open);
            push_terminator(&mut out, self.open_cr);
        }

        for content in &self.lines {
            if let Some(leader) = grammar.leader() {
                out.push_str(&self.prefix);
                push_spaces(&mut out, indent.before_leader);
                out.push_str(leader);
                if !content.is_empty() && indent.after_leader > 0 {
                    push_spaces(&mut out, leader_gap(content, indent.after_leader));
                }
            }

            out.push_str(content);

            if let Some(trailer) = grammar.trailer() {
                push_spaces(&mut out, indent.before_trailer);
                out.push_str(trailer);
            }
            out.push('\n');
        }

        if let Some(close) = grammar.close() {
            out.push_str(&self.prefix);
            push_spaces(&mut out, indent.before_close);
            out.push_str(close);
            push_terminator(&mut out, self.close_cr);
        }

        out
    }
}

impl DataSegment {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl Segment<'_> {
    pub fn render(&self) -> String {
        match self {
            Segment::Comment(comment) => comment.render(),
            Segment::Data(data) => data.render(),
        }
    }
}

impl Document<'_> {
    /// Concatenation of all segment renders. An input that ended without a
    /// line terminator renders without one.
    pub fn render(&self) -> String {
        let mut out: String = self.segments.iter().map(Segment::render).collect();
        if self.missing_final_newline && out.ends_with('\n') {
            out.pop();
        }
        out
    }
}
