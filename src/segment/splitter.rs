//! The segmenter: a two-state machine (in data / in comment) over raw lines.

use log::debug;

use super::{CommentSegment, DataSegment, Document, Segment};
use crate::grammar::GrammarDefinition;

/// Removes one trailing `\n`; a `\r` before it stays part of the line.
pub(crate) fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

impl CommentSegment<'_> {
    /// Feeds one line (terminator removed) into the block.
    ///
    /// Lines before the opener and after the closer are ignored. Delimiter
    /// lines are consumed; leader lines keep only the text after the leader,
    /// minus the trailer.
    pub fn push_line(&mut self, line: &str) {
        let grammar = self.grammar;
        let mut content = line;

        if grammar.open_on_own_line() && !self.found_open {
            if let Some(prefix) = grammar.match_open(line) {
                self.prefix = prefix.to_string();
                self.found_open = true;
                self.open_cr = line.ends_with('\r');
                return;
            }
        }

        if grammar.close().is_some() && grammar.matches_close(line) {
            self.found_close = true;
            self.close_cr = line.ends_with('\r');
            return;
        }

        if grammar.leader().is_some() {
            match grammar.match_leader(line) {
                Some((whitespace, rest)) => {
                    // Without a closer the first leader line opens the block.
                    if grammar.close().is_none() && !self.found_open {
                        self.prefix = whitespace.to_string();
                        self.found_open = true;
                    }
                    content = grammar.strip_trailer(rest).unwrap_or(rest);
                }
                None => {
                    if self.found_open && grammar.close().is_none() {
                        self.found_close = true;
                    }
                }
            }
        } else if !grammar.has_comment_syntax() && !super::is_blank(line) {
            self.found_open = true;
        }

        if !self.found_open || self.found_close {
            return;
        }

        self.lines.push(content.to_string());
    }
}

enum State<'g> {
    Idle,
    InData(DataSegment),
    InComment(CommentSegment<'g>),
}

/// Configurable segmenter for one grammar.
///
/// ```ignore
/// let document = Splitter::new(grammar_for(LanguageTag::Java))
///     .ignore_blank_lines(true)
///     .split(text.split_inclusive('\n'));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Splitter<'g> {
    grammar: &'g GrammarDefinition,
    ignore_blank_lines: bool,
}

impl<'g> Splitter<'g> {
    pub fn new(grammar: &'g GrammarDefinition) -> Self {
        Self {
            grammar,
            ignore_blank_lines: false,
        }
    }

    /// Drop blank lines at the edges of data segments. Documents split this
    /// way no longer render back to their input.
    pub fn ignore_blank_lines(mut self, ignore: bool) -> Self {
        self.ignore_blank_lines = ignore;
        self
    }

    fn new_data(&self) -> DataSegment {
        DataSegment::with_ignore_blank_lines(self.ignore_blank_lines)
    }

    /// Splits raw lines, each optionally ending in `\n`, into a document.
    pub fn split<I, S>(&self, lines: I) -> Document<'g>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let grammar = self.grammar;
        let mut document = Document::new();
        let mut state = State::Idle;
        let mut missing_final_newline = false;

        for raw in lines {
            let raw = raw.as_ref();
            missing_final_newline = !raw.is_empty() && !raw.ends_with('\n');
            let line = strip_terminator(raw);

            state = match state {
                State::InComment(mut comment) => {
                    if grammar.close().is_none() {
                        if grammar.matches_leader(line) {
                            comment.push_line(line);
                            State::InComment(comment)
                        } else {
                            document.push(Segment::Comment(comment));
                            let mut data = self.new_data();
                            data.push_line(line);
                            State::InData(data)
                        }
                    } else if grammar.matches_close(line) {
                        comment.push_line(line);
                        document.push(Segment::Comment(comment));
                        State::Idle
                    } else {
                        comment.push_line(line);
                        State::InComment(comment)
                    }
                }
                other => {
                    if grammar.matches_open(line) {
                        if let State::InData(data) = other {
                            document.push(Segment::Data(data));
                        }
                        let mut comment = CommentSegment::new(grammar);
                        comment.push_line(line);
                        State::InComment(comment)
                    } else {
                        let mut data = match other {
                            State::InData(data) => data,
                            _ => self.new_data(),
                        };
                        data.push_line(line);
                        State::InData(data)
                    }
                }
            };
        }

        // Unterminated blocks are kept as they are.
        match state {
            State::InComment(comment) => document.push(Segment::Comment(comment)),
            State::InData(data) => document.push(Segment::Data(data)),
            State::Idle => {}
        }

        document.set_missing_final_newline(missing_final_newline);
        debug!("Split into {} segments", document.len());
        document
    }
}

/// Splits raw lines under `grammar` with default options.
pub fn split<'g, I, S>(grammar: &'g GrammarDefinition, lines: I) -> Document<'g>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Splitter::new(grammar).split(lines)
}

/// Splits a whole text, keeping line terminators.
pub fn split_text<'g>(grammar: &'g GrammarDefinition, text: &str) -> Document<'g> {
    split(grammar, text.split_inclusive('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarSpec, LanguageTag, grammar_for};

    fn comment_lines<'a>(document: &'a Document<'_>, index: usize) -> Vec<&'a str> {
        document.segments()[index]
            .as_comment()
            .expect("expected a comment segment")
            .body_lines()
    }

    fn data_lines<'a>(document: &'a Document<'_>, index: usize) -> &'a [String] {
        document.segments()[index]
            .as_data()
            .expect("expected a data segment")
            .lines()
    }

    #[test]
    fn test_leader_only_run_forms_one_block() {
        let grammar = GrammarDefinition::new(GrammarSpec {
            leader: Some("#"),
            indent: [0, 0, 1, 0, 0],
            ..Default::default()
        })
        .unwrap();
        let document = split(&grammar, ["# a\n", "# b\n", "code\n"]);

        assert_eq!(document.len(), 2);
        assert_eq!(comment_lines(&document, 0), ["a", "b"]);
        assert_eq!(document.segments()[0].lines(), [" a", " b"]);
        assert_eq!(data_lines(&document, 1), ["code"]);
    }

    #[test]
    fn test_block_comment_then_code() {
        let grammar = GrammarDefinition::new(GrammarSpec {
            open: Some("/*"),
            leader: Some("*"),
            close: Some("*/"),
            indent: [0, 1, 1, 0, 1],
            ..Default::default()
        })
        .unwrap();
        let document = split(&grammar, ["/*\n", " * hi\n", " */\n", "x;\n"]);

        assert_eq!(document.len(), 2);
        assert_eq!(comment_lines(&document, 0), ["hi"]);
        let comment = document.segments()[0].as_comment().unwrap();
        assert!(comment.found_open());
        assert!(comment.found_close());
        assert_eq!(data_lines(&document, 1), ["x;"]);
    }

    #[test]
    fn test_adjacent_blocks_produce_no_empty_data() {
        let grammar = grammar_for(LanguageTag::Java);
        let document = split_text(grammar, "/*\n * one\n */\n/*\n * two\n */\nclass A {}\n");

        assert_eq!(document.len(), 3);
        assert_eq!(comment_lines(&document, 0), ["one"]);
        assert_eq!(comment_lines(&document, 1), ["two"]);
        assert_eq!(data_lines(&document, 2), ["class A {}"]);
    }

    #[test]
    fn test_unterminated_block_is_kept() {
        let grammar = grammar_for(LanguageTag::Java);
        let document = split_text(grammar, "/*\n * dangling\n");

        assert_eq!(document.len(), 1);
        let comment = document.first_comment().unwrap();
        assert!(!comment.found_close());
        assert_eq!(comment.body_lines(), ["dangling"]);
    }

    #[test]
    fn test_inline_opener_is_code() {
        let grammar = grammar_for(LanguageTag::C);
        let document = split_text(grammar, "/* inline */\nint x;\n");

        assert_eq!(document.len(), 1);
        assert_eq!(data_lines(&document, 0), ["/* inline */", "int x;"]);
    }

    #[test]
    fn test_blank_lines_inside_blocks_are_kept() {
        let grammar = grammar_for(LanguageTag::Xml);
        let document = split_text(grammar, "<!--\n  first\n\n  second\n-->\n<root/>\n");

        assert_eq!(document.len(), 2);
        assert_eq!(document.segments()[0].lines(), ["  first", "", "  second"]);
    }

    #[test]
    fn test_line_comment_block_closes_on_code() {
        let grammar = grammar_for(LanguageTag::Python);
        let document = split_text(grammar, "import os\n# one\n# two\nx = 1\n# three\n");

        let kinds: Vec<bool> = document
            .segments()
            .iter()
            .map(|s| matches!(s, Segment::Comment(_)))
            .collect();
        assert_eq!(kinds, [false, true, false, true]);
        assert_eq!(comment_lines(&document, 3), ["three"]);
    }

    #[test]
    fn test_indented_line_comment_captures_prefix() {
        let grammar = grammar_for(LanguageTag::Sh);
        let document = split_text(grammar, "  # note\n  # more\n");

        let comment = document.first_comment().unwrap();
        assert_eq!(comment.prefix(), "  ");
        assert_eq!(comment.lines(), [" note", " more"]);
    }

    #[test]
    fn test_no_syntax_grammar_is_one_data_segment() {
        let grammar = grammar_for(LanguageTag::Text);
        let document = split_text(grammar, "\nCopyright 2020\n# not a comment\n");

        assert_eq!(document.len(), 1);
        assert_eq!(
            data_lines(&document, 0),
            ["", "Copyright 2020", "# not a comment"]
        );
    }

    #[test]
    fn test_ignore_blank_lines_option() {
        let grammar = grammar_for(LanguageTag::Sh);
        let document = Splitter::new(grammar)
            .ignore_blank_lines(true)
            .split(["# head\n", "\n", "\n", "run\n", "\n"]);

        assert_eq!(document.len(), 2);
        assert_eq!(data_lines(&document, 1), ["run"]);
    }

    #[test]
    fn test_dos_opener_starts_block() {
        let grammar = grammar_for(LanguageTag::Dos);
        let document = split_text(grammar, "@echo off\nrem Copyright 2020\nset X=1\n");

        assert_eq!(document.len(), 2);
        assert_eq!(comment_lines(&document, 0), ["Copyright 2020"]);
        assert_eq!(data_lines(&document, 1), ["set X=1"]);
    }

    #[test]
    fn test_empty_input() {
        let grammar = grammar_for(LanguageTag::Java);
        let document = split_text(grammar, "");
        assert!(document.is_empty());
    }
}
