//! Built-in grammars and the file-name → language table.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::error;
use regex::Regex;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use super::{GrammarDefinition, GrammarSpec};

/// Language/file-type tag selecting a comment grammar.
///
/// Tags parse from and print as their lowercase names (`"java"`, `"sh"`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LanguageTag {
    Xml,
    Sgml,
    Html,
    Jsp,
    C,
    Javascript,
    Java,
    Jelly,
    Sh,
    Perl,
    Python,
    Properties,
    Dos,
    Sql,
    Velocity,
    Text,
}

const MARKUP_COMMENT: GrammarSpec<'static> = GrammarSpec {
    open: Some("<!--"),
    close: Some("-->"),
    leader: None,
    trailer: None,
    indent: [0, 0, 2, 0, 0],
};

const C_COMMENT: GrammarSpec<'static> = GrammarSpec {
    open: Some("/*"),
    close: Some("*/"),
    leader: Some("*"),
    trailer: None,
    indent: [0, 1, 1, 0, 1],
};

const fn line_comment(token: &'static str) -> GrammarSpec<'static> {
    GrammarSpec {
        open: Some(token),
        close: None,
        leader: Some(token),
        trailer: None,
        indent: [0, 0, 1, 0, 0],
    }
}

impl LanguageTag {
    /// The static comment syntax for this tag.
    pub fn grammar_spec(self) -> GrammarSpec<'static> {
        match self {
            Self::Xml | Self::Sgml | Self::Html | Self::Jelly => MARKUP_COMMENT,
            Self::Jsp => GrammarSpec {
                open: Some("<%--"),
                close: Some("--%>"),
                ..MARKUP_COMMENT
            },
            Self::C | Self::Javascript | Self::Java => C_COMMENT,
            Self::Sh | Self::Perl | Self::Python | Self::Properties => line_comment("#"),
            Self::Dos => GrammarSpec {
                open: Some("@echo off"),
                ..line_comment("rem")
            },
            Self::Sql => line_comment("--"),
            Self::Velocity => line_comment("##"),
            Self::Text => GrammarSpec::default(),
        }
    }
}

static GRAMMARS: LazyLock<HashMap<LanguageTag, GrammarDefinition>> = LazyLock::new(|| {
    let mut grammars = HashMap::new();
    for tag in LanguageTag::iter() {
        match GrammarDefinition::new(tag.grammar_spec()) {
            Ok(grammar) => {
                grammars.insert(tag, grammar);
            }
            Err(e) => error!("Skipping grammar '{}': {}", tag, e),
        }
    }
    grammars
});

static NO_COMMENT_SYNTAX: LazyLock<GrammarDefinition> =
    LazyLock::new(GrammarDefinition::without_syntax);

/// File-name suffixes per tag, tried in order. First match wins.
const FILE_NAME_PATTERNS: &[(LanguageTag, &[&str])] = &[
    (
        LanguageTag::Xml,
        &[
            r"\.xml$", r"\.xsl$", r"\.xslt$", r"\.xcat$", r"\.xmap$", r"\.xconf$",
            r"\.xroles$", r"\.roles$", r"\.xsp$", r"\.xlog$", r"\.xsamples$", r"\.xtest$",
            r"\.xweb$", r"\.xwelcome$", r"\.samplesxconf$", r"\.samplesxpipe$", r"\.svg$",
            r"\.xhtml$", r"\.jdo$", r"\.gt$", r"\.jx$", r"\.jxt$", r"\.meta$",
            r"\.pagesheet$", r"\.stx$", r"\.xegrm$", r"\.xgrm$", r"\.xlex$", r"\.xmi$",
            r"\.xsd$", r"\.rng$", r"\.rdf$", r"\.rdfs$", r"\.xul$", r"\.tld$", r"\.xxe$",
            r"\.ft$", r"\.fv$", r"\.xhtm$", r"\.launch$", r"^\.classpath$", r"^\.project$",
        ],
    ),
    (LanguageTag::Sgml, &[r"\.dtd$", r"\.mod$", r"\.sgml$", r"\.sgm$"]),
    (LanguageTag::Html, &[r"\.html$", r"\.htm$", r"\.ihtml$"]),
    (LanguageTag::Jsp, &[r"\.jsp$"]),
    (
        LanguageTag::C,
        &[r"\.c$", r"\.h$", r"\.cpp$", r"\.cc$", r"\.cs$", r"\.css$", r"\.egrm$", r"\.grm$"],
    ),
    (LanguageTag::Javascript, &[r"\.js$", r"\.javascript$"]),
    (LanguageTag::Java, &[r"\.java$", r"\.groovy$", r"\.gy$", r"\.jj$", r"\.jjt$"]),
    (LanguageTag::Jelly, &[r"\.jelly$"]),
    (LanguageTag::Sh, &[r"\.sh$", r"\.ccf$"]),
    (LanguageTag::Perl, &[r"\.pl$", r"\.pm$"]),
    (LanguageTag::Python, &[r"\.py$"]),
    (
        LanguageTag::Properties,
        &[r"\.properties$", r"\.rnc$", r"\.rnx$", r"\.properties\.tmpl$", r"\.props$"],
    ),
    (LanguageTag::Dos, &[r"\.bat$", r"\.cmd$"]),
    (LanguageTag::Sql, &[r"\.sql$"]),
    (LanguageTag::Velocity, &[r"\.vm$", r"\.vsl$"]),
    (LanguageTag::Text, &[r"\.txt$"]),
];

static COMPILED_FILE_NAME_PATTERNS: LazyLock<Vec<(Regex, LanguageTag)>> = LazyLock::new(|| {
    FILE_NAME_PATTERNS
        .iter()
        .flat_map(|(tag, patterns)| {
            patterns.iter().map(move |pattern| {
                let regex = Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("Failed to compile regex '{}': {}", pattern, e));
                (regex, *tag)
            })
        })
        .collect()
});

/// Grammar registered for `tag`, or the no-syntax grammar if its
/// registration failed.
pub fn grammar_for(tag: LanguageTag) -> &'static GrammarDefinition {
    GRAMMARS.get(&tag).unwrap_or_else(no_comment_syntax)
}

/// Grammar for a textual tag. Unknown tags and `None` yield the no-syntax
/// grammar rather than an error; callers treat that as "nothing to do".
pub fn lookup_grammar(tag: Option<&str>) -> &'static GrammarDefinition {
    match tag.and_then(|t| t.parse::<LanguageTag>().ok()) {
        Some(tag) => grammar_for(tag),
        None => no_comment_syntax(),
    }
}

pub fn no_comment_syntax() -> &'static GrammarDefinition {
    &NO_COMMENT_SYNTAX
}

/// Language tag for a bare file name (no directory part).
pub fn detect_language_tag(file_name: &str) -> Option<LanguageTag> {
    COMPILED_FILE_NAME_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(file_name))
        .map(|(_, tag)| *tag)
}
