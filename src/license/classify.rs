//! Copyright/license fingerprinting of comment text.
//!
//! The signature table is ordered and evaluated top to bottom; the first
//! matching signature decides the result. License texts quote each other
//! (an Apache 2.0 header mentions "public", an LGPL header names the GNU
//! General Public License), so the order is part of the behavior.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::segment::CommentSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseFamily {
    Unknown,
    Apache,
    PublicDomain,
    Gpl,
}

/// Version and modifier bits attached to a recognized license.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct LicenseFlags(u16);

impl LicenseFlags {
    pub const NONE: Self = Self(0);
    pub const APACHE_10: Self = Self(1);
    pub const APACHE_11: Self = Self(1 << 1);
    pub const APACHE_12: Self = Self(1 << 2);
    pub const APACHE_20: Self = Self(1 << 3);
    pub const OR_LATER: Self = Self(1 << 4);
    pub const LGPL_20: Self = Self(1 << 5);
    pub const LGPL_21: Self = Self(1 << 6);
    pub const GPL_2: Self = Self(1 << 7);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LicenseFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LicenseFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// What the classifier found in one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseMatchResult {
    pub is_copyright: bool,
    pub is_license: bool,
    /// `None` with `is_license` set means license language of an unknown kind.
    pub license_id: Option<String>,
    pub family: LicenseFamily,
    pub flags: LicenseFlags,
}

impl fmt::Display for LicenseMatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.license_id, self.is_license) {
            (Some(id), _) => write!(f, "{}", id),
            (None, true) => write!(f, "unknown license"),
            (None, false) => write!(f, "no license"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Identified {
        id: &'static str,
        or_later_id: Option<&'static str>,
        family: LicenseFamily,
        flags: LicenseFlags,
    },
    /// Stops the search without naming a license.
    Unrecognized,
}

struct LicenseSignature {
    requires: Vec<Regex>,
    outcome: Outcome,
}

static COPYRIGHT_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcopyright\b").unwrap());

static COPYRIGHT_SIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)\(c\)(?:\s|$)").unwrap());

static LICENSE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blicen[cs]e").unwrap());

static OR_LATER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"or\s+\(at\s+your\s+option\)\s+any\s+later\s+version").unwrap()
});

const APACHE_20: &str = r"Licensed under the Apache License.*Version 2\.0";
const LICENSORS: &str = r"or its licensors";
const LGPL: &str = r"GNU Lesser General Public License";
const GPL: &str = r"GNU General Public License";
// LGPL notices spell the version in lower case, GPL notices capitalize it.
const LGPL_VERSION_21: &str = r"\bversion 2\.1\b";
const LGPL_VERSION_2: &str = r"\bversion 2(\.0)?\b";
const GPL_VERSION_2: &str = r"\bVersion 2(\.0)?\b";

fn apache(id: &'static str, flags: LicenseFlags) -> Outcome {
    Outcome::Identified {
        id,
        or_later_id: None,
        family: LicenseFamily::Apache,
        flags,
    }
}

fn gnu(id: &'static str, or_later_id: &'static str, flags: LicenseFlags) -> Outcome {
    Outcome::Identified {
        id,
        or_later_id: Some(or_later_id),
        family: LicenseFamily::Gpl,
        flags,
    }
}

/// The ordered signature table as (required patterns, outcome) pairs.
fn build_signature_list() -> Vec<(Vec<&'static str>, Outcome)> {
    vec![
        (vec![APACHE_20, LICENSORS], apache("Apache 2.0a", LicenseFlags::APACHE_20)),
        (vec![APACHE_20], apache("Apache 2.0", LicenseFlags::APACHE_20)),
        (
            vec![r"The Apache Software License.*Version 1\.2"],
            apache("Apache 1.2", LicenseFlags::APACHE_12),
        ),
        (
            vec![r"The Apache Software License.*Version 1\.1"],
            apache("Apache 1.1", LicenseFlags::APACHE_11),
        ),
        (
            vec![r"Copyright.*The Apache Group"],
            apache("Apache 1.0", LicenseFlags::APACHE_10),
        ),
        (
            vec![r"(?i)public domain"],
            Outcome::Identified {
                id: "public domain",
                or_later_id: None,
                family: LicenseFamily::PublicDomain,
                flags: LicenseFlags::NONE,
            },
        ),
        (
            vec![LGPL, LGPL_VERSION_21],
            gnu("LGPL 2.1", "LGPL 2.1 or later", LicenseFlags::LGPL_21),
        ),
        (
            vec![LGPL, LGPL_VERSION_2],
            gnu("LGPL 2.0", "LGPL 2.0 or later", LicenseFlags::LGPL_20),
        ),
        // A Lesser GPL notice without a known version is not a GPL notice.
        (vec![LGPL], Outcome::Unrecognized),
        (
            vec![GPL, GPL_VERSION_2],
            gnu("GPL 2", "GPL 2 or later", LicenseFlags::GPL_2),
        ),
    ]
}

static SIGNATURES: LazyLock<Vec<LicenseSignature>> = LazyLock::new(|| {
    build_signature_list()
        .into_iter()
        .map(|(patterns, outcome)| LicenseSignature {
            requires: patterns
                .into_iter()
                .map(|pattern| {
                    Regex::new(pattern)
                        .unwrap_or_else(|e| panic!("Failed to compile regex '{}': {}", pattern, e))
                })
                .collect(),
            outcome,
        })
        .collect()
});

/// Classifies already-joined comment text.
pub fn classify_text(text: &str) -> LicenseMatchResult {
    let mut result = LicenseMatchResult {
        is_copyright: COPYRIGHT_WORD_RE.is_match(text) || COPYRIGHT_SIGN_RE.is_match(text),
        is_license: LICENSE_WORD_RE.is_match(text),
        license_id: None,
        family: LicenseFamily::Unknown,
        flags: LicenseFlags::NONE,
    };

    if !result.is_license {
        return result;
    }

    let Some(signature) = SIGNATURES
        .iter()
        .find(|signature| signature.requires.iter().all(|re| re.is_match(text)))
    else {
        return result;
    };

    if let Outcome::Identified {
        id,
        or_later_id,
        family,
        flags,
    } = signature.outcome
    {
        result.family = family;
        result.flags = flags;
        result.license_id = Some(id.to_string());

        if let Some(or_later_id) = or_later_id {
            if OR_LATER_RE.is_match(text) {
                result.flags |= LicenseFlags::OR_LATER;
                result.license_id = Some(or_later_id.to_string());
            }
        }
    }

    result
}

/// Classifies a comment block: its content lines joined with single spaces.
pub fn classify(comment: &CommentSegment<'_>) -> LicenseMatchResult {
    classify_text(&comment.text())
}
