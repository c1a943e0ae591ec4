use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::grammar::LanguageTag;
use crate::license::LicenseDeviation;

/// Something an action noticed about (or did to) a file.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    FileType { language: Option<LanguageTag> },
    NoCommentBlock,
    NoCopyright,
    NoLicense,
    UnknownLicense,
    Licensed { license_id: String },
    Deviation { deviation: LicenseDeviation },
    LicenseAdded,
    LicenseReplaced,
    Reformatted,
}

impl Finding {
    /// Findings only worth printing in verbose mode.
    pub fn is_verbose_only(&self) -> bool {
        matches!(self, Self::FileType { language: Some(_) })
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileType {
                language: Some(language),
            } => write!(f, "is a {} file", language),
            Self::FileType { language: None } => write!(f, "unknown type"),
            Self::NoCommentBlock => write!(f, "No comment block found! (No copyright notice either!)"),
            Self::NoCopyright => write!(f, "Has no copyright"),
            Self::NoLicense => write!(f, "Has no license"),
            Self::UnknownLicense => write!(f, "License Type is unknown"),
            Self::Licensed { license_id } => write!(f, "Licensed under {}", license_id),
            Self::Deviation { deviation } => write!(f, "{}", deviation),
            Self::LicenseAdded => write!(f, "Added License"),
            Self::LicenseReplaced => write!(f, "Replaced License"),
            Self::Reformatted => write!(f, "File reformatted"),
        }
    }
}

/// Result of running one action on one file.
#[derive(Serialize, Debug, Clone)]
pub struct FileReport {
    pub path: String,
    pub language: Option<LanguageTag>,
    pub findings: Vec<Finding>,
    pub modified: bool,
    pub scan_errors: Vec<String>,
}

impl FileReport {
    pub fn new(path: &Path, language: Option<LanguageTag>) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            language,
            findings: Vec::new(),
            modified: false,
            scan_errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_messages() {
        assert_eq!(
            Finding::FileType {
                language: Some(LanguageTag::Java)
            }
            .to_string(),
            "is a java file"
        );
        assert_eq!(
            Finding::Licensed {
                license_id: "Apache 2.0".to_string()
            }
            .to_string(),
            "Licensed under Apache 2.0"
        );
        assert_eq!(
            Finding::Deviation {
                deviation: LicenseDeviation::Mismatch { line: 2 }
            }
            .to_string(),
            "line 2 does not match"
        );
    }

    #[test]
    fn test_finding_serialization() {
        let json = serde_json::to_value(Finding::Deviation {
            deviation: LicenseDeviation::LineCount {
                found: 3,
                expected: 4,
            },
        })
        .unwrap();

        assert_eq!(json["type"], "deviation");
        assert_eq!(json["deviation"]["kind"], "line_count");
        assert_eq!(json["deviation"]["expected"], 4);

        let json = serde_json::to_value(Finding::FileType {
            language: Some(LanguageTag::Sh),
        })
        .unwrap();
        assert_eq!(json["language"], "sh");
    }
}
