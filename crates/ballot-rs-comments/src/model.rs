//! Comment record model persisted by stores.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used by [`CommentRecord::nice_date`].
const NICE_DATE_FORMAT: &str = "%b %-d, %Y at %H:%M %Z";

/// Tag distinguishing a plain remark from a pro/con annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// Plain remark.
    #[default]
    Comment,
    /// Argument in favor of the option.
    Pro,
    /// Argument against the option.
    Con,
}

impl CommentKind {
    /// Lowercase name used on disk and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Pro => "pro",
            Self::Con => "con",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "comment" => Ok(Self::Comment),
            "pro" => Ok(Self::Pro),
            "con" => Ok(Self::Con),
            other => Err(format!("unknown comment kind: {other}")),
        }
    }
}

/// One persisted comment on an option.
///
/// `body` is stored verbatim; escaping is left to whoever renders it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRecord {
    /// User identifier of the author.
    pub author: String,
    /// Option the comment belongs to.
    pub option_id: String,
    /// Time the store persisted the comment.
    pub timestamp: DateTime<Utc>,
    /// Free-text content.
    pub body: String,
    /// Comment, pro, or con.
    #[serde(default)]
    pub kind: CommentKind,
}

impl CommentRecord {
    /// Human-readable creation time in the server's local zone.
    ///
    /// The format is presentation policy and may change.
    pub fn nice_date(&self) -> String {
        self.nice_date_in(&Local)
    }

    /// Human-readable creation time in an explicit zone.
    pub fn nice_date_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.timestamp
            .with_timezone(tz)
            .format(NICE_DATE_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentKind, CommentRecord};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record() -> CommentRecord {
        CommentRecord {
            author: "ada@example.com".to_string(),
            option_id: "opt1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap(),
            body: "<b>bold</b>".to_string(),
            kind: CommentKind::Pro,
        }
    }

    #[test]
    fn nice_date_formats_in_given_zone() {
        assert_eq!(record().nice_date_in(&Utc), "Jan 2, 2006 at 15:04 UTC");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let line = serde_json::to_string(&record()).expect("serialize");
        assert!(line.contains("\"kind\":\"pro\""));
        assert!(line.contains("<b>bold</b>"));
    }

    #[test]
    fn missing_kind_defaults_to_comment() {
        let line = r#"{"author":"a","option_id":"o","timestamp":"2006-01-02T15:04:05Z","body":"b"}"#;
        let parsed: CommentRecord = serde_json::from_str(line).expect("parse");
        assert_eq!(parsed.kind, CommentKind::Comment);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Con".parse::<CommentKind>(), Ok(CommentKind::Con));
        assert!("maybe".parse::<CommentKind>().is_err());
    }
}
