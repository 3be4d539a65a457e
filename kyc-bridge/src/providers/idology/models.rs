//! IDology ExpectID wire models (XML responses).

use std::str::FromStr;

use serde::Deserialize;

/// `<response>` document.
///
/// ```xml
/// <response>
///   <id-number>2003912412</id-number>
///   <summary-result><key>id.success</key><message>PASS</message></summary-result>
///   <results><key>result.match</key><message>ID Located</message></results>
///   <qualifiers>
///     <qualifier><key>resultcode.address.does.not.match</key><message>Address Does Not Match</message></qualifier>
///   </qualifiers>
/// </response>
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdologyResponse {
    /// Transaction identifier.
    #[serde(rename = "id-number")]
    pub id_number: Option<String>,
    /// Overall decision.
    #[serde(rename = "summary-result")]
    pub summary_result: Option<KeyMessage>,
    /// Identity location result.
    pub results: Option<KeyMessage>,
    /// Notes on individual fields.
    pub qualifiers: Option<Qualifiers>,
    /// Request-level error text.
    pub error: Option<String>,
}

impl IdologyResponse {
    /// Error text, when present and non-blank.
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().map(str::trim).filter(|error| !error.is_empty())
    }

    /// Returns true when no IDology element was found.
    ///
    /// Any well-formed XML decodes into this struct, so a gateway or
    /// maintenance page shows up as a blank response.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.error.is_none()
            && self.summary_result.is_none()
            && self.results.is_none()
            && self.id_number.is_none()
    }

    /// Qualifier messages in document order.
    pub fn qualifier_messages(&self) -> impl Iterator<Item = &str> {
        self.qualifiers
            .iter()
            .flat_map(|qualifiers| qualifiers.items.iter())
            .map(|qualifier| qualifier.message.trim())
            .filter(|message| !message.is_empty())
    }
}

/// `<key>` / `<message>` pair.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KeyMessage {
    /// Machine-readable key.
    pub key: String,
    /// Human-readable message.
    pub message: String,
}

/// `<qualifiers>` list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Qualifiers {
    /// Individual qualifiers.
    #[serde(rename = "qualifier")]
    pub items: Vec<KeyMessage>,
}

/// `<summary-result>` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKey {
    /// Identity verified.
    Success,
    /// Identity not verified.
    Failure,
}

impl SummaryKey {
    /// Every summary value.
    pub const ALL: [Self; 2] = [Self::Success, Self::Failure];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "id.success",
            Self::Failure => "id.failure",
        }
    }
}

impl FromStr for SummaryKey {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|key| key.as_str().eq_ignore_ascii_case(raw)).ok_or(())
    }
}

/// `<results>` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKey {
    /// Identity located.
    Match,
    /// Identity not located.
    NoMatch,
    /// Identity located but restricted.
    MatchRestricted,
}

impl ResultKey {
    /// Every result value.
    pub const ALL: [Self; 3] = [Self::Match, Self::NoMatch, Self::MatchRestricted];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "result.match",
            Self::NoMatch => "result.no.match",
            Self::MatchRestricted => "result.match.restricted",
        }
    }
}

impl FromStr for ResultKey {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|key| key.as_str().eq_ignore_ascii_case(raw)).ok_or(())
    }
}
