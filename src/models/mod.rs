// Code Detective Data Models
// Request/response shapes shared by the detection services and the HTTP API

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============ Language Tag ============

/// Programming language of a submitted snippet.
///
/// Parsed from the caller's exact text. Unrecognized tags are kept verbatim
/// so they still end up in the normalized prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    C,
    Cpp,
    Java,
    Python,
    Other(String),
}

impl LanguageTag {
    /// Tags with dedicated handling, in the order the UI lists them.
    pub const RECOGNIZED: [LanguageTag; 4] = [
        LanguageTag::C,
        LanguageTag::Cpp,
        LanguageTag::Java,
        LanguageTag::Python,
    ];

    pub fn parse(val: &str) -> Self {
        match val {
            "C" => Self::C,
            "C++" => Self::Cpp,
            "Java" => Self::Java,
            "Python" => Self::Python,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Java => "Java",
            Self::Python => "Python",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Syntax-highlighting mode of the code editor for this language.
    pub fn highlight_language(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            _ => "python",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ============ Detection Mode ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DetectionMode {
    #[default]
    Normal,
    Advanced,
}

impl DetectionMode {
    /// Case-insensitive; anything other than "advanced" is `Normal`.
    pub fn from_str(val: &str) -> Self {
        match val.to_lowercase().as_str() {
            "advanced" => Self::Advanced,
            _ => Self::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advanced => "advanced",
        }
    }
}

// ============ Classification ============

/// Raw output of a classifier collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Outcome for one snippet. `ai_model` is only set for `AI` origin in advanced mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}

/// Labels shown by the single-snippet checker.
///
/// `detail` is the model family for AI-authored code and repeats `result` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLabels {
    pub result: String,
    pub detail: String,
}

// ============ Batch ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItemResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub language: LanguageTag,
    pub highlight: String,
}
