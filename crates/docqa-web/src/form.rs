//! Upload form: the two fields a request carries and their validation

use serde::Deserialize;
use std::fmt;

use docqa_core::RAGQuery;

/// Message shown under a missing field
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Raw form submission
///
/// Missing fields deserialize as empty strings so that validation, not the
/// extractor, decides what is wrong.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadForm {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub query: String,
}

/// Per-field validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub content: Option<String>,
    pub query: Option<String>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.query.is_none()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::new();
        if let Some(message) = &self.content {
            fields.push(format!("content: {}", message));
        }
        if let Some(message) = &self.query {
            fields.push(format!("query: {}", message));
        }
        write!(f, "invalid form ({})", fields.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Validated, whitespace-trimmed form values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedForm {
    pub content: String,
    pub query: String,
}

impl CleanedForm {
    pub fn into_query(self) -> RAGQuery {
        RAGQuery::new(self.content, self.query)
    }
}

impl UploadForm {
    pub fn new(content: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            query: query.into(),
        }
    }

    /// Trim both fields and require each to be non-empty
    pub fn validate(&self) -> Result<CleanedForm, ValidationError> {
        let content = self.content.trim();
        let query = self.query.trim();

        let errors = ValidationError {
            content: content.is_empty().then(|| REQUIRED_MESSAGE.to_string()),
            query: query.is_empty().then(|| REQUIRED_MESSAGE.to_string()),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanedForm {
            content: content.to_string(),
            query: query.to_string(),
        })
    }
}
