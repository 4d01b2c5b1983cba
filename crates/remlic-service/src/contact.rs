//! Contact form handling.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use remlic_core::error::AppError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const PREVIEW_CHARS: usize = 50;

/// A contact form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// Check that every field is present and the email looks like one.
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(AppError::validation("All fields are required"));
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(AppError::validation("Invalid email address"));
        }
        Ok(())
    }

    /// The first 50 characters of the message, for logs.
    pub fn preview(&self) -> String {
        let mut preview: String = self.message.chars().take(PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    }
}

/// Accepts contact submissions. Nothing is persisted; submissions are
/// logged for the support inbox to pick up.
#[derive(Debug, Clone, Default)]
pub struct ContactService;

impl ContactService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and record a submission.
    pub fn submit(&self, message: &ContactMessage) -> Result<(), AppError> {
        message.validate()?;
        info!(
            name = %message.name,
            email = %message.email,
            subject = %message.subject,
            message = %message.preview(),
            "Contact form submission"
        );
        Ok(())
    }
}
