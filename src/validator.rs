//! Collected OpenAPI document problems.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Error carrying every issue found in one document
#[derive(Debug, Clone)]
pub struct SpecValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for SpecValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OpenAPI spec validation failed, {} issue(s) found:",
            self.issues.len()
        )?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SpecValidationError {}

/// Turn collected issues into an error, logging each one
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> Result<(), SpecValidationError> {
    if issues.is_empty() {
        return Ok(());
    }
    for issue in &issues {
        tracing::error!(
            kind = %issue.kind,
            location = %issue.location,
            message = %issue.message,
            "OpenAPI validation issue"
        );
    }
    Err(SpecValidationError { issues })
}
