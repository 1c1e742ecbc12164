//! Provider profile validation.

use super::model::SmtpProvider;

/// Validation error for a provider profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderValidationError {
    /// SMTP host is empty.
    EmptyHost,
    /// SMTP port is invalid.
    InvalidPort,
    /// SMTP username is empty.
    EmptyUsername,
    /// Sender address is empty.
    EmptyFromEmail,
    /// Sender address format is invalid.
    InvalidFromEmail,
}

impl ProviderValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyHost => "SMTP server is required",
            Self::InvalidPort => "SMTP port must be 1-65535",
            Self::EmptyUsername => "SMTP username is required",
            Self::EmptyFromEmail => "Sender address is required",
            Self::InvalidFromEmail => "Invalid sender address format",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyHost => "host",
            Self::InvalidPort => "port",
            Self::EmptyUsername => "username",
            Self::EmptyFromEmail | Self::InvalidFromEmail => "from_email",
        }
    }
}

impl std::fmt::Display for ProviderValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ProviderValidationError {}

/// Validate a provider profile.
///
/// Returns `Ok(())` if valid, or all failing checks at once.
///
/// # Errors
///
/// Returns a vector of `ProviderValidationError` if any fields are invalid.
pub fn validate_provider(provider: &SmtpProvider) -> Result<(), Vec<ProviderValidationError>> {
    let mut errors = Vec::new();

    if provider.host.trim().is_empty() {
        errors.push(ProviderValidationError::EmptyHost);
    }
    if provider.port == 0 {
        errors.push(ProviderValidationError::InvalidPort);
    }
    if provider.username.trim().is_empty() {
        errors.push(ProviderValidationError::EmptyUsername);
    }
    if provider.from_email.trim().is_empty() {
        errors.push(ProviderValidationError::EmptyFromEmail);
    } else if !is_valid_email(&provider.from_email) {
        errors.push(ProviderValidationError::InvalidFromEmail);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() {
        return false;
    }

    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.iter().any(|p| p.is_empty()) {
        return false;
    }

    true
}
