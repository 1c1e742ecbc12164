//! Well-known SMTP provider presets.

/// Connection preset for a well-known provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmtpPreset {
    /// Display label.
    pub label: &'static str,
    /// Sender-address domain suffixes this preset covers.
    pub domains: &'static [&'static str],
    /// SMTP host.
    pub host: &'static str,
    /// SMTP port.
    pub port: u16,
}

/// The presets offered on the provider settings screen.
pub const SMTP_PRESETS: [SmtpPreset; 4] = [
    SmtpPreset {
        label: "Gmail / Google Workspace",
        domains: &["gmail.com", "googlemail.com", "google.com"],
        host: "smtp.gmail.com",
        port: 587,
    },
    SmtpPreset {
        label: "Outlook / Microsoft 365",
        domains: &[
            "outlook.com",
            "hotmail.com",
            "live.com",
            "office365.com",
            "microsoft.com",
        ],
        host: "smtp.office365.com",
        port: 587,
    },
    SmtpPreset {
        label: "Yahoo Mail",
        domains: &["yahoo.com", "yahoo.co.uk", "ymail.com"],
        host: "smtp.mail.yahoo.com",
        port: 587,
    },
    SmtpPreset {
        label: "Zoho Mail",
        domains: &["zoho.com"],
        host: "smtp.zoho.com",
        port: 587,
    },
];

/// Detects the preset matching a sender address, by domain suffix.
#[must_use]
pub fn detect_preset(email: &str) -> Option<&'static SmtpPreset> {
    let domain = email.split('@').nth(1)?.to_lowercase();
    if domain.is_empty() {
        return None;
    }
    SMTP_PRESETS
        .iter()
        .find(|preset| preset.domains.iter().any(|suffix| domain.ends_with(suffix)))
}
