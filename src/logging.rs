//! Redaction helpers so provider credentials never reach the logs.

use std::fmt;

/// API key shown as its first 8 characters followed by `***`
///
/// # Example
/// ```
/// use battery_market::logging::SensitiveApiKey;
///
/// let sanitized = SensitiveApiKey::new("AIzaSyD-abcdef123456");
/// assert_eq!(format!("{}", sanitized), "AIzaSyD-***");
/// ```
#[derive(Clone, Debug)]
pub struct SensitiveApiKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveApiKey<'a> {
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl<'a> fmt::Display for SensitiveApiKey<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.char_indices().nth(8) {
            // Too short to reveal anything
            None => write!(f, "***"),
            Some((end, _)) => write!(f, "{}***", &self.inner[..end]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_api_key_display() {
        let sanitized = SensitiveApiKey::new("sk-proj-abcdef123456");
        assert_eq!(format!("{}", sanitized), "sk-proj-***");
    }

    #[test]
    fn test_sensitive_api_key_short() {
        assert_eq!(SensitiveApiKey::new("sk-abc").to_string(), "***");
        assert_eq!(SensitiveApiKey::new("12345678").to_string(), "***");
        assert_eq!(SensitiveApiKey::new("").to_string(), "***");
    }
}
