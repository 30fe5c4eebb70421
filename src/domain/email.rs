//! Email value object.

use std::fmt;

use crate::domain::ValidationError;

/// Characters that may not appear in the address itself.
const FORBIDDEN: &[char] = &[',', ';', '<', '>', '(', ')', '[', ']', '\\', '"', ':'];

/// A syntactically valid email address, case preserved.
///
/// Accepts a bare `local@domain` or a display form `Name <local@domain>`, in
/// which case only the address is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }

        let address = match (trimmed.find('<'), trimmed.rfind('>')) {
            (None, None) => trimmed,
            (Some(open), Some(close)) if open < close && close == trimmed.len() - 1 => {
                trimmed[open + 1..close].trim()
            }
            _ => return Err(invalid("unbalanced angle brackets")),
        };

        if address.chars().any(char::is_whitespace) {
            return Err(invalid("whitespace inside address"));
        }
        if address.contains(FORBIDDEN) {
            return Err(invalid("forbidden character in address"));
        }

        let (local, domain) = address
            .split_once('@')
            .ok_or_else(|| invalid("missing @"))?;
        if local.is_empty() {
            return Err(invalid("missing local part"));
        }
        if domain.is_empty() {
            return Err(invalid("missing domain"));
        }
        if domain.contains('@') {
            return Err(invalid("more than one @"));
        }
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err(invalid("misplaced dot in local part"));
        }
        if domain.split('.').any(str::is_empty) {
            return Err(invalid("empty domain label"));
        }

        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn invalid(reason: &str) -> ValidationError {
    ValidationError::InvalidEmail(reason.to_string())
}
