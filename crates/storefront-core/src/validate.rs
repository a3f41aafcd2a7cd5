//! Small input checks shared by product and order validation.

use crate::error::FieldError;

/// Accumulates field errors so a client sees every problem at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed text whose char count falls within `min..=max`.
    pub fn text(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len < min || len > max {
            let message = if min > 0 {
                format!("{field} is required and must be at most {max} characters")
            } else {
                format!("{field} must be at most {max} characters")
            };
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Finite number not below `min`.
    pub fn number_at_least(&mut self, field: &str, value: f64, min: f64) -> &mut Self {
        if !value.is_finite() || value < min {
            self.errors.push(FieldError::new(
                field,
                format!("{field} must be a number >= {min}"),
            ));
        }
        self
    }

    /// Absolute http(s) URL.
    pub fn url(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_http_url(value.trim()) {
            self.errors
                .push(FieldError::new(field, format!("{field} must be a valid URL")));
        }
        self
    }

    /// Plausible email address.
    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_email(value.trim()) {
            self.errors.push(FieldError::new(
                field,
                format!("{field} must be a valid email"),
            ));
        }
        self
    }

    /// Records an arbitrary failed check.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok when nothing failed, otherwise every collected error.
    pub fn finish(self) -> crate::Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(crate::StoreError::Validation(self.errors))
        }
    }
}

/// Returns true for absolute `http`/`https` URLs with a host.
pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Returns true for `local@domain.tld` shaped addresses.
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && !host.starts_with('.')
        && !host.ends_with('.')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
