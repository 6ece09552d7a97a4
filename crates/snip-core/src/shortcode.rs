use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short code identifier for a stored mapping.
///
/// Short codes are 1-32 characters long and contain only ASCII letters and
/// digits, which keeps them safe to embed as a single URL path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

pub const MAX_LENGTH: usize = 32;

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are 1-32 characters and contain only `[a-zA-Z0-9]`.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (a generator drawing from the alphanumeric alphabet, or a row read
    /// back from the store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.is_empty() || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only ASCII letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
