use crate::delimiter::NATIVE;
use crate::error::{FramingError, Result};

/// Configuration for line framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingConfig {
    /// Terminator that ends a line. Default: the platform line terminator.
    pub delimiter: String,
    /// When true, `read_line` returns an unterminated line instead of
    /// failing with `Underflow` once the pipe runs dry.
    pub partial_on_underflow: bool,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            delimiter: NATIVE.to_string(),
            partial_on_underflow: false,
        }
    }
}

impl FramingConfig {
    /// Configuration with an explicit delimiter.
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..Self::default()
        }
    }

    /// Reject configurations that can never frame a line.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(FramingError::EmptyDelimiter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = FramingConfig::default();
        assert_eq!(cfg.delimiter, NATIVE);
        assert!(!cfg.partial_on_underflow);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_delimiter_rejected() {
        let cfg = FramingConfig::with_delimiter("");
        assert!(matches!(cfg.validate(), Err(FramingError::EmptyDelimiter)));
    }
}
