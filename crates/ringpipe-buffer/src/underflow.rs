//! Pluggable recovery for reads that find too little data.

use crate::error::{PipeError, Result};

/// Context handed to an [`UnderflowHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// Characters the read asked for.
    pub requested: usize,
    /// Characters pending in the pipe when the read was attempted.
    pub available: usize,
}

impl Shortfall {
    /// The error a failing handler reports.
    pub fn to_error(self) -> PipeError {
        PipeError::Underflow {
            requested: self.requested,
            available: self.available,
        }
    }
}

/// Decides what a read returns when the pipe holds fewer characters than
/// requested.
///
/// The pipe is not modified before the handler runs and the handler's
/// return value becomes the result of the read. The pipe never retries on
/// its own.
///
/// When the read comes through [`Source`](crate::Source), only the first
/// character is handed out and the rest is pushed back into the pipe, so a
/// substitute may be at most one character longer than the pipe's
/// capacity.
pub trait UnderflowHandler {
    /// Produce substitute content for the read, or an error.
    fn on_underflow(&mut self, shortfall: Shortfall) -> Result<String>;
}

impl<F> UnderflowHandler for F
where
    F: FnMut(Shortfall) -> Result<String>,
{
    fn on_underflow(&mut self, shortfall: Shortfall) -> Result<String> {
        self(shortfall)
    }
}

/// Default handler: fail with [`PipeError::Underflow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FailOnUnderflow;

impl UnderflowHandler for FailOnUnderflow {
    fn on_underflow(&mut self, shortfall: Shortfall) -> Result<String> {
        Err(shortfall.to_error())
    }
}

/// Handler that answers every short read with a fixed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstituteOnUnderflow(pub String);

impl UnderflowHandler for SubstituteOnUnderflow {
    fn on_underflow(&mut self, _shortfall: Shortfall) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_handler_reports_shortfall() {
        let err = FailOnUnderflow
            .on_underflow(Shortfall {
                requested: 3,
                available: 1,
            })
            .unwrap_err();
        assert_eq!(
            err,
            PipeError::Underflow {
                requested: 3,
                available: 1
            }
        );
    }

    #[test]
    fn closures_are_handlers() {
        let mut calls = 0;
        let mut handler = |s: Shortfall| -> Result<String> {
            calls += 1;
            Ok("-".repeat(s.requested))
        };
        let out = handler
            .on_underflow(Shortfall {
                requested: 2,
                available: 0,
            })
            .unwrap();
        assert_eq!(out, "--");
        assert_eq!(calls, 1);
    }

    #[test]
    fn substitute_handler_repeats_value() {
        let mut handler = SubstituteOnUnderflow("eof".to_string());
        let shortfall = Shortfall {
            requested: 1,
            available: 0,
        };
        assert_eq!(handler.on_underflow(shortfall).unwrap(), "eof");
        assert_eq!(handler.on_underflow(shortfall).unwrap(), "eof");
    }
}
