//! Line and structured-expression framing over a ringpipe buffer.
//!
//! Framing is built purely from the pipe's read, write and unread
//! primitives:
//! - Lines end with a configurable delimiter, included in what is returned
//! - Expressions end wherever the [`ExpressionFormat`] says they end
//! - Peeks consume and then unread, so they cost time proportional to the
//!   look-ahead
//!
//! A failed read never loses data: characters consumed before an underflow
//! are pushed back.

pub mod config;
pub mod delimiter;
pub mod error;
pub mod expression;
pub mod framed;
pub mod reader;
pub mod writer;

pub use config::FramingConfig;
pub use delimiter::{delimiter_name, CRLF, LF, NATIVE};
pub use error::{FramingError, Result};
pub use expression::{ExpressionFormat, JsonExpressions};
pub use framed::Framed;
