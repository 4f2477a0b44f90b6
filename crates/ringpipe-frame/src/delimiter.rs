//! Built-in line delimiters.

/// Unix line feed.
pub const LF: &str = "\n";

/// Carriage return + line feed.
pub const CRLF: &str = "\r\n";

/// The host platform's line terminator.
#[cfg(windows)]
pub const NATIVE: &str = CRLF;

/// The host platform's line terminator.
#[cfg(not(windows))]
pub const NATIVE: &str = LF;

/// Returns a human-readable name for a delimiter.
pub fn delimiter_name(delimiter: &str) -> &'static str {
    match delimiter {
        LF => "LF",
        CRLF => "CRLF",
        "\r" => "CR",
        "" => "EMPTY",
        _ => "CUSTOM",
    }
}
