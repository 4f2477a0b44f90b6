use std::io::Read;

use clap::{Args, Subcommand};
use ringpipe_buffer::{CircularBuffer, DEFAULT_CAPACITY};

use crate::exit::{io_error, pipe_error, CliError, CliResult, DATA_INVALID, USAGE};
use crate::output::OutputFormat;

pub mod exprs;
pub mod lines;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pump stdin through a pipe and print each framed line.
    Lines(LinesArgs),
    /// Pump stdin through a pipe and print each JSON expression.
    Exprs(ExprsArgs),
    /// Replay pipe operations and print the state after each one.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Lines(args) => lines::run(args, format),
        Command::Exprs(args) => exprs::run(args, format),
        Command::Simulate(args) => simulate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct LinesArgs {
    /// Pipe capacity in characters.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
    /// Line delimiter. Accepts \n, \r and \t escapes.
    #[arg(long, default_value = "\\n")]
    pub delimiter: String,
    /// Maximum characters written to the pipe between drains.
    #[arg(long, default_value_t = 4096)]
    pub chunk: usize,
    /// Emit an unterminated trailing line instead of dropping it.
    #[arg(long)]
    pub partial: bool,
}

#[derive(Args, Debug)]
pub struct ExprsArgs {
    /// Pipe capacity in characters.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
    /// Maximum characters written to the pipe between drains.
    #[arg(long, default_value_t = 4096)]
    pub chunk: usize,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Pipe capacity in characters.
    #[arg(long, default_value_t = 8)]
    pub capacity: usize,
    /// Delimiter used by read-line, write-line and peek-line.
    #[arg(long, default_value = "\\n")]
    pub delimiter: String,
    /// Operations: write:TEXT, write-line:TEXT, read:N, read-line, unread:C,
    /// peek, peek-line, peek-all, clear.
    #[arg(required = true)]
    pub ops: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn new_pipe(capacity: usize) -> CliResult<CircularBuffer> {
    CircularBuffer::with_capacity(capacity).map_err(|err| pipe_error("invalid --capacity", err))
}

pub(crate) fn read_stdin() -> CliResult<Vec<char>> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(input.chars().collect())
}

/// Feed `input` into `pipe` at most `chunk` characters at a time, calling
/// `drain` after every write and once more at end of input.
///
/// Fails when the pipe is full after a drain, meaning a single frame is
/// larger than the pipe.
pub(crate) fn pump<F>(
    pipe: &mut CircularBuffer,
    input: &[char],
    chunk: usize,
    mut drain: F,
) -> CliResult<()>
where
    F: FnMut(&mut CircularBuffer, bool) -> CliResult<()>,
{
    if chunk == 0 {
        return Err(CliError::new(USAGE, "--chunk must be greater than zero"));
    }

    let mut offset = 0usize;
    while offset < input.len() {
        let room = pipe.remaining().min(chunk).min(input.len() - offset);
        if room == 0 {
            return Err(CliError::new(
                DATA_INVALID,
                format!(
                    "frame at input offset {} exceeds pipe capacity ({} chars)",
                    offset - pipe.len(),
                    pipe.capacity()
                ),
            ));
        }
        pipe.write_chars(&input[offset..offset + room])
            .map_err(|err| pipe_error("write failed", err))?;
        offset += room;
        drain(pipe, false)?;
    }
    drain(pipe, true)
}

/// Expand `\n`, `\r`, `\t` and `\\` escapes.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
