use ringpipe_buffer::CircularBuffer;
use ringpipe_frame::{Framed, FramingConfig};

use crate::cmd::{new_pipe, unescape, SimulateArgs};
use crate::exit::{framing_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{escape, print_steps, OutputFormat, StepOutput};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Write(String),
    WriteLine(String),
    Read(usize),
    ReadLine,
    Unread(char),
    Peek,
    PeekLine,
    PeekAll,
    Clear,
}

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let ops = args
        .ops
        .iter()
        .map(|raw| parse_op(raw))
        .collect::<CliResult<Vec<_>>>()?;
    let config = FramingConfig::with_delimiter(unescape(&args.delimiter));
    config
        .validate()
        .map_err(|err| framing_error("invalid --delimiter", err))?;

    let mut pipe = new_pipe(args.capacity)?;
    let mut steps = Vec::with_capacity(ops.len() + 1);
    steps.push(StepOutput::new(0, "new", Ok(String::new()), &pipe.snapshot()));

    for (i, (raw, op)) in args.ops.iter().zip(&ops).enumerate() {
        let outcome = apply(&mut pipe, &config, op);
        if let Err(err) = &outcome {
            tracing::debug!(step = i + 1, op = %raw, error = %err, "operation rejected");
        }
        steps.push(StepOutput::new(i + 1, raw, outcome, &pipe.snapshot()));
    }

    print_steps(&steps, format);
    Ok(SUCCESS)
}

fn parse_op(raw: &str) -> CliResult<Op> {
    let (name, arg) = match raw.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (raw, None),
    };
    let usage = || CliError::new(USAGE, format!("invalid operation: {raw}"));

    let op = match (name, arg) {
        ("write", Some(text)) => Op::Write(unescape(text)),
        ("write-line", Some(text)) => Op::WriteLine(unescape(text)),
        ("read", Some(count)) => Op::Read(count.parse().map_err(|_| usage())?),
        ("read-line", None) => Op::ReadLine,
        ("unread", Some(ch)) => {
            let text = unescape(ch);
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Op::Unread(ch),
                _ => return Err(usage()),
            }
        }
        ("peek", None) => Op::Peek,
        ("peek-line", None) => Op::PeekLine,
        ("peek-all", None) => Op::PeekAll,
        ("clear", None) => Op::Clear,
        _ => return Err(usage()),
    };
    Ok(op)
}

fn apply(pipe: &mut CircularBuffer, config: &FramingConfig, op: &Op) -> Result<String, String> {
    match op {
        Op::Write(text) => pipe.write(text).map(|()| String::new()).map_err(|e| e.to_string()),
        Op::Read(count) => pipe.read(*count).map(|s| escape(&s)).map_err(|e| e.to_string()),
        Op::Unread(ch) => pipe.unread(*ch).map(|()| String::new()).map_err(|e| e.to_string()),
        Op::Peek => pipe.peek().map(|ch| escape(&ch.to_string())).map_err(|e| e.to_string()),
        Op::PeekAll => pipe.peek_all().map(|s| escape(&s)).map_err(|e| e.to_string()),
        Op::Clear => {
            pipe.clear();
            Ok(String::new())
        }
        Op::WriteLine(text) => framed(pipe, config)?
            .write_line(text)
            .map(|()| String::new())
            .map_err(|e| e.to_string()),
        Op::ReadLine => framed(pipe, config)?
            .read_line()
            .map(|s| escape(&s))
            .map_err(|e| e.to_string()),
        Op::PeekLine => framed(pipe, config)?
            .peek_line()
            .map(|s| escape(&s))
            .map_err(|e| e.to_string()),
    }
}

fn framed<'a>(pipe: &'a mut CircularBuffer, config: &FramingConfig) -> Result<Framed<'a>, String> {
    Framed::with_config(pipe, config.clone()).map_err(|e| e.to_string())
}
