use ringpipe_frame::{delimiter_name, Framed, FramingConfig};

use crate::cmd::{new_pipe, pump, read_stdin, unescape, LinesArgs};
use crate::exit::{framing_error, CliResult, SUCCESS};
use crate::output::{print_frame, FrameKind, OutputFormat};

pub fn run(args: LinesArgs, format: OutputFormat) -> CliResult<i32> {
    let config = FramingConfig::with_delimiter(unescape(&args.delimiter));
    config
        .validate()
        .map_err(|err| framing_error("invalid --delimiter", err))?;

    let mut pipe = new_pipe(args.capacity)?;
    let input = read_stdin()?;
    tracing::debug!(
        capacity = pipe.capacity(),
        delimiter = delimiter_name(&config.delimiter),
        input_chars = input.len(),
        "framing lines"
    );

    let mut emitted = 0usize;
    pump(&mut pipe, &input, args.chunk, |pipe, eof| {
        let mut framed = Framed::with_config(pipe, config.clone())
            .map_err(|err| framing_error("framing failed", err))?;
        framed.set_partial_on_underflow(eof && args.partial);

        loop {
            match framed.read_line() {
                Ok(line) => {
                    let delimiter = framed.config().delimiter.as_str();
                    print_frame(FrameKind::Line, emitted, &line, Some(delimiter), format);
                    emitted += 1;
                }
                Err(err) if err.is_underflow() => break,
                Err(err) => return Err(framing_error("read failed", err)),
            }
        }

        let pipe = framed.into_inner();
        if eof && !pipe.is_empty() {
            tracing::warn!(
                pending = pipe.len(),
                "dropping unterminated trailing line (use --partial to keep it)"
            );
        }
        Ok(())
    })?;

    tracing::debug!(lines = emitted, "input exhausted");
    Ok(SUCCESS)
}
