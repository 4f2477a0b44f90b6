use ringpipe_frame::Framed;

use crate::cmd::{new_pipe, pump, read_stdin, ExprsArgs};
use crate::exit::{framing_error, CliResult, SUCCESS};
use crate::output::{print_frame, FrameKind, OutputFormat};

pub fn run(args: ExprsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut pipe = new_pipe(args.capacity)?;
    let input = read_stdin()?;

    let mut emitted = 0usize;
    pump(&mut pipe, &input, args.chunk, |pipe, eof| {
        let mut framed = Framed::new(pipe);

        loop {
            match framed.read_expression() {
                Ok(value) => {
                    let text = value.to_string();
                    print_frame(FrameKind::Expression, emitted, &text, None, format);
                    emitted += 1;
                }
                Err(err) if err.is_underflow() => break,
                Err(err) => {
                    return Err(framing_error(
                        &format!("expression #{emitted} is malformed"),
                        err,
                    ))
                }
            }
        }

        if eof {
            let rest = framed
                .peek_all()
                .map_err(|err| framing_error("inspect failed", err))?;
            if !rest.trim().is_empty() {
                tracing::warn!(
                    pending = rest.chars().count(),
                    "dropping incomplete trailing expression"
                );
            }
        }
        Ok(())
    })?;

    tracing::debug!(expressions = emitted, "input exhausted");
    Ok(SUCCESS)
}
