use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use ringpipe_buffer::Snapshot;
use ringpipe_frame::delimiter_name;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Line,
    Expression,
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    kind: FrameKind,
    index: usize,
    chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    delimiter: Option<&'static str>,
    text: &'a str,
}

/// One row of a `simulate` run.
#[derive(Debug, Serialize)]
pub struct StepOutput {
    pub step: usize,
    pub op: String,
    pub ok: bool,
    pub outcome: String,
    pub read_pos: usize,
    pub write_pos: usize,
    pub num_written: usize,
    pub num_unwritten: usize,
    pub content: String,
}

impl StepOutput {
    pub fn new(step: usize, op: &str, outcome: Result<String, String>, state: &Snapshot) -> Self {
        let (ok, outcome) = match outcome {
            Ok(value) => (true, value),
            Err(err) => (false, err),
        };
        Self {
            step,
            op: op.to_string(),
            ok,
            outcome,
            read_pos: state.read_pos,
            write_pos: state.write_pos(),
            num_written: state.num_written,
            num_unwritten: state.num_unwritten(),
            content: state.content(),
        }
    }
}

pub fn print_frame(kind: FrameKind, index: usize, text: &str, delimiter: Option<&str>, format: OutputFormat) {
    let delimiter = delimiter
        .filter(|d| text.ends_with(*d))
        .map(delimiter_name);
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                kind,
                index,
                chars: text.chars().count(),
                delimiter,
                text,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "INDEX", "CHARS", "TEXT"])
                .add_row(vec![
                    kind_name(kind).to_string(),
                    index.to_string(),
                    text.chars().count().to_string(),
                    escape(text),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} #{} chars={} text=\"{}\"",
                kind_name(kind),
                index,
                text.chars().count(),
                escape(text)
            );
        }
        OutputFormat::Raw => {
            print_raw(text);
        }
    }
}

pub fn print_steps(steps: &[StepOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for step in steps {
                println!(
                    "{}",
                    serde_json::to_string(step).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "STEP", "OP", "RESULT", "READ", "WRITE", "WRITTEN", "FREE", "CONTENT",
                ]);
            for step in steps {
                table.add_row(vec![
                    step.step.to_string(),
                    escape(&step.op),
                    outcome_cell(step),
                    step.read_pos.to_string(),
                    step.write_pos.to_string(),
                    step.num_written.to_string(),
                    step.num_unwritten.to_string(),
                    escape(&step.content),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for step in steps {
                println!(
                    "{:>3} {:<16} {:<28} read={} write={} written={} free={} content=\"{}\"",
                    step.step,
                    escape(&step.op),
                    outcome_cell(step),
                    step.read_pos,
                    step.write_pos,
                    step.num_written,
                    step.num_unwritten,
                    escape(&step.content)
                );
            }
        }
        OutputFormat::Raw => {
            if let Some(last) = steps.last() {
                print_raw(&last.content);
            }
        }
    }
}

pub fn print_raw(text: &str) {
    let mut out = std::io::stdout();
    let _ = out.write_all(text.as_bytes());
    let _ = out.flush();
}

fn kind_name(kind: FrameKind) -> &'static str {
    match kind {
        FrameKind::Line => "line",
        FrameKind::Expression => "expression",
    }
}

fn outcome_cell(step: &StepOutput) -> String {
    if step.ok {
        format!("ok {}", escape(&step.outcome)).trim_end().to_string()
    } else {
        format!("error: {}", step.outcome)
    }
}

/// Make control characters visible in single-line output.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_control_chars() {
        assert_eq!(escape("a\r\n\tb\\"), "a\\r\\n\\tb\\\\");
    }

    #[test]
    fn step_from_snapshot() {
        let snap = Snapshot {
            read_pos: 3,
            num_written: 2,
            backing: "abcd".chars().collect(),
        };
        let step = StepOutput::new(1, "read:1", Ok("x".into()), &snap);
        assert!(step.ok);
        assert_eq!(step.write_pos, 1);
        assert_eq!(step.num_unwritten, 2);
        assert_eq!(step.content, "da");

        let failed = StepOutput::new(2, "read:9", Err("underflow".into()), &snap);
        assert!(!failed.ok);
        assert_eq!(outcome_cell(&failed), "error: underflow");
    }

    #[test]
    fn frame_output_serializes_kind_lowercase() {
        let out = FrameOutput {
            kind: FrameKind::Expression,
            index: 0,
            chars: 2,
            delimiter: None,
            text: "{}",
        };
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"kind":"expression","index":0,"chars":2,"text":"{}"}"#);
    }
}
