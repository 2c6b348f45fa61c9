//! srvsvc-cli -- helpers behind the `srvsvc-decode` binary.
//!
//! Reads hex or base64 stub captures, runs them through the dissector and
//! renders the result as an indented tree or JSON.

pub mod config;

use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine;
use bytes::Bytes;
use srvsvc_dissector::{fields, ops, Dissection, Outcome};

use config::{InputEncoding, OutputFormat};

/// Exit status for a decode that hit malformed input.
pub const EXIT_MALFORMED: i32 = 2;

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs_or_home() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn dirs_or_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Reads a capture from `path`, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Decodes a textual capture. Whitespace anywhere in the input is ignored.
pub fn decode_input(text: &str, encoding: InputEncoding) -> anyhow::Result<Bytes> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = match encoding {
        InputEncoding::Hex => hex::decode(&compact)
            .map_err(|e| anyhow::anyhow!("invalid hex input: {e}"))?,
        InputEncoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(&compact)
            .map_err(|e| anyhow::anyhow!("invalid base64 input: {e}"))?,
    };
    Ok(Bytes::from(bytes))
}

pub fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Decoded => "decoded",
        Outcome::NotDecoded => "not_decoded",
        Outcome::UnknownOpcode => "unknown_opcode",
        Outcome::Malformed(_) => "malformed",
    }
}

pub fn exit_code(d: &Dissection) -> i32 {
    if d.is_malformed() {
        EXIT_MALFORMED
    } else {
        0
    }
}

/// Exit status for a failed command-line parse. Usage errors exit 1 so that
/// [`EXIT_MALFORMED`] stays unambiguous; `--help` and `--version` exit 0.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

pub fn render(d: &Dissection, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = d.tree.render_text();
            if let Some(note) = d.diagnostic() {
                out.push_str(&format!("[{note}]\n"));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "opnum": d.opnum,
                "direction": d.direction,
                "start": d.start,
                "offset": d.offset,
                "outcome": outcome_name(&d.outcome),
                "diagnostic": d.diagnostic(),
                "tree": d.tree.to_json(),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

/// One line per operation: opnum, name, which bodies are decoded.
pub fn list_operations() -> String {
    let mut out = String::new();
    for op in ops::OPERATIONS {
        let bodies = match (op.request.is_some(), op.response.is_some()) {
            (true, true) => "request, response",
            (true, false) => "request",
            (false, true) => "response",
            (false, false) => "-",
        };
        out.push_str(&format!("{:>3}  {:<22} {bodies}\n", op.opnum, op.name));
    }
    out
}

pub fn list_fields() -> String {
    let mut out = String::new();
    for field in fields::FIELDS {
        let kind = serde_json::to_value(field.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<28} {:<7} {:<16} {}\n",
            field.abbrev, kind, field.name, field.blurb
        ));
    }
    out
}
