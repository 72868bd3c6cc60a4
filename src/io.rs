use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{ConfigurationError, ParseError, Result};
use crate::instruction::{Instruction, Operation, TraceRecord};
use crate::page_table::PageTableEntry;

/// Parse a whitespace separated list of frame identifiers
pub fn parse_frames(content: &str) -> Result<Vec<u32>> {
    let mut frames = Vec::new();
    for token in content.split_whitespace() {
        let value: i64 = token
            .parse()
            .map_err(|_| ParseError::InvalidFrame(token.to_string()))?;
        if value < 0 {
            return Err(ConfigurationError::NegativeFrame(value).into());
        }
        let frame = u32::try_from(value).map_err(|_| ParseError::InvalidFrame(token.to_string()))?;
        frames.push(frame);
    }
    Ok(frames)
}

pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_frames(&content)
}

/// Parse an instruction list, one `index operation page offset` per line.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_instructions(content: &str) -> std::result::Result<Vec<Instruction>, ParseError> {
    let mut instructions = Vec::new();

    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != 4 {
            return Err(ParseError::FieldCount {
                line,
                expected: 4,
                found: tokens.len(),
            });
        }

        let index = parse_field(line, "index", tokens[0])?;
        let operation: Operation = tokens[1].parse().map_err(|_| ParseError::UnknownOperation {
            line,
            token: tokens[1].to_string(),
        })?;
        let page_number = parse_field(line, "page number", tokens[2])?;
        let offset = parse_field(line, "offset", tokens[3])?;

        instructions.push(Instruction {
            index,
            operation,
            page_number,
            offset,
        });
    }

    Ok(instructions)
}

fn parse_field(line: usize, field: &'static str, token: &str) -> std::result::Result<usize, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidField {
        line,
        field,
        token: token.to_string(),
    })
}

pub fn read_instructions<P: AsRef<Path>>(path: P) -> Result<Vec<Instruction>> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(parse_instructions(&content)?)
}

/// Page table as an aligned text table; absent frames are left blank
pub fn render_page_table(entries: &[PageTableEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>7}  {:>5}  {:>8}  {:>4}",
        "page", "present", "frame", "modified", "disk"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:>7}  {:>5}  {:>8}  {:>4}",
            entry.page_number(),
            u8::from(entry.present),
            entry.frame_cell(),
            u8::from(entry.modified),
            entry.disk_location()
        );
    }
    out
}

/// Executed instructions with their physical addresses and fault outcome
pub fn render_trace(records: &[TraceRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:>4}  {:>4}  {:>6}  {:>8}  {}",
        "index", "op", "page", "offset", "physical", "fault"
    );
    for record in records {
        let ins = &record.instruction;
        let _ = writeln!(
            out,
            "{:>5}  {:>4}  {:>4}  {:>6}  {:>8}  {}",
            ins.index, ins.operation, ins.page_number, ins.offset, record.physical_address, record.fault
        );
    }
    out
}
