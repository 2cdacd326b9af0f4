//! SWC text serialization and parsing

use super::node::SwcNode;
use crate::geometry::Point3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Column names in file order, used in parse errors
const COLUMNS: [&str; 7] = ["id", "type", "x", "y", "z", "radius", "parent"];

/// Errors that can occur while reading or writing SWC files
#[derive(Debug, Error)]
pub enum SwcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected 7 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Result type for SWC operations
pub type SwcResult<T> = Result<T, SwcError>;

/// Format one node as an SWC line (without trailing newline)
pub fn format_node(node: &SwcNode) -> String {
    format!(
        "{} {} {:.6} {:.6} {:.6} {:.6} {}",
        node.id,
        node.node_type,
        node.position.x,
        node.position.y,
        node.position.z,
        node.radius,
        node.parent
    )
}

/// Write nodes in the given order, one line each
pub fn write_swc<W: Write>(mut writer: W, nodes: &[SwcNode]) -> std::io::Result<()> {
    for node in nodes {
        writeln!(writer, "{}", format_node(node))?;
    }
    writer.flush()
}

/// Render nodes to an in-memory SWC document
pub fn to_swc_string(nodes: &[SwcNode]) -> String {
    let mut out = String::with_capacity(nodes.len() * 48);
    for node in nodes {
        out.push_str(&format_node(node));
        out.push('\n');
    }
    out
}

/// Write nodes to a file, replacing any existing content
pub fn save_swc(path: impl AsRef<Path>, nodes: &[SwcNode]) -> SwcResult<()> {
    let file = File::create(path.as_ref())?;
    write_swc(BufWriter::new(file), nodes)?;
    Ok(())
}

/// Parse SWC text into nodes
///
/// Blank lines and `#` comments are ignored. Any other line must carry exactly
/// seven numeric fields; a single bad line rejects the whole document because
/// parent references can no longer be trusted once a row is missing.
pub fn parse_swc(text: &str) -> SwcResult<Vec<SwcNode>> {
    let mut nodes = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != COLUMNS.len() {
            return Err(SwcError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let id = parse_integer(fields[0], line, 0)?;
        let node_type = parse_integer(fields[1], line, 1)?;
        let node_type = i32::try_from(node_type).map_err(|_| invalid(fields[1], line, 1))?;
        let x = parse_float(fields[2], line, 2)?;
        let y = parse_float(fields[3], line, 3)?;
        let z = parse_float(fields[4], line, 4)?;
        let radius = parse_float(fields[5], line, 5)?;
        let parent = parse_integer(fields[6], line, 6)?;

        nodes.push(SwcNode::new(id, node_type, Point3::new(x, y, z), radius, parent));
    }

    Ok(nodes)
}

/// Read and parse an SWC file
pub fn load_swc(path: impl AsRef<Path>) -> SwcResult<Vec<SwcNode>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_swc(&text)
}

/// Recover 0-based `(parent, child)` index pairs from parent links
///
/// Only rows whose id and parent are both positive contribute an edge.
pub fn reconstruct_edges(nodes: &[SwcNode]) -> Vec<(i64, i64)> {
    nodes
        .iter()
        .filter(|n| n.id > 0 && n.parent > 0)
        .map(|n| (n.parent - 1, n.id - 1))
        .collect()
}

/// Whether ids run `1..=N` in row order
pub fn ids_are_sequential(nodes: &[SwcNode]) -> bool {
    nodes
        .iter()
        .enumerate()
        .all(|(row, n)| n.id == row as i64 + 1)
}

fn invalid(value: &str, line: usize, column: usize) -> SwcError {
    SwcError::InvalidField {
        line,
        column: COLUMNS[column],
        value: value.to_string(),
    }
}

/// Integer columns also accept integral floats such as `3.0`
fn parse_integer(token: &str, line: usize, column: usize) -> SwcResult<i64> {
    if let Ok(v) = token.parse::<i64>() {
        return Ok(v);
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(invalid(token, line, column)),
    }
}

fn parse_float(token: &str, line: usize, column: usize) -> SwcResult<f64> {
    token.parse::<f64>().map_err(|_| invalid(token, line, column))
}
