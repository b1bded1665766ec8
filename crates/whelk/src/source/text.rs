//! Binary sniffing and text decoding for files on disk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ToolError, ToolResult};

/// Windows-1252 mappings for 0x80..=0x9F; `None` marks undefined bytes.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// True if the first `sniff_bytes` bytes of `path` contain a NUL.
pub fn sniff_binary(path: &Path, sniff_bytes: usize) -> ToolResult<bool> {
    let mut buf = Vec::with_capacity(sniff_bytes);
    File::open(path)?
        .take(sniff_bytes as u64)
        .read_to_end(&mut buf)?;
    Ok(buf.contains(&0))
}

/// Decode `bytes` as UTF-8, falling back to Windows-1252.
///
/// Returns `None` if neither decoding accepts the input.
pub fn decode_text(bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(err) => decode_cp1252(err.as_bytes()),
    }
}

fn decode_cp1252(bytes: &[u8]) -> Option<String> {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
            _ => Some(char::from(b)),
        })
        .collect()
}

/// Read `path` as text, refusing binaries and undecodable content.
pub fn read_text(path: &Path, sniff_bytes: usize) -> ToolResult<String> {
    if sniff_binary(path, sniff_bytes)? {
        return Err(ToolError::BinaryFile(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    decode_text(bytes).ok_or_else(|| ToolError::UnsupportedEncoding(path.display().to_string()))
}

/// Split decoded file text into lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A terminator at the very
/// end does not start another line, but blank lines before it are kept.
pub fn split_source_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(idx) => {
                lines.push(&rest[..idx]);
                let width = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + width..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}
