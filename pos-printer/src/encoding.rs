//! Text encoding utilities for thermal printers
//!
//! Receipt printers do not speak UTF-8. Text must be converted to the code
//! table the printer has selected while ESC/POS command bytes (all ASCII)
//! pass through untouched.
//!
//! Two code tables are supported:
//! - WPC1252 (Western Europe, `ESC t 16`) for Latin receipts
//! - GBK (Chinese mode, `FS &` / `FS C 1`) for Chinese printers

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Printer code table used for text bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Windows-1252, selected with `ESC t 16`
    #[default]
    Cp1252,
    /// GBK, selected with Chinese mode
    Gbk,
}

impl TextEncoding {
    /// Convert a UTF-8 ESC/POS stream into printer bytes
    pub fn encode(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            TextEncoding::Cp1252 => convert_to_cp1252(bytes),
            TextEncoding::Gbk => convert_to_gbk(bytes),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cp1252" | "wpc1252" | "windows-1252" | "latin" => Ok(TextEncoding::Cp1252),
            "gbk" => Ok(TextEncoding::Gbk),
            other => Err(format!("unknown text encoding: {}", other)),
        }
    }
}

// ============================================================================
// Column metrics
// ============================================================================

/// Number of printer columns a character occupies
///
/// Characters representable in WPC1252 are single width, everything else
/// (CJK, full-width forms) takes two columns.
fn char_width(c: char) -> usize {
    if c.is_ascii() {
        return 1;
    }
    let mut buf = [0u8; 4];
    let (_, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    if had_errors { 2 } else { 1 }
}

/// Get the printed column width of a string
pub fn text_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Truncate a string to fit within a column width
pub fn truncate_text(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = char_width(c);
        if width + w > max_width {
            break;
        }
        result.push(c);
        width += w;
    }
    result
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(s);
    if current_width >= width {
        return truncate_text(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Pad a string to at least a column width, never truncating
///
/// Used for amounts, which must print in full even when wider than the column.
pub fn pad_to_width(s: &str, width: usize, align_right: bool) -> String {
    let spaces = width.saturating_sub(text_width(s));
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

// ============================================================================
// Stream conversion
// ============================================================================

/// Select character code table WPC1252 (ESC t 16)
const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 16];

/// Convert mixed UTF-8 content (with ESC/POS commands) to WPC1252
///
/// ASCII bytes are kept exactly as they are, which protects ESC/POS
/// commands. Runs of non-ASCII bytes are decoded as UTF-8 and re-encoded,
/// characters outside the code table become `?`.
///
/// The code table is selected at the start and again after every INIT
/// command (ESC @), which resets it.
#[instrument(skip(bytes))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + 8);
    let mut pending = Vec::new();
    let mut selected = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_cp1252(&mut pending, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&SELECT_CP1252);
            selected = true;
            i += 2;
            continue;
        }

        if !selected {
            result.extend_from_slice(&SELECT_CP1252);
            selected = true;
        }

        if b < 128 {
            flush_cp1252(&mut pending, &mut result);
            result.push(b);
        } else {
            pending.push(b);
        }
        i += 1;
    }

    flush_cp1252(&mut pending, &mut result);
    result
}

fn flush_cp1252(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    let mut utf8 = [0u8; 4];
    for c in s.chars() {
        let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut utf8));
        if had_errors {
            result.push(b'?');
        } else {
            result.extend_from_slice(&encoded);
        }
    }
    buffer.clear();
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to GBK
///
/// This function preserves ASCII bytes (0x00-0x7F) exactly as is,
/// which protects ESC/POS commands from being corrupted.
/// Only bytes >= 0x80 are treated as UTF-8 sequences and converted to GBK.
///
/// Also handles:
/// - Re-enabling Chinese mode after INIT command (ESC @)
/// - Euro symbol (€) special handling
#[instrument(skip(bytes))]
pub fn convert_to_gbk(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() * 2);

    // FS & - Enable Chinese mode, FS C 1 - Select GBK
    result.extend_from_slice(&[0x1C, 0x26, 0x1C, 0x43, 0x01]);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // INIT leaves Chinese mode, re-enable it right after
        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_gbk(&mut buffer, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&[0x1C, 0x26]);
            i += 2;
            continue;
        }

        if b < 128 {
            flush_gbk(&mut buffer, &mut result);
            result.push(b);
        } else {
            buffer.push(b);
        }
        i += 1;
    }

    flush_gbk(&mut buffer, &mut result);

    // FS . - Exit Chinese mode
    result.extend_from_slice(&[0x1C, 0x2E]);

    result
}

fn flush_gbk(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    let parts: Vec<&str> = s.split('€').collect();

    for (idx, part) in parts.iter().enumerate() {
        if !part.is_empty() {
            let (gbk, _, _) = encoding_rs::GBK.encode(part);
            result.extend_from_slice(&gbk);
        }
        if idx < parts.len() - 1 {
            // Exit Chinese -> PC858 -> Euro -> Enter Chinese
            result.extend_from_slice(&[0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26]);
        }
    }
    buffer.clear();
}
