//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data. Text is written
//! as UTF-8 and converted to the printer code table in [`EscPosBuilder::build`].

use crate::document::{Alignment, DrawerPin, TextStyle};
use crate::encoding::TextEncoding;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers.
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    /// Create a new builder, starting with printer init
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf }
    }

    // === Text Output ===

    /// Write text (encoded on build)
    ///
    /// Control characters are dropped so text can never carry commands.
    pub fn text(&mut self, s: &str) -> &mut Self {
        let mut utf8 = [0u8; 4];
        for c in s.chars().filter(|c| !c.is_control()) {
            self.buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        }
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Set justification (ESC a n)
    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        let n = match alignment {
            Alignment::Left => 0x00,
            Alignment::Center => 0x01,
            Alignment::Right => 0x02,
        };
        self.buf.extend_from_slice(&[0x1B, 0x61, n]);
        self
    }

    // === Text Style ===

    /// Select print mode (ESC ! n)
    ///
    /// Print mode is a single byte, so each style replaces the previous one.
    pub fn style(&mut self, style: TextStyle) -> &mut Self {
        let n = match style {
            TextStyle::Normal => 0x00,
            TextStyle::Bold => 0x08,
            TextStyle::DoubleSize => 0x30,
        };
        self.buf.extend_from_slice(&[0x1B, 0x21, n]);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    // === Cash Drawer ===

    /// Open cash drawer
    pub fn open_drawer(&mut self, pin: DrawerPin) -> &mut Self {
        // ESC p m t1 t2 - Generate pulse on pin m
        let m = match pin {
            DrawerPin::Pin2 => 0x00,
            DrawerPin::Pin5 => 0x01,
        };
        self.buf.extend_from_slice(&[0x1B, 0x70, m, 25, 250]);
        self
    }

    // === Build ===

    /// Build the final byte buffer in the given printer code table
    ///
    /// This converts all UTF-8 text while preserving ESC/POS commands.
    pub fn build(self, encoding: TextEncoding) -> Vec<u8> {
        encoding.encode(&self.buf)
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}
