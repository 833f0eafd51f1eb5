//! Render operations and the immutable ticket document
//!
//! Renderers describe a ticket as a list of [`RenderOp`]s. The document is
//! fully built before any byte is produced, then encoded in one pass.

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::escpos::EscPosBuilder;

/// Horizontal justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Print mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextStyle {
    Normal,
    Bold,
    DoubleSize,
}

/// Cash drawer kick-out connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawerPin {
    Pin2,
    Pin5,
}

/// A single printer instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOp {
    /// One printed line (line feed appended on encode)
    Text(String),
    SetAlignment(Alignment),
    SetStyle(TextStyle),
    Feed(u8),
    Cut,
    DrawerPulse(DrawerPin),
}

/// Ordered, immutable sequence of render operations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketDocument {
    ops: Vec<RenderOp>,
}

impl TicketDocument {
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over the printed text lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Text(line) => Some(line.as_str()),
            _ => None,
        })
    }

    /// Encode into the ESC/POS byte stream, starting with printer init
    pub fn encode(&self, encoding: TextEncoding) -> Vec<u8> {
        let mut b = EscPosBuilder::new();
        for op in &self.ops {
            match op {
                RenderOp::Text(line) => b.line(line),
                RenderOp::SetAlignment(alignment) => b.align(*alignment),
                RenderOp::SetStyle(style) => b.style(*style),
                RenderOp::Feed(n) => b.feed(*n),
                RenderOp::Cut => b.cut(),
                RenderOp::DrawerPulse(pin) => b.open_drawer(*pin),
            };
        }
        b.build(encoding)
    }
}

/// Accumulates render operations into a [`TicketDocument`]
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    ops: Vec<RenderOp>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, line: impl Into<String>) -> &mut Self {
        self.ops.push(RenderOp::Text(line.into()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.text(String::new())
    }

    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        self.ops.push(RenderOp::SetAlignment(alignment));
        self
    }

    pub fn style(&mut self, style: TextStyle) -> &mut Self {
        self.ops.push(RenderOp::SetStyle(style));
        self
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.ops.push(RenderOp::Feed(lines));
        self
    }

    pub fn cut(&mut self) -> &mut Self {
        self.ops.push(RenderOp::Cut);
        self
    }

    pub fn drawer_pulse(&mut self, pin: DrawerPin) -> &mut Self {
        self.ops.push(RenderOp::DrawerPulse(pin));
        self
    }

    /// Freeze the operations into a document
    pub fn build(self) -> TicketDocument {
        TicketDocument { ops: self.ops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mut b = DocumentBuilder::new();
        b.align(Alignment::Center).text("Hola").feed(6).cut();
        let doc = b.build();

        assert_eq!(
            doc.ops(),
            &[
                RenderOp::SetAlignment(Alignment::Center),
                RenderOp::Text("Hola".into()),
                RenderOp::Feed(6),
                RenderOp::Cut,
            ]
        );
        assert_eq!(doc.lines().collect::<Vec<_>>(), vec!["Hola"]);
    }

    #[test]
    fn test_encode_cp1252() {
        let mut b = DocumentBuilder::new();
        b.style(TextStyle::Bold)
            .text("Año")
            .cut()
            .drawer_pulse(DrawerPin::Pin2);
        let bytes = b.build().encode(TextEncoding::Cp1252);

        assert_eq!(
            bytes,
            vec![
                0x1B, 0x40, // init
                0x1B, 0x74, 16, // code table
                0x1B, 0x21, 0x08, // bold
                b'A', 0xF1, b'o', b'\n', //
                0x1D, 0x56, 0x00, // cut
                0x1B, 0x70, 0x00, 25, 250, // drawer
            ]
        );
    }

    #[test]
    fn test_encode_empty_document_is_init_only() {
        let bytes = TicketDocument::default().encode(TextEncoding::Cp1252);
        assert_eq!(bytes, vec![0x1B, 0x40, 0x1B, 0x74, 16]);
    }

    #[test]
    fn test_encode_strips_commands_from_text() {
        let mut b = DocumentBuilder::new();
        b.text("La Esquina\x1Bp\x00\x19\x7F").cut();
        let bytes = b.build().encode(TextEncoding::Cp1252);

        assert_eq!(
            bytes,
            vec![
                0x1B, 0x40, // init
                0x1B, 0x74, 16, // code table
                b'L', b'a', b' ', b'E', b's', b'q', b'u', b'i', b'n', b'a', b'p', b'\n', //
                0x1D, 0x56, 0x00, // cut
            ]
        );
        assert!(!bytes.windows(2).any(|w| w == [0x1B, 0x70]));
    }
}
