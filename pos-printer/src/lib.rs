//! # pos-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Render operations ([`RenderOp`]) collected into an immutable [`TicketDocument`]
//! - ESC/POS command building and text encoding (WPC1252 or GBK)
//! - Printer discovery and status classification ([`DeviceProbe`])
//! - Raw byte submission to a named print queue ([`DispatchAdapter`])
//! - Backends: CUPS (Unix), Win32 spooler (Windows), raw TCP 9100 (network)
//!
//! WHAT to print and WHEN (ticket layouts, queueing, cool-down) lives in
//! `print-server`.
//!
//! ## Example
//!
//! ```ignore
//! use pos_printer::{Alignment, DispatchAdapter, DocumentBuilder, SystemSpooler, TextEncoding, TextStyle};
//!
//! let mut doc = DocumentBuilder::new();
//! doc.align(Alignment::Center)
//!     .style(TextStyle::DoubleSize)
//!     .text("COMANDA")
//!     .style(TextStyle::Normal)
//!     .feed(6)
//!     .cut();
//!
//! let bytes = doc.build().encode(TextEncoding::Cp1252);
//! SystemSpooler::new().dispatch("EPSON_TM_T20", &bytes).await?;
//! ```

mod device;
mod document;
mod encoding;
mod error;
mod escpos;
mod network;
pub mod spooler;

// Re-exports
pub use device::{DeviceProbe, DispatchAdapter, PrinterInfo, PrinterStatus, SpoolerState, StatusSignals};
pub use document::{Alignment, DocumentBuilder, DrawerPin, RenderOp, TextStyle, TicketDocument};
pub use encoding::{
    TextEncoding, convert_to_cp1252, convert_to_gbk, pad_text, pad_to_width, text_width, truncate_text,
};
pub use error::{PrinterError, PrinterResult};
pub use escpos::EscPosBuilder;
pub use network::NetworkPrinter;
pub use spooler::SystemSpooler;
