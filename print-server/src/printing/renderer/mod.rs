//! Ticket renderer
//!
//! Maps `(TicketType, payload, translations)` to a [`TicketDocument`].
//! Rendering is pure: no I/O, no clock, no locale lookup. The same input
//! always produces the same operations.

mod closing;
mod order_slip;
mod sale;

use pos_printer::{Alignment, DocumentBuilder, DrawerPin, TextStyle, TicketDocument, text_width};

use super::error::RenderError;
use super::layout::{col, wrap_words};
use super::payload::TicketPayload;
use super::translations::Translations;
use super::types::TicketType;

/// Logical paper width for 80mm rolls
pub const PAPER_WIDTH: usize = 48;

/// Ticket renderer
#[derive(Debug, Clone)]
pub struct TicketRenderer {
    width: usize,
}

impl TicketRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Render a ticket into printer operations
    ///
    /// Every document ends with a 6 line feed and a cut. Full tickets paid
    /// at least partly in cash also pulse the cash drawer after the cut.
    pub fn render(
        &self,
        ticket_type: TicketType,
        payload: &TicketPayload,
        translations: &Translations,
    ) -> Result<TicketDocument, RenderError> {
        let mut t = Ticket::new(self.width, translations);

        let open_drawer = match (ticket_type, payload) {
            (TicketType::OrderSlip, TicketPayload::Order(order)) => {
                order_slip::render(&mut t, order);
                false
            }
            (TicketType::SimpleTicket, TicketPayload::Sale(sale)) => {
                let title = t.label("ticket");
                sale::render_simple(&mut t, sale, title);
                false
            }
            (TicketType::TestPrint, TicketPayload::Sale(sale)) => {
                let title = t.label("test_ticket");
                sale::render_simple(&mut t, sale, title);
                false
            }
            (TicketType::PreBill, TicketPayload::Sale(sale)) => {
                sale::render_pre_bill(&mut t, sale);
                false
            }
            (TicketType::FullTicket, TicketPayload::Sale(sale)) => {
                sale::render_full(&mut t, sale);
                sale.has_cash_payment()
            }
            (TicketType::ClosingReport, TicketPayload::Closing(report)) => {
                closing::render(&mut t, report);
                false
            }
            _ => {
                return Err(RenderError::PayloadMismatch {
                    ticket_type,
                    payload: payload.kind(),
                });
            }
        };

        Ok(t.finish(open_drawer))
    }
}

impl Default for TicketRenderer {
    fn default() -> Self {
        Self::new(PAPER_WIDTH)
    }
}

/// Document under construction plus the label table
pub(crate) struct Ticket<'a> {
    doc: DocumentBuilder,
    width: usize,
    labels: &'a Translations,
}

impl<'a> Ticket<'a> {
    fn new(width: usize, labels: &'a Translations) -> Self {
        Self {
            doc: DocumentBuilder::new(),
            width,
            labels,
        }
    }

    pub(crate) fn label(&self, key: &'static str) -> &'a str {
        self.labels.get(key)
    }

    pub(crate) fn line(&mut self, text: impl Into<String>) {
        self.doc.text(text);
    }

    /// `label: value` line
    pub(crate) fn field(&mut self, key: &'static str, value: &str) {
        let label = self.label(key);
        self.doc.text(format!("{}: {}", label, value));
    }

    pub(crate) fn align(&mut self, alignment: Alignment) {
        self.doc.align(alignment);
    }

    pub(crate) fn style(&mut self, style: TextStyle) {
        self.doc.style(style);
    }

    pub(crate) fn feed(&mut self, lines: u8) {
        self.doc.feed(lines);
    }

    /// Full-width line of one character
    pub(crate) fn sep(&mut self, c: char) {
        self.doc.text(c.to_string().repeat(self.width));
    }

    /// Centered double-size title
    pub(crate) fn title(&mut self, text: &str) {
        self.doc
            .align(Alignment::Center)
            .style(TextStyle::DoubleSize)
            .text(text)
            .style(TextStyle::Normal);
    }

    /// Table row with a wrapped name column
    ///
    /// The first line is `lead + name + tail`. Continuation lines are
    /// indented to the name column.
    pub(crate) fn wrapped_row(&mut self, lead: &str, name: &str, budget: usize, tail: &str) {
        let mut lines = wrap_words(name, budget).into_iter();
        let first = lines.next().unwrap_or_default();

        if tail.is_empty() {
            self.doc.text(format!("{}{}", lead, first));
        } else {
            self.doc.text(format!("{}{}{}", lead, col(&first, budget), tail));
        }

        let indent = " ".repeat(text_width(lead));
        for line in lines {
            self.doc.text(format!("{}{}", indent, line));
        }
    }

    fn finish(mut self, open_drawer: bool) -> TicketDocument {
        self.doc.feed(6).cut();
        if open_drawer {
            self.doc.drawer_pulse(DrawerPin::Pin2);
        }
        self.doc.build()
    }
}
