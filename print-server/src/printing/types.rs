//! Print job types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PrintError;
use super::payload::TicketPayload;
use super::translations::Translations;

/// Ticket template, which also decides queue priority
///
/// Serialized with the names POS terminals send. Unknown names fall back
/// to [`TicketType::TestPrint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketType {
    OrderSlip,
    SimpleTicket,
    PreBill,
    FullTicket,
    ClosingReport,
    TestPrint,
}

impl TicketType {
    pub fn from_wire(name: &str) -> Self {
        match name {
            "Comanda" => TicketType::OrderSlip,
            "Ticket" => TicketType::SimpleTicket,
            "Precuenta" => TicketType::PreBill,
            "Cierre" => TicketType::ClosingReport,
            "full" => TicketType::FullTicket,
            _ => TicketType::TestPrint,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            TicketType::OrderSlip => "Comanda",
            TicketType::SimpleTicket => "Ticket",
            TicketType::PreBill => "Precuenta",
            TicketType::ClosingReport => "Cierre",
            TicketType::FullTicket => "full",
            TicketType::TestPrint => "test",
        }
    }

    /// Priority tier, lower is served first
    pub fn tier(self) -> u8 {
        match self {
            TicketType::OrderSlip => 1,
            TicketType::SimpleTicket => 2,
            TicketType::PreBill => 3,
            TicketType::ClosingReport => 4,
            TicketType::FullTicket | TicketType::TestPrint => 5,
        }
    }
}

impl From<String> for TicketType {
    fn from(name: String) -> Self {
        Self::from_wire(&name)
    }
}

impl From<TicketType> for String {
    fn from(ticket_type: TicketType) -> Self {
        ticket_type.wire_name().to_string()
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Job identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One unit of print work
///
/// Owned by the queue from submission until its single attempt finishes.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub ticket_type: TicketType,
    pub target_printer: String,
    pub payload: TicketPayload,
    pub translations: Translations,
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        ticket_type: TicketType,
        target_printer: impl Into<String>,
        payload: TicketPayload,
        translations: Translations,
    ) -> Self {
        Self {
            id: JobId::new(),
            ticket_type,
            target_printer: target_printer.into(),
            payload,
            translations,
            enqueued_at: Utc::now(),
        }
    }

    pub fn tier(&self) -> u8 {
        self.ticket_type.tier()
    }
}

/// Result of a job's single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Printed,
    Failed(PrintError),
}

impl JobOutcome {
    pub fn is_printed(&self) -> bool {
        matches!(self, JobOutcome::Printed)
    }
}
