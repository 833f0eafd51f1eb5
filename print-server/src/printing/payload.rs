//! Ticket payloads
//!
//! Typed ticket data, resolved at the boundary before a job is queued.

use serde::{Deserialize, Serialize};

use super::types::TicketType;

fn default_currency() -> String {
    "$".to_string()
}

/// Data behind a ticket, one variant per template family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum TicketPayload {
    /// Full ticket, simple ticket, pre-bill and test print
    Sale(SaleTicket),
    /// Kitchen order slip
    Order(KitchenOrder),
    /// Cash register closing
    Closing(ClosingReport),
}

impl TicketPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            TicketPayload::Sale(_) => "sale",
            TicketPayload::Order(_) => "order",
            TicketPayload::Closing(_) => "closing",
        }
    }

    /// Whether this payload can be rendered with the ticket type's template
    pub fn matches(&self, ticket_type: TicketType) -> bool {
        match ticket_type {
            TicketType::OrderSlip => matches!(self, TicketPayload::Order(_)),
            TicketType::ClosingReport => matches!(self, TicketPayload::Closing(_)),
            TicketType::SimpleTicket
            | TicketType::PreBill
            | TicketType::FullTicket
            | TicketType::TestPrint => matches!(self, TicketPayload::Sale(_)),
        }
    }
}

// ============================================================================
// Sale
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Printed above the thank-you lines on full tickets
    #[serde(default)]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub quantity: u32,
    pub name: String,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tender {
    Cash,
    Card,
    Transfer,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub tender: Tender,
    /// Payment method as shown on the ticket
    pub label: String,
    pub amount: f64,
    #[serde(default)]
    pub card_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTerms {
    pub total: f64,
    pub installments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleTicket {
    pub store: StoreInfo,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub header_note: Option<String>,
    #[serde(default)]
    pub footer_note: Option<String>,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
    pub items: Vec<SaleItem>,
    pub subtotal: f64,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub taxes: Vec<TaxLine>,
    #[serde(default)]
    pub tip: Option<f64>,
    pub total: f64,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub credit: Option<CreditTerms>,
}

impl SaleTicket {
    pub fn has_cash_payment(&self) -> bool {
        self.payments.iter().any(|p| p.tender == Tender::Cash)
    }

    /// Built-in sale used for test prints
    pub fn sample() -> Self {
        Self {
            store: StoreInfo {
                name: "Test".into(),
                phone: "000-000-0000".into(),
                tax_id: None,
                footer: None,
            },
            receipt_number: None,
            table: Some("0".into()),
            customer_name: None,
            seller: None,
            date: None,
            header_note: None,
            footer_note: None,
            currency_symbol: default_currency(),
            items: vec![SaleItem {
                quantity: 1,
                name: "Producto de prueba".into(),
                unit_price: 1.0,
                total: 1.0,
            }],
            subtotal: 1.0,
            discount: None,
            taxes: Vec::new(),
            tip: None,
            total: 1.0,
            payments: Vec::new(),
            credit: None,
        }
    }
}

// ============================================================================
// Kitchen order
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub quantity: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub quantity: u32,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenOrder {
    #[serde(default)]
    pub slip_number: Option<String>,
    pub area: String,
    #[serde(default)]
    pub table: Option<String>,
    pub waiter: String,
    pub date: String,
    pub items: Vec<OrderItem>,
}

// ============================================================================
// Closing report
// ============================================================================

/// Cash register closing summary, all amounts in the register currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingReport {
    pub register_name: String,
    pub opened_by: String,
    pub closed_by: String,
    pub opened_at: String,
    pub closed_at: String,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    pub opening_amount: f64,
    pub cash_sales: f64,
    pub card_sales: f64,
    pub cash_in_register: f64,
    pub register_total: f64,

    pub income: f64,
    pub expenses: f64,
    pub cash_tips: f64,
    pub card_tips: f64,
    pub cash_credits_collected: f64,
    pub card_credits_collected: f64,

    pub order_discounts: f64,
    pub consumption_discounts: f64,
    pub sale_discounts: f64,

    #[serde(default)]
    pub products: Vec<SaleItem>,

    pub subtotals: f64,
    pub totals: f64,
}
