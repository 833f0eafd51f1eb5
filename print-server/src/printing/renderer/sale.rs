//! Sale ticket layouts: simple, pre-bill and full ticket

use pos_printer::{Alignment, TextStyle};

use super::Ticket;
use crate::printing::layout::{col, col_amount, col_right, money};
use crate::printing::payload::SaleTicket;

/// Store name and phone, centered
fn store_header(t: &mut Ticket, sale: &SaleTicket) {
    t.line(sale.store.name.as_str());
    t.line(sale.store.phone.as_str());
}

/// Simple ticket (also used for test prints)
///
/// Columns: qty 5 / name 20 / gap 5 / unit 8 / gap 2 / total 8
pub(super) fn render_simple(t: &mut Ticket, sale: &SaleTicket, title: &str) {
    let cur = sale.currency_symbol.as_str();

    t.feed(1);
    t.title(title);
    t.sep('=');
    store_header(t, sale);
    t.sep('=');

    t.align(Alignment::Left);
    if let Some(table) = &sale.table {
        t.field("table", table);
        t.sep('=');
    }

    let header = format!(
        "{}{}     {}  {}",
        col(t.label("qty"), 5),
        col(t.label("product"), 20),
        col_right(t.label("unit_price"), 8),
        col_right(t.label("product_total"), 8),
    );
    t.line(header);
    t.sep('-');

    for item in &sale.items {
        let tail = format!(
            "     {}  {}",
            col_amount(&money(cur, item.unit_price), 8),
            col_amount(&money(cur, item.total), 8),
        );
        t.wrapped_row(&col(&item.quantity.to_string(), 5), &item.name, 20, &tail);
    }
    t.sep('-');

    t.align(Alignment::Right);
    t.field("subtotal", &money(cur, sale.subtotal));
    t.field("total", &money(cur, sale.total));

    t.align(Alignment::Center);
    t.sep('=');
    t.line(t.label("thank_you"));
    t.line(t.label("come_again"));
}

/// Pre-bill handed to the table before payment
///
/// Columns: qty 5 / name 26 / unit 8 / total 8
pub(super) fn render_pre_bill(t: &mut Ticket, sale: &SaleTicket) {
    let cur = sale.currency_symbol.as_str();

    t.feed(1);
    t.title(t.label("pre_bill"));
    t.sep('=');
    store_header(t, sale);
    if let Some(table) = &sale.table {
        t.field("table", table);
    }
    if let Some(date) = &sale.date {
        t.line(date.as_str());
    }
    t.sep('=');

    t.align(Alignment::Left);
    let header = format!(
        "{}{}{}{}",
        col(t.label("qty"), 5),
        col(t.label("product"), 26),
        col_right(t.label("unit_price"), 8),
        col_right(t.label("product_total"), 8),
    );
    t.line(header);
    t.sep('-');

    for item in &sale.items {
        let tail = format!(
            "{}{}",
            col_amount(&money(cur, item.unit_price), 8),
            col_amount(&money(cur, item.total), 8),
        );
        t.wrapped_row(&col(&item.quantity.to_string(), 5), &item.name, 26, &tail);
    }
    t.sep('-');

    t.align(Alignment::Right);
    totals(t, sale);

    t.align(Alignment::Center);
    t.sep('=');
    if let Some(note) = &sale.header_note {
        t.line(note.as_str());
    }
    if let Some(note) = &sale.footer_note {
        t.line(note.as_str());
    }
}

/// Full sale ticket with payments
///
/// Columns: qty 6 / name 22 / unit 10 / total 10
pub(super) fn render_full(t: &mut Ticket, sale: &SaleTicket) {
    let cur = sale.currency_symbol.as_str();

    t.feed(1);
    t.title(t.label("full_ticket"));
    t.sep('=');
    store_header(t, sale);
    if let Some(tax_id) = &sale.store.tax_id {
        t.field("tax_id", tax_id);
    }
    if let Some(number) = &sale.receipt_number {
        t.field("receipt_number", number);
    }
    t.sep('=');

    t.align(Alignment::Left);
    if let Some(customer) = &sale.customer_name {
        t.field("client", customer);
    }
    if let Some(table) = &sale.table {
        t.field("table", table);
    }
    if let Some(seller) = &sale.seller {
        t.field("seller", seller);
    }
    if let Some(date) = &sale.date {
        t.field("date", date);
    }
    t.sep('=');

    let header = format!(
        "{}{}{}{}",
        col(t.label("qty"), 6),
        col(t.label("product"), 22),
        col_right(t.label("unit_price"), 10),
        col_right(t.label("product_total"), 10),
    );
    t.line(header);
    t.sep('-');

    for item in &sale.items {
        let tail = format!(
            "{}{}",
            col_amount(&money(cur, item.unit_price), 10),
            col_amount(&money(cur, item.total), 10),
        );
        t.wrapped_row(&col(&item.quantity.to_string(), 6), &item.name, 22, &tail);
    }
    t.sep('-');

    t.align(Alignment::Right);
    totals(t, sale);

    if !sale.payments.is_empty() {
        t.sep('=');
        t.line(t.label("payments"));
        for payment in &sale.payments {
            let reference = payment
                .card_reference
                .as_deref()
                .map(|r| format!(" ({})", r))
                .unwrap_or_default();
            t.line(format!(
                "{}: {}{}",
                payment.label,
                money(cur, payment.amount),
                reference
            ));
        }
    }

    if let Some(credit) = &sale.credit {
        t.sep('=');
        t.field("credit", &money(cur, credit.total));
        t.field("num_installments", &credit.installments.to_string());
    }

    t.align(Alignment::Center);
    t.sep('=');
    if let Some(footer) = &sale.store.footer {
        t.line(footer.as_str());
    }
    t.line(t.label("thank_you"));
    t.line(t.label("come_again"));
}

/// Subtotal, discount, taxes, tip and a double-size total
fn totals(t: &mut Ticket, sale: &SaleTicket) {
    let cur = sale.currency_symbol.as_str();

    t.field("subtotal", &money(cur, sale.subtotal));
    if let Some(discount) = sale.discount.filter(|d| *d > 0.0) {
        t.field("discount", &money(cur, discount));
    }
    for tax in &sale.taxes {
        t.line(format!("  {}: {}", tax.name, money(cur, tax.amount)));
    }
    if let Some(tip) = sale.tip {
        t.field("tip", &money(cur, tip));
    }
    t.style(TextStyle::DoubleSize);
    t.field("total", &money(cur, sale.total));
    t.style(TextStyle::Normal);
}
