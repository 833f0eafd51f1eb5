//! Cash register closing report

use pos_printer::Alignment;

use super::Ticket;
use crate::printing::layout::{col, col_amount, col_right, money};
use crate::printing::payload::ClosingReport;

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 18;
const NAME_BUDGET: usize = 20;

/// `label ................ value` row
fn row(t: &mut Ticket, key: &'static str, cur: &str, amount: f64) {
    let label = t.label(key);
    t.line(format!(
        "{}{}",
        col(label, LABEL_WIDTH),
        col_amount(&money(cur, amount), VALUE_WIDTH)
    ));
}

fn section(t: &mut Ticket, key: &'static str, separator: char) {
    t.align(Alignment::Center);
    t.line(t.label(key));
    t.sep(separator);
    t.align(Alignment::Left);
}

pub(super) fn render(t: &mut Ticket, report: &ClosingReport) {
    let cur = report.currency_symbol.as_str();

    t.feed(1);
    section(t, "closing_report", '=');
    t.field("register", &report.register_name);
    t.field("opened_by", &report.opened_by);
    t.field("closed_by", &report.closed_by);
    t.field("opened_at", &report.opened_at);
    t.field("closed_at", &report.closed_at);
    t.sep('=');

    section(t, "register_summary", '=');
    row(t, "opening_amount", cur, report.opening_amount);
    row(t, "cash_sales", cur, report.cash_sales);
    row(t, "card_sales", cur, report.card_sales);
    row(t, "cash_in_register", cur, report.cash_in_register);
    row(t, "register_total", cur, report.register_total);
    t.sep('=');

    section(t, "income_expenses", '=');
    row(t, "income", cur, report.income);
    row(t, "expenses", cur, report.expenses);
    row(t, "cash_tips", cur, report.cash_tips);
    row(t, "card_tips", cur, report.card_tips);
    row(t, "cash_credits", cur, report.cash_credits_collected);
    row(t, "card_credits", cur, report.card_credits_collected);
    t.sep('=');

    section(t, "discounts_applied", '=');
    row(t, "order_discounts", cur, report.order_discounts);
    row(t, "consumption_discounts", cur, report.consumption_discounts);
    row(t, "sale_discounts", cur, report.sale_discounts);
    t.sep('=');

    if !report.products.is_empty() {
        section(t, "products_sold", '-');
        let header = format!(
            "{}{}{}{}",
            col(t.label("qty"), 6),
            col(t.label("product"), NAME_BUDGET),
            col_right(t.label("unit_price"), 11),
            col_right(t.label("product_total"), 11),
        );
        t.line(header);
        t.sep('-');

        for product in &report.products {
            let tail = format!(
                "{}{}",
                col_amount(&money(cur, product.unit_price), 11),
                col_amount(&money(cur, product.total), 11),
            );
            let name = if product.name.trim().is_empty() { "-" } else { product.name.as_str() };
            t.wrapped_row(&col(&product.quantity.to_string(), 6), name, NAME_BUDGET, &tail);
        }
        t.sep('-');
        t.sep('=');
    }

    section(t, "activity", '=');
    row(t, "subtotals", cur, report.subtotals);
    row(t, "totals", cur, report.totals);
    t.sep('=');
}
