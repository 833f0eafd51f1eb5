//! Kitchen order slip

use pos_printer::{Alignment, TextStyle};

use super::Ticket;
use crate::printing::layout::{col, wrap_words};
use crate::printing::payload::KitchenOrder;

const QTY_WIDTH: usize = 8;
const NAME_BUDGET: usize = 40;
const MODIFIER_BUDGET: usize = 32;
const NOTE_BUDGET: usize = 40;

pub(super) fn render(t: &mut Ticket, order: &KitchenOrder) {
    // Header
    t.feed(1);
    t.align(Alignment::Center);
    t.sep('*');
    t.title(t.label("order_slip"));
    t.sep('=');

    t.align(Alignment::Left);
    if let Some(number) = &order.slip_number {
        t.style(TextStyle::DoubleSize);
        t.line(format!("N: {}", number));
        t.style(TextStyle::Normal);
    }
    t.field("area", &order.area);
    let table = order.table.as_deref().unwrap_or(t.label("unassigned"));
    t.field("table", table);
    t.field("waiter", &order.waiter);
    t.field("date", &order.date);
    t.sep('=');

    t.line(format!("{}{}", col(t.label("qty"), QTY_WIDTH), t.label("product")));
    t.sep('-');

    // Items
    for item in &order.items {
        let lead = col(&item.quantity.to_string(), QTY_WIDTH);
        t.wrapped_row(&lead, &item.name, NAME_BUDGET, "");

        for modifier in &item.modifiers {
            let lead = format!("{}+ {}x ", " ".repeat(QTY_WIDTH), modifier.quantity);
            t.wrapped_row(&lead, &modifier.name, MODIFIER_BUDGET, "");
        }

        if let Some(note) = item.note.as_deref().filter(|n| !n.trim().is_empty()) {
            t.line(format!("  - {}:", t.label("note")));
            for line in wrap_words(note, NOTE_BUDGET) {
                t.line(format!("    {}", line));
            }
        }
    }

    t.sep('*');
}

#[cfg(test)]
mod tests {
    use super::super::TicketRenderer;
    use super::super::tests::order;
    use crate::printing::payload::{KitchenOrder, Modifier, OrderItem, TicketPayload};
    use crate::printing::translations::Translations;
    use crate::printing::types::TicketType;
    use pos_printer::{RenderOp, TextStyle, text_width};

    fn lines(order: KitchenOrder) -> Vec<String> {
        TicketRenderer::default()
            .render(TicketType::OrderSlip, &TicketPayload::Order(order), &Translations::new())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_header() {
        let lines = lines(order());

        assert_eq!(lines[0], "*".repeat(48));
        assert_eq!(lines[1], "COMANDA");
        assert_eq!(lines[2], "=".repeat(48));
        assert_eq!(lines[3], "N: 118");
        assert_eq!(lines[4], "Área: Cocina");
        assert_eq!(lines[5], "Mesa: Sin asignar");
        assert_eq!(lines[6], "Mesero: Luis");
        assert_eq!(lines[7], "Fecha: 2024-05-01 13:40");
    }

    #[test]
    fn test_items_modifiers_and_notes() {
        let lines = lines(order());

        assert!(lines.contains(&"2       Tacos al pastor".to_string()));
        assert!(lines.contains(&"        + 1x Sin cebolla".to_string()));
        assert!(lines.contains(&"  - Nota:".to_string()));
        assert!(lines.contains(&"    Salsa aparte".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("*".repeat(48).as_str()));
    }

    #[test]
    fn test_slip_number_is_double_size() {
        let doc = TicketRenderer::default()
            .render(TicketType::OrderSlip, &TicketPayload::Order(order()), &Translations::new())
            .unwrap();
        let ops = doc.ops();
        let pos = ops
            .iter()
            .position(|op| *op == RenderOp::Text("N: 118".into()))
            .unwrap();
        assert_eq!(ops[pos - 1], RenderOp::SetStyle(TextStyle::DoubleSize));
        assert_eq!(ops[pos + 1], RenderOp::SetStyle(TextStyle::Normal));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut o = order();
        o.slip_number = None;
        o.table = Some("12".into());
        o.items[0].note = None;
        let lines = lines(o);

        assert!(!lines.iter().any(|l| l.starts_with("N:")));
        assert!(lines.contains(&"Mesa: 12".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Nota")));
    }

    #[test]
    fn test_long_names_wrap_with_indent() {
        let mut o = order();
        o.items = vec![OrderItem {
            quantity: 1,
            name: "Parrillada mixta para compartir con chorizo morcilla y costillas de cerdo".into(),
            modifiers: vec![Modifier {
                quantity: 2,
                name: "Salsa chimichurri extra picante en recipiente separado".into(),
            }],
            note: None,
        }];
        let lines = lines(o);

        assert!(lines.contains(&"1       Parrillada mixta para compartir con".to_string()));
        assert!(lines.contains(&"        chorizo morcilla y costillas de cerdo".to_string()));
        assert!(lines.contains(&"        + 2x Salsa chimichurri extra picante".to_string()));
        assert!(lines.contains(&"             en recipiente separado".to_string()));
        for line in &lines {
            assert!(text_width(line) <= 48);
        }
    }
}
