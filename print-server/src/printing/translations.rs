//! Ticket label translations
//!
//! POS terminals send the label table for their locale. Any label they
//! leave out falls back to the built-in Spanish text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const DEFAULTS: &[(&str, &str)] = &[
    // Sale tickets
    ("table", "Mesa"),
    ("qty", "Cant"),
    ("product", "Producto"),
    ("unit_price", "P.Unit"),
    ("product_total", "Total"),
    ("subtotal", "Subtotal"),
    ("total", "Total"),
    ("discount", "Descuento"),
    ("tip", "Propina"),
    ("payments", "Pagos"),
    ("credit", "Crédito"),
    ("num_installments", "Número de cuotas"),
    ("thank_you", "¡Gracias por su compra!"),
    ("come_again", "Vuelva pronto"),
    ("pre_bill", "PRECUENTA"),
    ("full_ticket", "TICKET DE VENTA"),
    ("ticket", "TICKET"),
    ("test_ticket", "TICKET DE PRUEBA"),
    ("client", "Cliente"),
    ("seller", "Vendedor"),
    ("tax_id", "NIT"),
    ("receipt_number", "Numero"),
    // Order slips
    ("order_slip", "COMANDA"),
    ("area", "Área"),
    ("waiter", "Mesero"),
    ("date", "Fecha"),
    ("note", "Nota"),
    ("unassigned", "Sin asignar"),
    // Closing report
    ("closing_report", "CIERRE DE CAJA"),
    ("register", "Caja"),
    ("opened_by", "Usuario Apertura"),
    ("closed_by", "Usuario Cierre"),
    ("opened_at", "Fecha Apertura"),
    ("closed_at", "Fecha Cierre"),
    ("register_summary", "RESUMEN DE CAJA"),
    ("opening_amount", "Total Apertura:"),
    ("cash_sales", "Total efectivo:"),
    ("card_sales", "Total tarjeta:"),
    ("cash_in_register", "Total en Caja (efectivo):"),
    ("register_total", "Total en Caja (general):"),
    ("income_expenses", "INGRESOS Y EGRESOS EN CAJA"),
    ("income", "Ingresos:"),
    ("expenses", "Egresos:"),
    ("cash_tips", "Propinas con efectivo:"),
    ("card_tips", "Propinas con tarjeta:"),
    ("cash_credits", "Créditos cobrados efectivo:"),
    ("card_credits", "Créditos cobrados tarjeta:"),
    ("discounts_applied", "DESCUENTOS APLICADOS"),
    ("order_discounts", "Descuentos a pedidos:"),
    ("consumption_discounts", "Descuentos al consumo:"),
    ("sale_discounts", "Descuentos a la venta:"),
    ("products_sold", "PRODUCTOS VENDIDOS"),
    ("activity", "ACTIVIDAD"),
    ("subtotals", "Subtotales:"),
    ("totals", "Totales:"),
];

/// Label table for one ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    labels: HashMap<String, String>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Label text, built-in default when missing
    ///
    /// A key without a default is returned as is.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(value) = self.labels.get(key) {
            return value;
        }
        DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }
}

impl From<HashMap<String, String>> for Translations {
    fn from(labels: HashMap<String, String>) -> Self {
        Self { labels }
    }
}
