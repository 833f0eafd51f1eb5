//! Fixed-width text layout helpers

use pos_printer::{pad_text, pad_to_width, text_width};

/// Greedy word wrap at whitespace
///
/// Lines never exceed `budget` columns. A word wider than the budget is
/// split at the budget. Always returns at least one (possibly empty) line.
pub fn wrap_words(text: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        for piece in split_word(word, budget) {
            let width = text_width(&piece);
            if current.is_empty() {
                current = piece;
                current_width = width;
            } else if current_width + 1 + width <= budget {
                current.push(' ');
                current.push_str(&piece);
                current_width += 1 + width;
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece;
                current_width = width;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a single word into chunks no wider than `budget`
fn split_word(word: &str, budget: usize) -> Vec<String> {
    if text_width(word) <= budget {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;
    for c in word.chars() {
        let w = text_width(c.encode_utf8(&mut [0u8; 4]));
        if width + w > budget && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Left-aligned column
pub fn col(s: &str, width: usize) -> String {
    pad_text(s, width, false)
}

/// Right-aligned column
pub fn col_right(s: &str, width: usize) -> String {
    pad_text(s, width, true)
}

/// Right-aligned amount column; wide amounts overflow instead of losing digits
pub fn col_amount(s: &str, width: usize) -> String {
    pad_to_width(s, width, true)
}

/// Amount with currency symbol and two decimals
pub fn money(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}
