//! Textual progress indicator.
//!
//! The indicator is a row of space-separated slot tokens, e.g.
//! `"✓ ✗ ·◂ · · · · ·"`. Exactly one token carries the cursor symbol. Each
//! phase change stamps the cursor slot with a complete/incomplete symbol and
//! moves the cursor one slot to the right.

use tracing::debug;

use super::config::TimerConfiguration;

/// Fresh indicator with the cursor on the first slot.
pub fn initial_progress(config: &TimerConfiguration) -> String {
    (0..config.slots)
        .map(|i| {
            if i == 0 {
                format!("{}{}", config.slot_symbol, config.cursor_symbol)
            } else {
                config.slot_symbol.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stamp the cursor slot with `symbol` and move the cursor to the next slot.
///
/// `cursor` is updated to the index of the slot that was stamped. When the
/// stamped slot is the last one the indicator is full and no cursor remains.
pub fn advance(progress: &str, cursor_symbol: &str, symbol: &str, cursor: &mut usize) -> String {
    let mut tokens: Vec<String> = progress
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if cursor_symbol.is_empty() {
        return tokens.join(" ");
    }

    let mut found = None;
    for (i, token) in tokens.iter_mut().enumerate() {
        if token.contains(cursor_symbol) {
            if token.ends_with(cursor_symbol) {
                token.truncate(token.len() - cursor_symbol.len());
            } else {
                token.pop();
            }
            token.push_str(symbol);
            found = Some(i);
        }
    }

    match found {
        Some(i) => {
            *cursor = i;
            match tokens.get_mut(i + 1) {
                Some(next) => next.push_str(cursor_symbol),
                None => debug!(slots = tokens.len(), "progress indicator is full"),
            }
        }
        None => debug!("progress indicator has no cursor"),
    }
    tokens.join(" ")
}
