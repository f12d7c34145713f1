// src/quotes.rs

use crate::constants::*;
use crate::models::BankState;

/// Custom quotes first, then the starter affirmations.
pub fn all_quotes(state: &BankState) -> Vec<&str> {
    state
        .custom_quotes
        .iter()
        .map(String::as_str)
        .chain(STARTER_QUOTES.iter().copied())
        .collect()
}

/// Quote shown after `focused_seconds`, rotating every `quoteIntervalSec`.
pub fn quote_at(state: &BankState, focused_seconds: u64) -> &str {
    let quotes = all_quotes(state);
    if quotes.is_empty() {
        return EMPTY_QUOTE_PLACEHOLDER;
    }
    let interval = state.preferences.quote_interval_sec.max(1) as u64;
    let index = (focused_seconds / interval) as usize % quotes.len();
    quotes[index]
}

/// Adds `text` to `list` unless it is blank or already present.
pub fn add_unique(list: &[String], text: &str) -> Result<Vec<String>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Quote cannot be empty".to_string());
    }
    if list.iter().any(|q| q == text) {
        return Err(format!("Already saved: {}", text));
    }
    let mut next = list.to_vec();
    next.push(text.to_string());
    Ok(next)
}

pub fn remove(list: &[String], text: &str) -> Result<Vec<String>, String> {
    let text = text.trim();
    if !list.iter().any(|q| q == text) {
        return Err(format!("Not found: {}", text));
    }
    Ok(list.iter().filter(|q| *q != text).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_quotes_come_first_and_rotate() {
        let mut state = BankState::default();
        state.custom_quotes = vec!["Mine.".to_string()];
        state.preferences.quote_interval_sec = 10;

        assert_eq!(quote_at(&state, 0), "Mine.");
        assert_eq!(quote_at(&state, 9), "Mine.");
        assert_eq!(quote_at(&state, 10), STARTER_QUOTES[0]);
        // 6 quotes total, wraps after 60s
        assert_eq!(quote_at(&state, 60), "Mine.");
    }

    #[test]
    fn test_add_and_remove() {
        let list = add_unique(&[], "  Stay present.  ").unwrap();
        assert_eq!(list, vec!["Stay present.".to_string()]);
        assert!(add_unique(&list, "Stay present.").is_err());
        assert!(add_unique(&list, "   ").is_err());
        assert!(remove(&list, "Other").is_err());
        assert!(remove(&list, "Stay present.").unwrap().is_empty());
    }
}
