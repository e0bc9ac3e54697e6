//! The planning poker card deck.
//!
//! Fibonacci-style estimate cards plus the two special cards: `?`
//! (cannot estimate) and `☕` (break). Special cards never contribute to
//! numeric results; the server itself accepts any vote value, so the deck
//! is a client-side convention only.

/// Planning poker card values (Fibonacci sequence + special cards)
pub const CARD_VALUES: [&str; 10] = ["0", "1", "2", "3", "5", "8", "13", "21", "?", "☕"];

/// Check whether a vote value is one of the standard deck cards.
pub fn is_deck_card(value: &str) -> bool {
    CARD_VALUES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_deck_card_with_numeric_card() {
        // テスト項目: 数値カードがデッキに含まれると判定される
        // given (前提条件):
        let value = "13";

        // when (操作):
        let result = is_deck_card(value);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_is_deck_card_with_special_cards() {
        // テスト項目: 特殊カード（?, ☕）がデッキに含まれると判定される
        // given (前提条件):

        // when (操作):
        // then (期待する結果):
        assert!(is_deck_card("?"));
        assert!(is_deck_card("☕"));
    }

    #[test]
    fn test_is_deck_card_with_unknown_value() {
        // テスト項目: デッキに存在しない値が含まれないと判定される
        // given (前提条件):
        let value = "4";

        // when (操作):
        let result = is_deck_card(value);

        // then (期待する結果):
        assert!(!result);
    }
}
