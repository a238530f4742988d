//! Spending categories and the colors used to draw them.

use std::collections::HashMap;

use crate::transaction::Transaction;

/// The category for expenses that have no category in the statement.
pub const UNKNOWN_CATEGORY: &str = "unknown";
/// The category for money moved to or from a savings pot.
pub const POT_TRANSFER_CATEGORY: &str = "pot transfer";
/// The category for money coming in. Never shown as a chart category.
pub const INCOME_CATEGORY: &str = "income";

/// Colors assigned to categories in the order the categories were found.
pub const PALETTE: [&str; 12] = [
    "#e8c1a0", "#f47560", "#f1e15b", "#e8a838", "#61cdbb", "#97e3d5", "#6baed6", "#9e9ac8",
    "#fd8d3c", "#74c476", "#f768a1", "#bcbddc",
];

/// The color for categories once every color in [PALETTE] has been used.
pub const FALLBACK_COLOR: &str = "#9ca3af";

/// Gets the categories used in `transactions` in the order they first appear.
///
/// Empty categories are skipped. The synthetic categories [UNKNOWN_CATEGORY]
/// and [POT_TRANSFER_CATEGORY] are always added at the end, even if no
/// transaction needs them, and each appears exactly once.
pub fn extract_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    let synthetic = [UNKNOWN_CATEGORY, POT_TRANSFER_CATEGORY];

    for transaction in transactions {
        let category = transaction.category.as_str();

        if category.is_empty()
            || synthetic.contains(&category)
            || categories.iter().any(|seen| seen == category)
        {
            continue;
        }

        categories.push(category.to_owned());
    }

    categories.extend(synthetic.map(str::to_owned));
    categories
}

/// The color used to draw each category in the charts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryColors {
    colors: HashMap<String, &'static str>,
}

impl CategoryColors {
    /// Assigns the colors of [PALETTE] to `categories` in order.
    ///
    /// Categories past the end of the palette get [FALLBACK_COLOR].
    pub fn new(categories: &[String]) -> Self {
        let colors = categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                let color = PALETTE.get(index).copied().unwrap_or(FALLBACK_COLOR);
                (category.clone(), color)
            })
            .collect();

        Self { colors }
    }

    /// The color for `category`, or [FALLBACK_COLOR] if it has not been assigned one.
    pub fn get(&self, category: &str) -> &'static str {
        self.colors.get(category).copied().unwrap_or(FALLBACK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use crate::transaction::Transaction;

    use super::{
        CategoryColors, FALLBACK_COLOR, PALETTE, POT_TRANSFER_CATEGORY, UNKNOWN_CATEGORY,
        extract_categories,
    };

    fn with_category(category: &str) -> Transaction {
        Transaction::build("tx", "01/03/2024", "Card payment", category, "-1")
    }

    #[test]
    fn categories_are_unique_in_first_seen_order() {
        let transactions = vec![
            with_category("groceries"),
            with_category(""),
            with_category("transport"),
            with_category("groceries"),
            with_category("bills"),
        ];

        let categories = extract_categories(&transactions);

        assert_eq!(
            categories,
            vec!["groceries", "transport", "bills", "unknown", "pot transfer"]
        );
    }

    #[test]
    fn synthetic_categories_are_always_present() {
        let categories = extract_categories(&[]);

        assert_eq!(categories, vec![UNKNOWN_CATEGORY, POT_TRANSFER_CATEGORY]);
    }

    #[test]
    fn synthetic_categories_appear_exactly_once() {
        let transactions = vec![
            with_category("pot transfer"),
            with_category("unknown"),
            with_category("eating_out"),
        ];

        let categories = extract_categories(&transactions);

        assert_eq!(categories, vec!["eating_out", "unknown", "pot transfer"]);
    }

    #[test]
    fn colors_follow_palette_order() {
        let categories = extract_categories(&[with_category("groceries"), with_category("bills")]);

        let colors = CategoryColors::new(&categories);

        assert_eq!(colors.get("groceries"), PALETTE[0]);
        assert_eq!(colors.get("bills"), PALETTE[1]);
        assert_eq!(colors.get(UNKNOWN_CATEGORY), PALETTE[2]);
        assert_eq!(colors.get(POT_TRANSFER_CATEGORY), PALETTE[3]);
    }

    #[test]
    fn categories_past_palette_get_fallback_color() {
        let categories: Vec<String> = (0..PALETTE.len() + 2)
            .map(|index| format!("category {index}"))
            .collect();

        let colors = CategoryColors::new(&categories);

        assert_eq!(colors.get("category 11"), PALETTE[11]);
        assert_eq!(colors.get("category 12"), FALLBACK_COLOR);
        assert_eq!(colors.get("category 13"), FALLBACK_COLOR);
        assert_eq!(colors.get("never seen"), FALLBACK_COLOR);
    }
}
