//! Choice lists offered by the product form.
//!
//! The form only sees these through [`ChoiceSource`], so a remote catalog can
//! replace [`StaticCatalog`] without touching any adapter.

use ox_forms::ChoiceItem;
use serde::{Deserialize, Serialize};

/// Size or gender option.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LabeledItem {
    pub id: String,
    pub label: String,
}

/// Discount type or category.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NamedItem {
    pub id: String,
    pub name: String,
}

impl LabeledItem {
    pub fn new(id: &str, label: &str) -> Self {
        Self { id: id.to_string(), label: label.to_string() }
    }

    pub fn choice_item(&self) -> ChoiceItem {
        ChoiceItem::new(self.id.as_str(), self.label.as_str())
    }
}

impl NamedItem {
    pub fn new(id: &str, name: &str) -> Self {
        Self { id: id.to_string(), name: name.to_string() }
    }

    pub fn choice_item(&self) -> ChoiceItem {
        ChoiceItem::new(self.id.as_str(), self.name.as_str())
    }
}

pub trait ChoiceSource: Send + Sync {
    fn sizes(&self) -> Vec<LabeledItem>;
    fn genders(&self) -> Vec<LabeledItem>;
    fn discount_types(&self) -> Vec<NamedItem>;
    fn categories(&self) -> Vec<NamedItem>;
}

/// Discount type whose amount is a percentage of the price.
pub const PERCENTAGE_DISCOUNT: &str = "percentage";

/// The store's built-in enumerations.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl ChoiceSource for StaticCatalog {
    fn sizes(&self) -> Vec<LabeledItem> {
        ["XS", "S", "M", "XL", "XXL", "2XXL"]
            .iter()
            .enumerate()
            .map(|(i, label)| LabeledItem::new(&(i + 1).to_string(), label))
            .collect()
    }

    fn genders(&self) -> Vec<LabeledItem> {
        vec![
            LabeledItem::new("1", "Men"),
            LabeledItem::new("2", "Women"),
            LabeledItem::new("3", "Unisex"),
        ]
    }

    fn discount_types(&self) -> Vec<NamedItem> {
        vec![NamedItem::new("1", PERCENTAGE_DISCOUNT), NamedItem::new("2", "fixed")]
    }

    fn categories(&self) -> Vec<NamedItem> {
        vec![NamedItem::new("1", "clothing"), NamedItem::new("2", "jean")]
    }
}
