pub mod choice;
pub mod image;
pub mod numeric;
pub mod text;

pub use choice::{PopoverCheckboxField, PopoverSelectField, RadioGroupField, SelectField, ToggleGroupField};
pub use image::{DropRejection, ImageField, ImagesField};
pub use numeric::NumericField;
pub use text::{TextAreaField, TextField};

use std::fmt;
use std::sync::Arc;

use crate::schema::ChoiceItem;

type Projection<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Items of a choice field plus the two projections used to read them:
/// one for the stable key, one for the display label.
pub struct Choices<T> {
    items: Vec<T>,
    key_of: Projection<T>,
    label_of: Projection<T>,
}

impl<T> Clone for Choices<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            key_of: self.key_of.clone(),
            label_of: self.label_of.clone(),
        }
    }
}

impl<T> fmt::Debug for Choices<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.items.iter().map(|i| (self.label_of)(i)).collect();
        f.debug_struct("Choices").field("labels", &labels).finish()
    }
}

impl<T> Choices<T> {
    pub fn new<K, L>(items: Vec<T>, key_of: K, label_of: L) -> Self
    where
        K: Fn(&T) -> String + Send + Sync + 'static,
        L: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self { items, key_of: Arc::new(key_of), label_of: Arc::new(label_of) }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Swaps the item list; the projections stay the same.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn key(&self, item: &T) -> String {
        (self.key_of)(item)
    }

    pub fn label(&self, item: &T) -> String {
        (self.label_of)(item)
    }

    pub fn by_key(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|i| self.key(i) == key)
    }

    pub fn by_label(&self, label: &str) -> Option<&T> {
        self.items.iter().find(|i| self.label(i) == label)
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(|i| self.label(i)).collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.iter().map(|i| self.key(i)).collect()
    }
}

impl Choices<ChoiceItem> {
    /// Choices straight from a field descriptor.
    pub fn from_items(items: Vec<ChoiceItem>) -> Self {
        Self::new(items, |i: &ChoiceItem| i.key.clone(), |i: &ChoiceItem| i.label.clone())
    }
}

/// Keeps `selected` in item order, with unknown entries kept at the end.
pub(crate) fn toggle_in_order(selected: &[String], value: &str, order: &[String]) -> Vec<String> {
    let mut next: Vec<String> = if selected.iter().any(|s| s == value) {
        selected.iter().filter(|s| s.as_str() != value).cloned().collect()
    } else {
        let mut v = selected.to_vec();
        v.push(value.to_string());
        v
    };
    next.sort_by_key(|s| order.iter().position(|o| o == s).unwrap_or(usize::MAX));
    next
}
