//! Choice based adapters. Plain selects, radio and toggle groups store item
//! labels; the popover variants store item keys.

use serde_json::Value;

use super::{toggle_in_order, Choices};
use crate::binding::{FormState, GenericField};
use crate::node::Node;
use crate::traits::FieldAdapter;
use crate::value::{display_text, string_set};

/// Dropdown holding exactly one item label.
#[derive(Debug, Clone)]
pub struct SelectField<T> {
    field: GenericField,
    choices: Choices<T>,
    placeholder: String,
}

impl<T> SelectField<T> {
    pub fn new(field: GenericField, choices: Choices<T>) -> Self {
        Self { field, choices, placeholder: "Select item".to_string() }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn choices(&self) -> &Choices<T> {
        &self.choices
    }

    pub fn selected<'s>(&self, state: &'s FormState) -> Option<&'s str> {
        self.field.value(state).as_str().filter(|s| !s.is_empty())
    }

    pub fn select(&self, state: &mut FormState, item: &T) {
        self.field.change(state, Value::String(self.choices.label(item)));
    }

    /// Selects by label; unknown labels are ignored and return false.
    pub fn select_label(&self, state: &mut FormState, label: &str) -> bool {
        match self.choices.by_label(label) {
            Some(item) => {
                self.select(state, item);
                true
            }
            None => false,
        }
    }
}

impl<T: Send + Sync> FieldAdapter for SelectField<T> {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let current = display_text(control.value);
            let placeholder = Node::element("option")
                .attr("value", "")
                .flag("disabled", true)
                .flag("selected", current.is_empty())
                .child(Node::text(self.placeholder.as_str()));
            let options = self.choices.items().iter().map(|item| {
                let label = self.choices.label(item);
                Node::element("option")
                    .attr("data-key", self.choices.key(item))
                    .attr("value", label.as_str())
                    .flag("selected", label == current)
                    .child(Node::text(label))
            });
            Node::element("select")
                .attr("id", control.name)
                .attr("name", control.name)
                .child(placeholder)
                .children(options)
        })
    }
}

/// Radio buttons; changing the selection replaces the value.
#[derive(Debug, Clone)]
pub struct RadioGroupField<T> {
    field: GenericField,
    choices: Choices<T>,
}

impl<T> RadioGroupField<T> {
    pub fn new(field: GenericField, choices: Choices<T>) -> Self {
        Self { field, choices }
    }

    pub fn choices(&self) -> &Choices<T> {
        &self.choices
    }

    pub fn selected<'s>(&self, state: &'s FormState) -> Option<&'s str> {
        self.field.value(state).as_str().filter(|s| !s.is_empty())
    }

    pub fn select(&self, state: &mut FormState, item: &T) {
        self.field.change(state, Value::String(self.choices.label(item)));
    }
}

impl<T: Send + Sync> FieldAdapter for RadioGroupField<T> {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let current = display_text(control.value);
            let options = self.choices.items().iter().map(|item| {
                let label = self.choices.label(item);
                Node::element("label")
                    .attr("class", "radio-item")
                    .child(
                        Node::element("input")
                            .attr("type", "radio")
                            .attr("name", control.name)
                            .attr("data-key", self.choices.key(item))
                            .attr("value", label.as_str())
                            .flag("checked", label == current),
                    )
                    .child(Node::text(label))
            });
            Node::element("div").attr("role", "radiogroup").children(options)
        })
    }
}

/// Multi-select toggle buttons over item labels.
#[derive(Debug, Clone)]
pub struct ToggleGroupField<T> {
    field: GenericField,
    choices: Choices<T>,
}

impl<T> ToggleGroupField<T> {
    pub fn new(field: GenericField, choices: Choices<T>) -> Self {
        Self { field, choices }
    }

    pub fn choices(&self) -> &Choices<T> {
        &self.choices
    }

    pub fn selected(&self, state: &FormState) -> Vec<String> {
        string_set(self.field.value(state))
    }

    /// Adds or removes one label; the set stays in item order.
    pub fn toggle(&self, state: &mut FormState, item: &T) {
        let next = toggle_in_order(&self.selected(state), &self.choices.label(item), &self.choices.labels());
        self.field.change(state, Value::from(next));
    }
}

impl<T: Send + Sync> FieldAdapter for ToggleGroupField<T> {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let selected = string_set(control.value);
            let buttons = self.choices.items().iter().map(|item| {
                let label = self.choices.label(item);
                let on = selected.contains(&label);
                Node::element("button")
                    .attr("type", "button")
                    .attr("data-key", self.choices.key(item))
                    .attr("value", label.as_str())
                    .attr("data-state", if on { "on" } else { "off" })
                    .attr("aria-pressed", on.to_string())
                    .child(Node::text(label))
            });
            Node::element("div").attr("role", "group").attr("data-toggle-group", control.name).children(buttons)
        })
    }
}

fn overlay(name: &str, open: bool, disabled: bool, summary: String, options: Vec<Node>) -> Node {
    let trigger = Node::element("button")
        .attr("type", "button")
        .attr("aria-haspopup", "listbox")
        .attr("aria-expanded", (open && !disabled).to_string())
        .flag("disabled", disabled)
        .child(Node::text(summary));
    let mut wrapper = Node::element("div").attr("class", "popover").attr("data-popover", name).child(trigger);
    if open && !disabled {
        wrapper = wrapper.child(Node::element("div").attr("data-overlay", "popover").attr("role", "listbox").children(options));
    }
    wrapper
}

/// Single item key chosen from a list shown in an overlay.
#[derive(Debug, Clone)]
pub struct PopoverSelectField<T> {
    field: GenericField,
    choices: Choices<T>,
    placeholder: String,
    disabled: bool,
    open: bool,
}

impl<T> PopoverSelectField<T> {
    pub fn new(field: GenericField, choices: Choices<T>) -> Self {
        Self { field, choices, placeholder: "Select an item".to_string(), disabled: false, open: false }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_open(&self) -> bool {
        self.open && !self.disabled
    }

    pub fn choices(&self) -> &Choices<T> {
        &self.choices
    }

    /// Opens or closes the overlay. Returns false when disabled.
    pub fn toggle_open(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.open = !self.open;
        true
    }

    pub fn selected_key<'s>(&self, state: &'s FormState) -> Option<&'s str> {
        self.field.value(state).as_str().filter(|s| !s.is_empty())
    }

    /// Picks an item and closes the overlay. Returns false when disabled.
    pub fn select(&mut self, state: &mut FormState, item: &T) -> bool {
        if self.disabled {
            return false;
        }
        self.field.change(state, Value::String(self.choices.key(item)));
        self.open = false;
        true
    }
}

impl<T: Send + Sync> FieldAdapter for PopoverSelectField<T> {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let current = display_text(control.value);
            let summary = self
                .choices
                .by_key(&current)
                .map(|item| self.choices.label(item))
                .unwrap_or_else(|| self.placeholder.clone());
            let options = self
                .choices
                .items()
                .iter()
                .map(|item| {
                    let key = self.choices.key(item);
                    Node::element("div")
                        .attr("role", "option")
                        .attr("aria-selected", (key == current).to_string())
                        .attr("data-key", key)
                        .child(Node::text(self.choices.label(item)))
                })
                .collect();
            overlay(control.name, self.open, self.disabled, summary, options)
        })
    }
}

/// Set of item keys picked with checkboxes inside an overlay.
#[derive(Debug, Clone)]
pub struct PopoverCheckboxField<T> {
    field: GenericField,
    choices: Choices<T>,
    placeholder: String,
    disabled: bool,
    open: bool,
}

impl<T> PopoverCheckboxField<T> {
    pub fn new(field: GenericField, choices: Choices<T>) -> Self {
        Self { field, choices, placeholder: "Select items".to_string(), disabled: false, open: false }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_open(&self) -> bool {
        self.open && !self.disabled
    }

    pub fn choices(&self) -> &Choices<T> {
        &self.choices
    }

    pub fn toggle_open(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.open = !self.open;
        true
    }

    pub fn selected_keys(&self, state: &FormState) -> Vec<String> {
        string_set(self.field.value(state))
    }

    /// Checks or unchecks one item; the overlay stays open. Returns false when disabled.
    pub fn toggle(&self, state: &mut FormState, item: &T) -> bool {
        if self.disabled {
            return false;
        }
        let next = toggle_in_order(&self.selected_keys(state), &self.choices.key(item), &self.choices.keys());
        self.field.change(state, Value::from(next));
        true
    }
}

impl<T: Send + Sync> FieldAdapter for PopoverCheckboxField<T> {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let selected = string_set(control.value);
            let labels: Vec<String> = selected
                .iter()
                .filter_map(|k| self.choices.by_key(k).map(|item| self.choices.label(item)))
                .collect();
            let summary = if labels.is_empty() { self.placeholder.clone() } else { labels.join(", ") };
            let options = self
                .choices
                .items()
                .iter()
                .map(|item| {
                    let key = self.choices.key(item);
                    Node::element("label")
                        .attr("role", "option")
                        .child(
                            Node::element("input")
                                .attr("type", "checkbox")
                                .attr("value", key.as_str())
                                .flag("checked", selected.contains(&key)),
                        )
                        .child(Node::text(self.choices.label(item)))
                })
                .collect();
            overlay(control.name, self.open, self.disabled, summary, options)
        })
    }
}
