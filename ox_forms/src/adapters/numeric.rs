use serde_json::{json, Value};

use crate::binding::{FormState, GenericField};
use crate::node::Node;
use crate::traits::FieldAdapter;

/// Text-like input that only lets numbers through and stores a number.
#[derive(Debug, Clone)]
pub struct NumericField {
    field: GenericField,
    placeholder: Option<String>,
}

impl NumericField {
    pub fn new(field: GenericField) -> Self {
        Self { field, placeholder: None }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Keystroke policy. `key` is a key name as delivered by the UI
    /// ("7", ".", "Backspace"); named keys always pass.
    pub fn accepts_key(current: &str, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return true;
        };
        match c {
            'e' | 'E' | '+' | '-' => false,
            '0' => !current.is_empty(),
            '.' => !current.is_empty() && !current.contains('.'),
            c => c.is_ascii_digit(),
        }
    }

    /// 0 is shown as an empty input so the placeholder stays visible.
    pub fn display(value: &Value) -> String {
        match value.as_f64() {
            Some(n) if n == 0.0 => String::new(),
            Some(_) => value.to_string(),
            None => String::new(),
        }
    }

    pub fn text(&self, state: &FormState) -> String {
        Self::display(self.field.value(state))
    }

    /// Handles a key-down; returns whether the key was let through.
    pub fn key_down(&self, state: &FormState, key: &str) -> bool {
        let accepted = Self::accepts_key(&self.text(state), key);
        if !accepted {
            log::debug!("Rejected key '{}' on numeric field '{}'", key, self.field.name);
        }
        accepted
    }

    /// Stores the parsed number; an empty input stores 0. Returns false for
    /// text that does not parse, leaving the value as it was.
    pub fn input(&self, state: &mut FormState, text: &str) -> bool {
        let trimmed = text.trim();
        let number = if trimmed.is_empty() {
            json!(0)
        } else {
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => to_number(n),
                _ => return false,
            }
        };
        self.field.change(state, number);
        true
    }
}

/// Whole numbers are stored as integers so they deserialize into integer fields.
fn to_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

impl FieldAdapter for NumericField {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let mut input = Node::element("input")
                .attr("type", "number")
                .attr("inputmode", "numeric")
                .attr("id", control.name)
                .attr("name", control.name)
                .attr("value", Self::display(control.value));
            if let Some(p) = &self.placeholder {
                input = input.attr("placeholder", p.as_str());
            }
            input
        })
    }
}
