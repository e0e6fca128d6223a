use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::value::FormValues;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FormDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Abstract data type (e.g., "string", "float", "choices", "image")
    pub data_type: String,
    /// Concrete component override (e.g., "radio-group")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default)]
    pub validation: Vec<ValidationRule>,
    /// Choices offered by choice-based components.
    #[serde(default)]
    pub items: Vec<ChoiceItem>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub props: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ActionDefinition {
    pub name: String,
    pub label: String,
    pub action_type: String, // "submit", "reset", "button"
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ValidationRule {
    pub rule_type: String, // "required", "min", "max", "integer", "regex", "one_of", "min_items", "image"
    #[serde(default)]
    pub parameters: Value,
    pub message: Option<String>,
}

/// A selectable value with a stable key and a display label.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChoiceItem {
    pub key: String,
    pub label: String,
}

impl ChoiceItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into() }
    }
}

impl ValidationRule {
    fn of(rule_type: &str, parameters: Value) -> Self {
        Self { rule_type: rule_type.to_string(), parameters, message: None }
    }

    pub fn required() -> Self {
        Self::of("required", Value::Null)
    }

    pub fn min(min: f64) -> Self {
        Self::of("min", json!(min))
    }

    pub fn max(max: f64) -> Self {
        Self::of("max", json!(max))
    }

    pub fn integer() -> Self {
        Self::of("integer", Value::Null)
    }

    pub fn regex(pattern: &str) -> Self {
        Self::of("regex", json!(pattern))
    }

    pub fn one_of() -> Self {
        Self::of("one_of", Value::Null)
    }

    pub fn min_items(count: usize) -> Self {
        Self::of("min_items", json!(count))
    }

    pub fn image() -> Self {
        Self::of("image", Value::Null)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl FieldDefinition {
    pub fn new(name: &str, label: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            data_type: data_type.to_string(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    pub fn items(mut self, items: Vec<ChoiceItem>) -> Self {
        self.items = items;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Value a field starts with when no default is declared.
    pub fn neutral_value(&self) -> Value {
        match self.data_type.as_str() {
            "string" | "text" | "choice" | "image" => Value::String(String::new()),
            "integer" | "float" => json!(0),
            "choices" | "images" | "list" => Value::Array(Vec::new()),
            "boolean" => Value::Bool(false),
            _ => Value::Null,
        }
    }

    pub fn initial_value(&self) -> Value {
        self.default_value.clone().unwrap_or_else(|| self.neutral_value())
    }

    pub fn has_rule(&self, rule_type: &str) -> bool {
        self.validation.iter().any(|r| r.rule_type == rule_type)
    }
}

impl FormDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Builds a value for every declared field, so no bound path is ever undefined.
    pub fn default_values(&self) -> FormValues {
        let mut values = Map::new();
        for field in &self.fields {
            values.insert(field.name.clone(), field.initial_value());
        }
        values
    }

    /// Replaces the choice list of a field. Returns false if the field is unknown.
    pub fn set_items(&mut self, name: &str, items: Vec<ChoiceItem>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.items = items;
                true
            }
            None => false,
        }
    }
}
