use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::schema::{FieldDefinition, FormDefinition, ValidationRule};
use crate::value::{FormValues, ImageSource};

/// Key used for errors that do not belong to a single field.
pub const FORM_ERROR_KEY: &str = "_form";

/// Field name to the first message that field failed with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: String) {
        self.0.insert(field.to_string(), message);
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Service for validating form values against form definitions.
///
/// Pure and synchronous: it only looks at the values it is handed.
pub struct Validator;

impl Validator {
    pub fn validate(&self, form: &FormDefinition, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in &form.fields {
            let value = values.get(&field.name).cloned().unwrap_or_else(|| field.neutral_value());
            if let Some(message) = self.validate_field(field, &value) {
                errors.insert(&field.name, message);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validates then converts the values into the caller's typed record.
    ///
    /// A value the record cannot hold is reported under the top-level field it
    /// came from; only failures outside any field land on [`FORM_ERROR_KEY`].
    pub fn accept<T: DeserializeOwned>(&self, form: &FormDefinition, values: &FormValues) -> Result<T, ValidationErrors> {
        self.validate(form, values)?;
        let mut complete = form.default_values();
        for (k, v) in values {
            complete.insert(k.clone(), v.clone());
        }
        serde_path_to_error::deserialize(Value::Object(complete)).map_err(|e| {
            let mut errors = ValidationErrors::new();
            match e.path().iter().next() {
                Some(Segment::Map { key }) => {
                    let label = form.field(key).map(|f| f.label.as_str()).unwrap_or(key.as_str());
                    errors.insert(key, format!("{} has an invalid value: {}", label, e.inner()));
                }
                _ => errors.insert(FORM_ERROR_KEY, e.inner().to_string()),
            }
            errors
        })
    }

    /// Returns the message of the first rule the value fails.
    pub fn validate_field(&self, field: &FieldDefinition, value: &Value) -> Option<String> {
        field
            .validation
            .iter()
            .find_map(|rule| self.check_rule(rule, value, field).err())
    }

    fn check_rule(&self, rule: &ValidationRule, value: &Value, field: &FieldDefinition) -> Result<(), String> {
        let fail = |default: String| rule.message.clone().unwrap_or(default);
        match rule.rule_type.as_str() {
            "required" => {
                if is_blank(value) {
                    return Err(fail(format!("{} is required", field.label)));
                }
            }
            "min" => {
                let min_val = rule.parameters.as_f64().ok_or("Invalid min parameter")?;
                if let Some(val) = number(value, field)? {
                    if val < min_val {
                        return Err(fail(format!("{} must be at least {}", field.label, min_val)));
                    }
                }
            }
            "max" => {
                let max_val = rule.parameters.as_f64().ok_or("Invalid max parameter")?;
                if let Some(val) = number(value, field)? {
                    if val > max_val {
                        return Err(fail(format!("{} must be at most {}", field.label, max_val)));
                    }
                }
            }
            "integer" => {
                if let Some(val) = number(value, field)? {
                    if val.fract() != 0.0 {
                        return Err(fail(format!("{} must be a whole number", field.label)));
                    }
                }
            }
            "regex" => {
                let pattern = rule.parameters.as_str().ok_or("Invalid regex parameter")?;
                if let Value::String(s) = value {
                    let re = regex::Regex::new(pattern).map_err(|_| "Invalid regex pattern")?;
                    if !s.is_empty() && !re.is_match(s) {
                        return Err(fail(format!("{} has invalid format", field.label)));
                    }
                }
            }
            "one_of" => {
                let candidates: Vec<&Value> = match value {
                    Value::Array(items) => items.iter().collect(),
                    Value::String(s) if s.is_empty() => Vec::new(),
                    Value::Null => Vec::new(),
                    other => vec![other],
                };
                if !candidates.iter().all(|c| is_member(c, field)) {
                    return Err(fail(format!("{} must be one of the listed options", field.label)));
                }
            }
            "min_items" => {
                let count = rule.parameters.as_u64().ok_or("Invalid min_items parameter")? as usize;
                let len = value.as_array().map(Vec::len).unwrap_or(0);
                if len < count {
                    return Err(fail(format!("{} needs at least {} selection(s)", field.label, count)));
                }
            }
            "image" => {
                let entries: Vec<&Value> = match value {
                    Value::Array(items) => items.iter().collect(),
                    other => vec![other],
                };
                if !entries.iter().all(|v| is_image_source(v)) {
                    return Err(fail(format!("{} must be an image file or URL", field.label)));
                }
            }
            other => {
                log::debug!("Skipping unknown validation rule '{}' on field '{}'", other, field.name);
            }
        }
        Ok(())
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Numbers pass through, null is "not set", anything else is a type error.
fn number(value: &Value, field: &FieldDefinition) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(format!("{} must be a number", field.label)),
    }
}

fn is_member(candidate: &Value, field: &FieldDefinition) -> bool {
    let needle = match candidate {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => match obj.get("id").and_then(Value::as_str) {
            Some(id) => id,
            None => return false,
        },
        _ => return false,
    };
    field.items.iter().any(|item| item.key == needle || item.label == needle)
}

fn is_image_source(value: &Value) -> bool {
    match ImageSource::from_value(value) {
        Some(ImageSource::File(file)) => file.mime.is_empty() || file.is_image(),
        Some(ImageSource::Url(_)) => true,
        None => false,
    }
}
