use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FormError;
use crate::node::Node;
use crate::schema::{ChoiceItem, FieldDefinition, FormDefinition};
use crate::validation::{ValidationErrors, Validator};
use crate::value::FormValues;

static NULL: Value = Value::Null;

/// Owns the values being edited and the current error map.
///
/// Fields never reach into this directly; they go through a
/// [`FieldHandle`] scoped to their own path.
#[derive(Debug, Clone)]
pub struct FormState {
    definition: FormDefinition,
    values: FormValues,
    errors: ValidationErrors,
}

impl FormState {
    pub fn new(definition: FormDefinition) -> Self {
        let values = definition.default_values();
        Self { definition, values, errors: ValidationErrors::new() }
    }

    /// Starts from the defaults, then overlays the given values.
    pub fn with_values(definition: FormDefinition, initial: FormValues) -> Self {
        let mut state = Self::new(definition);
        for (k, v) in initial {
            if state.values.contains_key(&k) {
                state.values.insert(k, v);
            } else {
                log::warn!("Ignoring initial value for undeclared field '{}'", k);
            }
        }
        state
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn value(&self, name: &str) -> &Value {
        debug_assert!(
            self.values.contains_key(name),
            "field '{}' is not part of the defaults of form '{}'",
            name,
            self.definition.id
        );
        self.values.get(name).unwrap_or_else(|| {
            log::error!("Field '{}' is not part of form '{}'", name, self.definition.id);
            &NULL
        })
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    /// Narrow read/write capability for a single path.
    pub fn field(&mut self, name: &str) -> FieldHandle<'_> {
        debug_assert!(
            self.values.contains_key(name),
            "field '{}' is not part of the defaults of form '{}'",
            name,
            self.definition.id
        );
        FieldHandle { state: self, name: name.to_string() }
    }

    /// Runs every rule and replaces the error map with the outcome.
    pub fn validate_all(&mut self) -> Result<(), ValidationErrors> {
        match Validator.validate(&self.definition, &self.values) {
            Ok(()) => {
                self.errors.clear();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validates and converts into the typed record. Errors are kept for display.
    pub fn accept<T: DeserializeOwned>(&mut self) -> Result<T, ValidationErrors> {
        let result = Validator.accept(&self.definition, &self.values);
        match &result {
            Ok(_) => self.errors.clear(),
            Err(errors) => self.errors = errors.clone(),
        }
        result
    }

    /// Records an error found outside the per-field rules, e.g. a cross-field check.
    pub fn insert_error(&mut self, name: &str, message: String) {
        self.errors.insert(name, message);
    }

    pub fn reset(&mut self) {
        self.values = self.definition.default_values();
        self.errors.clear();
    }

    /// Swaps the choice list of a choice field at runtime.
    pub fn set_items(&mut self, name: &str, items: Vec<ChoiceItem>) -> Result<(), FormError> {
        if self.definition.set_items(name, items) {
            Ok(())
        } else {
            Err(FormError::UnknownField(name.to_string(), self.definition.id.clone()))
        }
    }
}

/// Read/write access to one path of a [`FormState`].
pub struct FieldHandle<'a> {
    state: &'a mut FormState,
    name: String,
}

impl FieldHandle<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        self.state.value(&self.name)
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error(&self.name)
    }

    /// Replaces this path's value and re-validates this path only.
    pub fn set(&mut self, value: Value) {
        log::debug!("Field '{}' changed to {}", self.name, value);
        let message = self
            .state
            .definition
            .field(&self.name)
            .and_then(|def| Validator.validate_field(def, &value));
        match message {
            Some(msg) => self.state.errors.insert(&self.name, msg),
            None => {
                self.state.errors.remove(&self.name);
            }
        }
        self.state.values.insert(self.name.clone(), value);
    }
}

/// What a renderer sees of its field.
#[derive(Debug, Clone, Copy)]
pub struct FieldControl<'a> {
    pub name: &'a str,
    pub value: &'a Value,
    pub error: Option<&'a str>,
}

/// Label, description, input and error slot around one bound path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericField {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl GenericField {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), label: None, description: None }
    }

    /// Takes name, label and description from a field descriptor.
    pub fn for_definition(def: &FieldDefinition) -> Self {
        let mut field = Self::new(&def.name);
        if !def.label.is_empty() {
            field = field.with_label(&def.label);
        }
        if let Some(description) = &def.description {
            field = field.with_description(description);
        }
        field
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn value<'s>(&self, state: &'s FormState) -> &'s Value {
        state.value(&self.name)
    }

    /// Wires label, description, the caller's input and the error slot.
    pub fn render<F>(&self, state: &FormState, render_input: F) -> Node
    where
        F: FnOnce(&FieldControl<'_>) -> Node,
    {
        let control = FieldControl {
            name: &self.name,
            value: state.value(&self.name),
            error: state.error(&self.name),
        };

        let mut item = Node::element("div").attr("class", "form-item").attr("data-field", self.name.as_str());
        if let Some(label) = &self.label {
            item = item.child(Node::element("label").attr("for", self.name.as_str()).child(Node::text(label.as_str())));
        }
        if let Some(description) = &self.description {
            item = item.child(Node::element("p").attr("class", "form-description").child(Node::text(description.as_str())));
        }
        item = item.child(
            Node::element("div")
                .attr("class", "form-control")
                .flag("aria-invalid", control.error.is_some())
                .flag("aria-required", state.definition().field(&self.name).is_some_and(|d| d.has_rule("required")))
                .child(render_input(&control)),
        );

        let mut slot = Node::element("p").attr("class", "form-message").attr("data-error-for", self.name.as_str());
        if let Some(error) = control.error {
            slot = slot.attr("role", "alert").child(Node::text(error));
        }
        item.child(slot)
    }

    /// Change handler handed to renderers: writes this path and nothing else.
    pub fn change(&self, state: &mut FormState, value: Value) {
        state.field(&self.name).set(value);
    }
}
