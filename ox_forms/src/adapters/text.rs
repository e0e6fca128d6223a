use serde_json::Value;

use crate::binding::{FormState, GenericField};
use crate::node::Node;
use crate::traits::FieldAdapter;
use crate::value::display_text;

/// Single line text input. The empty string is the unset state.
#[derive(Debug, Clone)]
pub struct TextField {
    field: GenericField,
    placeholder: Option<String>,
    input_type: String,
}

impl TextField {
    pub fn new(field: GenericField) -> Self {
        Self { field, placeholder: None, input_type: "text".to_string() }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn input_type(mut self, input_type: &str) -> Self {
        self.input_type = input_type.to_string();
        self
    }

    pub fn text(&self, state: &FormState) -> String {
        display_text(self.field.value(state))
    }

    pub fn input(&self, state: &mut FormState, text: &str) {
        self.field.change(state, Value::String(text.to_string()));
    }
}

impl FieldAdapter for TextField {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let mut input = Node::element("input")
                .attr("type", self.input_type.as_str())
                .attr("id", control.name)
                .attr("name", control.name)
                .attr("value", display_text(control.value));
            if let Some(p) = &self.placeholder {
                input = input.attr("placeholder", p.as_str());
            }
            input
        })
    }
}

/// Multiline text input.
#[derive(Debug, Clone)]
pub struct TextAreaField {
    field: GenericField,
    placeholder: Option<String>,
}

impl TextAreaField {
    pub fn new(field: GenericField) -> Self {
        Self { field, placeholder: None }
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn text(&self, state: &FormState) -> String {
        display_text(self.field.value(state))
    }

    pub fn input(&self, state: &mut FormState, text: &str) {
        self.field.change(state, Value::String(text.to_string()));
    }
}

impl FieldAdapter for TextAreaField {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let mut area = Node::element("textarea").attr("id", control.name).attr("name", control.name);
            if let Some(p) = &self.placeholder {
                area = area.attr("placeholder", p.as_str());
            }
            area.child(Node::text(display_text(control.value)))
        })
    }
}
