use anyhow::{Context, Result};

use crate::binding::FormState;
use crate::config::FormsConfig;
use crate::node::Node;
use crate::registry::FieldRegistry;
use crate::schema::{ActionDefinition, FormDefinition};

/// Renders a declarative [`FormDefinition`] through the registry's adapters.
pub struct FormEngine<'a> {
    registry: &'a FieldRegistry,
    config: &'a FormsConfig,
}

impl<'a> FormEngine<'a> {
    pub fn new(registry: &'a FieldRegistry, config: &'a FormsConfig) -> Self {
        Self { registry, config }
    }

    pub fn render(&self, state: &FormState) -> Result<Node> {
        let form = state.definition();
        let fields = form
            .fields
            .iter()
            .map(|field| {
                let adapter = self
                    .registry
                    .build(field, self.config)
                    .with_context(|| format!("Failed to build field '{}' of form '{}'", field.name, form.id))?;
                Ok(adapter.render(state))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(form_shell(form, fields))
    }

    pub fn render_html(&self, state: &FormState) -> Result<String> {
        Ok(self.render(state)?.to_html())
    }
}

/// `<form>` element with a heading, the rendered fields and the action buttons.
pub fn form_shell(form: &FormDefinition, fields: Vec<Node>) -> Node {
    Node::element("form")
        .attr("id", form.id.as_str())
        .attr("method", "post")
        .child(Node::element("h1").child(Node::text(form.title.as_str())))
        .children(fields)
        .children(form.actions.iter().map(render_action))
}

fn render_action(action: &ActionDefinition) -> Node {
    let button_type = match action.action_type.as_str() {
        "submit" | "reset" => action.action_type.as_str(),
        _ => "button",
    };
    Node::element("button")
        .attr("type", button_type)
        .attr("name", action.name.as_str())
        .child(Node::text(action.label.as_str()))
}
