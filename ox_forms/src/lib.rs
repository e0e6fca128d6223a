pub mod adapters;
pub mod binding;
pub mod config;
pub mod error;
pub mod node;
pub mod registry;
pub mod render;
pub mod schema;
pub mod testing;
pub mod traits;
pub mod upload;
pub mod validation;
pub mod value;

#[cfg(test)]
mod tests;

pub use binding::*;
pub use config::FormsConfig;
pub use error::{ConfigError, FormError, UploadError};
pub use node::Node;
pub use registry::*;
pub use render::FormEngine;
pub use schema::*;
pub use traits::*;
pub use upload::*;
pub use validation::{ValidationErrors, Validator};
pub use value::*;

/// Renders a form definition with the standard components, starting from its defaults.
pub fn render_standard_form(form: &schema::FormDefinition, config: &FormsConfig) -> anyhow::Result<String> {
    let registry = registry::FieldRegistry::from_config(config);
    let state = binding::FormState::new(form.clone());
    render::FormEngine::new(&registry, config).render_html(&state)
}
