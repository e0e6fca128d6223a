use std::io::Write;

use ox_forms::{
    config::FormsConfig,
    registry::FieldRegistry,
    render::FormEngine,
    schema::{ActionDefinition, ChoiceItem, FieldDefinition, FormDefinition, ValidationRule},
    FormState,
};
use serde_json::json;

fn order_form() -> FormDefinition {
    FormDefinition {
        id: "order_form".to_string(),
        title: "Order".to_string(),
        fields: vec![
            FieldDefinition {
                name: "full_name".to_string(),
                label: "Full Name".to_string(),
                data_type: "string".to_string(),
                validation: vec![ValidationRule::required()],
                ..Default::default()
            },
            FieldDefinition {
                name: "quantity".to_string(),
                label: "Quantity".to_string(),
                data_type: "integer".to_string(),
                component: Some("number-input".to_string()),
                ..Default::default()
            },
            FieldDefinition::new("colour", "Colour", "choice")
                .component("radio-group")
                .items(vec![ChoiceItem::new("r", "Red"), ChoiceItem::new("b", "Blue")]),
            FieldDefinition::new("photo", "Photo", "image"),
        ],
        actions: vec![ActionDefinition {
            name: "save".to_string(),
            label: "Save".to_string(),
            action_type: "submit".to_string(),
        }],
    }
}

#[test]
fn test_render_declared_form() {
    let config = FormsConfig::default();
    let registry = FieldRegistry::from_config(&config);
    let engine = FormEngine::new(&registry, &config);
    let state = FormState::new(order_form());

    let result = engine.render_html(&state);
    assert!(result.is_ok(), "Form should render successfully");

    let html = result.unwrap();
    assert!(html.contains("Full Name"), "HTML should contain field label");
    assert!(html.contains("Quantity"), "HTML should contain field label");
    assert!(html.contains(r#"type="radio""#));
    assert!(html.contains(r#"data-max-size="1000000""#));
    assert!(html.contains(r#"<button type="submit" name="save">Save</button>"#));
}

#[test]
fn test_render_unknown_component_fails() {
    let config = FormsConfig::default();
    let registry = FieldRegistry::standard();
    let engine = FormEngine::new(&registry, &config);
    let mut form = order_form();
    form.fields.push(FieldDefinition::new("notes", "Notes", "string").component("rich-text"));

    let err = engine.render(&FormState::new(form)).unwrap_err();
    assert!(format!("{:#}", err).contains("rich-text"));
}

#[test]
fn test_render_shows_errors_after_validation() {
    let config = FormsConfig::default();
    let registry = FieldRegistry::from_config(&config);
    let mut state = FormState::new(order_form());
    assert!(state.validate_all().is_err());

    let node = FormEngine::new(&registry, &config).render(&state).unwrap();
    let slot = node.find_by_attr("data-error-for", "full_name").unwrap();
    assert_eq!(slot.text_content(), "Full Name is required");
    assert_eq!(node.find_by_attr("data-error-for", "quantity").unwrap().text_content(), "");
}

#[test]
fn test_config_loads_from_yaml() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "max_image_bytes: 2000000\nmax_images: 4\ntype_mappings:\n  choice:\n    component: radio-group\n"
    )
    .unwrap();

    let config = FormsConfig::from_path(file.path()).unwrap();
    assert_eq!(config.max_image_bytes, 2_000_000);
    assert_eq!(config.max_images, Some(4));
    assert!(config.temporary_uploads);

    let registry = FieldRegistry::from_config(&config);
    let field = FieldDefinition::new("size", "Size", "choice");
    assert_eq!(registry.resolve_component(&field), "radio-group");
}

#[test]
fn test_config_rejects_unknown_extension() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    let err = FormsConfig::from_path(file.path()).unwrap_err();
    assert!(matches!(err, ox_forms::ConfigError::UnsupportedFormat(ext) if ext == "toml"));
}

#[test]
fn test_initial_values_override_defaults() {
    let mut values = serde_json::Map::new();
    values.insert("quantity".to_string(), json!(3));
    let state = FormState::with_values(order_form(), values);

    assert_eq!(state.value("quantity"), &json!(3));
    assert_eq!(state.value("full_name"), &json!(""));
}

#[test]
fn test_render_standard_form_starts_from_defaults() {
    let html = ox_forms::render_standard_form(&order_form(), &FormsConfig::default()).unwrap();

    assert!(html.starts_with(r#"<form id="order_form" method="post">"#));
    assert!(html.contains(r#"name="full_name" value="""#));
    assert!(FieldRegistry::standard().has_component("popover-select"));
}
