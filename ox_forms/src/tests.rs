use serde_json::{json, Value};

use crate::adapters::{
    Choices, ImageField, NumericField, PopoverCheckboxField, PopoverSelectField, RadioGroupField, TextField,
    ToggleGroupField,
};
use crate::binding::{FormState, GenericField};
use crate::node::Node;
use crate::schema::{ChoiceItem, FieldDefinition, FormDefinition, ValidationRule};
use crate::traits::FieldAdapter;
use crate::upload::{UploadSlot, UploadState};
use crate::validation::Validator;
use crate::value::{FileHandle, ImageSource};

#[derive(Clone, Debug, PartialEq)]
struct Size {
    id: u32,
    label: &'static str,
}

fn sizes() -> Choices<Size> {
    Choices::new(
        vec![
            Size { id: 1, label: "XS" },
            Size { id: 2, label: "S" },
            Size { id: 3, label: "M" },
            Size { id: 4, label: "XL" },
        ],
        |s: &Size| s.id.to_string(),
        |s: &Size| s.label.to_string(),
    )
}

fn create_test_form() -> FormDefinition {
    FormDefinition {
        id: "test_form".to_string(),
        title: "Test Form".to_string(),
        fields: vec![
            FieldDefinition::new("name", "Name", "string").rule(ValidationRule::required()),
            FieldDefinition::new("age", "Age", "integer")
                .rule(ValidationRule::min(18.0).with_message("Must be an adult")),
            FieldDefinition::new("size", "Size", "choices")
                .items(sizes().items().iter().map(|s| ChoiceItem::new(s.id.to_string(), s.label)).collect())
                .rule(ValidationRule::min_items(1))
                .rule(ValidationRule::one_of())
                .default_value(json!(["XS", "S"])),
            FieldDefinition::new("thumbnail", "Thumbnail", "image").rule(ValidationRule::image()),
        ],
        actions: vec![],
    }
}

#[test]
fn test_defaults_cover_every_field() {
    let form = create_test_form();
    let defaults = form.default_values();

    assert_eq!(defaults.len(), form.fields.len());
    assert_eq!(defaults["name"], json!(""));
    assert_eq!(defaults["age"], json!(0));
    assert_eq!(defaults["size"], json!(["XS", "S"]));
    assert_eq!(defaults["thumbnail"], json!(""));
}

#[test]
fn test_validation_success() {
    let form = create_test_form();
    let mut values = form.default_values();
    values.insert("name".to_string(), json!("Charlie"));
    values.insert("age".to_string(), json!(20));

    assert!(Validator.validate(&form, &values).is_ok());
}

#[test]
fn test_validation_failure() {
    let form = create_test_form();
    let mut values = form.default_values();
    values.insert("age".to_string(), json!(15));
    values.insert("size".to_string(), json!(["XS", "XXXL"]));

    let errors = Validator.validate(&form, &values).unwrap_err();

    assert_eq!(errors.len(), 3);
    assert!(errors.get("name").unwrap().contains("required"));
    assert_eq!(errors.get("age"), Some("Must be an adult"));
    assert!(errors.get("size").unwrap().contains("listed options"));
}

#[test]
fn test_validation_reports_first_failing_rule_only() {
    let field = FieldDefinition::new("size", "Size", "choices")
        .rule(ValidationRule::min_items(1))
        .rule(ValidationRule::one_of());

    let message = Validator.validate_field(&field, &json!([])).unwrap();
    assert_eq!(message, "Size needs at least 1 selection(s)");
}

#[test]
fn test_image_rule_accepts_file_or_url() {
    let field = FieldDefinition::new("thumbnail", "Thumbnail", "image").rule(ValidationRule::image());
    let file = ImageSource::File(FileHandle::new("a.png", 10, "image/png"));

    assert!(Validator.validate_field(&field, &file.to_value()).is_none());
    assert!(Validator.validate_field(&field, &json!("https://cdn.example/a.png")).is_none());
    assert!(Validator.validate_field(&field, &json!(42)).is_some());

    let pdf = ImageSource::File(FileHandle::new("a.pdf", 10, "application/pdf"));
    assert!(Validator.validate_field(&field, &pdf.to_value()).is_some());
}

#[test]
fn test_numbers_reject_strings() {
    let field = FieldDefinition::new("price", "Price", "float").rule(ValidationRule::min(0.0));
    assert_eq!(Validator.validate_field(&field, &json!("12")).as_deref(), Some("Price must be a number"));
}

#[test]
fn test_binder_renders_label_description_and_empty_error_slot() {
    let state = FormState::new(create_test_form());
    let field = GenericField::new("name").with_label("Name").with_description("Shown to customers");

    let node = field.render(&state, |control| Node::element("input").attr("name", control.name));

    let html = node.to_html();
    let label = html.find("<label").unwrap();
    let description = html.find("form-description").unwrap();
    let input = html.find("<input").unwrap();
    let slot = html.find("data-error-for").unwrap();
    assert!(label < description && description < input && input < slot);
    assert_eq!(node.find_by_attr("data-error-for", "name").unwrap().text_content(), "");
}

#[test]
fn test_binder_change_only_touches_its_path() {
    let mut state = FormState::new(create_test_form());
    let before = state.values().clone();
    let field = GenericField::new("name").with_label("Name");

    field.change(&mut state, json!("Linen shirt"));

    assert_eq!(state.value("name"), &json!("Linen shirt"));
    for (k, v) in before.iter().filter(|(k, _)| k.as_str() != "name") {
        assert_eq!(state.value(k), v);
    }
}

#[test]
fn test_change_revalidates_own_path() {
    let mut state = FormState::new(create_test_form());
    let age = GenericField::new("age").with_label("Age");

    age.change(&mut state, json!(12));
    assert_eq!(state.error("age"), Some("Must be an adult"));
    assert_eq!(state.error("name"), None, "siblings are not validated on change");

    age.change(&mut state, json!(40));
    assert_eq!(state.error("age"), None);

    let node = age.render(&state, |_| Node::empty());
    assert_eq!(node.find_by_attr("data-error-for", "age").unwrap().text_content(), "");
}

#[test]
fn test_error_slot_shows_message_after_submit() {
    let mut state = FormState::new(create_test_form());
    assert!(state.validate_all().is_err());

    let name = TextField::new(GenericField::new("name").with_label("Name"));
    let node = name.render(&state);
    let slot = node.find_by_attr("data-error-for", "name").unwrap();
    assert_eq!(slot.text_content(), "Name is required");
    assert_eq!(slot.get_attr("role"), Some("alert"));
}

#[test]
#[should_panic(expected = "not part of the defaults")]
fn test_binding_undeclared_path_fails_loudly() {
    let mut state = FormState::new(create_test_form());
    state.field("colour").set(json!("red"));
}

#[test]
fn test_text_field_null_renders_empty() {
    let mut values = serde_json::Map::new();
    values.insert("name".to_string(), Value::Null);
    let state = FormState::with_values(create_test_form(), values);
    let name = TextField::new(GenericField::new("name"));

    assert_eq!(name.text(&state), "");
    let node = name.render(&state);
    assert_eq!(node.find_by_attr("name", "name").unwrap().get_attr("value"), Some(""));
}

#[test]
fn test_numeric_key_policy() {
    for key in ["-", "+", "e", "E"] {
        assert!(!NumericField::accepts_key("", key));
        assert!(!NumericField::accepts_key("12", key));
    }
    assert!(!NumericField::accepts_key("", "0"));
    assert!(NumericField::accepts_key("1", "0"));
    assert!(!NumericField::accepts_key("", "."));
    assert!(NumericField::accepts_key("1", "."));
    assert!(!NumericField::accepts_key("1.5", "."));
    assert!(!NumericField::accepts_key("1", "x"));
    assert!(NumericField::accepts_key("", "7"));
    assert!(NumericField::accepts_key("12", "Backspace"));
}

#[test]
fn test_numeric_stores_numbers_and_hides_zero() {
    let mut state = FormState::new(create_test_form());
    let age = NumericField::new(GenericField::new("age"));

    assert_eq!(age.text(&state), "");
    assert!(age.input(&mut state, "21"));
    assert_eq!(state.value("age"), &json!(21));
    assert_eq!(age.text(&state), "21");

    assert!(age.input(&mut state, "19.5"));
    assert_eq!(state.value("age"), &json!(19.5));

    assert!(!age.input(&mut state, "abc"));
    assert_eq!(state.value("age"), &json!(19.5));

    assert!(age.input(&mut state, ""));
    assert_eq!(state.value("age"), &json!(0));
    assert_eq!(age.text(&state), "");
}

#[test]
fn test_toggle_pair_is_idempotent() {
    let mut state = FormState::new(create_test_form());
    let size = ToggleGroupField::new(GenericField::new("size"), sizes());
    let original = size.selected(&state);
    let m = size.choices().by_label("M").unwrap().clone();
    let xs = size.choices().by_label("XS").unwrap().clone();

    size.toggle(&mut state, &m);
    assert_eq!(size.selected(&state), vec!["XS", "S", "M"]);
    size.toggle(&mut state, &m);
    assert_eq!(size.selected(&state), original);

    size.toggle(&mut state, &xs);
    size.toggle(&mut state, &xs);
    assert_eq!(size.selected(&state), original);
}

#[test]
fn test_toggles_commute() {
    let choices = sizes();
    let m = choices.by_label("M").unwrap().clone();
    let xs = choices.by_label("XS").unwrap().clone();

    let mut a = FormState::new(create_test_form());
    let mut b = FormState::new(create_test_form());
    let size = ToggleGroupField::new(GenericField::new("size"), choices);

    size.toggle(&mut a, &m);
    size.toggle(&mut a, &xs);
    size.toggle(&mut b, &xs);
    size.toggle(&mut b, &m);

    assert_eq!(a.value("size"), b.value("size"));
    assert_eq!(size.selected(&a), vec!["S", "M"]);
}

#[test]
fn test_radio_replaces_value() {
    let mut state = FormState::new(create_test_form());
    let field = RadioGroupField::new(GenericField::new("name"), sizes());
    let s = field.choices().by_label("S").unwrap().clone();
    let m = field.choices().by_label("M").unwrap().clone();

    field.select(&mut state, &s);
    field.select(&mut state, &m);
    assert_eq!(field.selected(&state), Some("M"));

    let node = field.render(&state);
    let checked = node.find_by_attr("value", "M").unwrap();
    assert_eq!(checked.get_attr("checked"), Some("checked"));
}

#[test]
fn test_popover_select_stores_key_and_honours_disabled() {
    let mut state = FormState::new(create_test_form());
    let mut field = PopoverSelectField::new(GenericField::new("name"), sizes());
    let m = field.choices().by_label("M").unwrap().clone();

    assert!(field.toggle_open());
    assert!(field.render(&state).find_by_attr("data-overlay", "popover").is_some());
    assert!(field.select(&mut state, &m));
    assert_eq!(field.selected_key(&state), Some("3"));
    assert!(!field.is_open());

    let mut disabled = PopoverSelectField::new(GenericField::new("name"), sizes()).disabled(true);
    let xs = disabled.choices().by_label("XS").unwrap().clone();
    assert!(!disabled.toggle_open());
    assert!(!disabled.select(&mut state, &xs));
    assert_eq!(state.value("name"), &json!("3"));
    assert!(disabled.render(&state).find_by_attr("data-overlay", "popover").is_none());
}

#[test]
fn test_popover_checkbox_toggles_keys() {
    let mut state = FormState::new(create_test_form());
    state.field("size").set(json!([]));
    let field = PopoverCheckboxField::new(GenericField::new("size"), sizes());
    let xl = field.choices().by_label("XL").unwrap().clone();
    let xs = field.choices().by_label("XS").unwrap().clone();

    field.toggle(&mut state, &xl);
    field.toggle(&mut state, &xs);
    assert_eq!(field.selected_keys(&state), vec!["1", "4"]);

    let disabled = PopoverCheckboxField::new(GenericField::new("size"), sizes()).disabled(true);
    assert!(!disabled.toggle(&mut state, &xl));
    assert_eq!(field.selected_keys(&state), vec!["1", "4"]);
}

#[test]
fn test_oversized_image_is_rejected_before_upload() {
    let mut state = FormState::new(create_test_form());
    let slot = UploadSlot::new(json!({ "type": "thumbnail" }), true);
    let image = ImageField::new(GenericField::new("thumbnail"), slot, 1_000_000);

    let result = image.drop_file(&mut state, FileHandle::new("huge.png", 2_000_000, "image/png"));

    assert!(result.is_err());
    assert_eq!(state.value("thumbnail"), &json!(""));
    assert_eq!(image.slot().state(), UploadState::Idle);
    assert_eq!(image.slot().generation(), 0);
}

#[test]
fn test_bound_url_never_uploads() {
    let mut values = serde_json::Map::new();
    values.insert("thumbnail".to_string(), json!("https://cdn.example/existing.png"));
    let state = FormState::with_values(create_test_form(), values);
    let image = ImageField::new(GenericField::new("thumbnail"), UploadSlot::new(Value::Null, false), 1_000_000);

    assert!(image.pending_upload(&state).is_none());
    let node = image.render(&state);
    let img = node.find_by_attr("src", "https://cdn.example/existing.png").unwrap();
    assert_eq!(img.get_attr("data-static"), Some("true"));
}

#[test]
fn test_reset_restores_defaults() {
    let mut state = FormState::new(create_test_form());
    state.field("name").set(json!("Jacket"));
    let _ = state.validate_all();

    state.reset();
    assert_eq!(state.value("name"), &json!(""));
    assert!(state.errors().is_empty());
}

#[test]
fn test_set_items_swaps_choices_of_known_field_only() {
    let mut state = FormState::new(create_test_form());

    assert!(state.set_items("size", vec![ChoiceItem::new("9", "XXXL")]).is_ok());
    state.field("size").set(json!(["XXXL"]));
    assert_eq!(state.error("size"), None);

    assert!(state.set_items("colour", vec![]).is_err());
}

#[test]
fn test_regex_and_max_rules() {
    let sku = FieldDefinition::new("sku", "SKU", "string").rule(ValidationRule::regex(r"^[A-Z]{3}-\d{4}$"));
    assert!(Validator.validate_field(&sku, &json!("ABC-1234")).is_none());
    assert!(Validator.validate_field(&sku, &json!("")).is_none());
    assert_eq!(Validator.validate_field(&sku, &json!("abc")).as_deref(), Some("SKU has invalid format"));

    let discount = FieldDefinition::new("discount", "Discount", "float").rule(ValidationRule::max(100.0));
    assert_eq!(Validator.validate_field(&discount, &json!(120)).as_deref(), Some("Discount must be at most 100"));
}

#[test]
fn test_accept_reports_type_mismatch_on_its_field() {
    #[derive(serde::Deserialize, Debug)]
    struct Person {
        #[allow(dead_code)]
        name: String,
        #[allow(dead_code)]
        age: u8,
    }

    let mut state = FormState::new(create_test_form());
    state.field("name").set(json!("Dana"));
    state.field("age").set(json!(400));

    let errors = state.accept::<Person>().unwrap_err();
    assert!(errors.get("age").unwrap().starts_with("Age has an invalid value"));
    assert!(!errors.contains(crate::validation::FORM_ERROR_KEY));
    assert_eq!(state.error("age"), errors.get("age"));
}

#[test]
fn test_accept_reports_missing_record_field_against_form() {
    #[derive(serde::Deserialize, Debug)]
    struct Account {
        #[allow(dead_code)]
        name: String,
        #[allow(dead_code)]
        email: String,
    }

    let mut state = FormState::new(create_test_form());
    state.field("name").set(json!("Dana"));
    state.field("age").set(json!(30));

    let errors = state.accept::<Account>().unwrap_err();
    assert!(errors.get(crate::validation::FORM_ERROR_KEY).unwrap().contains("email"));
    assert!(state.errors().contains("_form"));
}

#[test]
fn test_required_fields_are_marked() {
    let state = FormState::new(create_test_form());
    let html = TextField::new(GenericField::new("name")).render(&state).to_html();
    assert!(html.contains(r#"aria-required="aria-required""#));
}
