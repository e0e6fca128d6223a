use ox_forms::{ActionDefinition, ChoiceItem, FieldDefinition, FormDefinition, ValidationRule};
use serde_json::json;

use crate::catalog::{ChoiceSource, LabeledItem, NamedItem};
use crate::config::ProductFormConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormVariant {
    Create,
    Edit,
}

fn labeled(items: Vec<LabeledItem>) -> Vec<ChoiceItem> {
    items.iter().map(LabeledItem::choice_item).collect()
}

fn named(items: Vec<NamedItem>) -> Vec<ChoiceItem> {
    items.iter().map(NamedItem::choice_item).collect()
}

/// Declares every field of the product form with its rules and defaults.
pub fn product_form_definition(
    variant: FormVariant,
    catalog: &dyn ChoiceSource,
    config: &ProductFormConfig,
) -> FormDefinition {
    let gender = match variant {
        FormVariant::Create => FieldDefinition::new("gender", "Gender", "choice")
            .component("radio-group")
            .rule(ValidationRule::required())
            .default_value(json!("Men")),
        FormVariant::Edit => FieldDefinition::new("gender", "Gender", "choices")
            .component("toggle-group")
            .rule(ValidationRule::min_items(1))
            .default_value(json!(["Men"])),
    };

    let (id, title, action) = match variant {
        FormVariant::Create => ("create_product", "Create Product", "Add Product"),
        FormVariant::Edit => ("edit_product", "Edit Product", "Save Product"),
    };

    FormDefinition {
        id: id.to_string(),
        title: title.to_string(),
        fields: vec![
            FieldDefinition::new("name", "Name Product", "string")
                .placeholder("Please enter your name")
                .rule(ValidationRule::required()),
            FieldDefinition::new("description", "Description Product", "text")
                .placeholder("Type your message here.")
                .rule(ValidationRule::required()),
            FieldDefinition::new("size", "Size", "choices")
                .description("Pick Available Size")
                .items(labeled(catalog.sizes()))
                .rule(ValidationRule::min_items(1))
                .rule(ValidationRule::one_of())
                .default_value(json!(["XS", "S"])),
            gender
                .description("Pick Available gender")
                .items(labeled(catalog.genders()))
                .rule(ValidationRule::one_of()),
            FieldDefinition::new("price", "Price", "float")
                .placeholder("Please enter your price product")
                .rule(ValidationRule::min(config.min_price)),
            FieldDefinition::new("stock", "Stock", "integer")
                .placeholder("Please enter your stock product")
                .rule(ValidationRule::min(0.0))
                .rule(ValidationRule::max(f64::from(u32::MAX)))
                .rule(ValidationRule::integer()),
            FieldDefinition::new("discount", "Discount", "float")
                .placeholder("Enter your discount")
                .rule(ValidationRule::min(0.0)),
            FieldDefinition::new("discountType", "Discount Type", "choice")
                .placeholder("Select item")
                .items(named(catalog.discount_types()))
                .rule(ValidationRule::one_of()),
            FieldDefinition::new("thumbnailFile", "Thumbnail", "image").rule(ValidationRule::image()),
            FieldDefinition::new("imageFiles", "Images", "images").rule(ValidationRule::image()),
            FieldDefinition::new("categories", "Category", "list")
                .component("popover-checkbox")
                .items(named(catalog.categories()))
                .rule(ValidationRule::min_items(1).with_message("Pick at least one category"))
                .default_value(json!(["1"])),
        ],
        actions: vec![ActionDefinition {
            name: "submit".to_string(),
            label: action.to_string(),
            action_type: "submit".to_string(),
        }],
    }
}
