use std::io::Write;

use chrono::Utc;
use ox_forms::{FieldAdapter, FileHandle, ImageSource};
use serde_json::json;

use crate::catalog::{ChoiceSource, NamedItem, StaticCatalog};
use crate::config::ProductFormConfig;
use crate::draft::{Category, GenderSelection, ProductDetail, ProductDraft, ProductImage, ProductPayload};
use crate::form::ProductForm;
use crate::schema::{product_form_definition, FormVariant};

fn detail() -> ProductDetail {
    ProductDetail {
        id: "7".to_string(),
        name: "Product 7".to_string(),
        description: "Description of Product 7".to_string(),
        product_type: "Type 7".to_string(),
        price: 700.0,
        quantity: 70,
        thumbnail: "https://cdn.test/thumb-7.png".to_string(),
        images: vec![ProductImage { id: "img7".to_string(), url: "https://cdn.test/img-7.png".to_string() }],
        colors: vec![],
        promotions: vec![],
        category: NamedItem::new("cat7", "Category 7"),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn fill_required(form: &mut ProductForm) {
    let (fields, state) = form.split_mut();
    fields.name.input(state, "Linen shirt");
    fields.description.input(state, "Loose fit, breathable.");
}

#[test]
fn test_defaults_only_miss_user_supplied_fields() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());

    let errors = form.validate().unwrap_err();

    let failing: Vec<&String> = errors.iter().map(|(k, _)| k).collect();
    assert_eq!(failing, vec!["description", "name"]);
}

#[test]
fn test_every_bound_path_has_a_default() {
    let form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    for adapter in form.fields().adapters() {
        assert!(form.state().values().contains_key(adapter.name()), "no default for {}", adapter.name());
    }
}

#[test]
fn test_accepted_draft_has_typed_defaults() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    fill_required(&mut form);

    let draft = form.validate().unwrap();

    assert_eq!(draft.size, vec!["XS", "S"]);
    assert_eq!(draft.gender, GenderSelection::One("Men".to_string()));
    assert_eq!(draft.price, 0.0);
    assert_eq!(draft.stock, 0);
    assert_eq!(draft.discount_type, "");
    assert_eq!(draft.thumbnail_file, ImageSource::default());
    assert!(draft.image_files.is_empty());
    assert_eq!(draft.categories, vec![Category { id: "1".to_string(), name: "clothing".to_string() }]);
}

#[test]
fn test_edit_variant_uses_gender_set() {
    let definition = product_form_definition(FormVariant::Edit, &StaticCatalog, &ProductFormConfig::default());
    assert_eq!(definition.default_values()["gender"], json!(["Men"]));

    let mut form = ProductForm::edit(&detail(), &StaticCatalog, &ProductFormConfig::default());
    let women = StaticCatalog.genders()[1].clone();
    {
        let (fields, state) = form.split_mut();
        fields.gender.pick(state, &women);
    }
    let draft = form.validate().unwrap();
    assert_eq!(draft.gender, GenderSelection::Many(vec!["Men".to_string(), "Women".to_string()]));
}

#[test]
fn test_edit_prefills_from_existing_product() {
    let form = ProductForm::edit(&detail(), &StaticCatalog, &ProductFormConfig::default());
    let state = form.state();

    assert_eq!(state.value("name"), &json!("Product 7"));
    assert_eq!(state.value("stock"), &json!(70));
    assert_eq!(form.fields().thumbnail.source(state), ImageSource::Url("https://cdn.test/thumb-7.png".to_string()));
    assert!(form.fields().thumbnail.pending_upload(state).is_none());
    assert_eq!(form.image_urls(), vec![Some("https://cdn.test/img-7.png".to_string())]);
    assert!(form.to_html().contains("Category 7"));
}

#[test]
fn test_positive_price_minimum_is_enforced() {
    let config = ProductFormConfig::default().with_min_price(1.0);
    let mut form = ProductForm::create(&StaticCatalog, &config);
    fill_required(&mut form);

    let errors = form.validate().unwrap_err();
    assert_eq!(errors.get("price"), Some("Price must be at least 1"));

    let (fields, state) = form.split_mut();
    assert!(fields.price.input(state, "19.9"));
    assert!(form.validate().is_ok());
}

#[test]
fn test_stock_must_be_whole() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    fill_required(&mut form);
    {
        let (fields, state) = form.split_mut();
        fields.stock.input(state, "2.5");
        assert_eq!(state.error("stock"), Some("Stock must be a whole number"));
        fields.stock.input(state, "12");
    }
    assert_eq!(form.validate().unwrap().stock, 12);
}

#[test]
fn test_stock_beyond_record_range_shows_on_stock() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    fill_required(&mut form);
    {
        let (fields, state) = form.split_mut();
        fields.stock.input(state, "5000000000");
        assert_eq!(state.error("stock"), Some("Stock must be at most 4294967295"));
    }

    let errors = form.validate().unwrap_err();
    assert!(errors.contains("stock"));
    assert!(!errors.contains(ox_forms::validation::FORM_ERROR_KEY));
    assert!(form.to_html().contains("Stock must be at most 4294967295"));
}

#[test]
fn test_percentage_discount_is_capped() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    fill_required(&mut form);
    {
        let (fields, state) = form.split_mut();
        assert!(fields.discount_type.select_label(state, "percentage"));
        fields.discount.input(state, "150");
    }

    let errors = form.validate().unwrap_err();
    assert!(errors.contains("discount"));
    assert!(form.state().error("discount").is_some());

    let (fields, state) = form.split_mut();
    assert!(fields.discount_type.select_label(state, "fixed"));
    assert_eq!(form.validate().unwrap().discount, 150.0);
}

#[test]
fn test_categories_need_one_selection() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    fill_required(&mut form);
    let clothing = StaticCatalog.categories()[0].clone();
    let (fields, state) = form.split_mut();
    assert!(fields.categories.toggle(state, &clothing));

    assert_eq!(state.error("categories"), Some("Pick at least one category"));
}

#[test]
fn test_oversized_thumbnail_is_rejected() {
    let mut form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());

    let result = form.select_thumbnail(FileHandle::new("huge.png", 2_000_000, "image/png"));

    assert!(result.is_err());
    assert_eq!(form.state().value("thumbnailFile"), &json!(""));
    assert_eq!(form.fields().thumbnail.slot().generation(), 0);
}

#[test]
fn test_reset_discards_edits() {
    let mut form = ProductForm::edit(&detail(), &StaticCatalog, &ProductFormConfig::default());
    {
        let (fields, state) = form.split_mut();
        fields.name.input(state, "");
    }
    let _ = form.validate();
    form.reset();

    assert_eq!(form.state().value("name"), &json!("Product 7"));
    assert!(form.state().errors().is_empty());
}

#[test]
fn test_render_groups_fields_into_cards() {
    let form = ProductForm::create(&StaticCatalog, &ProductFormConfig::default());
    let html = form.to_html();

    for heading in ["General Information", "Pricing And Stock", "Upload Image", "Category"] {
        assert!(html.contains(&format!("<h2>{}</h2>", heading)), "missing {}", heading);
    }
    assert!(html.contains("Name Product"));
    assert!(html.contains(r#"type="radio""#));
    assert!(html.contains("Add Product"));
    assert_eq!(form.fields().categories.render(form.state()).find_by_attr("data-overlay", "popover"), None);
}

#[test]
fn test_category_accepts_key_or_record() {
    let categories: Vec<Category> = serde_json::from_value(json!(["2", { "id": "1", "name": "clothing" }])).unwrap();
    assert_eq!(categories[0], Category { id: "2".to_string(), name: String::new() });
    assert_eq!(categories[1].name, "clothing");
}

#[test]
fn test_payload_needs_resolved_uploads() {
    let draft = ProductDraft {
        name: "Shirt".to_string(),
        thumbnail_file: ImageSource::File(FileHandle::new("a.png", 10, "image/png")),
        image_files: vec![
            ImageSource::Url("https://cdn.test/kept.png".to_string()),
            ImageSource::File(FileHandle::new("b.png", 10, "image/png")),
        ],
        ..Default::default()
    };

    let errors = ProductPayload::build(draft.clone(), None, &[None, None]).unwrap_err();
    assert!(errors.contains("thumbnailFile"));
    assert!(errors.contains("imageFiles"));

    let payload = ProductPayload::build(
        draft,
        Some("https://cdn.test/a.png".to_string()),
        &[None, Some("https://cdn.test/b.png".to_string())],
    )
    .unwrap();
    assert_eq!(payload.thumbnail.as_deref(), Some("https://cdn.test/a.png"));
    assert_eq!(payload.images, vec!["https://cdn.test/kept.png", "https://cdn.test/b.png"]);
    assert_eq!(payload.discount_type, None);
}

#[test]
fn test_config_loads_with_shared_settings() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "min_price: 5\nmax_image_bytes: 500000\nmax_images: 3").unwrap();

    let config = ProductFormConfig::from_path(file.path()).unwrap();
    assert_eq!(config.min_price, 5.0);
    assert_eq!(config.forms.max_image_bytes, 500_000);
    assert_eq!(config.forms.max_images, Some(3));

    let form = ProductForm::create(&StaticCatalog, &config);
    assert!(form.to_html().contains(r#"data-max-size="500000""#));
}
