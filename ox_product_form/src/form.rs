use anyhow::Context;
use ox_forms::adapters::{
    Choices, DropRejection, ImageField, ImagesField, NumericField, PopoverCheckboxField, RadioGroupField, SelectField,
    TextAreaField, TextField, ToggleGroupField,
};
use ox_forms::render::form_shell;
use ox_forms::{
    FieldAdapter, FieldDefinition, FileHandle, FormDefinition, FormState, FormValues, GenericField, Node, UploadSlot,
    UploadTask, ValidationErrors,
};
use serde_json::{json, Value};

use crate::catalog::{ChoiceSource, LabeledItem, NamedItem, PERCENTAGE_DISCOUNT};
use crate::config::ProductFormConfig;
use crate::draft::{ProductDetail, ProductDraft, ProductPayload};
use crate::schema::{product_form_definition, FormVariant};
use crate::store::ProductStore;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Handed to the store, which returned this id.
    Saved(String),
    /// Nothing was stored; the errors are also shown in the field error slots.
    Invalid(ValidationErrors),
}

/// Gender is a radio group on the create form and a toggle group on the edit form.
#[derive(Debug, Clone)]
pub enum GenderField {
    Single(RadioGroupField<LabeledItem>),
    Multiple(ToggleGroupField<LabeledItem>),
}

impl GenderField {
    pub fn choices(&self) -> &Choices<LabeledItem> {
        match self {
            GenderField::Single(f) => f.choices(),
            GenderField::Multiple(f) => f.choices(),
        }
    }

    /// Selects the item, or toggles it when several genders may be picked.
    pub fn pick(&self, state: &mut FormState, item: &LabeledItem) {
        match self {
            GenderField::Single(f) => f.select(state, item),
            GenderField::Multiple(f) => f.toggle(state, item),
        }
    }
}

impl FieldAdapter for GenderField {
    fn field(&self) -> &GenericField {
        match self {
            GenderField::Single(f) => f.field(),
            GenderField::Multiple(f) => f.field(),
        }
    }

    fn render(&self, state: &FormState) -> Node {
        match self {
            GenderField::Single(f) => f.render(state),
            GenderField::Multiple(f) => f.render(state),
        }
    }
}

/// One adapter per draft path.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: TextField,
    pub description: TextAreaField,
    pub size: ToggleGroupField<LabeledItem>,
    pub gender: GenderField,
    pub price: NumericField,
    pub stock: NumericField,
    pub discount: NumericField,
    pub discount_type: SelectField<NamedItem>,
    pub thumbnail: ImageField,
    pub images: ImagesField,
    pub categories: PopoverCheckboxField<NamedItem>,
}

fn labeled(items: Vec<LabeledItem>) -> Choices<LabeledItem> {
    Choices::new(items, |i: &LabeledItem| i.id.clone(), |i: &LabeledItem| i.label.clone())
}

fn named(items: Vec<NamedItem>) -> Choices<NamedItem> {
    Choices::new(items, |i: &NamedItem| i.id.clone(), |i: &NamedItem| i.name.clone())
}

impl ProductFields {
    fn new(
        variant: FormVariant,
        state: &FormState,
        catalog: &dyn ChoiceSource,
        categories: Vec<NamedItem>,
        config: &ProductFormConfig,
    ) -> Self {
        let def = |name: &str| {
            state
                .definition()
                .field(name)
                .cloned()
                .unwrap_or_else(|| FieldDefinition::new(name, name, "string"))
        };
        let field = |name: &str| GenericField::for_definition(&def(name));
        let placeholder = |name: &str| def(name).placeholder.unwrap_or_default();

        let gender = match variant {
            FormVariant::Create => GenderField::Single(RadioGroupField::new(field("gender"), labeled(catalog.genders()))),
            FormVariant::Edit => GenderField::Multiple(ToggleGroupField::new(field("gender"), labeled(catalog.genders()))),
        };

        let forms = &config.forms;
        let slot = UploadSlot::new(json!({ "type": "thumbnail" }), forms.temporary_uploads).on_resolved(|url| {
            log::debug!("Thumbnail uploaded to {}", url);
        });

        Self {
            name: TextField::new(field("name")).placeholder(&placeholder("name")),
            description: TextAreaField::new(field("description")).placeholder(&placeholder("description")),
            size: ToggleGroupField::new(field("size"), labeled(catalog.sizes())),
            gender,
            price: NumericField::new(field("price")).placeholder(&placeholder("price")),
            stock: NumericField::new(field("stock")).placeholder(&placeholder("stock")),
            discount: NumericField::new(field("discount")).placeholder(&placeholder("discount")),
            discount_type: SelectField::new(field("discountType"), named(catalog.discount_types()))
                .placeholder(&placeholder("discountType")),
            thumbnail: ImageField::new(field("thumbnailFile"), slot, forms.max_image_bytes),
            images: ImagesField::new(
                field("imageFiles"),
                json!({ "type": "images" }),
                forms.temporary_uploads,
                forms.max_image_bytes,
            )
            .max_files(forms.max_images),
            categories: PopoverCheckboxField::new(field("categories"), named(categories)).placeholder("Select categories"),
        }
    }

    /// Every adapter, in render order.
    pub fn adapters(&self) -> Vec<&dyn FieldAdapter> {
        let adapters: [&dyn FieldAdapter; 11] = [
            &self.name,
            &self.description,
            &self.size,
            &self.gender,
            &self.price,
            &self.stock,
            &self.discount,
            &self.discount_type,
            &self.thumbnail,
            &self.images,
            &self.categories,
        ];
        adapters.to_vec()
    }
}

/// The product create/edit form: owns the draft and the adapters bound to it.
/// Resolved image URLs are read from the upload slots, matched against the
/// file each slot uploaded.
#[derive(Debug)]
pub struct ProductForm {
    variant: FormVariant,
    state: FormState,
    initial: FormValues,
    fields: ProductFields,
    category_items: Vec<NamedItem>,
}

impl ProductForm {
    pub fn create(catalog: &dyn ChoiceSource, config: &ProductFormConfig) -> Self {
        let definition = product_form_definition(FormVariant::Create, catalog, config);
        Self::build(FormVariant::Create, definition, FormValues::new(), catalog.categories(), catalog, config)
    }

    /// Prefills from an existing product. Its images are URLs, so nothing uploads.
    pub fn edit(detail: &ProductDetail, catalog: &dyn ChoiceSource, config: &ProductFormConfig) -> Self {
        let mut categories = catalog.categories();
        if !categories.iter().any(|c| c.id == detail.category.id) {
            categories.push(detail.category.clone());
        }
        let mut definition = product_form_definition(FormVariant::Edit, catalog, config);
        definition.set_items("categories", categories.iter().map(NamedItem::choice_item).collect());

        let mut initial = FormValues::new();
        initial.insert("name".to_string(), json!(detail.name));
        initial.insert("description".to_string(), json!(detail.description));
        initial.insert("price".to_string(), json!(detail.price));
        initial.insert("stock".to_string(), json!(detail.quantity));
        initial.insert("thumbnailFile".to_string(), json!(detail.thumbnail));
        initial.insert(
            "imageFiles".to_string(),
            Value::from(detail.images.iter().map(|i| i.url.clone()).collect::<Vec<_>>()),
        );
        initial.insert("categories".to_string(), json!([detail.category.id]));

        log::debug!("Editing product '{}'", detail.id);
        Self::build(FormVariant::Edit, definition, initial, categories, catalog, config)
    }

    fn build(
        variant: FormVariant,
        definition: FormDefinition,
        initial: FormValues,
        category_items: Vec<NamedItem>,
        catalog: &dyn ChoiceSource,
        config: &ProductFormConfig,
    ) -> Self {
        let state = FormState::with_values(definition, initial.clone());
        let mut fields = ProductFields::new(variant, &state, catalog, category_items.clone(), config);
        fields.images.sync(&state);
        Self { variant, state, initial, fields, category_items }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    /// The adapters together with the state they write to.
    pub fn split_mut(&mut self) -> (&mut ProductFields, &mut FormState) {
        (&mut self.fields, &mut self.state)
    }

    /// Uploaded URL of the bound thumbnail file. Stays `None` for a file whose
    /// own upload has not resolved, whatever an earlier file uploaded.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.fields.thumbnail.uploaded_url(&self.state)
    }

    pub fn image_urls(&self) -> Vec<Option<String>> {
        self.fields.images.urls(&self.state)
    }

    /// Binds a new thumbnail file and returns its upload.
    pub fn select_thumbnail(&mut self, file: FileHandle) -> Result<UploadTask, DropRejection> {
        self.fields.thumbnail.drop_file(&mut self.state, file)
    }

    pub fn clear_thumbnail(&mut self) {
        self.fields.thumbnail.clear(&mut self.state);
    }

    pub fn add_images(&mut self, files: Vec<FileHandle>) -> (Vec<UploadTask>, Vec<DropRejection>) {
        self.fields.images.add_files(&mut self.state, files)
    }

    pub fn remove_image(&mut self, index: usize) -> bool {
        self.fields.images.remove(&mut self.state, index)
    }

    pub fn render(&self) -> Node {
        let f = &self.fields;
        let s = &self.state;
        let card = |title: &str, nodes: Vec<Node>| {
            Node::element("section")
                .attr("class", "card")
                .child(Node::element("h2").child(Node::text(title)))
                .children(nodes)
        };

        form_shell(
            s.definition(),
            vec![
                card(
                    "General Information",
                    vec![f.name.render(s), f.description.render(s), f.size.render(s), f.gender.render(s)],
                ),
                card(
                    "Pricing And Stock",
                    vec![f.price.render(s), f.stock.render(s), f.discount.render(s), f.discount_type.render(s)],
                ),
                card("Upload Image", vec![f.thumbnail.render(s), f.images.render(s)]),
                card("Category", vec![f.categories.render(s)]),
            ],
        )
    }

    pub fn to_html(&self) -> String {
        self.render().to_html()
    }

    /// Back to the values the form was opened with; uploads in flight are ignored from now on.
    pub fn reset(&mut self) {
        self.state = FormState::with_values(self.state.definition().clone(), self.initial.clone());
        self.fields.thumbnail.slot().clear();
        for slot in self.fields.images.slots() {
            slot.clear();
        }
        self.fields.images.sync(&self.state);
    }

    /// Full validation, including the rules that span several fields.
    pub fn validate(&mut self) -> Result<ProductDraft, ValidationErrors> {
        let mut draft: ProductDraft = self.state.accept()?;

        if draft.discount_type == PERCENTAGE_DISCOUNT && draft.discount > 100.0 {
            let message = "Discount must be at most 100 for a percentage".to_string();
            self.state.insert_error("discount", message.clone());
            let mut errors = ValidationErrors::new();
            errors.insert("discount", message);
            return Err(errors);
        }

        draft.resolve_categories(&self.category_items);
        Ok(draft)
    }

    /// Validates and, only when everything passes, hands the payload to the store.
    pub async fn submit(&mut self, store: &dyn ProductStore) -> anyhow::Result<SubmitOutcome> {
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                log::debug!("Submission of '{}' blocked: {}", self.state.definition().id, errors);
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };

        let payload = match ProductPayload::build(draft, self.thumbnail_url(), &self.image_urls()) {
            Ok(payload) => payload,
            Err(errors) => {
                for (field, message) in errors.iter() {
                    self.state.insert_error(field, message.clone());
                }
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };

        let id = store.save(payload).await.context("Failed to save product")?;
        Ok(SubmitOutcome::Saved(id))
    }
}
