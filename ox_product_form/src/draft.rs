use chrono::{DateTime, Utc};
use ox_forms::{ImageSource, ValidationErrors};
use serde::{Deserialize, Serialize};

use crate::catalog::NamedItem;

/// Gender is a single label on the create form and a set on the edit form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum GenderSelection {
    One(String),
    Many(Vec<String>),
}

impl GenderSelection {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            GenderSelection::One(label) if label.is_empty() => Vec::new(),
            GenderSelection::One(label) => vec![label.as_str()],
            GenderSelection::Many(labels) => labels.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for GenderSelection {
    fn default() -> Self {
        GenderSelection::One(String::new())
    }
}

/// A category reference. The form stores bare keys; stored records carry the name too.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "CategoryRepr")]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Key(String),
    Record {
        id: String,
        #[serde(default)]
        name: String,
    },
}

impl From<CategoryRepr> for Category {
    fn from(repr: CategoryRepr) -> Self {
        match repr {
            CategoryRepr::Key(id) => Category { id, name: String::new() },
            CategoryRepr::Record { id, name } => Category { id, name },
        }
    }
}

/// The record the product form edits, as accepted by the validator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub size: Vec<String>,
    pub gender: GenderSelection,
    pub price: f64,
    pub stock: u32,
    pub discount: f64,
    #[serde(default)]
    pub discount_type: String,
    #[serde(default)]
    pub thumbnail_file: ImageSource,
    #[serde(default)]
    pub image_files: Vec<ImageSource>,
    pub categories: Vec<Category>,
}

impl ProductDraft {
    /// Fills in category names from the catalog; unknown keys keep their stored name.
    pub fn resolve_categories(&mut self, known: &[NamedItem]) {
        for category in &mut self.categories {
            if let Some(item) = known.iter().find(|k| k.id == category.id) {
                category.name = item.name.clone();
            }
        }
    }
}

/// What the persistence collaborator receives: the draft with every image
/// reduced to its uploaded URL.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub size: Vec<String>,
    pub gender: GenderSelection,
    pub price: f64,
    pub stock: u32,
    pub discount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    pub categories: Vec<Category>,
}

impl ProductPayload {
    /// Swaps the resolved URLs in for file handles. A file whose upload has not
    /// resolved yet is reported against its field.
    pub fn build(
        draft: ProductDraft,
        thumbnail_url: Option<String>,
        image_urls: &[Option<String>],
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let thumbnail = match &draft.thumbnail_file {
            ImageSource::Url(url) if url.is_empty() => None,
            ImageSource::Url(url) => Some(url.clone()),
            ImageSource::File(file) => {
                if thumbnail_url.is_none() {
                    errors.insert("thumbnailFile", format!("{} has not finished uploading", file.name));
                }
                thumbnail_url
            }
        };

        let mut images = Vec::with_capacity(draft.image_files.len());
        for (i, source) in draft.image_files.iter().enumerate() {
            match (source, image_urls.get(i).cloned().flatten()) {
                (ImageSource::Url(url), _) if !url.is_empty() => images.push(url.clone()),
                (ImageSource::File(_), Some(url)) => images.push(url),
                (ImageSource::File(file), None) => {
                    errors.insert("imageFiles", format!("{} has not finished uploading", file.name));
                }
                _ => {}
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: draft.name,
            description: draft.description,
            size: draft.size,
            gender: draft.gender,
            price: draft.price,
            stock: draft.stock,
            discount: draft.discount,
            discount_type: Some(draft.discount_type).filter(|t| !t.is_empty()),
            thumbnail,
            images,
            categories: draft.categories,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductColor {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_day: DateTime<Utc>,
    pub end_day: DateTime<Utc>,
}

/// An existing product, used to prefill the edit form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    pub category: NamedItem,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
