//! Product create/edit form of the store admin, built on `ox_forms`.

pub mod catalog;
pub mod config;
pub mod draft;
pub mod form;
pub mod schema;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::{ChoiceSource, LabeledItem, NamedItem, StaticCatalog};
pub use config::ProductFormConfig;
pub use draft::{Category, GenderSelection, ProductDetail, ProductDraft, ProductPayload};
pub use form::{GenderField, ProductFields, ProductForm, SubmitOutcome};
pub use schema::{product_form_definition, FormVariant};
pub use store::{MemoryProductStore, ProductStore};
