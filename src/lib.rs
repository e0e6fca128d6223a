//! Product form engine for the store admin.
//!
//! [`forms`] is the generic layer (schema, validation, binding, adapters,
//! uploads); [`product`] composes it into the product create/edit form.

pub use ox_forms as forms;
pub use ox_product_form as product;

pub use ox_forms::{FormState, FormsConfig, Validator};
pub use ox_product_form::{ProductForm, ProductFormConfig, StaticCatalog};
