use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::{
    Choices, ImageField, ImagesField, NumericField, PopoverCheckboxField, PopoverSelectField, RadioGroupField,
    SelectField, TextAreaField, TextField, ToggleGroupField,
};
use crate::binding::GenericField;
use crate::config::FormsConfig;
use crate::error::FormError;
use crate::schema::FieldDefinition;
use crate::traits::FieldAdapter;
use crate::upload::UploadSlot;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TypeMappingConfig {
    pub mappings: HashMap<String, DefaultFieldConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DefaultFieldConfig {
    pub component: String,
    #[serde(default)]
    pub default_props: Value,
}

pub type AdapterFactory = Arc<dyn Fn(&FieldDefinition, &FormsConfig) -> Box<dyn FieldAdapter> + Send + Sync>;

pub struct FieldRegistry {
    /// Maps data types (e.g. "float") to default configs (e.g. component="number-input")
    mapping: HashMap<String, DefaultFieldConfig>,
    /// Maps component names (e.g. "number-input") to adapter factories
    factories: HashMap<String, AdapterFactory>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self {
            mapping: HashMap::new(),
            factories: HashMap::new(),
        }
    }

    /// Registry with the standard type mappings and components.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let mappings = [
            ("string", "text-input"),
            ("text", "textarea"),
            ("integer", "number-input"),
            ("float", "number-input"),
            ("choice", "select"),
            ("choices", "toggle-group"),
            ("list", "popover-checkbox"),
            ("image", "image"),
            ("images", "images"),
        ];
        registry.load_from_config(TypeMappingConfig {
            mappings: mappings
                .iter()
                .map(|(t, c)| (t.to_string(), DefaultFieldConfig { component: c.to_string(), default_props: Value::Null }))
                .collect(),
        });

        registry.register_adapter("text-input", |def, _| {
            let mut adapter = TextField::new(GenericField::for_definition(def));
            if let Some(p) = &def.placeholder {
                adapter = adapter.placeholder(p);
            }
            Box::new(adapter)
        });
        registry.register_adapter("textarea", |def, _| {
            let mut adapter = TextAreaField::new(GenericField::for_definition(def));
            if let Some(p) = &def.placeholder {
                adapter = adapter.placeholder(p);
            }
            Box::new(adapter)
        });
        registry.register_adapter("number-input", |def, _| {
            let mut adapter = NumericField::new(GenericField::for_definition(def));
            if let Some(p) = &def.placeholder {
                adapter = adapter.placeholder(p);
            }
            Box::new(adapter)
        });
        registry.register_adapter("select", |def, _| {
            let mut adapter = SelectField::new(GenericField::for_definition(def), Choices::from_items(def.items.clone()));
            if let Some(p) = &def.placeholder {
                adapter = adapter.placeholder(p);
            }
            Box::new(adapter)
        });
        registry.register_adapter("radio-group", |def, _| {
            Box::new(RadioGroupField::new(GenericField::for_definition(def), Choices::from_items(def.items.clone())))
        });
        registry.register_adapter("toggle-group", |def, _| {
            Box::new(ToggleGroupField::new(GenericField::for_definition(def), Choices::from_items(def.items.clone())))
        });
        registry.register_adapter("popover-select", |def, _| {
            let mut adapter = PopoverSelectField::new(GenericField::for_definition(def), Choices::from_items(def.items.clone())).disabled(def.disabled);
            if let Some(p) = &def.placeholder {
                adapter = adapter.placeholder(p);
            }
            Box::new(adapter)
        });
        registry.register_adapter("popover-checkbox", |def, _| {
            let mut adapter = PopoverCheckboxField::new(GenericField::for_definition(def), Choices::from_items(def.items.clone())).disabled(def.disabled);
            if let Some(p) = &def.placeholder {
                adapter = adapter.placeholder(p);
            }
            Box::new(adapter)
        });
        registry.register_adapter("image", |def, config| {
            let slot = UploadSlot::new(json!({ "type": def.name }), config.temporary_uploads);
            Box::new(ImageField::new(GenericField::for_definition(def), slot, config.max_image_bytes))
        });
        registry.register_adapter("images", |def, config| {
            let adapter = ImagesField::new(GenericField::for_definition(def), json!({ "type": def.name }), config.temporary_uploads, config.max_image_bytes)
                .max_files(config.max_images);
            Box::new(adapter)
        });
        registry
    }

    /// Standard registry with the configured type mappings layered on top.
    pub fn from_config(config: &FormsConfig) -> Self {
        let mut registry = Self::standard();
        registry.load_from_config(TypeMappingConfig { mappings: config.type_mappings.clone() });
        registry
    }

    pub fn load_from_config(&mut self, config: TypeMappingConfig) {
        self.mapping.extend(config.mappings);
    }

    pub fn resolve_component_config(&self, data_type: &str) -> Option<&DefaultFieldConfig> {
        self.mapping.get(data_type)
    }

    pub fn register_adapter<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&FieldDefinition, &FormsConfig) -> Box<dyn FieldAdapter> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    pub fn has_component(&self, component_name: &str) -> bool {
        self.factories.contains_key(component_name)
    }

    /// Explicit component first, then the data type mapping, then plain text.
    pub fn resolve_component(&self, field: &FieldDefinition) -> String {
        if let Some(c) = &field.component {
            return c.clone();
        }
        self.resolve_component_config(&field.data_type)
            .map(|c| c.component.clone())
            .unwrap_or_else(|| "text-input".to_string()) // Fallback
    }

    pub fn build(&self, field: &FieldDefinition, config: &FormsConfig) -> Result<Box<dyn FieldAdapter>, FormError> {
        let component_name = self.resolve_component(field);
        let factory = self
            .factories
            .get(&component_name)
            .ok_or_else(|| FormError::UnknownComponent(component_name.clone()))?;
        Ok(factory(field, config))
    }
}
