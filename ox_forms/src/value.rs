use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The structured value a form edits, keyed by field name.
pub type FormValues = Map<String, Value>;

/// A file picked by the user that has not been uploaded yet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FileHandle {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub mime: String,
}

impl FileHandle {
    pub fn new(name: &str, size: u64, mime: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size,
            mime: mime.to_string(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Value of an image field: either a pending file or an already uploaded URL.
///
/// An empty URL is the unset state of a single image field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ImageSource {
    Url(String),
    File(FileHandle),
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Url(String::new())
    }
}

impl ImageSource {
    pub fn is_empty(&self) -> bool {
        matches!(self, ImageSource::Url(url) if url.is_empty())
    }

    pub fn file(&self) -> Option<&FileHandle> {
        match self {
            ImageSource::File(file) => Some(file),
            ImageSource::Url(_) => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageSource::Url(url) if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Reads a JSON array of strings, skipping anything that is not a string.
pub fn string_set(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Text shown for scalar values; null renders as an empty string.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
