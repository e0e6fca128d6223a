use std::fmt;

use serde_json::Value;

use crate::binding::{FormState, GenericField};
use crate::node::Node;
use crate::traits::FieldAdapter;
use crate::upload::{UploadSlot, UploadState, UploadTask};
use crate::value::{FileHandle, ImageSource};

/// Why a dropped file was refused before any upload started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropRejection {
    TooLarge { name: String, size: u64, max: u64 },
    NotAnImage { name: String, mime: String },
    TooMany { name: String, max: usize },
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropRejection::TooLarge { name, size, max } => {
                write!(f, "{} is {} bytes, the limit is {} bytes", name, size, max)
            }
            DropRejection::NotAnImage { name, mime } => write!(f, "{} is not an image ({})", name, mime),
            DropRejection::TooMany { name, max } => write!(f, "{} exceeds the limit of {} images", name, max),
        }
    }
}

impl std::error::Error for DropRejection {}

fn check_file(file: &FileHandle, max_bytes: u64) -> Result<(), DropRejection> {
    if file.size > max_bytes {
        return Err(DropRejection::TooLarge { name: file.name.clone(), size: file.size, max: max_bytes });
    }
    if !file.mime.is_empty() && !file.is_image() {
        return Err(DropRejection::NotAnImage { name: file.name.clone(), mime: file.mime.clone() });
    }
    Ok(())
}

fn preview(source: &ImageSource, slot: Option<&UploadSlot>) -> Node {
    match source {
        ImageSource::Url(url) if url.is_empty() => Node::element("span").attr("class", "dropzone-hint").child(Node::text("Drop an image here")),
        ImageSource::Url(url) => Node::element("img").attr("src", url.as_str()).attr("data-static", "true"),
        ImageSource::File(file) => {
            let state = slot.map(UploadSlot::state).unwrap_or(UploadState::Idle);
            let mut node = Node::element("figure").attr("data-file", file.name.as_str());
            node = match &state {
                UploadState::Idle => node.attr("data-upload-state", "idle"),
                UploadState::Uploading { progress } => node
                    .attr("data-upload-state", "uploading")
                    .child(Node::element("progress").attr("max", "1").attr("value", progress.to_string())),
                UploadState::Resolved { url } => node
                    .attr("data-upload-state", "resolved")
                    .child(Node::element("img").attr("src", url.as_str())),
                UploadState::Failed { .. } => node.attr("data-upload-state", "failed"),
            };
            node.child(Node::element("figcaption").child(Node::text(file.name.as_str())))
        }
    }
}

/// Single image drop target bound to one file-or-URL value.
#[derive(Debug, Clone)]
pub struct ImageField {
    field: GenericField,
    slot: UploadSlot,
    max_bytes: u64,
}

impl ImageField {
    pub fn new(field: GenericField, slot: UploadSlot, max_bytes: u64) -> Self {
        Self { field, slot, max_bytes }
    }

    pub fn slot(&self) -> &UploadSlot {
        &self.slot
    }

    pub fn source(&self, state: &FormState) -> ImageSource {
        ImageSource::from_value(self.field.value(state)).unwrap_or_default()
    }

    /// Replaces the selection and starts its upload. Oversized files are
    /// refused and leave the bound value untouched.
    pub fn drop_file(&self, state: &mut FormState, file: FileHandle) -> Result<UploadTask, DropRejection> {
        if let Err(rejection) = check_file(&file, self.max_bytes) {
            log::warn!("Rejected drop on '{}': {}", self.field.name, rejection);
            return Err(rejection);
        }
        self.field.change(state, ImageSource::File(file.clone()).to_value());
        Ok(self.slot.begin(file))
    }

    /// URL of the bound file once its own upload resolved. A bound URL is not
    /// an upload and yields `None`.
    pub fn uploaded_url(&self, state: &FormState) -> Option<String> {
        match self.source(state) {
            ImageSource::File(file) => self.slot.url_for(&file),
            ImageSource::Url(_) => None,
        }
    }

    /// Upload for a bound file that has none yet. URLs never upload.
    pub fn pending_upload(&self, state: &FormState) -> Option<UploadTask> {
        match self.source(state) {
            ImageSource::File(file) if matches!(self.slot.state(), UploadState::Idle) => Some(self.slot.begin(file)),
            _ => None,
        }
    }

    pub fn clear(&self, state: &mut FormState) {
        self.slot.clear();
        self.field.change(state, Value::String(String::new()));
    }
}

impl FieldAdapter for ImageField {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        self.field.render(state, |control| {
            let source = ImageSource::from_value(control.value).unwrap_or_default();
            Node::element("div")
                .attr("class", "dropzone")
                .attr("data-dropzone", control.name)
                .attr("data-max-size", self.max_bytes.to_string())
                .attr("data-upload-progress", self.slot.progress().to_string())
                .child(preview(&source, Some(&self.slot)))
        })
    }
}

/// Ordered list of images; every entry has its own upload slot.
#[derive(Debug, Clone)]
pub struct ImagesField {
    field: GenericField,
    slots: Vec<UploadSlot>,
    destination: Value,
    temporary: bool,
    max_bytes: u64,
    max_files: Option<usize>,
}

impl ImagesField {
    pub fn new(field: GenericField, destination: Value, temporary: bool, max_bytes: u64) -> Self {
        Self { field, slots: Vec::new(), destination, temporary, max_bytes, max_files: None }
    }

    pub fn max_files(mut self, max: Option<usize>) -> Self {
        self.max_files = max;
        self
    }

    pub fn sources(&self, state: &FormState) -> Vec<ImageSource> {
        match self.field.value(state) {
            Value::Array(items) => items.iter().filter_map(ImageSource::from_value).collect(),
            _ => Vec::new(),
        }
    }

    pub fn slots(&self) -> &[UploadSlot] {
        &self.slots
    }

    /// Gives every bound entry a slot, e.g. after prefilling existing images.
    pub fn sync(&mut self, state: &FormState) {
        let len = self.sources(state).len();
        while self.slots.len() < len {
            self.slots.push(self.new_slot());
        }
        self.slots.truncate(len);
    }

    fn new_slot(&self) -> UploadSlot {
        UploadSlot::new(self.destination.clone(), self.temporary)
    }

    /// Appends the acceptable files and starts one upload per file.
    pub fn add_files(&mut self, state: &mut FormState, files: Vec<FileHandle>) -> (Vec<UploadTask>, Vec<DropRejection>) {
        self.sync(state);
        let mut sources = self.sources(state);
        let mut tasks = Vec::new();
        let mut rejected = Vec::new();

        for file in files {
            if let Some(max) = self.max_files {
                if sources.len() >= max {
                    rejected.push(DropRejection::TooMany { name: file.name.clone(), max });
                    continue;
                }
            }
            if let Err(rejection) = check_file(&file, self.max_bytes) {
                log::warn!("Rejected drop on '{}': {}", self.field.name, rejection);
                rejected.push(rejection);
                continue;
            }
            let slot = self.new_slot();
            tasks.push(slot.begin(file.clone()));
            self.slots.push(slot);
            sources.push(ImageSource::File(file));
        }

        if !tasks.is_empty() {
            self.field.change(state, Value::Array(sources.iter().map(ImageSource::to_value).collect()));
        }
        (tasks, rejected)
    }

    /// Removes one entry; its upload, if still running, is ignored from now on.
    pub fn remove(&mut self, state: &mut FormState, index: usize) -> bool {
        self.sync(state);
        let mut sources = self.sources(state);
        if index >= sources.len() {
            return false;
        }
        sources.remove(index);
        self.slots.remove(index).clear();
        self.field.change(state, Value::Array(sources.iter().map(ImageSource::to_value).collect()));
        true
    }

    /// Resolved URL per entry: bound URLs as-is, files once their upload resolved.
    pub fn urls(&self, state: &FormState) -> Vec<Option<String>> {
        self.sources(state)
            .iter()
            .enumerate()
            .map(|(i, source)| match source {
                ImageSource::Url(url) => Some(url.clone()),
                ImageSource::File(file) => self.slots.get(i).and_then(|slot| slot.url_for(file)),
            })
            .collect()
    }
}

impl FieldAdapter for ImagesField {
    fn field(&self) -> &GenericField {
        &self.field
    }

    fn render(&self, state: &FormState) -> Node {
        let sources = self.sources(state);
        self.field.render(state, |control| {
            let entries = sources
                .iter()
                .enumerate()
                .map(|(i, source)| Node::element("li").attr("data-index", i.to_string()).child(preview(source, self.slots.get(i))));
            Node::element("div")
                .attr("class", "dropzone")
                .attr("data-dropzone", control.name)
                .attr("data-multiple", "true")
                .attr("data-max-size", self.max_bytes.to_string())
                .child(Node::element("ul").children(entries))
        })
    }
}
