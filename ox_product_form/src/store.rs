use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::draft::ProductPayload;

/// Persistence collaborator. Receives only payloads that passed validation.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Stores the product and returns its id.
    async fn save(&self, payload: ProductPayload) -> anyhow::Result<String>;
}

/// Keeps saved products in memory.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    saved: Mutex<Vec<(String, ProductPayload)>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<(String, ProductPayload)> {
        self.saved.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.saved.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn save(&self, payload: ProductPayload) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        log::info!("Saved product '{}' as {}", payload.name, id);
        self.saved.lock().unwrap_or_else(|p| p.into_inner()).push((id.clone(), payload));
        Ok(id)
    }
}
