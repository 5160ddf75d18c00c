use log::{error, warn};
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use web_sys::window;

pub const KEY_THEME: &str = "theme";
pub const KEY_SELECTED_MODEL: &str = "selectedModel";
pub const KEY_CONVERSATIONS: &str = "conversations";
pub const KEY_ACTIVE_CONVERSATION: &str = "currentConversationId";
pub const KEY_TEMPLATES: &str = "promptTemplates";
pub const KEY_GENERATION_CONFIG: &str = "aiConfigurations";
pub const KEY_IMAGE_SIZE: &str = "imageSize";
pub const KEY_AUTO_SCROLL: &str = "autoScroll";
pub const KEY_FONT_SIZE: &str = "fontSize";
pub const KEY_ENDPOINTS: &str = "endpoints";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend rejected the operation: {message}")]
    Backend { message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Raw string key-value persistence. Stores never talk to the browser directly
/// so tests can swap in [`MemoryStorage`].
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get_item(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set_item(key, &json)
    }

    /// Missing or unreadable entries fall back to `None`; read errors are logged.
    fn load_or_warn<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        match self.load(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("ignoring stored `{}`: {}", key, e);
                None
            }
        }
    }

    /// Write failures are logged, never surfaced to the UI.
    fn save_or_log<T: Serialize + ?Sized>(&self, key: &str, value: &T)
    where
        Self: Sized,
    {
        if let Err(e) = self.save(key, value) {
            error!("failed to persist `{}`: {}", key, e);
        }
    }
}

/// Browser `window.localStorage`.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> StorageResult<web_sys::Storage> {
        let window = window().ok_or(StorageError::Unavailable)?;
        window
            .local_storage()
            .map_err(|e| StorageError::Backend { message: format!("{:?}", e) })?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend { message: format!("{:?}", e) })
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend { message: format!("{:?}", e) })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend { message: format!("{:?}", e) })
    }
}

/// In-memory store. Clones share the same map, mirroring how every handle to
/// `localStorage` sees the same data.
#[derive(Clone, Default, Debug)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl PartialEq for MemoryStorage {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
