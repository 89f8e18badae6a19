//! Store configuration.

/// Default storage slot holding the serialized note collection.
pub const DEFAULT_STORAGE_KEY: &str = "geo-notes";

/// Construction-time settings for `NoteStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slot key the collection is read from and written to.
    pub storage_key: String,
    /// Write `[]` to the slot on open when it is absent.
    pub write_defaults: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            write_defaults: true,
        }
    }
}

impl StoreConfig {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            storage_key: key.into(),
            ..Self::default()
        }
    }

    pub fn write_defaults(mut self, enabled: bool) -> Self {
        self.write_defaults = enabled;
        self
    }
}
