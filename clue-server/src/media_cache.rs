use dashmap::DashMap;
use std::path::PathBuf;
use tracing::debug;

use clue_types::MediaRef;

/// Remote ids of media already uploaded once, keyed by file name. Entries
/// are never replaced or evicted.
#[derive(Debug)]
pub struct MediaCache {
    static_root: PathBuf,
    ids: DashMap<String, String>,
}

impl MediaCache {
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self {
            static_root: static_root.into(),
            ids: DashMap::new(),
        }
    }

    /// Cached id when known, otherwise the local file to upload
    pub fn resolve(&self, name: &str) -> MediaRef {
        match self.ids.get(name) {
            Some(id) => MediaRef::Cached(id.value().clone()),
            None => MediaRef::Path(self.static_root.join(name).to_string_lossy().into_owned()),
        }
    }

    /// Insert-if-absent; returns the id that ends up cached
    pub fn remember(&self, name: &str, remote_id: &str) -> String {
        let entry = self
            .ids
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Caching media {} as {}", name, remote_id);
                remote_id.to_string()
            });
        entry.value().clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
