//! Content sources: where the bytes of leaves and membership queries come
//! from.
//!
//! The tree never interprets identifiers. It passes them to the source and
//! either hashes the returned bytes or reports the read failure.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// Supplies raw content for an identifier.
pub trait ContentSource {
    /// Identifier type, e.g. a path or a key.
    type Id: ?Sized + fmt::Debug;

    /// Read the full content behind `id`.
    fn read(&self, id: &Self::Id) -> io::Result<Vec<u8>>;
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    type Id = S::Id;

    fn read(&self, id: &Self::Id) -> io::Result<Vec<u8>> {
        (**self).read(id)
    }
}

/// Reads files, optionally relative to a base directory.
#[derive(Debug, Default, Clone)]
pub struct FsSource {
    base: Option<PathBuf>,
}

impl FsSource {
    /// Source resolving paths as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source resolving relative paths against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        FsSource {
            base: Some(base.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ContentSource for FsSource {
    type Id = Path;

    fn read(&self, id: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(id))
    }
}

/// The identifier is the content itself. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineSource;

impl ContentSource for InlineSource {
    type Id = [u8];

    fn read(&self, id: &[u8]) -> io::Result<Vec<u8>> {
        Ok(id.to_vec())
    }
}

/// In-memory key → content map; unknown keys fail with
/// [`io::ErrorKind::NotFound`].
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    entries: HashMap<String, Vec<u8>>,
}

impl MapSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the content behind `key`.
    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), content.into());
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> FromIterator<(K, V)> for MapSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut source = MapSource::new();
        for (key, content) in iter {
            source.insert(key, content);
        }
        source
    }
}

impl ContentSource for MapSource {
    type Id = str;

    fn read(&self, id: &str) -> io::Result<Vec<u8>> {
        self.entries.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no content for key {id:?}"))
        })
    }
}
