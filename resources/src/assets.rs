use std::{collections::HashMap, path::Path};

use log::{debug, trace};
use pazzers_core::AssetId;

use crate::{FieldDescriptor, PixelBuffer, ResourceError};

/// Loaded visual assets addressable by name or by [`AssetId`].
#[derive(Debug, Default)]
pub struct AssetCatalog {
    buffers: Vec<PixelBuffer>,
    ids: HashMap<String, AssetId>,
}

impl AssetCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every asset listed by `descriptor`.
    pub fn load(descriptor: &FieldDescriptor) -> Result<Self, ResourceError> {
        Self::load_with(descriptor, |path| PixelBuffer::create(path))
    }

    fn load_with(
        descriptor: &FieldDescriptor,
        mut loader: impl FnMut(&Path) -> Result<PixelBuffer, ResourceError>,
    ) -> Result<Self, ResourceError> {
        let mut catalog = Self::new();
        for source in descriptor.assets() {
            let buffer = loader(source.path())?;
            trace!(
                "loaded asset `{}` from {} ({}x{})",
                source.name(),
                source.path().display(),
                buffer.width(),
                buffer.height()
            );
            let _ = catalog.insert(source.name(), buffer);
        }
        debug!("asset catalog holds {} assets", catalog.len());
        Ok(catalog)
    }

    /// Registers `buffer` under `name`, replacing any previous buffer with the
    /// same name while keeping its identifier.
    pub fn insert(&mut self, name: impl Into<String>, buffer: PixelBuffer) -> AssetId {
        let name = name.into();
        if let Some(&id) = self.ids.get(&name) {
            if let Some(slot) = self.buffers.get_mut(id.get() as usize) {
                *slot = buffer;
            }
            return id;
        }
        let id = AssetId::new(u32::try_from(self.buffers.len()).unwrap_or(u32::MAX));
        self.buffers.push(buffer);
        let _ = self.ids.insert(name, id);
        id
    }

    /// Identifier registered for `name`.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<AssetId> {
        self.ids.get(name).copied()
    }

    /// Buffer referenced by `id`.
    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<&PixelBuffer> {
        self.buffers.get(id.get() as usize)
    }

    /// Buffer registered under `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&PixelBuffer> {
        self.id(name).and_then(|id| self.get(id))
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;
    use crate::{AssetSource, PixelFormat};

    fn solid(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::blank(width, height, PixelFormat::Rgb8).expect("blank buffer")
    }

    #[test]
    fn loads_assets_in_descriptor_order() {
        let descriptor = FieldDescriptor::new(1, 1, 1, Vec::new()).with_assets(vec![
            AssetSource::new("floor", "a/floor.png"),
            AssetSource::new("wall", "a/wall.png"),
        ]);
        let load_order = RefCell::new(Vec::new());
        let catalog = AssetCatalog::load_with(&descriptor, |path| {
            load_order.borrow_mut().push(path.to_path_buf());
            Ok(solid(2, 2))
        })
        .expect("catalog loads through the provided loader");

        assert_eq!(
            load_order.into_inner(),
            vec![PathBuf::from("a/floor.png"), PathBuf::from("a/wall.png")]
        );
        assert_eq!(catalog.id("floor"), Some(AssetId::new(0)));
        assert_eq!(catalog.id("wall"), Some(AssetId::new(1)));
    }

    #[test]
    fn loader_failures_abort_loading() {
        let descriptor = FieldDescriptor::new(1, 1, 1, Vec::new())
            .with_assets(vec![AssetSource::new("broken", "missing.png")]);
        let result = AssetCatalog::load_with(&descriptor, |_| {
            Err(ResourceError::InvalidDimensions {
                width: 0,
                height: 0,
            })
        });
        assert!(result.is_err());
    }

    #[test]
    fn reinserting_a_name_keeps_its_identifier() {
        let mut catalog = AssetCatalog::new();
        let first = catalog.insert("floor", solid(1, 1));
        let second = catalog.insert("floor", solid(3, 2));

        assert_eq!(first, second);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.by_name("floor").map(PixelBuffer::width), Some(3));
    }
}
