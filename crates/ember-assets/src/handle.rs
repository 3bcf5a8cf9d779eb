use std::marker::PhantomData;

/// Index of a loaded asset inside its server.
pub type AssetId = u32;

/// A typed handle referencing a loaded asset in the AssetServer.
///
/// Handles are plain indices; they stay valid for the lifetime of the server
/// that issued them and never keep the asset alive on their own.
#[derive(Debug)]
pub struct AssetHandle<T> {
    id: AssetId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The index of this asset.
    pub fn id(&self) -> AssetId {
        self.id
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::hash::Hash for AssetHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
