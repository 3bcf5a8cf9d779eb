use crate::world::Components;

/// A component kind the world knows how to store.
///
/// The set of kinds is closed: each one maps to a dedicated field of
/// [`Components`], so accessing a kind is a field access rather than a
/// type-map lookup.
pub trait Component: Sized + 'static {
    /// Human-readable kind name, used in logs.
    const NAME: &'static str;

    fn storage(components: &Components) -> &SparseSet<Self>;
    fn storage_mut(components: &mut Components) -> &mut SparseSet<Self>;
}

/// Sparse-set storage for a single component type. Provides O(1) insert/remove/lookup
/// and dense iteration.
pub struct SparseSet<T> {
    /// Maps entity slot → dense index. `None` means the entity has no component.
    sparse: Vec<Option<usize>>,
    /// Packed component values.
    dense: Vec<T>,
    /// Entity slots corresponding to each dense slot (for iteration).
    entities: Vec<u32>,
}

impl<T> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Insert or replace a component for the given entity slot.
    pub fn insert(&mut self, index: u32, value: T) {
        let idx = index as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        if let Some(dense_idx) = self.sparse[idx] {
            self.dense[dense_idx] = value;
        } else {
            let dense_idx = self.dense.len();
            self.sparse[idx] = Some(dense_idx);
            self.dense.push(value);
            self.entities.push(index);
        }
    }

    /// Get an immutable reference to the component for an entity slot.
    pub fn get(&self, index: u32) -> Option<&T> {
        let idx = index as usize;
        self.sparse
            .get(idx)
            .and_then(|s| s.map(|dense_idx| &self.dense[dense_idx]))
    }

    /// Get a mutable reference to the component for an entity slot.
    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        let idx = index as usize;
        self.sparse
            .get(idx)
            .and_then(|s| s.map(|dense_idx| &mut self.dense[dense_idx]))
    }

    /// Get mutable references to the components of two distinct slots at once.
    pub fn get_pair_mut(&mut self, a: u32, b: u32) -> (Option<&mut T>, Option<&mut T>) {
        assert_ne!(a, b, "get_pair_mut requires distinct slots");
        let da = self.dense_index(a);
        let db = self.dense_index(b);
        match (da, db) {
            (Some(i), Some(j)) => {
                let (lo, hi, swapped) = if i < j { (i, j, false) } else { (j, i, true) };
                let (left, right) = self.dense.split_at_mut(hi);
                let (first, second) = (&mut left[lo], &mut right[0]);
                if swapped {
                    (Some(second), Some(first))
                } else {
                    (Some(first), Some(second))
                }
            }
            (Some(i), None) => (Some(&mut self.dense[i]), None),
            (None, Some(j)) => (None, Some(&mut self.dense[j])),
            (None, None) => (None, None),
        }
    }

    /// Remove the component for an entity slot. Returns `true` if it was present.
    pub fn remove(&mut self, index: u32) -> bool {
        self.take(index).is_some()
    }

    /// Remove and return the component for an entity slot.
    pub fn take(&mut self, index: u32) -> Option<T> {
        let idx = index as usize;
        let dense_idx = self.sparse.get_mut(idx)?.take()?;

        let last = self.dense.len() - 1;
        if dense_idx != last {
            // Swap-remove: move the last element into the removed slot.
            self.dense.swap(dense_idx, last);
            self.entities.swap(dense_idx, last);
            let moved_entity = self.entities[dense_idx];
            self.sparse[moved_entity as usize] = Some(dense_idx);
        }
        self.entities.pop();
        self.dense.pop()
    }

    /// Whether the slot holds a component.
    pub fn has(&self, index: u32) -> bool {
        self.dense_index(index).is_some()
    }

    /// Iterate over all (entity_slot, &component) pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn dense_index(&self, index: u32) -> Option<usize> {
        self.sparse.get(index as usize).copied().flatten()
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
