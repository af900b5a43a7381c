use serde::{Deserialize, Serialize};

/// Static level geometry. Solids never move and are only read during a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map<R> {
    solids: Vec<R>,
}

impl<R> Default for Map<R> {
    fn default() -> Self {
        Self { solids: Vec::new() }
    }
}

impl<R> Map<R> {
    /// A map with the given solids.
    pub fn new(solids: Vec<R>) -> Self {
        Self { solids }
    }

    /// Append a solid.
    pub fn add_solid(&mut self, solid: R) {
        self.solids.push(solid);
    }

    /// All solids, in insertion order.
    pub fn solids(&self) -> &[R] {
        &self.solids
    }

    /// Number of solids.
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// True if the map has no solids.
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}
