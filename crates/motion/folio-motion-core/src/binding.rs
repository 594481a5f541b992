//! Element registry and resolver trait.
//!
//! Components ask for elements by stable key (`"about.image"`). The host
//! decides whether the key exists through a `TargetResolver`; unresolved keys
//! yield no `ElementId`, which makes every binding built on them inert.
//! Each resolved element is claimed by exactly one scope at a time.

use hashbrown::HashMap;

use crate::ids::{ElementId, ScopeId};
use crate::inputs::Rect;

/// Opaque target handle (small string key understood by the host).
pub type TargetHandle = String;

/// Trait for resolving element keys to host handles.
/// Adapters implement this and install it on the `MotionContext`.
pub trait TargetResolver {
    fn resolve(&mut self, key: &str) -> Option<TargetHandle>;
}

/// Resolves every key to itself. Used headless and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityResolver;

impl TargetResolver for IdentityResolver {
    fn resolve(&mut self, key: &str) -> Option<TargetHandle> {
        Some(key.to_string())
    }
}

/// Resolves only keys present in the map.
#[derive(Clone, Debug, Default)]
pub struct MapResolver(pub HashMap<String, TargetHandle>);

impl MapResolver {
    /// Resolve each listed key to itself.
    pub fn identity<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self(keys.into_iter().map(|k| (k.to_string(), k.to_string())).collect())
    }
}

impl TargetResolver for MapResolver {
    fn resolve(&mut self, key: &str) -> Option<TargetHandle> {
        self.0.get(key).cloned()
    }
}

/// One row in the registry.
#[derive(Clone, Debug)]
pub struct ElementRow {
    pub id: ElementId,
    pub key: String,
    pub handle: TargetHandle,
    pub owner: ScopeId,
}

#[derive(Default, Debug)]
pub struct ElementRegistry {
    rows: Vec<ElementRow>,
    /// Rects by key; kept across claims so layout may arrive first.
    layout: HashMap<String, Rect>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn find_key(&self, key: &str) -> Option<&ElementRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn insert(&mut self, row: ElementRow) {
        self.rows.push(row);
    }

    pub fn owner(&self, id: ElementId) -> Option<ScopeId> {
        self.get(id).map(|r| r.owner)
    }

    /// Drop every row owned by `scope`, returning their ids.
    pub fn release_owner(&mut self, scope: ScopeId) -> Vec<ElementId> {
        let released: Vec<ElementId> = self
            .rows
            .iter()
            .filter(|r| r.owner == scope)
            .map(|r| r.id)
            .collect();
        self.rows.retain(|r| r.owner != scope);
        released
    }

    pub fn set_rect(&mut self, key: &str, rect: Rect) {
        self.layout.insert(key.to_string(), rect);
    }

    pub fn rect(&self, id: ElementId) -> Option<&Rect> {
        let row = self.get(id)?;
        self.layout.get(&row.key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
