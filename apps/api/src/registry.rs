//! Custom block registry: process-wide state for user-defined section kinds.
//!
//! Blocks are addressed by their route slug; lookup is a hash map hit, never
//! a scan. Routes are unique and immutable after creation. Removing a block
//! orphans its stored items; cascade behavior belongs to the API layer that
//! owns item persistence, not to this registry.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::IdGenerator;
use crate::models::custom_block::{BlockKind, CustomBlock, FieldDef};

/// Request shape for `add`; identity is assigned by the registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomBlock {
    pub name: String,
    pub route: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Partial update for `update`. `route` is accepted here only so the
/// immutability rule can be rejected with a descriptive reason instead of
/// being silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBlockPatch {
    pub name: Option<String>,
    pub route: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<BlockKind>,
    pub fields: Option<Vec<FieldDef>>,
}

struct RegistryInner {
    by_route: HashMap<String, CustomBlock>,
    route_of: HashMap<Uuid, String>,
}

pub struct CustomBlockRegistry {
    inner: RwLock<RegistryInner>,
}

impl Default for CustomBlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomBlockRegistry {
    pub fn new() -> Self {
        CustomBlockRegistry {
            inner: RwLock::new(RegistryInner {
                by_route: HashMap::new(),
                route_of: HashMap::new(),
            }),
        }
    }

    /// Registers a new block. Rejects an empty route and a route that
    /// collides with an existing block; on rejection the registry is
    /// left unchanged.
    pub fn add(&self, new: NewCustomBlock, ids: &dyn IdGenerator) -> Result<CustomBlock, AppError> {
        let route = new.route.trim().to_string();
        if route.is_empty() {
            return Err(AppError::Validation("custom block route must not be empty".to_string()));
        }

        let mut inner = self.inner.write().expect("registry lock poisoned");
        if inner.by_route.contains_key(&route) {
            return Err(AppError::RouteTaken(route));
        }

        let block = CustomBlock {
            id: ids.next_id(),
            name: new.name,
            route: route.clone(),
            kind: new.kind,
            fields: new.fields,
        };
        inner.route_of.insert(block.id, route.clone());
        inner.by_route.insert(route, block.clone());
        Ok(block)
    }

    /// Merges a partial update into an existing block. The route is
    /// immutable: a route change must be modeled as delete + add, so
    /// stored items keyed by the old route never dangle silently.
    pub fn update(&self, id: Uuid, patch: CustomBlockPatch) -> Result<CustomBlock, AppError> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let route = inner
            .route_of
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("custom block {id}")))?;

        if let Some(requested) = &patch.route {
            if *requested != route {
                return Err(AppError::Validation(
                    "custom block routes are immutable; delete the block and add a new one"
                        .to_string(),
                ));
            }
        }

        let block = inner
            .by_route
            .get_mut(&route)
            .expect("route index out of sync with block map");
        if let Some(name) = patch.name {
            block.name = name;
        }
        if let Some(kind) = patch.kind {
            block.kind = kind;
        }
        if let Some(fields) = patch.fields {
            block.fields = fields;
        }
        Ok(block.clone())
    }

    /// Removes a block and returns it. Associated items are orphaned, not
    /// cascade-deleted.
    pub fn remove(&self, id: Uuid) -> Result<CustomBlock, AppError> {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        let route = inner
            .route_of
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("custom block {id}")))?;
        let block = inner
            .by_route
            .remove(&route)
            .expect("route index out of sync with block map");
        Ok(block)
    }

    /// O(1) lookup by route slug.
    pub fn get_by_route(&self, route: &str) -> Option<CustomBlock> {
        self.inner
            .read()
            .expect("registry lock poisoned")
            .by_route
            .get(route)
            .cloned()
    }

    pub fn get(&self, id: Uuid) -> Option<CustomBlock> {
        let inner = self.inner.read().expect("registry lock poisoned");
        let route = inner.route_of.get(&id)?;
        inner.by_route.get(route).cloned()
    }

    /// All registered blocks, name-sorted for stable listings.
    pub fn list(&self) -> Vec<CustomBlock> {
        let mut blocks: Vec<CustomBlock> = self
            .inner
            .read()
            .expect("registry lock poisoned")
            .by_route
            .values()
            .cloned()
            .collect();
        blocks.sort_by(|a, b| a.name.cmp(&b.name));
        blocks
    }

    /// All route slugs, for layout sanitation.
    pub fn routes(&self) -> Vec<String> {
        self.inner
            .read()
            .expect("registry lock poisoned")
            .by_route
            .keys()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::UuidGenerator;

    fn new_block(route: &str) -> NewCustomBlock {
        NewCustomBlock {
            name: format!("Block {route}"),
            route: route.to_string(),
            kind: BlockKind::Timeline,
            fields: vec![],
        }
    }

    #[test]
    fn test_add_assigns_identity_and_registers_route() {
        let registry = CustomBlockRegistry::new();
        let block = registry.add(new_block("talks"), &UuidGenerator).unwrap();
        assert_eq!(registry.get_by_route("talks").map(|b| b.id), Some(block.id));
        assert_eq!(registry.get(block.id).map(|b| b.route), Some("talks".to_string()));
    }

    #[test]
    fn test_route_collision_rejected_and_registry_unchanged() {
        let registry = CustomBlockRegistry::new();
        let original = registry.add(new_block("talks"), &UuidGenerator).unwrap();

        let err = registry.add(new_block("talks"), &UuidGenerator);
        assert!(matches!(err, Err(AppError::RouteTaken(_))));

        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.get_by_route("talks").map(|b| b.id), Some(original.id));
    }

    #[test]
    fn test_empty_route_rejected() {
        let registry = CustomBlockRegistry::new();
        let err = registry.add(new_block("   "), &UuidGenerator);
        assert!(matches!(err, Err(AppError::Validation(_))));
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let registry = CustomBlockRegistry::new();
        let block = registry.add(new_block("talks"), &UuidGenerator).unwrap();

        let updated = registry
            .update(
                block.id,
                CustomBlockPatch {
                    name: Some("Conference Talks".to_string()),
                    ..CustomBlockPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Conference Talks");
        assert_eq!(updated.kind, BlockKind::Timeline, "unpatched fields survive");
        assert_eq!(updated.route, "talks");
    }

    #[test]
    fn test_route_is_immutable() {
        let registry = CustomBlockRegistry::new();
        let block = registry.add(new_block("talks"), &UuidGenerator).unwrap();

        let err = registry.update(
            block.id,
            CustomBlockPatch {
                route: Some("lectures".to_string()),
                ..CustomBlockPatch::default()
            },
        );
        assert!(matches!(err, Err(AppError::Validation(_))));
        assert!(registry.get_by_route("talks").is_some());
        assert!(registry.get_by_route("lectures").is_none());
    }

    #[test]
    fn test_update_with_same_route_is_accepted() {
        let registry = CustomBlockRegistry::new();
        let block = registry.add(new_block("talks"), &UuidGenerator).unwrap();
        let result = registry.update(
            block.id,
            CustomBlockPatch {
                route: Some("talks".to_string()),
                ..CustomBlockPatch::default()
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_remove_frees_the_route() {
        let registry = CustomBlockRegistry::new();
        let block = registry.add(new_block("talks"), &UuidGenerator).unwrap();
        let removed = registry.remove(block.id).unwrap();
        assert_eq!(removed.id, block.id);
        assert!(registry.get_by_route("talks").is_none());

        // A freed route may be reused by a new block.
        assert!(registry.add(new_block("talks"), &UuidGenerator).is_ok());
    }

    #[test]
    fn test_remove_unknown_block_is_not_found() {
        let registry = CustomBlockRegistry::new();
        assert!(matches!(
            registry.remove(Uuid::new_v4()),
            Err(AppError::NotFound(_))
        ));
    }
}
