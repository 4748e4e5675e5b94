//! Filter registry for looking up filters by name.
//!
//! Factories receive the session's [`FilterSettings`] so parameterized filters
//! (CLAHE, contrast scaling) are built with whatever values the caller configured.

use crate::core::config::FilterSettings;
use crate::core::node::{Category, FilterMetadata, ImageFilter};
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating filter instances.
pub type FilterFactory = Arc<dyn Fn(&FilterSettings) -> Box<dyn ImageFilter> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: FilterFactory,
    /// Cached metadata (avoids creating instance just to get metadata).
    pub metadata: FilterMetadata,
}

/// Registry for all available filter types, in registration order.
pub struct FilterRegistry {
    /// Filters indexed by their unique ID.
    filters: IndexMap<String, RegistryEntry>,
    /// Filter IDs grouped by category.
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter type. Re-registering an ID replaces the previous entry.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn(&FilterSettings) -> Box<dyn ImageFilter> + Send + Sync + 'static,
    {
        // Create a temporary instance to get metadata
        let instance = factory(&FilterSettings::default());
        let metadata = instance.metadata();
        let id = metadata.id.clone();
        let category = metadata.category;

        if let Some(previous) = self.filters.get(&id) {
            let previous_category = previous.metadata.category;
            if let Some(ids) = self.categories.get_mut(&previous_category) {
                ids.retain(|i| i != &id);
            }
        }

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
        };

        self.filters.insert(id.clone(), entry);

        self.categories
            .entry(category)
            .or_insert_with(Vec::new)
            .push(id);
    }

    /// Create a new instance of a filter by ID.
    pub fn create(&self, id: &str, settings: &FilterSettings) -> Option<Box<dyn ImageFilter>> {
        self.filters.get(id).map(|e| (e.factory)(settings))
    }

    /// Get metadata for a filter without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&FilterMetadata> {
        self.filters.get(id).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Get all registered filter IDs.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Get metadata for every registered filter.
    pub fn list(&self) -> Vec<&FilterMetadata> {
        self.filters.values().map(|e| &e.metadata).collect()
    }

    /// Get filters by category.
    pub fn filters_by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get filters grouped by category, each group sorted by name.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for entry in self.filters.values() {
            grouped
                .entry(entry.metadata.category)
                .or_insert_with(Vec::new)
                .push(&entry.metadata);
        }

        for filters in grouped.values_mut() {
            filters.sort_by(|a, b| a.name.cmp(&b.name));
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
