//! Plot cache
//! Session-scoped map from plot name to encoded PNG bytes. Remembers the
//! order names were first stored so the download picker stays stable.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Plot '{name}' not found in this session")]
pub struct PlotNotFoundError {
    pub name: String,
}

#[derive(Debug, Default, Clone)]
pub struct PlotCache {
    plots: HashMap<String, Vec<u8>>,
    order: Vec<String>,
}

impl PlotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes under `name`. Overwriting keeps the original position.
    pub fn put(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        if !self.plots.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.plots.insert(name, bytes);
    }

    pub fn get(&self, name: &str) -> Result<&[u8], PlotNotFoundError> {
        self.plots
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| PlotNotFoundError {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plots.contains_key(name)
    }

    /// Names in first-insertion order.
    pub fn list_names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.plots.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let mut cache = PlotCache::new();
        cache.put("histogram_a", vec![1, 2, 3]);
        assert_eq!(cache.get("histogram_a").unwrap(), &[1, 2, 3]);
        assert!(cache.contains("histogram_a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn missing_name_is_an_error() {
        let cache = PlotCache::new();
        let err = cache.get("boxplot_b").unwrap_err();
        assert_eq!(err.name, "boxplot_b");
        assert_eq!(err.to_string(), "Plot 'boxplot_b' not found in this session");
    }

    #[test]
    fn overwrite_keeps_order_and_replaces_bytes() {
        let mut cache = PlotCache::new();
        cache.put("a", vec![1]);
        cache.put("b", vec![2]);
        cache.put("a", vec![9]);
        assert_eq!(cache.list_names(), ["a", "b"]);
        assert_eq!(cache.get("a").unwrap(), &[9]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = PlotCache::new();
        cache.put("a", vec![1]);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_err());
    }
}
