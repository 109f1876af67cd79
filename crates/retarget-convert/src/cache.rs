//! Resolved member maps and their cache
//!
//! Resolving a correspondence touches every member of the source type, so
//! the result for a `(source, target)` pair is computed once and shared.

use crate::MemberCorrespondence;
use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;
use retarget_types::{MemberInfo, TypeDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// Source members of one type resolved against a target type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMap {
    source_type: String,
    target_type: String,
    /// Source member name to target member, for resolved members only
    entries: IndexMap<String, MemberInfo>,
}

impl MemberMap {
    /// Resolve every member of `source` against `target`
    pub fn build(
        correspondence: &dyn MemberCorrespondence,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Self {
        let entries: IndexMap<String, MemberInfo> = source
            .members()
            .filter_map(|member| {
                correspondence
                    .resolve(source, member, target)
                    .map(|resolved| (member.name.clone(), resolved.clone()))
            })
            .collect();
        debug!(
            "resolved {} of {} members of {} against {}",
            entries.len(),
            source.members.len(),
            source.name,
            target.name
        );
        Self {
            source_type: source.name.clone(),
            target_type: target.name.clone(),
            entries,
        }
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    /// Target member standing in for `source_member`
    pub fn get(&self, source_member: &str) -> Option<&MemberInfo> {
        self.entries.get(source_member)
    }

    /// Resolved pairs in source declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemberInfo)> {
        self.entries.iter().map(|(name, member)| (name.as_str(), member))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Concurrent cache of member maps keyed by `(source, target)` type names
///
/// Two threads missing the same key may both build the map; the first
/// insert wins and both observe the same shared value afterwards.
#[derive(Debug, Default)]
pub struct MemberMapCache {
    maps: RwLock<HashMap<(String, String), Arc<MemberMap>>>,
}

impl MemberMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached map for a pair, if present
    pub fn get(&self, source: &str, target: &str) -> Option<Arc<MemberMap>> {
        self.maps
            .read()
            .get(&(source.to_string(), target.to_string()))
            .cloned()
    }

    /// Cached map for a pair, building it with `build` on a miss
    pub fn get_or_insert_with(
        &self,
        source: &str,
        target: &str,
        build: impl FnOnce() -> MemberMap,
    ) -> Arc<MemberMap> {
        if let Some(map) = self.get(source, target) {
            return map;
        }
        let built = Arc::new(build());
        let mut maps = self.maps.write();
        Arc::clone(
            maps.entry((source.to_string(), target.to_string()))
                .or_insert(built),
        )
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.maps
            .read()
            .contains_key(&(source.to_string(), target.to_string()))
    }

    /// Number of cached pairs
    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }

    /// Drop every cached map
    pub fn clear(&self) {
        self.maps.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByName, ExplicitMapping};
    use pretty_assertions::assert_eq;
    use retarget_types::DataType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn source() -> TypeDescriptor {
        TypeDescriptor::new("Model")
            .property("Value", DataType::String)
            .property("Hidden", DataType::Boolean)
    }

    fn target() -> TypeDescriptor {
        TypeDescriptor::new("Data").property("Value", DataType::String)
    }

    #[test]
    fn test_build_skips_unresolved_members() {
        let map = MemberMap::build(&ByName, &source(), &target());

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Value").map(|m| m.name.as_str()), Some("Value"));
        assert!(map.get("Hidden").is_none());
        assert_eq!(map.source_type(), "Model");
        assert_eq!(map.target_type(), "Data");
    }

    #[test]
    fn test_build_with_explicit_mapping() {
        let map = MemberMap::build(&ExplicitMapping::new().map("Hidden", "Value"), &source(), &target());

        let pairs: Vec<_> = map.iter().map(|(from, to)| (from, to.name.as_str())).collect();
        assert_eq!(pairs, vec![("Value", "Value"), ("Hidden", "Value")]);
    }

    #[test]
    fn test_cache_builds_once() {
        let cache = MemberMapCache::new();
        let builds = AtomicUsize::new(0);
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            MemberMap::build(&ByName, &source(), &target())
        };

        let first = cache.get_or_insert_with("Model", "Data", build);
        let second = cache.get_or_insert_with("Model", "Data", build);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(cache.contains("Model", "Data"));
        assert!(!cache.contains("Data", "Model"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_population_converges() {
        let cache = Arc::new(MemberMapCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache.get_or_insert_with("Model", "Data", || {
                        MemberMap::build(&ByName, &source(), &target())
                    })
                })
            })
            .collect();
        let maps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(cache.len(), 1);
        let cached = cache.get("Model", "Data").unwrap();
        assert!(maps.iter().all(|map| Arc::ptr_eq(map, &cached)));
    }
}
