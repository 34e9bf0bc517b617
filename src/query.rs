//! Server-State Invalidation
//!
//! Each cached query is named by a `QueryKey`. A successful mutation
//! invalidates the keys it touched; readers track the key version and
//! refetch when it moves.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Categories,
    Products,
    Product(u32),
}

/// Receiver of "this data is stale" notifications
pub trait Invalidate {
    fn invalidate(&self, key: QueryKey);
}

/// Version counters per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryVersions {
    versions: HashMap<QueryKey, u32>,
}

impl QueryVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self, key: QueryKey) {
        *self.versions.entry(key).or_insert(0) += 1;
    }

    /// Current version of `key`. A single product also moves whenever
    /// the whole product collection is invalidated.
    pub fn version(&self, key: QueryKey) -> u32 {
        let own = self.versions.get(&key).copied().unwrap_or(0);
        match key {
            QueryKey::Product(_) => own + self.versions.get(&QueryKey::Products).copied().unwrap_or(0),
            QueryKey::Categories | QueryKey::Products => own,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_moves_only_its_key() {
        let mut versions = QueryVersions::new();
        versions.bump(QueryKey::Categories);
        versions.bump(QueryKey::Categories);

        assert_eq!(versions.version(QueryKey::Categories), 2);
        assert_eq!(versions.version(QueryKey::Products), 0);
        assert_eq!(versions.version(QueryKey::Product(1)), 0);
    }

    #[test]
    fn test_products_invalidates_every_product() {
        let mut versions = QueryVersions::new();
        versions.bump(QueryKey::Product(4));
        let before = versions.version(QueryKey::Product(9));

        versions.bump(QueryKey::Products);

        assert_eq!(versions.version(QueryKey::Product(9)), before + 1);
        assert_eq!(versions.version(QueryKey::Product(4)), 2);
        assert_eq!(versions.version(QueryKey::Categories), 0);
    }
}
