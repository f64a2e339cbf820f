use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Server-side collections a client view may cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    User,
    Wallets,
    Categories,
    Currencies,
    Transactions,
    Reports,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::User,
        Resource::Wallets,
        Resource::Categories,
        Resource::Currencies,
        Resource::Transactions,
        Resource::Reports,
    ];
}

/// Resources a mutation made stale. Callers re-fetch exactly these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet(BTreeSet<Resource>);

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Resource::ALL.into_iter().collect()
    }

    pub fn with(mut self, resource: Resource) -> Self {
        self.0.insert(resource);
        self
    }

    pub fn insert(&mut self, resource: Resource) -> bool {
        self.0.insert(resource)
    }

    pub fn contains(&self, resource: Resource) -> bool {
        self.0.contains(&resource)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Resource> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Resource> for ResourceSet {
    fn extend<I: IntoIterator<Item = Resource>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
