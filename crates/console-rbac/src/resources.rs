//! # Resources
//!
//! Resources are the named, protected areas of the console ("announcements",
//! "payments_verification", ...) that carry per-user CRUD flags. The set of
//! names is administrator-defined, so unlike roles and global permissions it
//! is data rather than an enum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Resource areas seeded on a fresh installation.
pub const DEFAULT_RESOURCES: [&str; 6] = [
    "users_management",
    "product_listings",
    "reports_analytics",
    "payments_verification",
    "announcements",
    "dashboard",
];

/// Normalized resource identifier.
///
/// Names are trimmed and lower-cased on construction, so two spellings of the
/// same area ("Dashboard", " dashboard") compare equal and can never appear
/// twice in a catalog.
///
/// # Example
///
/// ```
/// use console_rbac::resources::ResourceName;
///
/// let a = ResourceName::new("Dashboard").unwrap();
/// let b = ResourceName::new(" dashboard ").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "dashboard");
/// assert!(ResourceName::new("   ").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a resource name, returning `None` for blank input.
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let normalized = name.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Get the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when deserializing a blank resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankResourceName;

impl std::fmt::Display for BlankResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("resource name must not be blank")
    }
}

impl std::error::Error for BlankResourceName {}

impl TryFrom<String> for ResourceName {
    type Error = BlankResourceName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResourceName::new(value).ok_or(BlankResourceName)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

/// Ordered, deduplicated set of resource names known to the system.
///
/// # Example
///
/// ```
/// use console_rbac::resources::ResourceCatalog;
///
/// let mut catalog = ResourceCatalog::with_defaults();
/// assert!(catalog.contains("announcements"));
///
/// // Seeding the same name twice keeps a single entry.
/// assert!(!catalog.insert("Announcements"));
/// assert_eq!(catalog.len(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    names: BTreeSet<ResourceName>,
}

impl ResourceCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding [`DEFAULT_RESOURCES`].
    pub fn with_defaults() -> Self {
        DEFAULT_RESOURCES.iter().copied().collect()
    }

    /// Add a name to the catalog.
    ///
    /// # Returns
    ///
    /// `true` if the name was new, `false` if it was blank or already present
    pub fn insert(&mut self, name: impl AsRef<str>) -> bool {
        match ResourceName::new(name) {
            Some(name) => self.names.insert(name),
            None => false,
        }
    }

    /// Check whether a name (in any spelling) is in the catalog.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        ResourceName::new(name).is_some_and(|name| self.names.contains(&name))
    }

    /// Iterate over the names in order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceName> {
        self.names.iter()
    }

    /// Get the number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ResourceCatalog {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut catalog = ResourceCatalog::new();
        for name in iter {
            catalog.insert(name);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_normalization() {
        let name = ResourceName::new("  Payments_Verification ").unwrap();
        assert_eq!(name.as_str(), "payments_verification");
        assert_eq!(name.to_string(), "payments_verification");
    }

    #[test]
    fn test_blank_resource_name_rejected() {
        assert!(ResourceName::new("").is_none());
        assert!(ResourceName::new("\t").is_none());

        let result: Result<ResourceName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn test_resource_name_deserializes_normalized() {
        let name: ResourceName = serde_json::from_str("\"Dashboard\"").unwrap();
        assert_eq!(name.as_str(), "dashboard");
    }

    #[test]
    fn test_default_catalog() {
        let catalog = ResourceCatalog::with_defaults();
        assert_eq!(catalog.len(), DEFAULT_RESOURCES.len());
        for name in DEFAULT_RESOURCES {
            assert!(catalog.contains(name));
        }
        assert!(!catalog.contains("orders"));
    }

    #[test]
    fn test_catalog_deduplicates() {
        let catalog: ResourceCatalog = ["orders", "Orders", " orders", "refunds", ""]
            .into_iter()
            .collect();

        assert_eq!(catalog.len(), 2);
        let names: Vec<&str> = catalog.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["orders", "refunds"]);
    }

    #[test]
    fn test_catalog_insert_reports_novelty() {
        let mut catalog = ResourceCatalog::new();
        assert!(catalog.insert("orders"));
        assert!(!catalog.insert("ORDERS"));
        assert!(!catalog.insert("   "));
        assert_eq!(catalog.len(), 1);
    }
}
