//! Layout mode derived from the request path.
//!
//! The admin, farmer, and customer areas render different chrome. Rather
//! than repeated path-prefix tests scattered across handlers, the mode is
//! derived once per request and carried in the view payload.

use serde::Serialize;

/// Which chrome a page renders under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Public storefront chrome.
    Public,
    /// Admin dashboard chrome.
    Admin,
    /// Farmer dashboard chrome.
    Farmer,
    /// Customer dashboard chrome.
    Customer,
}

impl LayoutMode {
    /// Derive the layout mode from a request path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if path == "/admin" || path.starts_with("/admin/") {
            Self::Admin
        } else if path == "/farmer" || path.starts_with("/farmer/") {
            Self::Farmer
        } else if path == "/customer" || path.starts_with("/customer/") {
            Self::Customer
        } else {
            Self::Public
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_prefixes() {
        assert_eq!(LayoutMode::from_path("/admin"), LayoutMode::Admin);
        assert_eq!(LayoutMode::from_path("/admin/users"), LayoutMode::Admin);
        assert_eq!(LayoutMode::from_path("/farmer/products"), LayoutMode::Farmer);
        assert_eq!(LayoutMode::from_path("/customer/orders"), LayoutMode::Customer);
    }

    #[test]
    fn test_public_paths() {
        assert_eq!(LayoutMode::from_path("/"), LayoutMode::Public);
        assert_eq!(LayoutMode::from_path("/products/abc"), LayoutMode::Public);
        // Prefix must be a whole path segment
        assert_eq!(LayoutMode::from_path("/administrator"), LayoutMode::Public);
    }
}
