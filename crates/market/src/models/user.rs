//! User profile domain type.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use farmstand_core::{Email, Role, UserId};

use super::{InvalidDocument, timestamp_field};
use crate::appwrite::Document;

const COLLECTION: &str = "users";

/// A marketplace user profile.
///
/// The profile record is keyed two ways: by its own document id and by the
/// auth-service identity (`user_id`), which is what products and orders
/// reference. Lookup falls back to email when the identity key misses.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// Profile document id.
    pub id: UserId,
    /// Auth-service identity this profile belongs to.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email (also the fallback join key).
    pub email: Email,
    /// Role chosen at registration.
    pub role: Role,
    /// Contact phone.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// National-id number given at registration.
    pub aadhaar: String,
    /// Payment-collection link (farmers only); absent means the seller
    /// cannot take payments yet.
    pub payment_link: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Map a raw document into a profile.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDocument`] when a required field is missing or
    /// malformed.
    pub fn from_document(doc: &Document) -> Result<Self, InvalidDocument> {
        let invalid = |field| InvalidDocument::new(COLLECTION, doc, field);

        let user_id = doc.non_empty_field("userId").ok_or_else(|| invalid("userId"))?;
        let email = doc
            .str_field("email")
            .and_then(|raw| Email::parse(raw).ok())
            .ok_or_else(|| invalid("email"))?;
        let role = doc
            .str_field("registerType")
            .and_then(|raw| Role::from_str(raw).ok())
            .ok_or_else(|| invalid("registerType"))?;

        Ok(Self {
            id: UserId::new(&doc.id),
            user_id: UserId::new(user_id),
            name: doc.str_field("name").unwrap_or_default().to_owned(),
            email,
            role,
            phone: doc.str_field("phone").unwrap_or_default().to_owned(),
            address: doc.str_field("address").unwrap_or_default().to_owned(),
            aadhaar: doc.str_field("adharNumber").unwrap_or_default().to_owned(),
            payment_link: doc.non_empty_field("razorpayLink").map(str::to_owned),
            created_at: timestamp_field(doc, "createdAt", &doc.created_at)
                .ok_or_else(|| invalid("createdAt"))?,
            updated_at: timestamp_field(doc, "updatedAt", &doc.updated_at)
                .ok_or_else(|| invalid("updatedAt"))?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile_json() -> serde_json::Value {
        serde_json::json!({
            "$id": "profile1",
            "$createdAt": "2025-03-01T10:00:00+00:00",
            "$updatedAt": "2025-03-01T10:00:00+00:00",
            "userId": "auth1",
            "name": "Ravi Kumar",
            "email": "ravi@example.com",
            "registerType": "farmer",
            "phone": "9876543210",
            "address": "Village Road, Nashik",
            "adharNumber": "1234-5678-9012",
            "razorpayLink": "https://rzp.io/l/ravi",
            "createdAt": "2025-03-01T10:00:00+00:00",
            "updatedAt": "2025-03-01T10:00:00+00:00",
        })
    }

    #[test]
    fn test_from_document() {
        let doc: Document = serde_json::from_value(profile_json()).unwrap();
        let profile = UserProfile::from_document(&doc).unwrap();

        assert_eq!(profile.id.as_str(), "profile1");
        assert_eq!(profile.user_id.as_str(), "auth1");
        assert_eq!(profile.role, Role::Farmer);
        assert_eq!(profile.payment_link.as_deref(), Some("https://rzp.io/l/ravi"));
    }

    #[test]
    fn test_missing_role_is_rejected() {
        let mut json = profile_json();
        json.as_object_mut().unwrap().remove("registerType");
        let doc: Document = serde_json::from_value(json).unwrap();

        let err = UserProfile::from_document(&doc).unwrap_err();
        assert_eq!(err.field, "registerType");
    }

    #[test]
    fn test_empty_payment_link_is_absent() {
        let mut json = profile_json();
        json["razorpayLink"] = serde_json::json!("");
        let doc: Document = serde_json::from_value(json).unwrap();

        let profile = UserProfile::from_document(&doc).unwrap();
        assert_eq!(profile.payment_link, None);
    }

    #[test]
    fn test_system_timestamp_fallback() {
        let mut json = profile_json();
        json.as_object_mut().unwrap().remove("createdAt");
        let doc: Document = serde_json::from_value(json).unwrap();

        let profile = UserProfile::from_document(&doc).unwrap();
        assert_eq!(profile.created_at.to_rfc3339(), "2025-03-01T10:00:00+00:00");
    }
}
