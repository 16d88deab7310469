//! Merchant Store capability.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Merchant identity sent with every invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl ValueObject for StoreInfo {}

impl StoreInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    pub fn with_postal_address(mut self, address: impl Into<String>) -> Self {
        self.postal_address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn with_website_url(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }
}

/// Read-only provider of the merchant profile.
///
/// Invoices share a store and never mutate it.
pub trait Store: Send + Sync {
    fn info(&self) -> StoreInfo;
}

/// Store backed by a fixed profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticStore {
    info: StoreInfo,
}

impl StaticStore {
    pub fn new(info: StoreInfo) -> Self {
        Self { info }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(StoreInfo::new(name))
    }
}

impl Store for StaticStore {
    fn info(&self) -> StoreInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_profile_fields_are_omitted() {
        let info = StoreInfo::new("FooBar Shop").with_phone("030 000 0000");
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({"name": "FooBar Shop", "phone": "030 000 0000"})
        );
    }

    #[test]
    fn static_store_returns_its_profile() {
        let store = StaticStore::named("FooBar Shop");
        assert_eq!(store.info().name, "FooBar Shop");
        assert_eq!(store.info(), store.info());
    }
}
