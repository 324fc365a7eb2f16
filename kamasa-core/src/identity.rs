use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use kamasa_shared::ids::CustomerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Customer classification driving the tier discount stage.
///
/// The built-in tiers cover the standard discount table; tiers registered
/// through configuration land in `Other` with their name normalized to
/// lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    Retail,
    Wholesale,
    Distributor,
    #[serde(untagged)]
    Other(String),
}

impl CustomerTier {
    /// Parses a free-form tier identifier; matching is case-insensitive.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "retail" => Self::Retail,
            "wholesale" => Self::Wholesale,
            "distributor" => Self::Distributor,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
            Self::Distributor => "distributor",
            Self::Other(name) => name,
        }
    }
}

impl Default for CustomerTier {
    fn default() -> Self {
        Self::Retail
    }
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// B2B customer as supplied by the external identity directory.
///
/// The pricing core only reads this; tier and authorization assignment are
/// owned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub tier: CustomerTier,
    /// Whether this customer may see B2B prices at all. Customers without
    /// the capability get the hidden-price sentinel everywhere.
    pub b2b_authorized: bool,
}

impl Customer {
    /// A B2B-authorized customer of the given tier.
    pub fn b2b(id: CustomerId, tier: CustomerTier) -> Self {
        Self {
            id,
            tier,
            b2b_authorized: true,
        }
    }

    /// A logged-in customer without B2B access.
    pub fn retail(id: CustomerId) -> Self {
        Self {
            id,
            tier: CustomerTier::Retail,
            b2b_authorized: false,
        }
    }
}

/// Boundary to the external customer/identity provider.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Looks up a customer by id; `None` means unknown to the directory.
    async fn find(&self, customer_id: CustomerId) -> Option<Customer>;

    /// Like [`CustomerDirectory::find`], for callers that treat an unknown
    /// id as an error rather than an anonymous shopper.
    async fn require(&self, customer_id: CustomerId) -> CoreResult<Customer> {
        self.find(customer_id)
            .await
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))
    }
}

/// In-memory directory for tests and local development.
#[derive(Default)]
pub struct InMemoryDirectory {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, customer: Customer) {
        self.customers
            .write()
            .expect("customer directory lock poisoned")
            .insert(customer.id, customer);
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn find(&self, customer_id: CustomerId) -> Option<Customer> {
        let found = self
            .customers
            .read()
            .expect("customer directory lock poisoned")
            .get(&customer_id)
            .cloned();
        if found.is_none() {
            tracing::debug!(%customer_id, "customer not found in directory");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_tier_parse_is_case_insensitive() {
        assert_eq!(CustomerTier::parse("Wholesale"), CustomerTier::Wholesale);
        assert_eq!(CustomerTier::parse("DISTRIBUTOR"), CustomerTier::Distributor);
        assert_eq!(CustomerTier::parse(" retail "), CustomerTier::Retail);
        assert_eq!(
            CustomerTier::parse("Importer"),
            CustomerTier::Other("importer".to_string())
        );
    }

    #[test]
    fn test_tier_display_round_trips() {
        assert_eq!(CustomerTier::Wholesale.to_string(), "wholesale");
        assert_eq!(
            CustomerTier::parse(&CustomerTier::Distributor.to_string()),
            CustomerTier::Distributor
        );
    }

    #[tokio::test]
    async fn test_directory_lookup() {
        let directory = InMemoryDirectory::new();
        let id = Uuid::new_v4();
        directory.insert(Customer::b2b(id, CustomerTier::Wholesale));

        let found = directory.find(id).await.unwrap();
        assert!(found.b2b_authorized);
        assert_eq!(found.tier, CustomerTier::Wholesale);

        assert!(directory.find(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_require_surfaces_unknown_customer() {
        let directory = InMemoryDirectory::new();
        let err = directory.require(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::CustomerNotFound(_)));
    }
}
