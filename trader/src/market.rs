use crate::Result;
use async_trait::async_trait;
use wfmarket::{AuthSession, Client, Credentials, ExistingListing, ItemOrder, NewListingRequest};

/// The marketplace calls the workflows depend on.
#[async_trait]
pub trait Marketplace: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession>;

    /// Sell orders currently listed by `profile`.
    async fn listings(&self, profile: &str) -> Result<Vec<ExistingListing>>;

    async fn item_orders(&self, item: &str) -> Result<Vec<ItemOrder>>;

    async fn create_listing(&self, session: &AuthSession, listing: &NewListingRequest)
        -> Result<()>;

    async fn update_listing(&self, session: &AuthSession, listing_id: &str, price: i64)
        -> Result<()>;

    async fn delete_listing(&self, session: &AuthSession, listing_id: &str) -> Result<()>;

    async fn item_key(&self, item: &str) -> Result<String>;
}

#[async_trait]
impl Marketplace for Client {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession> {
        Ok(Client::sign_in(self, credentials).await?)
    }

    async fn listings(&self, profile: &str) -> Result<Vec<ExistingListing>> {
        Ok(self.fetch_profile_orders(profile).await?)
    }

    async fn item_orders(&self, item: &str) -> Result<Vec<ItemOrder>> {
        Ok(self.fetch_item_orders(item).await?)
    }

    async fn create_listing(
        &self,
        session: &AuthSession,
        listing: &NewListingRequest,
    ) -> Result<()> {
        let created = self.create_order(session, listing).await?;
        log::info!("Created order {} at {}", created.id, created.creation_date);
        Ok(())
    }

    async fn update_listing(
        &self,
        session: &AuthSession,
        listing_id: &str,
        price: i64,
    ) -> Result<()> {
        let updated = self.update_order(session, listing_id, price).await?;
        log::info!("Updated order {} at {}", updated.id, updated.last_update);
        Ok(())
    }

    async fn delete_listing(&self, session: &AuthSession, listing_id: &str) -> Result<()> {
        let deleted = self.delete_order(session, listing_id).await?;
        log::info!("Deleted order {deleted}");
        Ok(())
    }

    async fn item_key(&self, item: &str) -> Result<String> {
        Ok(self.fetch_item_key(item).await?)
    }
}
