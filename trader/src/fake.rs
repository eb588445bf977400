//! In-memory marketplace that records every call, for workflow tests.
use crate::market::Marketplace;
use crate::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use wfmarket::{
    AuthSession, Credentials, ExistingListing, ItemOrder, NewListingRequest, OrderType, OrderUser,
    StatusCode, UserStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SignIn,
    Listings(String),
    ItemOrders(String),
    Create(NewListingRequest),
    Update(String, i64),
    Delete(String),
    ItemKey(String),
}

#[derive(Default)]
pub(crate) struct FakeMarket {
    orders: HashMap<String, Vec<ItemOrder>>,
    listings: Vec<ExistingListing>,
    keys: HashMap<String, String>,
    /// Items or listing ids whose calls fail with a server error.
    failing: HashSet<String>,
    /// Listing ids or item keys whose calls fail as if the session expired.
    expired: HashSet<String>,
    rejects_sign_in: bool,
    calls: Mutex<Vec<Call>>,
}

pub(crate) fn order(order_type: OrderType, platinum: i64, seller: &str, status: UserStatus) -> ItemOrder {
    ItemOrder {
        order_type,
        platinum: platinum as f64,
        user: OrderUser {
            ingame_name: seller.into(),
            status,
        },
    }
}

pub(crate) fn sell(platinum: i64) -> ItemOrder {
    order(OrderType::Sell, platinum, "competitor", UserStatus::Ingame)
}

pub(crate) fn listing(id: &str, item: &str, price: i64, ducats: Option<i64>) -> ExistingListing {
    ExistingListing {
        listing_id: id.into(),
        quantity: 1,
        price,
        item_identifier: item.into(),
        item_market_key: format!("key-{item}"),
        ducat_value: ducats,
    }
}

fn server_error(what: &str) -> crate::error::Error {
    wfmarket::Error::Response(StatusCode::INTERNAL_SERVER_ERROR, format!("{what} failed")).into()
}

fn expired_session() -> crate::error::Error {
    wfmarket::Error::Auth("session expired".into()).into()
}

impl FakeMarket {
    pub(crate) fn with_orders(mut self, item: &str, orders: Vec<ItemOrder>) -> Self {
        self.orders.insert(item.into(), orders);
        self
    }

    pub(crate) fn with_listing(mut self, listing: ExistingListing) -> Self {
        self.listings.push(listing);
        self
    }

    pub(crate) fn with_key(mut self, item: &str, key: &str) -> Self {
        self.keys.insert(item.into(), key.into());
        self
    }

    pub(crate) fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.into());
        self
    }

    pub(crate) fn expired_at(mut self, id: &str) -> Self {
        self.expired.insert(id.into());
        self
    }

    pub(crate) fn rejecting_sign_in(mut self) -> Self {
        self.rejects_sign_in = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn created(&self) -> Vec<NewListingRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, id: &str) -> Result<()> {
        if self.expired.contains(id) {
            return Err(expired_session());
        }
        if self.failing.contains(id) {
            return Err(server_error(id));
        }
        Ok(())
    }
}

#[async_trait]
impl Marketplace for FakeMarket {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<AuthSession> {
        self.record(Call::SignIn);
        if self.rejects_sign_in {
            return Err(wfmarket::Error::Auth("signin rejected".into()).into());
        }
        Ok(AuthSession::new("JWT fake"))
    }

    async fn listings(&self, profile: &str) -> Result<Vec<ExistingListing>> {
        self.record(Call::Listings(profile.into()));
        self.check(profile)?;
        Ok(self.listings.clone())
    }

    async fn item_orders(&self, item: &str) -> Result<Vec<ItemOrder>> {
        self.record(Call::ItemOrders(item.into()));
        self.check(item)?;
        Ok(self.orders.get(item).cloned().unwrap_or_default())
    }

    async fn create_listing(
        &self,
        _session: &AuthSession,
        listing: &NewListingRequest,
    ) -> Result<()> {
        self.record(Call::Create(listing.clone()));
        self.check(&listing.item_market_key)
    }

    async fn update_listing(
        &self,
        _session: &AuthSession,
        listing_id: &str,
        price: i64,
    ) -> Result<()> {
        self.record(Call::Update(listing_id.into(), price));
        self.check(listing_id)
    }

    async fn delete_listing(&self, _session: &AuthSession, listing_id: &str) -> Result<()> {
        self.record(Call::Delete(listing_id.into()));
        self.check(listing_id)
    }

    async fn item_key(&self, item: &str) -> Result<String> {
        self.record(Call::ItemKey(item.into()));
        self.keys
            .get(item)
            .cloned()
            .ok_or_else(|| wfmarket::Error::NotFound(format!("/items/{item}")).into())
    }
}
