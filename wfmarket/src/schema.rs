use serde::Deserialize;

/// Every response body is wrapped in `{"payload": ...}`.
#[derive(Deserialize, Debug)]
pub(crate) struct Payload<T> {
    pub payload: T,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ProfileOrders {
    pub sell_orders: Vec<ProfileOrder>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ProfileOrder {
    pub id: String,
    pub quantity: i64,
    pub platinum: f64,
    pub item: OrderItem,
}

#[derive(Deserialize, Debug)]
pub(crate) struct OrderItem {
    pub id: String,
    pub url_name: String,
    pub ducats: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ItemOrders {
    pub orders: Vec<ItemOrder>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct OrderEnvelope<T> {
    pub order: T,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DeletedOrder {
    pub order_id: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ItemEnvelope {
    pub item: ItemKey,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ItemKey {
    pub id: String,
}

/// A sell order currently live under our own profile.
#[derive(Clone, Debug, PartialEq)]
pub struct ExistingListing {
    pub listing_id: String,
    pub quantity: i64,
    pub price: i64,
    /// Url name, e.g. `mirage_prime_systems`.
    pub item_identifier: String,
    /// Internal marketplace id of the item.
    pub item_market_key: String,
    /// Only prime parts carry a ducat value.
    pub ducat_value: Option<i64>,
}

impl From<ProfileOrder> for ExistingListing {
    fn from(order: ProfileOrder) -> Self {
        Self {
            listing_id: order.id,
            quantity: order.quantity,
            price: order.platinum as i64,
            item_identifier: order.item.url_name,
            item_market_key: order.item.id,
            ducat_value: order.item.ducats,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Buy,
    Sell,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Ingame,
    Online,
    Offline,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OrderUser {
    pub ingame_name: String,
    pub status: UserStatus,
}

/// One entry of an item's public order book.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ItemOrder {
    pub order_type: OrderType,
    pub platinum: f64,
    pub user: OrderUser,
}

impl ItemOrder {
    /// Platinum truncated to a whole number.
    pub fn price(&self) -> i64 {
        self.platinum as i64
    }
}

/// A sell order about to be placed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListingRequest {
    pub item_market_key: String,
    pub price: i64,
    pub quantity: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreatedOrder {
    pub id: String,
    pub creation_date: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UpdatedOrder {
    pub id: String,
    pub last_update: String,
}
