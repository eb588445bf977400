use strum_macros::Display;

/// Endpoints of the warframe.market API used by the trader.
#[derive(Display, Clone, Debug, PartialEq)]
pub enum Endpoint {
    SignIn,
    ProfileOrders(String),
    ItemOrders(String),
    CreateOrder,
    Order(String),
    Item(String),
}

impl Endpoint {
    /// Path segments below the API root. Each segment is percent-encoded when joined.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::SignIn => vec!["auth", "signin"],
            Endpoint::ProfileOrders(profile) => vec!["profile", profile, "orders"],
            Endpoint::ItemOrders(item) => vec!["items", item, "orders"],
            Endpoint::CreateOrder => vec!["profile", "orders"],
            Endpoint::Order(order_id) => vec!["profile", "orders", order_id],
            Endpoint::Item(item) => vec!["items", item],
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}
