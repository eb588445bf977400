use crate::market::Marketplace;
use crate::Result;
use wfmarket::{ItemOrder, OrderType, UserStatus};

/// How many of the cheapest competing prices a quote keeps.
pub const QUOTE_DEPTH: usize = 5;

/// The cheapest competing sell prices for one item, ascending.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketQuote {
    pub item: String,
    pub prices: Vec<i64>,
}

impl MarketQuote {
    /// Keeps sell orders from sellers who are in game and are not `profile`.
    pub fn from_orders(
        item: &str,
        orders: impl IntoIterator<Item = ItemOrder>,
        profile: &str,
    ) -> Self {
        let mut prices: Vec<i64> = orders
            .into_iter()
            .filter(|order| order.order_type == OrderType::Sell)
            .filter(|order| order.user.status == UserStatus::Ingame)
            .filter(|order| order.user.ingame_name != profile)
            .map(|order| order.price())
            .collect();

        prices.sort_unstable();
        prices.truncate(QUOTE_DEPTH);

        Self {
            item: item.to_string(),
            prices,
        }
    }

    pub fn lowest(&self) -> Option<i64> {
        self.prices.first().copied()
    }
}

pub struct PriceOracle<'a, M> {
    market: &'a M,
    profile: &'a str,
}

impl<'a, M: Marketplace> PriceOracle<'a, M> {
    pub fn new(market: &'a M, profile: &'a str) -> Self {
        Self { market, profile }
    }

    /// One order-book request per call; the client spaces requests out.
    pub async fn quote(&self, item: &str) -> Result<MarketQuote> {
        let orders = self.market.item_orders(item).await?;
        Ok(MarketQuote::from_orders(item, orders, self.profile))
    }
}
