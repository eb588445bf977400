use crate::config::Config;
use crate::db::Database;
use crate::error::Error;
use crate::inventory::InventoryEntry;
use crate::lookup::ItemKeyTable;
use crate::market::Marketplace;
use crate::oracle::{MarketQuote, PriceOracle};
use crate::Result;
use std::fmt;
use wfmarket::{AuthSession, NewListingRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Delete,
    Quote,
    Price,
    Resolve,
    Create,
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Delete => "delete",
            Stage::Quote => "quote",
            Stage::Price => "price",
            Stage::Resolve => "resolve",
            Stage::Create => "create",
            Stage::Update => "update",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct Failure {
    pub item: String,
    pub stage: Stage,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub deleted: usize,
    pub created: usize,
    pub failures: Vec<Failure>,
}

impl ReconcileReport {
    pub fn log_summary(&self) {
        log::info!(
            "Deleted {} orders, created {} orders, {} failures",
            self.deleted,
            self.created,
            self.failures.len()
        );
        log_failures(&self.failures);
    }
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub checked: usize,
    pub updated: usize,
    pub failures: Vec<Failure>,
}

impl UpdateReport {
    pub fn log_summary(&self) {
        log::info!(
            "Checked {} orders, repriced {}, {} failures",
            self.checked,
            self.updated,
            self.failures.len()
        );
        log_failures(&self.failures);
    }
}

/// Lowest competing price for each wanted part; `None` when nobody is selling.
#[derive(Debug, Default)]
pub struct ShoppingList {
    pub prices: Vec<(String, Option<i64>)>,
    pub failures: Vec<Failure>,
}

impl ShoppingList {
    pub fn log_summary(&self) {
        log::info!(
            "Priced {} missing parts, {} failures",
            self.prices.len(),
            self.failures.len()
        );
        log_failures(&self.failures);
    }
}

fn log_failures(failures: &[Failure]) {
    for failure in failures {
        log::error!("{} failed for {}: {}", failure.stage, failure.item, failure.error);
    }
}

/// Auth failures propagate; anything else is recorded against the item and skipped.
fn settle<T>(
    failures: &mut Vec<Failure>,
    item: &str,
    stage: Stage,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_auth() => Err(error),
        Err(error) => {
            log::warn!("Could not {stage} {item}: {error}");
            failures.push(Failure {
                item: item.to_string(),
                stage,
                error,
            });
            Ok(None)
        }
    }
}

fn log_check(item: &str, current: Option<i64>, quote: &MarketQuote, target: i64) {
    let current = current.map_or_else(|| "-".to_string(), |p| p.to_string());
    let lowest = quote.lowest().map_or_else(|| "-".to_string(), |p| p.to_string());
    log::info!("[CHECK] ITEM: {item}, PRICE: {current}, LOWEST: {lowest}, TARGET: {target}");
}

#[derive(Debug)]
struct Deal {
    item: String,
    price: i64,
    quantity: i64,
}

pub struct Trader<M> {
    market: M,
    config: Config,
    keys: ItemKeyTable,
    db: Option<Database>,
}

impl<M: Marketplace> Trader<M> {
    pub fn new(market: M, config: Config, keys: ItemKeyTable, db: Option<Database>) -> Self {
        Self {
            market,
            config,
            keys,
            db,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn sign_in(&self) -> Result<AuthSession> {
        self.market.sign_in(&self.config.credentials()).await
    }

    /// Signs in once and reconciles our listings against `inventory`.
    pub async fn create_listings(
        &self,
        inventory: &[InventoryEntry],
        top_n: usize,
    ) -> Result<ReconcileReport> {
        let session = self.sign_in().await?;
        self.reconcile(&session, &self.config.profile, inventory, top_n)
            .await
    }

    /// Deletes every listing `seller` has, then lists the `top_n` most valuable items of
    /// `inventory`. Not transactional: a failure part way leaves what was already done.
    pub async fn reconcile(
        &self,
        session: &AuthSession,
        seller: &str,
        inventory: &[InventoryEntry],
        top_n: usize,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for listing in self.market.listings(seller).await? {
            let result = self.market.delete_listing(session, &listing.listing_id).await;
            if settle(
                &mut report.failures,
                &listing.item_identifier,
                Stage::Delete,
                result,
            )?
            .is_some()
            {
                report.deleted += 1;
            }
        }

        let oracle = PriceOracle::new(&self.market, seller);
        let mut deals = Vec::new();
        for entry in inventory {
            if entry.quantity <= 0 {
                log::debug!("Skipping {} with no stock", entry.item_identifier);
                continue;
            }
            let item = &entry.item_identifier;
            if let Some((quote, price)) = self.target_price(&oracle, item, &mut report.failures).await? {
                log_check(item, None, &quote, price);
                deals.push(Deal {
                    item: item.clone(),
                    price,
                    quantity: entry.quantity,
                });
            }
        }

        // stable, so equal prices keep inventory order
        deals.sort_by(|a, b| b.price.cmp(&a.price));
        deals.truncate(top_n);

        for deal in deals {
            let key = self.resolve_key(&deal.item).await;
            let Some(item_market_key) =
                settle(&mut report.failures, &deal.item, Stage::Resolve, key)?
            else {
                continue;
            };

            let request = NewListingRequest {
                item_market_key,
                price: deal.price,
                quantity: deal.quantity,
            };
            log::info!("Listing {} x{} for {}", deal.item, deal.quantity, deal.price);
            let result = self.market.create_listing(session, &request).await;
            if settle(&mut report.failures, &deal.item, Stage::Create, result)?.is_some() {
                report.created += 1;
            }
        }

        Ok(report)
    }

    /// Reprices every listing we have up against the current competition.
    pub async fn update_listings(&self, session: &AuthSession) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();
        let oracle = PriceOracle::new(&self.market, &self.config.profile);

        for listing in self.market.listings(&self.config.profile).await? {
            report.checked += 1;
            let item = &listing.item_identifier;
            let Some((quote, price)) = self.target_price(&oracle, item, &mut report.failures).await?
            else {
                continue;
            };

            let target = match self.config.ducat_fallback {
                Some(fallback) => fallback.apply(price, listing.ducat_value),
                None => price,
            };
            log_check(item, Some(listing.price), &quote, target);

            if target == listing.price {
                continue;
            }

            let result = self
                .market
                .update_listing(session, &listing.listing_id, target)
                .await;
            if settle(&mut report.failures, item, Stage::Update, result)?.is_some() {
                report.updated += 1;
            }
        }

        Ok(report)
    }

    pub async fn price_missing(&self, items: &[String]) -> Result<ShoppingList> {
        let mut list = ShoppingList::default();
        let oracle = PriceOracle::new(&self.market, &self.config.profile);

        for item in items {
            let quote = oracle.quote(item).await;
            if let Some(quote) = settle(&mut list.failures, item, Stage::Quote, quote)? {
                list.prices.push((item.clone(), quote.lowest()));
            }
        }

        Ok(list)
    }

    async fn target_price(
        &self,
        oracle: &PriceOracle<'_, M>,
        item: &str,
        failures: &mut Vec<Failure>,
    ) -> Result<Option<(MarketQuote, i64)>> {
        let Some(quote) = settle(failures, item, Stage::Quote, oracle.quote(item).await)? else {
            return Ok(None);
        };
        let price = self.config.policy.price(&quote, self.config.min_price);
        Ok(settle(failures, item, Stage::Price, price)?.map(|price| (quote, price)))
    }

    /// Local key table first, then the local store, then the marketplace itself.
    async fn resolve_key(&self, item: &str) -> Result<String> {
        if let Some(key) = self.keys.get(item) {
            return Ok(key.to_string());
        }
        if let Some(db) = &self.db {
            if let Some(key) = db.item_key(item).await? {
                return Ok(key);
            }
        }

        let key = self.market.item_key(item).await.map_err(|e| match e {
            Error::Market(wfmarket::Error::NotFound(_)) => Error::NotFound(item.to_string()),
            e => e,
        })?;

        if let Some(db) = &self.db {
            if let Err(e) = db.set_item_key(item, &key).await {
                log::warn!("Failed to store item key for {item}: {e}");
            }
        }
        Ok(key)
    }
}
