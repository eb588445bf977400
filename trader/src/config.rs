use crate::error::Error;
use crate::pricing::{DucatFallback, PricingPolicy};
use crate::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use wfmarket::Credentials;

/// The marketplace refuses more than this many concurrent orders per account.
pub const MAX_LISTINGS: usize = 100;

const DEFAULT_MIN_PRICE: i64 = 10;
const DEFAULT_TOP_N: usize = 20;
const DEFAULT_DELAY_MS: u64 = 400;
const DEFAULT_SCHEDULE: &str = "every 30 minutes";

/// Everything the trader needs, read once at start-up and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub email: String,
    pub password: String,
    /// Our in-game name on the marketplace; its orders are never undercut.
    pub profile: String,
    pub base_url: String,
    pub request_delay: Duration,
    /// Nothing is listed below this many platinum.
    pub min_price: i64,
    pub top_n: usize,
    pub policy: PricingPolicy,
    pub ducat_fallback: Option<DucatFallback>,
    pub inventory_sheet: PathBuf,
    pub item_sheet: PathBuf,
    pub mods_sheet: PathBuf,
    pub item_keys: PathBuf,
    pub database_url: String,
    pub update_schedule: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{key} not found in environment")))
        };
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let top_n = parse(&lookup, "WFM_TOP_N", DEFAULT_TOP_N)?;
        if top_n == 0 {
            return Err(Error::Config("WFM_TOP_N must be at least 1".into()));
        }
        if top_n > MAX_LISTINGS {
            log::warn!("WFM_TOP_N={top_n} exceeds the listing cap, using {MAX_LISTINGS}");
        }

        let ducat_fallback = match (lookup("WFM_DUCAT_RATIO"), lookup("WFM_DUCAT_PRICE")) {
            (None, None) => None,
            (Some(_), Some(_)) => Some(DucatFallback {
                min_ratio: parse(&lookup, "WFM_DUCAT_RATIO", 0.0)?,
                price: parse(&lookup, "WFM_DUCAT_PRICE", 0)?,
            }),
            _ => {
                return Err(Error::Config(
                    "WFM_DUCAT_RATIO and WFM_DUCAT_PRICE must be set together".into(),
                ))
            }
        };

        Ok(Self {
            email: required("WFM_EMAIL")?,
            password: required("WFM_PASSWORD")?,
            profile: required("WFM_PROFILE")?,
            base_url: text("WFM_BASE_URL", wfmarket::BASE_URL),
            request_delay: Duration::from_millis(parse(
                &lookup,
                "WFM_REQUEST_DELAY_MS",
                DEFAULT_DELAY_MS,
            )?),
            min_price: parse(&lookup, "WFM_MIN_PRICE", DEFAULT_MIN_PRICE)?,
            top_n: top_n.min(MAX_LISTINGS),
            policy: parse(&lookup, "WFM_PRICING_POLICY", PricingPolicy::default())?,
            ducat_fallback,
            inventory_sheet: text("INVENTORY_SHEET", "database/prime.csv").into(),
            item_sheet: text("ITEM_SHEET", "database/items.csv").into(),
            mods_sheet: text("MODS_SHEET", "database/mods.csv").into(),
            item_keys: text("ITEM_KEYS", "database/prime_items.db").into(),
            database_url: text("DATABASE_URL", "sqlite://warframe.db"),
            update_schedule: text("WFM_UPDATE_SCHEDULE", DEFAULT_SCHEDULE),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.email, &self.password)
    }
}

fn parse<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {value:?}"))),
        None => Ok(default),
    }
}
