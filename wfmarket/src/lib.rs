//! Client for the warframe.market v1 REST API.
//!
//! Covers signing in, reading a profile's sell orders, reading the order book of an item,
//! and creating, repricing and deleting the profile's own orders.
mod client;
mod endpoint;
mod error;
mod rate_limiter;
mod schema;
mod session;

pub use client::{Client, BASE_URL, DEFAULT_DELAY};
pub use endpoint::Endpoint;
pub use error::Error;
pub use reqwest::StatusCode;
pub use schema::{
    CreatedOrder, ExistingListing, ItemOrder, NewListingRequest, OrderType, OrderUser,
    UpdatedOrder, UserStatus,
};
pub use session::{AuthSession, Credentials};

pub type Result<T> = std::result::Result<T, Error>;
