use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::rate_limiter::RateLimiter;
use crate::schema::{
    CreatedOrder, DeletedOrder, ExistingListing, ItemEnvelope, ItemOrder, ItemOrders,
    NewListingRequest, OrderEnvelope, Payload, ProfileOrders, UpdatedOrder,
};
use crate::session::{sign_in_headers, standard_headers, AuthSession, Credentials};
use crate::Result;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "https://api.warframe.market/v1";
/// Pause between requests that keeps us under the marketplace's abuse threshold.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    base_url: Url,
    rate_limiter: Arc<RateLimiter>,
}

impl Client {
    pub fn new(base_url: &str, delay: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            rate_limiter: Arc::new(RateLimiter::new(delay)),
        })
    }

    fn url(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.segments());
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &Endpoint,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> Result<Response> {
        self.rate_limiter.wait().await;

        let url = self.url(endpoint);
        log::debug!("{method} {}", url.path());

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Error::Auth(format!("{endpoint} returned {status}: {text}"))
            }
            StatusCode::NOT_FOUND => Error::NotFound(endpoint.path()),
            _ => Error::Response(status, text),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: Endpoint,
        session: Option<&AuthSession>,
        body: Option<Value>,
    ) -> Result<T> {
        let headers = match session {
            Some(session) => session.headers()?,
            None => standard_headers(),
        };

        let response = self.send(method, &endpoint, headers, body).await?;
        let text = response.text().await?;
        serde_json::from_str::<Payload<T>>(&text)
            .map(|body| body.payload)
            .map_err(|_| Error::Deserialize(text))
    }

    /// Signs in and returns the session token handed back in the `Authorization` header.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession> {
        let response = self
            .send(
                Method::POST,
                &Endpoint::SignIn,
                sign_in_headers(),
                Some(json!(credentials)),
            )
            .await
            .map_err(|e| match e {
                Error::Response(status, text) => {
                    Error::Auth(format!("signin rejected with {status}: {text}"))
                }
                e => e,
            })?;

        let token = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| Error::Auth("signin response carried no token".into()))?;

        log::info!("Signed in as {}", credentials.email);
        Ok(AuthSession::new(token))
    }

    /// Sell orders currently listed under `profile`.
    pub async fn fetch_profile_orders(&self, profile: &str) -> Result<Vec<ExistingListing>> {
        let orders: ProfileOrders = self
            .request(
                Method::GET,
                Endpoint::ProfileOrders(profile.into()),
                None,
                None,
            )
            .await?;

        Ok(orders.sell_orders.into_iter().map(Into::into).collect())
    }

    /// The full public order book of an item.
    pub async fn fetch_item_orders(&self, item: &str) -> Result<Vec<ItemOrder>> {
        let orders: ItemOrders = self
            .request(Method::GET, Endpoint::ItemOrders(item.into()), None, None)
            .await?;

        Ok(orders.orders)
    }

    pub async fn create_order(
        &self,
        session: &AuthSession,
        order: &NewListingRequest,
    ) -> Result<CreatedOrder> {
        let created: OrderEnvelope<CreatedOrder> = self
            .request(
                Method::POST,
                Endpoint::CreateOrder,
                Some(session),
                Some(json!({
                    "item_id": order.item_market_key,
                    "order_type": "sell",
                    "platinum": order.price,
                    "quantity": order.quantity,
                })),
            )
            .await?;

        Ok(created.order)
    }

    pub async fn update_order(
        &self,
        session: &AuthSession,
        order_id: &str,
        price: i64,
    ) -> Result<UpdatedOrder> {
        let updated: OrderEnvelope<UpdatedOrder> = self
            .request(
                Method::PUT,
                Endpoint::Order(order_id.into()),
                Some(session),
                Some(json!({ "platinum": price })),
            )
            .await?;

        Ok(updated.order)
    }

    /// Returns the id of the deleted order.
    pub async fn delete_order(&self, session: &AuthSession, order_id: &str) -> Result<String> {
        let deleted: DeletedOrder = self
            .request(
                Method::DELETE,
                Endpoint::Order(order_id.into()),
                Some(session),
                None,
            )
            .await?;

        Ok(deleted.order_id)
    }

    /// Resolves a url name (e.g. `hikou_prime_blueprint`) to the marketplace's item id.
    pub async fn fetch_item_key(&self, item: &str) -> Result<String> {
        let item: ItemEnvelope = self
            .request(Method::GET, Endpoint::Item(item.into()), None, None)
            .await?;

        Ok(item.item.id)
    }
}
