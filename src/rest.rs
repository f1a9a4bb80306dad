use crate::api::*;
use crate::errors::{message_from_body, Error, Result};
use crate::fetch::FallbackPolicy;
use crate::http::{Request, Response, Transport};
use crate::routes::{self, paths};
use crate::session;
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Typed access to the REST API.
///
/// Every request carries `Content-Type: application/json`, and
/// `Authorization: Bearer <token>` whenever local storage holds a token. The
/// token is read at request time, like the pages always did.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn Storage>,
    policy: FallbackPolicy,
}

impl RestClient {
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn Storage>) -> Self {
        RestClient {
            transport,
            storage,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    fn send(&self, mut request: Request) -> Result<Response> {
        request = request.with_header("Content-Type", "application/json");
        if let Some(token) = session::token(self.storage.as_ref())? {
            request = request.with_header("Authorization", &format!("Bearer {}", token));
        }

        let response = self.transport.send(&request)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(Error::Http {
                status: response.status.unwrap_or(500),
                message: message_from_body(&response.body),
            })
        }
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        Ok(serde_json::from_str(&response.body)?)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Self::decode(self.send(Request::get(path))?)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        Self::decode(self.send(Request::post(path, serde_json::to_string(body)?))?)
    }

    fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        Self::decode(self.send(Request::put(path, serde_json::to_string(body)?))?)
    }

    /// For writes whose answer we don't look at
    fn send_ignoring_body(&self, request: Request) -> Result<()> {
        self.send(request).map(|_| ())
    }

    pub fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        self.post(paths::AUTH_LOGIN, credentials)
    }

    pub fn signup(&self, form: &SignupRequest) -> Result<AuthResponse> {
        self.post(paths::AUTH_SIGNUP, form)
    }

    pub fn stats(&self, role: UserType) -> Result<DashboardStats> {
        self.get(routes::stats(role))
    }

    /// The logged-in restaurant's listings
    pub fn food_items(&self) -> Result<Vec<Offer>> {
        self.get(paths::FOOD_ITEMS)
    }

    pub fn create_food_item(&self, item: &NewOffer) -> Result<Offer> {
        self.post(paths::FOOD_ITEMS, item)
    }

    pub fn delete_food_item(&self, id: Id) -> Result<()> {
        self.send_ignoring_body(Request::delete(&routes::food_item_by_id(id)))
    }

    /// Offers charities can claim
    pub fn offers(&self) -> Result<Vec<Offer>> {
        self.get(paths::OFFERS)
    }

    pub fn create_offer(&self, offer: &NewOffer) -> Result<Offer> {
        self.post(paths::OFFERS, offer)
    }

    pub fn update_listing(&self, id: Id, update: &ListingUpdate) -> Result<Offer> {
        self.put(&routes::listing_by_id(id), update)
    }

    pub fn delete_listing(&self, id: Id) -> Result<()> {
        self.send_ignoring_body(Request::delete(&routes::listing_by_id(id)))
    }

    pub fn scheduled_pickups(&self, role: UserType) -> Result<Vec<ScheduledPickup>> {
        self.get(routes::scheduled_pickups(role))
    }

    pub fn completed_pickups(&self, role: UserType) -> Result<Vec<CompletedPickup>> {
        self.get(routes::completed_pickups(role))
    }

    /// Drop a scheduled pickup, through whichever endpoint the role uses
    pub fn cancel_pickup(&self, role: UserType, id: Id) -> Result<()> {
        match role {
            UserType::Restaurant => self.delete_food_item(id),
            UserType::Charity => self.cancel_request(id),
        }
    }

    pub fn claim_offer(&self, id: Id) -> Result<()> {
        self.send_ignoring_body(Request::post(&routes::claim_offer(id), String::new()))
    }

    pub fn cancel_request(&self, id: Id) -> Result<()> {
        self.send_ignoring_body(Request::delete(&routes::charity_request_by_id(id)))
    }

    pub fn update_profile(&self, role: UserType, profile: &ProfileUpdate) -> Result<()> {
        self.send_ignoring_body(Request::put(
            routes::profile(role),
            serde_json::to_string(profile)?,
        ))
    }
}
