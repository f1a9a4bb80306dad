use crate::api::{Id, Offer};
use crate::fetch::{self, Source};
use crate::fixtures;
use crate::rest::RestClient;

pub const LOAD_FAILED: &str = "Failed to load offers";
pub const CLAIM_FAILED: &str = "Failed to claim offer";

/// Offers a charity can claim
#[derive(Debug, Clone, PartialEq)]
pub struct OffersView {
    pub offers: Vec<Offer>,
    pub source: Source,
    pub error: String,
    pub is_loading: bool,
}

impl Default for OffersView {
    fn default() -> Self {
        OffersView {
            offers: Vec::new(),
            source: Source::Live,
            error: String::new(),
            is_loading: false,
        }
    }
}

impl OffersView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, client: &RestClient) {
        self.is_loading = true;
        self.error.clear();
        match fetch::resolve(
            client.policy(),
            "available offers",
            client.offers(),
            fixtures::available_offers,
        ) {
            Ok(fetched) => {
                self.source = fetched.source;
                self.offers = fetched.data;
            }
            Err(_) => self.error = LOAD_FAILED.to_string(),
        }
        self.is_loading = false;
    }

    /// Claim an offer. Once the API accepted, nobody else can take it, so it leaves the list.
    pub fn claim(&mut self, client: &RestClient, id: Id) -> bool {
        self.error.clear();
        match client.claim_offer(id) {
            Ok(()) => {
                tracing::info!(id, "offer claimed");
                self.offers.retain(|offer| offer.id != id);
                true
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "claim failed");
                self.error = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| CLAIM_FAILED.to_string());
                false
            }
        }
    }
}
