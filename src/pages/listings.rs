use crate::api::{Id, ListingUpdate, NewOffer, Offer};
use crate::errors::Result;
use crate::fetch::{self, Source};
use crate::fixtures;
use crate::rest::RestClient;

/// Input of the "new listing" form, before it is checked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferForm {
    pub title: String,
    pub description: String,
    /// As typed
    pub quantity: String,
    pub quantity_unit: String,
    pub expiry_date: String,
    pub available_date: String,
    pub available_time: String,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl OfferForm {
    /// Turn the form into a request body, or say what is wrong with it
    pub fn validate(&self) -> std::result::Result<NewOffer, String> {
        let title = non_blank(&self.title).ok_or("Title is required")?;
        let quantity = self
            .quantity
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite() && *q > 0.0)
            .ok_or("Quantity must be a positive number")?;
        let quantity_unit = non_blank(&self.quantity_unit).ok_or("Unit is required")?;

        Ok(NewOffer {
            title,
            description: non_blank(&self.description),
            quantity,
            quantity_unit,
            expiry_date: non_blank(&self.expiry_date),
            available_date: non_blank(&self.available_date),
            available_time: non_blank(&self.available_time),
        })
    }
}

/// A restaurant's own listings
#[derive(Debug, Clone, PartialEq)]
pub struct ListingsView {
    pub items: Vec<Offer>,
    pub source: Source,
    pub error: String,
    pub is_loading: bool,
}

impl Default for ListingsView {
    fn default() -> Self {
        ListingsView {
            items: Vec::new(),
            source: Source::Live,
            error: String::new(),
            is_loading: false,
        }
    }
}

impl ListingsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, client: &RestClient) {
        self.is_loading = true;
        self.error.clear();
        match fetch::resolve(
            client.policy(),
            "food items",
            client.food_items(),
            fixtures::food_items,
        ) {
            Ok(fetched) => {
                self.source = fetched.source;
                self.items = fetched.data;
            }
            Err(_) => self.error = "Failed to load listings".to_string(),
        }
        self.is_loading = false;
    }

    /// Add a food item. The new entry goes on top.
    pub fn create(&mut self, client: &RestClient, form: &OfferForm) -> Option<Id> {
        self.submit(form, "Failed to create listing", |offer| {
            client.create_food_item(offer)
        })
    }

    /// Publish an offer charities can claim. The new entry goes on top.
    pub fn publish(&mut self, client: &RestClient, form: &OfferForm) -> Option<Id> {
        self.submit(form, "Failed to publish offer", |offer| client.create_offer(offer))
    }

    fn submit<F>(&mut self, form: &OfferForm, failure: &str, send: F) -> Option<Id>
    where
        F: FnOnce(&NewOffer) -> Result<Offer>,
    {
        self.error.clear();
        let offer = match form.validate() {
            Ok(offer) => offer,
            Err(message) => {
                self.error = message;
                return None;
            }
        };
        match send(&offer) {
            Ok(created) => {
                let id = created.id;
                self.items.insert(0, created);
                Some(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, title = %offer.title, "listing not saved");
                self.error = failure.to_string();
                None
            }
        }
    }

    /// Change a listing and replace it in place with what the API answered
    pub fn update(&mut self, client: &RestClient, id: Id, update: &ListingUpdate) {
        self.error.clear();
        match client.update_listing(id, update) {
            Ok(updated) => match self.items.iter_mut().find(|item| item.id == id) {
                Some(item) => *item = updated,
                None => self.items.insert(0, updated),
            },
            Err(err) => {
                tracing::warn!(id, error = %err, "listing update failed");
                self.error = "Failed to update listing".to_string();
            }
        }
    }

    pub fn delete(&mut self, client: &RestClient, id: Id) {
        self.error.clear();
        match client.delete_listing(id) {
            Ok(()) => self.items.retain(|item| item.id != id),
            Err(err) => {
                tracing::warn!(id, error = %err, "listing delete failed");
                self.error = "Failed to delete listing".to_string();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::OfferStatus;
    use crate::http::mock::ScriptedTransport;
    use crate::http::Response;
    use crate::storage::mock::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn form(title: &str, quantity: &str, unit: &str) -> OfferForm {
        OfferForm {
            title: title.to_string(),
            quantity: quantity.to_string(),
            quantity_unit: unit.to_string(),
            ..Default::default()
        }
    }

    /// Echo created offers back with a fresh id, accept everything else
    fn echo_client() -> (RestClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(|req| {
            Ok(match req.method.as_str() {
                "POST" | "PUT" => {
                    let mut body: serde_json::Value = serde_json::from_str(&req.body)?;
                    body["id"] = json!(42);
                    if body.get("title").is_none() {
                        body["title"] = json!("Fresh Bread");
                        body["quantity"] = json!(1.0);
                    }
                    Response::json(201, &body)
                }
                "DELETE" => Response::ok(),
                _ => Response::json(200, &json!([])),
            })
        }));
        let client = RestClient::new(transport.clone(), Arc::new(MemoryStorage::new()));
        (client, transport)
    }

    #[test]
    fn test_form_validation() {
        assert_eq!(form("", "2", "kg").validate().unwrap_err(), "Title is required");
        assert_eq!(
            form("Soup", "0", "kg").validate().unwrap_err(),
            "Quantity must be a positive number"
        );
        assert_eq!(
            form("Soup", "lots", "kg").validate().unwrap_err(),
            "Quantity must be a positive number"
        );
        assert_eq!(form("Soup", "2", " ").validate().unwrap_err(), "Unit is required");

        let offer = form(" Soup ", "2.5", "litres").validate().unwrap();
        assert_eq!(offer.title, "Soup");
        assert_eq!(offer.quantity, 2.5);
        assert_eq!(offer.description, None);
    }

    #[test]
    fn test_create_and_publish_prepend() {
        let (client, transport) = echo_client();
        let mut view = ListingsView::new();
        view.items = fixtures::food_items();

        assert_eq!(view.create(&client, &form("Soup", "3", "portions")), Some(42));
        assert_eq!(view.items.len(), 3);
        assert_eq!(view.items[0].title, "Soup");

        assert_eq!(view.publish(&client, &form("Rolls", "1", "kg")), Some(42));
        assert_eq!(view.items[0].title, "Rolls");

        let sent: Vec<_> = transport
            .sent()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect();
        assert_eq!(sent, vec!["POST /restaurants/food-items", "POST /offers"]);
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let (client, transport) = echo_client();
        let mut view = ListingsView::new();
        assert_eq!(view.create(&client, &form("Soup", "-1", "kg")), None);
        assert_eq!(view.error, "Quantity must be a positive number");
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let (client, transport) = echo_client();
        let mut view = ListingsView::new();
        view.items = fixtures::food_items();
        view.items[1].id = 42;

        view.update(
            &client,
            42,
            &ListingUpdate {
                status: Some(OfferStatus::Claimed),
                ..Default::default()
            },
        );
        assert!(view.error.is_empty());
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[1].status, OfferStatus::Claimed);
        assert_eq!(transport.sent()[0].path, "/listings/42");
    }

    #[test]
    fn test_delete() {
        let (client, _) = echo_client();
        let mut view = ListingsView::new();
        view.items = fixtures::food_items();
        view.delete(&client, 1);
        assert_eq!(view.items.iter().map(|o| o.id).collect::<Vec<_>>(), vec![2]);

        let offline = RestClient::new(
            Arc::new(ScriptedTransport::offline()),
            Arc::new(MemoryStorage::new()),
        );
        view.delete(&offline, 2);
        assert_eq!(view.error, "Failed to delete listing");
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn test_load_falls_back() {
        let offline = RestClient::new(
            Arc::new(ScriptedTransport::offline()),
            Arc::new(MemoryStorage::new()),
        );
        let mut view = ListingsView::new();
        view.load(&offline);
        assert_eq!(view.source, Source::Fallback);
        assert_eq!(view.items, fixtures::food_items());
    }
}
