use crate::api::{CompletedPickup, Id, ScheduledPickup, UserType};
use crate::errors::{Error, Result};
use crate::fetch::{self, Fetched, Source};
use crate::fixtures;
use crate::rest::RestClient;
use std::thread;

pub const LOAD_FAILED: &str = "Failed to load pickups";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Scheduled,
    Completed,
}

/// Figures shown above the completed tab
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletedSummary {
    pub total: usize,
    pub people_helped: u32,
    /// Sum of the amounts written in kilograms, `None` if there were none
    pub food_kg: Option<f64>,
    /// Mean over the rated pickups only
    pub average_rating: Option<f64>,
}

/// Scheduled and completed pickups of the logged-in account
#[derive(Debug, Clone, PartialEq)]
pub struct PickupsView {
    pub role: UserType,
    pub active_tab: Tab,
    pub scheduled: Vec<ScheduledPickup>,
    pub completed: Vec<CompletedPickup>,
    /// Set when either list is sample data
    pub source: Source,
    pub error: String,
    pub is_loading: bool,
}

impl PickupsView {
    pub fn new(role: UserType) -> Self {
        PickupsView {
            role,
            active_tab: Tab::default(),
            scheduled: Vec::new(),
            completed: Vec::new(),
            source: Source::Live,
            error: String::new(),
            is_loading: false,
        }
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.active_tab = tab;
        self
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Counters shown next to the tab names
    pub fn tab_counts(&self) -> (usize, usize) {
        (self.scheduled.len(), self.completed.len())
    }

    pub fn completed_summary(&self) -> CompletedSummary {
        let amounts: Vec<f64> = self.completed.iter().filter_map(|p| p.food_kg()).collect();
        let ratings: Vec<u8> = self.completed.iter().filter_map(|p| p.rating).collect();
        CompletedSummary {
            total: self.completed.len(),
            people_helped: self.completed.iter().map(|p| p.people_helped).sum(),
            food_kg: (!amounts.is_empty()).then(|| amounts.iter().sum()),
            average_rating: (!ratings.is_empty()).then(|| {
                ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64
            }),
        }
    }

    /// Fetch both lists at once
    pub fn load(&mut self, client: &RestClient) {
        self.is_loading = true;
        match fetch_both(client, self.role) {
            Ok((scheduled, completed)) => {
                self.source = if scheduled.is_fallback() || completed.is_fallback() {
                    Source::Fallback
                } else {
                    Source::Live
                };
                self.scheduled = scheduled.data;
                self.completed = completed.data;
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load pickups");
                self.error = LOAD_FAILED.to_string();
            }
        }
        self.is_loading = false;
    }

    pub fn retry(&mut self, client: &RestClient) {
        self.error.clear();
        self.load(client);
    }

    /// Cancel a scheduled pickup. It only leaves the list once the API agreed.
    pub fn cancel(&mut self, client: &RestClient, id: Id) {
        match client.cancel_pickup(self.role, id) {
            Ok(()) => self.scheduled.retain(|pickup| pickup.id != id),
            Err(err) => {
                tracing::warn!(id, error = %err, "cancelling pickup failed");
                self.error = cancel_failed(self.role).to_string();
            }
        }
    }
}

fn cancel_failed(role: UserType) -> &'static str {
    match role {
        UserType::Restaurant => "Failed to delete pickup",
        UserType::Charity => "Failed to cancel pickup",
    }
}

type BothLists = (Fetched<Vec<ScheduledPickup>>, Fetched<Vec<CompletedPickup>>);

fn fetch_both(client: &RestClient, role: UserType) -> Result<BothLists> {
    let policy = client.policy();
    let (scheduled, completed) = thread::scope(|scope| {
        let scheduled = scope.spawn(|| client.scheduled_pickups(role));
        let completed = scope.spawn(|| client.completed_pickups(role));
        (scheduled.join(), completed.join())
    });
    let scheduled = scheduled.map_err(|_| Error::WorkerPanicked)?;
    let completed = completed.map_err(|_| Error::WorkerPanicked)?;

    Ok((
        fetch::resolve(policy, "scheduled pickups", scheduled, || {
            fixtures::scheduled_pickups(role)
        })?,
        fetch::resolve(policy, "completed pickups", completed, || {
            fixtures::completed_pickups(role)
        })?,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fetch::FallbackPolicy;
    use crate::http::mock::ScriptedTransport;
    use crate::http::Response;
    use crate::storage::mock::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn scripted(script: ScriptedTransport) -> (RestClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(script);
        let client = RestClient::new(transport.clone(), Arc::new(MemoryStorage::new()));
        (client, transport)
    }

    #[test]
    fn test_parallel_load() {
        let (client, transport) = scripted(ScriptedTransport::new(|req| {
            Ok(match req.path.as_str() {
                "/charities/pickups/scheduled" => Response::json(200, &json!([{
                    "id": 9, "restaurantName": "Green Kitchen", "date": "2024-04-01",
                    "time": "10:00", "items": "Fruits", "status": "Pending"
                }])),
                _ => Response::json(200, &json!([])),
            })
        }));

        let mut view = PickupsView::new(UserType::Charity);
        view.load(&client);
        assert_eq!(view.source, Source::Live);
        assert_eq!(view.tab_counts(), (1, 0));
        assert_eq!(view.scheduled[0].counterpart(), "Green Kitchen");

        let mut paths: Vec<_> = transport.sent().into_iter().map(|r| r.path).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec!["/charities/pickups/completed", "/charities/pickups/scheduled"]
        );
    }

    #[test]
    fn test_offline_load_uses_samples() {
        let (client, _) = scripted(ScriptedTransport::offline());
        let mut view = PickupsView::new(UserType::Restaurant).with_tab(Tab::Completed);
        view.load(&client);
        assert_eq!(view.active_tab, Tab::Completed);
        assert_eq!(view.source, Source::Fallback);
        assert_eq!(view.tab_counts(), (2, 2));
        assert_eq!(view.completed[0].food_amount(), "15kg");
    }

    #[test]
    fn test_completed_summary() {
        let (client, _) = scripted(ScriptedTransport::offline());
        let mut view = PickupsView::new(UserType::Restaurant);
        assert_eq!(view.completed_summary(), CompletedSummary::default());

        view.load(&client);
        let summary = view.completed_summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.people_helped, 70);
        assert_eq!(summary.food_kg, Some(27.0));
        assert_eq!(summary.average_rating, Some(4.5));

        let (client, _) = scripted(ScriptedTransport::new(|req| {
            Ok(match req.path.as_str() {
                "/charities/pickups/completed" => Response::json(200, &json!([
                    {"id": 1, "restaurantName": "Fresh Bites Restaurant", "date": "2024-03-15",
                     "time": "14:30", "items": "Bread", "peopleHelped": 25, "foodSaved": "23kg",
                     "rating": 5},
                    {"id": 2, "restaurantName": "Green Kitchen", "date": "2024-03-14",
                     "time": "15:45", "items": "Fruits", "peopleHelped": 15, "foodSaved": "9kg"},
                    {"id": 3, "restaurantName": "Green Kitchen", "date": "2024-03-13",
                     "time": "12:00", "items": "Soup", "foodSaved": "10 portions", "rating": 2}
                ])),
                _ => Response::json(200, &json!([])),
            })
        }));
        let mut view = PickupsView::new(UserType::Charity);
        view.load(&client);
        let summary = view.completed_summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.people_helped, 40);
        assert_eq!(summary.food_kg, Some(32.0));
        assert_eq!(summary.average_rating, Some(3.5));
    }

    #[test]
    fn test_cancel_removes_by_id() {
        let (client, transport) = scripted(ScriptedTransport::new(|req| {
            Ok(if req.method == "DELETE" {
                Response::ok()
            } else {
                Response::internal_server_error()
            })
        }));
        let mut view = PickupsView::new(UserType::Restaurant);
        view.load(&client);
        assert_eq!(view.scheduled.len(), 2);

        view.cancel(&client, 2);
        assert!(view.error.is_empty());
        assert_eq!(view.scheduled.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
        assert!(transport
            .sent()
            .iter()
            .any(|r| r.method == "DELETE" && r.path == "/restaurants/food-items/2"));
    }

    #[test]
    fn test_cancel_failure_keeps_item() {
        let (client, _) = scripted(ScriptedTransport::offline());
        let mut view = PickupsView::new(UserType::Charity);
        view.load(&client);

        view.cancel(&client, 1);
        assert_eq!(view.error, "Failed to cancel pickup");
        assert_eq!(view.scheduled.len(), 2);

        let mut view = PickupsView::new(UserType::Restaurant);
        view.cancel(&client, 1);
        assert_eq!(view.error, "Failed to delete pickup");
    }

    #[test]
    fn test_retry_clears_error() {
        let (client, _) = scripted(ScriptedTransport::offline());
        let strict = client.clone().with_policy(FallbackPolicy::Surface);

        let mut view = PickupsView::new(UserType::Charity);
        view.load(&strict);
        assert_eq!(view.error, LOAD_FAILED);
        assert!(!view.is_loading);

        view.retry(&client);
        assert!(view.error.is_empty());
        assert_eq!(view.tab_counts(), (2, 2));
    }
}
