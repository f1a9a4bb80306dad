use crate::api::{DashboardStats, UserType};
use crate::fetch::{self, Fetched};
use crate::fixtures;
use crate::rest::RestClient;

pub const LOAD_FAILED: &str = "Failed to load dashboard data";

/// Figures and recent activity of a role's home screen
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub role: UserType,
    pub stats: Option<Fetched<DashboardStats>>,
    pub error: String,
    pub is_loading: bool,
}

impl DashboardView {
    pub fn new(role: UserType) -> Self {
        DashboardView {
            role,
            stats: None,
            error: String::new(),
            is_loading: false,
        }
    }

    pub fn load(&mut self, client: &RestClient) {
        self.is_loading = true;
        self.error.clear();
        let role = self.role;
        match fetch::resolve(client.policy(), "dashboard stats", client.stats(role), || {
            fixtures::dashboard_stats(role)
        }) {
            Ok(stats) => self.stats = Some(stats),
            Err(_) => self.error = LOAD_FAILED.to_string(),
        }
        self.is_loading = false;
    }

    /// Whether the figures on screen are sample data
    pub fn is_sample(&self) -> bool {
        self.stats.as_ref().is_some_and(Fetched::is_fallback)
    }
}
