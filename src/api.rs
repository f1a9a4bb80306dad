// This file contains the basic types used to communicate through the API
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the API
pub type Id = u64;

/// Which side of the platform an account is on
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    #[serde(alias = "Restaurant")]
    Restaurant,
    #[serde(alias = "Charity")]
    Charity,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Restaurant => "restaurant",
            UserType::Charity => "charity",
        }
    }

    /// First segment of the role's API paths
    pub fn api_segment(&self) -> &'static str {
        match self {
            UserType::Restaurant => "restaurants",
            UserType::Charity => "charities",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    /// Case-insensitive, since routes use both `restaurant` and `Restaurant`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "restaurant" => Ok(UserType::Restaurant),
            "charity" => Ok(UserType::Charity),
            _ => Err(format!("unknown user type '{}'", s)),
        }
    }
}

/// Body of `auth/login`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

/// Body of `auth/signup`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    pub address: String,
    pub phone: String,
    pub description: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

/// Answer of `auth/login` and `auth/signup`. The token comes as either `token` or `access_token`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResponse {
    #[serde(alias = "access_token", default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// An account as the API describes it
///
/// Fields this client does not know about are kept in `extra` so that writing
/// the cached copy back does not lose them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(alias = "name", default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(rename = "userType", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Accounts created without a phone or address come back with `null` there
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `PUT restaurants/profile` and `PUT charities/profile`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Figures shown on a dashboard. Restaurants and charities get different subsets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_donations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pickups: Option<u32>,
    #[serde(default)]
    pub active_pickups: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_saved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_collected: Option<String>,
    #[serde(default)]
    pub people_helped: u32,
}

/// One line of the recent activity feed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub date: String,
}

/// Answer of `restaurants/stats` and `charities/stats`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DashboardStats {
    pub stats: Stats,
    #[serde(rename = "recentActivity", default)]
    pub recent_activity: Vec<Activity>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    #[default]
    #[serde(alias = "available")]
    Open,
    Claimed,
    Completed,
    #[serde(other)]
    Unknown,
}

/// A surplus-food listing posted by a restaurant
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Offer {
    pub id: Id,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: f64,
    #[serde(alias = "unit", default)]
    pub quantity_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub status: OfferStatus,
}

/// Body used to create a listing or offer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NewOffer {
    pub title: String,
    pub description: Option<String>,
    pub quantity: f64,
    pub quantity_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_time: Option<String>,
}

/// Body of `PUT listings/{id}`. Only the given fields change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OfferStatus>,
}

impl ListingUpdate {
    /// Apply the changes to a local copy of the listing
    pub fn apply(&self, offer: &mut Offer) {
        if let Some(title) = &self.title {
            offer.title = title.clone();
        }
        if let Some(description) = &self.description {
            offer.description = Some(description.clone());
        }
        if let Some(quantity) = self.quantity {
            offer.quantity = quantity;
        }
        if let Some(unit) = &self.quantity_unit {
            offer.quantity_unit = unit.clone();
        }
        if let Some(expiry) = &self.expiry_date {
            offer.expiry_date = Some(expiry.clone());
        }
        if let Some(status) = self.status {
            offer.status = status;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupStatus {
    Confirmed,
    Pending,
    Completed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PickupStatus::Confirmed => "Confirmed",
            PickupStatus::Pending => "Pending",
            PickupStatus::Completed => "Completed",
            PickupStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// An upcoming collection. Restaurants see the charity's name, charities the restaurant's.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPickup {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    pub date: String,
    pub time: String,
    pub items: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: PickupStatus,
}

/// A collection that already happened
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPickup {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    pub date: String,
    pub time: String,
    pub items: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_donated: Option<String>,
    #[serde(alias = "foodSaved", default, skip_serializing_if = "Option::is_none")]
    pub food_collected: Option<String>,
    #[serde(default)]
    pub people_helped: u32,
    /// Free text such as "Helped feed 25 people"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// Stars given by the other party, 1 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Name of the other party of a pickup, whichever side sent it
pub fn counterpart<'a>(charity: &'a Option<String>, restaurant: &'a Option<String>) -> &'a str {
    charity
        .as_deref()
        .or(restaurant.as_deref())
        .unwrap_or("Unknown")
}

impl ScheduledPickup {
    pub fn counterpart(&self) -> &str {
        counterpart(&self.charity_name, &self.restaurant_name)
    }
}

impl CompletedPickup {
    pub fn counterpart(&self) -> &str {
        counterpart(&self.charity_name, &self.restaurant_name)
    }

    /// Amount of food moved, whichever side reported it
    pub fn food_amount(&self) -> &str {
        self.food_donated
            .as_deref()
            .or(self.food_collected.as_deref())
            .unwrap_or("-")
    }

    /// The food amount in kilograms, when it is written like `23kg`
    pub fn food_kg(&self) -> Option<f64> {
        let amount = self.food_donated.as_deref().or(self.food_collected.as_deref())?;
        amount.trim().strip_suffix("kg")?.trim().parse().ok()
    }
}

/// Plain `{"message": "..."}` acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message: String,
}
