//! Sample data shown when the API cannot be reached, and served by the stub server.

use crate::api::*;

pub fn dashboard_stats(role: UserType) -> DashboardStats {
    match role {
        UserType::Restaurant => DashboardStats {
            stats: Stats {
                total_donations: Some(24),
                active_pickups: 5,
                food_saved: Some("156kg".to_string()),
                people_helped: 320,
                ..Default::default()
            },
            recent_activity: vec![
                activity(1, "donation", "Donated bread and pastries to Local Food Bank", "2024-03-15"),
                activity(2, "pickup", "Pickup scheduled with Community Shelter", "2024-03-14"),
            ],
        },
        UserType::Charity => DashboardStats {
            stats: Stats {
                total_pickups: Some(18),
                active_pickups: 5,
                food_collected: Some("98kg".to_string()),
                people_helped: 250,
                ..Default::default()
            },
            recent_activity: vec![
                activity(1, "pickup", "Collected prepared meals from Fresh Bites Restaurant", "2024-03-15"),
                activity(2, "claim", "Claimed dairy products from Green Kitchen", "2024-03-14"),
            ],
        },
    }
}

fn activity(id: Id, kind: &str, description: &str, date: &str) -> Activity {
    Activity {
        id,
        kind: kind.to_string(),
        description: description.to_string(),
        date: date.to_string(),
    }
}

fn scheduled(
    id: Id,
    counterpart_role: UserType,
    name: &str,
    date: &str,
    time: &str,
    items: &str,
    address: Option<&str>,
    status: PickupStatus,
) -> ScheduledPickup {
    let name = Some(name.to_string());
    let (charity_name, restaurant_name) = match counterpart_role {
        UserType::Charity => (name, None),
        UserType::Restaurant => (None, name),
    };
    ScheduledPickup {
        id,
        charity_name,
        restaurant_name,
        date: date.to_string(),
        time: time.to_string(),
        items: items.to_string(),
        address: address.map(str::to_string),
        status,
    }
}

pub fn scheduled_pickups(role: UserType) -> Vec<ScheduledPickup> {
    match role {
        UserType::Restaurant => vec![
            scheduled(1, UserType::Charity, "Local Food Bank", "2024-03-20", "14:00",
                "Bread, Vegetables, Prepared Meals", None, PickupStatus::Confirmed),
            scheduled(2, UserType::Charity, "Community Shelter", "2024-03-21", "15:30",
                "Dairy Products, Fruits", None, PickupStatus::Pending),
        ],
        UserType::Charity => vec![
            scheduled(1, UserType::Restaurant, "Fresh Bites Restaurant", "2024-03-20", "14:00",
                "Bread, Vegetables, Prepared Meals", Some("123 Main St, City"), PickupStatus::Confirmed),
            scheduled(2, UserType::Restaurant, "Green Kitchen", "2024-03-21", "15:30",
                "Dairy Products, Fruits", Some("456 Oak Ave, City"), PickupStatus::Pending),
        ],
    }
}

pub fn completed_pickups(role: UserType) -> Vec<CompletedPickup> {
    match role {
        UserType::Restaurant => vec![
            CompletedPickup {
                id: 1,
                charity_name: Some("Local Food Bank".to_string()),
                restaurant_name: None,
                date: "2024-03-15".to_string(),
                time: "14:00".to_string(),
                items: "Bread, Vegetables".to_string(),
                address: None,
                food_donated: Some("15kg".to_string()),
                food_collected: None,
                people_helped: 40,
                impact: Some("Helped feed 40 people".to_string()),
                rating: Some(5),
                completed_at: Some("2024-03-15T14:45:00Z".to_string()),
            },
            CompletedPickup {
                id: 2,
                charity_name: Some("Community Shelter".to_string()),
                restaurant_name: None,
                date: "2024-03-14".to_string(),
                time: "15:30".to_string(),
                items: "Prepared Meals, Fruits".to_string(),
                address: None,
                food_donated: Some("12kg".to_string()),
                food_collected: None,
                people_helped: 30,
                impact: Some("Helped feed 30 people".to_string()),
                rating: Some(4),
                completed_at: Some("2024-03-14T16:00:00Z".to_string()),
            },
        ],
        UserType::Charity => vec![
            CompletedPickup {
                id: 1,
                charity_name: None,
                restaurant_name: Some("Fresh Bites Restaurant".to_string()),
                date: "2024-03-15".to_string(),
                time: "14:00".to_string(),
                items: "Bread, Vegetables".to_string(),
                address: Some("123 Main St, City".to_string()),
                food_donated: None,
                food_collected: Some("12kg".to_string()),
                people_helped: 30,
                impact: None,
                rating: Some(5),
                completed_at: Some("2024-03-15T14:45:00Z".to_string()),
            },
            CompletedPickup {
                id: 2,
                charity_name: None,
                restaurant_name: Some("Green Kitchen".to_string()),
                date: "2024-03-14".to_string(),
                time: "15:30".to_string(),
                items: "Prepared Meals, Fruits".to_string(),
                address: Some("456 Oak Ave, City".to_string()),
                food_donated: None,
                food_collected: Some("8kg".to_string()),
                people_helped: 20,
                impact: None,
                rating: Some(4),
                completed_at: Some("2024-03-14T16:00:00Z".to_string()),
            },
        ],
    }
}

fn offer(id: Id, title: &str, description: &str, quantity: f64, unit: &str, expiry: &str) -> Offer {
    Offer {
        id,
        title: title.to_string(),
        description: Some(description.to_string()),
        quantity,
        quantity_unit: unit.to_string(),
        expiry_date: Some(expiry.to_string()),
        available_date: Some("2024-03-20".to_string()),
        available_time: Some("14:00".to_string()),
        pickup_time: None,
        status: OfferStatus::Open,
    }
}

/// The restaurant's own listings
pub fn food_items() -> Vec<Offer> {
    vec![
        offer(1, "Fresh Bread", "Assorted loaves baked this morning", 5.0, "kg", "2024-03-21"),
        offer(2, "Vegetable Soup", "Prepared meals, refrigerated", 10.0, "portions", "2024-03-22"),
    ]
}

/// Offers open for charities to claim
pub fn available_offers() -> Vec<Offer> {
    vec![
        offer(1, "Fresh Bread", "Assorted loaves baked this morning", 5.0, "kg", "2024-03-21"),
        offer(2, "Vegetable Soup", "Prepared meals, refrigerated", 10.0, "portions", "2024-03-22"),
        offer(3, "Dairy Products", "Milk and yogurt", 3.0, "kg", "2024-03-23"),
    ]
}

/// Account shown when nothing better is known
pub fn account(role: UserType) -> User {
    let mut extra = serde_json::Map::new();
    let (username, email, address, phone, description) = match role {
        UserType::Restaurant => {
            extra.insert("operatingHours".into(), "Mon-Sat: 11:00 AM - 10:00 PM".into());
            extra.insert("preferredPickupTimes".into(), "2:00 PM - 4:00 PM".into());
            (
                "Fresh Bites Restaurant",
                "contact@freshbites.com",
                "123 Main St, City",
                "(555) 123-4567",
                "Family-owned restaurant specializing in fresh, local ingredients",
            )
        }
        UserType::Charity => {
            extra.insert("serviceArea".into(), "Within 10 miles of city center".into());
            extra.insert("storageCapacity".into(), "500 sq ft of refrigerated storage".into());
            (
                "Local Food Bank",
                "help@localfoodbank.org",
                "456 Oak Ave, City",
                "(555) 987-6543",
                "Non-profit organization helping to feed local communities",
            )
        }
    };
    User {
        id: Some(1),
        username: username.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        user_type: Some(role),
        description: Some(description.to_string()),
        extra,
    }
}
