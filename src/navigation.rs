use crate::api::UserType;
use matchit::Router;
use std::fmt;
use std::sync::LazyLock;

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    Dashboard(UserType),
    Pickups(UserType),
    Scheduled(UserType),
    Completed(UserType),
    Listings(UserType),
    Offers(UserType),
    Account(UserType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Dashboard,
    Pickups,
    Scheduled,
    Completed,
    Listings,
    Offers,
    Account,
}

static ROUTER: LazyLock<Router<Screen>> = LazyLock::new(|| {
    let mut router = Router::new();
    let table = [
        ("/dashboards/{role}", Screen::Dashboard),
        ("/dashboards/{role}/pickups", Screen::Pickups),
        ("/dashboards/{role}/scheduled", Screen::Scheduled),
        ("/dashboards/{role}/completed", Screen::Completed),
        ("/dashboards/{role}/listings", Screen::Listings),
        ("/dashboards/{role}/offers", Screen::Offers),
        ("/dashboards/{role}/account", Screen::Account),
    ];
    for (path, screen) in table {
        // Static table, a failure here is a typo in the paths above
        router.insert(path, screen).unwrap();
    }
    router
});

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::Signup => "/auth/signup".to_string(),
            Route::Dashboard(role) => format!("/dashboards/{}", role),
            Route::Pickups(role) => format!("/dashboards/{}/pickups", role),
            Route::Scheduled(role) => format!("/dashboards/{}/scheduled", role),
            Route::Completed(role) => format!("/dashboards/{}/completed", role),
            Route::Listings(role) => format!("/dashboards/{}/listings", role),
            Route::Offers(role) => format!("/dashboards/{}/offers", role),
            Route::Account(role) => format!("/dashboards/{}/account", role),
        }
    }

    /// Inverse of `path`. The role segment is matched case-insensitively.
    pub fn parse(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => return Some(Route::Home),
            "/auth/login" => return Some(Route::Login),
            "/auth/signup" => return Some(Route::Signup),
            _ => {}
        }

        let matched = ROUTER.at(path).ok()?;
        let role = matched.params.get("role")?.parse::<UserType>().ok()?;
        Some(match matched.value {
            Screen::Dashboard => Route::Dashboard(role),
            Screen::Pickups => Route::Pickups(role),
            Screen::Scheduled => Route::Scheduled(role),
            Screen::Completed => Route::Completed(role),
            Screen::Listings => Route::Listings(role),
            Screen::Offers => Route::Offers(role),
            Screen::Account => Route::Account(role),
        })
    }

    /// Role of the dashboard this route belongs to, if any
    pub fn role(&self) -> Option<UserType> {
        match self {
            Route::Home | Route::Login | Route::Signup => None,
            Route::Dashboard(role)
            | Route::Pickups(role)
            | Route::Scheduled(role)
            | Route::Completed(role)
            | Route::Listings(role)
            | Route::Offers(role)
            | Route::Account(role) => Some(*role),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub name: &'static str,
    pub route: Route,
    pub active: bool,
}

/// Navigation bar of a dashboard, with the entry for `current_path` marked active
pub fn navbar(role: UserType, current_path: &str) -> Vec<NavItem> {
    let current = Route::parse(current_path);
    [
        ("Dashboard", Route::Dashboard(role)),
        ("Scheduled Pickups", Route::Scheduled(role)),
        ("Completed Pickups", Route::Completed(role)),
        ("Account", Route::Account(role)),
    ]
    .into_iter()
    .map(|(name, route)| NavItem {
        name,
        route,
        active: current == Some(route),
    })
    .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(
            Route::Dashboard(UserType::Restaurant).path(),
            "/dashboards/restaurant"
        );
        assert_eq!(
            Route::Account(UserType::Charity).to_string(),
            "/dashboards/charity/account"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        for role in [UserType::Restaurant, UserType::Charity] {
            for route in [
                Route::Dashboard(role),
                Route::Pickups(role),
                Route::Scheduled(role),
                Route::Completed(role),
                Route::Listings(role),
                Route::Offers(role),
                Route::Account(role),
            ] {
                assert_eq!(Route::parse(&route.path()), Some(route));
            }
        }
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/auth/login/"), Some(Route::Login));
    }

    #[test]
    fn test_parse_capitalized_role() {
        assert_eq!(
            Route::parse("/dashboards/Restaurant/completed"),
            Some(Route::Completed(UserType::Restaurant))
        );
        assert_eq!(Route::parse("/dashboards/admin"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn test_navbar() {
        let items = navbar(UserType::Charity, "/dashboards/Charity/scheduled");
        let names: Vec<_> = items.iter().map(|i| i.name).collect();
        assert_eq!(
            names,
            vec!["Dashboard", "Scheduled Pickups", "Completed Pickups", "Account"]
        );
        let active: Vec<_> = items.iter().filter(|i| i.active).map(|i| i.name).collect();
        assert_eq!(active, vec!["Scheduled Pickups"]);
        assert_eq!(items[0].route.path(), "/dashboards/charity");

        assert!(navbar(UserType::Charity, "/dashboards/restaurant")
            .iter()
            .all(|i| !i.active));
    }
}
