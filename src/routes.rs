use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{Id, UserType};
use crate::errors::{Error, Result};
use crate::http::{Request, Response};
use matchit::Router;

/// Utility macro generating a constant for each REST endpoint, and associate it with
/// an identifier. Matchit requires both
macro_rules! make_paths {
    ($($name:ident: $path:expr,)*) => {
        /// Endpoint paths, relative to the API base URL
        pub mod paths {
            $(
                pub const $name: &str = $path;
            )*
        }
        /// Names under which the endpoints are registered in the router
        pub mod endpoints {
            $(
                pub const $name: &str = stringify!($name);
            )*
        }
    }
}

make_paths! {
    AUTH_LOGIN: "/auth/login",
    AUTH_SIGNUP: "/auth/signup",
    RESTAURANT_STATS: "/restaurants/stats",
    CHARITY_STATS: "/charities/stats",
    RESTAURANT_PROFILE: "/restaurants/profile",
    CHARITY_PROFILE: "/charities/profile",
    FOOD_ITEMS: "/restaurants/food-items",
    FOOD_ITEM_BY_ID: "/restaurants/food-items/{item_id}",
    OFFERS: "/offers",
    LISTING_BY_ID: "/listings/{listing_id}",
    RESTAURANT_SCHEDULED: "/restaurants/pickups/scheduled",
    RESTAURANT_COMPLETED: "/restaurants/pickups/completed",
    CHARITY_SCHEDULED: "/charities/pickups/scheduled",
    CHARITY_COMPLETED: "/charities/pickups/completed",
    CLAIM_OFFER: "/charities/claim-offer/{offer_id}",
    CHARITY_REQUEST_BY_ID: "/charities/requests/{request_id}",
}

/// Utility to add a list of paths to the router automatically
macro_rules! add_path {
    ($router:ident $(, $path:ident)*) => {
        $(
            $router.insert(paths::$path, endpoints::$path)?;
        )*
    }
}

/// Names of the parameters in the HTTP paths, used to extract them
/// from the parameters inside of request handling
pub mod params {
    pub const ITEM_ID: &str = "item_id";
    pub const LISTING_ID: &str = "listing_id";
    pub const OFFER_ID: &str = "offer_id";
    pub const REQUEST_ID: &str = "request_id";
}

fn with_id(path: &str, param: &str, id: Id) -> String {
    path.replace(&format!("{{{}}}", param), &id.to_string())
}

pub fn food_item_by_id(id: Id) -> String {
    with_id(paths::FOOD_ITEM_BY_ID, params::ITEM_ID, id)
}

pub fn listing_by_id(id: Id) -> String {
    with_id(paths::LISTING_BY_ID, params::LISTING_ID, id)
}

pub fn claim_offer(id: Id) -> String {
    with_id(paths::CLAIM_OFFER, params::OFFER_ID, id)
}

pub fn charity_request_by_id(id: Id) -> String {
    with_id(paths::CHARITY_REQUEST_BY_ID, params::REQUEST_ID, id)
}

pub fn stats(role: UserType) -> &'static str {
    match role {
        UserType::Restaurant => paths::RESTAURANT_STATS,
        UserType::Charity => paths::CHARITY_STATS,
    }
}

pub fn profile(role: UserType) -> &'static str {
    match role {
        UserType::Restaurant => paths::RESTAURANT_PROFILE,
        UserType::Charity => paths::CHARITY_PROFILE,
    }
}

pub fn scheduled_pickups(role: UserType) -> &'static str {
    match role {
        UserType::Restaurant => paths::RESTAURANT_SCHEDULED,
        UserType::Charity => paths::CHARITY_SCHEDULED,
    }
}

pub fn completed_pickups(role: UserType) -> &'static str {
    match role {
        UserType::Restaurant => paths::RESTAURANT_COMPLETED,
        UserType::Charity => paths::CHARITY_COMPLETED,
    }
}

// spurious warning, I am using this in tests
#[allow(unused_macros)]
/// Utility to create easily hashmaps of parameters for testing
macro_rules! make_params {
    () => {
        std::collections::HashMap::new()
    };
    ($name:ident: $value:expr $(, $name2:ident: $value2:expr)* ) => {
        {
            let mut map = std::collections::HashMap::new();
            map.insert(params::$name.to_string(), $value.to_string());
            $(
                map.insert(params::$name2.to_string(), $value2.to_string());
            )*
            map
        }
    }
}

#[allow(unused_imports)]
pub(crate) use make_params;

/// Create a new matchit router holding every endpoint of the API
///
/// Errors from this functions are programming errors, most likely steming from a
/// misuse of matchit
fn new_router() -> Result<Router<&'static str>> {
    let mut router = Router::new();
    add_path!(
        router,
        AUTH_LOGIN,
        AUTH_SIGNUP,
        RESTAURANT_STATS,
        CHARITY_STATS,
        RESTAURANT_PROFILE,
        CHARITY_PROFILE,
        FOOD_ITEMS,
        FOOD_ITEM_BY_ID,
        OFFERS,
        LISTING_BY_ID,
        RESTAURANT_SCHEDULED,
        RESTAURANT_COMPLETED,
        CHARITY_SCHEDULED,
        CHARITY_COMPLETED,
        CLAIM_OFFER,
        CHARITY_REQUEST_BY_ID
    );
    Ok(router)
}

/// Type of the object containing the HTTP path parameters passed to handlers
pub type HttpParams = HashMap<String, String>;
/// Type of the function that handles HTTP requests
pub type HttpHandler = Arc<dyn Fn(&Request, &HttpParams) -> Result<Response> + Send + Sync>;

/// Read an id out of the path parameters
pub fn id_param(params: &HttpParams, name: &str) -> Result<Id> {
    params
        .get(name)
        .ok_or_else(|| Error::BadRequest(format!("Missing {}", name)))
        .and_then(|id| {
            id.parse::<Id>()
                .map_err(|err| Error::BadRequest(format!("{}: {}", name, err)))
        })
}

/// The router is in charge of taking in raw HTTP requests and to dispatch them to
/// the appropriate handler function.
///
/// `prefix` is stripped from request paths before matching, so the same table
/// serves `/api/offers` when the API lives under `/api`.
#[derive(Clone)]
pub struct HttpRouter {
    routes: Arc<Router<&'static str>>,
    handlers: HashMap<&'static str, HashMap<&'static str, HttpHandler>>,
    prefix: String,
}

impl HttpRouter {
    /// Creates a new empty router
    ///
    /// Although the matchit router is not empty, there are no methods associated
    /// to the routes yet, so no request can be processed
    pub fn new(prefix: &str) -> Result<Self> {
        Ok(HttpRouter {
            routes: Arc::new(new_router()?),
            handlers: HashMap::new(),
            prefix: prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Add a new route to the router
    pub fn add_route<F>(&mut self, method: &'static str, route: &'static str, handler: F)
    where
        F: Fn(&Request, &HttpParams) -> Result<Response> + Send + Sync + 'static,
    {
        self.handlers
            .entry(route)
            .or_default()
            .insert(method, Arc::new(handler));
    }

    /// Sends a request to the appropriate handler if it exists
    ///
    /// If no route is defined for this request, return Error::NotFound.
    /// Checking that all parameters are presents and that the body is correct is the
    /// responsibility of the handler
    pub fn route(&self, request: &Request) -> Result<Response> {
        let path = request.path.split('?').next().unwrap_or_default();
        let path = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);

        let route = self
            .routes
            .at(path)
            .map_err(|err| Error::NotFound(format!("{}: {}", path, err)))?;
        let method_to_handler = self.handlers.get(route.value).ok_or_else(|| {
            Error::NotFound(format!(
                "No method associated to this route: {}",
                route.value
            ))
        })?;
        let handler = method_to_handler
            .get(request.method.as_str())
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No handler for {} {}",
                    request.method.as_str(),
                    route.value
                ))
            })?;

        let params: HttpParams = route
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        (**handler)(request, &params)
    }

    /// Route and turn every error into the matching HTTP answer
    pub fn handle(&self, request: &Request) -> Response {
        match self.route(request) {
            Ok(response) => response,
            Err(Error::NotFound(msg)) => Response::error(404, &msg),
            Err(Error::BadRequest(msg)) => Response::error(400, &msg),
            Err(Error::Json(err)) => Response::error(422, &err.to_string()),
            Err(err) => {
                tracing::error!(error = %err, "handler failed");
                Response::internal_server_error()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_routes() {
        let router = new_router().unwrap();
        assert_eq!(
            *router.at("/auth/login").unwrap().value,
            endpoints::AUTH_LOGIN
        );
        assert_eq!(
            *router.at("/restaurants/food-items/12").unwrap().value,
            endpoints::FOOD_ITEM_BY_ID
        );
        assert_eq!(
            *router.at("/charities/pickups/completed").unwrap().value,
            endpoints::CHARITY_COMPLETED
        );
        assert_eq!(
            *router.at("/charities/claim-offer/3").unwrap().value,
            endpoints::CLAIM_OFFER
        );
    }

    #[test]
    fn test_route_ids() {
        let router = new_router().unwrap();
        let route = router.at("/listings/42").unwrap();
        assert_eq!(route.params.get(params::LISTING_ID), Some("42"));
    }

    #[test]
    fn test_missing_routes() {
        let router = new_router().unwrap();
        assert!(router.at("/missing").is_err());
        assert!(router.at("/api/offers").is_err());
    }

    #[test]
    fn test_path_builders() {
        assert_eq!(listing_by_id(5), "/listings/5");
        assert_eq!(claim_offer(9), "/charities/claim-offer/9");
        assert_eq!(food_item_by_id(2), "/restaurants/food-items/2");
        assert_eq!(charity_request_by_id(2), "/charities/requests/2");
        assert_eq!(stats(UserType::Charity), "/charities/stats");
        assert_eq!(
            scheduled_pickups(UserType::Restaurant),
            "/restaurants/pickups/scheduled"
        );
        assert_eq!(profile(UserType::Restaurant), "/restaurants/profile");
    }

    #[test]
    fn test_make_params() {
        let params: HttpParams = make_params!(OFFER_ID: "1", LISTING_ID: "2");
        assert_eq!(id_param(&params, params::OFFER_ID).unwrap(), 1);
        assert_eq!(id_param(&params, params::LISTING_ID).unwrap(), 2);
        assert!(id_param(&params, params::ITEM_ID).is_err());

        let params: HttpParams = make_params!(ITEM_ID: "abc");
        assert!(matches!(
            id_param(&params, params::ITEM_ID),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn test_router() {
        let mut router = HttpRouter::new("/api").unwrap();
        router.add_route("GET", endpoints::OFFERS, |_, _| {
            Ok(Response::ok_with_body("get_offers".to_string()))
        });
        router.add_route("POST", endpoints::OFFERS, |_, _| {
            Ok(Response::ok_with_body("post_offers".to_string()))
        });
        router.add_route("DELETE", endpoints::LISTING_BY_ID, |_, params| {
            let id = id_param(params, params::LISTING_ID)?;
            Ok(Response::ok_with_body(format!("deleted {}", id)))
        });

        let response = router.route(&Request::get("/api/offers")).unwrap();
        assert_eq!(response.body, "get_offers");

        let response = router
            .route(&Request::post("/api/offers", "".to_string()))
            .unwrap();
        assert_eq!(response.body, "post_offers");

        assert!(router.route(&Request::delete("/api/offers")).is_err());

        let response = router.route(&Request::delete("/api/listings/42")).unwrap();
        assert_eq!(response.body, "deleted 42");

        assert_eq!(router.handle(&Request::get("/api/nowhere")).status, Some(404));
        assert_eq!(
            router.handle(&Request::delete("/api/listings/x")).status,
            Some(400)
        );
    }
}
