//! Stand-in for the REST API, answering every endpoint with canned data.
//!
//! Nothing is stored: reads always return the sample fixtures and writes are
//! acknowledged without effect. Good enough to click through the client
//! without a backend, and to test the client end to end over a real socket.

use crate::api::*;
use crate::errors::{Error, Result};
use crate::fixtures;
use crate::http::{Request, Response};
use crate::routes::{endpoints, id_param, params, HttpParams, HttpRouter};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Token handed out by the stub's login and signup
pub const STUB_TOKEN_PREFIX: &str = "stub-token-";

fn body<T: DeserializeOwned>(request: &Request) -> Result<T> {
    Ok(serde_json::from_str(&request.body)?)
}

fn ok_json<T: serde::Serialize>(status: u16, value: &T) -> Result<Response> {
    Ok(Response::json(status, &serde_json::to_value(value)?))
}

fn message(text: &str) -> Result<Response> {
    ok_json(200, &Message { message: text.to_string() })
}

/// Reject requests without a bearer token, the way the API does
fn protected<F>(handler: F) -> impl Fn(&Request, &HttpParams) -> Result<Response> + Send + Sync + 'static
where
    F: Fn(&Request, &HttpParams) -> Result<Response> + Send + Sync + 'static,
{
    move |request, params| match request.bearer_token() {
        Some(token) if !token.is_empty() => handler(request, params),
        _ => Ok(Response::error(401, "Not authenticated")),
    }
}

fn auth_response(role: UserType, user: User) -> Result<Response> {
    ok_json(
        200,
        &AuthResponse {
            token: Some(format!("{}{}", STUB_TOKEN_PREFIX, role)),
            user: Some(user),
        },
    )
}

fn login(request: &Request, _: &HttpParams) -> Result<Response> {
    let credentials: LoginRequest = body(request)?;
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Ok(Response::error(401, "Incorrect email or password"));
    }
    let mut user = fixtures::account(credentials.user_type);
    user.email = credentials.email;
    auth_response(credentials.user_type, user)
}

fn signup(request: &Request, _: &HttpParams) -> Result<Response> {
    let form: SignupRequest = body(request)?;
    if form.password != form.confirm_password {
        return Err(Error::BadRequest("Passwords do not match".to_string()));
    }
    let user = User {
        id: Some(1),
        username: form.name,
        email: form.email,
        phone: form.phone,
        address: form.address,
        user_type: Some(form.user_type),
        description: Some(form.description).filter(|d| !d.is_empty()),
        ..Default::default()
    };
    auth_response(form.user_type, user)
}

/// Turn a creation request into the listing the API would answer with
fn created_offer(next_id: &AtomicU64, offer: NewOffer) -> Offer {
    Offer {
        id: next_id.fetch_add(1, Ordering::Relaxed),
        title: offer.title,
        description: offer.description,
        quantity: offer.quantity,
        quantity_unit: offer.quantity_unit,
        expiry_date: offer.expiry_date,
        available_date: offer.available_date,
        available_time: offer.available_time,
        pickup_time: None,
        status: OfferStatus::Open,
    }
}

fn find_offer(id: Id) -> Result<Offer> {
    fixtures::available_offers()
        .into_iter()
        .find(|offer| offer.id == id)
        .ok_or_else(|| Error::NotFound(format!("Offer {} not found", id)))
}

/// Router answering the whole REST table under `prefix`
pub fn stub_router(prefix: &str) -> Result<HttpRouter> {
    let mut router = HttpRouter::new(prefix)?;
    let next_id = Arc::new(AtomicU64::new(100));

    router.add_route("POST", endpoints::AUTH_LOGIN, login);
    router.add_route("POST", endpoints::AUTH_SIGNUP, signup);

    for (role, stats, profile, scheduled, completed) in [
        (
            UserType::Restaurant,
            endpoints::RESTAURANT_STATS,
            endpoints::RESTAURANT_PROFILE,
            endpoints::RESTAURANT_SCHEDULED,
            endpoints::RESTAURANT_COMPLETED,
        ),
        (
            UserType::Charity,
            endpoints::CHARITY_STATS,
            endpoints::CHARITY_PROFILE,
            endpoints::CHARITY_SCHEDULED,
            endpoints::CHARITY_COMPLETED,
        ),
    ] {
        router.add_route(
            "GET",
            stats,
            protected(move |_, _| ok_json(200, &fixtures::dashboard_stats(role))),
        );
        router.add_route(
            "GET",
            scheduled,
            protected(move |_, _| ok_json(200, &fixtures::scheduled_pickups(role))),
        );
        router.add_route(
            "GET",
            completed,
            protected(move |_, _| ok_json(200, &fixtures::completed_pickups(role))),
        );
        router.add_route(
            "PUT",
            profile,
            protected(|request, _| {
                let update: ProfileUpdate = body(request)?;
                if update.address.trim().is_empty() {
                    return Err(Error::BadRequest("Address is required".to_string()));
                }
                message("Profile updated")
            }),
        );
    }

    router.add_route(
        "GET",
        endpoints::FOOD_ITEMS,
        protected(|_, _| ok_json(200, &fixtures::food_items())),
    );
    let ids = next_id.clone();
    router.add_route(
        "POST",
        endpoints::FOOD_ITEMS,
        protected(move |request, _| ok_json(201, &created_offer(&ids, body(request)?))),
    );
    router.add_route(
        "DELETE",
        endpoints::FOOD_ITEM_BY_ID,
        protected(|_, params| {
            id_param(params, params::ITEM_ID)?;
            message("Food item deleted")
        }),
    );

    router.add_route(
        "GET",
        endpoints::OFFERS,
        protected(|_, _| ok_json(200, &fixtures::available_offers())),
    );
    let ids = next_id;
    router.add_route(
        "POST",
        endpoints::OFFERS,
        protected(move |request, _| ok_json(201, &created_offer(&ids, body(request)?))),
    );

    router.add_route(
        "PUT",
        endpoints::LISTING_BY_ID,
        protected(|request, params| {
            let mut offer = find_offer(id_param(params, params::LISTING_ID)?)?;
            let update: ListingUpdate = body(request)?;
            update.apply(&mut offer);
            ok_json(200, &offer)
        }),
    );
    router.add_route(
        "DELETE",
        endpoints::LISTING_BY_ID,
        protected(|_, params| {
            find_offer(id_param(params, params::LISTING_ID)?)?;
            message("Listing deleted")
        }),
    );

    router.add_route(
        "POST",
        endpoints::CLAIM_OFFER,
        protected(|_, params| {
            let offer = find_offer(id_param(params, params::OFFER_ID)?)?;
            ok_json(200, &json!({"message": "Offer claimed", "offer_id": offer.id}))
        }),
    );
    router.add_route(
        "DELETE",
        endpoints::CHARITY_REQUEST_BY_ID,
        protected(|_, params| {
            id_param(params, params::REQUEST_ID)?;
            message("Request cancelled")
        }),
    );

    Ok(router)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ApiUrl;
    use crate::http::{HttpClient, HttpServer, Transport};
    use crate::pages::{
        account::AccountView, dashboard::DashboardView, listings::ListingsView,
        listings::OfferForm, login::LoginForm, offers::OffersView, pickups::PickupsView,
    };
    use crate::fetch::{FallbackPolicy, Source};
    use crate::navigation::Route;
    use crate::rest::RestClient;
    use crate::session;
    use crate::storage::mock::MemoryStorage;
    use std::thread;
    use std::time::Duration;

    /// Serve `count` requests from the stub on a free port, return a client for it
    fn start(count: usize) -> (RestClient, thread::JoinHandle<()>) {
        let server = HttpServer::new("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let router = stub_router("/api").unwrap();
        let handle = thread::spawn(move || server.serve_n(count, |req| router.handle(&req)));

        let api = ApiUrl::parse(&format!("http://{}/api", addr)).unwrap();
        let client = RestClient::new(
            Arc::new(HttpClient::new(api, Duration::from_secs(5))),
            Arc::new(MemoryStorage::new()),
        )
        .with_policy(FallbackPolicy::Surface);
        (client, handle)
    }

    #[test]
    fn test_unauthenticated_requests_are_refused() {
        let router = stub_router("/api").unwrap();
        let response = router.handle(&Request::get("/api/offers"));
        assert_eq!(response.status, Some(401));

        let response = router.handle(
            &Request::get("/api/offers").with_header("Authorization", "Bearer abc"),
        );
        assert_eq!(response.status, Some(200));
    }

    #[test]
    fn test_bad_bodies() {
        let router = stub_router("").unwrap();
        let response = router.handle(&Request::post("/auth/login", "{".to_string()));
        assert_eq!(response.status, Some(422));

        let response = router.handle(
            &Request::post("/charities/claim-offer/99", String::new())
                .with_header("Authorization", "Bearer abc"),
        );
        assert_eq!(response.status, Some(404));
    }

    #[test]
    fn test_restaurant_session_end_to_end() {
        let (client, server) = start(6);

        let mut login = LoginForm::new();
        login.handle_input("email", "contact@freshbites.com");
        login.handle_input("password", "pw");
        assert_eq!(login.submit(&client), Some(Route::Dashboard(UserType::Restaurant)));
        assert_eq!(
            session::token(client.storage()).unwrap(),
            Some(format!("{}restaurant", STUB_TOKEN_PREFIX))
        );

        let mut dashboard = DashboardView::new(UserType::Restaurant);
        dashboard.load(&client);
        assert!(!dashboard.is_sample());
        assert_eq!(dashboard.stats.unwrap().data.stats.total_donations, Some(24));

        let mut pickups = PickupsView::new(UserType::Restaurant);
        pickups.load(&client);
        assert_eq!(pickups.source, Source::Live);
        assert_eq!(pickups.tab_counts(), (2, 2));

        let mut listings = ListingsView::new();
        let form = OfferForm {
            title: "Bagels".to_string(),
            quantity: "12".to_string(),
            quantity_unit: "pieces".to_string(),
            ..Default::default()
        };
        assert_eq!(listings.create(&client, &form), Some(100));
        assert_eq!(listings.items[0].title, "Bagels");

        pickups.cancel(&client, 1);
        assert!(pickups.error.is_empty());
        assert_eq!(pickups.scheduled.len(), 1);

        server.join().unwrap();
    }

    #[test]
    fn test_charity_session_end_to_end() {
        let (client, server) = start(5);

        let mut login = LoginForm::new();
        login.select_user_type(UserType::Charity);
        login.handle_input("email", "help@localfoodbank.org");
        login.handle_input("password", "pw");
        assert!(login.submit(&client).is_some());

        let mut offers = OffersView::new();
        offers.load(&client);
        assert_eq!(offers.offers.len(), 3);
        assert!(offers.claim(&client, 3));
        assert_eq!(offers.offers.len(), 2);

        let mut account = AccountView::open(&client, UserType::Charity).unwrap().unwrap();
        account.edit();
        account.handle_input("address", "1 New Street, City");
        assert!(account.save(&client));
        assert_eq!(account.user.address, "1 New Street, City");

        assert_eq!(session::logout(client.storage()).unwrap(), Route::Home);
        assert_eq!(session::token(client.storage()).unwrap(), None);

        // Without a token the stub refuses
        let err = client.offers().unwrap_err();
        assert_eq!(err.status(), Some(401));

        server.join().unwrap();
    }

    #[test]
    fn test_raw_transport_against_stub() {
        let server = HttpServer::new("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let router = stub_router("").unwrap();
        let handle = thread::spawn(move || server.serve_once(|req| router.handle(&req)));

        let client = HttpClient::for_address(&addr.to_string()).unwrap();
        let response = client
            .send(&Request::post(
                "/auth/signup",
                serde_json::to_string(&SignupRequest {
                    name: "Green Kitchen".to_string(),
                    email: "hello@greenkitchen.com".to_string(),
                    password: "a".to_string(),
                    confirm_password: "b".to_string(),
                    ..Default::default()
                })
                .unwrap(),
            ))
            .unwrap();
        assert_eq!(response.status, Some(400));
        assert_eq!(
            crate::errors::message_from_body(&response.body).as_deref(),
            Some("Passwords do not match")
        );
        handle.join().unwrap();
    }
}
