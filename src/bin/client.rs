use clap::Parser;
use nowaste::api::{ListingUpdate, UserType};
use nowaste::cli::{init_logging, AccountAction, ClientArgs, Command, OfferArgs};
use nowaste::config::Config;
use nowaste::fetch::{FallbackPolicy, Source};
use nowaste::http::HttpClient;
use nowaste::navigation::{navbar, Route};
use nowaste::pages::account::AccountView;
use nowaste::pages::dashboard::DashboardView;
use nowaste::pages::listings::{ListingsView, OfferForm};
use nowaste::pages::login::LoginForm;
use nowaste::pages::offers::OffersView;
use nowaste::pages::pickups::{PickupsView, Tab};
use nowaste::pages::signup::SignupForm;
use nowaste::rest::RestClient;
use nowaste::session::{self, Session};
use nowaste::storage::SqliteStorage;
use std::sync::Arc;

type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SAMPLE_NOTICE: &str = "(the API could not be reached, showing sample data)";

fn main() {
    let args = ClientArgs::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: ClientArgs) -> CliResult<()> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    tracing::debug!(?config, "configuration loaded");

    let storage = Arc::new(SqliteStorage::open(&config.storage_path())?);
    let transport = Arc::new(HttpClient::new(config.api_url()?, config.timeout()));
    let client = RestClient::new(transport, storage)
        .with_policy(FallbackPolicy::from_config(config.mock_fallback));

    match args.command {
        Command::Login {
            user_type,
            email,
            password,
        } => {
            let mut form = LoginForm::new();
            form.select_user_type(user_type);
            form.handle_input("email", &email);
            form.handle_input("password", &password);
            match form.submit(&client) {
                Some(route) => println!("Logged in. Next: {}", route),
                None => return Err(form.error.into()),
            }
        }
        Command::Signup(signup) => {
            let mut form = SignupForm::new();
            form.select_user_type(signup.user_type);
            for (name, value) in [
                ("name", &signup.name),
                ("email", &signup.email),
                ("password", &signup.password),
                ("confirmPassword", &signup.confirm_password),
                ("address", &signup.address),
                ("phone", &signup.phone),
                ("description", &signup.description),
            ] {
                form.handle_input(name, value);
            }
            match form.submit(&client) {
                Some(Route::Login) => println!("Account created, please log in."),
                Some(route) => println!("Account created. Next: {}", route),
                None => return Err(form.error.into()),
            }
        }
        Command::Logout => {
            let route = session::logout(client.storage())?;
            println!("Logged out. Next: {}", route);
        }
        Command::Whoami => {
            let session = guard(&client, None)?;
            print_whoami(&session);
        }
        Command::Dashboard => {
            let session = guard(&client, None)?;
            let route = Route::Dashboard(session.user_type);
            print_navbar(session.user_type, &route);

            let mut view = DashboardView::new(session.user_type);
            view.load(&client);
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            if let Some(stats) = view.stats {
                print_notice(stats.source);
                let figures = &stats.data.stats;
                if let Some(total) = figures.total_donations {
                    println!("Total donations: {}", total);
                }
                if let Some(total) = figures.total_pickups {
                    println!("Total pickups:   {}", total);
                }
                println!("Active pickups:  {}", figures.active_pickups);
                if let Some(food) = figures.food_saved.as_ref().or(figures.food_collected.as_ref()) {
                    println!("Food:            {}", food);
                }
                println!("People helped:   {}", figures.people_helped);
                println!();
                println!("Recent activity:");
                for activity in &stats.data.recent_activity {
                    println!("  {}  {}", activity.date, activity.description);
                }
            }
        }
        Command::Pickups { completed } => {
            let session = guard(&client, None)?;
            let tab = if completed { Tab::Completed } else { Tab::Scheduled };
            let route = match tab {
                Tab::Scheduled => Route::Scheduled(session.user_type),
                Tab::Completed => Route::Completed(session.user_type),
            };
            print_navbar(session.user_type, &route);

            let mut view = PickupsView::new(session.user_type).with_tab(tab);
            view.load(&client);
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            print_notice(view.source);
            let (scheduled, done) = view.tab_counts();
            println!("Scheduled ({})  Completed ({})", scheduled, done);
            match view.active_tab {
                Tab::Scheduled => {
                    for pickup in &view.scheduled {
                        println!(
                            "#{} {} on {} at {} - {} [{}]",
                            pickup.id,
                            pickup.counterpart(),
                            pickup.date,
                            pickup.time,
                            pickup.items,
                            pickup.status
                        );
                    }
                }
                Tab::Completed => {
                    let summary = view.completed_summary();
                    print!("Total pickups: {}  People helped: {}", summary.total, summary.people_helped);
                    if let Some(kg) = summary.food_kg {
                        print!("  Food saved: {}kg", kg);
                    }
                    if let Some(rating) = summary.average_rating {
                        print!("  Average rating: {:.1}", rating);
                    }
                    println!();
                    for pickup in &view.completed {
                        println!(
                            "#{} {} on {} - {}, {} for {} people",
                            pickup.id,
                            pickup.counterpart(),
                            pickup.date,
                            pickup.items,
                            pickup.food_amount(),
                            pickup.people_helped
                        );
                    }
                }
            }
        }
        Command::CancelPickup { id } => {
            let session = guard(&client, None)?;
            let mut view = PickupsView::new(session.user_type);
            view.cancel(&client, id);
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            println!("Pickup #{} cancelled", id);
        }
        Command::Listings => {
            guard(&client, Some(UserType::Restaurant))?;
            let mut view = ListingsView::new();
            view.load(&client);
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            print_notice(view.source);
            for item in &view.items {
                print_offer(item);
            }
        }
        Command::CreateListing(offer) => {
            guard(&client, Some(UserType::Restaurant))?;
            let mut view = ListingsView::new();
            match view.create(&client, &offer_form(offer)) {
                Some(id) => println!("Listing #{} created", id),
                None => return Err(view.error.into()),
            }
        }
        Command::PublishOffer(offer) => {
            guard(&client, Some(UserType::Restaurant))?;
            let mut view = ListingsView::new();
            match view.publish(&client, &offer_form(offer)) {
                Some(id) => println!("Offer #{} published", id),
                None => return Err(view.error.into()),
            }
        }
        Command::UpdateListing {
            id,
            title,
            quantity,
            unit,
            expiry_date,
            status,
        } => {
            guard(&client, Some(UserType::Restaurant))?;
            let mut view = ListingsView::new();
            view.update(
                &client,
                id,
                &ListingUpdate {
                    title,
                    quantity,
                    quantity_unit: unit,
                    expiry_date,
                    status: status.map(Into::into),
                    ..Default::default()
                },
            );
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            view.items.iter().for_each(print_offer);
        }
        Command::DeleteListing { id } => {
            guard(&client, Some(UserType::Restaurant))?;
            let mut view = ListingsView::new();
            view.delete(&client, id);
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            println!("Listing #{} deleted", id);
        }
        Command::Offers => {
            guard(&client, Some(UserType::Charity))?;
            let mut view = OffersView::new();
            view.load(&client);
            if !view.error.is_empty() {
                return Err(view.error.into());
            }
            print_notice(view.source);
            for offer in &view.offers {
                print_offer(offer);
            }
        }
        Command::Claim { id } => {
            guard(&client, Some(UserType::Charity))?;
            let mut view = OffersView::new();
            if !view.claim(&client, id) {
                return Err(view.error.into());
            }
            println!("Offer #{} claimed", id);
        }
        Command::Account { action } => {
            let session = guard(&client, None)?;
            let mut view = match AccountView::open(&client, session.user_type)? {
                Ok(view) => view,
                Err(route) => return Err(format!("please log in first ({})", route).into()),
            };
            if let Some(AccountAction::Edit {
                name,
                email,
                phone,
                address,
            }) = action
            {
                view.edit();
                for (field, value) in [
                    ("name", name),
                    ("email", email),
                    ("phone", phone),
                    ("address", address),
                ] {
                    if let Some(value) = value {
                        view.handle_input(field, &value);
                    }
                }
                if !view.save(&client) {
                    let mut messages: Vec<String> = view.errors.values().cloned().collect();
                    if !view.error.is_empty() {
                        messages.push(view.error.clone());
                    }
                    return Err(messages.join("\n").into());
                }
                println!("Profile updated");
            }
            let form = &view.form;
            println!("Name:    {}", form.name);
            println!("Email:   {}", form.email);
            println!("Phone:   {}", form.phone);
            println!("Address: {}", form.address);
            if let Some(description) = &view.user.description {
                println!("About:   {}", description);
            }
            for (key, value) in &view.user.extra {
                println!("{}: {}", key, value);
            }
        }
    }
    Ok(())
}

/// Stop unless someone with the right role is logged in
fn guard(client: &RestClient, role: Option<UserType>) -> CliResult<Session> {
    match session::require(client.storage(), role)? {
        Ok(session) => Ok(session),
        Err(Route::Login) => Err("not logged in, run `client login` first".into()),
        Err(route) => Err(format!("this page is not available to you, go to {}", route).into()),
    }
}

fn offer_form(offer: OfferArgs) -> OfferForm {
    OfferForm {
        title: offer.title,
        description: offer.description,
        quantity: offer.quantity,
        quantity_unit: offer.unit,
        expiry_date: offer.expiry_date,
        available_date: offer.available_date,
        available_time: offer.available_time,
    }
}

fn print_notice(source: Source) {
    if source == Source::Fallback {
        println!("{}", SAMPLE_NOTICE);
    }
}

fn print_navbar(role: UserType, current: &Route) {
    let items: Vec<String> = navbar(role, &current.path())
        .into_iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.name)
            } else {
                item.name.to_string()
            }
        })
        .collect();
    println!("{}", items.join(" | "));
    println!();
}

fn print_whoami(session: &Session) {
    println!("{} ({})", session.user.username, session.user_type);
    println!("{}", session.user.email);
}

fn print_offer(offer: &nowaste::api::Offer) {
    print!(
        "#{} {} - {} {}",
        offer.id, offer.title, offer.quantity, offer.quantity_unit
    );
    if let Some(expiry) = &offer.expiry_date {
        print!(", expires {}", expiry);
    }
    println!(" [{:?}]", offer.status);
}
