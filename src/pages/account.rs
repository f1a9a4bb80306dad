use crate::api::{ProfileUpdate, User, UserType};
use crate::errors::Result;
use crate::navigation::Route;
use crate::rest::RestClient;
use crate::session;
use crate::validation::{validate_email, validate_phone};
use std::collections::BTreeMap;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Please enter a valid phone number";
pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const SAVE_FAILED: &str = "Failed to update profile";

/// Editable part of the account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&User> for ProfileForm {
    fn from(user: &User) -> Self {
        ProfileForm {
            name: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }
}

impl ProfileForm {
    /// Field errors, keyed by field name. Empty when the form can be sent.
    pub fn validate(&self) -> BTreeMap<&'static str, String> {
        let mut errors = BTreeMap::new();
        if !validate_email(&self.email) {
            errors.insert("email", INVALID_EMAIL.to_string());
        }
        if !self.phone.is_empty() && !validate_phone(&self.phone) {
            errors.insert("phone", INVALID_PHONE.to_string());
        }
        if self.address.trim().is_empty() {
            errors.insert("address", ADDRESS_REQUIRED.to_string());
        }
        errors
    }
}

/// Profile screen of the logged-in account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub role: UserType,
    /// What local storage knows about the account
    pub user: User,
    pub form: ProfileForm,
    pub errors: BTreeMap<&'static str, String>,
    /// Error not tied to a field
    pub error: String,
    pub is_editing: bool,
    pub is_saving: bool,
}

impl AccountView {
    /// Open the page for `role`, or get told where to go instead
    pub fn open(client: &RestClient, role: UserType) -> Result<std::result::Result<Self, Route>> {
        Ok(session::require(client.storage(), Some(role))?.map(|session| AccountView {
            role,
            form: ProfileForm::from(&session.user),
            user: session.user,
            errors: BTreeMap::new(),
            error: String::new(),
            is_editing: false,
            is_saving: false,
        }))
    }

    pub fn edit(&mut self) {
        self.is_editing = true;
    }

    pub fn handle_input(&mut self, name: &str, value: &str) {
        let (key, field) = match name {
            "name" => ("name", &mut self.form.name),
            "email" => ("email", &mut self.form.email),
            "phone" => ("phone", &mut self.form.phone),
            "address" => ("address", &mut self.form.address),
            _ => return,
        };
        *field = value.to_string();
        self.errors.remove(key);
    }

    /// Throw the edits away
    pub fn cancel(&mut self) {
        self.form = ProfileForm::from(&self.user);
        self.errors.clear();
        self.error.clear();
        self.is_editing = false;
    }

    /// Validate, send, and on success remember the new details locally.
    pub fn save(&mut self, client: &RestClient) -> bool {
        self.error.clear();
        self.errors = self.form.validate();
        if !self.errors.is_empty() {
            return false;
        }

        self.is_saving = true;
        let outcome = self.try_save(client);
        self.is_saving = false;

        match outcome {
            Ok(()) => {
                self.is_editing = false;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile update failed");
                self.error = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| SAVE_FAILED.to_string());
                false
            }
        }
    }

    fn try_save(&mut self, client: &RestClient) -> Result<()> {
        client.update_profile(
            self.role,
            &ProfileUpdate {
                name: self.form.name.clone(),
                email: self.form.email.clone(),
                phone: self.form.phone.clone(),
                address: self.form.address.clone(),
            },
        )?;

        let mut user = self.user.clone();
        user.username = self.form.name.clone();
        user.email = self.form.email.clone();
        user.phone = self.form.phone.clone();
        user.address = self.form.address.clone();
        session::update_cached_user(client.storage(), &user)?;
        self.user = user;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures;
    use crate::http::mock::ScriptedTransport;
    use crate::http::Response;
    use crate::storage::mock::MemoryStorage;
    use crate::storage::Storage;
    use serde_json::json;
    use std::sync::Arc;

    fn logged_in(transport: ScriptedTransport) -> (RestClient, Arc<ScriptedTransport>) {
        let storage = Arc::new(MemoryStorage::new());
        session::store_login(
            storage.as_ref(),
            "tok",
            UserType::Charity,
            &fixtures::account(UserType::Charity),
        )
        .unwrap();
        let transport = Arc::new(transport);
        (RestClient::new(transport.clone(), storage), transport)
    }

    fn open(client: &RestClient) -> AccountView {
        AccountView::open(client, UserType::Charity).unwrap().unwrap()
    }

    #[test]
    fn test_guard() {
        let client = RestClient::new(
            Arc::new(ScriptedTransport::offline()),
            Arc::new(MemoryStorage::new()),
        );
        assert_eq!(
            AccountView::open(&client, UserType::Charity).unwrap(),
            Err(Route::Login)
        );

        let (client, _) = logged_in(ScriptedTransport::offline());
        assert_eq!(
            AccountView::open(&client, UserType::Restaurant).unwrap(),
            Err(Route::Dashboard(UserType::Charity))
        );
    }

    #[test]
    fn test_validation_messages() {
        let (client, transport) = logged_in(ScriptedTransport::new(|_| Ok(Response::ok())));
        let mut view = open(&client);
        view.edit();
        view.handle_input("email", "not-an-email");
        view.handle_input("phone", "12");
        view.handle_input("address", " ");

        assert!(!view.save(&client));
        assert_eq!(view.errors.get("email").map(String::as_str), Some(INVALID_EMAIL));
        assert_eq!(view.errors.get("phone").map(String::as_str), Some(INVALID_PHONE));
        assert_eq!(view.errors.get("address").map(String::as_str), Some(ADDRESS_REQUIRED));
        assert!(view.is_editing);
        assert!(transport.sent().is_empty());

        view.handle_input("phone", "");
        assert!(!view.errors.contains_key("phone"));
        assert!(view.errors.contains_key("email"));
    }

    #[test]
    fn test_save_merges_into_cached_user() {
        let (client, transport) = logged_in(ScriptedTransport::new(|_| Ok(Response::ok())));
        let mut view = open(&client);
        view.edit();
        view.handle_input("name", "City Food Bank");
        view.handle_input("phone", "");

        assert!(view.save(&client));
        assert!(!view.is_editing);

        let sent = transport.sent();
        assert_eq!(sent[0].method, "PUT");
        assert_eq!(sent[0].path, "/charities/profile");
        assert_eq!(sent[0].bearer_token(), Some("tok"));
        let body: serde_json::Value = serde_json::from_str(&sent[0].body).unwrap();
        assert_eq!(body["name"], json!("City Food Bank"));

        let cached = client.storage().get_item(session::keys::USER_DATA).unwrap().unwrap();
        let cached: serde_json::Value = serde_json::from_str(&cached).unwrap();
        assert_eq!(cached["username"], json!("City Food Bank"));
        assert_eq!(cached["phone"], json!(""));
        assert_eq!(cached["serviceArea"], json!("Within 10 miles of city center"));
    }

    #[test]
    fn test_failed_save_keeps_cache() {
        let (client, _) = logged_in(ScriptedTransport::new(|_| {
            Ok(Response::error(400, "Email already in use"))
        }));
        let mut view = open(&client);
        view.edit();
        view.handle_input("email", "other@localfoodbank.org");

        assert!(!view.save(&client));
        assert_eq!(view.error, "Email already in use");
        assert!(view.is_editing);
        assert_eq!(view.user.email, "help@localfoodbank.org");

        view.cancel();
        assert_eq!(view.form.email, "help@localfoodbank.org");
        assert!(view.error.is_empty());
        assert!(!view.is_editing);
    }
}
