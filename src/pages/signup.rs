use crate::api::{SignupRequest, User, UserType};
use crate::navigation::Route;
use crate::pages::login::error_message;
use crate::rest::RestClient;
use crate::session;
use crate::validation::{first_blank, passwords_match};

pub const SIGNUP_FAILED: &str = "Sign up failed";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// State of the registration screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub selected_type: UserType,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub address: String,
    pub phone: String,
    pub description: String,
    pub error: String,
    pub is_loading: bool,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_user_type(&mut self, user_type: UserType) {
        self.selected_type = user_type;
    }

    /// Label of the name field, which depends on the role
    pub fn name_label(&self) -> &'static str {
        match self.selected_type {
            UserType::Restaurant => "Restaurant Name",
            UserType::Charity => "Organization Name",
        }
    }

    pub fn handle_input(&mut self, name: &str, value: &str) {
        let field = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "confirmPassword" => &mut self.confirm_password,
            "address" => &mut self.address,
            "phone" => &mut self.phone,
            "description" => &mut self.description,
            _ => return,
        };
        *field = value.to_string();
        self.error.clear();
    }

    /// Local checks done before anything is sent
    pub fn validate(&self) -> Result<(), String> {
        if let Some(field) = first_blank(&[
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
            ("confirmPassword", &self.confirm_password),
            ("address", &self.address),
            ("phone", &self.phone),
        ]) {
            return Err(format!("Please fill in the {} field", field));
        }
        if !passwords_match(&self.password, &self.confirm_password) {
            return Err(PASSWORDS_DO_NOT_MATCH.to_string());
        }
        Ok(())
    }

    /// Register the account.
    ///
    /// When the API hands back a token the new user is logged in straight away
    /// and lands on their dashboard; otherwise they are sent to the login page.
    pub fn submit(&mut self, client: &RestClient) -> Option<Route> {
        self.error.clear();
        if let Err(message) = self.validate() {
            self.error = message;
            return None;
        }

        self.is_loading = true;
        let outcome = self.try_submit(client);
        self.is_loading = false;

        match outcome {
            Ok(route) => Some(route),
            Err(err) => {
                tracing::info!(error = %err, "signup rejected");
                self.error = error_message(&err, SIGNUP_FAILED);
                None
            }
        }
    }

    fn try_submit(&self, client: &RestClient) -> crate::errors::Result<Route> {
        let response = client.signup(&SignupRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            description: self.description.clone(),
            user_type: self.selected_type,
        })?;

        let Some(token) = response.token else {
            return Ok(Route::Login);
        };
        let user = response.user.unwrap_or_else(|| User {
            username: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            user_type: Some(self.selected_type),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            ..Default::default()
        });
        session::store_login(client.storage(), &token, self.selected_type, &user)?;
        Ok(Route::Dashboard(self.selected_type))
    }
}
