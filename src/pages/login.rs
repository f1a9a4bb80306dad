use crate::api::{LoginRequest, User, UserType};
use crate::errors::Error;
use crate::navigation::Route;
use crate::rest::RestClient;
use crate::session;

pub const LOGIN_FAILED: &str = "Login failed";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";

/// State of the login screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub user_type: UserType,
    pub email: String,
    pub password: String,
    /// Inline error, empty when there is none
    pub error: String,
    pub is_loading: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_user_type(&mut self, user_type: UserType) {
        self.user_type = user_type;
    }

    /// Record a keystroke in one of the fields. Typing clears the error.
    pub fn handle_input(&mut self, name: &str, value: &str) {
        match name {
            "email" => self.email = value.to_string(),
            "password" => self.password = value.to_string(),
            _ => return,
        }
        self.error.clear();
    }

    /// Log in. On success the session is stored and the role's dashboard is returned.
    pub fn submit(&mut self, client: &RestClient) -> Option<Route> {
        self.error.clear();
        self.is_loading = true;
        let outcome = self.try_submit(client);
        self.is_loading = false;

        match outcome {
            Ok(route) => Some(route),
            Err(err) => {
                tracing::info!(error = %err, "login rejected");
                self.error = error_message(&err, LOGIN_FAILED);
                None
            }
        }
    }

    fn try_submit(&self, client: &RestClient) -> crate::errors::Result<Route> {
        let response = client.login(&LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            user_type: self.user_type,
        })?;
        let token = response.token.ok_or(Error::NoSession)?;

        let user = response.user.unwrap_or_else(|| User {
            email: self.email.clone(),
            user_type: Some(self.user_type),
            ..Default::default()
        });
        session::store_login(client.storage(), &token, self.user_type, &user)?;
        Ok(Route::Dashboard(self.user_type))
    }
}

/// What to show for a failed auth call: the server's words if it gave any,
/// `rejected` for other HTTP refusals, a generic message otherwise.
pub(crate) fn error_message(err: &Error, rejected: &str) -> String {
    match err {
        Error::Http { message: Some(message), .. } => message.clone(),
        Error::Http { message: None, .. } | Error::NoSession => rejected.to_string(),
        _ => SOMETHING_WENT_WRONG.to_string(),
    }
}
