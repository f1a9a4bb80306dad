use crate::api::{User, UserType};
use crate::errors::Result;
use crate::navigation::Route;
use crate::storage::Storage;

/// Keys the session occupies in local storage
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_TYPE: &str = "userType";
    pub const USER_DATA: &str = "userData";

    /// Everything logout has to clear
    pub const ALL: [&str; 3] = [TOKEN, USER_TYPE, USER_DATA];
}

/// A logged-in user, as remembered locally
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_type: UserType,
    pub user: User,
}

/// What a page finds in storage when it opens
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Never logged in, or logged out
    Missing,
    /// Something is there but cannot be used; the reason is for logs
    Corrupted(String),
    Active(Session),
}

/// Remember a successful login
pub fn store_login(
    storage: &dyn Storage,
    token: &str,
    user_type: UserType,
    user: &User,
) -> Result<()> {
    storage.set_item(keys::TOKEN, token)?;
    storage.set_item(keys::USER_TYPE, user_type.as_str())?;
    storage.set_item(keys::USER_DATA, &serde_json::to_string(user)?)?;
    tracing::info!(%user_type, email = %user.email, "session stored");
    Ok(())
}

/// Read the session back. Never fails on bad content, that is `Corrupted`.
pub fn load(storage: &dyn Storage) -> Result<SessionState> {
    let token = storage.get_item(keys::TOKEN)?;
    let user_type = storage.get_item(keys::USER_TYPE)?;
    let user_data = storage.get_item(keys::USER_DATA)?;

    let (token, user_type, user_data) = match (token, user_type, user_data) {
        (None, None, None) => return Ok(SessionState::Missing),
        (Some(token), Some(user_type), Some(user_data)) => (token, user_type, user_data),
        _ => return Ok(SessionState::Corrupted("incomplete session".to_string())),
    };

    if token.trim().is_empty() {
        return Ok(SessionState::Corrupted("empty token".to_string()));
    }
    let user_type = match user_type.parse::<UserType>() {
        Ok(user_type) => user_type,
        Err(err) => return Ok(SessionState::Corrupted(err)),
    };
    let user = match serde_json::from_str::<User>(&user_data) {
        Ok(user) => user,
        Err(err) => return Ok(SessionState::Corrupted(format!("userData: {}", err))),
    };

    Ok(SessionState::Active(Session {
        token,
        user_type,
        user,
    }))
}

/// Bearer token to send, if any. Reads never care whether the rest is sane.
pub fn token(storage: &dyn Storage) -> Result<Option<String>> {
    Ok(storage
        .get_item(keys::TOKEN)?
        .filter(|token| !token.trim().is_empty()))
}

/// Guard every protected page goes through.
///
/// Returns the session when it is active and belongs to `role`, otherwise the
/// route to send the user to: login for a missing or broken session, their own
/// dashboard when they wandered into the other role's pages.
pub fn require(storage: &dyn Storage, role: Option<UserType>) -> Result<std::result::Result<Session, Route>> {
    Ok(match load(storage)? {
        SessionState::Active(session) => match role {
            Some(role) if role != session.user_type => Err(Route::Dashboard(session.user_type)),
            _ => Ok(session),
        },
        SessionState::Missing => Err(Route::Login),
        SessionState::Corrupted(reason) => {
            tracing::warn!(%reason, "ignoring unusable session");
            Err(Route::Login)
        }
    })
}

/// Overwrite the cached account details
pub fn update_cached_user(storage: &dyn Storage, user: &User) -> Result<()> {
    storage.set_item(keys::USER_DATA, &serde_json::to_string(user)?)
}

/// Forget everything about the session and go back home
pub fn logout(storage: &dyn Storage) -> Result<Route> {
    for key in keys::ALL {
        storage.remove_item(key)?;
    }
    tracing::info!("logged out");
    Ok(Route::Home)
}
