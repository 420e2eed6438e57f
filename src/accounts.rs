// User account creation and credential handling. Usernames derive from the
// email local-part; passwords are stored as bcrypt hashes only.

use crate::db::models::{new_id, now, User};
use crate::store::{EntityStore, StoreError};

pub const USERNAME_MAX_LEN: usize = 30;

const USERNAME_TAKEN: &str = "Somebody already uses this username. How else do they call you? :)";
const EMAIL_TAKEN: &str = "An account with this email already exists.";

/// Fields accepted when creating a user. `username` overrides derivation
/// from the email local-part when set.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub experience_id: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_trainer: bool,
}

/// Trims and lowercases the domain part; the local part is preserved.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Derives a username from the email local-part: lowercased and stripped to
/// `[a-z0-9._-]`. Deterministic for a given email.
pub fn normalize_username(email: &str) -> Result<String, StoreError> {
    let normalized = normalize_email(email);
    let local = normalized.split('@').next().unwrap_or_default();
    let candidate: String = local
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    validate_username(&candidate)?;
    Ok(candidate)
}

fn validate_username(username: &str) -> Result<(), StoreError> {
    if username.is_empty() {
        return Err(StoreError::InvalidUsername("username is empty".to_string()));
    }
    if username.len() > USERNAME_MAX_LEN {
        return Err(StoreError::InvalidUsername(format!(
            "username exceeds {} characters",
            USERNAME_MAX_LEN
        )));
    }
    Ok(())
}

/// Creates a user: normalizes the email, derives the username, hashes the
/// password and persists. Duplicate email or username surfaces as a
/// `Conflict` with a field-specific message.
pub fn create_user(store: &EntityStore, new: NewUser) -> Result<User, StoreError> {
    let email = normalize_email(&new.email);
    let username = match new.username {
        Some(explicit) => {
            validate_username(&explicit)?;
            explicit
        }
        None => normalize_username(&email)?,
    };
    let password_hash = bcrypt::hash(&new.password, bcrypt::DEFAULT_COST)?;

    let ts = now();
    let user = User {
        id: new_id(),
        email,
        username,
        password_hash,
        first_name: new.first_name,
        last_name: new.last_name,
        state: new.state,
        city: new.city,
        latitude: new.latitude,
        longitude: new.longitude,
        experience_id: new.experience_id,
        is_staff: new.is_staff,
        is_superuser: new.is_superuser,
        is_trainer: new.is_trainer,
        is_active: true,
        created_at: ts.clone(),
        updated_at: ts,
    };

    match store.create(&user) {
        Ok(()) => {
            tracing::info!(username = %user.username, "created user");
            Ok(user)
        }
        Err(StoreError::Conflict { constraint, .. }) if constraint == "users.username" => {
            Err(StoreError::Conflict {
                constraint,
                message: USERNAME_TAKEN.to_string(),
            })
        }
        Err(StoreError::Conflict { constraint, .. }) if constraint == "users.email" => {
            Err(StoreError::Conflict {
                constraint,
                message: EMAIL_TAKEN.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// `create_user` with the staff and superuser flags forced on.
pub fn create_superuser(
    store: &EntityStore,
    email: &str,
    password: &str,
) -> Result<User, StoreError> {
    create_user(
        store,
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            is_staff: true,
            is_superuser: true,
            ..NewUser::default()
        },
    )
}

/// Verifies a candidate password against the stored hash.
pub fn verify_password(user: &User, candidate: &str) -> bool {
    bcrypt::verify(candidate, &user.password_hash).unwrap_or(false)
}
