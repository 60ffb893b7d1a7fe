mod login;
mod logout;
mod password;
mod register;

use axum::{Router, routing::post};
use serde::Deserialize;

use crate::{AppError, AppResult, AppState, Store, db::Profile};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/users", post(register::register))
}

/// Body of both registration and login. `username` is the account email.
#[derive(Debug, Deserialize)]
pub(crate) struct Credentials {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
}

impl Credentials {
    fn validate(&self) -> AppResult<()> {
        require_credentials(&self.username, &self.password)
    }
}

fn require_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err("username is required".into());
    }
    if password.is_empty() {
        return Err("password is required".into());
    }
    Ok(())
}

/// Creates the user and its default profile together. Both credentials must
/// be non-empty.
pub async fn register_user(store: &Store, email: &str, password: &str) -> AppResult<Profile> {
    require_credentials(email, password)?;

    let secret = password.to_owned();
    let password_hash = password::blocking(move || password::hash(&secret)).await?;
    store.create_account(email, &password_hash).await
}

pub async fn check_credentials(store: &Store, email: &str, password: &str) -> AppResult<()> {
    let Some(stored) = store.password_hash(email).await? else {
        return Err(AppError::NotFound(format!("no user registered as {email}")));
    };

    let secret = password.to_owned();
    if password::blocking(move || password::verify(&secret, &stored)).await? {
        Ok(())
    } else {
        Err(AppError::Authentication("incorrect password".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registration_creates_user_and_default_profile() {
        let store = Store::in_memory().await.unwrap();
        let profile = register_user(&store, "ada@example.com", "pw").await.unwrap();

        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.username, "default");
        assert!(profile.event_participated.is_empty());
        assert!(profile.event_hosted.is_empty());
        assert!(profile.event_history.is_empty());
        assert_eq!(profile.health_status, "negative");
        assert_eq!(profile.avatar, "");

        assert_eq!(store.profile_by_email("ada@example.com").await.unwrap(), profile);
        let stored = store.password_hash("ada@example.com").await.unwrap().unwrap();
        assert_ne!(stored, "pw");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let store = Store::in_memory().await.unwrap();
        register_user(&store, "ada@example.com", "pw").await.unwrap();

        let err = register_user(&store, "ada@example.com", "other").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_outcomes() {
        let store = Store::in_memory().await.unwrap();
        register_user(&store, "ada@example.com", "pw").await.unwrap();

        check_credentials(&store, "ada@example.com", "pw").await.unwrap();
        assert!(matches!(
            check_credentials(&store, "ada@example.com", "nope").await,
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            check_credentials(&store, "bob@example.com", "pw").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn registration_rejects_empty_credentials() {
        let store = Store::in_memory().await.unwrap();

        for (email, secret) in [("", ""), ("", "pw"), ("ada@example.com", "")] {
            let err = register_user(&store, email, secret).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{email:?}/{secret:?}: {err}");
        }
        assert_eq!(store.password_hash("").await.unwrap(), None);
        assert_eq!(store.password_hash("ada@example.com").await.unwrap(), None);
    }

    #[test]
    fn credentials_are_required() {
        let creds = Credentials { username: String::new(), password: "pw".into() };
        assert!(creds.validate().is_err());
        let creds = Credentials { username: "ada".into(), password: String::new() };
        assert!(creds.validate().is_err());
    }
}
