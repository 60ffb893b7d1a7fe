use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, types::Json};

use crate::{AppError, AppResult, patch::ProfilePatch};

use super::{DocId, Store, UpdateOutcome};

const PROFILE_COLUMNS: &str = "id,username,email,event_participated,event_hosted,event_history,push_token,health_status,avatar";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    #[serde(rename = "_id")]
    #[sqlx(try_from = "String")]
    pub id: DocId,
    pub username: String,
    pub email: String,
    #[sqlx(json)]
    pub event_participated: Vec<String>,
    #[sqlx(json)]
    pub event_hosted: Vec<String>,
    #[sqlx(json)]
    pub event_history: Vec<String>,
    pub push_token: String,
    pub health_status: String,
    pub avatar: String,
}

impl Profile {
    /// The profile every new account starts with.
    pub fn new_default(email: &str) -> Profile {
        Profile {
            id: DocId::generate(),
            username: "default".to_owned(),
            email: email.to_owned(),
            event_participated: Vec::new(),
            event_hosted: Vec::new(),
            event_history: Vec::new(),
            push_token: String::new(),
            health_status: "negative".to_owned(),
            avatar: String::new(),
        }
    }
}

pub(crate) async fn fetch_profile(conn: &mut SqliteConnection, email: &str) -> sqlx::Result<Option<Profile>> {
    sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email=?"))
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
}

/// Like [`fetch_profile`], but a missing profile is an error.
pub(crate) async fn require_profile(conn: &mut SqliteConnection, email: &str) -> AppResult<Profile> {
    fetch_profile(conn, email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no profile for {email}")))
}

pub(crate) async fn insert_profile(conn: &mut SqliteConnection, profile: &Profile) -> sqlx::Result<()> {
    sqlx::query(&format!("INSERT INTO profiles ({PROFILE_COLUMNS}) VALUES (?,?,?,?,?,?,?,?,?)"))
        .bind(profile.id.as_str())
        .bind(&profile.username)
        .bind(&profile.email)
        .bind(Json(&profile.event_participated))
        .bind(Json(&profile.event_hosted))
        .bind(Json(&profile.event_history))
        .bind(&profile.push_token)
        .bind(&profile.health_status)
        .bind(&profile.avatar)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Writes every mutable field back. Identity fields (`id`, `email`) are never rewritten.
pub(crate) async fn save_profile(conn: &mut SqliteConnection, profile: &Profile) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE profiles SET username=?,event_participated=?,event_hosted=?,event_history=?,push_token=?,health_status=?,avatar=? WHERE id=?",
    )
    .bind(&profile.username)
    .bind(Json(&profile.event_participated))
    .bind(Json(&profile.event_hosted))
    .bind(Json(&profile.event_history))
    .bind(&profile.push_token)
    .bind(&profile.health_status)
    .bind(&profile.avatar)
    .bind(profile.id.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

impl Store {
    pub async fn profile_by_email(&self, email: &str) -> AppResult<Profile> {
        let mut conn = self.pool.acquire().await?;
        require_profile(&mut conn, email).await
    }

    pub async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> AppResult<UpdateOutcome> {
        let mut tx = self.begin_write().await?;
        let Some(mut profile) = fetch_profile(&mut tx, email).await? else {
            return Ok(UpdateOutcome::NoMatch);
        };

        patch.apply(&mut profile);
        save_profile(&mut tx, &profile).await?;
        tx.commit().await?;

        tracing::debug!(email, fields = ?patch.field_names(), "profile updated");
        Ok(UpdateOutcome::Matched)
    }

    /// Avatars in the same order as `emails`; fails on the first unknown email.
    pub async fn avatars<'a>(&self, emails: impl IntoIterator<Item = &'a str>) -> AppResult<Vec<String>> {
        let mut conn = self.pool.acquire().await?;
        let mut avatars = Vec::new();
        for email in emails {
            avatars.push(require_profile(&mut conn, email).await?.avatar);
        }
        Ok(avatars)
    }
}
