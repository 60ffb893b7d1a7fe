use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, SqliteConnection, types::Json};
use time::{OffsetDateTime, macros::format_description};

use crate::{AppError, AppResult, patch::EventPatch};

use super::{DocId, Store, UpdateOutcome};

const EVENT_COLUMNS: &str = "id,name,organiser,preview,longitude,latitude,participants,settings,images,active,chat,created_at";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub duration: String,
    pub min_participant: String,
    pub max_participant: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub theme_color: String,
    pub description: String,
    pub start_time: String,
}

impl EventSettings {
    /// Mutable handle to a setting by its wire name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        Some(match name {
            "duration" => &mut self.duration,
            "min_participant" => &mut self.min_participant,
            "max_participant" => &mut self.max_participant,
            "type" => &mut self.kind,
            "theme_color" => &mut self.theme_color,
            "description" => &mut self.description,
            "start_time" => &mut self.start_time,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    #[serde(rename = "_id")]
    #[sqlx(try_from = "String")]
    pub id: DocId,
    pub name: String,
    /// Email of the hosting profile.
    pub organiser: String,
    pub preview: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Emails of participating profiles.
    #[sqlx(json)]
    pub participants: Vec<String>,
    #[sqlx(json)]
    pub settings: EventSettings,
    #[sqlx(json)]
    pub images: Vec<Value>,
    pub active: String,
    pub chat: String,
    pub created_at: String,
}

/// Submission form for a new event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewEvent {
    pub name: String,
    pub organiser: String,
    pub preview: String,
    pub longitude: f64,
    pub latitude: f64,
    pub participants: Vec<String>,
    pub settings: EventSettings,
    pub images: Vec<Value>,
}

impl NewEvent {
    pub fn into_event(self, created_at: OffsetDateTime) -> AppResult<Event> {
        let created_at = created_at
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .context("formatting event timestamp")?;

        Ok(Event {
            id: DocId::generate(),
            name: self.name,
            organiser: self.organiser,
            preview: self.preview,
            longitude: self.longitude,
            latitude: self.latitude,
            participants: self.participants,
            settings: self.settings,
            images: self.images,
            active: "false".to_owned(),
            chat: String::new(),
            created_at,
        })
    }
}

pub(crate) async fn fetch_event(conn: &mut SqliteConnection, id: &DocId) -> sqlx::Result<Option<Event>> {
    sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id=?"))
        .bind(id.as_str())
        .fetch_optional(&mut *conn)
        .await
}

pub(crate) async fn require_event(conn: &mut SqliteConnection, id: &DocId) -> AppResult<Event> {
    fetch_event(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no event with id {id}")))
}

async fn save_event(conn: &mut SqliteConnection, event: &Event) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE events SET name=?,organiser=?,preview=?,longitude=?,latitude=?,participants=?,settings=?,images=?,active=?,chat=? WHERE id=?",
    )
    .bind(&event.name)
    .bind(&event.organiser)
    .bind(&event.preview)
    .bind(event.longitude)
    .bind(event.latitude)
    .bind(Json(&event.participants))
    .bind(Json(&event.settings))
    .bind(Json(&event.images))
    .bind(&event.active)
    .bind(&event.chat)
    .bind(event.id.as_str())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub(crate) async fn delete_event(conn: &mut SqliteConnection, id: &DocId) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM events WHERE id=?")
        .bind(id.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

impl Store {
    /// The whole collection in insertion order.
    pub async fn list_events(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn event_by_id(&self, id: &DocId) -> AppResult<Event> {
        let mut conn = self.pool.acquire().await?;
        require_event(&mut conn, id).await
    }

    pub async fn insert_event(&self, event: &Event) -> AppResult<()> {
        sqlx::query(&format!("INSERT INTO events ({EVENT_COLUMNS}) VALUES (?,?,?,?,?,?,?,?,?,?,?,?)"))
            .bind(event.id.as_str())
            .bind(&event.name)
            .bind(&event.organiser)
            .bind(&event.preview)
            .bind(event.longitude)
            .bind(event.latitude)
            .bind(Json(&event.participants))
            .bind(Json(&event.settings))
            .bind(Json(&event.images))
            .bind(&event.active)
            .bind(&event.chat)
            .bind(&event.created_at)
            .execute(&self.pool)
            .await?;

        tracing::info!(id = %event.id, organiser = %event.organiser, "event created");
        Ok(())
    }

    pub async fn update_event(&self, id: &DocId, patch: &EventPatch) -> AppResult<UpdateOutcome> {
        let mut tx = self.begin_write().await?;
        let Some(mut event) = fetch_event(&mut tx, id).await? else {
            return Ok(UpdateOutcome::NoMatch);
        };

        patch.apply(&mut event);
        save_event(&mut tx, &event).await?;
        tx.commit().await?;

        tracing::debug!(%id, fields = ?patch.field_names(), "event updated");
        Ok(UpdateOutcome::Matched)
    }
}
