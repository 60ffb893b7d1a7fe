//! Typed partial updates parsed from a JSON `query` mapping.
//!
//! Every key in the mapping becomes one field assignment. Keys are applied in
//! lexicographic order, and a single bad key rejects the whole patch.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    AppError, AppResult,
    db::{Event, EventSettings, Profile},
};

fn parse_value<T: DeserializeOwned>(key: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::Validation(format!("invalid value for `{key}`: {e}")))
}

fn into_object(value: Value) -> AppResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Validation(format!("expected an object of fields, got {other}"))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileField {
    Username(String),
    PushToken(String),
    HealthStatus(String),
    Avatar(String),
    EventParticipated(Vec<String>),
    EventHosted(Vec<String>),
    EventHistory(Vec<String>),
}

impl ProfileField {
    pub fn parse(key: &str, value: Value) -> AppResult<ProfileField> {
        use ProfileField::*;
        Ok(match key {
            "username" => Username(parse_value(key, value)?),
            "push_token" => PushToken(parse_value(key, value)?),
            "health_status" => HealthStatus(parse_value(key, value)?),
            "avatar" => Avatar(parse_value(key, value)?),
            "event_participated" => EventParticipated(parse_value(key, value)?),
            "event_hosted" => EventHosted(parse_value(key, value)?),
            "event_history" => EventHistory(parse_value(key, value)?),
            _ => return Err(AppError::Validation(format!("profile field `{key}` cannot be updated"))),
        })
    }

    pub fn name(&self) -> &'static str {
        use ProfileField::*;
        match self {
            Username(_) => "username",
            PushToken(_) => "push_token",
            HealthStatus(_) => "health_status",
            Avatar(_) => "avatar",
            EventParticipated(_) => "event_participated",
            EventHosted(_) => "event_hosted",
            EventHistory(_) => "event_history",
        }
    }

    fn apply(&self, profile: &mut Profile) {
        use ProfileField::*;
        match self.clone() {
            Username(v) => profile.username = v,
            PushToken(v) => profile.push_token = v,
            HealthStatus(v) => profile.health_status = v,
            Avatar(v) => profile.avatar = v,
            EventParticipated(v) => profile.event_participated = v,
            EventHosted(v) => profile.event_hosted = v,
            EventHistory(v) => profile.event_history = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePatch(Vec<ProfileField>);

impl ProfilePatch {
    pub fn apply(&self, profile: &mut Profile) {
        for field in &self.0 {
            field.apply(profile);
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.0.iter().map(ProfileField::name).collect()
    }
}

impl TryFrom<Map<String, Value>> for ProfilePatch {
    type Error = AppError;

    fn try_from(query: Map<String, Value>) -> AppResult<Self> {
        if query.is_empty() {
            return Err("update query is empty".into());
        }
        let mut query: Vec<_> = query.into_iter().collect();
        query.sort_by(|(a, _), (b, _)| a.cmp(b));

        query
            .into_iter()
            .map(|(key, value)| ProfileField::parse(&key, value))
            .collect::<AppResult<Vec<_>>>()
            .map(ProfilePatch)
    }
}

impl TryFrom<Value> for ProfilePatch {
    type Error = AppError;

    fn try_from(value: Value) -> AppResult<Self> {
        into_object(value)?.try_into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventField {
    Name(String),
    Organiser(String),
    Preview(String),
    Longitude(f64),
    Latitude(f64),
    Participants(Vec<String>),
    Settings(EventSettings),
    /// One entry of the settings object, addressed as `settings.<name>`.
    Setting(String, String),
    Images(Vec<Value>),
    Active(String),
    Chat(String),
}

impl EventField {
    pub fn parse(key: &str, value: Value) -> AppResult<EventField> {
        use EventField::*;
        if let Some(setting) = key.strip_prefix("settings.") {
            if EventSettings::default().field_mut(setting).is_none() {
                return Err(AppError::Validation(format!("unknown event setting `{setting}`")));
            }
            return Ok(Setting(setting.to_owned(), parse_value(key, value)?));
        }

        Ok(match key {
            "name" => Name(parse_value(key, value)?),
            "organiser" => Organiser(parse_value(key, value)?),
            "preview" => Preview(parse_value(key, value)?),
            "longitude" => Longitude(parse_value(key, value)?),
            "latitude" => Latitude(parse_value(key, value)?),
            "participants" => Participants(parse_value(key, value)?),
            "settings" => Settings(parse_value(key, value)?),
            "images" => Images(parse_value(key, value)?),
            "active" => Active(parse_value(key, value)?),
            "chat" => Chat(parse_value(key, value)?),
            _ => return Err(AppError::Validation(format!("event field `{key}` cannot be updated"))),
        })
    }

    pub fn name(&self) -> &'static str {
        use EventField::*;
        match self {
            Name(_) => "name",
            Organiser(_) => "organiser",
            Preview(_) => "preview",
            Longitude(_) => "longitude",
            Latitude(_) => "latitude",
            Participants(_) => "participants",
            Settings(_) => "settings",
            Setting(..) => "settings.*",
            Images(_) => "images",
            Active(_) => "active",
            Chat(_) => "chat",
        }
    }

    fn apply(&self, event: &mut Event) {
        use EventField::*;
        match self.clone() {
            Name(v) => event.name = v,
            Organiser(v) => event.organiser = v,
            Preview(v) => event.preview = v,
            Longitude(v) => event.longitude = v,
            Latitude(v) => event.latitude = v,
            Participants(v) => event.participants = v,
            Settings(v) => event.settings = v,
            Setting(name, v) => {
                if let Some(slot) = event.settings.field_mut(&name) {
                    *slot = v;
                }
            }
            Images(v) => event.images = v,
            Active(v) => event.active = v,
            Chat(v) => event.chat = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventPatch(Vec<EventField>);

impl EventPatch {
    pub fn single(field: EventField) -> EventPatch {
        EventPatch(vec![field])
    }

    pub fn apply(&self, event: &mut Event) {
        for field in &self.0 {
            field.apply(event);
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.0.iter().map(EventField::name).collect()
    }
}

impl TryFrom<Map<String, Value>> for EventPatch {
    type Error = AppError;

    fn try_from(query: Map<String, Value>) -> AppResult<Self> {
        if query.is_empty() {
            return Err("update query is empty".into());
        }
        let mut query: Vec<_> = query.into_iter().collect();
        query.sort_by(|(a, _), (b, _)| a.cmp(b));

        query
            .into_iter()
            .map(|(key, value)| EventField::parse(&key, value))
            .collect::<AppResult<Vec<_>>>()
            .map(EventPatch)
    }
}

impl TryFrom<Value> for EventPatch {
    type Error = AppError;

    fn try_from(value: Value) -> AppResult<Self> {
        into_object(value)?.try_into()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::OffsetDateTime;

    use super::*;
    use crate::db::NewEvent;

    fn event() -> Event {
        NewEvent { name: "Picnic".into(), ..Default::default() }
            .into_event(OffsetDateTime::UNIX_EPOCH)
            .unwrap()
    }

    #[test]
    fn single_key_changes_one_field() {
        let mut updated = event();
        let before = updated.clone();
        EventPatch::try_from(json!({"name": "X"})).unwrap().apply(&mut updated);
        assert_eq!(updated, Event { name: "X".into(), ..before });
    }

    #[test]
    fn every_key_applies_in_key_order() {
        let patch = ProfilePatch::try_from(json!({"username": "ada", "avatar": "a.png"})).unwrap();
        assert_eq!(patch.field_names(), vec!["avatar", "username"]);

        let mut profile = Profile::new_default("ada@x");
        patch.apply(&mut profile);
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.avatar, "a.png");
    }

    #[test]
    fn later_keys_win_on_overlap() {
        // "settings" sorts before "settings.type", so the single setting lands last
        let patch = EventPatch::try_from(json!({
            "settings.type": "sport",
            "settings": {"type": "social", "duration": "1h"},
        }))
        .unwrap();

        let mut updated = event();
        patch.apply(&mut updated);
        assert_eq!(updated.settings.kind, "sport");
        assert_eq!(updated.settings.duration, "1h");
    }

    #[test]
    fn rejects_unknown_and_immutable_fields() {
        for query in [json!({"_id": "x"}), json!({"email": "x"}), json!({"color": "red"})] {
            assert!(matches!(ProfilePatch::try_from(query), Err(AppError::Validation(_))));
        }
        for query in [json!({"_id": "x"}), json!({"created_at": "now"}), json!({"settings.colour": "red"})] {
            assert!(matches!(EventPatch::try_from(query), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(EventPatch::try_from(json!({"latitude": "north"})).is_err());
        assert!(ProfilePatch::try_from(json!({"event_hosted": "abc"})).is_err());
        // one bad key poisons the rest
        assert!(ProfilePatch::try_from(json!({"avatar": "ok.png", "username": 7})).is_err());
    }

    #[test]
    fn rejects_empty_and_non_objects() {
        assert!(ProfilePatch::try_from(json!({})).is_err());
        assert!(EventPatch::try_from(json!(["name", "X"])).is_err());
    }
}
