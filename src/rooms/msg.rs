use serde::{Deserialize, Serialize};

/// Frame sent by a client: `{"event": "ping", "data": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: String,
}

/// Frame sent to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ServerFrame {
    Connect(String),
    Pong(String),
    Error(String),
}

impl ServerFrame {
    pub fn greeting() -> ServerFrame {
        ServerFrame::Connect("connected".to_owned())
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"event":"error","data":"unencodable frame"}"#.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_frames_are_tagged() {
        let frame: serde_json::Value = serde_json::from_str(&ServerFrame::greeting().to_text()).unwrap();
        assert_eq!(frame, json!({"event": "connect", "data": "connected"}));

        let frame: serde_json::Value = serde_json::from_str(&ServerFrame::Pong("42".into()).to_text()).unwrap();
        assert_eq!(frame, json!({"event": "pong", "data": "42"}));
    }

    #[test]
    fn client_frames_default_missing_data() {
        let frame: ClientFrame = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(frame, ClientFrame { event: "ping".into(), data: String::new() });
    }
}
