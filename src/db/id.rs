use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const ID_BYTES: usize = 12;

#[derive(Debug, Error)]
#[error("invalid document id `{0}`: expected {len} hex characters", len = ID_BYTES * 2)]
pub struct InvalidDocId(pub String);

/// 12-byte document identifier, always held as 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocId(String);

impl DocId {
    /// Leading bytes of a UUIDv7: millisecond timestamp, then counter and random bits.
    pub fn generate() -> DocId {
        let uuid = Uuid::now_v7();
        DocId(hex::encode(&uuid.as_bytes()[..ID_BYTES]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocId {
    type Err = InvalidDocId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match hex::decode(s) {
            Ok(bytes) if bytes.len() == ID_BYTES => Ok(DocId(hex::encode(bytes))),
            _ => Err(InvalidDocId(s.to_owned())),
        }
    }
}

impl TryFrom<String> for DocId {
    type Error = InvalidDocId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DocId> for String {
    fn from(id: DocId) -> String {
        id.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
