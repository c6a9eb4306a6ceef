use std::convert::From;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::model::Snapshot;

/// Every event the server pushes to a table viewer.
///
/// On the wire an event is a JSON text frame of the form
/// `{"event": "config", "data": {...}}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum Event {
    #[serde(rename = "config")]
    Config(Snapshot),
}

/// Every message a producer may send to the server.
///
/// Binary frames carry bincode, text frames carry JSON.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Publication {
    /// Replace the table state shown to every viewer.
    Snapshot(Snapshot),
    /// The producer is done; end its session.
    Close,
}

// Auxillary macro for wrapping payloads into their message types.

macro_rules! derive_from {
    ($to:ident, $ty:ident, $r:ident) => {
        impl From<$r> for $to {
            fn from(r: $r) -> Self {
                $to::$ty(r)
            }
        }
    };
}

derive_from!(Event, Config, Snapshot);
derive_from!(Publication, Snapshot, Snapshot);

#[derive(Debug, Snafu)]
pub enum CodecError {
    #[snafu(display("malformed JSON message: {}", source))]
    Json { source: serde_json::Error },
    #[snafu(display("malformed binary message: {}", source))]
    Binary { source: bincode::Error },
}

impl Event {
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).context(JsonSnafu)
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        serde_json::from_str(text).context(JsonSnafu)
    }
}

impl Publication {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(self).context(BinarySnafu)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(data).context(BinarySnafu)
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).context(JsonSnafu)
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        serde_json::from_str(text).context(JsonSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_event_uses_named_envelope() {
        let event = Event::from(Snapshot::default());
        let text = event.to_json().expect("event to encode");
        assert!(text.starts_with(r#"{"event":"config","data":{"#));
        assert_eq!(Event::from_json(&text).expect("event to decode"), event);
    }

    #[test]
    fn config_event_decodes_a_bare_record() {
        let event = Event::from_json(
            r#"{"event": "config", "data": {"hole_cards": [["As", "Kd"]], "button": 0, "pot": 7}}"#,
        )
        .expect("event to decode");
        let Event::Config(snapshot) = event;
        assert_eq!(snapshot.pot, 7);
        assert!(snapshot.hand().is_some());
    }

    #[test]
    fn unknown_event_names_are_rejected() {
        assert!(Event::from_json(r#"{"event": "chat", "data": {}}"#).is_err());
    }

    #[test]
    fn publication_survives_bincode() {
        let snapshot = Snapshot {
            hole_cards: Some(vec![vec!["Ah".into(), "Ad".into()], vec![]]),
            community_cards: vec!["??".into(), "2c".into()],
            button: Some(1),
            pot: 20,
            street_commits: Some(vec![10, 10]),
            stacks: None,
        };
        let publication = Publication::from(snapshot);
        let bytes = publication.to_bytes().expect("publication to encode");
        assert_eq!(
            Publication::from_bytes(&bytes).expect("publication to decode"),
            publication
        );
        assert!(Publication::from_bytes(&[0xff, 0xff]).is_err());
    }

    #[test]
    fn close_is_a_plain_string_in_json() {
        assert_eq!(
            Publication::from_json(r#""close""#).expect("close to decode"),
            Publication::Close
        );
    }
}
