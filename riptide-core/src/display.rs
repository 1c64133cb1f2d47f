//! Display implementations rendering wire JSON

use std::fmt;

use crate::envelope::Envelope;
use crate::event::Event;
use crate::filter::{Filter, Filters};

/// Events print as their JSON object form.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<invalid Event>"),
        }
    }
}

/// Filters print as the object a REQ would carry.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<invalid Filter>"),
        }
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<invalid Filters>"),
        }
    }
}

/// Envelopes print exactly as they would go over the wire.
impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "<invalid Envelope>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TagMap;
    use crate::timestamp::Timestamp;

    #[test]
    fn test_display_event_is_valid_json() {
        let event = Event {
            id: "abc".to_string(),
            kind: 1,
            created_at: Timestamp(123),
            content: "hello".to_string(),
            ..Default::default()
        };

        let output = format!("{event}");
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], "abc");
        assert_eq!(parsed["kind"], 1);
    }

    #[test]
    fn test_display_filter_matches_wire_form() {
        let filter = Filter {
            kinds: vec![1],
            tags: TagMap::new().set_literals("e", ["abc"]),
            ..Default::default()
        };
        assert_eq!(format!("{filter}"), r##"{"kinds":[1],"#e":[["abc"]]}"##);
    }

    #[test]
    fn test_display_envelope() {
        let envelope = Envelope::Eose("sub1".to_string());
        assert_eq!(format!("{envelope}"), r#"["EOSE","sub1"]"#);
    }
}
