//! Codec for the JSON-array control messages exchanged with relays.
//!
//! Every frame is a JSON array whose first element is an ASCII label.
//! Dispatch matches the label bytes before the first comma by substring, so
//! nonconforming relays that prepend whitespace still parse. Serialization is
//! bit-exact: no interior whitespace, no HTML escaping, bare `true`/`false`
//! literals.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::event::Event;
use crate::filter::{Filter, Filters};

/// The AUTH envelope carries either a relay challenge or the client's signed
/// response event, discriminated by the JSON type of element 1.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPayload {
    Challenge(String),
    Event(Box<Event>),
}

/// A parsed relay control message.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `["EVENT", <sub id?>, <event>...]`. The subscription id may be absent
    /// (bare publish) and relays may batch several events in one frame.
    Event {
        subscription_id: Option<String>,
        events: Vec<Event>,
    },
    /// `["REQ", <sub id>, <filter>...]` with at least one filter.
    Req {
        subscription_id: String,
        filters: Filters,
    },
    /// `["COUNT", <sub id>, ...]`: filters on the request path, a
    /// `{"count": n, "hll"?: <512 hex>}` object on the response path.
    Count {
        subscription_id: String,
        filters: Filters,
        count: Option<i64>,
        hyperloglog: Option<Vec<u8>>,
    },
    /// `["NOTICE", <text>]`
    Notice(String),
    /// `["EOSE", <sub id>]`
    Eose(String),
    /// `["CLOSE", <sub id>]`
    Close(String),
    /// `["CLOSED", <sub id>, <reason>]`
    Closed {
        subscription_id: String,
        reason: String,
    },
    /// `["OK", <event id>, <accepted>, <reason>]`
    Ok {
        event_id: String,
        ok: bool,
        reason: String,
    },
    /// `["AUTH", <challenge | signed event>]`
    Auth(AuthPayload),
}

impl Envelope {
    /// The wire label for this envelope.
    pub fn label(&self) -> &'static str {
        match self {
            Envelope::Event { .. } => "EVENT",
            Envelope::Req { .. } => "REQ",
            Envelope::Count { .. } => "COUNT",
            Envelope::Notice(_) => "NOTICE",
            Envelope::Eose(_) => "EOSE",
            Envelope::Close(_) => "CLOSE",
            Envelope::Closed { .. } => "CLOSED",
            Envelope::Ok { .. } => "OK",
            Envelope::Auth(_) => "AUTH",
        }
    }

    /// Parse one frame. Unknown labels yield [`Error::UnknownMessage`],
    /// recognized labels with malformed payloads [`Error::ParseMessage`].
    pub fn parse(message: &str) -> Result<Envelope> {
        let comma = message.find(',').ok_or(Error::UnknownMessage)?;
        let label = &message[..comma];

        let arr = match serde_json::from_str::<Value>(message) {
            Ok(Value::Array(arr)) => arr,
            Ok(_) => return Err(Error::ParseMessage("not a JSON array".to_string())),
            Err(e) => return Err(Error::ParseMessage(e.to_string())),
        };

        // CLOSED must be probed before CLOSE: the labels overlap.
        if label.contains("EVENT") {
            parse_event(arr)
        } else if label.contains("REQ") {
            parse_req(arr)
        } else if label.contains("COUNT") {
            parse_count(arr)
        } else if label.contains("NOTICE") {
            Ok(Envelope::Notice(string_at(&arr, 1, "NOTICE")?))
        } else if label.contains("EOSE") {
            Ok(Envelope::Eose(string_at(&arr, 1, "EOSE")?))
        } else if label.contains("OK") {
            parse_ok(arr)
        } else if label.contains("AUTH") {
            parse_auth(arr)
        } else if label.contains("CLOSED") {
            parse_closed(arr)
        } else if label.contains("CLOSE") {
            if arr.len() == 2 {
                Ok(Envelope::Close(string_at(&arr, 1, "CLOSE")?))
            } else {
                Err(Error::ParseMessage("failed to decode CLOSE".to_string()))
            }
        } else {
            Err(Error::UnknownMessage)
        }
    }

    /// Serialize to the exact wire form.
    pub fn to_json(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str("[\"");
        out.push_str(self.label());
        out.push('"');

        match self {
            Envelope::Event {
                subscription_id,
                events,
            } => {
                if let Some(id) = subscription_id {
                    out.push(',');
                    out.push_str(&serde_json::to_string(id)?);
                }
                for event in events {
                    out.push(',');
                    out.push_str(&serde_json::to_string(event)?);
                }
            }
            Envelope::Req {
                subscription_id,
                filters,
            } => {
                out.push(',');
                out.push_str(&serde_json::to_string(subscription_id)?);
                for filter in filters.iter() {
                    out.push(',');
                    out.push_str(&serde_json::to_string(filter)?);
                }
            }
            Envelope::Count {
                subscription_id,
                filters,
                count,
                hyperloglog,
            } => {
                out.push(',');
                out.push_str(&serde_json::to_string(subscription_id)?);
                if let Some(count) = count {
                    out.push_str(",{\"count\":");
                    out.push_str(&count.to_string());
                    if let Some(hll) = hyperloglog {
                        out.push_str(",\"hll\":\"");
                        out.push_str(&hex::encode(hll));
                        out.push('"');
                    }
                    out.push('}');
                } else {
                    for filter in filters.iter() {
                        out.push(',');
                        out.push_str(&serde_json::to_string(filter)?);
                    }
                }
            }
            Envelope::Notice(text) => {
                out.push(',');
                out.push_str(&serde_json::to_string(text)?);
            }
            Envelope::Eose(id) | Envelope::Close(id) => {
                out.push(',');
                out.push_str(&serde_json::to_string(id)?);
            }
            Envelope::Closed {
                subscription_id,
                reason,
            } => {
                out.push(',');
                out.push_str(&serde_json::to_string(subscription_id)?);
                out.push(',');
                out.push_str(&serde_json::to_string(reason)?);
            }
            Envelope::Ok {
                event_id,
                ok,
                reason,
            } => {
                out.push(',');
                out.push_str(&serde_json::to_string(event_id)?);
                out.push(',');
                out.push_str(if *ok { "true" } else { "false" });
                out.push(',');
                out.push_str(&serde_json::to_string(reason)?);
            }
            Envelope::Auth(payload) => {
                out.push(',');
                match payload {
                    AuthPayload::Challenge(challenge) => {
                        out.push_str(&serde_json::to_string(challenge)?)
                    }
                    AuthPayload::Event(event) => out.push_str(&serde_json::to_string(event)?),
                }
            }
        }

        out.push(']');
        Ok(out)
    }
}

fn string_at(arr: &[Value], index: usize, label: &str) -> Result<String> {
    match arr.get(index) {
        Some(v) => Ok(v.as_str().unwrap_or_default().to_string()),
        None => Err(Error::ParseMessage(format!("failed to decode {label}"))),
    }
}

fn parse_event(arr: Vec<Value>) -> Result<Envelope> {
    match arr.len() {
        0 | 1 => Err(Error::ParseMessage(format!(
            "failed to decode EVENT: unknown array len: {}",
            arr.len()
        ))),
        // No subscription id: ["EVENT", event].
        2 => {
            let mut arr = arr;
            let event = event_from_value(arr.remove(1), 0)?;
            Ok(Envelope::Event {
                subscription_id: None,
                events: vec![event],
            })
        }
        // ["EVENT", <sub id | null>?, <event>, <event>...]
        _ => {
            let mut items = arr.into_iter().skip(1).peekable();
            let subscription_id = match items.peek() {
                Some(Value::String(_)) => match items.next() {
                    Some(Value::String(id)) => Some(id),
                    _ => None,
                },
                Some(Value::Null) => {
                    items.next();
                    None
                }
                _ => None,
            };
            let events = items
                .enumerate()
                .map(|(i, v)| event_from_value(v, i))
                .collect::<Result<Vec<Event>>>()?;
            Ok(Envelope::Event {
                subscription_id,
                events,
            })
        }
    }
}

fn event_from_value(value: Value, index: usize) -> Result<Event> {
    serde_json::from_value(value)
        .map_err(|e| Error::ParseMessage(format!("{e} -- on event {index}")))
}

fn filters_from(arr: Vec<Value>, skip: usize, label: &str) -> Result<Filters> {
    arr.into_iter()
        .skip(skip)
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value::<Filter>(v)
                .map_err(|e| Error::ParseMessage(format!("{e} -- on {label} filter {i}")))
        })
        .collect()
}

fn parse_req(arr: Vec<Value>) -> Result<Envelope> {
    if arr.len() < 3 {
        return Err(Error::ParseMessage(
            "failed to decode REQ: missing filters".to_string(),
        ));
    }
    let subscription_id = arr[1].as_str().unwrap_or_default().to_string();
    let filters = filters_from(arr, 2, "REQ")?;
    Ok(Envelope::Req {
        subscription_id,
        filters,
    })
}

fn parse_count(arr: Vec<Value>) -> Result<Envelope> {
    if arr.len() < 3 {
        return Err(Error::ParseMessage(
            "failed to decode COUNT: missing filters".to_string(),
        ));
    }
    let subscription_id = arr[1].as_str().unwrap_or_default().to_string();

    if let Some(count) = arr[2].get("count").and_then(Value::as_i64) {
        // HLL payloads are 256 bytes as 512 hex chars; anything else is
        // silently ignored and only the count survives.
        let hyperloglog = match arr[2].get("hll").and_then(Value::as_str) {
            Some(hll) if hll.len() == 512 => Some(hex::decode(hll).map_err(|e| {
                Error::ParseMessage(format!("invalid \"hll\" value in COUNT message: {e}"))
            })?),
            _ => None,
        };
        return Ok(Envelope::Count {
            subscription_id,
            filters: Filters::default(),
            count: Some(count),
            hyperloglog,
        });
    }

    let filters = filters_from(arr, 2, "COUNT")?;
    Ok(Envelope::Count {
        subscription_id,
        filters,
        count: None,
        hyperloglog: None,
    })
}

fn parse_closed(arr: Vec<Value>) -> Result<Envelope> {
    if arr.len() != 3 {
        return Err(Error::ParseMessage("failed to decode CLOSED".to_string()));
    }
    Ok(Envelope::Closed {
        subscription_id: arr[1].as_str().unwrap_or_default().to_string(),
        reason: arr[2].as_str().unwrap_or_default().to_string(),
    })
}

fn parse_ok(arr: Vec<Value>) -> Result<Envelope> {
    if arr.len() < 4 {
        return Err(Error::ParseMessage(
            "failed to decode OK: missing fields".to_string(),
        ));
    }
    Ok(Envelope::Ok {
        event_id: arr[1].as_str().unwrap_or_default().to_string(),
        ok: arr[2].as_bool() == Some(true),
        reason: arr[3].as_str().unwrap_or_default().to_string(),
    })
}

fn parse_auth(arr: Vec<Value>) -> Result<Envelope> {
    if arr.len() < 2 {
        return Err(Error::ParseMessage(
            "failed to decode AUTH: missing fields".to_string(),
        ));
    }
    let payload = if arr[1].is_object() {
        let mut arr = arr;
        AuthPayload::Event(Box::new(event_from_value(arr.remove(1), 0)?))
    } else {
        AuthPayload::Challenge(arr[1].as_str().unwrap_or_default().to_string())
    };
    Ok(Envelope::Auth(payload))
}
