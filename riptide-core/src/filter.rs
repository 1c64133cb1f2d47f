//! Filter algebra: the predicate both client and relay use to decide whether
//! an event belongs to a subscription.
//!
//! Tag constraints are two-dimensional. Each tag key maps to a list of
//! *tag-value sets*; an event tag satisfies the key when it matches at least
//! one set (outer OR), and it matches a set when every non-wildcard position
//! agrees (inner AND, `None` slots ignored). `{"t": [["chess"], ["gaming",
//! "sports"]]}` therefore reads "a `t` tag valued `chess`, or one carrying
//! both `gaming` and `sports` in consecutive positions".

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event::Event;
use crate::kind::{is_addressable_kind, is_replaceable_kind};
use crate::tag::Tag;
use crate::timestamp::Timestamp;

/// One positional tag-value set. `None` is a wildcard at that position.
pub type TagValues = Vec<Option<String>>;

/// Tag key → list of tag-value sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(BTreeMap<String, Vec<TagValues>>);

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the key's sets with a single set of literal values.
    pub fn set_literals<I, S>(self, tag: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(|v| Some(v.into())).collect();
        self.set(tag, set)
    }

    /// Replace the key's sets with the given single set.
    pub fn set(mut self, tag: &str, values: TagValues) -> Self {
        self.0.insert(tag.to_string(), vec![values]);
        self
    }

    /// Add another set for the key, keeping the existing ones.
    pub fn append(mut self, tag: &str, values: TagValues) -> Self {
        self.0.entry(tag.to_string()).or_default().push(values);
        self
    }

    /// Whether any set for the key carries at least one non-wildcard value.
    pub fn has_values(&self, tag: &str) -> bool {
        self.0
            .get(tag)
            .is_some_and(|sets| sets.iter().flatten().any(Option::is_some))
    }

    /// All non-wildcard values for the key, across every set.
    pub fn all(&self, tag: &str) -> Vec<&str> {
        self.0
            .get(tag)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|v| v.as_deref())
            .collect()
    }
}

impl Deref for TagMap {
    type Target = BTreeMap<String, Vec<TagValues>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TagMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A subscription filter.
///
/// Empty collections mean "no constraint". `limit_zero` records an explicit
/// `"limit": 0` on the wire, which is distinct from an absent limit.
///
/// Equality (`PartialEq`) is semantic: `ids`, `kinds` and `authors` compare
/// as unordered sets, and `limit` is ignored except for the `limit_zero`
/// distinction, matching how relays treat filters.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub ids: Vec<String>,
    pub kinds: Vec<u16>,
    pub authors: Vec<String>,
    pub tags: TagMap,
    pub since: Option<Timestamp>,
    pub until: Option<Timestamp>,
    pub limit: usize,
    pub search: String,
    pub limit_zero: bool,
}

impl Filter {
    /// Whether the event satisfies every constraint, timestamps included.
    pub fn matches(&self, event: &Event) -> bool {
        if !self.matches_ignoring_timestamps(event) {
            return false;
        }

        if let Some(since) = self.since {
            if event.created_at < since {
                return false;
            }
        }

        if let Some(until) = self.until {
            if event.created_at > until {
                return false;
            }
        }

        true
    }

    /// Exact matching on ids, kinds, authors and tags, skipping `since`/`until`.
    pub fn matches_ignoring_timestamps(&self, event: &Event) -> bool {
        if !self.ids.is_empty() && !self.ids.contains(&event.id) {
            return false;
        }

        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
            return false;
        }

        if !self.authors.is_empty() && !self.authors.contains(&event.pubkey) {
            return false;
        }

        // Every filter key must be consumed by some event tag. A key with an
        // empty sets list matches any tag carrying that key.
        let mut unmatched: BTreeSet<&str> = self.tags.keys().map(String::as_str).collect();
        for tag in &event.tags {
            let key = tag.key();
            if !unmatched.contains(key) {
                continue;
            }
            let sets = &self.tags[key];
            let hit = sets.is_empty() || sets.iter().any(|set| tag_matches_set(tag, set));
            if !hit {
                return false;
            }
            unmatched.remove(key);
        }
        unmatched.is_empty()
    }

    /// The maximum number of events this filter can ever match, or -1 when
    /// unbounded. `limit` is deliberately ignored.
    ///
    /// A bound exists when the filter pins ids, or pins authors to kinds that
    /// relays deduplicate: replaceable kinds bound the count by
    /// `authors × kinds`, addressable kinds by `authors × kinds × d-values`.
    pub fn theoretical_limit(&self) -> i64 {
        if !self.ids.is_empty() {
            return self.ids.len() as i64;
        }

        if self.kinds.is_empty() {
            return -1;
        }

        if !self.authors.is_empty() {
            if self.kinds.iter().all(|k| is_replaceable_kind(*k)) {
                return (self.authors.len() * self.kinds.len()) as i64;
            }

            if self.kinds.iter().all(|k| is_addressable_kind(*k)) {
                let d_values = self.tags.all("d").len();
                if d_values > 0 {
                    return (self.authors.len() * self.kinds.len() * d_values) as i64;
                }
            }
        }

        -1
    }
}

fn tag_matches_set(tag: &Tag, set: &TagValues) -> bool {
    set.iter().enumerate().all(|(i, want)| match want {
        None => true,
        Some(want) => tag.get(i + 1) == Some(want.as_str()),
    })
}

fn similar<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().all(|v| b.contains(v))
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        similar(&self.kinds, &other.kinds)
            && similar(&self.ids, &other.ids)
            && similar(&self.authors, &other.authors)
            && self.tags == other.tags
            && self.since == other.since
            && self.until == other.until
            && self.search == other.search
            && self.limit_zero == other.limit_zero
    }
}

impl Eq for Filter {}

impl Serialize for Filter {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if !self.ids.is_empty() {
            map.serialize_entry("ids", &self.ids)?;
        }
        if !self.kinds.is_empty() {
            map.serialize_entry("kinds", &self.kinds)?;
        }
        if !self.authors.is_empty() {
            map.serialize_entry("authors", &self.authors)?;
        }
        if let Some(since) = self.since {
            map.serialize_entry("since", &since)?;
        }
        if let Some(until) = self.until {
            map.serialize_entry("until", &until)?;
        }
        if self.limit > 0 || self.limit_zero {
            map.serialize_entry("limit", &self.limit)?;
        }
        if !self.search.is_empty() {
            map.serialize_entry("search", &self.search)?;
        }
        for (key, sets) in self.tags.iter() {
            map.serialize_entry(&format!("#{key}"), sets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FilterVisitor;

        impl<'de> Visitor<'de> for FilterVisitor {
            type Value = Filter;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a filter object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Filter, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut filter = Filter::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "ids" => filter.ids = map.next_value()?,
                        "kinds" => filter.kinds = map.next_value()?,
                        "authors" => filter.authors = map.next_value()?,
                        "since" => filter.since = map.next_value()?,
                        "until" => filter.until = map.next_value()?,
                        "limit" => {
                            filter.limit = map.next_value()?;
                            if filter.limit == 0 {
                                filter.limit_zero = true;
                            }
                        }
                        "search" => filter.search = map.next_value()?,
                        k if k.starts_with('#') && k.len() > 1 => {
                            let raw: Vec<serde_json::Value> = map.next_value()?;
                            let sets = parse_tag_sets::<A::Error>(raw)?;
                            filter.tags.insert(k[1..].to_string(), sets);
                        }
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(filter)
            }
        }

        deserializer.deserialize_map(FilterVisitor)
    }
}

/// A `#tag` value is either one flat tag-value set or a list of sets.
fn parse_tag_sets<E: de::Error>(
    raw: Vec<serde_json::Value>,
) -> std::result::Result<Vec<TagValues>, E> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    if raw[0].is_array() {
        raw.into_iter()
            .map(|set| match set {
                serde_json::Value::Array(values) => values
                    .into_iter()
                    .map(parse_tag_value::<E>)
                    .collect::<std::result::Result<TagValues, E>>(),
                other => Err(E::custom(format!(
                    "mixed tag filter: expected array, got {other}"
                ))),
            })
            .collect()
    } else {
        let set = raw
            .into_iter()
            .map(parse_tag_value::<E>)
            .collect::<std::result::Result<TagValues, E>>()?;
        Ok(vec![set])
    }
}

fn parse_tag_value<E: de::Error>(
    value: serde_json::Value,
) -> std::result::Result<Option<String>, E> {
    match value {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Null => Ok(None),
        other => Err(E::custom(format!(
            "tag filter values must be strings or null, got {other}"
        ))),
    }
}

/// A list of filters with OR semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(pub Vec<Filter>);

impl Filters {
    /// Whether any filter in the list matches the event.
    pub fn match_event(&self, event: &Event) -> bool {
        self.0.iter().any(|f| f.matches(event))
    }

    /// OR over [`Filter::matches_ignoring_timestamps`].
    pub fn match_ignoring_timestamps(&self, event: &Event) -> bool {
        self.0.iter().any(|f| f.matches_ignoring_timestamps(event))
    }
}

impl Deref for Filters {
    type Target = Vec<Filter>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Filters {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Filter> for Filters {
    fn from(filter: Filter) -> Self {
        Filters(vec![filter])
    }
}

impl From<Vec<Filter>> for Filters {
    fn from(filters: Vec<Filter>) -> Self {
        Filters(filters)
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<T: IntoIterator<Item = Filter>>(iter: T) -> Self {
        Filters(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tags;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn event_with_tags(tags: Vec<Tag>) -> Event {
        Event {
            tags: Tags(tags),
            ..Default::default()
        }
    }

    #[test]
    fn test_unmarshal() {
        let raw = r##"{"ids": ["abc"],"#e":["zzz"],"#something":[["nothing","bab"]],"since":1644254609,"search":"test"}"##;
        let f: Filter = serde_json::from_str(raw).unwrap();

        assert_eq!(f.search, "test");
        assert_eq!(f.until, None);
        assert_eq!(f.since, Some(Timestamp(1644254609)));
        assert_eq!(f.tags.len(), 2);
        assert_eq!(f.tags["something"], vec![vec![s("nothing"), s("bab")]]);
        assert_eq!(f.tags["e"], vec![vec![s("zzz")]]);
        assert!(!f.limit_zero);
    }

    #[test]
    fn test_marshal() {
        let f = Filter {
            kinds: vec![1, 2, 4],
            tags: TagMap::new().set_literals("fruit", ["banana", "mango"]),
            until: Some(Timestamp(12345678)),
            ..Default::default()
        };

        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(
            json,
            r##"{"kinds":[1,2,4],"until":12345678,"#fruit":[["banana","mango"]]}"##
        );
    }

    #[test]
    fn test_unmarshal_with_limit_zero() {
        let raw = r##"{"ids": ["abc"],"#e":["zzz"],"limit":0,"#something":["nothing","bab"],"since":1644254609,"search":"test"}"##;
        let f: Filter = serde_json::from_str(raw).unwrap();

        assert!(f.limit_zero);
        assert_eq!(f.tags.len(), 2);
        // A flat list is one positional set.
        assert_eq!(f.tags["something"], vec![vec![s("nothing"), s("bab")]]);
    }

    #[test]
    fn test_marshal_with_limit_zero() {
        let f = Filter {
            kinds: vec![1, 2, 4],
            tags: TagMap::new().set_literals("fruit", ["banana", "mango"]),
            until: Some(Timestamp(12345678)),
            limit_zero: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(
            json,
            r##"{"kinds":[1,2,4],"until":12345678,"limit":0,"#fruit":[["banana","mango"]]}"##
        );
    }

    #[test]
    fn test_marshal_omits_absent_limit() {
        let f = Filter {
            kinds: vec![1],
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&f).unwrap(), r#"{"kinds":[1]}"#);
    }

    #[test]
    fn test_round_trip_wildcards() {
        let f = Filter {
            tags: TagMap::new()
                .append("e", vec![None, s("2"), None])
                .append("e", vec![s("1")]),
            ..Default::default()
        };

        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, r##"{"#e":[[null,"2",null],["1"]]}"##);

        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn test_matching_ids() {
        let f = Filter {
            ids: vec!["abc".to_string()],
            ..Default::default()
        };
        let mut event = Event {
            id: "abc".to_string(),
            ..Default::default()
        };
        assert!(f.matches(&event));
        event.id = "abd".to_string();
        assert!(!f.matches(&event));
    }

    #[test]
    fn test_matching_timestamps() {
        let f = Filter {
            since: Some(Timestamp(10)),
            until: Some(Timestamp(20)),
            ..Default::default()
        };
        let at = |t: i64| Event {
            created_at: Timestamp(t),
            ..Default::default()
        };
        assert!(!f.matches(&at(9)));
        assert!(f.matches(&at(10)));
        assert!(f.matches(&at(20)));
        assert!(!f.matches(&at(21)));
    }

    #[test]
    fn test_matching_tags_table() {
        struct Case {
            filter: Filter,
            event: Event,
            matches: bool,
        }

        let cases = vec![
            // Empty sets list: the key just has to be present.
            Case {
                filter: Filter {
                    tags: {
                        let mut m = TagMap::new();
                        m.insert("e".to_string(), Vec::new());
                        m
                    },
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["e", "1"])]),
                matches: true,
            },
            Case {
                filter: Filter {
                    tags: TagMap::new()
                        .append("e", vec![None, None])
                        .append("e", vec![s("1")]),
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["e", "1"])]),
                matches: true,
            },
            // Second set matches on position 0.
            Case {
                filter: Filter {
                    tags: TagMap::new()
                        .append("e", vec![None, s("2"), None])
                        .append("e", vec![s("1")]),
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["e", "1", "2", "3"])]),
                matches: true,
            },
            // First set matches positionally on position 1.
            Case {
                filter: Filter {
                    tags: TagMap::new()
                        .append("e", vec![None, s("2"), None])
                        .append("e", vec![s("1")]),
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["e", "0", "2", "3"])]),
                matches: true,
            },
            // Expected value beyond the tag's length rejects.
            Case {
                filter: Filter {
                    tags: TagMap::new().set_literals("e", ["1", "2", "3", "4"]),
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["e", "1", "2", "3"])]),
                matches: false,
            },
            // Filter key absent from the event rejects.
            Case {
                filter: Filter {
                    tags: {
                        let mut m = TagMap::new();
                        m.insert("x".to_string(), Vec::new());
                        m
                    },
                    ..Default::default()
                },
                event: Event::default(),
                matches: false,
            },
            // OR across sets.
            Case {
                filter: Filter {
                    tags: TagMap::new()
                        .append("k", vec![s("1")])
                        .append("k", vec![s("2")]),
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["k", "1"])]),
                matches: true,
            },
            // AND within a set.
            Case {
                filter: Filter {
                    tags: TagMap::new().append("k", vec![s("1"), s("2")]),
                    ..Default::default()
                },
                event: event_with_tags(vec![Tag::new(["k", "1"])]),
                matches: false,
            },
        ];

        for (i, case) in cases.iter().enumerate() {
            assert_eq!(
                case.filter.matches(&case.event),
                case.matches,
                "case {i}: filter {:?} event {:?}",
                case.filter,
                case.event,
            );
        }
    }

    #[test]
    fn test_matching_live() {
        let filter: Filter = serde_json::from_str(
            r#"{"kinds":[1],"authors":["a8171781fd9e90ede3ea44ddca5d3abf828fe8eedeb0f3abb0dd3e563562e1fc","1d80e5588de010d137a67c42b03717595f5f510e73e42cfc48f31bae91844d59","ed4ca520e9929dfe9efdadf4011b53d30afd0678a09aa026927e60e7a45d9244"],"since":1677033299}"#,
        )
        .unwrap();
        let event: Event = serde_json::from_str(
            r#"{"id":"5a127c9c931f392f6afc7fdb74e8be01c34035314735a6b97d2cf360d13cfb94","pubkey":"1d80e5588de010d137a67c42b03717595f5f510e73e42cfc48f31bae91844d59","created_at":1677033299,"kind":1,"tags":[["t","japan"]],"content":"If you like my art,I'd appreciate a coin or two!!\nZap is welcome!! Thanks.","sig":"828497508487ca1e374f6b4f2bba7487bc09fccd5cc0d1baa82846a944f8c5766918abf5878a580f1e6615de91f5b57a32e34c42ee2747c983aaf47dbf2a0255"}"#,
        )
        .unwrap();

        assert!(filter.matches(&event));
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            Filter {
                kinds: vec![4, 5],
                ..Default::default()
            },
            Filter {
                kinds: vec![4, 5],
                ..Default::default()
            },
        );

        assert_eq!(
            Filter {
                kinds: vec![4, 5],
                tags: TagMap::new().set_literals("letter", ["a", "b"]),
                ..Default::default()
            },
            Filter {
                kinds: vec![4, 5],
                tags: TagMap::new().set_literals("letter", ["a", "b"]),
                ..Default::default()
            },
        );

        // Kind order does not matter.
        let tm = Timestamp::now();
        assert_eq!(
            Filter {
                kinds: vec![4, 5],
                tags: TagMap::new()
                    .set_literals("letter", ["a", "b"])
                    .set_literals("fruit", ["banana"]),
                since: Some(tm),
                ids: vec!["aaaa".to_string(), "bbbb".to_string()],
                ..Default::default()
            },
            Filter {
                kinds: vec![5, 4],
                tags: TagMap::new()
                    .set_literals("letter", ["a", "b"])
                    .set_literals("fruit", ["banana"]),
                since: Some(tm),
                ids: vec!["aaaa".to_string(), "bbbb".to_string()],
                ..Default::default()
            },
        );

        assert_ne!(
            Filter {
                kinds: vec![1, 4, 5],
                ..Default::default()
            },
            Filter {
                kinds: vec![4, 5, 6],
                ..Default::default()
            },
        );

        assert_ne!(
            Filter {
                limit_zero: true,
                ..Default::default()
            },
            Filter::default(),
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let filter = Filter {
            kinds: vec![0, 1, 2, 3],
            tags: TagMap::new()
                .set_literals("letter", ["a", "b"])
                .set_literals("fruit", ["banana"]),
            since: Some(Timestamp::now() - 3600),
            ids: vec!["9894b4b5cb5166d23ee8899a4151cf0c66aec00bde101982a13b8e8ceb972df9".to_string()],
            ..Default::default()
        };

        let clone = filter.clone();
        assert_eq!(filter, clone);

        let mut clone1 = filter.clone();
        clone1.ids.push("another".to_string());
        assert_ne!(filter, clone1);

        let mut clone2 = filter.clone();
        clone2.tags = filter.tags.clone().append("letter", vec![s("c")]);
        assert_ne!(filter, clone2);

        let mut clone3 = filter.clone();
        clone3.tags = filter.tags.clone().set_literals("g", ["drt"]);
        assert_ne!(filter, clone3);

        let mut clone4 = filter.clone();
        clone4.since = clone4.since.map(|ts| ts + 1);
        assert_ne!(filter, clone4);
    }

    #[test]
    fn test_theoretical_limit() {
        let ids = |n: usize| (0..n).map(|i| format!("id{i}")).collect::<Vec<_>>();

        assert_eq!(
            Filter {
                ids: ids(6),
                ..Default::default()
            }
            .theoretical_limit(),
            6
        );
        assert_eq!(
            Filter {
                authors: ids(3),
                kinds: vec![3, 0, 10002],
                ..Default::default()
            }
            .theoretical_limit(),
            9
        );
        assert_eq!(
            Filter {
                authors: ids(4),
                kinds: vec![10050],
                ..Default::default()
            }
            .theoretical_limit(),
            4
        );
        assert_eq!(
            Filter {
                authors: ids(4),
                ..Default::default()
            }
            .theoretical_limit(),
            -1
        );
        assert_eq!(
            Filter {
                kinds: vec![3, 0, 10002],
                ..Default::default()
            }
            .theoretical_limit(),
            -1
        );
        assert_eq!(
            Filter {
                authors: ids(6),
                kinds: vec![30023, 30024],
                tags: TagMap::new().set_literals("d", ["aaa", "bbb"]),
                ..Default::default()
            }
            .theoretical_limit(),
            24
        );
        assert_eq!(
            Filter {
                authors: ids(6),
                kinds: vec![30023, 30024],
                ..Default::default()
            }
            .theoretical_limit(),
            -1
        );
    }

    #[test]
    fn test_tag_map_all() {
        let tag_map = TagMap::new()
            .set_literals("fruit", ["apple", "banana"])
            .append("fruit", vec![s("orange")])
            .set_literals("color", ["red", "yellow"])
            .append("color", vec![None, s("blue")]);

        assert_eq!(tag_map.all("fruit"), vec!["apple", "banana", "orange"]);
        assert_eq!(tag_map.all("color"), vec!["red", "yellow", "blue"]);
        assert!(tag_map.all("nonexistent").is_empty());
        assert!(tag_map.has_values("fruit"));
        assert!(!TagMap::new().append("x", vec![None]).has_values("x"));
    }

    #[test]
    fn test_filters_match_event() {
        let filters: Filters = vec![
            Filter {
                kinds: vec![7],
                ..Default::default()
            },
            Filter {
                kinds: vec![1],
                since: Some(Timestamp(100)),
                ..Default::default()
            },
        ]
        .into();

        let event = Event {
            kind: 1,
            created_at: Timestamp(50),
            ..Default::default()
        };
        assert!(!filters.match_event(&event));
        assert!(filters.match_ignoring_timestamps(&event));
    }
}
