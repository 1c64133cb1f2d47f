//! Ordered event tags

use serde::{Deserialize, Serialize};

/// A single tag: an ordered list of strings whose first element is the key.
///
/// Tags keep whatever the relay sent, including trailing elements beyond the
/// value. The same key may appear on an event any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Build a tag from string-like parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag(parts.into_iter().map(Into::into).collect())
    }

    /// The tag key (element 0), or `""` for a degenerate empty tag.
    pub fn key(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// The tag value (element 1), or `""` when absent.
    pub fn value(&self) -> &str {
        self.0.get(1).map(String::as_str).unwrap_or_default()
    }

    /// Element at position `i`, if present.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    /// Whether the tag starts with `prefix`: all elements but the last must
    /// be equal, the last prefix element only has to be a string prefix of
    /// the corresponding tag element. A prefix longer than the tag never
    /// matches.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        let Some((last, head)) = prefix.split_last() else {
            return true;
        };
        if prefix.len() > self.0.len() {
            return false;
        }
        head.iter().zip(self.0.iter()).all(|(want, have)| *want == have)
            && self.0[prefix.len() - 1].starts_with(last)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The ordered tag list of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(pub Vec<Tag>);

impl Tags {
    /// First tag starting with the given prefix, e.g. `&["e"]` or `&["p", "<hex>"]`.
    pub fn get_first(&self, prefix: &[&str]) -> Option<&Tag> {
        self.0.iter().find(|tag| tag.starts_with(prefix))
    }

    /// Value of the first `d` tag, or `""` when the event has none.
    pub fn get_d(&self) -> &str {
        self.get_first(&["d", ""]).map(Tag::value).unwrap_or_default()
    }

    /// All tags with the given key, in event order.
    pub fn all_with_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Tag> {
        self.0.iter().filter(move |tag| tag.key() == key)
    }

    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        Tags(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_value() {
        let tag = Tag::new(["e", "abc", "wss://relay.example.com"]);
        assert_eq!(tag.key(), "e");
        assert_eq!(tag.value(), "abc");
        assert_eq!(tag.get(2), Some("wss://relay.example.com"));
        assert_eq!(tag.get(3), None);
    }

    #[test]
    fn test_empty_tag_accessors() {
        let tag = Tag::default();
        assert_eq!(tag.key(), "");
        assert_eq!(tag.value(), "");
    }

    #[test]
    fn test_starts_with() {
        let tag = Tag::new(["p", "pubkey1", "relay"]);
        assert!(tag.starts_with(&["p"]));
        assert!(tag.starts_with(&["p", "pubkey1"]));
        // The last prefix element matches by string prefix.
        assert!(tag.starts_with(&["p", "pub"]));
        assert!(!tag.starts_with(&["p", "pubkey2"]));
        assert!(!tag.starts_with(&["p", "pubkey1", "relay", "extra"]));
        assert!(tag.starts_with(&[]));
    }

    #[test]
    fn test_get_first_and_get_d() {
        let tags: Tags = [
            Tag::new(["e", "first"]),
            Tag::new(["d", "slug"]),
            Tag::new(["e", "second"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(tags.get_first(&["e"]).unwrap().value(), "first");
        assert_eq!(tags.get_d(), "slug");
        assert_eq!(tags.get_first(&["x"]), None);
        assert_eq!(Tags::default().get_d(), "");
    }

    #[test]
    fn test_all_with_key_keeps_order() {
        let tags: Tags = [
            Tag::new(["t", "one"]),
            Tag::new(["e", "x"]),
            Tag::new(["t", "two"]),
        ]
        .into_iter()
        .collect();

        let values: Vec<&str> = tags.all_with_key("t").map(Tag::value).collect();
        assert_eq!(values, vec!["one", "two"]);
    }

    #[test]
    fn test_serde_transparent() {
        let tags: Tags = [Tag::new(["e", "abc"]), Tag::new(["p", "def"])]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"[["e","abc"],["p","def"]]"#);

        let back: Tags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags);
    }
}
