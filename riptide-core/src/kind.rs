//! Event kind constants and classification
//!
//! Kind numbers follow the NIP registry. The classification predicates drive
//! relay retention semantics and the theoretical-limit analysis in
//! [`Filter::theoretical_limit`](crate::Filter::theoretical_limit).

pub const KIND_PROFILE_METADATA: u16 = 0;
pub const KIND_TEXT_NOTE: u16 = 1;
pub const KIND_RECOMMEND_SERVER: u16 = 2;
pub const KIND_FOLLOW_LIST: u16 = 3;
pub const KIND_ENCRYPTED_DIRECT_MESSAGE: u16 = 4;
pub const KIND_DELETION: u16 = 5;
pub const KIND_REPOST: u16 = 6;
pub const KIND_REACTION: u16 = 7;
pub const KIND_BADGE_AWARD: u16 = 8;
pub const KIND_SIMPLE_GROUP_CHAT_MESSAGE: u16 = 9;
pub const KIND_CHANNEL_CREATION: u16 = 40;
pub const KIND_CHANNEL_METADATA: u16 = 41;
pub const KIND_CHANNEL_MESSAGE: u16 = 42;
pub const KIND_CHANNEL_HIDE_MESSAGE: u16 = 43;
pub const KIND_CHANNEL_MUTE_USER: u16 = 44;
pub const KIND_REPORTING: u16 = 1984;
pub const KIND_ZAP_REQUEST: u16 = 9734;
pub const KIND_ZAP: u16 = 9735;
pub const KIND_MUTE_LIST: u16 = 10000;
pub const KIND_PIN_LIST: u16 = 10001;
pub const KIND_RELAY_LIST_METADATA: u16 = 10002;
pub const KIND_NWC_WALLET_INFO: u16 = 13194;
pub const KIND_CLIENT_AUTHENTICATION: u16 = 22242;
pub const KIND_NWC_WALLET_REQUEST: u16 = 23194;
pub const KIND_NWC_WALLET_RESPONSE: u16 = 23195;
pub const KIND_NOSTR_CONNECT: u16 = 24133;
pub const KIND_CATEGORIZED_PEOPLE_LIST: u16 = 30000;
pub const KIND_CATEGORIZED_BOOKMARKS_LIST: u16 = 30001;
pub const KIND_PROFILE_BADGES: u16 = 30008;
pub const KIND_BADGE_DEFINITION: u16 = 30009;
pub const KIND_STALL_DEFINITION: u16 = 30017;
pub const KIND_PRODUCT_DEFINITION: u16 = 30018;
pub const KIND_ARTICLE: u16 = 30023;
pub const KIND_APPLICATION_SPECIFIC_DATA: u16 = 30078;
pub const KIND_HANDLER_RECOMMENDATION: u16 = 31989;
pub const KIND_HANDLER_INFORMATION: u16 = 31990;

/// Regular events: stored by relays with no replacement semantics.
pub fn is_regular_kind(kind: u16) -> bool {
    kind == 1
        || kind == 2
        || ((4..45).contains(&kind) && kind != 41)
        || (1000..10000).contains(&kind)
}

/// Replaceable events: relays keep at most one per `(author, kind)`.
pub fn is_replaceable_kind(kind: u16) -> bool {
    kind == 0 || kind == 3 || kind == 41 || (10000..20000).contains(&kind)
}

/// Ephemeral events: relays are not expected to store these at all.
pub fn is_ephemeral_kind(kind: u16) -> bool {
    (20000..30000).contains(&kind)
}

/// Addressable events: relays keep at most one per `(author, kind, d-tag)`.
pub fn is_addressable_kind(kind: u16) -> bool {
    (30000..40000).contains(&kind)
}
