//! URL normalization and subscription id allocation

use std::sync::atomic::{AtomicU64, Ordering};

use url::Url;

use crate::error::{Error, Result};

/// Normalize a relay URL to its canonical form: `ws`/`wss` scheme (bare hosts
/// get `wss://`, `http(s)` maps to `ws(s)`), lowercase scheme and host, no
/// default port, no fragment, no trailing slash on non-root paths, query kept.
pub fn normalize_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty url".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("wss://{trimmed}")
    };

    let mut url =
        Url::parse(&with_scheme).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    let scheme = match url.scheme() {
        "ws" | "wss" => None,
        "http" => Some("ws"),
        "https" => Some("wss"),
        other => {
            return Err(Error::InvalidUrl(format!(
                "unsupported scheme {other} in {trimmed}"
            )))
        }
    };
    if let Some(scheme) = scheme {
        url.set_scheme(scheme)
            .map_err(|()| Error::InvalidUrl(format!("cannot set scheme on {trimmed}")))?;
    }

    url.set_fragment(None);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let stripped = path.trim_end_matches('/').to_string();
        url.set_path(&stripped);
    }

    Ok(url)
}

// Process-wide, so ids stay unique even across reconnects to the same relay.
static SUBSCRIPTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next subscription id: a monotonic counter rendered in base 10.
pub(crate) fn next_subscription_id() -> String {
    SUBSCRIPTION_COUNTER.fetch_add(1, Ordering::Relaxed).to_string()
}
