//! Connect to a public relay, fetch a handful of recent text notes and
//! print them.
//!
//! ```bash
//! cargo run --example fetch_notes -- wss://relay.damus.io
//! ```

use riptide_core::{Filter, Relay, RelayOptions, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "wss://relay.damus.io".to_string());

    let relay = Relay::connect(&url, RelayOptions::default()).await?;
    println!("connected to {}", relay.url());

    let notes = relay
        .query_sync(Filter {
            kinds: vec![1],
            limit: 5,
            ..Default::default()
        })
        .await?;

    for note in &notes {
        println!("{} | {}", note.created_at, note.content);
    }
    println!("{} stored notes", notes.len());

    relay.close();
    Ok(())
}
