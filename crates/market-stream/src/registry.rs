//! Reference-counted channel interest.

use std::collections::HashMap;
use tokio::sync::Mutex;

/// Tracks how many connections hold an interest in each channel.
///
/// Counts never go negative and rows are deleted the moment they reach
/// zero, so the map always lists exactly the channels with at least one
/// live subscriber.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    counts: Mutex<HashMap<String, usize>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more interest in a channel. Returns true when this is
    /// the first reference, which is the caller's cue to open the
    /// upstream subscription.
    pub async fn retain(&self, channel: &str) -> bool {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(channel.to_string()).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Drop one interest in a channel. Returns true when this was the
    /// last reference, which is the caller's cue to close the upstream
    /// subscription. Releasing an untracked channel is a no-op.
    pub async fn release(&self, channel: &str) -> bool {
        let mut counts = self.counts.lock().await;
        match counts.get_mut(channel) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                counts.remove(channel);
                true
            }
            None => false,
        }
    }

    /// Channels with at least one live subscriber.
    pub async fn active_channels(&self) -> Vec<String> {
        self.counts.lock().await.keys().cloned().collect()
    }

    /// Current reference count for a channel.
    pub async fn count(&self, channel: &str) -> usize {
        self.counts.lock().await.get(channel).copied().unwrap_or(0)
    }
}
