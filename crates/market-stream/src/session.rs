//! Per-connection subscription state.

use std::collections::HashMap;
use uuid::Uuid;

/// State owned by one WebSocket connection: its id for logging and the
/// dispatcher handler registered for each channel it subscribed to.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    handlers: HashMap<String, u64>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            handlers: HashMap::new(),
        }
    }

    /// Whether this connection already subscribed to a channel.
    pub fn is_subscribed(&self, channel: &str) -> bool {
        self.handlers.contains_key(channel)
    }

    /// Record the handler registered for a channel.
    pub fn track(&mut self, channel: &str, handler_id: u64) {
        self.handlers.insert(channel.to_string(), handler_id);
    }

    /// Forget a channel, returning its handler id if it was tracked.
    pub fn untrack(&mut self, channel: &str) -> Option<u64> {
        self.handlers.remove(channel)
    }

    /// Take every tracked (channel, handler id) pair, leaving the
    /// session empty. Used on disconnect.
    pub fn drain(&mut self) -> Vec<(String, u64)> {
        self.handlers.drain().collect()
    }

    /// Number of channels this connection is subscribed to.
    pub fn subscription_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_untrack() {
        let mut session = Session::new();
        session.track("quotes.AAPL", 7);

        assert!(session.is_subscribed("quotes.AAPL"));
        assert_eq!(session.untrack("quotes.AAPL"), Some(7));
        assert_eq!(session.untrack("quotes.AAPL"), None);
        assert!(!session.is_subscribed("quotes.AAPL"));
    }

    #[test]
    fn test_drain_empties_session() {
        let mut session = Session::new();
        session.track("quotes.AAPL", 1);
        session.track("quotes.MSFT", 2);

        let mut drained = session.drain();
        drained.sort();

        assert_eq!(
            drained,
            vec![("quotes.AAPL".to_string(), 1), ("quotes.MSFT".to_string(), 2)]
        );
        assert_eq!(session.subscription_count(), 0);
    }
}
