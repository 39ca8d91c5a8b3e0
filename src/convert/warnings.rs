//! Deduplicated diagnostics collected during one conversion.

use hashbrown::HashSet;

/// Ordered set of human-readable warnings, flushed once per conversion.
#[derive(Debug, Default)]
pub struct WarningLog {
    seen: HashSet<String>,
    messages: Vec<String>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. Returns `false` if it was already recorded.
    pub fn push(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if self.seen.contains(&message) {
            return false;
        }
        self.seen.insert(message.clone());
        self.messages.push(message);
        true
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Emit every message through `tracing` and hand them to the caller,
    /// in first-seen order.
    pub fn flush(self) -> Vec<String> {
        for message in &self.messages {
            tracing::warn!(target: "graph_tensor::warnings", "{message}");
        }
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let mut log = WarningLog::new();
        assert!(log.push("b"));
        assert!(log.push("a"));
        assert!(!log.push("b"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.flush(), vec!["b".to_string(), "a".to_string()]);
    }
}
