use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::BookingDraft;

/// Message history is capped; oldest entries are evicted first.
pub const MAX_HISTORY: usize = 25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub draft: BookingDraft,
    /// True while the slot-filling flow owns this conversation. Messages
    /// route straight to the flow without re-classification.
    pub in_booking_flow: bool,
    pub last_activity: NaiveDateTime,
}

impl Conversation {
    pub fn new(session_id: &str, now: NaiveDateTime) -> Self {
        Self {
            session_id: session_id.to_string(),
            messages: vec![],
            draft: BookingDraft::default(),
            in_booking_flow: false,
            last_activity: now,
        }
    }

    pub fn push_message(&mut self, role: &str, content: &str) {
        self.messages.push(ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        });
        if self.messages.len() > MAX_HISTORY {
            let excess = self.messages.len() - MAX_HISTORY;
            self.messages.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_history_capped_at_25() {
        let mut conv = Conversation::new("s1", test_now());
        for i in 0..30 {
            conv.push_message("user", &format!("message {i}"));
        }
        assert_eq!(conv.messages.len(), MAX_HISTORY);
    }

    #[test]
    fn test_oldest_messages_evicted_first() {
        let mut conv = Conversation::new("s1", test_now());
        for i in 0..28 {
            conv.push_message("user", &format!("message {i}"));
        }
        assert_eq!(conv.messages[0].content, "message 3");
        assert_eq!(conv.messages.last().unwrap().content, "message 27");
    }

    #[test]
    fn test_under_cap_untouched() {
        let mut conv = Conversation::new("s1", test_now());
        conv.push_message("user", "hello");
        conv.push_message("assistant", "hi there");
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role, "user");
    }
}
