use serde::{Deserialize, Serialize};

/// Keyword set is fixed; changing it silently changes which phrasings are
/// accepted, so keep it in sync with the documented behavior.
const BOOKING_KEYWORDS: [&str; 6] = [
    "book",
    "booking",
    "appointment",
    "reservation",
    "schedule",
    "slot",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Booking,
    General,
}

impl Intent {
    /// Case-folded substring match; stateless. Every message is classified
    /// independently of any in-progress booking.
    pub fn classify(message: &str) -> Intent {
        let text = message.to_lowercase();
        if BOOKING_KEYWORDS.iter().any(|k| text.contains(k)) {
            Intent::Booking
        } else {
            Intent::General
        }
    }
}
