pub mod booking;
pub mod conversation;
pub mod draft;
pub mod intent;

pub use booking::{Booking, BookingStatus, Customer};
pub use conversation::{ChatMessage, Conversation, MAX_HISTORY};
pub use draft::{BookingDraft, BookingRequest, SlotField};
pub use intent::Intent;
