use chrono::{NaiveDate, NaiveTime};

use crate::models::{BookingDraft, BookingRequest, SlotField};

/// Confirmation keyword sets. Substring matching over the case-folded
/// message; the sets are fixed so accepted phrasings stay reproducible.
const AFFIRMATIVE: [&str; 4] = ["yes", "confirm", "correct", "sure"];
const NEGATIVE: [&str; 4] = ["no", "change", "edit", "wrong"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%I:%M %p"];

pub const START_PROMPT: &str =
    "I can help you book an appointment. Please tell me your *full name* for the booking.";
const RESTART_PROMPT: &str =
    "Okay, let's start over. Please tell me your *full name* for the booking.";
const AMBIGUOUS_PROMPT: &str =
    "Please reply with **Yes** to confirm or **No** to modify your booking.";

/// Outcome of one turn of the slot-filling machine. `Commit` means the user
/// confirmed: the caller must persist the request and send the confirmation
/// mail, then reset the draft according to the outcome.
#[derive(Debug)]
pub enum FlowStep {
    Reply(String),
    Commit(BookingRequest),
}

/// Advance the booking flow by one user message. Mutation is local to the
/// draft; persistence and notification stay with the caller.
pub fn advance(draft: &mut BookingDraft, message: &str) -> FlowStep {
    if draft.awaiting_confirmation {
        return confirm_step(draft, message);
    }

    let input = message.trim();

    match draft.next_unset() {
        Some(SlotField::Name) => {
            if input.is_empty() {
                return FlowStep::Reply(
                    "Please tell me your *full name* for the booking.".to_string(),
                );
            }
            draft.name = Some(input.to_string());
            return FlowStep::Reply("Got it. Please provide your *email address*.".to_string());
        }
        Some(SlotField::Email) => {
            if !input.contains('@') || !input.contains('.') {
                return FlowStep::Reply(
                    "That doesn't look like a valid email. Please enter a valid email (e.g., name@example.com)."
                        .to_string(),
                );
            }
            draft.email = Some(input.to_string());
            return FlowStep::Reply("Thanks. May I have your *phone number*?".to_string());
        }
        Some(SlotField::Phone) => {
            if input.is_empty() {
                return FlowStep::Reply("May I have your *phone number*?".to_string());
            }
            draft.phone = Some(input.to_string());
            return FlowStep::Reply(
                "What kind of service would you like to book? (e.g., haircut, facial, spa session)"
                    .to_string(),
            );
        }
        Some(SlotField::ServiceType) => {
            if input.is_empty() {
                return FlowStep::Reply(
                    "What kind of service would you like to book? (e.g., haircut, facial, spa session)"
                        .to_string(),
                );
            }
            draft.service_type = Some(input.to_string());
            return FlowStep::Reply(
                "Great. Please enter your preferred *date* in `YYYY-MM-DD` format.".to_string(),
            );
        }
        Some(SlotField::Date) => {
            let Some(date) = parse_date(input) else {
                return FlowStep::Reply(
                    "I couldn't understand the date. Please enter it as `YYYY-MM-DD`.".to_string(),
                );
            };
            draft.date = Some(date);
            return FlowStep::Reply(
                "Now, please enter your preferred *time* in `HH:MM` (24h) or `HH:MM AM/PM` format."
                    .to_string(),
            );
        }
        Some(SlotField::Time) => {
            let Some(time) = parse_time(input) else {
                return FlowStep::Reply(
                    "I couldn't understand the time. Please enter it as `HH:MM` (24h) or `HH:MM AM/PM` format."
                        .to_string(),
                );
            };
            draft.time = Some(time);
        }
        // All six fields already collected: a commit failed earlier and the
        // confirmation flag was cleared. Fall through and re-confirm.
        None => {}
    }

    draft.awaiting_confirmation = true;
    FlowStep::Reply(summary(draft))
}

fn confirm_step(draft: &mut BookingDraft, message: &str) -> FlowStep {
    let text = message.to_lowercase();

    if AFFIRMATIVE.iter().any(|k| text.contains(k)) {
        match draft.to_request() {
            Some(req) => return FlowStep::Commit(req),
            None => {
                // Confirmation flag without a complete draft means corrupt
                // state; restart rather than persist garbage.
                *draft = BookingDraft::default();
                return FlowStep::Reply(RESTART_PROMPT.to_string());
            }
        }
    }

    if NEGATIVE.iter().any(|k| text.contains(k)) {
        *draft = BookingDraft::default();
        return FlowStep::Reply(RESTART_PROMPT.to_string());
    }

    FlowStep::Reply(AMBIGUOUS_PROMPT.to_string())
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
}

fn summary(draft: &BookingDraft) -> String {
    format!(
        "Please confirm your booking:\n\
         - Name: {}\n\
         - Email: {}\n\
         - Phone: {}\n\
         - Service: {}\n\
         - Date: {}\n\
         - Time: {}\n\n\
         Reply **Yes** to confirm or **No** to change details.",
        draft.name.as_deref().unwrap_or("-"),
        draft.email.as_deref().unwrap_or("-"),
        draft.phone.as_deref().unwrap_or("-"),
        draft.service_type.as_deref().unwrap_or("-"),
        draft.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string()),
        draft.time.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| "-".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(draft: &mut BookingDraft, message: &str) -> String {
        match advance(draft, message) {
            FlowStep::Reply(r) => r,
            FlowStep::Commit(_) => panic!("unexpected commit"),
        }
    }

    fn filled_draft() -> BookingDraft {
        let mut draft = BookingDraft::default();
        for input in ["Jane Doe", "jane@x.com", "555-1234", "haircut", "2025-06-01"] {
            reply(&mut draft, input);
        }
        // Last slot arms the confirmation step.
        let summary = reply(&mut draft, "14:30");
        assert!(summary.contains("Jane Doe"));
        assert!(draft.awaiting_confirmation);
        draft
    }

    #[test]
    fn test_slots_fill_in_fixed_order() {
        let mut draft = BookingDraft::default();

        let r = reply(&mut draft, "Jane Doe");
        assert!(r.contains("email"));
        assert_eq!(draft.name.as_deref(), Some("Jane Doe"));

        let r = reply(&mut draft, "jane@x.com");
        assert!(r.contains("phone"));

        let r = reply(&mut draft, "555-1234");
        assert!(r.contains("service"));

        let r = reply(&mut draft, "haircut");
        assert!(r.contains("date"));

        let r = reply(&mut draft, "2025-06-01");
        assert!(r.contains("time"));

        let r = reply(&mut draft, "14:30");
        assert!(r.contains("confirm"));
        assert!(draft.awaiting_confirmation);
    }

    #[test]
    fn test_name_is_never_reprompted_once_email_set() {
        let mut draft = BookingDraft::default();
        reply(&mut draft, "Jane Doe");
        reply(&mut draft, "jane@x.com");
        // A later invalid input re-prompts its own field, not name.
        let r = reply(&mut draft, "");
        assert!(r.contains("phone"));
        assert_eq!(draft.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_email_requires_at_and_dot() {
        let mut draft = BookingDraft::default();
        reply(&mut draft, "Jane Doe");

        let r = reply(&mut draft, "not-an-email");
        assert!(r.contains("valid email"));
        assert!(draft.email.is_none());

        let r = reply(&mut draft, "jane@nodot");
        assert!(r.contains("valid email"));

        let r = reply(&mut draft, "a@b.c");
        assert!(r.contains("phone"));
        assert_eq!(draft.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_date_formats_tried_in_order() {
        for input in ["2025-03-01", "01-03-2025", "01/03/2025"] {
            let mut draft = BookingDraft::default();
            reply(&mut draft, "Jane Doe");
            reply(&mut draft, "jane@x.com");
            reply(&mut draft, "555-1234");
            reply(&mut draft, "haircut");
            let r = reply(&mut draft, input);
            assert!(r.contains("time"), "date {input} should parse");
            assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 3, 1));
        }
    }

    #[test]
    fn test_unparseable_date_reprompts_same_field() {
        let mut draft = BookingDraft::default();
        reply(&mut draft, "Jane Doe");
        reply(&mut draft, "jane@x.com");
        reply(&mut draft, "555-1234");
        reply(&mut draft, "haircut");

        let r = reply(&mut draft, "March 1");
        assert!(r.contains("couldn't understand the date"));
        assert!(draft.date.is_none());
        assert!(!draft.awaiting_confirmation);
    }

    #[test]
    fn test_time_accepts_24h_and_12h() {
        let mut draft = filled_draft();
        assert_eq!(draft.time, NaiveTime::from_hms_opt(14, 30, 0));

        draft = BookingDraft::default();
        reply(&mut draft, "Jane Doe");
        reply(&mut draft, "jane@x.com");
        reply(&mut draft, "555-1234");
        reply(&mut draft, "haircut");
        reply(&mut draft, "2025-06-01");
        let r = reply(&mut draft, "02:30 PM");
        assert!(r.contains("confirm"));
        assert_eq!(draft.time, NaiveTime::from_hms_opt(14, 30, 0));
    }

    #[test]
    fn test_bad_time_reprompts() {
        let mut draft = BookingDraft::default();
        reply(&mut draft, "Jane Doe");
        reply(&mut draft, "jane@x.com");
        reply(&mut draft, "555-1234");
        reply(&mut draft, "haircut");
        reply(&mut draft, "2025-06-01");

        let r = reply(&mut draft, "half past two");
        assert!(r.contains("couldn't understand the time"));
        assert!(draft.time.is_none());
    }

    #[test]
    fn test_affirmative_triggers_commit() {
        let mut draft = filled_draft();
        match advance(&mut draft, "yes please") {
            FlowStep::Commit(req) => {
                assert_eq!(req.name, "Jane Doe");
                assert_eq!(req.email, "jane@x.com");
                assert_eq!(req.phone, "555-1234");
                assert_eq!(req.service_type, "haircut");
                assert_eq!(req.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
                assert_eq!(req.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
            }
            FlowStep::Reply(r) => panic!("expected commit, got reply: {r}"),
        }
    }

    #[test]
    fn test_negative_restarts_with_cleared_draft() {
        let mut draft = filled_draft();
        let r = reply(&mut draft, "nope");
        assert!(r.contains("start over"));
        assert!(draft.name.is_none());
        assert!(!draft.awaiting_confirmation);
    }

    #[test]
    fn test_ambiguous_reply_reprompts_without_state_change() {
        let mut draft = filled_draft();
        let before = draft.clone();
        let r = reply(&mut draft, "maybe");
        assert!(r.contains("Yes"));
        assert!(draft.awaiting_confirmation);
        assert_eq!(draft.name, before.name);
        assert_eq!(draft.time, before.time);
    }

    #[test]
    fn test_full_draft_without_confirmation_flag_resummarizes() {
        // This is the retry path after a persistence failure: fields are
        // retained, the flag was cleared, and any message re-arms it.
        let mut draft = filled_draft();
        draft.awaiting_confirmation = false;

        let r = reply(&mut draft, "try again");
        assert!(r.contains("Please confirm your booking"));
        assert!(draft.awaiting_confirmation);
        assert_eq!(draft.name.as_deref(), Some("Jane Doe"));
    }
}
