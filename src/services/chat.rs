use std::sync::Arc;

use chrono::Utc;

use crate::db::queries;
use crate::models::{
    Booking, BookingDraft, BookingRequest, BookingStatus, Conversation, Intent,
};
use crate::services::booking_flow::{self, FlowStep};
use crate::services::rag;
use crate::state::AppState;

/// Fallback replies embed at most this much raw retrieved context.
const FALLBACK_CONTEXT_CHARS: usize = 800;

/// Process one inbound chat message for a session: load the conversation,
/// route it, apply side effects, and return the assistant reply.
pub async fn process_message(
    state: &Arc<AppState>,
    session_id: &str,
    message: &str,
) -> anyhow::Result<String> {
    let mut conv = {
        let db = state.db.lock().unwrap();
        queries::get_conversation(&db, session_id)?
    }
    .unwrap_or_else(|| Conversation::new(session_id, Utc::now().naive_utc()));

    conv.push_message("user", message);

    // A live booking flow owns every message; classification only applies
    // when no booking is in progress.
    let reply = if conv.in_booking_flow || !conv.draft.is_empty() {
        match booking_flow::advance(&mut conv.draft, message) {
            FlowStep::Reply(reply) => reply,
            FlowStep::Commit(req) => commit_booking(state, &mut conv, &req).await,
        }
    } else if Intent::classify(message) == Intent::Booking {
        conv.in_booking_flow = true;
        booking_flow::START_PROMPT.to_string()
    } else {
        answer_general_query(state, message).await
    };

    tracing::info!(
        session = session_id,
        in_flow = conv.in_booking_flow,
        "processed message"
    );

    conv.push_message("assistant", &reply);
    conv.last_activity = Utc::now().naive_utc();

    {
        let db = state.db.lock().unwrap();
        queries::save_conversation(&db, &conv)?;
    }

    Ok(reply)
}

/// The user confirmed: persist, notify, and reset. Persistence failure
/// keeps the collected fields and disarms confirmation so the next message
/// re-confirms; mail failure leaves the booking committed.
async fn commit_booking(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    req: &BookingRequest,
) -> String {
    let persisted: anyhow::Result<String> = {
        let db = state.db.lock().unwrap();
        queries::find_or_create_customer(&db, &req.name, &req.email, &req.phone).and_then(
            |customer| {
                let booking = Booking {
                    id: uuid::Uuid::new_v4().to_string(),
                    customer_id: customer.id,
                    service_type: req.service_type.clone(),
                    date: req.date,
                    time: req.time,
                    status: BookingStatus::Confirmed,
                    created_at: Utc::now().naive_utc(),
                };
                queries::create_booking(&db, &booking)?;
                Ok(booking.id)
            },
        )
    };

    let booking_id = match persisted {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, session = %conv.session_id, "failed to persist booking");
            conv.draft.awaiting_confirmation = false;
            return "I could not save your booking due to a system error, \
                    but your details are noted. Please try again later."
                .to_string();
        }
    };

    let email_body = format!(
        "Hi {},\n\n\
         Your booking is confirmed.\n\
         Booking ID: {}\n\
         Service: {}\n\
         Date: {}\n\
         Time: {}\n\n\
         Thank you!",
        req.name,
        booking_id,
        req.service_type,
        req.date.format("%Y-%m-%d"),
        req.time.format("%H:%M"),
    );

    let reply = match state
        .mailer
        .send_mail(&req.email, "Your Booking Confirmation", &email_body)
        .await
    {
        Ok(()) => format!(
            "Your booking is confirmed!\n\
             Booking ID: {booking_id}\n\
             A confirmation email has been sent to {}.",
            req.email
        ),
        Err(e) => {
            tracing::warn!(error = %e, booking_id = %booking_id, "confirmation email failed");
            format!(
                "Your booking is confirmed!\n\
                 Booking ID: {booking_id}\n\n\
                 However, I couldn't send the confirmation email due to an error: {e}"
            )
        }
    };

    conv.draft = BookingDraft::default();
    conv.in_booking_flow = false;
    reply
}

/// General questions go through retrieval and answer generation. Generation
/// failure degrades to the raw retrieved context, never to an error.
async fn answer_general_query(state: &Arc<AppState>, message: &str) -> String {
    let index = state.current_index();
    let (context, scored) = rag::retrieve(index.as_deref(), message, rag::DEFAULT_TOP_K);

    tracing::debug!(chunks = scored.len(), "retrieved context for query");

    match state.llm.generate(message, &context).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "answer generation failed, falling back to retrieved context");
            let preview: String = context.chars().take(FALLBACK_CONTEXT_CHARS).collect();
            format!(
                "The answer generation service is not configured, so I can't compose a full reply. \
                 Here is the most relevant context from the uploaded documents:\n\n{preview}"
            )
        }
    }
}
