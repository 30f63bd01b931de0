use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingStatus;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    /// Substring match on customer name.
    pub name: Option<String>,
    /// Substring match on customer email.
    pub email: Option<String>,
    /// Exact date, YYYY-MM-DD.
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    service_type: String,
    date: String,
    time: String,
    status: String,
    created_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let date_filter = match query.date.as_deref().filter(|d| !d.is_empty()) {
        Some(d) => Some(
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date filter: {d}")))?,
        ),
        None => None,
    };

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::list_bookings(
            &db,
            query.name.as_deref().filter(|s| !s.is_empty()),
            query.email.as_deref().filter(|s| !s.is_empty()),
            date_filter,
        )?
    };

    let response = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            customer_name: b.customer_name,
            customer_email: b.customer_email,
            customer_phone: b.customer_phone,
            service_type: b.service_type,
            date: b.date.format("%Y-%m-%d").to_string(),
            time: b.time.format("%H:%M").to_string(),
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/bookings/:id/cancel
#[derive(Serialize)]
pub struct CancelResponse {
    cancelled: bool,
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_booking_status(&db, &id, &BookingStatus::Cancelled)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    Ok(Json(CancelResponse { cancelled: true }))
}
