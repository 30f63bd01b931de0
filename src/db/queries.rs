use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params, Connection};
use serde::Deserialize;

use crate::models::{
    Booking, BookingDraft, BookingStatus, ChatMessage, Conversation, Customer,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

// ── Conversations ──

#[derive(Deserialize)]
struct ConversationData {
    #[serde(default)]
    messages: Vec<ChatMessage>,
    #[serde(default)]
    draft: BookingDraft,
    #[serde(default)]
    in_booking_flow: bool,
}

pub fn get_conversation(conn: &Connection, session_id: &str) -> anyhow::Result<Option<Conversation>> {
    let result = conn.query_row(
        "SELECT session_id, data, last_activity FROM conversations WHERE session_id = ?1",
        params![session_id],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    );

    match result {
        Ok((session_id, data_json, last_activity_str)) => {
            let data: ConversationData =
                serde_json::from_str(&data_json).context("corrupt conversation data")?;
            let last_activity = NaiveDateTime::parse_from_str(&last_activity_str, DATETIME_FMT)
                .unwrap_or_else(|_| Utc::now().naive_utc());

            Ok(Some(Conversation {
                session_id,
                messages: data.messages,
                draft: data.draft,
                in_booking_flow: data.in_booking_flow,
                last_activity,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_conversation(conn: &Connection, conv: &Conversation) -> anyhow::Result<()> {
    let data = serde_json::json!({
        "messages": conv.messages,
        "draft": conv.draft,
        "in_booking_flow": conv.in_booking_flow,
    });
    let data_json = serde_json::to_string(&data)?;
    let last_activity = conv.last_activity.format(DATETIME_FMT).to_string();

    conn.execute(
        "INSERT INTO conversations (session_id, data, last_activity)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(session_id) DO UPDATE SET
           data = excluded.data,
           last_activity = excluded.last_activity",
        params![conv.session_id, data_json, last_activity],
    )?;
    Ok(())
}

// ── Customers ──

/// Customer identity is the (email, phone) pair: created on first booking,
/// reused afterwards.
pub fn find_or_create_customer(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: &str,
) -> anyhow::Result<Customer> {
    let result = conn.query_row(
        "SELECT id, name, email, phone, created_at FROM customers WHERE email = ?1 AND phone = ?2",
        params![email, phone],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        },
    );

    match result {
        Ok((id, name, email, phone, created_at_str)) => {
            let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
                .unwrap_or_else(|_| Utc::now().naive_utc());
            Ok(Customer {
                id,
                name,
                email,
                phone,
                created_at,
            })
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let customer = Customer {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                created_at: Utc::now().naive_utc(),
            };
            conn.execute(
                "INSERT INTO customers (id, name, email, phone, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    customer.id,
                    customer.name,
                    customer.email,
                    customer.phone,
                    customer.created_at.format(DATETIME_FMT).to_string(),
                ],
            )?;
            Ok(customer)
        }
        Err(e) => Err(e.into()),
    }
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, customer_id, service_type, date, time, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            booking.id,
            booking.customer_id,
            booking.service_type,
            booking.date.format(DATE_FMT).to_string(),
            booking.time.format(TIME_FMT).to_string(),
            booking.status.as_str(),
            booking.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub struct BookingWithCustomer {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

pub fn list_bookings(
    conn: &Connection,
    name_contains: Option<&str>,
    email_contains: Option<&str>,
    on_date: Option<NaiveDate>,
) -> anyhow::Result<Vec<BookingWithCustomer>> {
    let mut sql = String::from(
        "SELECT b.id, c.name, c.email, c.phone, b.service_type, b.date, b.time, b.status, b.created_at
         FROM bookings b JOIN customers c ON b.customer_id = c.id",
    );
    let mut clauses: Vec<&str> = vec![];
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(name) = name_contains {
        clauses.push("c.name LIKE ?");
        params_vec.push(Box::new(format!("%{name}%")));
    }
    if let Some(email) = email_contains {
        clauses.push("c.email LIKE ?");
        params_vec.push(Box::new(format!("%{email}%")));
    }
    if let Some(date) = on_date {
        clauses.push("b.date = ?");
        params_vec.push(Box::new(date.format(DATE_FMT).to_string()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY b.created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<BookingWithCustomer> {
    let id: String = row.get(0)?;
    let customer_name: String = row.get(1)?;
    let customer_email: String = row.get(2)?;
    let customer_phone: String = row.get(3)?;
    let service_type: String = row.get(4)?;
    let date_str: String = row.get(5)?;
    let time_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .with_context(|| format!("bad booking date: {date_str}"))?;
    let time = NaiveTime::parse_from_str(&time_str, TIME_FMT)
        .with_context(|| format!("bad booking time: {time_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(BookingWithCustomer {
        id,
        customer_name,
        customer_email,
        customer_phone,
        service_type,
        date,
        time,
        status: BookingStatus::parse(&status_str),
        created_at,
    })
}
