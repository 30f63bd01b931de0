use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One in-progress booking, owned by a single conversation. Fields fill in
/// fixed order: name, email, phone, service type, date, time. The draft is
/// only ever mutated by the slot-filling flow and reset on commit/restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub awaiting_confirmation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    Name,
    Email,
    Phone,
    ServiceType,
    Date,
    Time,
}

impl BookingDraft {
    /// First field in the fixed order that has not been collected yet.
    pub fn next_unset(&self) -> Option<SlotField> {
        if self.name.is_none() {
            Some(SlotField::Name)
        } else if self.email.is_none() {
            Some(SlotField::Email)
        } else if self.phone.is_none() {
            Some(SlotField::Phone)
        } else if self.service_type.is_none() {
            Some(SlotField::ServiceType)
        } else if self.date.is_none() {
            Some(SlotField::Date)
        } else if self.time.is_none() {
            Some(SlotField::Time)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && !self.awaiting_confirmation
    }

    /// Snapshot of a fully collected draft, ready to persist. None if any
    /// field is still missing.
    pub fn to_request(&self) -> Option<BookingRequest> {
        Some(BookingRequest {
            name: self.name.clone()?,
            email: self.email.clone()?,
            phone: self.phone.clone()?,
            service_type: self.service_type.clone()?,
            date: self.date?,
            time: self.time?,
        })
    }
}

/// The six confirmed fields handed to the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}
