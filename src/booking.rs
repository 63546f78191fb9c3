//! Booking records and booking references
//!
//! A booking embeds a snapshot of the flight it was made against, so later
//! changes to inventory never alter what the user actually bought. Records
//! are created on confirmation and read-only afterwards from this crate's
//! perspective.

use crate::flight::Flight;
use crate::types::{BookingId, FlightId, UserId};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

/// Payment state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Refunded,
}

/// Passenger details captured during the booking flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PassengerDetails {
    /// Details with just a name, as collected by the chat flow
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }
}

/// Short human-shareable token identifying a confirmed booking.
///
/// Always eight uppercase alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingReference(String);

const REFERENCE_LEN: usize = 8;
const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

impl BookingReference {
    /// Generate a fresh reference from the given random source
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let token: String = (0..REFERENCE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..REFERENCE_CHARSET.len());
                REFERENCE_CHARSET[idx] as char
            })
            .collect();
        Self(token)
    }

    /// The reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed booking, as stored by the external backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub flight_id: FlightId,
    /// Snapshot of the flight at booking time
    pub flight: Flight,
    pub passenger_details: PassengerDetails,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: u32,
    pub booking_reference: BookingReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<String>,
}

impl Booking {
    /// Assemble a confirmed booking from a selected flight
    pub fn confirmed(
        user_id: UserId,
        flight: Flight,
        passenger: PassengerDetails,
        reference: BookingReference,
    ) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            flight_id: flight.id,
            total_amount: flight.price,
            flight,
            passenger_details: passenger,
            booking_date: Utc::now(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            booking_reference: reference,
            seat_number: None,
        }
    }
}
