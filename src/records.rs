//! Backend record store
//!
//! Bookings and per-user conversation records live in an external managed
//! database; [`RecordStore`] is the trait seam for it. The in-memory
//! implementation backs tests and demos. Bookings are written once on
//! confirmation and read back by the profile and ticket views.

use crate::booking::Booking;
use crate::conversation::ChatMessage;
use crate::error::StorageError;
use crate::types::{BookingId, ConversationId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A conversation as mirrored into the backend for a signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: ConversationId,
    pub user_id: UserId,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

/// Trait for the external bookings and conversation database
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new booking record
    async fn create_booking(&self, booking: &Booking) -> Result<(), StorageError>;

    /// All bookings for a user, most recent first
    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<Booking>, StorageError>;

    /// A single booking, scoped to the owning user
    async fn booking(
        &self,
        id: &BookingId,
        user: &UserId,
    ) -> Result<Option<Booking>, StorageError>;

    /// The user's most recent booking, if any
    async fn latest_booking(&self, user: &UserId) -> Result<Option<Booking>, StorageError> {
        Ok(self.bookings_for_user(user).await?.into_iter().next())
    }

    /// Persist a conversation record for a user
    async fn create_conversation_record(
        &self,
        record: &ConversationRecord,
    ) -> Result<(), StorageError>;

    /// All conversation records for a user, most recent first
    async fn conversations_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<ConversationRecord>, StorageError>;
}

/// In-memory record store for tests and demos
#[derive(Clone, Default)]
pub struct InMemoryRecords {
    bookings: Arc<RwLock<Vec<Booking>>>,
    conversations: Arc<RwLock<HashMap<ConversationId, ConversationRecord>>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bookings across all users (for tests)
    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecords {
    async fn create_booking(&self, booking: &Booking) -> Result<(), StorageError> {
        self.bookings.write().await.push(booking.clone());
        debug!(booking_id = %booking.id, user_id = %booking.user_id, "booking recorded");
        Ok(())
    }

    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<Booking>, StorageError> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| &b.user_id == user)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        Ok(bookings)
    }

    async fn booking(
        &self,
        id: &BookingId,
        user: &UserId,
    ) -> Result<Option<Booking>, StorageError> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .find(|b| &b.id == id && &b.user_id == user)
            .cloned())
    }

    async fn create_conversation_record(
        &self,
        record: &ConversationRecord,
    ) -> Result<(), StorageError> {
        self.conversations
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn conversations_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<ConversationRecord>, StorageError> {
        let mut records: Vec<ConversationRecord> = self
            .conversations
            .read()
            .await
            .values()
            .filter(|r| &r.user_id == user)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingReference, PassengerDetails};
    use crate::flight::Flight;
    use crate::search::{FlightSearcher, SearchConfig};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    async fn sample_flight() -> Flight {
        let mut searcher = FlightSearcher::with_seed(1).configured(SearchConfig {
            latency: Duration::ZERO,
            ..SearchConfig::default()
        });
        searcher
            .search(
                "Delhi",
                "Mumbai",
                NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
            )
            .await
            .remove(0)
    }

    fn booking_for(user: &str, flight: Flight) -> Booking {
        let mut rng = StdRng::seed_from_u64(2);
        Booking::confirmed(
            user.into(),
            flight,
            PassengerDetails::named("Asha Rao"),
            BookingReference::generate(&mut rng),
        )
    }

    #[tokio::test]
    async fn test_bookings_scoped_to_user() {
        let records = InMemoryRecords::new();
        let flight = sample_flight().await;
        records
            .create_booking(&booking_for("user-a", flight.clone()))
            .await
            .unwrap();
        records
            .create_booking(&booking_for("user-b", flight))
            .await
            .unwrap();

        let mine = records.bookings_for_user(&"user-a".into()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id.as_str(), "user-a");
    }

    #[tokio::test]
    async fn test_booking_lookup_requires_matching_user() {
        let records = InMemoryRecords::new();
        let booking = booking_for("user-a", sample_flight().await);
        records.create_booking(&booking).await.unwrap();

        assert!(records
            .booking(&booking.id, &"user-a".into())
            .await
            .unwrap()
            .is_some());
        assert!(records
            .booking(&booking.id, &"user-b".into())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_latest_booking_is_most_recent() {
        let records = InMemoryRecords::new();
        let flight = sample_flight().await;

        let first = booking_for("user-a", flight.clone());
        records.create_booking(&first).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = booking_for("user-a", flight);
        records.create_booking(&second).await.unwrap();

        let latest = records
            .latest_booking(&"user-a".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[tokio::test]
    async fn test_latest_booking_none_when_empty() {
        let records = InMemoryRecords::new();
        assert!(records
            .latest_booking(&"user-a".into())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_conversation_records_upsert_and_sort() {
        let records = InMemoryRecords::new();
        let user: UserId = "user-a".into();

        let mut older = ConversationRecord {
            id: ConversationId::new(),
            user_id: user.clone(),
            title: "first".to_string(),
            timestamp: Utc::now(),
            messages: vec![ChatMessage::user("first")],
        };
        records.create_conversation_record(&older).await.unwrap();

        let newer = ConversationRecord {
            id: ConversationId::new(),
            user_id: user.clone(),
            title: "second".to_string(),
            timestamp: Utc::now() + chrono::Duration::seconds(1),
            messages: vec![ChatMessage::user("second")],
        };
        records.create_conversation_record(&newer).await.unwrap();

        // re-saving the same id replaces, not duplicates
        older.title = "first updated".to_string();
        records.create_conversation_record(&older).await.unwrap();

        let listed = records.conversations_for_user(&user).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "second");
        assert_eq!(listed[1].title, "first updated");
    }
}
