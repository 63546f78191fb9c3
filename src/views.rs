//! Auth-gated read views
//!
//! The profile and ticket views sit on top of [`AuthProvider`] and
//! [`RecordStore`]. Both are read-only aggregations; the only mutation here
//! is sign-out from the profile view. An anonymous visitor gets a redirect
//! outcome rather than an error.

use crate::auth::{AuthProvider, AuthSession};
use crate::booking::Booking;
use crate::error::Result;
use crate::records::{ConversationRecord, RecordStore};
use crate::types::BookingId;
use std::sync::Arc;
use tracing::debug;

/// Outcome of loading an auth-gated view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome<T> {
    /// The viewer is signed in and the data loaded
    Ready(T),
    /// The viewer is anonymous and must sign in first
    RedirectToLogin,
}

impl<T> ViewOutcome<T> {
    /// Unwrap the loaded data, panicking on a redirect (for tests)
    pub fn expect_ready(self) -> T {
        match self {
            ViewOutcome::Ready(data) => data,
            ViewOutcome::RedirectToLogin => panic!("view redirected to login"),
        }
    }
}

/// Everything the profile page shows for a signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub session: AuthSession,
    /// The user's bookings, most recent first
    pub bookings: Vec<Booking>,
    /// The user's conversation records, most recent first
    pub conversations: Vec<ConversationRecord>,
}

/// The signed-in user's profile: session details, bookings, and chats
pub struct ProfileView {
    auth: Arc<dyn AuthProvider>,
    records: Arc<dyn RecordStore>,
}

impl ProfileView {
    pub fn new(auth: Arc<dyn AuthProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self { auth, records }
    }

    /// Load the profile for the current session
    pub async fn load(&self) -> Result<ViewOutcome<ProfileData>> {
        let session = match self.auth.current_session().await {
            Some(session) => session,
            None => return Ok(ViewOutcome::RedirectToLogin),
        };

        let bookings = self.records.bookings_for_user(&session.user_id).await?;
        let conversations = self
            .records
            .conversations_for_user(&session.user_id)
            .await?;

        debug!(
            user_id = %session.user_id,
            bookings = bookings.len(),
            conversations = conversations.len(),
            "profile loaded"
        );
        Ok(ViewOutcome::Ready(ProfileData {
            session,
            bookings,
            conversations,
        }))
    }

    /// Sign the current user out
    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await?;
        Ok(())
    }
}

/// A single ticket, rendered from a booking record
pub struct TicketView {
    auth: Arc<dyn AuthProvider>,
    records: Arc<dyn RecordStore>,
}

impl TicketView {
    pub fn new(auth: Arc<dyn AuthProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self { auth, records }
    }

    /// Load a booking to render as a ticket.
    ///
    /// With an explicit id, looks that booking up scoped to the current
    /// user; without one, falls back to the user's most recent booking.
    /// `Ready(None)` means the user is signed in but has nothing to show.
    pub async fn load(&self, id: Option<&BookingId>) -> Result<ViewOutcome<Option<Booking>>> {
        let session = match self.auth.current_session().await {
            Some(session) => session,
            None => return Ok(ViewOutcome::RedirectToLogin),
        };

        let booking = match id {
            Some(id) => self.records.booking(id, &session.user_id).await?,
            None => self.records.latest_booking(&session.user_id).await?,
        };
        Ok(ViewOutcome::Ready(booking))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuth;
    use crate::booking::{BookingReference, PassengerDetails};
    use crate::records::InMemoryRecords;
    use crate::search::{FlightSearcher, SearchConfig};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    async fn seed_booking(records: &InMemoryRecords, user: &str) -> Booking {
        let mut searcher = FlightSearcher::with_seed(4).configured(SearchConfig {
            latency: Duration::ZERO,
            ..SearchConfig::default()
        });
        let flight = searcher
            .search(
                "Delhi",
                "Goa",
                NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
            )
            .await
            .remove(0);
        let booking = Booking::confirmed(
            user.into(),
            flight,
            PassengerDetails::named("Ravi Kumar"),
            BookingReference::generate(&mut StdRng::seed_from_u64(4)),
        );
        records.create_booking(&booking).await.unwrap();
        booking
    }

    #[tokio::test]
    async fn test_profile_redirects_when_signed_out() {
        let auth = Arc::new(MockAuth::signed_out());
        let records = Arc::new(InMemoryRecords::new());
        let view = ProfileView::new(auth, records);

        assert_eq!(view.load().await.unwrap(), ViewOutcome::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_profile_shows_own_bookings_only() {
        let auth = Arc::new(MockAuth::signed_in("user-a"));
        let records = Arc::new(InMemoryRecords::new());
        seed_booking(&records, "user-a").await;
        seed_booking(&records, "user-b").await;

        let view = ProfileView::new(auth, records);
        let profile = view.load().await.unwrap().expect_ready();

        assert_eq!(profile.session.user_id.as_str(), "user-a");
        assert_eq!(profile.bookings.len(), 1);
        assert!(profile.conversations.is_empty());
    }

    #[tokio::test]
    async fn test_profile_sign_out_clears_session() {
        let auth = Arc::new(MockAuth::signed_in("user-a"));
        let records = Arc::new(InMemoryRecords::new());
        let view = ProfileView::new(auth.clone(), records);

        view.sign_out().await.unwrap();
        assert!(auth.current_session().await.is_none());
        assert_eq!(view.load().await.unwrap(), ViewOutcome::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_ticket_redirects_when_signed_out() {
        let auth = Arc::new(MockAuth::signed_out());
        let records = Arc::new(InMemoryRecords::new());
        let view = TicketView::new(auth, records);

        assert_eq!(
            view.load(None).await.unwrap(),
            ViewOutcome::RedirectToLogin
        );
    }

    #[tokio::test]
    async fn test_ticket_falls_back_to_latest_booking() {
        let auth = Arc::new(MockAuth::signed_in("user-a"));
        let records = Arc::new(InMemoryRecords::new());
        let booking = seed_booking(&records, "user-a").await;

        let view = TicketView::new(auth, records);
        let shown = view.load(None).await.unwrap().expect_ready().unwrap();
        assert_eq!(shown.id, booking.id);
    }

    #[tokio::test]
    async fn test_ticket_by_id_scoped_to_user() {
        let auth = Arc::new(MockAuth::signed_in("user-a"));
        let records = Arc::new(InMemoryRecords::new());
        let other = seed_booking(&records, "user-b").await;

        let view = TicketView::new(auth, records);
        // someone else's booking id loads as "nothing to show"
        assert!(view
            .load(Some(&other.id))
            .await
            .unwrap()
            .expect_ready()
            .is_none());
    }

    #[tokio::test]
    async fn test_ticket_none_when_no_bookings() {
        let auth = Arc::new(MockAuth::signed_in("user-a"));
        let records = Arc::new(InMemoryRecords::new());
        let view = TicketView::new(auth, records);

        assert!(view.load(None).await.unwrap().expect_ready().is_none());
    }
}
