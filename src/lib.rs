//! # Flychat - Conversational Flight Search for Rust
//!
//! Flychat is the conversational core of the FlyIndia flight-search
//! assistant: intent extraction over free text, a mock flight inventory,
//! and a conversation state machine that drives the search → select →
//! confirm booking flow, with locally persisted chat history and
//! auth-gated booking views.
//!
//! ## Features
//!
//! - 🔎 **Intent Extraction**: Ordered keyword/regex rules mapping free text
//!   to search, booking, greeting, price, thanks, and help intents
//! - ✈️ **Mock Inventory**: Seedable pseudo-random flight offers over Indian
//!   routes with realistic fares, layovers, amenities, and baggage rules
//! - 💬 **Conversation Engine**: State machine for search results, flight
//!   selection, and booking confirmation with append-only message logs
//! - 💾 **Persistent History**: Conversations stored behind a key-value
//!   trait, in-memory by default
//! - 🔐 **Auth Gating**: Flight selection and booking require a session;
//!   anonymous users are redirected to login, never shown an error
//! - 🦀 **Type-Safe**: Newtype identifiers and tagged intent entities
//!
//! ## Quick Start
//!
//! ```no_run
//! use flychat::{ChatEngine, MockAuth, InMemoryConversationStore};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = ChatEngine::builder()
//!     .store(Arc::new(InMemoryConversationStore::in_memory()))
//!     .auth(Arc::new(MockAuth::signed_in("demo-user")))
//!     .build()?;
//!
//! // Search for flights
//! let turn = engine
//!     .process_message("Find flights from Delhi to Mumbai tomorrow")
//!     .await?;
//! println!("Bot: {}", turn.reply.unwrap().text);
//!
//! // Select the first result and book it
//! let flight_id = engine.flights()[0].id;
//! engine.select_flight(flight_id).await?;
//! engine.process_message("Book it, my name is Asha Rao").await?;
//! let turn = engine.confirm_booking().await?;
//! println!("Booked: {}", turn.booking.unwrap().booking_reference);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`engine`]: Conversation state machine and builder
//! - [`intent`]: Intent and entity extraction rules
//! - [`search`]: Mock flight inventory generator
//! - [`flight`]: Flight offers, catalogs, and display formatters
//! - [`conversation`]: Message logs, titles, and summaries
//! - [`booking`]: Booking records and references
//! - [`storage`]: Conversation persistence traits and backends
//! - [`auth`]: Auth provider trait and mock implementation
//! - [`records`]: External booking/chat record store trait
//! - [`views`]: Auth-gated profile and ticket read models
//! - [`error`]: Error types and result aliases

/// Common type definitions
pub mod types;

/// Error types
pub mod error;

/// Conversation data structures
pub mod conversation;

/// Flight data model and catalogs
pub mod flight;

/// Intent extraction
pub mod intent;

/// Mock flight search
pub mod search;

/// Booking records
pub mod booking;

/// Conversation state machine
pub mod engine;

/// Conversation persistence
pub mod storage;

/// Authentication collaborator
pub mod auth;

/// External record store
pub mod records;

/// Auth-gated read views
pub mod views;

pub use auth::{AuthProvider, AuthSession, MockAuth, OAuthProvider};
pub use booking::{
    Booking, BookingReference, BookingStatus, PassengerDetails, PaymentStatus,
};
pub use conversation::{
    ChatMessage, Conversation, ConversationSummary, MessageRole, DEFAULT_TITLE, TITLE_MAX_CHARS,
};
pub use engine::{
    ChatEngine, ChatEngineBuilder, ChatEvent, EngineConfig, Navigate, TurnOutcome,
    WELCOME_MESSAGE,
};
pub use error::{AssistantError, AuthError, AuthResult, Result, StorageError, StorageResult};
pub use flight::{BaggageAllowance, CabinClass, Flight, Layover};
pub use intent::{Classification, Intent, IntentExtractor};
pub use records::{ConversationRecord, InMemoryRecords, RecordStore};
pub use search::{FlightSearcher, SearchConfig};
pub use storage::{
    memory::{InMemoryConversationStore, InMemoryKeyValue},
    ConversationStore, KeyValueStore, KvConversationStore,
};
pub use types::*;
pub use views::{ProfileData, ProfileView, TicketView, ViewOutcome};
