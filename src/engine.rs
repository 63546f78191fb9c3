//! Conversation state machine
//!
//! [`ChatEngine`] owns the active conversation and the booking-flow state
//! (current result set, selected flight, passenger name, the UI-visible
//! `results_shown` / `confirmation_pending` flags) and drives the
//! search → select → confirm flow. Collaborators (intent extractor, flight
//! searcher, conversation store, auth provider, optional record store) are
//! injected at construction via [`ChatEngineBuilder`].
//!
//! Every operation takes `&mut self`, so a new message cannot be processed
//! while a prior classify/search chain is still in flight, and a completed
//! chain can never land on a conversation it no longer belongs to.
//!
//! Classifier and search failures never escape to the caller: the turn
//! degrades to a single apology message. Storage failures do escape, since
//! losing the log is not something the engine can paper over.

use crate::auth::{AuthProvider, AuthSession};
use crate::booking::{Booking, BookingReference, PassengerDetails};
use crate::conversation::{ChatMessage, Conversation, ConversationSummary};
use crate::error::{AssistantError, Result};
use crate::flight::{format_inr, Flight};
use crate::intent::{Intent, IntentExtractor};
use crate::records::{ConversationRecord, RecordStore};
use crate::search::FlightSearcher;
use crate::storage::ConversationStore;
use crate::types::{ConversationId, FlightId};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Opening message of every new conversation
pub const WELCOME_MESSAGE: &str = "Hello! I'm your FlyIndia assistant. I can help you search for flights, check prices, and book tickets. How can I assist you today?";

const LOGIN_PROMPT: &str =
    "Please sign in to select a flight and continue with your booking.";

const ERROR_REPLY: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

const CANCEL_REPLY: &str = "I've cancelled this booking. Would you like to search for different flights or make any other changes?";

/// Navigation side effect requested by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    /// Send the user to the login view
    Login,
}

/// Notification emitted alongside a turn
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A booking was confirmed
    BookingConfirmed { reference: BookingReference },
}

/// What one engine operation produced, for the shell to render
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TurnOutcome {
    /// The bot message appended this turn, if any
    pub reply: Option<ChatMessage>,
    /// Whether the flight result list should be rendered
    pub results_shown: bool,
    /// Whether the booking confirmation panel should be rendered
    pub confirmation_pending: bool,
    /// Requested navigation, if any
    pub navigate: Option<Navigate>,
    /// Notifications to surface (toasts)
    pub events: Vec<ChatEvent>,
    /// The booking assembled by a successful confirmation
    pub booking: Option<Booking>,
}

/// Engine tuning knobs
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Seed for the booking-reference generator; `None` uses entropy
    pub seed: Option<u64>,
}

/// Builder for [`ChatEngine`]. Store and auth are required.
#[derive(Default)]
pub struct ChatEngineBuilder {
    extractor: Option<IntentExtractor>,
    searcher: Option<FlightSearcher>,
    store: Option<Arc<dyn ConversationStore>>,
    auth: Option<Arc<dyn AuthProvider>>,
    records: Option<Arc<dyn RecordStore>>,
    config: EngineConfig,
}

impl ChatEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the intent extractor (defaults to [`IntentExtractor::new`])
    pub fn extractor(mut self, extractor: IntentExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the flight searcher (defaults to [`FlightSearcher::new`])
    pub fn searcher(mut self, searcher: FlightSearcher) -> Self {
        self.searcher = Some(searcher);
        self
    }

    /// Set the conversation store (required)
    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the auth provider (required)
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the backend record store (optional; bookings and chat history
    /// are only mirrored there when present)
    pub fn records(mut self, records: Arc<dyn RecordStore>) -> Self {
        self.records = Some(records);
        self
    }

    /// Set the engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine with a fresh welcome conversation.
    ///
    /// The conversation is persisted on its first mutation, not here.
    pub fn build(self) -> Result<ChatEngine> {
        let store = self
            .store
            .ok_or_else(|| AssistantError::Configuration("conversation store is required".to_string()))?;
        let auth = self
            .auth
            .ok_or_else(|| AssistantError::Configuration("auth provider is required".to_string()))?;

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let login_kw = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(["login", "log in", "sign in", "signin"])
            .map_err(|e| AssistantError::Internal(e.to_string()))?;

        Ok(ChatEngine {
            extractor: self.extractor.unwrap_or_default(),
            searcher: self.searcher.unwrap_or_default(),
            store,
            auth,
            records: self.records,
            rng,
            login_kw,
            conversation: welcome_conversation(),
            flights: Vec::new(),
            selected_flight: None,
            passenger_name: None,
            results_shown: false,
            confirmation_pending: false,
        })
    }
}

/// The conversation state machine
pub struct ChatEngine {
    extractor: IntentExtractor,
    searcher: FlightSearcher,
    store: Arc<dyn ConversationStore>,
    auth: Arc<dyn AuthProvider>,
    records: Option<Arc<dyn RecordStore>>,
    rng: StdRng,
    login_kw: AhoCorasick,

    conversation: Conversation,
    flights: Vec<Flight>,
    selected_flight: Option<Flight>,
    passenger_name: Option<String>,
    results_shown: bool,
    confirmation_pending: bool,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("flights", &self.flights)
            .field("selected_flight", &self.selected_flight)
            .field("passenger_name", &self.passenger_name)
            .field("results_shown", &self.results_shown)
            .field("confirmation_pending", &self.confirmation_pending)
            .finish_non_exhaustive()
    }
}

fn welcome_conversation() -> Conversation {
    let mut conversation = Conversation::new();
    conversation.push(ChatMessage::bot(WELCOME_MESSAGE));
    conversation
}

impl ChatEngine {
    /// Start building an engine
    pub fn builder() -> ChatEngineBuilder {
        ChatEngineBuilder::new()
    }

    /// The active conversation
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The current flight result set
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// The flight the user has selected, if any
    pub fn selected_flight(&self) -> Option<&Flight> {
        self.selected_flight.as_ref()
    }

    /// The passenger name captured by the booking flow, if any
    pub fn passenger_name(&self) -> Option<&str> {
        self.passenger_name.as_deref()
    }

    /// Whether the result list should currently be rendered
    pub fn results_shown(&self) -> bool {
        self.results_shown
    }

    /// Whether the confirmation panel should currently be rendered
    pub fn confirmation_pending(&self) -> bool {
        self.confirmation_pending
    }

    /// Process one user message and produce the assistant's turn.
    ///
    /// Explicit login keywords bypass the message log entirely and request
    /// navigation to the login view. Otherwise the message is appended,
    /// classified, and dispatched; classifier or search failures degrade to
    /// a single apology message rather than an error.
    pub async fn process_message(&mut self, text: &str) -> Result<TurnOutcome> {
        if self.login_kw.is_match(text) {
            debug!("login keywords matched, redirecting without log mutation");
            return Ok(TurnOutcome {
                navigate: Some(Navigate::Login),
                ..self.outcome(None)
            });
        }

        self.conversation.push(ChatMessage::user(text));

        let reply = match self.run_turn(text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "message pipeline failed, degrading to apology");
                ERROR_REPLY.to_string()
            }
        };

        let message = ChatMessage::bot(reply);
        self.conversation.push(message.clone());
        self.persist().await?;

        Ok(self.outcome(Some(message)))
    }

    /// Classify and dispatch one message, returning the bot reply text
    async fn run_turn(&mut self, text: &str) -> Result<String> {
        let classification = self.extractor.classify(text).await?;

        match classification.intent {
            Intent::SearchFlights {
                origin,
                destination,
                date,
            } => {
                self.flights = self.searcher.search(&origin, &destination, date).await;
                self.results_shown = !self.flights.is_empty();

                info!(
                    %origin,
                    %destination,
                    %date,
                    count = self.flights.len(),
                    "flight search completed"
                );

                if self.flights.is_empty() {
                    Ok(format!(
                        "I couldn't find any flights from {} to {} on the selected date. Would you like to try different dates or destinations?",
                        origin, destination
                    ))
                } else {
                    Ok(format!(
                        "I found {} flights from {} to {}. Here are the results:",
                        self.flights.len(),
                        origin,
                        destination
                    ))
                }
            }
            Intent::BookFlight { name } => {
                self.passenger_name = Some(name.clone());
                if self.selected_flight.is_some() {
                    self.confirmation_pending = true;
                    Ok(format!(
                        "Great! I've prepared a booking for {} on the selected flight. Please review the details and confirm your booking.",
                        name
                    ))
                } else {
                    Ok(format!(
                        "I'll need you to select a flight first before I can book it for {}. Would you like to search for flights?",
                        name
                    ))
                }
            }
            _ => Ok(classification.reply),
        }
    }

    /// Select a flight from the current result set.
    ///
    /// Requires an authenticated session: without one the selection is
    /// discarded, a login prompt is appended, and navigation to the login
    /// view is requested. Selecting an id that is not in the current
    /// results is an [`AssistantError::FlightNotFound`] error.
    pub async fn select_flight(&mut self, id: FlightId) -> Result<TurnOutcome> {
        let flight = self
            .flights
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(AssistantError::FlightNotFound(id))?;

        self.results_shown = false;

        if self.auth.current_session().await.is_none() {
            info!(flight_id = %id, "unauthenticated selection, redirecting to login");
            let message = ChatMessage::bot(LOGIN_PROMPT);
            self.conversation.push(message.clone());
            self.persist().await?;
            return Ok(TurnOutcome {
                navigate: Some(Navigate::Login),
                ..self.outcome(Some(message))
            });
        }

        let message = ChatMessage::bot(format!(
            "You've selected {} flight {} from {} to {} for ₹{}. Would you like to proceed with booking? Please provide the passenger name.",
            flight.airline,
            flight.flight_number,
            flight.origin,
            flight.destination,
            format_inr(flight.price)
        ));

        info!(flight_id = %id, flight_number = %flight.flight_number, "flight selected");
        self.selected_flight = Some(flight);
        self.conversation.push(message.clone());
        self.persist().await?;

        Ok(self.outcome(Some(message)))
    }

    /// Confirm the pending booking.
    ///
    /// Only valid while the confirmation panel is shown. Generates the
    /// booking reference, appends the success message, clears the selection
    /// and passenger name, writes the booking to the record store when one
    /// is configured, and emits [`ChatEvent::BookingConfirmed`].
    pub async fn confirm_booking(&mut self) -> Result<TurnOutcome> {
        if !self.confirmation_pending {
            return Err(AssistantError::NoPendingConfirmation);
        }
        let flight = self
            .selected_flight
            .clone()
            .ok_or(AssistantError::NoFlightSelected)?;

        let session = match self.auth.current_session().await {
            Some(session) => session,
            None => {
                // Session expired between selection and confirmation
                info!("no session at confirmation, redirecting to login");
                let message = ChatMessage::bot(LOGIN_PROMPT);
                self.conversation.push(message.clone());
                self.persist().await?;
                return Ok(TurnOutcome {
                    navigate: Some(Navigate::Login),
                    ..self.outcome(Some(message))
                });
            }
        };

        let name = self
            .passenger_name
            .clone()
            .ok_or_else(|| AssistantError::Internal("confirmation pending without passenger name".to_string()))?;

        let reference = BookingReference::generate(&mut self.rng);
        let message = ChatMessage::bot(format!(
            "Congratulations! Your {} class flight from {} to {} has been booked successfully. Baggage allowance: {} cabin, {} check-in. Your booking reference is {}.",
            flight.class,
            flight.origin,
            flight.destination,
            flight.baggage.cabin,
            flight.baggage.checkin,
            reference
        ));

        let booking = Booking::confirmed(
            session.user_id.clone(),
            flight,
            PassengerDetails::named(name),
            reference.clone(),
        );
        if let Some(records) = &self.records {
            records.create_booking(&booking).await?;
        }

        info!(
            booking_id = %booking.id,
            reference = %reference,
            user_id = %session.user_id,
            "booking confirmed"
        );

        self.confirmation_pending = false;
        self.selected_flight = None;
        self.passenger_name = None;
        self.conversation.push(message.clone());
        self.persist().await?;

        Ok(TurnOutcome {
            events: vec![ChatEvent::BookingConfirmed { reference }],
            booking: Some(booking),
            ..self.outcome(Some(message))
        })
    }

    /// Dismiss the pending booking.
    ///
    /// Clears the confirmation flag and appends the acknowledgement. The
    /// selected flight is retained so the user can confirm again without
    /// reselecting.
    pub async fn cancel_booking(&mut self) -> Result<TurnOutcome> {
        if !self.confirmation_pending {
            return Err(AssistantError::NoPendingConfirmation);
        }
        self.confirmation_pending = false;

        let message = ChatMessage::bot(CANCEL_REPLY);
        self.conversation.push(message.clone());
        self.persist().await?;

        Ok(self.outcome(Some(message)))
    }

    /// Start a fresh conversation with the welcome message and make it the
    /// active one. The previous conversation stays in the store.
    pub async fn new_conversation(&mut self) -> Result<ConversationId> {
        self.conversation = welcome_conversation();
        self.reset_flow();
        self.persist().await?;

        info!(conversation_id = %self.conversation.id, "started new conversation");
        Ok(self.conversation.id)
    }

    /// Switch to a stored conversation. The booking flow state is reset;
    /// flows do not survive a conversation switch.
    pub async fn switch_conversation(&mut self, id: ConversationId) -> Result<()> {
        let conversation = self
            .store
            .load(&id)
            .await?
            .ok_or(AssistantError::ConversationNotFound(id))?;

        self.conversation = conversation;
        self.reset_flow();
        debug!(conversation_id = %id, "switched conversation");
        Ok(())
    }

    /// Delete a stored conversation.
    ///
    /// If the active conversation was deleted, the engine switches to the
    /// most recently updated remaining one, or starts a fresh conversation
    /// when none remain.
    pub async fn delete_conversation(&mut self, id: ConversationId) -> Result<()> {
        self.store.delete(&id).await?;

        if self.conversation.id == id {
            let summaries = self.store.list_summaries().await?;
            match summaries.first() {
                Some(next) => self.switch_conversation(next.id).await?,
                None => {
                    self.new_conversation().await?;
                }
            }
        }
        Ok(())
    }

    /// Summaries of all stored conversations, most recent first
    pub async fn conversation_summaries(&self) -> Result<Vec<ConversationSummary>> {
        Ok(self.store.list_summaries().await?)
    }

    fn reset_flow(&mut self) {
        self.flights.clear();
        self.selected_flight = None;
        self.passenger_name = None;
        self.results_shown = false;
        self.confirmation_pending = false;
    }

    fn outcome(&self, reply: Option<ChatMessage>) -> TurnOutcome {
        TurnOutcome {
            reply,
            results_shown: self.results_shown,
            confirmation_pending: self.confirmation_pending,
            navigate: None,
            events: Vec::new(),
            booking: None,
        }
    }

    /// Persist the active conversation, and mirror it into the record store
    /// for the signed-in user when one is configured.
    async fn persist(&mut self) -> Result<()> {
        self.store.save(&self.conversation).await?;

        if let Some(records) = &self.records {
            if let Some(AuthSession { user_id, .. }) = self.auth.current_session().await {
                let record = ConversationRecord {
                    id: self.conversation.id,
                    user_id,
                    title: self.conversation.title.clone(),
                    timestamp: self.conversation.timestamp,
                    messages: self.conversation.messages.clone(),
                };
                records.create_conversation_record(&record).await?;
            }
        }
        Ok(())
    }
}
