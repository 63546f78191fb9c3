// Intent extraction over free-form chat text
//
// This module maps a raw user message to a coarse intent plus extracted
// entities, using ordered keyword/regex rules. Rules are evaluated in a
// fixed priority order and the first one that fully matches wins; a rule
// whose keywords hit but whose entity pattern fails yields nothing and
// evaluation falls through to the next rule. That fall-through is part of
// the contract, not an accident.

use crate::error::Result;
use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, trace};

/// Coarse category of a user request, carrying the entities extracted for it.
///
/// Each variant owns exactly the entities that are meaningful for it, so
/// match arms over the intent are exhaustive at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Request to search for flights between two places
    SearchFlights {
        origin: String,
        destination: String,
        date: NaiveDate,
    },
    /// Request to book the selected flight for a named passenger
    BookFlight { name: String },
    Greeting,
    PriceQuery,
    Thanks,
    Help,
    Unknown,
}

/// Result of classifying one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    /// Canned reply suitable for direct display. Always non-empty.
    pub reply: String,
}

pub(crate) const GREETING_REPLY: &str = "Hello! I'm your FlyIndia assistant. How can I help you today? You can ask me to search for flights or help with booking.";

pub(crate) const PRICE_REPLY: &str = "Flight prices vary based on the route, date, and availability. You can search for specific flights and I'll show you the current prices. Would you like to search for flights now?";

pub(crate) const THANKS_REPLY: &str =
    "You're welcome! Is there anything else I can help you with?";

pub(crate) const HELP_REPLY: &str = "I can help you search for flights, check prices, and book tickets. Try saying something like 'Find flights from Delhi to Mumbai' or 'How much does a flight from Bangalore to Chennai cost?'";

pub(crate) const UNKNOWN_REPLY: &str = "I'm not sure I understand. You can ask me to search for flights, check prices, or help with booking. For example, try asking 'Find flights from Delhi to Mumbai tomorrow'.";

/// Keyword/regex intent classifier.
///
/// Matching is case-insensitive substring matching throughout, with regex
/// extraction for route, date, and passenger-name entities. The classifier
/// is a pure function of the message text (and the injected "today"), but
/// [`classify`](IntentExtractor::classify) simulates network latency to
/// model a remote NLP call; construct with a zero latency for tests.
pub struct IntentExtractor {
    flight_kw: AhoCorasick,
    search_triggers: AhoCorasick,
    book_triggers: AhoCorasick,
    greeting_kw: AhoCorasick,
    price_kw: AhoCorasick,
    thanks_kw: AhoCorasick,
    help_kw: AhoCorasick,
    route_re: Regex,
    date_re: Regex,
    name_re: Regex,
    latency: Duration,
    /// Fixed "today" for deterministic tests; falls back to the wall clock.
    today_override: Option<NaiveDate>,
}

impl IntentExtractor {
    /// Create a classifier with the default simulated latency (1s).
    pub fn new() -> Self {
        Self::with_latency(Duration::from_millis(1000))
    }

    /// Create a classifier with an explicit simulated latency.
    pub fn with_latency(latency: Duration) -> Self {
        let ac = |patterns: &[&str]| -> AhoCorasick {
            AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .build(patterns)
                .expect("keyword automaton patterns are static")
        };

        Self {
            flight_kw: ac(&["flight"]),
            search_triggers: ac(&["search", "find", "book", "from", "to"]),
            book_triggers: ac(&["book", "reserve"]),
            greeting_kw: ac(&["hello", "hi", "hey", "greetings"]),
            price_kw: ac(&["price", "cost", "how much", "fare", "rupees", "rs"]),
            thanks_kw: ac(&["thank", "thanks"]),
            help_kw: ac(&["help", "how do", "what can you do"]),
            route_re: Regex::new(
                r"(?i)\b(?:from|between)\s+([a-z][a-z ]*?)\s+(?:to|and)\b\s+([a-z][a-z ]*)",
            )
            .expect("route pattern is static"),
            date_re: Regex::new(
                r"(?i)\b(?:on|for|date)\s+\d{1,2}(?:st|nd|rd|th)?\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\w*(?:\s+\d{4})?",
            )
            .expect("date pattern is static"),
            name_re: Regex::new(r"(?i)(?:my name is|for|passenger|name is|book for)\s+([a-z ]+)")
                .expect("name pattern is static"),
            latency,
            today_override: None,
        }
    }

    /// Pin "today" to a fixed date (for deterministic date-entity tests).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Classify a message, simulating classifier latency.
    ///
    /// Never fails for well-formed string input; an empty message yields
    /// [`Intent::Unknown`].
    pub async fn classify(&self, message: &str) -> Result<Classification> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        Ok(self.classify_text(message))
    }

    /// Synchronous rule evaluation. First match wins.
    pub fn classify_text(&self, message: &str) -> Classification {
        trace!(message_length = message.len(), "classifying message");

        // Rule 1: flight search
        if self.flight_kw.is_match(message) && self.search_triggers.is_match(message) {
            if let Some(classification) = self.try_search_rule(message) {
                return classification;
            }
            // keywords hit but no parseable route: fall through
            debug!("search keywords present but no from/to pair found");
        }

        // Rule 2: booking with passenger name
        if self.book_triggers.is_match(message) && contains_ignore_case(message, "name") {
            if let Some(classification) = self.try_book_rule(message) {
                return classification;
            }
            debug!("booking keywords present but no passenger name found");
        }

        // Rule 3: greeting
        if self.greeting_kw.is_match(message) {
            return Classification {
                intent: Intent::Greeting,
                reply: GREETING_REPLY.to_string(),
            };
        }

        // Rule 4: price query
        if self.price_kw.is_match(message) {
            return Classification {
                intent: Intent::PriceQuery,
                reply: PRICE_REPLY.to_string(),
            };
        }

        // Rule 5: thanks
        if self.thanks_kw.is_match(message) {
            return Classification {
                intent: Intent::Thanks,
                reply: THANKS_REPLY.to_string(),
            };
        }

        // Rule 6: help
        if self.help_kw.is_match(message) {
            return Classification {
                intent: Intent::Help,
                reply: HELP_REPLY.to_string(),
            };
        }

        Classification {
            intent: Intent::Unknown,
            reply: UNKNOWN_REPLY.to_string(),
        }
    }

    fn try_search_rule(&self, message: &str) -> Option<Classification> {
        let captures = self.route_re.captures(message)?;
        let origin = clean_place(captures.get(1)?.as_str());
        let destination = clean_place(captures.get(2)?.as_str());
        if origin.is_empty() || destination.is_empty() {
            return None;
        }

        let date = self.extract_date(message);
        debug!(%origin, %destination, %date, "search intent matched");

        let reply = format!("Searching for flights from {} to {}...", origin, destination);
        Some(Classification {
            intent: Intent::SearchFlights {
                origin,
                destination,
                date,
            },
            reply,
        })
    }

    fn try_book_rule(&self, message: &str) -> Option<Classification> {
        let captures = self.name_re.captures(message)?;
        let name = captures.get(1)?.as_str().trim().to_string();
        if name.is_empty() {
            return None;
        }

        debug!(passenger = %name, "booking intent matched");
        let reply = format!("I'll book this flight for {}.", name);
        Some(Classification {
            intent: Intent::BookFlight { name },
            reply,
        })
    }

    /// Date entity for a search request.
    ///
    /// An explicit month-name phrase resolves to today (a real NLP would
    /// parse it properly; the mock deliberately does not), "today" and
    /// "tomorrow" resolve literally, and the default is today.
    fn extract_date(&self, message: &str) -> NaiveDate {
        let today = self.today();
        if self.date_re.is_match(message) {
            today
        } else if contains_ignore_case(message, "today") {
            today
        } else if contains_ignore_case(message, "tomorrow") {
            today + ChronoDuration::days(1)
        } else {
            today
        }
    }
}

impl Default for IntentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Tidy a captured place name: trim, cut at a date-phrase marker, and drop
/// trailing "today"/"tomorrow" words that the greedy capture swallowed.
fn clean_place(raw: &str) -> String {
    let mut place = raw.trim();

    let lower = place.to_lowercase();
    for marker in [" on ", " for ", " this ", " next "] {
        if let Some(pos) = lower.find(marker) {
            place = place[..pos].trim_end();
            break;
        }
    }

    let mut words: Vec<&str> = place.split_whitespace().collect();
    while words
        .last()
        .map(|w| {
            let w = w.to_ascii_lowercase();
            w == "today" || w == "tomorrow"
        })
        .unwrap_or(false)
    {
        words.pop();
    }
    words.join(" ")
}
