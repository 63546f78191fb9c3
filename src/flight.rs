//! Flight offer data model and static inventory catalogs
//!
//! Flights are immutable once generated and live only for the lifetime of a
//! search result set held by the engine; they are never persisted on their
//! own (a confirmed booking embeds its own snapshot).

use crate::types::FlightId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fare class of a flight offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CabinClass {
    Economy,
    #[serde(rename = "Premium Economy")]
    PremiumEconomy,
    Business,
    First,
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CabinClass::Economy => "Economy",
            CabinClass::PremiumEconomy => "Premium Economy",
            CabinClass::Business => "Business",
            CabinClass::First => "First",
        };
        write!(f, "{}", label)
    }
}

/// Cabin and check-in baggage allowance, fixed per fare class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaggageAllowance {
    pub cabin: String,
    pub checkin: String,
}

/// An intermediate stop on a flight itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layover {
    /// City of the layover airport
    pub airport: String,
    /// Time on the ground, in minutes
    pub duration_minutes: u32,
}

/// A single flight offer returned by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Total travel time in minutes
    pub duration_minutes: u32,
    /// Fare in rupees
    pub price: u32,
    pub seat_availability: u32,
    pub class: CabinClass,
    pub aircraft: String,
    pub amenities: Vec<String>,
    /// Intermediate stops, in order. Empty for direct flights.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layovers: Vec<Layover>,
    pub refundable: bool,
    pub baggage: BaggageAllowance,
}

impl Flight {
    /// Whether this is a direct flight
    pub fn is_direct(&self) -> bool {
        self.layovers.is_empty()
    }
}

/// Major Indian airports, `(IATA code, city)`
pub const AIRPORTS: &[(&str, &str)] = &[
    ("DEL", "Delhi"),
    ("BOM", "Mumbai"),
    ("BLR", "Bangalore"),
    ("MAA", "Chennai"),
    ("CCU", "Kolkata"),
    ("HYD", "Hyderabad"),
    ("COK", "Kochi"),
    ("JAI", "Jaipur"),
    ("AMD", "Ahmedabad"),
    ("PNQ", "Pune"),
    ("GOI", "Goa"),
    ("IXC", "Chandigarh"),
    ("PAT", "Patna"),
    ("LKO", "Lucknow"),
    ("IXB", "Bagdogra"),
    ("GAU", "Guwahati"),
    ("BBI", "Bhubaneswar"),
    ("VTZ", "Visakhapatnam"),
    ("IXM", "Madurai"),
    ("TRV", "Thiruvananthapuram"),
];

/// Domestic carriers, `(name, airline code)`
pub const AIRLINES: &[(&str, &str)] = &[
    ("Air India", "AI"),
    ("IndiGo", "6E"),
    ("SpiceJet", "SG"),
    ("Vistara", "UK"),
    ("GoAir", "G8"),
    ("AirAsia India", "I5"),
    ("Air India Express", "IX"),
    ("TruJet", "2T"),
    ("Alliance Air", "9I"),
    ("Star Air", "OG"),
];

/// Aircraft models appearing in generated offers
pub const AIRCRAFT_MODELS: &[&str] = &[
    "Airbus A320",
    "Airbus A321",
    "Airbus A330",
    "Boeing 737-800",
    "Boeing 777-300ER",
    "Boeing 787-8 Dreamliner",
    "ATR 72-600",
    "Bombardier Q400",
    "Airbus A319",
    "Airbus A350",
];

/// Amenity catalog for a fare class
pub fn amenities_for(class: CabinClass) -> &'static [&'static str] {
    match class {
        CabinClass::Economy => &[
            "WiFi",
            "In-flight entertainment",
            "Complimentary meal",
            "USB charging port",
            "Reclining seats",
        ],
        CabinClass::PremiumEconomy => &[
            "WiFi",
            "In-flight entertainment",
            "Premium meal service",
            "Extra legroom",
            "Priority boarding",
            "USB and power outlets",
            "Amenity kit",
        ],
        CabinClass::Business => &[
            "Lie-flat seats",
            "Gourmet meal service",
            "Lounge access",
            "Priority check-in",
            "Premium in-flight entertainment",
            "WiFi",
            "Power outlets",
            "Amenity kit",
            "Dedicated cabin crew",
        ],
        CabinClass::First => &[
            "Private suite",
            "Fine dining",
            "Premium lounge access",
            "Chauffeur service",
            "Luxury amenity kit",
            "Premium bedding",
            "Personal cabin attendant",
            "Private screen",
            "Shower facility",
        ],
    }
}

/// Baggage allowance lookup table, fixed per fare class
pub fn baggage_for(class: CabinClass) -> BaggageAllowance {
    let (cabin, checkin) = match class {
        CabinClass::Economy => ("7 kg", "15 kg"),
        CabinClass::PremiumEconomy => ("7 kg", "25 kg"),
        CabinClass::Business => ("10 kg", "35 kg"),
        CabinClass::First => ("14 kg", "40 kg"),
    };
    BaggageAllowance {
        cabin: cabin.to_string(),
        checkin: checkin.to_string(),
    }
}

/// Find an airport code by city name (case-insensitive)
pub fn find_airport_code(city: &str) -> Option<&'static str> {
    AIRPORTS
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(city.trim()))
        .map(|(code, _)| *code)
}

/// Find a city name by airport code (case-insensitive)
pub fn find_city_name(code: &str) -> Option<&'static str> {
    AIRPORTS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, city)| *city)
}

/// Format a duration in minutes as `"2h 15m"` / `"45m"`
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    } else {
        format!("{}m", mins)
    }
}

/// Format a rupee amount with Indian digit grouping, e.g. `12,34,567`
pub fn format_inr(amount: u32) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut i = head.len();
    // groups of two to the left of the last three digits
    while i > 2 {
        groups.push(&head[i - 2..i]);
        i -= 2;
    }
    groups.push(&head[..i]);

    let mut out = String::new();
    for group in groups.iter().rev() {
        out.push_str(group);
        out.push(',');
    }
    out.push_str(tail);
    out
}
