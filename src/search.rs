//! Mock flight inventory search
//!
//! Stands in for a real inventory API: synthesizes a pseudo-random list of
//! flight offers for a route and date. The random source is an injected,
//! seedable generator so a fixed seed yields deterministic results, and the
//! call simulates remote latency before resolving. It never fails for valid
//! input; an empty result set is a normal outcome, not an error.

use crate::flight::{
    amenities_for, baggage_for, BaggageAllowance, CabinClass, Flight, Layover, AIRCRAFT_MODELS,
    AIRLINES, AIRPORTS,
};
use crate::types::FlightId;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Tuning knobs for the mock generator
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Minimum number of offers per search (inclusive)
    pub min_results: u32,
    /// Maximum number of offers per search (inclusive)
    pub max_results: u32,
    /// Simulated inventory-query latency
    pub latency: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_results: 5,
            max_results: 15,
            latency: Duration::from_millis(1500),
        }
    }
}

/// Mock flight search generator
pub struct FlightSearcher {
    config: SearchConfig,
    rng: StdRng,
}

impl FlightSearcher {
    /// Create a searcher seeded from system entropy
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Create a searcher with a custom configuration
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic searcher for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: SearchConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the configuration (builder style)
    pub fn configured(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Search for flights between two cities on a date.
    ///
    /// Returns an empty list when origin and destination are the same
    /// (case-insensitive) or either is empty. Results are sorted ascending
    /// by departure time.
    pub async fn search(
        &mut self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Vec<Flight> {
        if !self.config.latency.is_zero() {
            sleep(self.config.latency).await;
        }

        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty()
            || destination.is_empty()
            || origin.eq_ignore_ascii_case(destination)
        {
            debug!(%origin, %destination, "degenerate route, returning no flights");
            return Vec::new();
        }

        let count = self
            .rng
            .gen_range(self.config.min_results..=self.config.max_results);
        let mut flights: Vec<Flight> = (0..count)
            .map(|_| self.generate_flight(origin, destination, date))
            .collect();
        flights.sort_by_key(|f| f.departure_time);

        debug!(%origin, %destination, %date, count = flights.len(), "generated flight offers");
        flights
    }

    fn generate_flight(&mut self, origin: &str, destination: &str, date: NaiveDate) -> Flight {
        let rng = &mut self.rng;

        // Departure on a 5-minute grid, any hour of the requested day
        let hour = rng.gen_range(0..24);
        let minute = 5 * rng.gen_range(0..12);
        let departure_time = to_utc(date, hour, minute);

        let duration_minutes: u32 = rng.gen_range(60..300);
        let arrival_time = departure_time + ChronoDuration::minutes(duration_minutes as i64);

        let layovers = if rng.gen_bool(0.3) {
            let layover_count = rng.gen_range(1..=2);
            (0..layover_count)
                .map(|_| Layover {
                    airport: pick_via_city(rng, origin, destination).to_string(),
                    duration_minutes: rng.gen_range(30..180),
                })
                .collect()
        } else {
            Vec::new()
        };

        let (airline, airline_code) = *AIRLINES.choose(rng).expect("airline catalog is non-empty");
        let flight_number = format!("{}{}", airline_code, rng.gen_range(1000..10000));

        let class = weighted_class(rng);
        let base_price: u32 = match class {
            CabinClass::Economy => rng.gen_range(3000..8000),
            CabinClass::PremiumEconomy => rng.gen_range(8000..16000),
            CabinClass::Business => rng.gen_range(15000..35000),
            CabinClass::First => rng.gen_range(30000..70000),
        };
        // Flat surcharges: per layover, and for long legs
        let long_leg = if duration_minutes > 180 { 2000 } else { 0 };
        let price = base_price + layovers.len() as u32 * 1000 + long_leg;

        Flight {
            id: FlightId::new(),
            airline: airline.to_string(),
            flight_number,
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_time,
            arrival_time,
            duration_minutes,
            price,
            seat_availability: rng.gen_range(1..=30),
            class,
            aircraft: AIRCRAFT_MODELS
                .choose(rng)
                .expect("aircraft catalog is non-empty")
                .to_string(),
            amenities: random_amenities(rng, class),
            layovers,
            refundable: rng.gen_bool(0.7),
            baggage: class_baggage(class),
        }
    }
}

impl Default for FlightSearcher {
    fn default() -> Self {
        Self::new()
    }
}

fn to_utc(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .expect("hour and minute are in range");
    Utc.from_utc_datetime(&naive)
}

/// Fare class with weights 6:2:1:1 (Economy most likely)
fn weighted_class(rng: &mut StdRng) -> CabinClass {
    match rng.gen_range(0..10) {
        0..=5 => CabinClass::Economy,
        6 | 7 => CabinClass::PremiumEconomy,
        8 => CabinClass::Business,
        _ => CabinClass::First,
    }
}

/// A layover city that is neither the requested origin nor destination
fn pick_via_city(rng: &mut StdRng, origin: &str, destination: &str) -> &'static str {
    loop {
        let (_, city) = AIRPORTS.choose(rng).expect("airport catalog is non-empty");
        if !city.eq_ignore_ascii_case(origin) && !city.eq_ignore_ascii_case(destination) {
            return city;
        }
    }
}

/// Random non-empty subset (2 to 5 entries) of the class amenity catalog
fn random_amenities(rng: &mut StdRng, class: CabinClass) -> Vec<String> {
    let catalog = amenities_for(class);
    let count = rng.gen_range(2..=5).min(catalog.len());
    let mut shuffled: Vec<&str> = catalog.to_vec();
    shuffled.shuffle(rng);
    shuffled
        .into_iter()
        .take(count)
        .map(str::to_string)
        .collect()
}

fn class_baggage(class: CabinClass) -> BaggageAllowance {
    baggage_for(class)
}
