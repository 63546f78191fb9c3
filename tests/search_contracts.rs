//! Contract tests for the mock flight inventory

use chrono::{Datelike, NaiveDate};
use flychat::{CabinClass, FlightSearcher, SearchConfig};
use std::time::Duration;

fn searcher(seed: u64) -> FlightSearcher {
    FlightSearcher::with_seed(seed).configured(SearchConfig {
        latency: Duration::ZERO,
        ..SearchConfig::default()
    })
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()
}

#[tokio::test]
async fn valid_route_always_yields_results() {
    for seed in 0..25 {
        let flights = searcher(seed).search("Delhi", "Mumbai", date()).await;
        assert!(
            (5..=15).contains(&flights.len()),
            "seed {}: {} flights",
            seed,
            flights.len()
        );
    }
}

#[tokio::test]
async fn degenerate_routes_yield_nothing() {
    let mut s = searcher(0);
    assert!(s.search("Goa", "goa", date()).await.is_empty());
    assert!(s.search(" ", "Goa", date()).await.is_empty());
    assert!(s.search("Goa", "", date()).await.is_empty());
}

#[tokio::test]
async fn offers_are_on_the_requested_date_and_sorted() {
    let flights = searcher(13).search("Jaipur", "Kochi", date()).await;

    for pair in flights.windows(2) {
        assert!(pair[0].departure_time <= pair[1].departure_time);
    }
    for flight in &flights {
        assert_eq!(flight.departure_time.date_naive().year(), 2026);
        assert_eq!(flight.departure_time.date_naive(), date());
    }
}

#[tokio::test]
async fn fares_respect_class_floors_and_surcharges() {
    for seed in 0..15 {
        let flights = searcher(seed).search("Delhi", "Chennai", date()).await;
        for flight in flights {
            let floor = match flight.class {
                CabinClass::Economy => 3000,
                CabinClass::PremiumEconomy => 8000,
                CabinClass::Business => 15000,
                CabinClass::First => 30000,
            };
            let ceiling = match flight.class {
                CabinClass::Economy => 7999,
                CabinClass::PremiumEconomy => 15999,
                CabinClass::Business => 34999,
                CabinClass::First => 69999,
            };
            let surcharges = flight.layovers.len() as u32 * 1000
                + if flight.duration_minutes > 180 { 2000 } else { 0 };
            assert!(flight.price >= floor + surcharges);
            assert!(flight.price <= ceiling + surcharges);
        }
    }
}

#[tokio::test]
async fn layovers_avoid_the_endpoints() {
    for seed in 0..15 {
        let flights = searcher(seed).search("Mumbai", "Lucknow", date()).await;
        for flight in flights {
            assert!(flight.layovers.len() <= 2);
            assert_eq!(flight.is_direct(), flight.layovers.is_empty());
            for layover in &flight.layovers {
                assert!(!layover.airport.eq_ignore_ascii_case("Mumbai"));
                assert!(!layover.airport.eq_ignore_ascii_case("Lucknow"));
            }
        }
    }
}

#[tokio::test]
async fn baggage_follows_the_class_table() {
    let flights = searcher(3).search("Delhi", "Goa", date()).await;
    for flight in flights {
        let expected_cabin = match flight.class {
            CabinClass::Economy | CabinClass::PremiumEconomy => "7 kg",
            CabinClass::Business => "10 kg",
            CabinClass::First => "14 kg",
        };
        assert_eq!(flight.baggage.cabin, expected_cabin);
    }
}

#[tokio::test]
async fn same_seed_reproduces_the_same_offers() {
    let a = searcher(99).search("Delhi", "Mumbai", date()).await;
    let b = searcher(99).search("Delhi", "Mumbai", date()).await;

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.flight_number, y.flight_number);
        assert_eq!(x.price, y.price);
        assert_eq!(x.departure_time, y.departure_time);
        assert_eq!(x.layovers, y.layovers);
    }
}

#[tokio::test]
async fn flight_serializes_with_class_display_names() {
    let flights = searcher(5).search("Delhi", "Mumbai", date()).await;
    for flight in flights {
        let json = serde_json::to_value(&flight).unwrap();
        let class = json["class"].as_str().unwrap();
        assert!(matches!(
            class,
            "Economy" | "Premium Economy" | "Business" | "First"
        ));
        if flight.layovers.is_empty() {
            assert!(json.get("layovers").is_none(), "empty layovers are omitted");
        }
    }
}
