use serde::{Deserialize, Serialize};
use tracing::info;

use crate::booking::{BookingError, BookingStore, PaymentStatus, SeatAssignment};
use crate::pricing::Quote;
use crate::session::{BookingSession, Screen};
use crate::CoreError;

/// Raw passenger input, one entry per selected seat.
#[derive(Debug, Clone, Deserialize)]
pub struct PassengerForm {
    pub name: String,
    pub age: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
}

/// The simulated gateway. There is no failure path and no other terminal
/// state; every capture settles as `Paid`.
pub fn simulate_payment(method: PaymentMethod, amount: i64) -> PaymentStatus {
    info!(?method, amount, "simulated payment captured");
    PaymentStatus::Paid
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] CoreError),
    #[error(transparent)]
    Store(BookingError),
}

/// Terminal result of one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// All seats reserved; ids are in selection order.
    Confirmed { booking_ids: Vec<i64>, total: i64 },
    /// Someone else got a seat first. The session's booked cache has been
    /// refreshed and the flow sent back to seat selection.
    SeatConflict { seat: crate::seat::SeatId },
}

/// The payment step: validates passenger details, recomputes the total,
/// captures the simulated payment and hands the seat list to the store's
/// transaction manager. Seats are processed in selection order.
pub async fn process_payment(
    session: &mut BookingSession,
    store: &dyn BookingStore,
    passengers: &[PassengerForm],
    email: &str,
    method: PaymentMethod,
) -> Result<CheckoutOutcome, CheckoutError> {
    let flight = session
        .flight()
        .cloned()
        .ok_or_else(|| CoreError::Validation("no flight selected".into()))?;

    let seats: Vec<_> = session.selected_seats().iter().copied().collect();
    if seats.is_empty() {
        return Err(CoreError::Validation("select seats first".into()).into());
    }
    if passengers.len() != seats.len() {
        return Err(CoreError::Validation(
            "passenger details are required for each selected seat".into(),
        )
        .into());
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(CoreError::Validation("passenger email is required".into()).into());
    }

    let mut assignments = Vec::with_capacity(seats.len());
    for (seat, passenger) in seats.iter().zip(passengers) {
        let name = passenger.name.trim();
        let age = passenger.age.trim();
        if name.is_empty() || age.is_empty() {
            return Err(CoreError::Validation("fill details for all passengers".into()).into());
        }
        let age: i32 = age
            .parse()
            .map_err(|_| CoreError::Validation("passenger age must be a number".into()))?;
        assignments.push(SeatAssignment {
            seat: *seat,
            passenger_name: name.to_string(),
            age,
        });
    }

    let quote = Quote::for_seats(seats.iter().copied(), flight.price);
    simulate_payment(method, quote.total);

    match store.book_seats(flight.id, &assignments, email).await {
        Ok(booking_ids) => {
            info!(flight_id = flight.id, ?booking_ids, "booking committed");
            session.record_confirmation(
                booking_ids.clone(),
                assignments[0].passenger_name.clone(),
                email.to_string(),
                quote.total,
            );
            session.navigate(Screen::Confirmation);
            Ok(CheckoutOutcome::Confirmed {
                booking_ids,
                total: quote.total,
            })
        }
        Err(BookingError::SeatTaken { seat }) => {
            info!(flight_id = flight.id, %seat, "seat conflict, returning to selection");
            let booked = store
                .booked_seats(flight.id)
                .await
                .map_err(CheckoutError::Store)?;
            session.refresh_booked_seats(booked);
            session.navigate(Screen::SeatSelection);
            Ok(CheckoutOutcome::SeatConflict { seat })
        }
        Err(err) => Err(CheckoutError::Store(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::flight::Flight;
    use crate::seat::SeatId;

    /// In-memory stand-in for the Postgres transaction manager. Inserts are
    /// staged and only become visible when the whole call succeeds, so a
    /// conflict rolls back everything, like the real transaction.
    #[derive(Default)]
    struct MemoryBookingStore {
        inner: Mutex<Inner>,
        fail: bool,
    }

    #[derive(Default)]
    struct Inner {
        next_id: i64,
        rows: Vec<(i64, i64, SeatId)>, // (booking_id, flight_id, seat)
    }

    impl MemoryBookingStore {
        fn with_booked(flight_id: i64, seats: &[&str]) -> Self {
            let store = Self::default();
            {
                let mut inner = store.inner.lock().unwrap();
                for s in seats {
                    inner.next_id += 1;
                    let id = inner.next_id;
                    inner.rows.push((id, flight_id, s.parse().unwrap()));
                }
            }
            store
        }

        fn rows(&self) -> Vec<(i64, i64, SeatId)> {
            self.inner.lock().unwrap().rows.clone()
        }
    }

    #[async_trait]
    impl BookingStore for MemoryBookingStore {
        async fn booked_seats(&self, flight_id: i64) -> Result<Vec<SeatId>, BookingError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .rows
                .iter()
                .filter(|(_, f, _)| *f == flight_id)
                .map(|(_, _, seat)| *seat)
                .collect())
        }

        async fn book_seats(
            &self,
            flight_id: i64,
            assignments: &[crate::booking::SeatAssignment],
            _email: &str,
        ) -> Result<Vec<i64>, BookingError> {
            if self.fail {
                return Err(BookingError::store("connection reset"));
            }
            let mut inner = self.inner.lock().unwrap();
            let mut staged = Vec::new();
            let mut ids = Vec::new();
            for a in assignments {
                let taken = inner
                    .rows
                    .iter()
                    .chain(staged.iter())
                    .any(|(_, f, seat)| *f == flight_id && *seat == a.seat);
                if taken {
                    // Nothing staged becomes visible.
                    return Err(BookingError::SeatTaken { seat: a.seat });
                }
                inner.next_id += 1;
                staged.push((inner.next_id, flight_id, a.seat));
                ids.push(inner.next_id);
            }
            inner.rows.extend(staged);
            Ok(ids)
        }
    }

    fn flight() -> Flight {
        Flight {
            id: 7,
            airline_name: "IndiGo".into(),
            source: "Delhi".into(),
            destination: "Mumbai".into(),
            flight_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            departure_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(11, 45, 0).unwrap(),
            price: 5000,
        }
    }

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    fn passenger(name: &str, age: &str) -> PassengerForm {
        PassengerForm { name: name.into(), age: age.into() }
    }

    fn session_with_seats(store_booked: &[SeatId], selected: &[&str]) -> BookingSession {
        let mut session = BookingSession::new();
        session.set_flight(flight(), store_booked.iter().copied());
        for s in selected {
            session.select_seat(s.parse().unwrap());
        }
        session
    }

    #[tokio::test]
    async fn both_seats_free_commits_in_selection_order() {
        let store = MemoryBookingStore::default();
        let mut session = session_with_seats(&[], &["10B", "3A"]);
        let screens = Arc::new(Mutex::new(Vec::new()));
        let sink = screens.clone();
        session.on_navigate(move |s| sink.lock().unwrap().push(s));

        let outcome = process_payment(
            &mut session,
            &store,
            &[passenger("Asha", "34"), passenger("Ravi", "28")],
            "asha@example.com",
            PaymentMethod::Card,
        )
        .await
        .unwrap();

        // Selection iterates 3A before 10B; ids follow that order.
        assert_eq!(
            outcome,
            CheckoutOutcome::Confirmed { booking_ids: vec![1, 2], total: 8000 + 5150 }
        );
        assert_eq!(session.booking_ids(), &[1, 2]);
        assert_eq!(session.passenger_name(), Some("Asha"));
        assert_eq!(session.passenger_email(), Some("asha@example.com"));
        assert_eq!(session.total_price(), 13150);
        assert!(session.booked_seats().contains(&seat("3A")));
        assert_eq!(*screens.lock().unwrap(), vec![Screen::Confirmation]);

        let rows = store.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].2, seat("3A"));
        assert_eq!(rows[1].2, seat("10B"));
    }

    #[tokio::test]
    async fn conflict_rolls_back_everything_and_returns_to_seat_selection() {
        // 10C is already taken; 3A sorts first so it is inserted, then the
        // conflict on 10C must undo it.
        let store = MemoryBookingStore::with_booked(7, &["10C"]);
        let mut session = session_with_seats(&[], &["3A", "10C"]);
        let screens = Arc::new(Mutex::new(Vec::new()));
        let sink = screens.clone();
        session.on_navigate(move |s| sink.lock().unwrap().push(s));

        let outcome = process_payment(
            &mut session,
            &store,
            &[passenger("Asha", "34"), passenger("Ravi", "28")],
            "asha@example.com",
            PaymentMethod::Upi,
        )
        .await
        .unwrap();

        assert_eq!(outcome, CheckoutOutcome::SeatConflict { seat: seat("10C") });
        // No row for 3A survived the rollback.
        assert!(store.rows().iter().all(|(_, _, s)| *s != seat("3A")));
        // The cache was refreshed from the store and the flow went back.
        assert!(session.booked_seats().contains(&seat("10C")));
        assert!(session.booking_ids().is_empty());
        assert_eq!(*screens.lock().unwrap(), vec![Screen::SeatSelection]);
    }

    #[tokio::test]
    async fn rejects_incomplete_passenger_details_before_touching_the_store() {
        let store = MemoryBookingStore::default();
        let mut session = session_with_seats(&[], &["10B"]);

        let err = process_payment(
            &mut session,
            &store,
            &[passenger("  ", "34")],
            "asha@example.com",
            PaymentMethod::Card,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn rejects_non_numeric_age() {
        let store = MemoryBookingStore::default();
        let mut session = session_with_seats(&[], &["10B"]);
        let err = process_payment(
            &mut session,
            &store,
            &[passenger("Asha", "thirty")],
            "asha@example.com",
            PaymentMethod::Card,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    #[tokio::test]
    async fn rejects_passenger_count_mismatch() {
        let store = MemoryBookingStore::default();
        let mut session = session_with_seats(&[], &["10B", "10C"]);
        let err = process_payment(
            &mut session,
            &store,
            &[passenger("Asha", "34")],
            "asha@example.com",
            PaymentMethod::Card,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_missing_email_and_empty_selection() {
        let store = MemoryBookingStore::default();

        let mut session = session_with_seats(&[], &["10B"]);
        let err = process_payment(&mut session, &store, &[passenger("Asha", "34")], "  ", PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("email"));

        let mut session = session_with_seats(&[], &[]);
        let err = process_payment(&mut session, &store, &[], "asha@example.com", PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("seats"));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_a_store_error() {
        let store = MemoryBookingStore { fail: true, ..Default::default() };
        let mut session = session_with_seats(&[], &["10B"]);
        let err = process_payment(
            &mut session,
            &store,
            &[passenger("Asha", "34")],
            "asha@example.com",
            PaymentMethod::Card,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutError::Store(_)));
        // The flow did not move anywhere.
        assert_eq!(session.current_screen(), None);
    }
}
