use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flight::Flight;
use crate::seat::SeatId;

/// The four screens of the booking flow, in order. Wire names match the
/// card names the navigation host switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[serde(rename = "SEARCH")]
    Search,
    #[serde(rename = "SEAT")]
    SeatSelection,
    #[serde(rename = "PAY")]
    Payment,
    #[serde(rename = "CONF")]
    Confirmation,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Search => "SEARCH",
            Screen::SeatSelection => "SEAT",
            Screen::Payment => "PAY",
            Screen::Confirmation => "CONF",
        };
        f.write_str(name)
    }
}

type NavigationListener = Box<dyn Fn(Screen) + Send + Sync>;

/// In-progress state of one user's search-to-confirmation flow. Created when
/// the flow starts, discarded when it completes or is abandoned. Single
/// writer; every screen reads and mutates it through these methods.
#[derive(Default)]
pub struct BookingSession {
    flight: Option<Flight>,
    booked_seats: HashSet<SeatId>,
    selected_seats: BTreeSet<SeatId>,
    passenger_name: Option<String>,
    passenger_email: Option<String>,
    booking_ids: Vec<i64>,
    total_price: i64,
    current_screen: Option<Screen>,
    listener: Option<NavigationListener>,
}

impl fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingSession")
            .field("flight", &self.flight.as_ref().map(|fl| fl.id))
            .field("selected_seats", &self.selected_seats)
            .field("booking_ids", &self.booking_ids)
            .field("current_screen", &self.current_screen)
            .finish_non_exhaustive()
    }
}

impl BookingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the chosen flight snapshot and the booked-seats cache loaded
    /// for it. Any previous selection is dropped with the previous flight.
    pub fn set_flight(&mut self, flight: Flight, booked: impl IntoIterator<Item = SeatId>) {
        self.flight = Some(flight);
        self.booked_seats = booked.into_iter().collect();
        self.selected_seats.clear();
    }

    pub fn flight(&self) -> Option<&Flight> {
        self.flight.as_ref()
    }

    /// Replaces the booked-seats cache, typically after a conflict told us
    /// the cache had gone stale.
    pub fn refresh_booked_seats(&mut self, booked: impl IntoIterator<Item = SeatId>) {
        self.booked_seats = booked.into_iter().collect();
    }

    pub fn booked_seats(&self) -> &HashSet<SeatId> {
        &self.booked_seats
    }

    /// Adds a seat to the selection. Deliberately does not check the booked
    /// cache; the cache may be stale and the transaction manager re-checks
    /// at commit time.
    pub fn select_seat(&mut self, seat: SeatId) {
        self.selected_seats.insert(seat);
    }

    pub fn deselect_seat(&mut self, seat: SeatId) {
        self.selected_seats.remove(&seat);
    }

    /// Current selection, ordered front-to-back. This order is the order
    /// seats are checked and inserted at checkout.
    pub fn selected_seats(&self) -> &BTreeSet<SeatId> {
        &self.selected_seats
    }

    pub fn passenger_name(&self) -> Option<&str> {
        self.passenger_name.as_deref()
    }

    pub fn passenger_email(&self) -> Option<&str> {
        self.passenger_email.as_deref()
    }

    pub fn booking_ids(&self) -> &[i64] {
        &self.booking_ids
    }

    pub fn total_price(&self) -> i64 {
        self.total_price
    }

    /// Records the outcome of a successful checkout: contact details, the
    /// generated ids, the recomputed total, and the selection folded into
    /// the booked cache.
    pub fn record_confirmation(
        &mut self,
        booking_ids: Vec<i64>,
        passenger_name: String,
        passenger_email: String,
        total_price: i64,
    ) {
        self.booking_ids = booking_ids;
        self.passenger_name = Some(passenger_name);
        self.passenger_email = Some(passenger_email);
        self.total_price = total_price;
        self.booked_seats.extend(self.selected_seats.iter().copied());
    }

    /// Clears selection, booking ids and passenger contact ahead of a new
    /// search. The booked-seats cache and flight snapshot stay as they are
    /// until a flight is picked again.
    pub fn reset_for_new_search(&mut self) {
        self.selected_seats.clear();
        self.booking_ids.clear();
        self.passenger_name = None;
        self.passenger_email = None;
    }

    /// Registers the navigation listener. Exactly one may be registered at a
    /// time; the last registration wins.
    pub fn on_navigate(&mut self, listener: impl Fn(Screen) + Send + Sync + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Moves the flow to `screen` and notifies the listener, if any. This is
    /// the session's only cross-component signal.
    pub fn navigate(&mut self, screen: Screen) {
        self.current_screen = Some(screen);
        if let Some(listener) = &self.listener {
            listener(screen);
        }
    }

    pub fn current_screen(&self) -> Option<Screen> {
        self.current_screen
    }
}
