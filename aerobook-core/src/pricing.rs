use serde::Serialize;

use crate::seat::{SeatId, SeatPosition};

/// Flat price for any business-class seat (rows 1-5). The flight's base
/// price does not apply there.
pub const BUSINESS_CLASS_PRICE: i64 = 8000;

pub const WINDOW_SURCHARGE: i64 = 250;
pub const MIDDLE_SURCHARGE: i64 = 150;
pub const AISLE_SURCHARGE: i64 = 200;

/// Price of a single seat given the flight's base price, in whole currency
/// units.
pub fn seat_price(seat: SeatId, base_price: i64) -> i64 {
    if seat.is_business() {
        return BUSINESS_CLASS_PRICE;
    }
    let surcharge = match seat.position() {
        SeatPosition::Window => WINDOW_SURCHARGE,
        SeatPosition::Middle => MIDDLE_SURCHARGE,
        SeatPosition::Aisle => AISLE_SURCHARGE,
    };
    base_price + surcharge
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteLine {
    pub seat: SeatId,
    pub price: i64,
}

/// Per-seat line items plus the aggregate total for one checkout.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub total: i64,
}

impl Quote {
    pub fn for_seats(seats: impl IntoIterator<Item = SeatId>, base_price: i64) -> Self {
        let lines: Vec<QuoteLine> = seats
            .into_iter()
            .map(|seat| QuoteLine {
                seat,
                price: seat_price(seat, base_price),
            })
            .collect();
        let total = lines.iter().map(|line| line.price).sum();
        Self { lines, total }
    }
}
