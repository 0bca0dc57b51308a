//! Courts, ticket prices and match attendance.

use serde::{Deserialize, Serialize};

use crate::config::AttendanceParams;

/// The court a club hosts its home matches on.
///
/// Capacity and rent come from the courts catalog and never change; the
/// ticket price is set by the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    capacity: i64,
    rent_cost: i64,
    ticket_price: i64,
}

impl Court {
    pub fn new(capacity: i64, rent_cost: i64) -> Self {
        Self { capacity, rent_cost, ticket_price: 0 }
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn rent_cost(&self) -> i64 {
        self.rent_cost
    }

    pub fn ticket_price(&self) -> i64 {
        self.ticket_price
    }

    pub fn set_ticket_price(&mut self, price: i64) {
        self.ticket_price = price;
    }

    /// Spectators actually let in.
    pub fn admitted(&self, attendance: i64) -> i64 {
        attendance.clamp(0, self.capacity)
    }

    pub fn match_income(&self, attendance: i64) -> i64 {
        self.admitted(attendance) * self.ticket_price
    }
}

/// Inputs of one attendance estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceFactors {
    pub ticket_price: i64,
    pub home_fame: i64,
    pub away_fame: i64,
    pub reputation: i64,
    pub match_importance: i64,
}

/// Weighted sum of the attendance factors; hard mode squares the price term.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceCalculator {
    params: AttendanceParams,
    is_hard: bool,
}

impl AttendanceCalculator {
    pub fn new(params: AttendanceParams, is_hard: bool) -> Self {
        Self { params, is_hard }
    }

    pub fn attendance(&self, factors: &AttendanceFactors) -> i64 {
        let price_power = if self.is_hard { 2 } else { 1 };
        let p = &self.params;
        let total = p.price * (factors.ticket_price as f64).powi(price_power)
            + p.home_fame * factors.home_fame as f64
            + p.away_fame * factors.away_fame as f64
            + p.reputation * factors.reputation as f64
            + p.importance * factors.match_importance as f64;
        total.trunc() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AttendanceParams {
        AttendanceParams {
            price: -10.0,
            home_fame: 1.0,
            away_fame: 0.5,
            reputation: 2.0,
            importance: 100.0,
        }
    }

    fn factors(ticket_price: i64) -> AttendanceFactors {
        AttendanceFactors {
            ticket_price,
            home_fame: 400,
            away_fame: 200,
            reputation: 50,
            match_importance: 2,
        }
    }

    #[test]
    fn test_attendance_formula() {
        let calculator = AttendanceCalculator::new(params(), false);
        // -100 + 400 + 100 + 100 + 200
        assert_eq!(calculator.attendance(&factors(10)), 700);
    }

    #[test]
    fn test_hard_mode_squares_price() {
        let calculator = AttendanceCalculator::new(params(), true);
        // -1000 + 400 + 100 + 100 + 200
        assert_eq!(calculator.attendance(&factors(10)), -200);
    }

    #[test]
    fn test_income_is_clamped_by_capacity() {
        let mut court = Court::new(1000, 1000);
        court.set_ticket_price(3);
        assert_eq!(court.match_income(5000), 3000);
        assert_eq!(court.match_income(-50), 0);
        assert_eq!(court.match_income(200), 600);
    }
}
