//! Floor domain model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::common::Parking;

/// Seats on a floor by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatCounts {
    pub fixed_desk: u32,
    pub hot_desk: u32,
    pub cafe_seat: u32,
    pub meeting_room_seat: u32,
}

impl SeatCounts {
    /// Sum of all kinds, widened so that four `u32` counts cannot overflow.
    pub fn total(&self) -> u64 {
        [
            self.fixed_desk,
            self.hot_desk,
            self.cafe_seat,
            self.meeting_room_seat,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Floor {
    pub id: String,
    pub building_id: String,
    /// Free-form floor token such as `G`, `B1` or `2`.
    pub floor_number: String,
    /// Floor area in square feet.
    pub floor_area: f64,
    pub seat_counts: SeatCounts,
    pub parking: Parking,
    pub amenities: BTreeSet<String>,
}

impl Floor {
    /// Total seats, always derived from [`SeatCounts`].
    pub fn total_seats(&self) -> u64 {
        self.seat_counts.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_seats_is_sum_of_counts() {
        let floor = Floor {
            seat_counts: SeatCounts {
                fixed_desk: 120,
                hot_desk: 40,
                cafe_seat: 30,
                meeting_room_seat: 24,
            },
            ..Default::default()
        };
        assert_eq!(floor.total_seats(), 214);
    }

    #[test]
    fn total_seats_does_not_overflow_at_count_limits() {
        let floor = Floor {
            seat_counts: SeatCounts {
                fixed_desk: u32::MAX,
                hot_desk: 1,
                cafe_seat: u32::MAX,
                meeting_room_seat: u32::MAX,
            },
            ..Default::default()
        };
        assert_eq!(floor.total_seats(), 3 * u64::from(u32::MAX) + 1);
    }
}
