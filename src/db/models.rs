use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type CategoryId = i32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A room; `category_id` is `None` for uncategorized rooms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Room {
    pub id: i32,
    pub category_id: Option<CategoryId>,
    pub room_number: i32,
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Citizen {
    pub id: i32,
    pub full_name: String,
    pub passport_number: String,
}

/// An open-ended stay. No check-out is modeled: the row alone marks the room occupied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Placement {
    pub id: i32,
    pub citizen_id: i32,
    pub room_id: i32,
    pub start_date: NaiveDate,
    pub duration_days: i32,
}

/// Raw aggregate row behind the occupancy calculation.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CategoryTally {
    pub category_id: CategoryId,
    pub name: String,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryOccupancy {
    pub category_id: CategoryId,
    pub name: String,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub percent: f64,
}

impl From<CategoryTally> for CategoryOccupancy {
    fn from(t: CategoryTally) -> Self {
        let percent = occupancy_percent(t.occupied_rooms, t.total_rooms);
        Self {
            category_id: t.category_id,
            name: t.name,
            total_rooms: t.total_rooms,
            occupied_rooms: t.occupied_rooms,
            percent,
        }
    }
}

/// `occupied / total * 100`, with an empty category reported as 0.0.
pub fn occupancy_percent(occupied: i64, total: i64) -> f64 {
    if total > 0 {
        occupied as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_is_zero_not_nan() {
        let pct = occupancy_percent(0, 0);
        assert_eq!(pct, 0.0);
        assert!(!pct.is_nan());
    }

    #[test]
    fn tally_converts_to_percent() {
        let occ: CategoryOccupancy = CategoryTally {
            category_id: 2,
            name: "Стандарт".to_string(),
            total_rooms: 3,
            occupied_rooms: 2,
        }
        .into();
        assert!((occ.percent - 66.666_666).abs() < 1e-3);
        assert_eq!(occupancy_percent(3, 3), 100.0);
        assert_eq!(occupancy_percent(1, 2), 50.0);
    }
}
