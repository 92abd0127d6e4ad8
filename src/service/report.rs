use crate::config::ReportFormat;
use crate::db::{CategoryOccupancy, HotelStorage};
use crate::error::HotelError;
use serde::Serialize;
use std::fmt::Write as _;

/// Both occupancy statistics, gathered from a seeded store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OccupancyReport {
    pub free_rooms: i64,
    pub free_room_numbers: Vec<i32>,
    /// Ordered by category id.
    pub categories: Vec<CategoryOccupancy>,
}

impl OccupancyReport {
    pub async fn collect(storage: &HotelStorage) -> Result<Self, HotelError> {
        let free_rooms = storage.count_free_rooms().await?;
        let free_room_numbers = storage
            .free_rooms()
            .await?
            .into_iter()
            .map(|room| room.room_number)
            .collect();
        let categories = storage.category_occupancy().await?.into_values().collect();

        Ok(Self {
            free_rooms,
            free_room_numbers,
            categories,
        })
    }

    pub fn render(&self, format: ReportFormat) -> Result<String, HotelError> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let numbers = self
            .free_room_numbers
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Free rooms: {} [{}]", self.free_rooms, numbers);
        let _ = writeln!(out, "Occupancy by category:");
        for c in &self.categories {
            let _ = writeln!(
                out,
                "  #{} '{}': {:.2}% ({}/{})",
                c.category_id, c.name, c.percent, c.occupied_rooms, c.total_rooms
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OccupancyReport {
        OccupancyReport {
            free_rooms: 1,
            free_room_numbers: vec![202],
            categories: vec![
                CategoryOccupancy {
                    category_id: 2,
                    name: "Стандарт".to_string(),
                    total_rooms: 3,
                    occupied_rooms: 2,
                    percent: 200.0 / 3.0,
                },
                CategoryOccupancy {
                    category_id: 4,
                    name: "Суперлюкс".to_string(),
                    total_rooms: 0,
                    occupied_rooms: 0,
                    percent: 0.0,
                },
            ],
        }
    }

    #[test]
    fn text_uses_two_decimals() {
        let text = sample().render_text();
        assert!(text.starts_with("Free rooms: 1 [202]\n"));
        assert!(text.contains("#2 'Стандарт': 66.67% (2/3)"));
        assert!(text.contains("#4 'Суперлюкс': 0.00% (0/0)"));
    }

    #[test]
    fn json_carries_category_ids() {
        let json = sample().render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["free_rooms"], 1);
        assert_eq!(value["categories"][1]["category_id"], 4);
        assert_eq!(value["categories"][1]["percent"], 0.0);
    }
}
