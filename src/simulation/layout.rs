//! Fixed floor geometry: where things stand on the restaurant floor

use serde::{Deserialize, Serialize};

use crate::catalog::{StationKind, StationType};
use crate::core::types::Vec2;

/// Floor width in pixels
pub const FLOOR_WIDTH: f32 = 960.0;
/// Floor height in pixels
pub const FLOOR_HEIGHT: f32 = 600.0;

const STATION_WIDTH: f32 = 260.0;
const STATION_HEIGHT: f32 = 110.0;
const STATION_GAP: f32 = 20.0;
const TABLE_COLUMNS: usize = 3;

/// Anchor points on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    pub width: f32,
    pub height: f32,
    /// Customers appear here
    pub entrance: Vec2,
    /// Where customers pay
    pub register: Vec2,
    /// Customers leave the floor here
    pub exit: Vec2,
    /// Where newly hired staff start out
    pub staff_room: Vec2,
    /// Work position in front of each station, in catalog order
    pub stations: Vec<(StationKind, Vec2)>,
    pub tables: Vec<Vec2>,
}

impl FloorPlan {
    pub fn new(stations: &[StationType], table_count: usize) -> Self {
        let base_y = FLOOR_HEIGHT - STATION_HEIGHT - 20.0;
        let station_anchors = stations
            .iter()
            .enumerate()
            .map(|(i, st)| {
                let x = 20.0 + i as f32 * (STATION_WIDTH + STATION_GAP);
                (
                    st.kind,
                    Vec2::new(x + STATION_WIDTH / 2.0, base_y + STATION_HEIGHT - 12.0),
                )
            })
            .collect();

        let tables = (0..table_count)
            .map(|i| {
                let col = (i % TABLE_COLUMNS) as f32;
                let row = (i / TABLE_COLUMNS) as f32;
                Vec2::new(300.0 + col * 170.0, 110.0 + row * 140.0)
            })
            .collect();

        Self {
            width: FLOOR_WIDTH,
            height: FLOOR_HEIGHT,
            entrance: Vec2::new(-60.0, 300.0),
            register: Vec2::new(FLOOR_WIDTH - 80.0, 120.0),
            exit: Vec2::new(FLOOR_WIDTH + 50.0, 300.0),
            staff_room: Vec2::new(70.0, FLOOR_HEIGHT - 140.0),
            stations: station_anchors,
            tables,
        }
    }

    /// Work position of a station; the staff room when the station is unknown
    pub fn station_anchor(&self, kind: StationKind) -> Vec2 {
        self.stations
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, pos)| *pos)
            .unwrap_or(self.staff_room)
    }
}
