//! Tables and chairs
//!
//! A customer reserves a chair at spawn and holds it until delivery or an
//! unhappy exit. Each chair has at most one occupant.

use serde::{Deserialize, Serialize};

use crate::core::types::{CustomerId, SeatRef, TableId, Vec2};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    /// Offset from the table centre
    pub offset: Vec2,
    pub occupant: Option<CustomerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub pos: Vec2,
    pub seats: Vec<Seat>,
}

/// All tables on the floor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seating {
    tables: Vec<Table>,
}

/// Chairs are spread around the table on a circle of this radius
const CHAIR_RADIUS: f32 = 34.0;

impl Seating {
    /// One table per position, each with `seats_per_table` chairs
    pub fn new(table_positions: &[Vec2], seats_per_table: usize) -> Self {
        let tables = table_positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| Table {
                id: TableId(i as u32),
                pos,
                seats: (0..seats_per_table)
                    .map(|chair| Seat {
                        offset: chair_offset(chair, seats_per_table),
                        occupant: None,
                    })
                    .collect(),
            })
            .collect();
        Self { tables }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Reserve the first free chair in table order
    pub fn reserve(&mut self, customer: CustomerId) -> Option<SeatRef> {
        for table in &mut self.tables {
            if let Some(chair) = table.seats.iter().position(|s| s.occupant.is_none()) {
                table.seats[chair].occupant = Some(customer);
                return Some(SeatRef {
                    table: table.id,
                    chair,
                });
            }
        }
        None
    }

    /// Free a chair if `customer` holds it; returns whether anything changed
    pub fn release(&mut self, seat: SeatRef, customer: CustomerId) -> bool {
        match self.seat_mut(seat) {
            Some(s) if s.occupant == Some(customer) => {
                s.occupant = None;
                true
            }
            _ => false,
        }
    }

    pub fn occupant(&self, seat: SeatRef) -> Option<CustomerId> {
        self.seat(seat).and_then(|s| s.occupant)
    }

    pub fn free_count(&self) -> usize {
        self.seats().filter(|s| s.occupant.is_none()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats().filter(|s| s.occupant.is_some()).count()
    }

    pub fn capacity(&self) -> usize {
        self.seats().count()
    }

    /// Number of chairs held by `customer`
    pub fn held_by(&self, customer: CustomerId) -> usize {
        self.seats()
            .filter(|s| s.occupant == Some(customer))
            .count()
    }

    /// World position of a chair
    pub fn seat_position(&self, seat: SeatRef) -> Option<Vec2> {
        let table = self.tables.get(seat.table.0 as usize)?;
        let s = table.seats.get(seat.chair)?;
        Some(table.pos + s.offset)
    }

    /// Empty every chair
    pub fn clear(&mut self) {
        for table in &mut self.tables {
            for seat in &mut table.seats {
                seat.occupant = None;
            }
        }
    }

    fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.tables.iter().flat_map(|t| t.seats.iter())
    }

    fn seat(&self, seat: SeatRef) -> Option<&Seat> {
        self.tables.get(seat.table.0 as usize)?.seats.get(seat.chair)
    }

    fn seat_mut(&mut self, seat: SeatRef) -> Option<&mut Seat> {
        self.tables
            .get_mut(seat.table.0 as usize)?
            .seats
            .get_mut(seat.chair)
    }
}

fn chair_offset(chair: usize, count: usize) -> Vec2 {
    if count == 2 {
        // left and right of the table
        let x = if chair == 0 { -CHAIR_RADIUS } else { CHAIR_RADIUS };
        return Vec2::new(x, 0.0);
    }
    let angle = std::f32::consts::TAU * chair as f32 / count.max(1) as f32;
    Vec2::new(angle.cos() * CHAIR_RADIUS, angle.sin() * CHAIR_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tables() -> Seating {
        Seating::new(&[Vec2::new(100.0, 100.0), Vec2::new(300.0, 100.0)], 2)
    }

    #[test]
    fn test_reserve_fills_in_table_order() {
        let mut seating = two_tables();
        let a = seating.reserve(CustomerId(1)).unwrap();
        let b = seating.reserve(CustomerId(2)).unwrap();
        let c = seating.reserve(CustomerId(3)).unwrap();
        assert_eq!((a.table, a.chair), (TableId(0), 0));
        assert_eq!((b.table, b.chair), (TableId(0), 1));
        assert_eq!((c.table, c.chair), (TableId(1), 0));
        assert_eq!(seating.free_count(), 1);
    }

    #[test]
    fn test_reserve_declines_when_full() {
        let mut seating = two_tables();
        for i in 0..4 {
            assert!(seating.reserve(CustomerId(i)).is_some());
        }
        assert!(seating.reserve(CustomerId(99)).is_none());
        assert_eq!(seating.occupied_count(), 4);
    }

    #[test]
    fn test_release_only_by_holder() {
        let mut seating = two_tables();
        let seat = seating.reserve(CustomerId(1)).unwrap();
        assert!(!seating.release(seat, CustomerId(2)), "non-holder cannot release");
        assert_eq!(seating.occupant(seat), Some(CustomerId(1)));
        assert!(seating.release(seat, CustomerId(1)));
        assert_eq!(seating.occupant(seat), None);
        assert!(!seating.release(seat, CustomerId(1)), "double release is a no-op");
    }

    #[test]
    fn test_seat_position_offsets_from_table() {
        let seating = two_tables();
        let pos = seating
            .seat_position(SeatRef {
                table: TableId(1),
                chair: 1,
            })
            .unwrap();
        assert_eq!(pos, Vec2::new(300.0 + CHAIR_RADIUS, 100.0));
        assert!(seating
            .seat_position(SeatRef {
                table: TableId(7),
                chair: 0
            })
            .is_none());
    }

    #[test]
    fn test_clear_frees_all() {
        let mut seating = two_tables();
        seating.reserve(CustomerId(1));
        seating.reserve(CustomerId(2));
        seating.clear();
        assert_eq!(seating.free_count(), seating.capacity());
    }
}
