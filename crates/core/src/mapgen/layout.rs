//! Recursive room subdivision over the carve grid.

use std::collections::VecDeque;

use slotmap::{SlotMap, new_key_type};

use crate::config::GeneratorConfig;
use crate::error::LevelError;
use crate::rng::RandomSource;
use crate::types::{COARSE_SIZE, Direction, Pos, Rect};

use super::grid::Grid;

/// Semantic markup written by carving, consumed by tile resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) enum Marker {
    Void,
    Floor,
    Wall,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomLeft,
    CornerBottomRight,
    Corridor,
    Door,
}

impl Marker {
    pub(super) fn is_corner(self) -> bool {
        matches!(
            self,
            Marker::CornerTopLeft
                | Marker::CornerTopRight
                | Marker::CornerBottomLeft
                | Marker::CornerBottomRight
        )
    }
}

new_key_type! {
    pub(super) struct RoomId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Room {
    pub(super) area: Rect,
    pub(super) set_piece: bool,
}

/// Corridor to carve from a child room back to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct HallRequest {
    pub(super) start: Pos,
    pub(super) end: Pos,
    pub(super) direction: Direction,
}

#[derive(Debug, Default)]
pub(super) struct RoomLayout {
    pub(super) rooms: SlotMap<RoomId, Room>,
    pub(super) halls: VecDeque<HallRequest>,
    pub(super) set_piece_room: Option<RoomId>,
}

impl RoomLayout {
    pub(super) fn set_piece_area(&self) -> Option<Rect> {
        self.set_piece_room.and_then(|id| self.rooms.get(id)).map(|room| room.area)
    }
}

/// Region the whole level is carved from.
pub(super) fn root_region() -> Rect {
    let last = COARSE_SIZE as i32 - 1;
    Rect::new(2, 2, last, last)
}

/// Rejects a forced room that cannot fit the root region inside the clamp band.
///
/// `width` and `height` are spans (`x2 - x1`), so the room covers one more
/// cell than the span on each axis.
pub(super) fn check_forced_size(
    config: &GeneratorConfig,
    width: i32,
    height: i32,
) -> Result<(), LevelError> {
    let root = root_region();
    let max_width = root.x2.min(config.band_max) - root.x1.max(config.band_min);
    let max_height = root.y2.min(config.band_max) - root.y1.max(config.band_min);
    if width < 1 || height < 1 {
        return Err(LevelError::SetPieceTooSmall { width: width + 1, height: height + 1 });
    }
    if width > max_width || height > max_height {
        return Err(LevelError::SetPieceTooLarge {
            width: width + 1,
            height: height + 1,
            max_width: max_width + 1,
            max_height: max_height + 1,
        });
    }
    Ok(())
}

pub(super) struct RoomCarver<'a, R> {
    config: &'a GeneratorConfig,
    rng: &'a mut R,
    markers: &'a mut Grid<Marker>,
    layout: RoomLayout,
}

impl<'a, R: RandomSource> RoomCarver<'a, R> {
    pub(super) fn new(
        config: &'a GeneratorConfig,
        rng: &'a mut R,
        markers: &'a mut Grid<Marker>,
    ) -> Self {
        Self { config, rng, markers, layout: RoomLayout::default() }
    }

    /// Carves the whole room tree. `forced` spans apply to the root room only
    /// and must already have passed [`check_forced_size`].
    pub(super) fn carve_level(mut self, forced: Option<(i32, i32)>) -> RoomLayout {
        self.carve_room(root_region(), None, forced);
        self.layout
    }

    fn carve_room(
        &mut self,
        region: Rect,
        parent: Option<(RoomId, Direction)>,
        forced: Option<(i32, i32)>,
    ) -> Option<RoomId> {
        let config = self.config;
        if self.layout.rooms.len() >= config.room_cap {
            return None;
        }
        let available_x = region.span_x();
        let available_y = region.span_y();
        if available_x < config.area_min || available_y < config.area_min {
            return None;
        }

        let mut width = self.draw_span(available_x);
        let mut height = self.draw_span(available_y);
        let (limit_x, limit_y) = match forced {
            Some((forced_width, forced_height)) => {
                width = forced_width;
                height = forced_height;
                (region.x2.min(config.band_max), region.y2.min(config.band_max))
            }
            None => (region.x2, region.y2),
        };

        let mut x1 = self.rng.next(available_x) + region.x1;
        let mut y1 = self.rng.next(available_y) + region.y1;
        let mut x2 = x1 + width;
        let mut y2 = y1 + height;
        if x2 > limit_x {
            x2 = limit_x;
            x1 = limit_x - width;
        }
        if y2 > limit_y {
            y2 = limit_y;
            y1 = limit_y - height;
        }
        let clamp = |value: i32| value.clamp(config.band_min, config.band_max);
        let area = Rect::new(clamp(x1), clamp(y1), clamp(x2), clamp(y2));

        self.define_room(area);
        let id = self.layout.rooms.insert(Room { area, set_piece: forced.is_some() });
        if forced.is_some() {
            self.layout.set_piece_room = Some(id);
        }
        if let Some((parent_id, direction)) = parent {
            let parent_area = self.layout.rooms[parent_id].area;
            self.queue_hallway(area, parent_area, direction);
        }

        for (child, direction) in child_regions(region, area, height > width) {
            self.carve_room(child, Some((id, direction)), None);
        }
        Some(id)
    }

    fn draw_span(&mut self, available: i32) -> i32 {
        let config = self.config;
        if available > config.room_max {
            self.rng.next(config.room_max - config.room_min) + config.room_min
        } else if available > config.room_min {
            self.rng.next(available - config.room_min) + config.room_min
        } else {
            available
        }
    }

    fn define_room(&mut self, area: Rect) {
        for pos in area.cells() {
            let on_left = pos.x == area.x1;
            let on_right = pos.x == area.x2;
            let on_top = pos.y == area.y1;
            let on_bottom = pos.y == area.y2;
            let marker = match (on_left, on_right, on_top, on_bottom) {
                (true, _, true, _) => Marker::CornerTopLeft,
                (_, true, true, _) => Marker::CornerTopRight,
                (true, _, _, true) => Marker::CornerBottomLeft,
                (_, true, _, true) => Marker::CornerBottomRight,
                (false, false, false, false) => Marker::Floor,
                _ => Marker::Wall,
            };
            self.markers.set(pos, marker);
        }
    }

    fn queue_hallway(&mut self, child: Rect, parent: Rect, direction: Direction) {
        let request = match direction {
            Direction::Up | Direction::Down => {
                let child_x = self.anchor(child.x1, child.x2);
                let parent_x = self.anchor(parent.x1, parent.x2);
                let (start_y, end_y) = if direction == Direction::Up {
                    (child.y1, parent.y2)
                } else {
                    (child.y2, parent.y1)
                };
                HallRequest {
                    start: Pos::new(child_x, start_y),
                    end: Pos::new(parent_x, end_y),
                    direction,
                }
            }
            Direction::Right | Direction::Left => {
                let child_y = self.anchor(child.y1, child.y2);
                let parent_y = self.anchor(parent.y1, parent.y2);
                let (start_x, end_x) = if direction == Direction::Right {
                    (child.x2, parent.x1)
                } else {
                    (child.x1, parent.x2)
                };
                HallRequest {
                    start: Pos::new(start_x, child_y),
                    end: Pos::new(end_x, parent_y),
                    direction,
                }
            }
        };
        self.layout.halls.push_back(request);
    }

    /// Point strictly inside an edge running from `low` to `high`.
    fn anchor(&mut self, low: i32, high: i32) -> i32 {
        self.rng.next(high - low - 2) + low + 1
    }
}

/// Sub-regions around a freshly carved room, each with the direction that
/// leads from it back to the room. The pinwheel arrangement keeps them
/// disjoint.
fn child_regions(region: Rect, room: Rect, tall: bool) -> [(Rect, Direction); 4] {
    if tall {
        [
            (Rect::new(region.x1 + 2, region.y1 + 2, room.x1 - 2, room.y2 - 2), Direction::Right),
            (Rect::new(room.x2 + 2, room.y1 + 2, region.x2 - 2, region.y2 - 2), Direction::Left),
            (Rect::new(region.x1 + 2, room.y2 + 2, room.x2 - 2, region.y2 - 2), Direction::Up),
            (Rect::new(room.x1 + 2, region.y1 + 2, region.x2 - 2, room.y1 - 2), Direction::Down),
        ]
    } else {
        [
            (Rect::new(region.x1 + 2, region.y1 + 2, room.x2 - 2, room.y1 - 2), Direction::Down),
            (Rect::new(room.x1 + 2, room.y2 + 2, region.x2 - 2, region.y2 - 2), Direction::Up),
            (Rect::new(region.x1 + 2, room.y1 + 2, room.x1 - 2, region.y2 - 2), Direction::Right),
            (Rect::new(room.x2 + 2, region.y1 + 2, region.x2 - 2, room.y2 - 2), Direction::Left),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::LevelRng;

    fn carve(seed: u32, forced: Option<(i32, i32)>) -> (RoomLayout, Grid<Marker>) {
        let config = GeneratorConfig::default();
        let mut rng = LevelRng::new(seed);
        let mut markers = Grid::new(COARSE_SIZE, COARSE_SIZE, Marker::Void);
        let layout = RoomCarver::new(&config, &mut rng, &mut markers).carve_level(forced);
        (layout, markers)
    }

    #[test]
    fn rooms_are_disjoint_and_stay_inside_the_band() {
        for seed in [1_u32, 2, 77, 4_096, 123_456] {
            let (layout, _) = carve(seed, None);
            let areas: Vec<Rect> = layout.rooms.values().map(|room| room.area).collect();
            assert!(!areas.is_empty());
            for (index, area) in areas.iter().enumerate() {
                assert!(area.x1 >= 1 && area.y1 >= 1 && area.x2 <= 38 && area.y2 <= 38);
                for other in &areas[index + 1..] {
                    assert!(!area.intersects(other), "seed {seed}: {area:?} overlaps {other:?}");
                }
            }
        }
    }

    #[test]
    fn every_room_except_the_root_requests_one_hallway() {
        let (layout, _) = carve(9, None);
        assert_eq!(layout.halls.len(), layout.rooms.len() - 1);
    }

    #[test]
    fn rooms_are_outlined_with_corner_markers() {
        let (layout, markers) = carve(5, None);
        let room = layout.rooms.values().next().expect("root room").area;
        assert_eq!(markers[Pos::new(room.x1, room.y1)], Marker::CornerTopLeft);
        assert_eq!(markers[Pos::new(room.x2, room.y1)], Marker::CornerTopRight);
        assert_eq!(markers[Pos::new(room.x1, room.y2)], Marker::CornerBottomLeft);
        assert_eq!(markers[Pos::new(room.x2, room.y2)], Marker::CornerBottomRight);
        assert_eq!(markers[Pos::new(room.x1 + 1, room.y1)], Marker::Wall);
        assert_eq!(markers[Pos::new(room.x1 + 1, room.y1 + 1)], Marker::Floor);
    }

    #[test]
    fn forced_room_keeps_its_full_size() {
        for seed in 1..40_u32 {
            let (layout, _) = carve(seed, Some((20, 15)));
            let area = layout.set_piece_area().expect("forced room is carved");
            assert_eq!((area.span_x(), area.span_y()), (20, 15), "seed {seed}");
        }
    }

    #[test]
    fn oversized_forced_room_is_rejected() {
        let config = GeneratorConfig::default();
        assert!(check_forced_size(&config, 36, 36).is_ok());
        assert_eq!(
            check_forced_size(&config, 37, 10),
            Err(LevelError::SetPieceTooLarge {
                width: 38,
                height: 11,
                max_width: 37,
                max_height: 37
            })
        );
    }

    #[test]
    fn single_row_forced_room_is_too_small_rather_than_too_large() {
        let config = GeneratorConfig::default();
        assert!(check_forced_size(&config, 1, 1).is_ok());
        assert_eq!(
            check_forced_size(&config, 0, 4),
            Err(LevelError::SetPieceTooSmall { width: 1, height: 5 })
        );
        assert_eq!(
            check_forced_size(&config, 6, 0),
            Err(LevelError::SetPieceTooSmall { width: 7, height: 1 })
        );
    }
}
