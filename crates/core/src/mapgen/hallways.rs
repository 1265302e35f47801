//! Biased random-walk corridors between parent and child rooms.

use crate::config::{GeneratorConfig, HallwayConfig};
use crate::error::AttemptFailure;
use crate::rng::RandomSource;
use crate::types::{Direction, Pos};

use super::grid::Grid;
use super::layout::{HallRequest, Marker};

pub(super) struct HallwayRouter<'a, R> {
    config: &'a GeneratorConfig,
    rng: &'a mut R,
    markers: &'a mut Grid<Marker>,
}

impl<'a, R: RandomSource> HallwayRouter<'a, R> {
    pub(super) fn new(
        config: &'a GeneratorConfig,
        rng: &'a mut R,
        markers: &'a mut Grid<Marker>,
    ) -> Self {
        Self { config, rng, markers }
    }

    /// Carves one corridor per request, in queue order.
    pub(super) fn connect_all(
        &mut self,
        requests: impl IntoIterator<Item = HallRequest>,
    ) -> Result<(), AttemptFailure> {
        requests.into_iter().try_for_each(|request| self.connect(request))
    }

    pub(super) fn connect(&mut self, request: HallRequest) -> Result<(), AttemptFailure> {
        let config = self.config;
        let hall = &config.hallway;
        let widen_minus = self.rng.next(100) < hall.widen_below;
        let widen_plus = self.rng.next(100) < hall.widen_below;

        self.place_door(request.start);
        self.place_door(request.end);

        let (dx, dy) = request.direction.delta();
        let origin = request.start;
        let target = request.end.offset(-dx, -dy);
        self.markers.set(target, Marker::Corridor);

        let mut pos = origin;
        let mut direction = request.direction;
        let mut in_room = false;
        let mut steps = 0_u32;
        while pos != target {
            steps += 1;
            if steps > hall.step_cap {
                return Err(AttemptFailure::HallwayUnreachable { steps: hall.step_cap });
            }

            direction = self.bounce(pos, direction);
            direction = deflect_off_corner(self.markers.get(pos), direction);
            let previous = pos;
            pos = pos.step(direction);

            if self.markers.get(pos) == Some(Marker::Void) {
                if in_room {
                    self.place_door(previous);
                } else {
                    self.widen(pos, direction, widen_minus, widen_plus);
                }
                self.markers.set(pos, Marker::Corridor);
                in_room = false;
            } else {
                if !in_room && self.markers.get(pos) == Some(Marker::Wall) {
                    self.place_door(pos);
                }
                if self.markers.get(pos) != Some(Marker::Corridor) {
                    in_room = true;
                }
            }

            direction = self.steer(pos, target, origin, direction);
        }
        Ok(())
    }

    fn bounce(&self, pos: Pos, direction: Direction) -> Direction {
        let low = self.config.band_min;
        let high = self.config.band_max;
        match direction {
            Direction::Right if pos.x >= high => Direction::Left,
            Direction::Down if pos.y >= high => Direction::Up,
            Direction::Left if pos.x <= low => Direction::Right,
            Direction::Up if pos.y <= low => Direction::Down,
            _ => direction,
        }
    }

    fn steer(&mut self, pos: Pos, target: Pos, origin: Pos, mut direction: Direction) -> Direction {
        let config = self.config;
        let hall: &HallwayConfig = &config.hallway;
        let distance_x = (target.x - pos.x).abs();
        let distance_y = (target.y - pos.y).abs();
        let toward_x = if target.x <= pos.x { Direction::Left } else { Direction::Right };
        let toward_y = if target.y <= pos.y { Direction::Up } else { Direction::Down };

        if distance_x > distance_y {
            let chance = (hall.horizontal_bias * distance_x).min(hall.horizontal_bias_cap);
            if self.rng.next(100) < chance {
                direction = toward_x;
            }
        } else {
            let chance = (hall.vertical_bias * distance_y).min(hall.vertical_bias_cap);
            if self.rng.next(100) < chance {
                direction = toward_y;
            }
        }

        let horizontal = direction.is_horizontal();
        if distance_y < hall.redirect_distance && pos.x == target.x && horizontal {
            direction = toward_y;
        }
        if distance_x < hall.redirect_distance && pos.y == target.y && !direction.is_horizontal() {
            direction = toward_x;
        }
        if distance_y == 1 && distance_x > 1 && !direction.is_horizontal() {
            direction = toward_x;
        }
        if distance_x == 1 && distance_y > 1 && direction.is_horizontal() {
            direction = toward_y;
        }

        let inside = self.markers.get(pos).is_some_and(|marker| marker != Marker::Void);
        if distance_x == 0 && inside && direction.is_horizontal() {
            direction = if target.x <= origin.x { Direction::Up } else { Direction::Down };
        }
        if distance_y == 0 && inside && !direction.is_horizontal() {
            direction = if target.y <= origin.y { Direction::Left } else { Direction::Right };
        }
        direction
    }

    fn widen(&mut self, pos: Pos, direction: Direction, minus: bool, plus: bool) {
        let (side_x, side_y) = if direction.is_horizontal() { (0, 1) } else { (1, 0) };
        if minus {
            self.carve_if_void(pos.offset(-side_x, -side_y));
        }
        if plus {
            self.carve_if_void(pos.offset(side_x, side_y));
        }
    }

    fn carve_if_void(&mut self, pos: Pos) {
        if self.markers.get(pos) == Some(Marker::Void) {
            self.markers.set(pos, Marker::Corridor);
        }
    }

    /// Doors never sit on corners or directly beside another door.
    fn place_door(&mut self, pos: Pos) {
        let Some(marker) = self.markers.get(pos) else {
            return;
        };
        if marker.is_corner() {
            return;
        }
        let beside_door = [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
            .into_iter()
            .any(|side| self.markers.get(pos.step(side)) == Some(Marker::Door));
        if !beside_door {
            self.markers.set(pos, Marker::Door);
        }
    }
}

/// A walk leaving a room past one of its corners is turned to run along the
/// room's edge instead.
fn deflect_off_corner(marker: Option<Marker>, direction: Direction) -> Direction {
    match (marker, direction) {
        (Some(Marker::CornerTopLeft), Direction::Up | Direction::Left) => Direction::Right,
        (Some(Marker::CornerTopRight), Direction::Up | Direction::Right) => Direction::Down,
        (Some(Marker::CornerBottomLeft), Direction::Left | Direction::Down) => Direction::Up,
        (Some(Marker::CornerBottomRight), Direction::Right | Direction::Down) => Direction::Left,
        _ => direction,
    }
}

/// Turns corners into plain walls and corridors into floor, then walls off
/// every void cell touching a corridor.
pub(super) fn seal_hallways(markers: &mut Grid<Marker>) {
    let positions: Vec<Pos> = markers.positions().collect();
    for &pos in &positions {
        if markers[pos].is_corner() {
            markers[pos] = Marker::Wall;
        }
    }
    for &pos in &positions {
        if markers[pos] != Marker::Corridor {
            continue;
        }
        markers[pos] = Marker::Floor;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let neighbour = pos.offset(dx, dy);
                if markers.get(neighbour) == Some(Marker::Void) {
                    markers.set(neighbour, Marker::Wall);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::rng::{LevelRng, RecordingRng};
    use crate::types::{COARSE_SIZE, Rect};

    fn blank() -> Grid<Marker> {
        Grid::new(COARSE_SIZE, COARSE_SIZE, Marker::Void)
    }

    fn outline(markers: &mut Grid<Marker>, area: Rect) {
        for pos in area.cells() {
            let edge = pos.x == area.x1 || pos.x == area.x2 || pos.y == area.y1 || pos.y == area.y2;
            markers[pos] = if edge { Marker::Wall } else { Marker::Floor };
        }
        markers[Pos::new(area.x1, area.y1)] = Marker::CornerTopLeft;
        markers[Pos::new(area.x2, area.y1)] = Marker::CornerTopRight;
        markers[Pos::new(area.x1, area.y2)] = Marker::CornerBottomLeft;
        markers[Pos::new(area.x2, area.y2)] = Marker::CornerBottomRight;
    }

    #[test]
    fn corridor_joins_facing_rooms_with_doors() {
        for seed in 1..30_u32 {
            let config = GeneratorConfig::default();
            let mut markers = blank();
            outline(&mut markers, Rect::new(5, 5, 12, 12));
            outline(&mut markers, Rect::new(5, 20, 12, 28));
            let request = HallRequest {
                start: Pos::new(8, 20),
                end: Pos::new(9, 12),
                direction: Direction::Up,
            };
            let mut rng = LevelRng::new(seed);
            HallwayRouter::new(&config, &mut rng, &mut markers)
                .connect(request)
                .expect("corridor should arrive");

            assert_eq!(markers[Pos::new(8, 20)], Marker::Door, "seed {seed}");
            assert_eq!(markers[Pos::new(9, 12)], Marker::Door, "seed {seed}");
            assert_eq!(markers[Pos::new(9, 13)], Marker::Corridor, "seed {seed}");
        }
    }

    #[test]
    fn doors_are_not_placed_on_corners_or_beside_doors() {
        let config = GeneratorConfig::default();
        let mut rng = LevelRng::new(1);
        let mut markers = blank();
        outline(&mut markers, Rect::new(5, 5, 12, 12));
        let mut router = HallwayRouter::new(&config, &mut rng, &mut markers);
        router.place_door(Pos::new(5, 5));
        router.place_door(Pos::new(8, 5));
        router.place_door(Pos::new(9, 5));
        assert_eq!(markers[Pos::new(5, 5)], Marker::CornerTopLeft);
        assert_eq!(markers[Pos::new(8, 5)], Marker::Door);
        assert_eq!(markers[Pos::new(9, 5)], Marker::Wall);
    }

    #[test]
    fn step_cap_abandons_the_walk() {
        let mut config = GeneratorConfig::default();
        config.hallway.step_cap = 3;
        let mut rng = LevelRng::new(3);
        let mut markers = blank();
        let request =
            HallRequest { start: Pos::new(5, 30), end: Pos::new(30, 5), direction: Direction::Up };
        let result = HallwayRouter::new(&config, &mut rng, &mut markers).connect(request);
        assert_eq!(result, Err(AttemptFailure::HallwayUnreachable { steps: 3 }));
    }

    #[test]
    fn sealing_walls_in_corridors() {
        let mut markers = blank();
        markers[Pos::new(10, 10)] = Marker::Corridor;
        markers[Pos::new(11, 10)] = Marker::Corridor;
        markers[Pos::new(3, 3)] = Marker::CornerBottomRight;
        seal_hallways(&mut markers);

        assert_eq!(markers[Pos::new(10, 10)], Marker::Floor);
        assert_eq!(markers[Pos::new(11, 10)], Marker::Floor);
        assert_eq!(markers[Pos::new(9, 9)], Marker::Wall);
        assert_eq!(markers[Pos::new(12, 11)], Marker::Wall);
        assert_eq!(markers[Pos::new(13, 10)], Marker::Void);
        assert_eq!(markers[Pos::new(3, 3)], Marker::Wall);
    }

    #[test]
    fn corners_redirect_walks_along_the_room_edge() {
        use Direction::{Down, Left, Right, Up};
        let cases = [
            (Marker::CornerTopLeft, [(Up, Right), (Left, Right), (Right, Right), (Down, Down)]),
            (Marker::CornerTopRight, [(Up, Down), (Right, Down), (Left, Left), (Down, Down)]),
            (Marker::CornerBottomLeft, [(Left, Up), (Down, Up), (Up, Up), (Right, Right)]),
            (Marker::CornerBottomRight, [(Right, Left), (Down, Left), (Up, Up), (Left, Left)]),
        ];
        for (corner, turns) in cases {
            for (heading, expected) in turns {
                assert_eq!(
                    deflect_off_corner(Some(corner), heading),
                    expected,
                    "{corner:?} heading {heading:?}"
                );
            }
        }
        assert_eq!(deflect_off_corner(Some(Marker::Wall), Up), Up);
        assert_eq!(deflect_off_corner(None, Left), Left);
    }

    #[test]
    fn queued_requests_are_carved_in_submission_order() {
        let config = GeneratorConfig::default();
        let mut rooms = blank();
        outline(&mut rooms, Rect::new(5, 5, 12, 12));
        outline(&mut rooms, Rect::new(5, 20, 12, 28));
        outline(&mut rooms, Rect::new(20, 5, 28, 12));
        let first =
            HallRequest { start: Pos::new(8, 20), end: Pos::new(9, 12), direction: Direction::Up };
        let second =
            HallRequest { start: Pos::new(20, 8), end: Pos::new(12, 9), direction: Direction::Left };

        let mut queued_markers = rooms.clone();
        let mut queued_rng = RecordingRng::new(LevelRng::new(21));
        let queued = HallwayRouter::new(&config, &mut queued_rng, &mut queued_markers)
            .connect_all(VecDeque::from([first, second]));

        let mut manual_markers = rooms;
        let mut manual_rng = RecordingRng::new(LevelRng::new(21));
        let mut router = HallwayRouter::new(&config, &mut manual_rng, &mut manual_markers);
        let manual = router.connect(first).and_then(|()| router.connect(second));

        assert_eq!(queued, manual);
        assert_eq!(queued_rng.trace(), manual_rng.trace());
        assert_eq!(queued_markers, manual_markers);
        // Each request opens with its two widening rolls.
        assert!(queued_rng.trace()[..2].iter().all(|draw| draw.bound == 100));
    }

    #[test]
    fn widening_carves_both_sides_of_a_straight_corridor() {
        let mut config = GeneratorConfig::default();
        config.hallway.widen_below = 100;
        let mut markers = blank();
        outline(&mut markers, Rect::new(5, 5, 12, 12));
        outline(&mut markers, Rect::new(5, 20, 12, 28));
        let request =
            HallRequest { start: Pos::new(8, 20), end: Pos::new(8, 12), direction: Direction::Up };
        let mut rng = LevelRng::new(6);
        HallwayRouter::new(&config, &mut rng, &mut markers)
            .connect(request)
            .expect("corridor should arrive");

        for y in 14..=19 {
            assert_eq!(markers[Pos::new(8, y)], Marker::Corridor, "spine at y={y}");
            assert_eq!(markers[Pos::new(7, y)], Marker::Corridor, "west side at y={y}");
            assert_eq!(markers[Pos::new(9, y)], Marker::Corridor, "east side at y={y}");
        }
    }
}
