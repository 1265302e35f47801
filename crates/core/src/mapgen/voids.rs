//! Grows extra rooms into large empty stretches of the carve grid.

use crate::config::GeneratorConfig;
use crate::rng::RandomSource;
use crate::types::{Direction, Pos, Rect};

use super::grid::Grid;
use super::layout::Marker;

pub(super) struct VoidFillContext<'a, R> {
    pub(super) config: &'a GeneratorConfig,
    pub(super) rng: &'a mut R,
    pub(super) markers: &'a mut Grid<Marker>,
    pub(super) set_piece_area: Option<Rect>,
}

/// Returns the number of rooms added. Stops once the void count drops to the
/// threshold or the try budget is spent, whichever comes first.
pub(super) fn fill_voids<R: RandomSource>(context: &mut VoidFillContext<'_, R>) -> usize {
    let settings = &context.config.voids;
    let mut added = 0;
    let mut tries = 0;
    while void_count(context.markers) > settings.threshold && tries < settings.tries {
        tries += 1;
        let x = context.rng.next(38) + 1;
        let y = context.rng.next(38) + 1;
        let seed = Pos::new(x, y);
        if context.markers.get(seed) != Some(Marker::Wall)
            || context.set_piece_area.is_some_and(|area| area.contains(seed))
        {
            continue;
        }
        let Some(direction) = growth_direction(context.markers, seed) else {
            continue;
        };
        let area = grow_area(context.config, context.markers, seed, direction);
        if area.span_x() > settings.min_span && area.span_y() > settings.min_span {
            draw_void_room(context.markers, area);
            added += 1;
        }
    }
    added
}

pub(super) fn void_count(markers: &Grid<Marker>) -> usize {
    markers.cells().iter().filter(|&&marker| marker == Marker::Void).count()
}

/// Direction from a wall cell into the void, when the wall separates a
/// straight stretch of floor from a straight stretch of void.
fn growth_direction(markers: &Grid<Marker>, seed: Pos) -> Option<Direction> {
    let is = |dx: i32, dy: i32, marker: Marker| markers.get(seed.offset(dx, dy)) == Some(marker);
    let side_matches = |dx: i32, dy: i32, marker: Marker| {
        if dx != 0 {
            (-1..=1).all(|offset| is(dx, offset, marker))
        } else {
            (-1..=1).all(|offset| is(offset, dy, marker))
        }
    };
    [Direction::Left, Direction::Right, Direction::Up, Direction::Down].into_iter().find(
        |&direction| {
            let (dx, dy) = direction.delta();
            side_matches(dx, dy, Marker::Void) && side_matches(-dx, -dy, Marker::Floor)
        },
    )
}

/// Grows a rectangle from `seed` toward `direction`. The seed's wall line
/// forms one edge and may only extend along existing wall; every other cell
/// taken must be void.
fn grow_area(config: &GeneratorConfig, markers: &Grid<Marker>, seed: Pos, direction: Direction) -> Rect {
    let settings = &config.voids;
    let band = Rect::new(config.band_min, config.band_min, config.band_max, config.band_max);
    let mut area = Rect::new(seed.x, seed.y, seed.x, seed.y);
    let (forward, sides) = match direction {
        Direction::Left | Direction::Right => (direction, [Direction::Up, Direction::Down]),
        Direction::Up | Direction::Down => (direction, [Direction::Left, Direction::Right]),
    };
    let mut growing = [true; 3];

    while growing.iter().any(|&active| active) {
        for (slot, edge) in [forward, sides[0], sides[1]].into_iter().enumerate() {
            if !growing[slot] {
                continue;
            }
            let candidate = extend(area, edge);
            let within_caps = candidate.span_x() < settings.max_span_x
                && candidate.span_y() < settings.max_span_y;
            let fits = within_caps
                && band.contains(Pos::new(candidate.x1, candidate.y1))
                && band.contains(Pos::new(candidate.x2, candidate.y2))
                && new_edge(area, edge).cells().all(|pos| {
                    let on_seed_line = match direction {
                        Direction::Left | Direction::Right => pos.x == seed.x,
                        Direction::Up | Direction::Down => pos.y == seed.y,
                    };
                    let wanted = if on_seed_line { Marker::Wall } else { Marker::Void };
                    markers.get(pos) == Some(wanted)
                });
            if fits {
                area = candidate;
            } else {
                growing[slot] = false;
            }
        }
    }
    area
}

fn extend(area: Rect, direction: Direction) -> Rect {
    match direction {
        Direction::Up => Rect { y1: area.y1 - 1, ..area },
        Direction::Down => Rect { y2: area.y2 + 1, ..area },
        Direction::Left => Rect { x1: area.x1 - 1, ..area },
        Direction::Right => Rect { x2: area.x2 + 1, ..area },
    }
}

/// The row or column `extend` would add.
fn new_edge(area: Rect, direction: Direction) -> Rect {
    match direction {
        Direction::Up => Rect { y1: area.y1 - 1, y2: area.y1 - 1, ..area },
        Direction::Down => Rect { y1: area.y2 + 1, y2: area.y2 + 1, ..area },
        Direction::Left => Rect { x1: area.x1 - 1, x2: area.x1 - 1, ..area },
        Direction::Right => Rect { x1: area.x2 + 1, x2: area.x2 + 1, ..area },
    }
}

fn draw_void_room(markers: &mut Grid<Marker>, area: Rect) {
    let on_edge =
        |pos: Pos| pos.x == area.x1 || pos.x == area.x2 || pos.y == area.y1 || pos.y == area.y2;
    for pos in area.cells() {
        if !on_edge(pos) {
            markers.set(pos, Marker::Floor);
        } else if markers.get(pos) == Some(Marker::Void) {
            markers.set(pos, Marker::Wall);
        }
    }
    for pos in area.cells().filter(|&pos| on_edge(pos)) {
        if markers.get(pos) != Some(Marker::Wall) {
            continue;
        }
        let floor = |dx: i32, dy: i32| markers.get(pos.offset(dx, dy)) == Some(Marker::Floor);
        if (floor(-1, 0) && floor(1, 0)) || (floor(0, -1) && floor(0, 1)) {
            markers.set(pos, Marker::Floor);
        }
    }
}
