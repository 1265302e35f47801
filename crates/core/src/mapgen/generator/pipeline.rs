//! One generation attempt, from an empty carve grid to textured tiles.

use tracing::trace;

use crate::error::AttemptFailure;
use crate::rng::RandomSource;
use crate::types::{COARSE_SIZE, Pos, Rect, RegionId, TileId};

use super::super::fixups::FixupContext;
use super::super::grid::Grid;
use super::super::hallways::{HallwayRouter, seal_hallways};
use super::super::layout::{Marker, RoomCarver};
use super::super::minisets::MinisetContext;
use super::super::model::MinisetPlacement;
use super::super::patterns::{apply_adjacency_fixes, resolve_tiles};
use super::super::regions::build_regions;
use super::super::set_piece::{SetPiece, SetPieceStamp, perimeter_doors};
use super::super::texture::TextureContext;
use super::super::tileset::tileset;
use super::super::voids::{VoidFillContext, fill_voids};
use super::LevelRequest;
use super::stairs::{StairsContext, place_stairs};

pub(super) struct AttemptOutcome {
    pub(super) tiles: Grid<TileId>,
    pub(super) protected: Grid<bool>,
    pub(super) regions: Grid<RegionId>,
    pub(super) view: Pos,
    pub(super) placements: Vec<MinisetPlacement>,
    pub(super) set_piece_area: Option<Rect>,
}

pub(super) fn run_attempt<R: RandomSource>(
    request: &LevelRequest,
    rng: &mut R,
) -> Result<AttemptOutcome, AttemptFailure> {
    let config = &request.config;
    let tileset = tileset(request.level_type);

    let mut markers = Grid::new(COARSE_SIZE, COARSE_SIZE, Marker::Void);
    let forced = request.set_piece.as_ref().map(SetPiece::room_spans);
    let layout = RoomCarver::new(config, &mut *rng, &mut markers).carve_level(forced);
    let set_piece_area = layout.set_piece_area();
    trace!(rooms = layout.rooms.len(), "rooms carved");

    HallwayRouter::new(config, &mut *rng, &mut markers).connect_all(layout.halls)?;
    seal_hallways(&mut markers);
    let void_rooms = fill_voids(&mut VoidFillContext {
        config,
        rng: &mut *rng,
        markers: &mut markers,
        set_piece_area,
    });
    trace!(void_rooms, "voids filled");

    let mut tiles = resolve_tiles(&markers, tileset.rules, tileset.fallback);
    apply_adjacency_fixes(&mut tiles, tileset.adjacency_fixes);

    let mut protected = Grid::new(COARSE_SIZE, COARSE_SIZE, false);
    if let (Some(set_piece), Some(area)) = (&request.set_piece, set_piece_area) {
        let doors = perimeter_doors(&markers, area);
        SetPieceStamp { set_piece, area, doors: &doors }.apply(&mut tiles, &mut protected);
        trace!(?area, doors = doors.len(), "set piece stamped");
    }

    let regions = build_regions(&tiles, tileset);
    FixupContext { tiles: &mut tiles, protected: &protected, tileset }.apply_all();

    let (placements, view) = place_stairs(&mut StairsContext {
        rng: &mut *rng,
        tiles: &mut tiles,
        protected: &protected,
        set_piece_area,
        tileset,
        entry: request.entry,
        town_warp: request.town_warp,
        max_tries: config.miniset_tries,
    })?;
    trace!(placements = placements.len(), ?view, "mandatory minisets placed");

    let mut decorations = MinisetContext {
        rng: &mut *rng,
        tiles: &mut tiles,
        protected: &protected,
        set_piece_area,
    };
    let decorated: usize = tileset
        .decorations
        .iter()
        .map(|decoration| decorations.place_decoration(decoration))
        .sum();
    trace!(decorated, "decorations placed");

    let mut texture = TextureContext {
        rng: &mut *rng,
        tiles: &mut tiles,
        protected: &protected,
        tileset,
        set_piece_area,
    };
    let substituted = texture.substitute();
    texture.apply_shadows();
    trace!(substituted, "tiles textured");

    Ok(AttemptOutcome { tiles, protected, regions, view, placements, set_piece_area })
}
