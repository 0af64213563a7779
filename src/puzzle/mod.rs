mod shuffle;
mod tile;
mod types;

pub use shuffle::{deal, shuffle_tiles, shuffled_tiles};
pub use tile::{Tile, TileId};
pub use types::{
    CLUES_PER_GROUP, GROUP_COUNT, Group, GroupId, PuzzleData, PuzzleError, TILE_COUNT, TermInput,
};
