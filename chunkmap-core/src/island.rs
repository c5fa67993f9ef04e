//! Removal of tile islands that are not connected to the anchor tile.

use std::collections::{HashSet, VecDeque};

use crate::error::{MapError, MapResult};
use crate::tiles::TileIndex;
use crate::types::GridPosition;

/// Grid positions reachable from `anchor` through present tiles,
/// moving one tile at a time in any of the eight directions.
pub fn reachable_from(index: &TileIndex, anchor: GridPosition) -> HashSet<GridPosition> {
    let mut visited = HashSet::new();
    if !index.contains(&anchor) {
        return visited;
    }

    let mut frontier = VecDeque::from([anchor]);
    visited.insert(anchor);

    while let Some(position) = frontier.pop_front() {
        for next in position.neighbours() {
            if index.contains(&next) && visited.insert(next) {
                frontier.push_back(next);
            }
        }
    }

    visited
}

/// Drop every tile that cannot be reached from `anchor`.
pub fn purge_isolated(mut index: TileIndex, anchor: GridPosition) -> MapResult<TileIndex> {
    if !index.contains(&anchor) {
        return Err(MapError::MissingAnchor);
    }

    let reachable = reachable_from(&index, anchor);
    let before = index.len();
    index.retain(|p| reachable.contains(p));

    log::info!("Purged {} isolated tiles, {} remain", before - index.len(), index.len());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn index_of(positions: &[(i32, i32)]) -> TileIndex {
        let mut index = TileIndex::new(0);
        for &(c, r) in positions {
            index.insert(GridPosition::new(c, r), PathBuf::from(format!("{}_{}.png", c, r)));
        }
        index
    }

    #[test]
    fn test_unconnected_island_is_removed() {
        let index = index_of(&[(0, 0), (1, 0), (10, 10)]);
        let filtered = purge_isolated(index, GridPosition::ANCHOR).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(!filtered.contains(&GridPosition::new(10, 10)));
    }

    #[test]
    fn test_diagonal_neighbours_connect() {
        let index = index_of(&[(0, 0), (1, 1), (2, 2), (4, 4)]);
        let reachable = reachable_from(&index, GridPosition::ANCHOR);
        assert_eq!(reachable.len(), 3);
        assert!(!reachable.contains(&GridPosition::new(4, 4)));
    }

    #[test]
    fn test_missing_anchor() {
        let index = index_of(&[(1, 0)]);
        assert!(matches!(
            purge_isolated(index, GridPosition::ANCHOR),
            Err(MapError::MissingAnchor)
        ));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let positions: Vec<_> = (0..50_000).map(|c| (c, 0)).collect();
        let index = index_of(&positions);
        assert_eq!(reachable_from(&index, GridPosition::ANCHOR).len(), 50_000);
    }
}
