//! R-tree wrapper.

use super::Bbox;
use rstar::{RStarInsertionStrategy, RTree, RTreeObject, RTreeParams, AABB};
use std::fmt;

/// Anything with a bounding rectangle can be indexed.
pub trait Bounded {
    fn bbox(&self) -> Bbox;
}

/// Node fan-out used for tile layer indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileTreeParams;

impl RTreeParams for TileTreeParams {
    const MIN_SIZE: usize = 6;
    const MAX_SIZE: usize = 16;
    const REINSERTION_COUNT: usize = 4;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

/// Wider fan-out for indices that mostly take single inserts.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideTreeParams;

impl RTreeParams for WideTreeParams {
    const MIN_SIZE: usize = 7;
    const MAX_SIZE: usize = 18;
    const REINSERTION_COUNT: usize = 5;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

struct Entry<T> {
    envelope: AABB<[f64; 2]>,
    item: T,
}

impl<T: Bounded> Entry<T> {
    fn new(item: T) -> Self {
        Self {
            envelope: envelope(&item.bbox()),
            item,
        }
    }
}

impl<T> RTreeObject for Entry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn envelope(bbox: &Bbox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y])
}

/// Spatial index over bounded items.
///
/// `P` fixes the tree's branching factor.
pub struct SpatialIndex<T, P = TileTreeParams>
where
    P: RTreeParams,
{
    tree: RTree<Entry<T>, P>,
}

impl<T: Bounded, P: RTreeParams> SpatialIndex<T, P> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new_with_params(),
        }
    }

    /// Replaces the contents with `items`, bulk-loading the tree.
    pub fn load(&mut self, items: Vec<T>) {
        let entries = items.into_iter().map(Entry::new).collect();
        self.tree = RTree::bulk_load_with_params(entries);
    }

    /// Builds an index from `items` in one pass.
    pub fn from_items(items: Vec<T>) -> Self {
        let mut index = Self::new();
        index.load(items);
        index
    }

    pub fn insert(&mut self, item: T) {
        self.tree.insert(Entry::new(item));
    }

    /// All items whose rectangle intersects `bbox` (inclusive), in no
    /// particular order.
    pub fn search(&self, bbox: &Bbox) -> impl Iterator<Item = &T> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&envelope(bbox))
            .map(|entry| &entry.item)
    }

    /// Returns true as soon as any item intersects `bbox`.
    pub fn collides(&self, bbox: &Bbox) -> bool {
        self.search(bbox).next().is_some()
    }

    /// Iterate over every item.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.tree.iter().map(|entry| &entry.item)
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new_with_params();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl<T: Bounded, P: RTreeParams> Default for SpatialIndex<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: RTreeParams> fmt::Debug for SpatialIndex<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.tree.size())
            .field("max_size", &P::MAX_SIZE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rect {
        id: u32,
        bbox: Bbox,
    }

    impl Bounded for Rect {
        fn bbox(&self) -> Bbox {
            self.bbox
        }
    }

    fn rect(id: u32, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect {
        Rect {
            id,
            bbox: Bbox::new(min_x, min_y, max_x, max_y),
        }
    }

    fn ids<'a>(items: impl Iterator<Item = &'a Rect>) -> Vec<u32> {
        let mut ids: Vec<u32> = items.map(|r| r.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_empty_index() {
        let index: SpatialIndex<Rect> = SpatialIndex::new();
        assert!(index.is_empty());
        assert!(!index.collides(&Bbox::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_bulk_load_and_search() {
        let index = SpatialIndex::<Rect>::from_items(vec![
            rect(1, 0.0, 0.0, 10.0, 10.0),
            rect(2, 20.0, 20.0, 30.0, 30.0),
            rect(3, 5.0, 5.0, 25.0, 25.0),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(ids(index.search(&Bbox::new(0.0, 0.0, 4.0, 4.0))), vec![1]);
        assert_eq!(
            ids(index.search(&Bbox::new(8.0, 8.0, 22.0, 22.0))),
            vec![1, 2, 3]
        );
        assert!(ids(index.search(&Bbox::new(40.0, 40.0, 50.0, 50.0))).is_empty());
    }

    #[test]
    fn test_search_is_inclusive() {
        let index = SpatialIndex::<Rect>::from_items(vec![rect(1, 0.0, 0.0, 10.0, 10.0)]);
        assert!(index.collides(&Bbox::new(10.0, 10.0, 12.0, 12.0)));
        assert!(!index.collides(&Bbox::new(10.1, 10.1, 12.0, 12.0)));
    }

    #[test]
    fn test_insert_and_clear() {
        let mut index: SpatialIndex<Rect, WideTreeParams> = SpatialIndex::new();
        for i in 0..100 {
            let x = f64::from(i) * 3.0;
            index.insert(rect(i, x, 0.0, x + 1.0, 1.0));
        }
        assert_eq!(index.len(), 100);
        assert_eq!(
            ids(index.search(&Bbox::new(30.0, 0.0, 36.0, 1.0))),
            vec![10, 11, 12]
        );

        index.clear();
        assert!(index.is_empty());
        assert!(!index.collides(&Bbox::new(0.0, 0.0, 1000.0, 1.0)));
    }

    #[test]
    fn test_load_replaces_contents() {
        let mut index = SpatialIndex::<Rect>::from_items(vec![rect(1, 0.0, 0.0, 1.0, 1.0)]);
        index.load(vec![rect(2, 5.0, 5.0, 6.0, 6.0), rect(3, 7.0, 7.0, 8.0, 8.0)]);
        assert_eq!(index.len(), 2);
        assert_eq!(ids(index.iter()), vec![2, 3]);
    }

    #[test]
    fn test_many_items_match_linear_scan() {
        let items: Vec<Rect> = (0..500)
            .map(|i| {
                let x = f64::from((i * 37) % 400);
                let y = f64::from((i * 91) % 400);
                rect(i, x, y, x + 12.0, y + 8.0)
            })
            .collect();
        let index = SpatialIndex::<Rect>::from_items(items.clone());
        let query = Bbox::new(100.0, 100.0, 180.0, 160.0);

        let expected = ids(items.iter().filter(|r| r.bbox.intersects(&query)));
        assert_eq!(ids(index.search(&query)), expected);
    }
}
