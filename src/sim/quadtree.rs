//! Quad-tree broad phase
//!
//! Rebuilt from scratch every frame. An entry lives in every leaf on whose side
//! of the split lines its bounds reach; queries de-duplicate. Entries that are
//! not wholly inside the root region go to an overflow list that every query
//! scans, so results stay exact anywhere in the plane.

use super::actor::ActorId;
use super::rect::Rect;

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: ActorId,
    bounds: Rect,
}

#[derive(Debug)]
enum NodeKind {
    Leaf(Vec<Entry>),
    Branch(Box<[QuadNode; 4]>),
}

#[derive(Debug)]
struct QuadNode {
    region: Rect,
    depth: u32,
    kind: NodeKind,
}

impl QuadNode {
    fn leaf(region: Rect, depth: u32) -> Self {
        Self {
            region,
            depth,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    fn insert(&mut self, entry: Entry, capacity: usize, max_depth: u32) {
        let should_split = match &mut self.kind {
            NodeKind::Branch(children) => {
                let sides = quadrant_mask(&self.region, &entry.bounds);
                for (child, hit) in children.iter_mut().zip(sides) {
                    if hit {
                        child.insert(entry, capacity, max_depth);
                    }
                }
                false
            }
            NodeKind::Leaf(entries) => {
                entries.push(entry);
                entries.len() > capacity && self.depth < max_depth
            }
        };

        if should_split {
            self.split(capacity, max_depth);
        }
    }

    fn split(&mut self, capacity: usize, max_depth: u32) {
        let residents = match std::mem::replace(&mut self.kind, NodeKind::Leaf(Vec::new())) {
            NodeKind::Leaf(entries) => entries,
            branch @ NodeKind::Branch(_) => {
                self.kind = branch;
                return;
            }
        };

        let [tl, tr, bl, br] = self.region.quadrants();
        let depth = self.depth + 1;
        self.kind = NodeKind::Branch(Box::new([
            QuadNode::leaf(tl, depth),
            QuadNode::leaf(tr, depth),
            QuadNode::leaf(bl, depth),
            QuadNode::leaf(br, depth),
        ]));

        for entry in residents {
            self.insert(entry, capacity, max_depth);
        }
    }

    fn query(&self, area: &Rect, out: &mut Vec<ActorId>) {
        match &self.kind {
            NodeKind::Leaf(entries) => out.extend(
                entries
                    .iter()
                    .filter(|entry| entry.bounds.intersects(area))
                    .map(|entry| entry.id),
            ),
            NodeKind::Branch(children) => {
                let sides = quadrant_mask(&self.region, area);
                for (child, hit) in children.iter().zip(sides) {
                    if hit {
                        child.query(area, out);
                    }
                }
            }
        }
    }

    fn max_depth(&self) -> u32 {
        match &self.kind {
            NodeKind::Leaf(_) => self.depth,
            NodeKind::Branch(children) => children.iter().map(QuadNode::max_depth).max().unwrap_or(self.depth),
        }
    }
}

/// Which children of `region` (top-left, top-right, bottom-left, bottom-right)
/// `rect` reaches into. Routing by the split lines alone leaves no float gaps
/// between sibling regions.
fn quadrant_mask(region: &Rect, rect: &Rect) -> [bool; 4] {
    let mid = region.center();
    let left = rect.x < mid.x;
    let right = rect.right() > mid.x;
    let top = rect.y < mid.y;
    let bottom = rect.bottom() > mid.y;
    [top && left, top && right, bottom && left, bottom && right]
}

#[derive(Debug)]
pub struct QuadTree {
    root: QuadNode,
    overflow: Vec<Entry>,
    /// Leaf entry count that triggers a split
    capacity: usize,
    max_depth: u32,
    len: usize,
}

impl QuadTree {
    pub fn new(bounds: Rect, capacity: usize, max_depth: u32) -> Self {
        Self {
            root: QuadNode::leaf(bounds, 0),
            overflow: Vec::new(),
            capacity: capacity.max(1),
            max_depth,
            len: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.root.region
    }

    /// Drop every entry and collapse back to a single leaf
    pub fn clear(&mut self) {
        self.root = QuadNode::leaf(self.root.region, 0);
        self.overflow.clear();
        self.len = 0;
    }

    /// Index `bounds` under `id`. Returns false if nothing could be indexed:
    /// empty bounds, or a zero-area world.
    pub fn insert(&mut self, id: ActorId, bounds: Rect) -> bool {
        if self.root.region.is_empty() || bounds.is_empty() {
            return false;
        }

        let entry = Entry { id, bounds };
        if self.root.region.contains_rect(&bounds) {
            self.root.insert(entry, self.capacity, self.max_depth);
        } else {
            self.overflow.push(entry);
        }
        self.len += 1;
        true
    }

    /// Clear, then insert every `(id, bounds)` pair
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = (ActorId, Rect)>) {
        self.clear();
        for (id, bounds) in entries {
            self.insert(id, bounds);
        }
    }

    /// Every indexed id whose bounds intersect `area`, sorted by id, no duplicates
    pub fn query(&self, area: &Rect) -> Vec<ActorId> {
        if area.is_empty() || self.len == 0 {
            return Vec::new();
        }

        let mut hits = Vec::new();
        if self.root.region.intersects(area) {
            self.root.query(area, &mut hits);
        }
        hits.extend(
            self.overflow
                .iter()
                .filter(|entry| entry.bounds.intersects(area))
                .map(|entry| entry.id),
        );
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Deepest leaf currently in the tree
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn world() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn square(x: f32, y: f32, size: f32) -> Rect {
        Rect::from_center(Vec2::new(x, y), Vec2::splat(size))
    }

    #[test]
    fn test_clustered_actors_all_found() {
        let mut tree = QuadTree::new(world(), 4, 10);
        for i in 1..=5 {
            tree.insert(ActorId(i), square(10.0, 10.0, 2.0));
        }
        let hits = tree.query(&Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(hits, (1..=5).map(ActorId).collect::<Vec<_>>());
        assert!(tree.depth() <= 10);
    }

    #[test]
    fn test_far_corners_separated() {
        let mut tree = QuadTree::new(world(), 4, 10);
        tree.insert(ActorId(1), square(0.0, 0.0, 2.0));
        tree.insert(ActorId(2), square(790.0, 590.0, 2.0));
        assert_eq!(tree.query(&Rect::new(0.0, 0.0, 5.0, 5.0)), vec![ActorId(1)]);
    }

    #[test]
    fn test_empty_cases() {
        let mut tree = QuadTree::new(world(), 4, 10);
        assert!(tree.query(&Rect::new(0.0, 0.0, 100.0, 100.0)).is_empty());

        tree.insert(ActorId(1), square(10.0, 10.0, 2.0));
        assert!(tree.query(&Rect::new(10.0, 10.0, 0.0, 0.0)).is_empty());

        let mut flat = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 0.0), 4, 10);
        assert!(!flat.insert(ActorId(1), square(10.0, 10.0, 2.0)));
        assert!(flat.query(&Rect::new(0.0, 0.0, 100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_spanning_actor_found_from_every_quadrant() {
        let mut tree = QuadTree::new(world(), 1, 10);
        // Straddles the center split lines
        tree.insert(ActorId(1), square(400.0, 300.0, 20.0));
        for i in 2..6 {
            tree.insert(ActorId(i), square(100.0 * i as f32, 50.0, 2.0));
        }
        for probe in [
            Rect::new(392.0, 292.0, 4.0, 4.0),
            Rect::new(404.0, 292.0, 4.0, 4.0),
            Rect::new(392.0, 304.0, 4.0, 4.0),
            Rect::new(404.0, 304.0, 4.0, 4.0),
        ] {
            assert_eq!(tree.query(&probe), vec![ActorId(1)]);
        }
    }

    #[test]
    fn test_actor_outside_world_still_found() {
        let mut tree = QuadTree::new(world(), 4, 10);
        tree.insert(ActorId(1), square(-50.0, -50.0, 4.0));
        assert_eq!(tree.query(&Rect::new(-60.0, -60.0, 20.0, 20.0)), vec![ActorId(1)]);
    }

    #[test]
    fn test_entry_straddling_world_edge_found_from_outside() {
        let mut tree = QuadTree::new(world(), 4, 10);
        tree.insert(ActorId(1), Rect::new(-5.0, 100.0, 10.0, 10.0));
        tree.insert(ActorId(2), Rect::new(679.9, 578.5, 0.5, 54.3));
        // Query areas lying wholly outside the world
        assert_eq!(tree.query(&Rect::new(-8.0, 100.0, 7.0, 10.0)), vec![ActorId(1)]);
        assert_eq!(tree.query(&Rect::new(647.5, 603.0, 69.4, 0.5)), vec![ActorId(2)]);
        // And from inside
        assert_eq!(tree.query(&Rect::new(2.0, 102.0, 2.0, 2.0)), vec![ActorId(1)]);
    }

    #[test]
    fn test_clear_empties_tree() {
        let mut tree = QuadTree::new(world(), 2, 10);
        for i in 1..20 {
            tree.insert(ActorId(i), square(i as f32 * 30.0, 100.0, 4.0));
        }
        assert!(tree.depth() > 0);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.query(&world()).is_empty());
    }

    // Reaches well past every world edge so straddlers and outside queries are covered
    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-100.0f32..850.0, -100.0f32..650.0, 0.5f32..120.0, 0.5f32..120.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    fn brute_force(rects: &[Rect], area: &Rect) -> Vec<ActorId> {
        rects
            .iter()
            .enumerate()
            .filter(|(_, r)| r.intersects(area))
            .map(|(i, _)| ActorId(i as u32 + 1))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_query_matches_brute_force(
            rects in prop::collection::vec(rect_strategy(), 0..120),
            area in rect_strategy(),
            capacity in 1usize..8,
        ) {
            let mut tree = QuadTree::new(world(), capacity, 8);
            for (i, r) in rects.iter().enumerate() {
                tree.insert(ActorId(i as u32 + 1), *r);
            }
            prop_assert_eq!(tree.query(&area), brute_force(&rects, &area));
        }

        #[test]
        fn prop_rebuild_is_idempotent(
            rects in prop::collection::vec(rect_strategy(), 0..80),
            area in rect_strategy(),
        ) {
            let entries = || rects.iter().enumerate().map(|(i, r)| (ActorId(i as u32 + 1), *r));
            let mut tree = QuadTree::new(world(), 4, 10);
            tree.rebuild(entries());
            let first = tree.query(&area);
            tree.rebuild(entries());
            prop_assert_eq!(first, tree.query(&area));
        }
    }
}
