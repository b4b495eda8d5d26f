//! Quadtree spatial partitioning structure
//!
//! Divides the plane into hierarchical quadrants for broad-phase pruning.
//! A node splits into four children once it holds more than
//! `max_objects` entries, unless it already sits at `max_levels`, in which
//! case it accepts the overcrowding. Entries live in the deepest node whose
//! quadrant fully contains their bounding box; anything straddling a
//! midline stays in the parent.
//!
//! Entries move every frame, so the tree is never repaired incrementally.
//! Call [`Quadtree::rebuild`] (or `update_bounds` + `cleanup`) once per frame.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Configuration for quadtree behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Maximum entries per node before subdivision
    pub max_objects: usize,

    /// Maximum subdivision depth
    pub max_levels: u32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            max_levels: 4,
        }
    }
}

/// Item stored in the quadtree with the bounds it was inserted under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadtreeEntry<T> {
    /// Caller's identifier for the object
    pub item: T,
    /// World-space bounding box at insertion time
    pub bounds: Rect,
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadtreeNode<T> {
    /// World-space region of this node
    pub bounds: Rect,

    /// Entries held directly by this node
    pub entries: Vec<QuadtreeEntry<T>>,

    /// Child quadrants, `None` while this node is a leaf.
    /// Order: top-right, top-left, bottom-left, bottom-right.
    pub children: Option<Box<[QuadtreeNode<T>; 4]>>,

    /// Depth in the tree (0 = root)
    pub level: u32,
}

impl<T: Copy + PartialEq> QuadtreeNode<T> {
    /// Create a new leaf node
    pub fn new(bounds: Rect, level: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            level,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Index of the child quadrant that fully contains `rect`, if any.
    ///
    /// Comparisons are strict: a box touching a midline belongs to no
    /// single quadrant and stays in this node.
    fn quadrant_index(&self, rect: &Rect) -> Option<usize> {
        let vertical_mid = self.bounds.left() + self.bounds.width() / 2.0;
        let horizontal_mid = self.bounds.top() + self.bounds.height() / 2.0;

        let top = rect.top() < horizontal_mid && rect.bottom() < horizontal_mid;
        let bottom = rect.top() > horizontal_mid;

        if rect.left() < vertical_mid && rect.right() < vertical_mid {
            if top {
                return Some(1);
            } else if bottom {
                return Some(2);
            }
        } else if rect.left() > vertical_mid {
            if top {
                return Some(0);
            } else if bottom {
                return Some(3);
            }
        }
        None
    }

    /// Subdivide this node into 4 children
    fn split(&mut self) {
        if self.children.is_some() {
            return;
        }

        let half_width = self.bounds.width() / 2.0;
        let half_height = self.bounds.height() / 2.0;
        let x = self.bounds.left();
        let y = self.bounds.top();
        let level = self.level + 1;

        self.children = Some(Box::new([
            QuadtreeNode::new(Rect::from_origin_size(x + half_width, y, half_width, half_height), level),
            QuadtreeNode::new(Rect::from_origin_size(x, y, half_width, half_height), level),
            QuadtreeNode::new(Rect::from_origin_size(x, y + half_height, half_width, half_height), level),
            QuadtreeNode::new(
                Rect::from_origin_size(x + half_width, y + half_height, half_width, half_height),
                level,
            ),
        ]));
    }

    /// Insert an entry into this node or the child that fully contains it.
    ///
    /// Returns false if the item is already held by the node it routes to.
    pub fn insert(&mut self, entry: QuadtreeEntry<T>, config: &QuadtreeConfig) -> bool {
        if self.entries.iter().any(|e| e.item == entry.item) {
            return false;
        }

        if let Some(index) = self.quadrant_index(&entry.bounds) {
            if let Some(children) = self.children.as_mut() {
                return children[index].insert(entry, config);
            }
        }

        self.entries.push(entry);

        if self.entries.len() > config.max_objects && self.level < config.max_levels {
            self.split();

            // Push every entry that now fits a quadrant down a level
            let held = std::mem::take(&mut self.entries);
            for held_entry in held {
                match (self.quadrant_index(&held_entry.bounds), self.children.as_mut()) {
                    (Some(index), Some(children)) => {
                        children[index].insert(held_entry, config);
                    }
                    _ => self.entries.push(held_entry),
                }
            }
        }
        true
    }

    /// Collect every item whose node region could overlap `query`
    pub fn retrieve(&self, query: &Rect, results: &mut Vec<T>) {
        results.extend(self.entries.iter().map(|e| e.item));

        if let Some(children) = self.children.as_ref() {
            match self.quadrant_index(query) {
                Some(index) => children[index].retrieve(query, results),
                None => {
                    for child in children.iter() {
                        child.retrieve(query, results);
                    }
                }
            }
        }
    }

    /// Collect every entry in this node and all children
    pub fn collect_all(&self, results: &mut Vec<QuadtreeEntry<T>>) {
        results.extend_from_slice(&self.entries);
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_all(results);
            }
        }
    }

    /// Remove an item from whichever node holds it
    pub fn remove(&mut self, item: T) -> bool {
        if let Some(index) = self.entries.iter().position(|e| e.item == item) {
            self.entries.remove(index);
            return true;
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.remove(item) {
                    return true;
                }
            }
        }
        false
    }

    /// Find the node that holds `item`
    pub fn find_node(&self, item: T) -> Option<&QuadtreeNode<T>> {
        if self.entries.iter().any(|e| e.item == item) {
            return Some(self);
        }
        self.children
            .as_ref()
            .and_then(|children| children.iter().find_map(|child| child.find_node(item)))
    }

    /// Count total entries in this node and all children
    pub fn count_entries(&self) -> usize {
        self.entries.len()
            + self
                .children
                .as_ref()
                .map_or(0, |children| children.iter().map(QuadtreeNode::count_entries).sum())
    }

    /// Deepest level reached below this node
    pub fn depth(&self) -> u32 {
        self.children.as_ref().map_or(self.level, |children| {
            children.iter().map(QuadtreeNode::depth).max().unwrap_or(self.level)
        })
    }

    /// Get the regions of all nodes (for visualization)
    pub fn collect_regions(&self, regions: &mut Vec<Rect>) {
        regions.push(self.bounds);
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.collect_regions(regions);
            }
        }
    }
}

/// Quadtree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    /// Root node covering the indexed region
    pub root: QuadtreeNode<T>,

    /// Configuration
    config: QuadtreeConfig,
}

impl<T: Copy + PartialEq> Quadtree<T> {
    /// Create a new quadtree over the given bounds
    pub fn new(bounds: Rect, config: QuadtreeConfig) -> Self {
        Self {
            root: QuadtreeNode::new(bounds, 0),
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Region covered by the root node
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Insert an item with its current bounding box
    pub fn insert(&mut self, item: T, bounds: Rect) -> bool {
        self.root.insert(QuadtreeEntry { item, bounds }, &self.config)
    }

    /// All items that could overlap `query`.
    ///
    /// Never misses an item whose bounds intersect the query; may return
    /// items that do not.
    pub fn retrieve(&self, query: &Rect) -> Vec<T> {
        let mut results = Vec::new();
        self.root.retrieve(query, &mut results);
        results
    }

    /// [`retrieve`](Self::retrieve) filtered to members of a group
    pub fn retrieve_from_group<F>(&self, query: &Rect, mut is_member: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut results = self.retrieve(query);
        results.retain(|item| is_member(item));
        results
    }

    /// Every entry in the tree
    pub fn all(&self) -> Vec<QuadtreeEntry<T>> {
        let mut results = Vec::new();
        self.root.collect_all(&mut results);
        results
    }

    /// Remove an item from the tree. Empty nodes are left in place.
    pub fn remove(&mut self, item: T) -> bool {
        self.root.remove(item)
    }

    /// Whether the item is held anywhere in the tree
    pub fn contains(&self, item: T) -> bool {
        self.root.find_node(item).is_some()
    }

    /// Level of the node holding `item`
    pub fn level_of(&self, item: T) -> Option<u32> {
        self.root.find_node(item).map(|node| node.level)
    }

    /// Get total entry count
    pub fn len(&self) -> usize {
        self.root.count_entries()
    }

    /// Whether the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deepest level currently in use
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    /// Regions of every node (for visualization)
    pub fn regions(&self) -> Vec<Rect> {
        let mut regions = Vec::new();
        self.root.collect_regions(&mut regions);
        regions
    }

    /// Remove every entry and child node, keeping the root bounds
    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
    }

    /// Grow or shrink the root bounds to enclose every current entry
    pub fn update_bounds(&mut self) {
        if let Some(bounds) = Self::enclosing(&self.all()) {
            self.root.bounds = bounds;
        }
    }

    /// Flatten the tree and re-insert every entry from scratch
    pub fn cleanup(&mut self) {
        let entries = self.all();
        self.clear();
        for entry in entries {
            self.root.insert(entry, &self.config);
        }
    }

    /// Replace the contents with freshly measured entries.
    ///
    /// Equivalent to `update_bounds` + `cleanup` when the entries' boxes
    /// have moved since they were inserted.
    pub fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (T, Rect)>,
    {
        let entries: Vec<QuadtreeEntry<T>> = entries
            .into_iter()
            .map(|(item, bounds)| QuadtreeEntry { item, bounds })
            .collect();

        let bounds = Self::enclosing(&entries).unwrap_or(self.root.bounds);
        self.root = QuadtreeNode::new(bounds, 0);
        for entry in entries {
            self.root.insert(entry, &self.config);
        }
    }

    fn enclosing(entries: &[QuadtreeEntry<T>]) -> Option<Rect> {
        entries
            .iter()
            .map(|e| e.bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}
