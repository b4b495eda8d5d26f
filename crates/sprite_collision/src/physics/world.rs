//! Collision world
//!
//! Owns bodies and groups behind stable handles, plus the optional
//! broad-phase index. Every check funnels into one resolution routine:
//! reset the subject's contact flags, pick candidates (a single body, or a
//! group pruned through the quadtree), and fold the pair resolver over all
//! of them without short-circuiting.

use log::{debug, trace};

use crate::config::CollisionSettings;
use crate::debug::draw::{Color, DebugDraw};
use crate::error::{CollisionError, Result};
use crate::foundation::collections::{get_pair_mut, BodyHandle, GroupHandle, HandleMap};
use crate::spatial::{Quadtree, QuadtreeConfig, Rect};

use super::body::{Body, Touching};
use super::collision::CollisionShape;
use super::response::{self, ContactCallback, ResponseMode};

/// Broad-phase index chosen by the caller
#[derive(Debug, Clone, Default)]
pub enum SpatialIndex {
    /// Check every member of a target group
    #[default]
    Disabled,
    /// Prune group members through a quadtree rebuilt once per frame
    Quadtree(Quadtree<BodyHandle>),
}

impl SpatialIndex {
    /// An empty quadtree index
    pub fn quadtree(config: QuadtreeConfig) -> Self {
        SpatialIndex::Quadtree(Quadtree::new(Rect::from_origin_size(0.0, 0.0, 0.0, 0.0), config))
    }

    /// Whether an index is in use
    pub fn is_enabled(&self) -> bool {
        matches!(self, SpatialIndex::Quadtree(_))
    }

    /// The quadtree, when enabled
    pub fn as_quadtree(&self) -> Option<&Quadtree<BodyHandle>> {
        match self {
            SpatialIndex::Quadtree(tree) => Some(tree),
            SpatialIndex::Disabled => None,
        }
    }
}

/// What a subject is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A single body
    Body(BodyHandle),
    /// Every member of a group
    Group(GroupHandle),
}

impl From<BodyHandle> for Target {
    fn from(handle: BodyHandle) -> Self {
        Target::Body(handle)
    }
}

impl From<GroupHandle> for Target {
    fn from(handle: GroupHandle) -> Self {
        Target::Group(handle)
    }
}

/// A named collection of bodies
#[derive(Debug, Clone, Default)]
pub struct Group {
    members: Vec<BodyHandle>,
}

impl Group {
    /// Member handles in insertion order
    pub fn members(&self) -> &[BodyHandle] {
        &self.members
    }

    /// Whether `body` is a member
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.members.contains(&body)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Bodies, groups and the broad-phase index
#[derive(Debug, Default)]
pub struct CollisionWorld {
    bodies: HandleMap<BodyHandle, Body>,
    groups: HandleMap<GroupHandle, Group>,
    index: SpatialIndex,
    settings: CollisionSettings,
}

impl CollisionWorld {
    /// Create an empty world
    pub fn new(settings: CollisionSettings) -> Self {
        let index = if settings.quadtree.enabled {
            SpatialIndex::quadtree(settings.quadtree.into())
        } else {
            SpatialIndex::Disabled
        };

        Self {
            bodies: HandleMap::with_key(),
            groups: HandleMap::with_key(),
            index,
            settings,
        }
    }

    /// Settings in use
    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// The broad-phase index
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Replace the broad-phase index and populate it
    pub fn set_spatial_index(&mut self, index: SpatialIndex) {
        self.index = index;
        self.update_spatial_index();
    }

    /// Switch to a quadtree index built from the settings
    pub fn enable_quadtree(&mut self) {
        self.settings.quadtree.enabled = true;
        self.set_spatial_index(SpatialIndex::quadtree(self.settings.quadtree.into()));
    }

    /// Stop using the broad-phase index
    pub fn disable_quadtree(&mut self) {
        self.settings.quadtree.enabled = false;
        self.index = SpatialIndex::Disabled;
    }

    /// Add a body and return its handle
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let bounds = body.broad_phase_collider().map(CollisionShape::bounding_box);
        let handle = self.bodies.insert(body);
        if let (SpatialIndex::Quadtree(tree), Some(bounds)) = (&mut self.index, bounds) {
            tree.insert(handle, bounds);
        }
        handle
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Look up a body mutably
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the world holds no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Remove a body, evicting it from the index and every group
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let mut body = self.bodies.remove(handle).ok_or(CollisionError::UnknownBody)?;
        for group in body.groups.drain(..) {
            if let Some(group) = self.groups.get_mut(group) {
                group.members.retain(|member| *member != handle);
            }
        }
        if let SpatialIndex::Quadtree(tree) = &mut self.index {
            tree.remove(handle);
        }
        body.removed = true;
        trace!("Removed body {handle:?}");
        Ok(body)
    }

    /// Create an empty group
    pub fn create_group(&mut self) -> GroupHandle {
        self.groups.insert(Group::default())
    }

    /// Look up a group
    pub fn group(&self, handle: GroupHandle) -> Option<&Group> {
        self.groups.get(handle)
    }

    /// Members of a group
    pub fn group_members(&self, handle: GroupHandle) -> Result<&[BodyHandle]> {
        self.groups
            .get(handle)
            .map(Group::members)
            .ok_or(CollisionError::UnknownGroup)
    }

    /// Add a body to a group. Adding an existing member is a no-op.
    pub fn add_to_group(&mut self, group: GroupHandle, body: BodyHandle) -> Result<()> {
        let members = &mut self.groups.get_mut(group).ok_or(CollisionError::UnknownGroup)?.members;
        let owner = self.bodies.get_mut(body).ok_or(CollisionError::UnknownBody)?;
        if !members.contains(&body) {
            members.push(body);
            owner.groups.push(group);
        }
        Ok(())
    }

    /// Remove a body from a group, returning whether it was a member
    pub fn remove_from_group(&mut self, group: GroupHandle, body: BodyHandle) -> Result<bool> {
        let members = &mut self.groups.get_mut(group).ok_or(CollisionError::UnknownGroup)?.members;
        let before = members.len();
        members.retain(|member| *member != body);
        if let Some(owner) = self.bodies.get_mut(body) {
            owner.groups.retain(|g| *g != group);
        }
        Ok(members.len() != before)
    }

    /// Delete a group. Its bodies stay in the world.
    pub fn remove_group(&mut self, group: GroupHandle) -> Result<Group> {
        let removed = self.groups.remove(group).ok_or(CollisionError::UnknownGroup)?;
        for member in removed.members() {
            if let Some(body) = self.bodies.get_mut(*member) {
                body.groups.retain(|g| *g != group);
            }
        }
        Ok(removed)
    }

    /// Advance every live body one step
    pub fn step_all(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.step();
        }
    }

    /// Per-frame index maintenance: refit the bounds and re-insert every
    /// body from its current broad-phase box
    pub fn update_spatial_index(&mut self) {
        let SpatialIndex::Quadtree(tree) = &mut self.index else {
            return;
        };

        let entries = self.bodies.iter().filter_map(|(handle, body)| {
            body.broad_phase_collider()
                .map(|collider| (handle, collider.bounding_box()))
        });
        tree.rebuild(entries);
        debug!(
            "Rebuilt quadtree: {} entries, depth {}, bounds {:?}",
            tree.len(),
            tree.depth(),
            tree.bounds()
        );
    }

    /// Resolve `subject` against `target` with the given mode
    pub fn resolve(
        &mut self,
        mode: ResponseMode,
        subject: BodyHandle,
        target: impl Into<Target>,
        mut callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve_subject(mode, subject, target.into(), &mut callback)
    }

    /// Resolve every member of `group` against `target`
    pub fn resolve_group(
        &mut self,
        mode: ResponseMode,
        group: GroupHandle,
        target: impl Into<Target>,
        mut callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        let target = target.into();
        let members = self.group_members(group)?.to_vec();
        let mut hit = false;
        for member in members {
            hit = self.resolve_subject(mode, member, target, &mut callback)? || hit;
        }
        Ok(hit)
    }

    /// Whether `subject` overlaps `target`; never invokes a callback
    pub fn is_touching(&mut self, subject: BodyHandle, target: impl Into<Target>) -> Result<bool> {
        self.resolve(ResponseMode::IsTouching, subject, target, None)
    }

    /// Whether `subject` overlaps `target`, invoking `callback` per contact
    pub fn overlap(
        &mut self,
        subject: BodyHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve(ResponseMode::Overlap, subject, target, callback)
    }

    /// Push `target` out of `subject`
    pub fn displace(
        &mut self,
        subject: BodyHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve(ResponseMode::Displace, subject, target, callback)
    }

    /// Move `subject` out of `target` and stop it
    pub fn collide(
        &mut self,
        subject: BodyHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve(ResponseMode::Collide, subject, target, callback)
    }

    /// Move `subject` out of `target` and exchange momentum
    pub fn bounce(
        &mut self,
        subject: BodyHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve(ResponseMode::Bounce, subject, target, callback)
    }

    /// Move `subject` out of `target` and reflect it
    pub fn bounce_off(
        &mut self,
        subject: BodyHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve(ResponseMode::BounceOff, subject, target, callback)
    }

    /// [`is_touching`](Self::is_touching) for every member of `group`
    pub fn group_is_touching(&mut self, group: GroupHandle, target: impl Into<Target>) -> Result<bool> {
        self.resolve_group(ResponseMode::IsTouching, group, target, None)
    }

    /// [`overlap`](Self::overlap) for every member of `group`
    pub fn group_overlap(
        &mut self,
        group: GroupHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve_group(ResponseMode::Overlap, group, target, callback)
    }

    /// [`displace`](Self::displace) for every member of `group`
    pub fn group_displace(
        &mut self,
        group: GroupHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve_group(ResponseMode::Displace, group, target, callback)
    }

    /// [`collide`](Self::collide) for every member of `group`
    pub fn group_collide(
        &mut self,
        group: GroupHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve_group(ResponseMode::Collide, group, target, callback)
    }

    /// [`bounce`](Self::bounce) for every member of `group`
    pub fn group_bounce(
        &mut self,
        group: GroupHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve_group(ResponseMode::Bounce, group, target, callback)
    }

    /// [`bounce_off`](Self::bounce_off) for every member of `group`
    pub fn group_bounce_off(
        &mut self,
        group: GroupHandle,
        target: impl Into<Target>,
        callback: Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        self.resolve_group(ResponseMode::BounceOff, group, target, callback)
    }

    /// Emit every collider outline
    pub fn draw_colliders(&self, out: &mut dyn DebugDraw, color: Color) {
        for (_, body) in self.bodies.iter() {
            if let Some(collider) = body.collider() {
                collider.draw(out, color);
            }
        }
    }

    fn resolve_subject(
        &mut self,
        mode: ResponseMode,
        subject: BodyHandle,
        target: Target,
        callback: &mut Option<ContactCallback<'_>>,
    ) -> Result<bool> {
        let body = self.bodies.get_mut(subject).ok_or(CollisionError::UnknownBody)?;
        body.touching = Touching::empty();
        if body.removed {
            return Ok(false);
        }
        body.ensure_collider();

        let others = match target {
            Target::Body(other) => {
                if !self.bodies.contains_key(other) {
                    return Err(CollisionError::UnknownBody);
                }
                vec![other]
            }
            Target::Group(group) => self.candidates(subject, group)?,
        };

        let settings = self.settings;
        let mut hit = false;
        for other in others {
            // Never collide with oneself
            let Some((a, b)) = get_pair_mut(&mut self.bodies, subject, other) else {
                continue;
            };
            // Reborrow so the callback can be handed out once per member
            let reborrowed: Option<ContactCallback<'_>> = match callback.as_mut() {
                Some(callback) => Some(&mut **callback),
                None => None,
            };
            hit = response::resolve_pair(mode, a, b, &settings, reborrowed) || hit;
        }
        Ok(hit)
    }

    /// Members of `group` worth checking against `subject`.
    ///
    /// Falls back to every member when the index is disabled or holds none
    /// of the group's bodies near the subject yet.
    fn candidates(&self, subject: BodyHandle, group: GroupHandle) -> Result<Vec<BodyHandle>> {
        let members = self.group_members(group)?;

        if let SpatialIndex::Quadtree(tree) = &self.index {
            let bounds = self
                .bodies
                .get(subject)
                .and_then(Body::broad_phase_collider)
                .map(CollisionShape::bounding_box);
            if let Some(bounds) = bounds {
                let found = tree.retrieve_from_group(&bounds, |handle| members.contains(handle));
                if !found.is_empty() {
                    return Ok(found);
                }
            }
        }
        Ok(members.to_vec())
    }
}
