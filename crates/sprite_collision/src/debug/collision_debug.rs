//! Collision-specific debug visualization

use crate::debug::draw::{Color, DebugDraw, DebugDrawList, DebugShape};
use crate::foundation::math::Vec2;
use crate::physics::body::Body;
use crate::physics::collision::CollisionShape;
use crate::physics::world::CollisionWorld;
use crate::spatial::Rect;

/// Color scheme for collision visualization
#[derive(Clone, Debug)]
pub struct CollisionDebugColors {
    /// Swept boxes of moving bodies
    pub broad_phase: Color,

    /// Collider outlines without contact
    pub shape_default: Color,

    /// Collider outlines with contact flags set
    pub shape_colliding: Color,

    /// Quadtree node regions
    pub quadtree: Color,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            broad_phase: Color::new(0.5, 0.8, 1.0, 0.15),   // Light blue, transparent
            shape_default: Color::new(0.0, 1.0, 0.0, 0.3),  // Green, semi-transparent
            shape_colliding: Color::new(1.0, 0.0, 0.0, 0.5), // Red, semi-transparent
            quadtree: Color::new(1.0, 1.0, 1.0, 0.1),
        }
    }
}

/// Draws bodies, swept boxes and quadtree regions into a [`DebugDrawList`]
#[derive(Debug, Clone)]
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawList,
    colors: CollisionDebugColors,

    /// Show swept boxes of moving bodies
    pub show_broad_phase: bool,

    /// Show collider outlines
    pub show_shapes: bool,

    /// Show quadtree node regions
    pub show_quadtree: bool,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawList::new(),
            colors: CollisionDebugColors::default(),
            show_broad_phase: true,
            show_shapes: true,
            show_quadtree: false,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Draw one body's collider, colored by its contact flags, plus its
    /// swept box while it moves
    pub fn draw_body(&mut self, body: &Body) {
        let Some(collider) = body.collider() else {
            return;
        };

        if self.show_shapes {
            let color = if body.touching.is_empty() {
                self.colors.shape_default
            } else {
                self.colors.shape_colliding
            };
            collider.draw(&mut self.debug_draw, color);
        }

        if self.show_broad_phase {
            if let Some(broad) = body.broad_phase_collider() {
                if !std::ptr::eq(broad, collider) {
                    broad.draw(&mut self.debug_draw, self.colors.broad_phase);
                }
            }
        }
    }

    /// Draw every body and, when enabled, the quadtree regions
    pub fn draw_world(&mut self, world: &CollisionWorld) {
        for (_, body) in world.bodies() {
            self.draw_body(body);
        }
        if self.show_quadtree {
            if let Some(tree) = world.spatial_index().as_quadtree() {
                self.draw_regions(&tree.regions());
            }
        }
    }

    /// Outline each region
    pub fn draw_regions(&mut self, regions: &[Rect]) {
        for region in regions {
            let vertices = [
                region.min,
                region.min + Vec2::new(region.width(), 0.0),
                region.max,
                region.min + Vec2::new(0.0, region.height()),
            ];
            self.debug_draw.polygon(&vertices, self.colors.quadtree);
        }
    }

    /// Expire last frame's shapes
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.tick(delta_time);
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Shapes recorded this frame
    pub fn shapes(&self) -> &[DebugShape] {
        self.debug_draw.shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    /// Get reference to underlying draw list
    pub fn debug_draw(&self) -> &DebugDrawList {
        &self.debug_draw
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionSettings;
    use crate::physics::body::Touching;

    fn sized_body() -> Body {
        let mut body = Body::new(Vec2::zeros()).with_size(10.0, 10.0);
        body.ensure_collider();
        body
    }

    #[test]
    fn test_contact_changes_color() {
        let mut viz = CollisionDebugVisualizer::new();
        let mut body = sized_body();
        viz.draw_body(&body);
        assert_eq!(viz.shapes()[0].color(), CollisionDebugColors::default().shape_default);

        viz.update(0.1);
        assert!(viz.shapes().is_empty());

        body.touching = Touching::LEFT;
        viz.draw_body(&body);
        assert_eq!(viz.shapes()[0].color(), CollisionDebugColors::default().shape_colliding);
    }

    #[test]
    fn test_moving_body_adds_swept_box() {
        let mut viz = CollisionDebugVisualizer::new();
        let mut body = sized_body();
        body.velocity = Vec2::new(20.0, 0.0);
        body.step();

        viz.draw_body(&body);
        assert_eq!(viz.shapes().len(), 2);

        viz.clear();
        viz.show_broad_phase = false;
        viz.draw_body(&body);
        assert_eq!(viz.shapes().len(), 1);
    }

    #[test]
    fn test_quadtree_regions() {
        let mut world = CollisionWorld::new(CollisionSettings::default());
        world.enable_quadtree();
        for i in 0..20 {
            let mut body = Body::new(Vec2::new(f64::from(i) * 15.0, f64::from(i % 5) * 15.0)).with_size(4.0, 4.0);
            body.ensure_collider();
            world.add_body(body);
        }
        world.update_spatial_index();

        let mut viz = CollisionDebugVisualizer::new();
        viz.show_shapes = false;
        viz.show_quadtree = true;
        viz.draw_world(&world);

        let regions = world.spatial_index().as_quadtree().map(|t| t.regions().len());
        assert_eq!(Some(viz.shapes().len()), regions);
        assert!(viz.shapes().len() > 1);
    }
}
