//! Anchor-point query used to find where the hook lands.
//!
//! The grapple systems never talk to a physics world directly. They cast a
//! sight ray through whatever [`AnchorQuery`] implementation is stored in the
//! [`AnchorQuerySource`] resource. Hosts plug in their own scene query; this
//! module also ships [`StaticColliders`], a list of axis-aligned boxes that
//! is enough for tests and the headless demo.
//!
//! # Example
//!
//! ```ignore
//! let colliders = StaticColliders::new()
//!     .with_box(SolidBox::new(Vec3::new(10.0, 0.0, 10.0), Vec3::new(14.0, 20.0, 14.0), 1));
//! world.insert_resource(AnchorQuerySource::new(colliders));
//! ```

use std::ops::Deref;

use bevy_ecs::prelude::Resource;
use glam::Vec3;

/// Bit set of collision layers a query may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing only `layer`. Layers above 31 produce an empty mask.
    pub fn layer(layer: u8) -> Self {
        LayerMask(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    pub fn with_layer(self, layer: u8) -> Self {
        LayerMask(self.0 | Self::layer(layer).0)
    }

    pub fn contains(&self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Result of a successful ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit position.
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Layer of the surface that was hit.
    pub layer: u8,
}

/// Scene query consumed by the grapple controller.
pub trait AnchorQuery: Send + Sync {
    /// Nearest hit along `direction` within `max_distance`, considering only
    /// surfaces on a layer contained in `mask`.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// Resource holding the injected [`AnchorQuery`].
#[derive(Resource)]
pub struct AnchorQuerySource(Box<dyn AnchorQuery>);

impl AnchorQuerySource {
    pub fn new(query: impl AnchorQuery + 'static) -> Self {
        Self(Box::new(query))
    }
}

impl Deref for AnchorQuerySource {
    type Target = dyn AnchorQuery;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Axis-aligned solid box on a single layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidBox {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u8,
}

impl SolidBox {
    /// Create a box from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3, layer: u8) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            layer,
        }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test. Returns the entry distance along a unit `direction`, or 0.0
    /// when the origin is inside the box.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
            if t_near > t_far {
                return None;
            }
        }
        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// Brute-force [`AnchorQuery`] over a fixed list of boxes.
#[derive(Clone, Debug, Default)]
pub struct StaticColliders {
    boxes: Vec<SolidBox>,
}

impl StaticColliders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, solid: SolidBox) -> Self {
        self.boxes.push(solid);
        self
    }

    pub fn boxes(&self) -> &[SolidBox] {
        &self.boxes
    }
}

impl AnchorQuery for StaticColliders {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        self.boxes
            .iter()
            .filter(|b| mask.contains(b.layer))
            .filter_map(|b| {
                b.ray_distance(origin, direction)
                    .filter(|d| *d <= max_distance)
                    .map(|d| RayHit {
                        point: origin + direction * d,
                        distance: d,
                        layer: b.layer,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
