use ember_core::{EntityId, Transform, Vec2};
use ember_ecs::{Collider, Components, Entity, World};

/// Axis-aligned bounding box in world space, `x`/`y` at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    /// The box of a collider attached to a transform. The collider is
    /// centered on the transform position, shifted by its offset.
    pub fn from_collider(transform: &Transform, collider: &Collider) -> Self {
        Self {
            x: transform.position.x - collider.size.x / 2.0 + collider.offset.x,
            y: transform.position.y - collider.size.y / 2.0 + collider.offset.y,
            w: collider.size.x,
            h: collider.size.y,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Inclusive separating-axis test: boxes whose edges touch intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.x + self.w < other.x
            || other.x + other.w < self.x
            || self.y + self.h < other.y
            || other.y + other.h < self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A resolved overlap between two entities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    pub axis: Axis,
    /// Penetration depth along `axis` before correction
    pub overlap: f32,
    /// +1 when `b` lies further along `axis` than `a`, else -1
    pub sign: f32,
}

/// The box of an entity that carries both a transform and a collider.
pub fn collider_box(components: &Components, entity: Entity) -> Option<Aabb> {
    let transform = components.transforms.get(entity.index())?;
    let collider = components.colliders.get(entity.index())?;
    Some(Aabb::from_collider(transform, collider))
}

/// Test every unordered pair of collidable entities once, in creation order,
/// and resolve each overlap found. Returns the number of pairs resolved.
///
/// The first body's box is taken once per outer entity and reused for all of
/// its pairs, so a body pushed by one neighbour is still tested against the
/// rest from where it started the pass.
pub fn resolve_collisions(world: &mut World) -> usize {
    let (entities, components) = world.split_mut();
    let collidable: Vec<Entity> = entities
        .iter()
        .copied()
        .filter(|e| {
            components.transforms.has(e.index()) && components.colliders.has(e.index())
        })
        .collect();

    let mut resolved = 0;
    for (i, a) in collidable.iter().enumerate() {
        let Some(box_a) = collider_box(components, *a) else {
            continue;
        };
        for b in &collidable[i + 1..] {
            if resolve_pair(components, *a, box_a, *b).is_some() {
                resolved += 1;
            }
        }
    }
    resolved
}

/// Resolve a single pair if their boxes intersect.
///
/// `box_a` is the box of `a` as seen by the caller; the box of `b` is taken
/// from its current position. The correction is applied along the axis of
/// least overlap: two dynamic bodies split it evenly, a dynamic body against
/// a static one takes all of it, and two static bodies are left in place.
/// Velocities along the corrected axis are zeroed on every participant that
/// has physics. A vertical correction marks the upper body as grounded; the
/// flag is never cleared here.
pub fn resolve_pair(
    components: &mut Components,
    a: Entity,
    box_a: Aabb,
    b: Entity,
) -> Option<Contact> {
    let (ia, ib) = (a.index(), b.index());
    let ca = components.colliders.get(ia)?.clone();
    let box_b = collider_box(components, b)?;
    if !box_a.intersects(&box_b) {
        return None;
    }
    let cb = components.colliders.get(ib)?.clone();

    let (Some(ta), Some(tb)) = components.transforms.get_pair_mut(ia, ib) else {
        return None;
    };

    let delta = box_b.center() - box_a.center();
    let overlap_x = (box_a.w + box_b.w) / 2.0 - delta.x.abs();
    let overlap_y = (box_a.h + box_b.h) / 2.0 - delta.y.abs();

    let (axis, overlap, d) = if overlap_x < overlap_y {
        (Axis::X, overlap_x, delta.x)
    } else {
        (Axis::Y, overlap_y, delta.y)
    };
    let sign = if d > 0.0 { 1.0 } else { -1.0 };

    let (shift_a, shift_b) = match (ca.is_static, cb.is_static) {
        (false, false) => (-sign * overlap * 0.5, sign * overlap * 0.5),
        (false, true) => (-sign * overlap, 0.0),
        (true, false) => (0.0, sign * overlap),
        (true, true) => (0.0, 0.0),
    };
    match axis {
        Axis::X => {
            ta.position.x += shift_a;
            tb.position.x += shift_b;
        }
        Axis::Y => {
            ta.position.y += shift_a;
            tb.position.y += shift_b;
        }
    }

    let (pa, pb) = components.physics.get_pair_mut(ia, ib);
    match axis {
        Axis::X => {
            if let Some(pa) = pa {
                pa.velocity.x = 0.0;
            }
            if let Some(pb) = pb {
                pb.velocity.x = 0.0;
            }
        }
        Axis::Y => {
            if let Some(pa) = pa {
                if sign > 0.0 {
                    pa.on_ground = true;
                }
                pa.velocity.y = 0.0;
            }
            if let Some(pb) = pb {
                if sign < 0.0 {
                    pb.on_ground = true;
                }
                pb.velocity.y = 0.0;
            }
        }
    }

    Some(Contact {
        a: a.id(),
        b: b.id(),
        axis,
        overlap,
        sign,
    })
}
