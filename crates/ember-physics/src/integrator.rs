use ember_ecs::World;

/// Advance every entity that has both a transform and a physics record.
///
/// Per entity: gravity, then acceleration into velocity, then velocity into
/// position. No sub-stepping and no clamping. Returns the number of bodies
/// moved.
pub fn integrate(world: &mut World, dt: f32) -> usize {
    let (entities, components) = world.split_mut();
    let mut moved = 0;
    for entity in entities {
        let index = entity.index();
        let (Some(transform), Some(body)) = (
            components.transforms.get_mut(index),
            components.physics.get_mut(index),
        ) else {
            continue;
        };

        body.velocity.y += body.gravity * dt;
        body.velocity += body.acceleration * dt;
        transform.position += body.velocity * dt;
        moved += 1;
    }
    moved
}
