//! Frame-strip animation stepping

use ember_ecs::{System, World};

/// Advance every animated sprite's clock by `dt` seconds. Returns the
/// number of sprites stepped.
pub fn advance_animations(world: &mut World, dt: f32) -> usize {
    let (entities, components) = world.split_mut();
    let mut stepped = 0;
    for entity in entities {
        if let Some(anim) = components
            .sprites
            .get_mut(entity.index())
            .and_then(|s| s.animation.as_mut())
        {
            anim.advance(dt);
            stepped += 1;
        }
    }
    stepped
}

/// Runs [`advance_animations`] as a per-tick system
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn run(&mut self, world: &mut World, dt: f32) {
        advance_animations(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_ecs::{Animation, SourceRect, Sprite, SystemSchedule};

    #[test]
    fn only_animated_sprites_step() {
        let mut world = World::new();
        let still = world.spawn();
        world.insert(still, Sprite::new("tiles", SourceRect::sized(64, 64)));
        let walker = world.spawn();
        world.insert(
            walker,
            Sprite::new("player", SourceRect::sized(48, 48)).with_animation(Animation::new(4, 0.12)),
        );

        assert_eq!(advance_animations(&mut world, 0.12), 1);
        let sprite = world.get::<Sprite>(walker).unwrap();
        assert_eq!(sprite.animation.as_ref().unwrap().current, 1);
        assert_eq!(sprite.frame_source(), SourceRect::new(48, 0, 48, 48));
    }

    #[test]
    fn runs_inside_a_schedule() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(
            e,
            Sprite::new("player", SourceRect::sized(8, 8)).with_animation(Animation::new(2, 0.25)),
        );

        let mut schedule = SystemSchedule::new();
        schedule.add_system(AnimationSystem);
        for _ in 0..3 {
            schedule.run_all(&mut world, 0.25);
        }
        let anim = world.get::<Sprite>(e).unwrap().animation.clone().unwrap();
        assert_eq!(anim.current, 1);
    }
}
