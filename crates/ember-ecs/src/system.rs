use crate::world::World;

/// A system that operates on the world once per simulation tick.
pub trait System {
    fn run(&mut self, world: &mut World, dt: f32);
}

/// Blanket implementation so closures can be used as systems.
impl<F: FnMut(&mut World, f32)> System for F {
    fn run(&mut self, world: &mut World, dt: f32) {
        (self)(world, dt);
    }
}

/// An ordered list of systems to run each tick.
pub struct SystemSchedule {
    systems: Vec<Box<dyn System>>,
}

impl SystemSchedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Run all systems in order on the given world.
    pub fn run_all(&mut self, world: &mut World, dt: f32) {
        for system in &mut self.systems {
            system.run(world, dt);
        }
    }

    /// Number of systems in the schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemSchedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Physics;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn closure_system() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Physics::default());

        let mut system = |w: &mut World, dt: f32| {
            for id in w.ids() {
                if let Some(p) = w.get_mut::<Physics>(id) {
                    p.velocity.y += 60.0 * dt;
                }
            }
        };
        system.run(&mut world, 0.5);
        assert_eq!(world.get::<Physics>(e).unwrap().velocity.y, 30.0);
    }

    #[test]
    fn schedule_ordering() {
        let mut world = World::new();
        let log = Rc::new(RefCell::new(Vec::<u32>::new()));

        let mut schedule = SystemSchedule::new();
        let log1 = log.clone();
        schedule.add_system(move |_: &mut World, _: f32| log1.borrow_mut().push(1));
        let log2 = log.clone();
        schedule.add_system(move |_: &mut World, _: f32| log2.borrow_mut().push(2));
        let log3 = log.clone();
        schedule.add_system(move |_: &mut World, _: f32| log3.borrow_mut().push(3));

        schedule.run_all(&mut world, 1.0 / 60.0);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert_eq!(schedule.len(), 3);
    }
}
