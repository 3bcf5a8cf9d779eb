//! Per-entity behaviors and the tick-time dispatcher that runs them

use ember_core::{EntityId, InputState, Vec2};

use crate::world::World;

/// Side effects a script asks the engine to perform outside the world.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlaySound(String),
    PlayMusic(String),
    StopMusic,
    EmitParticles { position: Vec2, count: usize },
}

/// Commands queued during a tick, drained by the engine afterwards.
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn play_sound(&mut self, id: impl Into<String>) {
        self.push(Command::PlaySound(id.into()));
    }

    pub fn emit_particles(&mut self, position: Vec2, count: usize) {
        self.push(Command::EmitParticles { position, count });
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Everything a script may touch while it runs.
pub struct ScriptContext<'a> {
    pub world: &'a mut World,
    pub input: &'a InputState,
    pub commands: &'a mut CommandQueue,
}

/// Custom per-entity logic.
///
/// Scripts hold their own state and receive the id of the entity they are
/// attached to; they must look components up through the context every time
/// rather than caching references between ticks.
pub trait Script {
    /// Called once, on the first tick the behavior is dispatched.
    fn start(&mut self, _ctx: &mut ScriptContext<'_>, _entity: EntityId) {}

    /// Called every simulation tick.
    fn update(&mut self, ctx: &mut ScriptContext<'_>, entity: EntityId, dt: f32);
}

/// Blanket implementation so closures can be used as update-only scripts.
impl<F: FnMut(&mut ScriptContext<'_>, EntityId, f32)> Script for F {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, entity: EntityId, dt: f32) {
        (self)(ctx, entity, dt);
    }
}

/// Behavior component: an optional script plus its start bookkeeping.
#[derive(Default)]
pub struct Behavior {
    script: Option<Box<dyn Script>>,
    started: bool,
}

impl Behavior {
    pub fn new(script: impl Script + 'static) -> Self {
        Self {
            script: Some(Box::new(script)),
            started: false,
        }
    }

    /// A behavior with no script; dispatching it does nothing.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn has_script(&self) -> bool {
        self.script.is_some()
    }
}

impl std::fmt::Debug for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behavior")
            .field("has_script", &self.script.is_some())
            .field("started", &self.started)
            .finish()
    }
}

/// Run every entity's script once, in creation order.
///
/// The script is taken out of the world while it runs so it can freely
/// mutate any entity, itself included. It is put back afterwards unless the
/// entity was destroyed or given a new behavior in the meantime.
pub fn run_behaviors(
    world: &mut World,
    input: &InputState,
    commands: &mut CommandQueue,
    dt: f32,
) -> usize {
    let mut ran = 0;
    for id in world.ids() {
        let Some(behavior) = world.get_mut::<Behavior>(id) else {
            continue;
        };
        let Some(mut script) = behavior.script.take() else {
            continue;
        };
        let first_run = !behavior.started;
        behavior.started = true;

        let mut ctx = ScriptContext {
            world: &mut *world,
            input,
            commands: &mut *commands,
        };
        if first_run {
            script.start(&mut ctx, id);
        }
        script.update(&mut ctx, id, dt);
        ran += 1;

        if let Some(behavior) = world.get_mut::<Behavior>(id) {
            if behavior.script.is_none() && behavior.started {
                behavior.script = Some(script);
            }
        }
    }
    ran
}
