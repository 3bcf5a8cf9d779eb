//! Frame scheduler: input poll, fixed-timestep ticks, one render, pacing
//!
//! Real time is banked in a [`GameTime`] accumulator (clamped to keep a slow
//! frame from snowballing) and spent in whole ticks before each render.

use std::time::{Duration, Instant};

use ember_core::{GameTime, TimeConfig};
use ember_render::{FrameReport, RenderSurface};
use tracing::{info, warn};

use crate::engine::Engine;
use crate::input::InputSource;
use crate::overlay::DebugOverlay;

/// Source of monotonic time for the scheduler
pub trait Clock {
    /// Seconds since an arbitrary fixed origin
    fn now(&self) -> f64;

    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only moves when told to. Sleeping advances it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: f64,
    /// Total time spent in `sleep`
    pub slept: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
        self.now += duration.as_secs_f64();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// What one loop iteration did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    pub ticks: u32,
    /// `None` when the frame failed to render
    pub report: Option<FrameReport>,
    pub slept: Duration,
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub failed_frames: u64,
}

pub struct FrameScheduler<C: Clock = SystemClock> {
    clock: C,
    time: GameTime,
    state: SchedulerState,
    overlay: DebugOverlay,
    last_frame: Option<f64>,
}

impl FrameScheduler<SystemClock> {
    pub fn new(config: TimeConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> FrameScheduler<C> {
    pub fn with_clock(config: TimeConfig, clock: C) -> Self {
        Self {
            clock,
            time: GameTime::new(config),
            state: SchedulerState::Stopped,
            overlay: DebugOverlay::new(),
            last_frame: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    /// Run one loop iteration. A quit request stops the scheduler but the
    /// iteration still ticks and renders.
    pub fn frame<I, S>(&mut self, engine: &mut Engine, input: &mut I, surface: &mut S) -> FrameOutcome
    where
        I: InputSource + ?Sized,
        S: RenderSurface + ?Sized,
    {
        let frame_start = self.clock.now();
        input.poll();
        if input.quit_requested() && self.state == SchedulerState::Running {
            info!("quit requested");
            self.state = SchedulerState::Stopped;
        }

        let elapsed = self.last_frame.map_or(0.0, |last| frame_start - last);
        self.last_frame = Some(frame_start);
        self.time.update(elapsed);

        let dt = self.time.fixed_dt();
        let mut ticks = 0;
        while self.time.consume_tick() {
            engine.tick(input.state(), dt);
            ticks += 1;
        }

        let report = engine
            .render(surface)
            .inspect_err(|e| warn!("frame dropped: {e}"))
            .ok();
        self.overlay.record_frame(frame_start * 1000.0, engine);

        let mut slept = Duration::ZERO;
        if !surface.has_vsync() {
            let spent = self.clock.now() - frame_start;
            let remaining = self.time.config.target_frame_time - spent;
            if remaining > 0.0 {
                slept = Duration::from_secs_f64(remaining);
                self.clock.sleep(slept);
            }
        }

        FrameOutcome { ticks, report, slept }
    }

    /// Loop until input asks to quit.
    pub fn run<I, S>(&mut self, engine: &mut Engine, input: &mut I, surface: &mut S) -> RunSummary
    where
        I: InputSource + ?Sized,
        S: RenderSurface + ?Sized,
    {
        self.state = SchedulerState::Running;
        self.last_frame = None;
        let mut summary = RunSummary::default();
        info!(
            tick = self.time.config.fixed_timestep,
            vsync = surface.has_vsync(),
            "entering main loop"
        );

        while self.state == SchedulerState::Running {
            let outcome = self.frame(engine, input, surface);
            summary.frames += 1;
            summary.ticks += outcome.ticks as u64;
            if outcome.report.is_none() {
                summary.failed_frames += 1;
            }
        }

        info!(
            frames = summary.frames,
            ticks = summary.ticks,
            failed = summary.failed_frames,
            "main loop stopped"
        );
        summary
    }
}
