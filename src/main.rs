//! Ember - A small 2D game engine
//!
//! This is the main entry point: it opens the window, sets up the Vulkan
//! presenter, loads the demo scene and hands control to the frame scheduler.

mod platform;
mod presenter;
mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use ember_assets::AssetServer;
use ember_audio::AudioEngine;
use ember_game::{start_demo, Engine, FrameScheduler};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vulkano::{
    instance::{Instance, InstanceCreateFlags, InstanceCreateInfo},
    swapchain::Surface,
    VulkanLibrary,
};

use platform::Platform;
use presenter::Presenter;
use settings::EngineSettings;

fn run() -> Result<()> {
    let settings = EngineSettings::load();

    // Window first: the instance needs the display's surface extensions
    let mut platform = Platform::new(&settings.window).context("Failed to open window")?;

    let library = VulkanLibrary::new().context("Failed to load Vulkan library")?;
    let required_extensions = Surface::required_extensions(platform.event_loop())
        .context("Failed to query surface extensions")?;
    let instance = Instance::new(
        library,
        InstanceCreateInfo {
            flags: InstanceCreateFlags::ENUMERATE_PORTABILITY,
            enabled_extensions: required_extensions,
            ..Default::default()
        },
    )
    .context("Failed to create Vulkan instance")?;

    let mut presenter = Presenter::new(instance, Arc::clone(platform.window()), settings.window.vsync)
        .context("Failed to initialize presenter")?;

    let assets = AssetServer::new(settings.assets.base_path.clone());
    let audio = AudioEngine::new_or_disabled(settings.audio.clone());
    let mut engine = Engine::new(settings.engine_config(), assets, audio);
    let scene = start_demo(&mut engine);
    info!(player = %scene.player, entities = engine.world.entity_count(), "Scene started");

    let mut scheduler = FrameScheduler::new(settings.time.time_config());
    let summary = scheduler.run(&mut engine, &mut platform, &mut presenter);
    info!(frames = summary.frames, ticks = summary.ticks, "Shutting down");
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Ember engine...");

    run().inspect_err(|e| error!("{e:#}"))
}
