//! Vulkan presenter
//!
//! Frames are rasterized on the CPU into a [`Framebuffer`], uploaded through
//! a host-visible buffer and copied straight into the acquired swapchain
//! image. No graphics pipeline is involved.

use std::fmt::Display;
use std::sync::Arc;

use ember_assets::TextureAsset;
use ember_core::{Color, Rect};
use ember_ecs::SourceRect;
use ember_render::{Framebuffer, RenderError, RenderSurface};
use tracing::{debug, info, warn};
use vulkano::{
    buffer::{
        allocator::{SubbufferAllocator, SubbufferAllocatorCreateInfo},
        BufferUsage,
    },
    command_buffer::{
        allocator::StandardCommandBufferAllocator, AutoCommandBufferBuilder, CommandBufferUsage,
        CopyBufferToImageInfo,
    },
    device::{
        physical::{PhysicalDevice, PhysicalDeviceType},
        Device, DeviceCreateInfo, DeviceExtensions, Queue, QueueCreateInfo, QueueFlags,
    },
    format::Format,
    image::{Image, ImageUsage},
    instance::Instance,
    memory::allocator::{MemoryTypeFilter, StandardMemoryAllocator},
    swapchain::{
        acquire_next_image, PresentMode, Surface, Swapchain, SwapchainCreateInfo,
        SwapchainPresentInfo,
    },
    sync::{self, GpuFuture},
    Validated, VulkanError,
};
use winit::window::Window;

/// Errors raised while setting up the presenter
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error("no suitable GPU found")]
    NoDevice,

    #[error("no usable surface format")]
    NoFormat,

    #[error("{context}: {message}")]
    Vulkan {
        context: &'static str,
        message: String,
    },
}

fn vk<E: Display>(context: &'static str) -> impl FnOnce(E) -> PresentError {
    move |e| PresentError::Vulkan {
        context,
        message: e.to_string(),
    }
}

fn present_err<E: Display>(context: &'static str) -> impl FnOnce(E) -> RenderError {
    move |e| RenderError::Present(format!("{context}: {e}"))
}

/// Pick the physical device and queue family able to present to `surface`,
/// preferring discrete GPUs.
fn select_device(
    instance: &Arc<Instance>,
    surface: &Arc<Surface>,
    extensions: &DeviceExtensions,
) -> Result<(Arc<PhysicalDevice>, u32), PresentError> {
    instance
        .enumerate_physical_devices()
        .map_err(vk("Failed to enumerate physical devices"))?
        .filter(|p| p.supported_extensions().contains(extensions))
        .filter_map(|p| {
            p.queue_family_properties()
                .iter()
                .enumerate()
                .position(|(i, q)| {
                    q.queue_flags.contains(QueueFlags::GRAPHICS)
                        && p.surface_support(i as u32, surface).unwrap_or(false)
                })
                .map(|i| (p, i as u32))
        })
        .min_by_key(|(p, _)| match p.properties().device_type {
            PhysicalDeviceType::DiscreteGpu => 0,
            PhysicalDeviceType::IntegratedGpu => 1,
            PhysicalDeviceType::VirtualGpu => 2,
            PhysicalDeviceType::Cpu => 3,
            _ => 4,
        })
        .ok_or(PresentError::NoDevice)
}

/// A software framebuffer shown through a Vulkan swapchain
pub struct Presenter {
    framebuffer: Framebuffer,
    previous_frame_end: Option<Box<dyn GpuFuture>>,
    uploads: SubbufferAllocator,
    command_buffers: Arc<StandardCommandBufferAllocator>,
    images: Vec<Arc<Image>>,
    swapchain: Arc<Swapchain>,
    queue: Arc<Queue>,
    device: Arc<Device>,
    window: Arc<Window>,
    recreate_swapchain: bool,
    /// Swapchain stores blue first
    bgra: bool,
    vsync: bool,
}

impl Presenter {
    pub fn new(instance: Arc<Instance>, window: Arc<Window>, vsync: bool) -> Result<Self, PresentError> {
        let surface = Surface::from_window(instance.clone(), window.clone())
            .map_err(vk("Failed to create surface"))?;

        let device_extensions = DeviceExtensions {
            khr_swapchain: true,
            ..DeviceExtensions::empty()
        };
        let (physical_device, queue_family_index) =
            select_device(&instance, &surface, &device_extensions)?;

        info!(
            "Using GPU: {} ({:?})",
            physical_device.properties().device_name,
            physical_device.properties().device_type
        );

        let (device, mut queues) = Device::new(
            physical_device.clone(),
            DeviceCreateInfo {
                queue_create_infos: vec![QueueCreateInfo {
                    queue_family_index,
                    ..Default::default()
                }],
                enabled_extensions: device_extensions,
                ..Default::default()
            },
        )
        .map_err(vk("Failed to create logical device"))?;
        let queue = queues.next().ok_or(PresentError::NoDevice)?;

        let capabilities = physical_device
            .surface_capabilities(&surface, Default::default())
            .map_err(vk("Failed to query surface capabilities"))?;
        let formats = physical_device
            .surface_formats(&surface, Default::default())
            .map_err(vk("Failed to query surface formats"))?;
        let image_format = [
            Format::B8G8R8A8_UNORM,
            Format::B8G8R8A8_SRGB,
            Format::R8G8B8A8_UNORM,
            Format::R8G8B8A8_SRGB,
        ]
        .into_iter()
        .find(|f| formats.iter().any(|(available, _)| available == f))
        .ok_or(PresentError::NoFormat)?;
        let bgra = matches!(image_format, Format::B8G8R8A8_UNORM | Format::B8G8R8A8_SRGB);

        let modes: Vec<PresentMode> = physical_device
            .surface_present_modes(&surface, Default::default())
            .map_err(vk("Failed to query present modes"))?
            .into_iter()
            .collect();
        let present_mode = if vsync {
            PresentMode::Fifo
        } else {
            [PresentMode::Immediate, PresentMode::Mailbox]
                .into_iter()
                .find(|m| modes.contains(m))
                .unwrap_or(PresentMode::Fifo)
        };
        let composite_alpha = capabilities
            .supported_composite_alpha
            .into_iter()
            .next()
            .ok_or(PresentError::NoFormat)?;

        let size = window.inner_size();
        let (swapchain, images) = Swapchain::new(
            device.clone(),
            surface,
            SwapchainCreateInfo {
                min_image_count: capabilities.min_image_count.max(2),
                image_format,
                image_extent: size.into(),
                image_usage: ImageUsage::TRANSFER_DST,
                composite_alpha,
                present_mode,
                ..Default::default()
            },
        )
        .map_err(vk("Failed to create swapchain"))?;
        info!(?image_format, ?present_mode, "Swapchain created");

        let memory_allocator = Arc::new(StandardMemoryAllocator::new_default(device.clone()));
        let uploads = SubbufferAllocator::new(
            memory_allocator,
            SubbufferAllocatorCreateInfo {
                buffer_usage: BufferUsage::TRANSFER_SRC,
                memory_type_filter: MemoryTypeFilter::PREFER_HOST
                    | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
                ..Default::default()
            },
        );
        let command_buffers = Arc::new(StandardCommandBufferAllocator::new(
            device.clone(),
            Default::default(),
        ));

        Ok(Self {
            framebuffer: Framebuffer::new(size.width, size.height),
            previous_frame_end: Some(sync::now(device.clone()).boxed()),
            uploads,
            command_buffers,
            images,
            swapchain,
            queue,
            device,
            window,
            recreate_swapchain: false,
            bgra,
            vsync: matches!(present_mode, PresentMode::Fifo | PresentMode::FifoRelaxed),
        })
    }

    /// Match the swapchain and framebuffer to the window. Returns false when
    /// there is nothing to present into (e.g. minimized).
    fn sync_extent(&mut self) -> Result<bool, RenderError> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(false);
        }
        let extent: [u32; 2] = size.into();
        if extent != self.swapchain.image_extent() {
            self.recreate_swapchain = true;
        }

        if self.recreate_swapchain {
            let (swapchain, images) = self
                .swapchain
                .recreate(SwapchainCreateInfo {
                    image_extent: extent,
                    ..self.swapchain.create_info()
                })
                .map_err(|e| RenderError::SurfaceLost(e.to_string()))?;
            debug!(width = extent[0], height = extent[1], "Swapchain recreated");
            self.swapchain = swapchain;
            self.images = images;
            self.recreate_swapchain = false;
        }

        let [w, h] = self.swapchain.image_extent();
        self.framebuffer.resize(w, h);
        Ok(true)
    }
}

impl RenderSurface for Presenter {
    fn clear(&mut self, color: Color) {
        if let Err(e) = self.sync_extent() {
            warn!("{e}");
        }
        self.framebuffer.fill(color);
    }

    fn draw_textured_rect(
        &mut self,
        _id: &str,
        texture: &TextureAsset,
        src: SourceRect,
        dst: Rect,
        rotation: f32,
    ) {
        self.framebuffer.draw_textured_rect(texture, src, dst, rotation);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.framebuffer.fill_rect(rect, color);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if let Some(previous) = self.previous_frame_end.as_mut() {
            previous.cleanup_finished();
        }
        if !self.sync_extent()? {
            return Ok(());
        }

        let (image_index, suboptimal, acquire_future) =
            match acquire_next_image(self.swapchain.clone(), None).map_err(Validated::unwrap) {
                Ok(r) => r,
                Err(VulkanError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    return Ok(());
                }
                Err(e) => return Err(RenderError::Present(e.to_string())),
            };
        if suboptimal {
            self.recreate_swapchain = true;
        }

        let upload = self
            .uploads
            .allocate_slice::<u8>(self.framebuffer.pixels().len() as u64)
            .map_err(present_err("Failed to allocate upload buffer"))?;
        {
            let mut mapped = upload.write().map_err(present_err("Failed to map upload buffer"))?;
            if self.bgra {
                self.framebuffer.copy_bgra_into(&mut mapped);
            } else {
                mapped.copy_from_slice(self.framebuffer.pixels());
            }
        }

        let mut builder = AutoCommandBufferBuilder::primary(
            self.command_buffers.clone(),
            self.queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )
        .map_err(present_err("Failed to begin command buffer"))?;
        builder
            .copy_buffer_to_image(CopyBufferToImageInfo::buffer_image(
                upload,
                self.images[image_index as usize].clone(),
            ))
            .map_err(present_err("Failed to record frame copy"))?;
        let command_buffer = builder
            .build()
            .map_err(present_err("Failed to build command buffer"))?;

        let future = self
            .previous_frame_end
            .take()
            .unwrap_or_else(|| sync::now(self.device.clone()).boxed())
            .join(acquire_future)
            .then_execute(self.queue.clone(), command_buffer)
            .map_err(present_err("Failed to submit frame"))?
            .then_swapchain_present(
                self.queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_index),
            )
            .then_signal_fence_and_flush();

        match future.map_err(Validated::unwrap) {
            Ok(future) => {
                self.previous_frame_end = Some(future.boxed());
                Ok(())
            }
            Err(VulkanError::OutOfDate) => {
                self.recreate_swapchain = true;
                self.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
                Ok(())
            }
            Err(e) => {
                self.previous_frame_end = Some(sync::now(self.device.clone()).boxed());
                Err(RenderError::Present(e.to_string()))
            }
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.framebuffer.width(), self.framebuffer.height())
    }

    fn has_vsync(&self) -> bool {
        self.vsync
    }
}
