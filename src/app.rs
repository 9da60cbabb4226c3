use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::pet::{self, PetState};
use crate::render::GpuState;

/// Simulation tick interval (seconds) — the pet updates at 10 ticks/second,
/// decoupled from the render rate.
const TICK_RATE: f64 = 0.1;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// Window edge length in physical pixels — exactly one sprite tile.
const WINDOW_SIZE: u32 = 32;
/// Offset from the pet anchor to the window origin (sprite centered on it).
const WINDOW_OFFSET: i32 = 16;
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64) {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            let fps = self.frames_since_log as f64 / elapsed;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.frame_time_min * 1000.0,
                self.frame_time_max * 1000.0,
                self.frame_count,
            );
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frame_time_min = f64::MAX;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    // Pet simulation
    pet: PetState,

    // RNG (seedable; drives idle-animation selection only)
    rng: fastrand::Rng,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,
    tick_count: u64,

    // Frame timing
    frame_stats: FrameStats,

    // Screen dimensions (wall-scratch eligibility)
    screen_w: f32,
    screen_h: f32,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            pet: PetState::new(),
            rng: fastrand::Rng::new(),
            last_frame_time: None,
            accumulator: 0.0,
            tick_count: 0,
            frame_stats: FrameStats::new(),
            screen_w: 0.0,
            screen_h: 0.0,
        }
    }

    /// Run fixed-timestep simulation ticks. Each tick updates the pet and
    /// moves the window so it tracks the new anchor.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        // Get cursor position once per frame (not per tick)
        #[cfg(windows)]
        let (cursor_x, cursor_y) = crate::platform::win32::cursor_pos();
        #[cfg(not(windows))]
        let (cursor_x, cursor_y) = (0.0f32, 0.0f32);

        while self.accumulator >= TICK_RATE {
            let rect = pet::update(
                &mut self.pet,
                Vec2::new(cursor_x, cursor_y),
                self.screen_w,
                self.screen_h,
                &mut self.rng,
            );

            if let (Some(window), Some(gpu)) = (&self.window, &self.gpu) {
                gpu.set_frame(rect);
                window.set_outer_position(PhysicalPosition::new(
                    self.pet.pos.x as i32 - WINDOW_OFFSET,
                    self.pet.pos.y as i32 - WINDOW_OFFSET,
                ));
            }

            self.accumulator -= TICK_RATE;
            self.tick_count += 1;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .expect("no monitor found");
        let screen_size = monitor.size();
        self.screen_w = screen_size.width as f32;
        self.screen_h = screen_size.height as f32;

        // One tile-sized borderless window that follows the pet around.
        // Start hidden so DWM doesn't cache stale frame state before our
        // overlay style changes take effect.
        let attrs = WindowAttributes::default()
            .with_title("CursorCat")
            .with_decorations(false)
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE))
            .with_position(PhysicalPosition::new(
                self.pet.pos.x as i32 - WINDOW_OFFSET,
                self.pet.pos.y as i32 - WINDOW_OFFSET,
            ));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("failed to create window"),
        );

        #[cfg(windows)]
        crate::platform::win32::setup_overlay(&window);

        log::info!(
            "Pet window created ({WINDOW_SIZE}x{WINDOW_SIZE}) on {:?}, screen {}x{}",
            monitor.name().unwrap_or_default(),
            screen_size.width,
            screen_size.height,
        );

        // Initialize wgpu + sprite pipeline
        let gpu = GpuState::new(window.clone());
        self.gpu = Some(gpu);
        log::info!("wgpu + sprite pipeline initialized");

        // Continuous game loop
        event_loop.set_control_flow(ControlFlow::Poll);

        // Show window now that all styles and GPU resources are ready.
        window.set_visible(true);

        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                // --- Timing ---
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();

                    // Frame stats
                    self.frame_stats.record_frame(dt);

                    // Fixed timestep sim
                    self.run_fixed_update(dt);
                }
                self.last_frame_time = Some(now);

                // --- Render ---
                if let Some(gpu) = &self.gpu {
                    gpu.render_frame();
                }
            }
            _ => {}
        }
    }
}

/// Entry point — create event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
