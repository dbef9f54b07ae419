use crate::io::config::Config;
use crate::pipeline::render_config::{Backend, RenderConfig, Toggles};
use crate::pipeline::renderer::{FrameStats, Renderer};
use crate::scene::context::RenderContext;
use crate::scene::loader::{build_palette, init_scene};
use crate::ui::input::{CameraController, poll_toggle_commands};
use log::{debug, info, warn};
use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};

fn log_initial_state(config: &RenderConfig, context: &RenderContext) {
    info!(
        "Scene: {} object(s), {} triangles",
        context.objects.len(),
        context.triangle_count()
    );
    if config.backend == Backend::Hardware {
        warn!("Hardware backend is not available, using the software rasterizer");
    }
    info!("Render state: {}", config);
}

/// Runs the application in GUI mode with real-time rendering and interactivity.
pub fn run_gui(config: Config) -> Result<(), String> {
    let mut width = config.window.width;
    let mut height = config.window.height;

    info!("Starting GUI mode ({}x{})...", width, height);
    info!("Controls: WASD/Arrows=Move, Space/LeftShift=Up/Down, LeftDrag=Look, Scroll=FOV");
    info!(
        "Toggles: F1=Backend F2=Rotation F4=Filter F5=LightMode F6=NormalMap F7=Depth F8=BBox F9=Cull F10=Background"
    );

    let mut window = Window::new(
        &config.window.title,
        width,
        height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| format!("Failed to create window: {}", e))?;
    window.set_target_fps(config.window.target_fps);

    let mut context = init_scene(&config, width, height);
    let mut renderer = Renderer::new(width, height, build_palette(&config));
    let mut toggles = Toggles::new(config.render.toggles);
    let mut cam_controller = CameraController::new(
        config.camera.speed,
        config.camera.sensitivity,
        config.camera.zoom_speed,
        &context.camera,
    );
    log_initial_state(&toggles.snapshot(), &context);

    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();
    let mut last_frame_time = Instant::now();
    let mut last_stats = FrameStats::default();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Resize ---
        let (new_width, new_height) = window.get_size();
        if (new_width, new_height) != (width, height) && new_width > 0 && new_height > 0 {
            width = new_width;
            height = new_height;
            renderer.resize(width, height);
            context
                .camera
                .set_aspect_ratio(width as f32 / height as f32);
            debug!("Resized to {}x{}", width, height);
        }

        // --- Input ---
        for command in poll_toggle_commands(&window) {
            toggles.apply(command);
        }
        cam_controller.update(&window, &mut context.camera, dt);

        // --- Update & Render ---
        let frame_config = toggles.snapshot();
        context.update(dt, &frame_config);
        let stats = renderer.render_frame(&mut context, &frame_config);
        if stats != last_stats {
            debug!("Frame: {}", stats);
            last_stats = stats;
        }

        // --- Display ---
        window
            .update_with_buffer(renderer.present(), width, height)
            .map_err(|e| format!("Failed to present frame: {}", e))?;

        window.set_title(&format!(
            "{} - {:.1} FPS - FOV: {:.1} - {}",
            config.window.title,
            1.0 / dt.max(f32::EPSILON),
            cam_controller.fov.to_degrees(),
            frame_config
        ));

        frame_count += 1;
        if last_fps_update.elapsed().as_secs_f32() >= 2.0 {
            info!(
                "Average FPS: {:.1}",
                frame_count as f32 / last_fps_update.elapsed().as_secs_f32()
            );
            frame_count = 0;
            last_fps_update = Instant::now();
        }
    }

    info!("Window closed.");
    Ok(())
}

/// Renders `frames` frames without a window and logs timings.
///
/// Rotation advances with a fixed 1/60 s step so runs are comparable.
pub fn run_headless(config: Config, frames: usize) -> Result<(), String> {
    if frames == 0 {
        return Err("Headless mode needs at least one frame".to_string());
    }
    let width = config.window.width;
    let height = config.window.height;
    if width == 0 || height == 0 {
        return Err(format!("Invalid viewport {}x{}", width, height));
    }

    info!("Starting headless benchmark ({}x{}, {} frames)...", width, height, frames);

    let mut context = init_scene(&config, width, height);
    let mut renderer = Renderer::new(width, height, build_palette(&config));
    let render_config = config.render.toggles;
    log_initial_state(&render_config, &context);

    let step = 1.0 / 60.0;
    let mut total = Duration::ZERO;
    let mut slowest = Duration::ZERO;
    let mut pixels = 0usize;

    for frame in 0..frames {
        let start = Instant::now();
        context.update(step, &render_config);
        let stats = renderer.render_frame(&mut context, &render_config);
        let elapsed = start.elapsed();

        debug!("Frame {}: {:.2?} - {}", frame, elapsed, stats);
        total += elapsed;
        slowest = slowest.max(elapsed);
        pixels += stats.pixels_written;
    }

    let average = total.div_f64(frames as f64);
    info!(
        "Rendered {} frames in {:.2?} (avg {:.2?}, worst {:.2?}, {:.1} FPS)",
        frames,
        total,
        average,
        slowest,
        frames as f64 / total.as_secs_f64().max(f64::EPSILON)
    );
    info!("Average pixels written per frame: {}", pixels / frames);
    Ok(())
}
