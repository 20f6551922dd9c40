//! Denizen Atlas entry point
//!
//! Handles platform-specific initialization and runs the render loop.

use denizen_atlas::layout::{Connection, ConnectionKind, Entity};
use glam::Vec2;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Built-in demo catalog: four domains plus one undomained stray, with a few
/// explicit connections. A real host supplies its own records.
fn demo_catalog() -> (Vec<Entity>, Vec<Connection>) {
    fn entity(id: &str, x: f32, y: f32, domain: Option<&str>, name: &str) -> Entity {
        Entity {
            id: id.to_string(),
            pos: Vec2::new(x, y),
            domain: domain.map(str::to_string),
            name: name.to_string(),
        }
    }
    fn link(from: &str, to: &str, strength: f32) -> Connection {
        Connection {
            from: from.to_string(),
            to: to.to_string(),
            strength,
            kind: ConnectionKind::Explicit,
        }
    }

    let entities = vec![
        entity("sel-1", -900.0, -400.0, Some("aether"), "Seluriel"),
        entity("sel-2", -760.0, -310.0, Some("aether"), "Vantrice"),
        entity("sel-3", -980.0, -520.0, Some("aether"), "Oru"),
        entity("sel-4", -700.0, -480.0, Some("aether"), "Calyx"),
        entity("umb-1", 800.0, -350.0, Some("umbra"), "Nocturne"),
        entity("umb-2", 950.0, -260.0, Some("umbra"), "Hollow King"),
        entity("umb-3", 870.0, -500.0, Some("umbra"), "Pale Sister"),
        entity("frg-1", -150.0, 700.0, Some("forge"), "Embercoil"),
        entity("frg-2", 40.0, 820.0, Some("forge"), "Anvil Saint"),
        entity("frg-3", -80.0, 620.0, Some("forge"), "Slagmother"),
        entity("vrd-1", 300.0, -900.0, Some("verdant"), "Bloomwarden"),
        entity("vrd-2", 460.0, -780.0, Some("verdant"), "Rootspeaker"),
        entity("stray", 0.0, 0.0, None, "The Cartographer"),
    ];

    let connections = vec![
        link("sel-1", "umb-1", 0.9),
        link("frg-2", "vrd-1", 0.6),
        link("stray", "sel-1", 0.8),
    ];

    (entities, connections)
}

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

    use denizen_atlas::engine::{self, Engine, ViewMode};
    use denizen_atlas::renderer::{RenderState, Vertex};
    use denizen_atlas::settings::{QualityPreset, Settings};
    use glam::Vec2;

    /// Application instance holding engine + render state
    struct App {
        engine: Engine,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Reused per-frame vertex scratch buffer
        frame: Vec<Vertex>,
        /// Device pixel ratio for event coordinate mapping
        dpr: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(width: f32, height: f32, dpr: f32, seed: u64) -> Self {
            Self {
                engine: Engine::new(width, height, Settings::load(), seed),
                render_state: None,
                last_time: 0.0,
                frame: Vec::new(),
                dpr,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance simulation and track FPS.
        fn update(&mut self, dt: f32, time: f64) {
            engine::tick(&mut self.engine, dt.min(0.1));

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            self.frame.clear();
            engine::draw(&self.engine, &mut self.frame);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn update_hud(&self) {
            if !self.engine.settings.show_fps {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-fps") {
                el.set_text_content(Some(&format!("{} fps", self.fps)));
            }
        }

        /// Map a mouse event to device-pixel canvas coordinates.
        fn event_pos(&self, event: &MouseEvent) -> Vec2 {
            Vec2::new(
                event.offset_x() as f32 * self.dpr,
                event.offset_y() as f32 * self.dpr,
            )
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Denizen Atlas starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size in device pixels
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(
            width as f32,
            height as f32,
            dpr as f32,
            seed,
        )));

        {
            let (entities, connections) = super::demo_catalog();
            app.borrow_mut().engine.set_catalog(&entities, &connections);
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        // Teardown axis: the loop checks this flag before touching the
        // surface or rescheduling itself.
        let running = Rc::new(Cell::new(true));

        setup_input_handlers(&canvas, app.clone());
        setup_resize_handler(&canvas, app.clone());
        setup_keyboard(app.clone(), running.clone());

        request_animation_frame(app, running);

        log::info!("Denizen Atlas running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, running: Rc<Cell<bool>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, running, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, running: Rc<Cell<bool>>, time: f64) {
        if !running.get() {
            log::info!("Render loop stopped");
            return;
        }
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();
        }
        request_animation_frame(app, running);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Drag start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    let mut a = app.borrow_mut();
                    let pos = a.event_pos(&event);
                    a.engine.pointer_down(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag move (the engine ignores moves when no drag is active)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.event_pos(&event);
                a.engine.pointer_move(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag end, also on leaving the canvas
        for event_name in ["mouseup", "mouseleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().engine.pointer_up();
            });
            let _ =
                canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom anchored at the cursor
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let pos = Vec2::new(
                    event.offset_x() as f32 * a.dpr,
                    event.offset_y() as f32 * a.dpr,
                );
                a.engine.wheel(event.delta_y() as f32, pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.dpr = dpr as f32;
            a.engine.resize(width as f32, height as f32);
            if let Some(ref mut rs) = a.render_state {
                rs.resize(width, height);
            }
            log::info!("Resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Rc<RefCell<App>>, running: Rc<Cell<bool>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            match event.key().as_str() {
                "o" | "O" => {
                    let next = match a.engine.mode {
                        ViewMode::Flat => ViewMode::Orbit,
                        ViewMode::Orbit => ViewMode::Flat,
                    };
                    a.engine.set_mode(next);
                }
                "q" | "Q" => {
                    let next = match a.engine.settings.quality {
                        QualityPreset::Low => QualityPreset::Medium,
                        QualityPreset::Medium => QualityPreset::High,
                        QualityPreset::High => QualityPreset::Low,
                    };
                    a.engine.settings.quality = next;
                    a.engine.settings.save();
                    // Particle caps changed; rebuild derived state
                    let (entities, connections) = super::demo_catalog();
                    a.engine.set_catalog(&entities, &connections);
                    log::info!("Quality: {}", next.as_str());
                }
                "Escape" => {
                    running.set(false);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use denizen_atlas::engine::{self, Engine, ViewMode};
    use denizen_atlas::settings::Settings;

    env_logger::init();
    log::info!("Denizen Atlas (native) starting...");
    log::info!("Headless demo run - build with trunk for the web renderer");

    let (entities, connections) = demo_catalog();
    let mut engine = Engine::new(1280.0, 800.0, Settings::load(), 42);
    engine.set_catalog(&entities, &connections);

    let mut frame = Vec::new();
    for _ in 0..240 {
        engine::tick(&mut engine, 1.0 / 60.0);
    }
    engine::draw(&engine, &mut frame);
    log::info!(
        "flat mode: {} entities, {} stars, {} vertices",
        engine.entity_count(),
        engine.star_count(),
        frame.len()
    );

    for e in &entities {
        if let Some(pos) = engine.screen_position(&e.id) {
            println!("{:<10} {:<16} -> ({:>8.1}, {:>8.1})", e.id, e.name, pos.x, pos.y);
        }
    }

    engine.set_mode(ViewMode::Orbit);
    frame.clear();
    for _ in 0..240 {
        engine::tick(&mut engine, 1.0 / 60.0);
    }
    engine::draw(&engine, &mut frame);
    log::info!("orbit mode: {} vertices", frame.len());
}
