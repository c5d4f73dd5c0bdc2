//! Center Siege entry point
//!
//! Browser: wires the canvas, DOM and timers to a [`Session`].
//! Native: runs a headless autoplay session and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use center_siege::audio::AudioManager;
    use center_siege::platform::FrameSlot;
    use center_siege::platform::web::DomHud;
    use center_siege::renderer::{CanvasRenderer, RenderError};
    use center_siege::session::{
        AudioSink, Hud, Scheduler, SoundEffect, TimerHandle, TimerToken,
    };
    use center_siege::{Session, Tuning, Viewport};

    /// Browser collaborators: rAF/setInterval, DOM HUD, Web Audio
    struct BrowserHost {
        game: Weak<RefCell<Game>>,
        frame: FrameSlot<Closure<dyn FnMut(f64)>>,
        /// Interval callbacks must outlive the JS timer
        intervals: Vec<(TimerHandle, Closure<dyn FnMut()>)>,
        hud: DomHud,
        audio: AudioManager,
    }

    impl Scheduler for BrowserHost {
        fn request_frame(&mut self, token: TimerToken) -> TimerHandle {
            let game = self.game.clone();
            let closure: Closure<dyn FnMut(f64)> = Closure::once(move |_time: f64| {
                if let Some(game) = game.upgrade() {
                    run_frame(&game, token);
                }
            });
            let id = web_sys::window()
                .and_then(|w| {
                    w.request_animation_frame(closure.as_ref().unchecked_ref())
                        .ok()
                })
                .unwrap_or_else(|| {
                    log::error!("requestAnimationFrame failed");
                    0
                });
            let handle = TimerHandle(id);
            self.frame.replace(handle, closure);
            handle
        }

        fn cancel_frame(&mut self, handle: TimerHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle.0);
            }
            self.frame.cancel(handle);
        }

        fn set_interval(&mut self, token: TimerToken, period_ms: u32) -> TimerHandle {
            let game = self.game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Some(game) = game.upgrade() {
                    game.borrow_mut().session.on_spawn_timer(token);
                }
            });
            let id = web_sys::window()
                .and_then(|w| {
                    w.set_interval_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        period_ms as i32,
                    )
                    .ok()
                })
                .unwrap_or_else(|| {
                    log::error!("setInterval failed");
                    0
                });
            let handle = TimerHandle(id);
            self.intervals.push((handle, closure));
            handle
        }

        fn clear_interval(&mut self, handle: TimerHandle) {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(handle.0);
            }
            self.intervals.retain(|(h, _)| *h != handle);
        }
    }

    impl Hud for BrowserHost {
        fn set_score(&mut self, score: u64) {
            self.hud.set_score(score);
        }

        fn show_end_overlay(&mut self, final_score: u64) {
            self.hud.show_end_overlay(final_score);
        }

        fn hide_overlay(&mut self) {
            self.hud.hide_overlay();
        }
    }

    impl AudioSink for BrowserHost {
        fn play_background_loop(&mut self) {
            self.audio.play_background_loop();
        }

        fn pause_background_loop(&mut self) {
            self.audio.pause_background_loop();
        }

        fn toggle_background_loop(&mut self) {
            self.audio.toggle_background_loop();
        }

        fn play(&mut self, effect: SoundEffect) {
            self.audio.play(effect);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        host: BrowserHost,
        renderer: CanvasRenderer,
    }

    fn run_frame(game: &Rc<RefCell<Game>>, token: TimerToken) {
        let mut g = game.borrow_mut();
        let Game {
            session,
            host,
            renderer,
        } = &mut *g;

        session.on_frame(token, host, renderer);

        match renderer.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                renderer.resize(renderer.size.0, renderer.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    #[derive(Debug, thiserror::Error)]
    pub enum StartupError {
        #[error("{0}")]
        Dom(&'static str),
        #[error(transparent)]
        Render(#[from] RenderError),
    }

    impl From<StartupError> for JsValue {
        fn from(e: StartupError) -> Self {
            JsValue::from_str(&e.to_string())
        }
    }

    pub async fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Center Siege starting...");

        let window = web_sys::window().ok_or(StartupError::Dom("no window"))?;
        let document = window.document().ok_or(StartupError::Dom("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::Dom("no #canvas element"))?
            .dyn_into()
            .map_err(|_| StartupError::Dom("#canvas is not a canvas"))?;

        // Backbuffer in device pixels, game in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);
        let viewport = Viewport::new(client_w as f32, client_h as f32);

        let tuning = Tuning::load_from_page();
        let audio_levels = tuning.audio;
        let seed = js_sys::Date::now() as u64;
        log::info!("Viewport {}x{}, seed {}", client_w, client_h, seed);

        let renderer = CanvasRenderer::from_canvas(canvas.clone(), viewport).await?;

        let game = Rc::new_cyclic(|weak| {
            RefCell::new(Game {
                session: Session::new(viewport, tuning, seed),
                host: BrowserHost {
                    game: weak.clone(),
                    frame: FrameSlot::new(),
                    intervals: Vec::new(),
                    hud: DomHud::new(),
                    audio: AudioManager::new(audio_levels),
                },
                renderer,
            })
        });

        setup_input_handlers(&canvas, &document, &game);

        log::info!("Center Siege ready");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        document: &web_sys::Document,
        game: &Rc<RefCell<Game>>,
    ) {
        // Click to fire toward the cursor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().session.fire(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start / restart
        if let Some(btn) = document.get_element_by_id("startGameBtn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the click from also firing on the canvas
                event.stop_propagation();
                let mut g = game.borrow_mut();
                let Game { session, host, .. } = &mut *g;
                session.start(host);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #startGameBtn - the game cannot be started");
        }

        // Music on/off
        if let Some(btn) = document.get_element_by_id("musicControl") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut g = game.borrow_mut();
                let Game { session, host, .. } = &mut *g;
                session.toggle_music(host);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await.map_err(|e| {
        log::error!("Startup failed: {}", e);
        JsValue::from(e)
    })
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autoplay: fire at the nearest enemy every few frames
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), center_siege::tuning::TuningError> {
    use center_siege::platform::headless::{HeadlessHost, NullSurface};
    use center_siege::sim::GamePhase;
    use center_siege::{Session, Tuning, Viewport, distance};

    const FIRE_EVERY: u64 = 8;
    const FRAME_CAP: u64 = 60 * 60 * 5;

    env_logger::init();
    log::info!("Center Siege (native autoplay) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load_file(std::path::Path::new(&path))?,
        None => Tuning::default(),
    };
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut host = HeadlessHost::new();
    let mut surface = NullSurface;
    let mut session = Session::new(Viewport::new(800.0, 600.0), tuning, seed);
    session.start(&mut host);

    let mut frames = 0;
    while frames < FRAME_CAP && host.run_frame(&mut session, &mut surface) {
        frames += 1;
        if frames % FIRE_EVERY == 0 {
            let center = session.state().player.pos;
            let target = session
                .state()
                .enemies
                .iter()
                .min_by(|a, b| distance(a.pos, center).total_cmp(&distance(b.pos, center)))
                .map(|e| e.pos);
            if let Some(target) = target {
                session.fire(target);
            }
        }
    }

    let outcome = match session.phase() {
        GamePhase::Ended => "overrun",
        _ => "survived",
    };
    log::info!(
        "Autoplay {} after {} frames ({:.1}s), score {}",
        outcome,
        frames,
        host.now_ms() as f64 / 1000.0,
        session.score()
    );
    println!("{} {}", outcome, session.score());
    Ok(())
}
