mod engine;
mod scene;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlCanvasElement, MouseEvent, Request, RequestInit, RequestMode, Response,
    WebGlRenderingContext, WheelEvent,
};

use crate::engine::renderer::Renderer;
use crate::scene::content::TextDictionary;
use crate::scene::SolarScene;

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

struct App {
    scene: SolarScene,
    listeners: Vec<ListenerHandle>,
    animation: AnimationLoop,
}

struct ListenerHandle {
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// The render loop plus the state needed to stop scheduling further ticks.
struct AnimationLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    _tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationLoop {
    fn start() -> Result<Self, JsValue> {
        let raf_id = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));

        let f = Rc::new(RefCell::new(None));
        let g = f.clone();
        let raf_id_for_tick = raf_id.clone();
        let running_for_tick = running.clone();

        *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !running_for_tick.get() {
                return;
            }
            APP.with(|app| {
                if let Some(app) = app.borrow_mut().as_mut() {
                    let now_ms = js_sys::Date::now();
                    app.scene.update(now_ms);
                    app.scene.render();
                }
            });
            if running_for_tick.get() {
                if let Ok(id) = request_animation_frame(f.borrow().as_ref().unwrap()) {
                    raf_id_for_tick.set(Some(id));
                }
            }
        }) as Box<dyn FnMut()>));

        let id = request_animation_frame(g.borrow().as_ref().unwrap())?;
        raf_id.set(Some(id));

        Ok(AnimationLoop {
            raf_id,
            running,
            _tick: g,
        })
    }

    fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

#[wasm_bindgen]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;

    // Built-in portfolio copy, optionally replaced by hosted content.
    let mut content = TextDictionary::builtin();
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let content_request = Request::new_with_str_and_init("/assets/content.json", &opts)?;
    let content_resp = JsFuture::from(window.fetch_with_request(&content_request)).await;
    if let Ok(resp_value) = content_resp {
        if let Ok(resp) = resp_value.dyn_into::<Response>() {
            if resp.ok() {
                if let Ok(json_promise) = resp.json() {
                    if let Ok(json) = JsFuture::from(json_promise).await {
                        match serde_wasm_bindgen::from_value::<TextDictionary>(json) {
                            Ok(dictionary) if !dictionary.is_empty() => {
                                log::info!("using hosted content ({} sections)", dictionary.len());
                                content = dictionary;
                            }
                            _ => log::info!("hosted content unusable, keeping built-in copy"),
                        }
                    }
                }
            }
        }
    }

    let width = window.inner_width()?.as_f64().ok_or("No width")? as f32;
    let height = window.inner_height()?.as_f64().ok_or("No height")? as f32;
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let star_seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let mut solar_scene = SolarScene::new(renderer, content, width, height, star_seed)?;
    solar_scene.handle_resize(width, height);

    // Input handling
    let mut listeners = Vec::new();
    add_listener(&window, &mut listeners, "click", Box::new(|event| {
        if let Ok(mouse) = event.dyn_into::<MouseEvent>() {
            APP.with(|app| {
                if let Some(app) = app.borrow_mut().as_mut() {
                    app.scene.handle_click(mouse.client_x() as f32, mouse.client_y() as f32);
                    update_popup(&app.scene);
                }
            });
        }
    }))?;
    add_listener(&window, &mut listeners, "mousedown", Box::new(|event| {
        if let Ok(mouse) = event.dyn_into::<MouseEvent>() {
            APP.with(|app| {
                if let Some(app) = app.borrow_mut().as_mut() {
                    app.scene.handle_mouse_down(mouse.client_x(), mouse.client_y());
                }
            });
        }
    }))?;
    add_listener(&window, &mut listeners, "mousemove", Box::new(|event| {
        if let Ok(mouse) = event.dyn_into::<MouseEvent>() {
            APP.with(|app| {
                if let Some(app) = app.borrow_mut().as_mut() {
                    app.scene.handle_mouse_move(mouse.client_x(), mouse.client_y());
                }
            });
        }
    }))?;
    add_listener(&window, &mut listeners, "mouseup", Box::new(|_event| {
        APP.with(|app| {
            if let Some(app) = app.borrow_mut().as_mut() {
                app.scene.handle_mouse_up();
            }
        });
    }))?;
    add_listener(&window, &mut listeners, "wheel", Box::new(|event| {
        if let Ok(wheel) = event.dyn_into::<WheelEvent>() {
            wheel.prevent_default();
            APP.with(|app| {
                if let Some(app) = app.borrow_mut().as_mut() {
                    app.scene.handle_wheel(wheel.delta_y() as f32);
                }
            });
        }
    }))?;
    add_listener(&window, &mut listeners, "resize", Box::new(|_event| {
        let (width, height) = match window_size() {
            Some(pair) => pair,
            None => return,
        };
        APP.with(|app| {
            if let Some(app) = app.borrow_mut().as_mut() {
                if let Some(canvas) = app.scene.canvas() {
                    canvas.set_width(width as u32);
                    canvas.set_height(height as u32);
                }
                app.scene.handle_resize(width, height);
            }
        });
    }))?;

    let animation = AnimationLoop::start()?;

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            scene: solar_scene,
            listeners,
            animation,
        });
    });

    log::info!("solar portfolio running");
    Ok(())
}

/// Stops the animation loop, detaches every listener registered by `start`,
/// and cancels in-flight texture downloads. Events arriving afterwards are
/// no-ops.
#[wasm_bindgen]
pub fn teardown() {
    APP.with(|cell| {
        if let Some(mut app) = cell.borrow_mut().take() {
            app.animation.stop();
            if let Some(window) = web_sys::window() {
                for listener in &app.listeners {
                    let _ = window.remove_event_listener_with_callback(
                        listener.event,
                        listener.closure.as_ref().unchecked_ref(),
                    );
                }
            }
            app.scene.cancel_pending_loads();
            log::info!("solar portfolio torn down");
        }
    });
}

/// Host-forwardable click, for pages that capture pointer events themselves.
#[wasm_bindgen]
pub fn pointer_click(x: f32, y: f32) {
    APP.with(|app| {
        if let Some(app) = app.borrow_mut().as_mut() {
            app.scene.handle_click(x, y);
            update_popup(&app.scene);
        }
    });
}

#[wasm_bindgen]
pub fn viewport_resized(width: f32, height: f32) {
    APP.with(|app| {
        if let Some(app) = app.borrow_mut().as_mut() {
            if let Some(canvas) = app.scene.canvas() {
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);
            }
            app.scene.handle_resize(width, height);
        }
    });
}

#[wasm_bindgen]
pub fn selected_section() -> Option<String> {
    APP.with(|app| {
        app.borrow()
            .as_ref()
            .and_then(|app| app.scene.selected().map(str::to_string))
    })
}

#[wasm_bindgen]
pub fn close_popup() {
    APP.with(|app| {
        if let Some(app) = app.borrow_mut().as_mut() {
            app.scene.close();
            update_popup(&app.scene);
        }
    });
}

fn add_listener(
    window: &web_sys::Window,
    listeners: &mut Vec<ListenerHandle>,
    event: &'static str,
    handler: Box<dyn FnMut(web_sys::Event)>,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(handler);
    window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    listeners.push(ListenerHandle { event, closure });
    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("No window")?
        .request_animation_frame(f.as_ref().unchecked_ref())
}

fn window_size() -> Option<(f32, f32)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

fn update_popup(scene: &SolarScene) {
    let document = match web_sys::window().and_then(|w| w.document()) {
        Some(document) => document,
        None => return,
    };
    let popup = match document.get_element_by_id("planet-info") {
        Some(element) => element,
        None => return,
    };

    match scene.selected() {
        Some(name) => {
            popup.set_attribute("style", "display: block;").ok();
            if let Some(title) = document.get_element_by_id("planet-title") {
                title.set_text_content(Some(name));
            }
            if let Some(body) = document.get_element_by_id("planet-body") {
                let prose = scene
                    .section_text(name)
                    .unwrap_or("No content for this section yet.");
                body.set_text_content(Some(prose));
            }
        }
        None => {
            popup.set_attribute("style", "display: none;").ok();
        }
    }
}
