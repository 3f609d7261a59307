//! Browser bindings
//!
//! Everything registered here is owned by a guard and released on drop:
//! the animation-frame loop is cancelled and key listeners are removed
//! with the same callbacks they were added with.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{Clipboard, ClipboardError, CopyStatus};
use crate::flow::{FlowView, Navigation, PlayFlow};
use crate::sim::MatchEvent;
use crate::tuning::Tuning;

/// Settled result of a write, tagged with the write it belongs to
type CopyOutcome = Rc<RefCell<Option<(u64, Result<(), ClipboardError>)>>>;

/// `navigator.clipboard.writeText`
///
/// The promise settles after `write_text` returns, so every write is
/// `Pending` and its result is picked up by `poll`. Results of superseded
/// writes are dropped.
#[derive(Debug, Default)]
pub struct BrowserClipboard {
    generation: u64,
    outcome: CopyOutcome,
}

impl Clipboard for BrowserClipboard {
    fn write_text(&mut self, text: &str) -> Result<CopyStatus, ClipboardError> {
        let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
        if !window.is_secure_context() {
            return Err(ClipboardError::Unavailable);
        }
        let promise = window.navigator().clipboard().write_text(text);

        self.generation += 1;
        let generation = self.generation;
        self.outcome.borrow_mut().take();
        let outcome = self.outcome.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = JsFuture::from(promise).await.map(|_| ()).map_err(|e| {
                log::warn!("Clipboard write rejected: {:?}", e);
                ClipboardError::Rejected(e.as_string().unwrap_or_else(|| format!("{e:?}")))
            });
            *outcome.borrow_mut() = Some((generation, result));
        });
        Ok(CopyStatus::Pending)
    }

    fn poll(&mut self) -> Option<Result<(), ClipboardError>> {
        match self.outcome.borrow_mut().take() {
            Some((generation, result)) if generation == self.generation => Some(result),
            _ => None,
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` loop that stops when dropped
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let handle = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next_callback = callback.clone();
        let next_handle = handle.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            on_frame(time);
            // Gone once the loop has been dropped
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(cb) = next_callback.borrow().as_ref() {
                next_handle.set(
                    window
                        .request_animation_frame(cb.as_ref().unchecked_ref())
                        .ok(),
                );
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            handle.set(Some(
                window.request_animation_frame(cb.as_ref().unchecked_ref())?,
            ));
        }

        Ok(Self { handle, callback })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(window), Some(id)) = (web_sys::window(), self.handle.take()) {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}

/// A key listener removed on drop
pub struct KeyListener {
    target: web_sys::EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
}

impl KeyListener {
    pub fn new(
        target: web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::KeyboardEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Payload handed to the shell's render callback every frame
#[derive(Serialize)]
struct RenderFrame {
    view: FlowView,
    events: Vec<MatchEvent>,
    navigation: Option<Navigation>,
}

type SharedFlow = Rc<RefCell<PlayFlow<BrowserClipboard>>>;

fn on_key_down(flow: &SharedFlow, event: &web_sys::KeyboardEvent) {
    let mut flow = flow.borrow_mut();
    match event.key().as_str() {
        "ArrowUp" | "w" | "W" => flow.move_player_up(),
        "ArrowDown" | "s" | "S" => flow.move_player_down(),
        " " | "Enter" | "a" | "A" | "z" | "Z" => flow.trigger_primary(),
        "Escape" | "Backspace" | "b" | "B" | "x" | "X" => flow.advance_phase(),
        _ => return,
    }
    event.prevent_default();
}

fn on_key_up(flow: &SharedFlow, event: &web_sys::KeyboardEvent) {
    if matches!(
        event.key().as_str(),
        "ArrowUp" | "ArrowDown" | "w" | "W" | "s" | "S"
    ) {
        flow.borrow_mut().stop_player_move();
    }
}

/// One play page, exported to the presentation shell
///
/// Reads the invite from `location.search`, drives the flow from
/// `requestAnimationFrame`, and calls `render(json)` after every frame.
#[wasm_bindgen]
pub struct PlaySession {
    flow: SharedFlow,
    _frames: FrameLoop,
    _keys: Vec<KeyListener>,
}

#[wasm_bindgen]
impl PlaySession {
    #[wasm_bindgen(constructor)]
    pub fn new(render: js_sys::Function) -> Result<PlaySession, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let query = window.location().search().unwrap_or_default();
        let seed = js_sys::Date::now() as u64;

        let flow: SharedFlow = Rc::new(RefCell::new(PlayFlow::from_query(
            &query,
            Tuning::load(),
            BrowserClipboard::default(),
            seed,
        )));

        let frames = {
            let flow = flow.clone();
            FrameLoop::start(move |time| {
                let frame = {
                    let mut flow = flow.borrow_mut();
                    flow.frame(time);
                    RenderFrame {
                        view: flow.view(),
                        events: flow.take_events(),
                        navigation: flow.take_navigation(),
                    }
                };
                match serde_json::to_string(&frame) {
                    Ok(json) => {
                        if let Err(e) = render.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                            log::warn!("Render callback failed: {:?}", e);
                        }
                    }
                    Err(e) => log::warn!("Failed to serialize frame: {}", e),
                }
            })?
        };

        let target: web_sys::EventTarget = window.into();
        let keys = vec![
            {
                let flow = flow.clone();
                KeyListener::new(target.clone(), "keydown", move |e| on_key_down(&flow, &e))?
            },
            {
                let flow = flow.clone();
                KeyListener::new(target, "keyup", move |e| on_key_up(&flow, &e))?
            },
        ];

        log::info!("Play session attached (seed {})", seed);
        Ok(PlaySession {
            flow,
            _frames: frames,
            _keys: keys,
        })
    }

    // On-screen d-pad and buttons

    pub fn up(&self) {
        self.flow.borrow_mut().move_player_up();
    }

    pub fn down(&self) {
        self.flow.borrow_mut().move_player_down();
    }

    pub fn release(&self) {
        self.flow.borrow_mut().stop_player_move();
    }

    pub fn a(&self) {
        self.flow.borrow_mut().trigger_primary();
    }

    pub fn b(&self) {
        self.flow.borrow_mut().advance_phase();
    }

    #[wasm_bindgen(js_name = selectReply)]
    pub fn select_reply(&self, index: usize) {
        self.flow.borrow_mut().select_reply(index);
    }

    /// Store a (possibly partial) tuning override for the next session
    #[wasm_bindgen(js_name = saveTuning)]
    pub fn save_tuning(json: &str) -> Result<(), JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        tuning.save();
        Ok(())
    }

    /// Current view as JSON, for the first paint
    pub fn view(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.flow.borrow().view())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Drop for PlaySession {
    fn drop(&mut self) {
        self.flow.borrow_mut().shutdown();
    }
}
