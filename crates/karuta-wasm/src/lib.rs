// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! WASM bindings for karuta - runs the card reader in the browser.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::console;

use karuta_core::config::DrillConfig;
use karuta_core::dataset::CardSet;
use karuta_core::error::Fallible;
use karuta_core::playback::PlaybackEvent;
use karuta_core::rng::TinyRng;
use karuta_core::session::Session;
use karuta_core::types::range::RangeInput;
use karuta_core::types::settings::PlaybackSettings;

mod speech;

use speech::{EventSink, WebNarrator, WebScheduler};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"karuta WASM initialized".into());
}

struct Inner {
    session: Session<WebNarrator, WebScheduler>,
    /// Called after every state change so the page can redraw.
    on_change: Option<js_sys::Function>,
}

/// The drill session, driven from JavaScript.
#[wasm_bindgen]
pub struct KarutaApp {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl KarutaApp {
    /// Create the app from the dataset and the drill configuration, both as
    /// JSON text. Fails if either cannot be parsed.
    #[wasm_bindgen(constructor)]
    pub fn new(cards_json: &str, config_json: &str) -> Result<KarutaApp, JsValue> {
        let cards = CardSet::from_json(cards_json).map_err(to_js)?;
        let config = DrillConfig::from_json(config_json).map_err(to_js)?;
        console::log_1(&format!("Loaded {} cards", cards.len()).into());
        let seed = js_sys::Date::now() as u64;
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<Inner>>| {
            let sink = event_sink(weak.clone());
            RefCell::new(Inner {
                session: Session::new(
                    cards,
                    &config,
                    WebNarrator::new(sink.clone()),
                    WebScheduler::new(sink),
                    TinyRng::from_seed(seed),
                ),
                on_change: None,
            })
        });
        Ok(Self { inner })
    }

    /// Register the redraw callback.
    #[wasm_bindgen]
    pub fn set_on_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }

    /// Start a drill. Returns false if the range was rejected; the message
    /// is in the view's `range_error`.
    #[wasm_bindgen]
    pub fn start(&self, start: &str, end: &str, interval: u32, repeat: u32, rate: f64) -> bool {
        let settings = PlaybackSettings::new(interval, repeat, rate);
        let started = self
            .inner
            .borrow_mut()
            .session
            .start(RangeInput::parse(start, end), settings)
            .is_ok();
        notify(&self.inner);
        started
    }

    #[wasm_bindgen]
    pub fn clear_range_error(&self) {
        self.inner.borrow_mut().session.clear_range_error();
        notify(&self.inner);
    }

    #[wasm_bindgen]
    pub fn next(&self) -> Result<(), JsValue> {
        self.apply(|session| session.next())
    }

    #[wasm_bindgen]
    pub fn replay(&self) -> Result<(), JsValue> {
        self.apply(|session| session.replay())
    }

    #[wasm_bindgen]
    pub fn end(&self) -> Result<(), JsValue> {
        self.apply(|session| session.end().map(drop))
    }

    #[wasm_bindgen]
    pub fn reset_same_range(&self) -> Result<(), JsValue> {
        self.apply(|session| session.reset_same_range().map(drop))
    }

    #[wasm_bindgen]
    pub fn reset_all(&self) -> Result<(), JsValue> {
        self.apply(|session| session.reset_all().map(drop))
    }

    #[wasm_bindgen]
    pub fn confirm(&self) -> Result<(), JsValue> {
        self.apply(|session| session.confirm())
    }

    #[wasm_bindgen]
    pub fn cancel_confirmation(&self) {
        self.inner.borrow_mut().session.cancel_confirmation();
        notify(&self.inner);
    }

    /// Rate slider on the play screen.
    #[wasm_bindgen]
    pub fn set_rate(&self, rate: f64) {
        self.inner.borrow_mut().session.set_rate(rate);
        notify(&self.inner);
    }

    /// The current screen as JSON.
    #[wasm_bindgen]
    pub fn view_json(&self) -> Result<String, JsValue> {
        let view = self.inner.borrow().session.view();
        serde_json::to_string(&view)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize view: {}", e)))
    }

    /// Number of cards in the dataset.
    #[wasm_bindgen]
    pub fn card_count(&self) -> usize {
        self.inner.borrow().session.cards().len()
    }

    fn apply(
        &self,
        action: impl FnOnce(&mut Session<WebNarrator, WebScheduler>) -> Fallible<()>,
    ) -> Result<(), JsValue> {
        let result = action(&mut self.inner.borrow_mut().session);
        notify(&self.inner);
        result.map_err(to_js)
    }
}

/// Speech and timer callbacks run outside any session call, on the
/// microtask queue, so the session is never borrowed twice.
fn event_sink(weak: Weak<RefCell<Inner>>) -> EventSink {
    Rc::new(move |event: PlaybackEvent| {
        let weak = weak.clone();
        spawn_local(async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let applied = inner.borrow_mut().session.handle_event(event);
            if applied {
                notify(&inner);
            }
        });
    })
}

fn notify(inner: &Rc<RefCell<Inner>>) {
    let callback = inner.borrow().on_change.clone();
    if let Some(callback) = callback {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            console::error_2(&"Redraw failed:".into(), &e);
        }
    }
}

fn to_js(e: karuta_core::error::ErrorReport) -> JsValue {
    JsValue::from_str(e.message())
}
