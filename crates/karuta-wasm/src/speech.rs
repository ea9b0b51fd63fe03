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

//! The Web Speech API and `setTimeout` behind the playback seams.

use std::rc::Rc;
use std::time::Duration;

use karuta_core::error::{ErrorReport, Fallible, fail};
use karuta_core::playback::{Generation, Narrator, PlaybackEvent, Scheduler, Utterance};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{SpeechSynthesis, SpeechSynthesisErrorEvent, SpeechSynthesisUtterance, Window, console};

/// Where speech and timer callbacks report back to.
pub type EventSink = Rc<dyn Fn(PlaybackEvent)>;

/// Forwards the first event it is given and drops the rest.
struct OnceSink {
    sink: Option<EventSink>,
}

impl OnceSink {
    fn new(sink: EventSink) -> Self {
        Self { sink: Some(sink) }
    }

    fn send(&mut self, event: PlaybackEvent) {
        if let Some(sink) = self.sink.take() {
            sink(event);
        }
    }
}

pub struct WebNarrator {
    synth: Option<SpeechSynthesis>,
    sink: EventSink,
    /// The utterance in flight and its end/error handler.
    current: Option<(SpeechSynthesisUtterance, Closure<dyn FnMut(JsValue)>)>,
}

impl WebNarrator {
    pub fn new(sink: EventSink) -> Self {
        let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if synth.is_none() {
            console::warn_1(&"speechSynthesis is not available; cards will not be read".into());
        }
        Self {
            synth,
            sink,
            current: None,
        }
    }

    /// Detach the handler from the previous utterance before dropping it, so
    /// the browser never calls into a freed closure.
    fn release(&mut self) {
        if let Some((utterance, _handler)) = self.current.take() {
            utterance.set_onend(None);
            utterance.set_onerror(None);
        }
    }
}

impl Narrator for WebNarrator {
    fn speak(&mut self, utterance: &Utterance, generation: Generation) -> Fallible<()> {
        self.release();
        let Some(synth) = &self.synth else {
            return fail("speech synthesis is not available in this browser");
        };
        let js_utterance = SpeechSynthesisUtterance::new_with_text(&utterance.text)
            .map_err(|e| ErrorReport::new(format!("could not create utterance: {e:?}")))?;
        js_utterance.set_lang(utterance.lang);
        js_utterance.set_rate(utterance.rate as f32);

        let mut once = OnceSink::new(self.sink.clone());
        let handler = Closure::<dyn FnMut(JsValue)>::new(move |raw: JsValue| {
            let event = match raw.dyn_ref::<SpeechSynthesisErrorEvent>() {
                Some(error) => {
                    console::error_2(&"Speech error:".into(), error);
                    PlaybackEvent::Failed(generation, format!("{:?}", error.error()))
                }
                None => PlaybackEvent::Finished(generation),
            };
            once.send(event);
        });
        js_utterance.set_onend(Some(handler.as_ref().unchecked_ref()));
        js_utterance.set_onerror(Some(handler.as_ref().unchecked_ref()));

        // One utterance at a time.
        synth.cancel();
        synth.speak(&js_utterance);
        self.current = Some((js_utterance, handler));
        Ok(())
    }

    fn cancel(&mut self) {
        self.release();
        if let Some(synth) = &self.synth {
            synth.cancel();
        }
    }
}

pub struct WebScheduler {
    window: Option<Window>,
    /// Timeout handle and the callback it will run.
    pending: Option<(i32, Closure<dyn FnMut()>)>,
    sink: EventSink,
}

impl WebScheduler {
    pub fn new(sink: EventSink) -> Self {
        Self {
            window: web_sys::window(),
            pending: None,
            sink,
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, delay: Duration, generation: Generation) -> Fallible<()> {
        self.cancel();
        let Some(window) = &self.window else {
            return fail("no window to schedule the next reading on");
        };
        let mut once = OnceSink::new(self.sink.clone());
        let callback = Closure::<dyn FnMut()>::new(move || {
            once.send(PlaybackEvent::IntervalElapsed(generation));
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(|e| ErrorReport::new(format!("setTimeout failed: {e:?}")))?;
        self.pending = Some((handle, callback));
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some((handle, _callback)) = self.pending.take() {
            if let Some(window) = &self.window {
                window.clear_timeout_with_handle(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_once_sink_forwards_one_event() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = seen.clone();
        let sink: EventSink = Rc::new(move |event| record.borrow_mut().push(event));
        let mut once = OnceSink::new(sink);
        once.send(PlaybackEvent::Failed(Generation::new(2), "interrupted".to_string()));
        once.send(PlaybackEvent::Finished(Generation::new(2)));
        assert_eq!(
            *seen.borrow(),
            vec![PlaybackEvent::Failed(Generation::new(2), "interrupted".to_string())]
        );
    }
}
