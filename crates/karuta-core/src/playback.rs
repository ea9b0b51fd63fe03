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

//! Reading a card aloud a bounded number of times.
//!
//! The controller never blocks. It submits an utterance to a [`Narrator`] and
//! waits for a [`PlaybackEvent`] to come back; between repeats it asks a
//! [`Scheduler`] for a wake-up. Every run is tagged with a [`Generation`], and
//! events carrying an older generation are dropped, so a callback that fires
//! after [`PlaybackController::stop`] can never start another repeat.

use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Duration;

use serde::Serialize;

use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::settings::PlaybackSettings;

/// Language the cards are read in.
pub const LANGUAGE_TAG: &str = "ja-JP";

/// Spoken after the card text, followed by the level number.
pub const LEVEL_LABEL: &str = "大ピンチレベル";

/// Marks one playback run. Advances on every play and every stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One request to the speech engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: &'static str,
    pub rate: f64,
}

/// The speak capability. Submitting a new utterance supersedes any utterance
/// still in progress.
pub trait Narrator {
    /// Start speaking. Completion is reported later as
    /// [`PlaybackEvent::Finished`] or [`PlaybackEvent::Failed`] carrying
    /// `generation`.
    fn speak(&mut self, utterance: &Utterance, generation: Generation) -> Fallible<()>;

    /// Silence whatever is being spoken.
    fn cancel(&mut self);
}

/// Delayed wake-ups between repeats.
pub trait Scheduler {
    /// Report [`PlaybackEvent::IntervalElapsed`] carrying `generation` after
    /// `delay`. An error means no wake-up will come.
    fn schedule(&mut self, delay: Duration, generation: Generation) -> Fallible<()>;

    /// Drop any pending wake-up.
    fn cancel(&mut self);
}

/// Signals coming back from the narrator and the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    Finished(Generation),
    Failed(Generation, String),
    IntervalElapsed(Generation),
}

impl PlaybackEvent {
    pub fn generation(&self) -> Generation {
        match self {
            PlaybackEvent::Finished(generation)
            | PlaybackEvent::Failed(generation, _)
            | PlaybackEvent::IntervalElapsed(generation) => *generation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Speaking,
    AwaitingInterval,
}

/// The text actually spoken for a card. Whitespace in the content is only
/// layout and would make the engine pause mid-phrase, so it is removed.
pub fn narration_text(card: &Card) -> String {
    let content: String = card.content().split_whitespace().collect();
    format!("{content}。{LEVEL_LABEL}{}", card.level())
}

struct Run {
    text: String,
    times: u32,
    count: u32,
}

pub struct PlaybackController<N, S> {
    narrator: N,
    scheduler: S,
    settings: PlaybackSettings,
    state: PlaybackState,
    generation: Generation,
    run: Option<Run>,
}

impl<N: Narrator, S: Scheduler> PlaybackController<N, S> {
    pub fn new(narrator: N, scheduler: S, settings: PlaybackSettings) -> Self {
        Self {
            narrator,
            scheduler,
            settings: settings.normalized(),
            state: PlaybackState::Idle,
            generation: Generation::default(),
            run: None,
        }
    }

    /// Read `card` `times` times. Anything already playing is stopped first.
    pub fn play(&mut self, card: &Card, times: u32) {
        self.stop();
        self.generation = self.generation.next();
        self.run = Some(Run {
            text: narration_text(card),
            times: times.max(1),
            count: 0,
        });
        self.state = PlaybackState::Speaking;
        log::debug!("Playing card {} x{} ({})", card.id(), times, self.generation);
        self.speak_current();
    }

    /// Read `card` exactly once, whatever the repeat setting.
    pub fn replay(&mut self, card: &Card) {
        self.stop();
        self.play(card, 1);
    }

    /// Cancel the current utterance and any pending repeat. Does nothing when
    /// already idle.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }
        self.generation = self.generation.next();
        self.narrator.cancel();
        self.scheduler.cancel();
        self.finish();
    }

    /// Apply an event. Returns false when the event was stale or did not fit
    /// the current state.
    pub fn handle(&mut self, event: PlaybackEvent) -> bool {
        if event.generation() != self.generation {
            log::debug!(
                "Ignoring stale event {:?} (current {})",
                event,
                self.generation
            );
            return false;
        }
        match (event, self.state) {
            (PlaybackEvent::Finished(_), PlaybackState::Speaking) => {
                let Some(run) = self.run.as_mut() else {
                    self.finish();
                    return true;
                };
                run.count += 1;
                if run.count < run.times {
                    self.state = PlaybackState::AwaitingInterval;
                    let delay = self.settings.interval_duration();
                    if let Err(e) = self.scheduler.schedule(delay, self.generation) {
                        log::error!("Could not schedule the next reading: {e}");
                        self.finish();
                    }
                } else {
                    self.finish();
                }
            }
            (PlaybackEvent::Failed(_, reason), PlaybackState::Speaking) => {
                log::error!("Narration failed: {reason}");
                self.finish();
            }
            (PlaybackEvent::IntervalElapsed(_), PlaybackState::AwaitingInterval) => {
                self.state = PlaybackState::Speaking;
                self.speak_current();
            }
            (event, state) => {
                log::debug!("Ignoring {event:?} while {state:?}");
                return false;
            }
        }
        true
    }

    /// New settings are picked up by the next repeat.
    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings.normalized();
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.settings
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == PlaybackState::Speaking
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Readings completed in the current run.
    pub fn repeat_count(&self) -> u32 {
        self.run.as_ref().map_or(0, |run| run.count)
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    pub fn narrator_mut(&mut self) -> &mut N {
        &mut self.narrator
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn speak_current(&mut self) {
        let Some(run) = &self.run else {
            return;
        };
        let utterance = Utterance {
            text: run.text.clone(),
            lang: LANGUAGE_TAG,
            rate: self.settings.rate,
        };
        if let Err(e) = self.narrator.speak(&utterance, self.generation) {
            log::error!("Could not submit utterance: {e}");
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.state = PlaybackState::Idle;
        self.run = None;
    }
}
