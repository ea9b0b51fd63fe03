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

//! The setup → play → result flow.
//!
//! A [`Session`] owns everything a drill needs: the card set, the unplayed
//! pool, the playback controller, and the pending confirmation. Front ends
//! call the intent methods (`start`, `next`, `replay`, `end`, ...) and render
//! [`Session::view`].

use serde::Serialize;

use crate::config::DrillConfig;
use crate::confirm::ConfirmPrompt;
use crate::confirm::DestructiveAction;
use crate::confirm::Gate;
use crate::confirm::GatePolicy;
use crate::dataset::CardSet;
use crate::error::Fallible;
use crate::error::fail;
use crate::playback::Narrator;
use crate::playback::PlaybackController;
use crate::playback::PlaybackEvent;
use crate::playback::PlaybackState;
use crate::playback::Scheduler;
use crate::rng::TinyRng;
use crate::sequencer::DeckSequencer;
use crate::types::card::Card;
use crate::types::range::CardRange;
use crate::types::range::RangeError;
use crate::types::range::RangeInput;
use crate::types::settings::PlaybackSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Setup,
    Play,
    Result,
}

/// Shown on the result screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub completed: usize,
    pub remaining: usize,
    pub total: usize,
}

/// Everything a front end needs to draw the current screen.
#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    pub card: Option<Card>,
    pub remaining: usize,
    pub total: usize,
    pub range: Option<CardRange>,
    pub summary: Option<Summary>,
    pub prompt: Option<ConfirmPrompt>,
    pub range_error: Option<String>,
    pub settings: PlaybackSettings,
    pub playback: PlaybackState,
}

pub struct Session<N, S> {
    cards: CardSet,
    gates: GatePolicy,
    settings: PlaybackSettings,
    playback: PlaybackController<N, S>,
    rng: TinyRng,
    screen: Screen,
    range: Option<CardRange>,
    deck: Option<DeckSequencer>,
    current: Option<Card>,
    summary: Option<Summary>,
    pending: Option<DestructiveAction>,
    range_error: Option<RangeError>,
}

impl<N: Narrator, S: Scheduler> Session<N, S> {
    pub fn new(
        cards: CardSet,
        config: &DrillConfig,
        narrator: N,
        scheduler: S,
        rng: TinyRng,
    ) -> Self {
        let settings = config.playback.normalized();
        Self {
            cards,
            gates: config.confirm,
            settings,
            playback: PlaybackController::new(narrator, scheduler, settings),
            rng,
            screen: Screen::Setup,
            range: None,
            deck: None,
            current: None,
            summary: None,
            pending: None,
            range_error: None,
        }
    }

    /// Validate the range and begin drilling. On a bad range the error is
    /// also kept for [`Session::view`] until the next input change.
    pub fn start(
        &mut self,
        input: RangeInput,
        settings: PlaybackSettings,
    ) -> Result<(), RangeError> {
        let range = match input.validate() {
            Ok(range) => range,
            Err(e) => {
                self.range_error = Some(e);
                return Err(e);
            }
        };
        self.range_error = None;
        self.set_settings(settings);
        self.range = Some(range);
        self.deck = Some(DeckSequencer::initialize(range, &mut self.rng));
        self.summary = None;
        self.pending = None;
        self.screen = Screen::Play;
        log::info!(
            "Session started: range {range}, interval {}s, repeat {}",
            self.settings.interval,
            self.settings.repeat
        );
        self.show_next();
        Ok(())
    }

    /// The user edited the range inputs.
    pub fn clear_range_error(&mut self) {
        self.range_error = None;
    }

    /// Skip to the next card, or to the result screen when none are left.
    pub fn next(&mut self) -> Fallible<()> {
        self.require_play()?;
        self.require_no_prompt()?;
        self.playback.stop();
        self.show_next();
        Ok(())
    }

    /// Read the current card once more.
    pub fn replay(&mut self) -> Fallible<()> {
        self.require_play()?;
        self.require_no_prompt()?;
        match &self.current {
            Some(card) => {
                self.playback.replay(card);
                Ok(())
            }
            None => fail("no card to replay"),
        }
    }

    pub fn end(&mut self) -> Fallible<Gate> {
        self.require_play()?;
        Ok(self.request(DestructiveAction::End))
    }

    pub fn reset_same_range(&mut self) -> Fallible<Gate> {
        if self.range.is_none() || self.screen == Screen::Setup {
            return fail("no range to reset");
        }
        Ok(self.request(DestructiveAction::ResetSameRange))
    }

    pub fn reset_all(&mut self) -> Fallible<Gate> {
        if self.screen == Screen::Setup {
            return fail("already at setup");
        }
        Ok(self.request(DestructiveAction::ResetAll))
    }

    /// Run the action waiting for confirmation.
    pub fn confirm(&mut self) -> Fallible<()> {
        match self.pending.take() {
            Some(action) => {
                self.execute(action);
                Ok(())
            }
            None => fail("nothing to confirm"),
        }
    }

    /// Dismiss the confirmation. Playback stays stopped.
    pub fn cancel_confirmation(&mut self) {
        self.pending = None;
    }

    /// Change the speech rate mid-session. Allowed while a prompt is open:
    /// playback is stopped then, and the rate applies to the next reading.
    pub fn set_rate(&mut self, rate: f64) {
        self.set_settings(self.settings.with_rate(rate));
    }

    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings.normalized();
        self.playback.set_settings(self.settings);
    }

    /// Feed back a signal from the narrator or scheduler.
    pub fn handle_event(&mut self, event: PlaybackEvent) -> bool {
        self.playback.handle(event)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    pub fn remaining(&self) -> usize {
        self.deck.as_ref().map_or(0, DeckSequencer::remaining)
    }

    pub fn total(&self) -> usize {
        self.range.map_or(0, |range| range.len())
    }

    pub fn summary(&self) -> Option<Summary> {
        self.summary
    }

    pub fn pending_prompt(&self) -> Option<ConfirmPrompt> {
        self.pending.map(DestructiveAction::prompt)
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.settings
    }

    pub fn range(&self) -> Option<CardRange> {
        self.range
    }

    pub fn cards(&self) -> &CardSet {
        &self.cards
    }

    pub fn playback(&self) -> &PlaybackController<N, S> {
        &self.playback
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            screen: self.screen,
            card: self.current.clone(),
            remaining: self.remaining(),
            total: self.total(),
            range: self.range,
            summary: self.summary,
            prompt: self.pending_prompt(),
            range_error: self.range_error.map(|e| e.to_string()),
            settings: self.settings,
            playback: self.playback.state(),
        }
    }

    fn require_play(&self) -> Fallible<()> {
        if self.screen == Screen::Play {
            Ok(())
        } else {
            fail("no drill in progress")
        }
    }

    fn require_no_prompt(&self) -> Fallible<()> {
        match self.pending {
            Some(_) => fail("answer the confirmation first"),
            None => Ok(()),
        }
    }

    fn request(&mut self, action: DestructiveAction) -> Gate {
        if self.gates.requires_confirmation(action) {
            self.playback.stop();
            self.pending = Some(action);
            Gate::AwaitingConfirmation(action.prompt())
        } else {
            self.execute(action);
            Gate::Executed
        }
    }

    fn execute(&mut self, action: DestructiveAction) {
        log::debug!("Executing {action:?}");
        match action {
            DestructiveAction::End => self.finish(),
            DestructiveAction::ResetSameRange => {
                self.playback.stop();
                if let Some(deck) = self.deck.as_mut() {
                    deck.reset_within_range(&mut self.rng);
                } else if let Some(range) = self.range {
                    self.deck = Some(DeckSequencer::initialize(range, &mut self.rng));
                }
                self.summary = None;
                self.screen = Screen::Play;
                self.show_next();
            }
            DestructiveAction::ResetAll => {
                self.playback.stop();
                self.deck = None;
                self.current = None;
                self.summary = None;
                self.screen = Screen::Setup;
            }
        }
    }

    /// Draw until a card is found, or finish when the pool runs dry.
    fn show_next(&mut self) {
        loop {
            let Some(id) = self.deck.as_mut().and_then(DeckSequencer::draw) else {
                self.finish();
                return;
            };
            match self.cards.get(id) {
                Some(card) => {
                    let card = card.clone();
                    self.playback.play(&card, self.settings.repeat);
                    self.current = Some(card);
                    return;
                }
                None => log::warn!("No card with id {id}; skipping"),
            }
        }
    }

    fn finish(&mut self) {
        self.playback.stop();
        let total = self.total();
        let remaining = self.remaining();
        let summary = Summary {
            completed: total - remaining,
            remaining,
            total,
        };
        log::info!(
            "Session finished: {}/{} read",
            summary.completed,
            summary.total
        );
        self.summary = Some(summary);
        self.current = None;
        self.screen = Screen::Result;
    }
}
