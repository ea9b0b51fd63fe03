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

//! Recording doubles for the narration seams.

use std::time::Duration;

use crate::error::Fallible;
use crate::error::fail;
use crate::playback::Generation;
use crate::playback::Narrator;
use crate::playback::Scheduler;
use crate::playback::Utterance;

#[derive(Default)]
pub struct RecordingNarrator {
    pub spoken: Vec<(Utterance, Generation)>,
    pub cancels: usize,
    /// Refuse every submission.
    pub reject: bool,
}

impl Narrator for RecordingNarrator {
    fn speak(&mut self, utterance: &Utterance, generation: Generation) -> Fallible<()> {
        if self.reject {
            return fail("speech engine unavailable");
        }
        self.spoken.push((utterance.clone(), generation));
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

#[derive(Default)]
pub struct ManualScheduler {
    pub scheduled: Vec<(Duration, Generation)>,
    pub cancels: usize,
    /// Refuse every wake-up.
    pub reject: bool,
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, generation: Generation) -> Fallible<()> {
        if self.reject {
            return fail("no timers");
        }
        self.scheduled.push((delay, generation));
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}
