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

//! Narration and timers for the terminal front end.
//!
//! Both run as spawned tasks that report back over a channel; the session
//! itself stays on the task that reads stdin.

use std::process::Stdio;
use std::time::Duration;

use karuta_core::error::ErrorReport;
use karuta_core::error::Fallible;
use karuta_core::error::fail;
use karuta_core::playback::Generation;
use karuta_core::playback::Narrator;
use karuta_core::playback::PlaybackEvent;
use karuta_core::playback::Scheduler;
use karuta_core::playback::Utterance;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// An external program that speaks its last argument and exits.
#[derive(Clone, Debug, PartialEq)]
pub struct TtsCommand {
    program: String,
    args: Vec<String>,
}

impl TtsCommand {
    pub fn parse(line: &str) -> Fallible<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        match words.next() {
            Some(program) => Ok(Self {
                program,
                args: words.collect(),
            }),
            None => fail("the TTS command is empty"),
        }
    }

    /// Arguments for one utterance: `{rate}` and `{lang}` filled in, the text
    /// last.
    pub fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let rate = format!("{:.1}", utterance.rate);
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{rate}", &rate).replace("{lang}", utterance.lang))
            .collect();
        args.push(utterance.text.clone());
        args
    }
}

pub struct CommandNarrator {
    command: Option<TtsCommand>,
    events: UnboundedSender<PlaybackEvent>,
    task: Option<JoinHandle<()>>,
}

impl CommandNarrator {
    /// Without a command, utterances are printed and finish at once.
    pub fn new(command: Option<TtsCommand>, events: UnboundedSender<PlaybackEvent>) -> Self {
        Self {
            command,
            events,
            task: None,
        }
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, utterance: &Utterance, generation: Generation) -> Fallible<()> {
        self.cancel();
        println!("  >> {}", utterance.text);
        let Some(command) = &self.command else {
            let _ = self.events.send(PlaybackEvent::Finished(generation));
            return Ok(());
        };
        let mut child = Command::new(&command.program)
            .args(command.args_for(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ErrorReport::new(format!("could not run {}: {e}", command.program)))?;
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            let event = match child.wait().await {
                Ok(status) if status.success() => PlaybackEvent::Finished(generation),
                Ok(status) => PlaybackEvent::Failed(generation, format!("TTS command {status}")),
                Err(e) => PlaybackEvent::Failed(generation, e.to_string()),
            };
            let _ = events.send(event);
        }));
        Ok(())
    }

    /// Aborting the task drops the child, which kills it.
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct TokioScheduler {
    events: UnboundedSender<PlaybackEvent>,
    task: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events: UnboundedSender<PlaybackEvent>) -> Self {
        Self { events, task: None }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, generation: Generation) -> Fallible<()> {
        self.cancel();
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = events.send(PlaybackEvent::IntervalElapsed(generation));
        }));
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::time::timeout;

    use super::*;

    fn utterance() -> Utterance {
        Utterance {
            text: "駅で迷子。大ピンチレベル2".to_string(),
            lang: "ja-JP",
            rate: 1.25,
        }
    }

    #[test]
    fn test_parse_command() -> Fallible<()> {
        let command = TtsCommand::parse("espeak-ng -v {lang} -s {rate}")?;
        assert_eq!(
            command.args_for(&utterance()),
            vec!["-v", "ja-JP", "-s", "1.2", "駅で迷子。大ピンチレベル2"]
        );
        assert!(TtsCommand::parse("   ").is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_print_only_finishes_at_once() -> Fallible<()> {
        let (tx, mut rx) = unbounded_channel();
        let mut narrator = CommandNarrator::new(None, tx);
        narrator.speak(&utterance(), Generation::new(4))?;
        assert_eq!(rx.recv().await, Some(PlaybackEvent::Finished(Generation::new(4))));
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_exit_status() -> Fallible<()> {
        let (tx, mut rx) = unbounded_channel();
        let mut narrator = CommandNarrator::new(Some(TtsCommand::parse("true")?), tx.clone());
        narrator.speak(&utterance(), Generation::new(1))?;
        assert_eq!(rx.recv().await, Some(PlaybackEvent::Finished(Generation::new(1))));

        let mut narrator = CommandNarrator::new(Some(TtsCommand::parse("false")?), tx);
        narrator.speak(&utterance(), Generation::new(2))?;
        assert!(matches!(
            rx.recv().await,
            Some(PlaybackEvent::Failed(generation, _)) if generation == Generation::new(2)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_program() {
        let (tx, _rx) = unbounded_channel();
        let command = TtsCommand::parse("karuta-no-such-tts-program").unwrap();
        let mut narrator = CommandNarrator::new(Some(command), tx);
        assert!(narrator.speak(&utterance(), Generation::new(1)).is_err());
    }

    #[tokio::test]
    async fn test_scheduler_fires() -> Fallible<()> {
        let (tx, mut rx) = unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        scheduler.schedule(Duration::from_millis(10), Generation::new(3))?;
        let event = timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(
            event.ok().flatten(),
            Some(PlaybackEvent::IntervalElapsed(Generation::new(3)))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduler_cancel() -> Fallible<()> {
        let (tx, mut rx) = unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        scheduler.schedule(Duration::from_millis(20), Generation::new(3))?;
        scheduler.cancel();
        let event = timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(event.is_err());
        Ok(())
    }
}
