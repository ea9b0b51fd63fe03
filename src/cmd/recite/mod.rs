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

mod speaker;

use karuta_core::error::Fallible;
use karuta_core::error::fail;
use karuta_core::playback::Narrator;
use karuta_core::playback::Scheduler;
use karuta_core::rng::TinyRng;
use karuta_core::session::Screen;
use karuta_core::session::Session;
use karuta_core::session::SessionView;
use karuta_core::types::range::MAX_CARD_ID;
use karuta_core::types::range::MIN_CARD_ID;
use karuta_core::types::range::RangeInput;
use karuta_core::types::settings::PlaybackSettings;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::stdin;
use tokio::sync::mpsc::unbounded_channel;

use crate::cmd::recite::speaker::CommandNarrator;
use crate::cmd::recite::speaker::TokioScheduler;
use crate::cmd::recite::speaker::TtsCommand;
use crate::dataset::load_cards;
use crate::dataset::load_config;
use crate::utils::clock_seed;

pub struct ReciteConfig {
    pub dataset: Option<String>,
    pub config: Option<String>,
    pub range: RangeInput,
    pub interval: Option<u32>,
    pub repeat: Option<u32>,
    pub rate: Option<f64>,
    pub tts_command: Option<String>,
}

const HELP: &str = "\
Commands:
  start <from> <to>   begin a drill over a range
  next (or Enter)     skip to the next card
  replay              read the current card once more
  end                 end the session
  reset               reshuffle the same range
  back                return to setup
  yes / no            answer a confirmation
  rate <x>            change the speech rate
  status              show where you are
  quit                exit";

#[derive(Clone, Debug, PartialEq)]
pub enum ReciteCommand {
    Next,
    Replay,
    End,
    Reset,
    Back,
    Yes,
    No,
    Rate(f64),
    Start(RangeInput),
    Status,
    Help,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ReciteCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        [] | ["n" | "next"] => ReciteCommand::Next,
        ["r" | "replay"] => ReciteCommand::Replay,
        ["e" | "end"] => ReciteCommand::End,
        ["reset"] => ReciteCommand::Reset,
        ["b" | "back" | "setup"] => ReciteCommand::Back,
        ["y" | "yes"] => ReciteCommand::Yes,
        ["no" | "cancel"] => ReciteCommand::No,
        ["s" | "status"] => ReciteCommand::Status,
        ["h" | "help" | "?"] => ReciteCommand::Help,
        ["q" | "quit" | "exit"] => ReciteCommand::Quit,
        ["rate", value] => match value.parse::<f64>() {
            Ok(rate) if rate.is_finite() => ReciteCommand::Rate(rate),
            _ => return Err(format!("Not a rate: {value}")),
        },
        ["start", from, to] => ReciteCommand::Start(RangeInput::parse(from, to)),
        ["start", ..] => return Err("Usage: start <from> <to>".to_string()),
        _ => return Err(format!("Unknown command: {line}. Type help for a list.")),
    };
    Ok(command)
}

pub async fn recite(config: ReciteConfig) -> Fallible<()> {
    let cards = load_cards(config.dataset)?;
    if cards.is_empty() {
        println!("The dataset has no cards.");
        return Ok(());
    }
    let mut drill = load_config(config.config.as_deref())?;
    let defaults = drill.playback;
    drill.playback = PlaybackSettings::new(
        config.interval.unwrap_or(defaults.interval),
        config.repeat.unwrap_or(defaults.repeat),
        config.rate.unwrap_or(defaults.rate),
    );
    let tts = match config.tts_command.as_deref() {
        Some(line) => Some(TtsCommand::parse(line)?),
        None => None,
    };
    if tts.is_none() {
        log::info!("No TTS command given; cards will only be printed.");
    }

    let (events, mut received) = unbounded_channel();
    let narrator = CommandNarrator::new(tts, events.clone());
    let scheduler = TokioScheduler::new(events);
    let rng = TinyRng::from_seed(clock_seed());
    let mut session = Session::new(cards, &drill, narrator, scheduler, rng);

    if config.range != RangeInput::default() {
        let settings = session.settings();
        if let Err(e) = session.start(config.range, settings) {
            return fail(e.to_string());
        }
    }
    println!("{}", render(&session.view()));

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match apply(&mut session, command) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{}", e.message()),
                }
            }
            Some(event) = received.recv() => {
                session.handle_event(event);
            }
        }
    }
    Ok(())
}

fn apply<N: Narrator, S: Scheduler>(
    session: &mut Session<N, S>,
    command: ReciteCommand,
) -> Fallible<Flow> {
    match command {
        ReciteCommand::Quit => return Ok(Flow::Quit),
        ReciteCommand::Help => {
            println!("{HELP}");
            return Ok(Flow::Continue);
        }
        ReciteCommand::Status => {}
        _ if session.pending_prompt().is_some() => match command {
            ReciteCommand::Yes => session.confirm()?,
            ReciteCommand::No => session.cancel_confirmation(),
            _ => return fail("Answer yes or no."),
        },
        ReciteCommand::Yes | ReciteCommand::No => return fail("Nothing to confirm."),
        ReciteCommand::Next => session.next()?,
        ReciteCommand::Replay => session.replay()?,
        ReciteCommand::End => {
            session.end()?;
        }
        ReciteCommand::Reset => {
            session.reset_same_range()?;
        }
        ReciteCommand::Back => {
            session.reset_all()?;
        }
        ReciteCommand::Rate(rate) => session.set_rate(rate),
        ReciteCommand::Start(input) => {
            if session.screen() == Screen::Play {
                return fail("A drill is in progress. End it or go back first.");
            }
            let settings = session.settings();
            // A bad range is shown by the render below.
            let _ = session.start(input, settings);
        }
    }
    println!("{}", render(&session.view()));
    Ok(Flow::Continue)
}

/// The terminal rendition of a session snapshot.
fn render(view: &SessionView) -> String {
    let mut out = String::new();
    match view.screen {
        Screen::Setup => {
            out.push_str(&format!(
                "Choose a range with: start <from> <to> ({MIN_CARD_ID}-{MAX_CARD_ID})"
            ));
            if let Some(error) = &view.range_error {
                out.push_str(&format!("\n{error}"));
            }
        }
        Screen::Play => {
            let progress = view.total - view.remaining;
            match &view.card {
                Some(card) => out.push_str(&format!(
                    "[{progress}/{}] No. {} {}",
                    view.total,
                    card.id(),
                    card.initial()
                )),
                None => out.push_str(&format!("[{progress}/{}]", view.total)),
            }
        }
        Screen::Result => {
            out.push_str("Session Completed");
            if let Some(summary) = view.summary {
                out.push_str(&format!(
                    "\nRead: {} / {}\nRemaining: {}",
                    summary.completed, summary.total, summary.remaining
                ));
            }
            out.push_str("\nType reset to drill the range again, or back for setup.");
        }
    }
    if let Some(prompt) = &view.prompt {
        out.push_str(&format!(
            "\n{} [yes: {} / no: {}]",
            prompt.message, prompt.ok_label, prompt.cancel_label
        ));
    }
    out
}
