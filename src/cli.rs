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

use std::time::Duration;

use clap::Parser;
use karuta_core::error::Fallible;
use karuta_core::types::range::RangeInput;
use tokio::spawn;

use crate::cmd::check::check_dataset;
use crate::cmd::import::import_csv;
use crate::cmd::recite::ReciteConfig;
use crate::cmd::recite::recite;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the card reader to a web browser.
    Serve {
        /// Path to the card dataset. By default, `cards.json` in the current directory.
        dataset: Option<String>,
        /// Path to a TOML drill configuration.
        #[arg(long)]
        config: Option<String>,
        /// Directory holding the wasm-pack output for karuta-wasm.
        #[arg(long, default_value = "pkg")]
        pkg_dir: String,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Drill in the terminal, reading cards through an external TTS command.
    Recite {
        /// Path to the card dataset. By default, `cards.json` in the current directory.
        dataset: Option<String>,
        /// First card number of the range.
        #[arg(long)]
        start: Option<i64>,
        /// Last card number of the range.
        #[arg(long)]
        end: Option<i64>,
        /// Seconds between readings of the same card.
        #[arg(long)]
        interval: Option<u32>,
        /// How many times each card is read.
        #[arg(long)]
        repeat: Option<u32>,
        /// Speech rate multiplier.
        #[arg(long)]
        rate: Option<f64>,
        /// Command that speaks its last argument, e.g. `say` or `espeak-ng -v ja`.
        /// `{rate}` and `{lang}` are replaced with the speech rate and language
        /// tag. Without one, cards are only printed.
        #[arg(long)]
        tts_command: Option<String>,
        /// Path to a TOML drill configuration.
        #[arg(long)]
        config: Option<String>,
    },
    /// Check the integrity of a dataset.
    Check {
        /// Path to the card dataset. By default, `cards.json` in the current directory.
        dataset: Option<String>,
    },
    /// Convert a CSV sheet with `level`, `initial` and `content` columns into a dataset.
    Import {
        /// Path to the CSV file.
        input: String,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            dataset,
            config,
            pkg_dir,
            host,
            port,
            open_browser,
        } => {
            if open_browser.unwrap_or(true) {
                // Open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port, Duration::from_secs(10)).await {
                        Ok(()) => {
                            if let Err(e) = open::that(format!("http://{browser_host}:{port}/")) {
                                log::warn!("Could not open a browser: {e}");
                            }
                        }
                        Err(e) => log::warn!("{e}"),
                    }
                });
            }
            let config = ServerConfig {
                dataset,
                config,
                pkg_dir,
                host,
                port,
            };
            start_server(config).await
        }
        Command::Recite {
            dataset,
            start,
            end,
            interval,
            repeat,
            rate,
            tts_command,
            config,
        } => {
            let config = ReciteConfig {
                dataset,
                config,
                range: RangeInput { start, end },
                interval,
                repeat,
                rate,
                tts_command,
            };
            recite(config).await
        }
        Command::Check { dataset } => check_dataset(dataset),
        Command::Import { input, output } => import_csv(&input, output.as_deref()),
    }
}
