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

use karuta_core::config::DrillConfig;
use karuta_core::types::range::MAX_CARD_ID;
use karuta_core::types::range::MIN_CARD_ID;
use karuta_core::types::settings::PlaybackSettings;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;

/// Bounds of the speed sliders.
const SLIDER_MIN_RATE: f64 = 0.5;
const SLIDER_MAX_RATE: f64 = 2.0;

pub fn page_template(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "karuta" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
                script type="module" src="/script.js" {};
            }
        }
    }
}

/// All three screens and the modal. The script shows one screen at a time.
pub fn render_app(config: &DrillConfig, card_count: usize) -> Markup {
    html! {
        main {
            (setup_screen(config, card_count))
            (play_screen(&config.playback))
            (result_screen())
            (confirm_modal())
            noscript {
                p .error { "JavaScriptと音声合成が必要です。" }
            }
        }
    }
}

fn setup_screen(config: &DrillConfig, card_count: usize) -> Markup {
    let playback = &config.playback;
    html! {
        section #setup-screen .screen.active {
            h1 { "karuta" }
            p .card-count { "全" (card_count) "枚" }
            div .presets {
                @for preset in &config.presets {
                    button .btn-preset type="button"
                        data-start=(preset.range.start())
                        data-end=(preset.range.end()) {
                        (preset.label)
                    }
                }
            }
            div .custom-range {
                label {
                    "開始番号 "
                    input #start-num type="number" min=(MIN_CARD_ID) max=(MAX_CARD_ID) value=(MIN_CARD_ID);
                }
                label {
                    " 終了番号 "
                    input #end-num type="number" min=(MIN_CARD_ID) max=(MAX_CARD_ID) value=(MAX_CARD_ID);
                }
            }
            p #range-error .error {}
            fieldset {
                legend { "読み上げ間隔" }
                @for choice in &config.interval_choices {
                    label {
                        input type="radio" name="interval" value=(choice)
                            checked[*choice == playback.interval];
                        (choice) "秒"
                    }
                }
            }
            fieldset {
                legend { "読み上げ回数" }
                @for choice in &config.repeat_choices {
                    label {
                        input type="radio" name="repeat" value=(choice)
                            checked[*choice == playback.repeat];
                        (choice) "回"
                    }
                }
            }
            (speed_slider("speed-slider", "speed-value", playback))
            button #start-btn .primary type="button" { "スタート" }
        }
    }
}

fn play_screen(playback: &PlaybackSettings) -> Markup {
    html! {
        section #play-screen .screen {
            p #remaining .remaining {}
            div .card {
                span #card-initial .initial {}
                p #card-content .content {}
                p #card-level .level {}
            }
            (speed_slider("play-speed-slider", "play-speed-value", playback))
            div .controls {
                button #next-btn .primary type="button" { "次へ" }
                button #replay-btn type="button" { "もう一度" }
                button #end-btn .danger type="button" { "終了" }
            }
        }
    }
}

fn result_screen() -> Markup {
    html! {
        section #result-screen .screen {
            h2 { "終了しました" }
            dl .summary {
                dt { "読んだ枚数" }
                dd #result-completed {}
                dt { "残り枚数" }
                dd #result-remaining {}
                dt { "範囲の枚数" }
                dd #result-total {}
            }
            div .controls {
                button #reset-same-range-btn .primary type="button" { "同じ範囲でリセット" }
                button #reset-all-btn type="button" { "設定に戻る" }
            }
        }
    }
}

fn confirm_modal() -> Markup {
    html! {
        div #confirm-modal .modal {
            div .modal-body {
                p #confirm-message {}
                div .controls {
                    button #confirm-ok-btn .danger type="button" { "OK" }
                    button #confirm-cancel-btn type="button" { "キャンセル" }
                }
            }
        }
    }
}

fn speed_slider(slider_id: &str, value_id: &str, playback: &PlaybackSettings) -> Markup {
    let rate = playback.rate.clamp(SLIDER_MIN_RATE, SLIDER_MAX_RATE);
    let rate = format!("{rate:.1}");
    html! {
        label .speed {
            "読み上げ速度 "
            input id=(slider_id) type="range" min=(SLIDER_MIN_RATE) max=(SLIDER_MAX_RATE)
                step="0.1" value=(rate);
            span id=(value_id) { (rate) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_reflects_config() {
        let html = render_app(&DrillConfig::default(), 100).into_string();
        assert!(html.contains("全100枚"));
        assert!(html.contains(r#"data-start="21" data-end="40""#));
        assert!(html.contains(r#"name="interval" value="2" checked"#));
        assert!(html.contains(r#"name="repeat" value="2" checked"#));
        assert!(!html.contains(r#"name="repeat" value="3" checked"#));
        assert!(html.contains(r#"id="speed-slider""#));
        assert!(html.contains(r#"value="1.2""#));
    }

    #[test]
    fn test_page_loads_module_script() {
        let html = page_template(html! { p { "x" } }).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<script type="module" src="/script.js"></script>"#));
    }
}
