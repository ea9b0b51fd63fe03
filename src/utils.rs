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

use karuta_core::error::Fallible;
use karuta_core::error::fail;
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio::time::sleep;

/// Poll until something accepts connections on `host:port`, giving up after
/// `timeout`.
pub async fn wait_for_server(host: &str, port: u16, timeout: Duration) -> Fallible<()> {
    let deadline = Instant::now() + timeout;
    let address = format!("{host}:{port}");
    while Instant::now() < deadline {
        if let Ok(stream) = TcpStream::connect(&address).await {
            drop(stream);
            return Ok(());
        }
        sleep(Duration::from_millis(5)).await;
    }
    fail(format!("nothing listening on {address} after {timeout:?}"))
}

/// Seed for the deck shuffle.
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
