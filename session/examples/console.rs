//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Console Gateway Example
//!
//! Connects to a game server and prints every client envelope as a JSON line. Lines typed on
//! stdin are sent as client commands, including `/xml on` and `/xml off`.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p mudgate-session --example console -- localhost 4000
//! ```

use mudgate_session::{GameLink, LinkConfig};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).map(|s| s.as_str()).unwrap_or("localhost");
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4000);

    let link = GameLink::connect(LinkConfig::new(host, port)).await?;
    let (commands, mut envelopes, task) = link.into_parts();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if commands.send(line).await.is_err() {
                break;
            }
        }
    });

    while let Some(envelope) = envelopes.recv().await {
        println!("{}", envelope.to_json()?);
    }

    task.await??;
    Ok(())
}
