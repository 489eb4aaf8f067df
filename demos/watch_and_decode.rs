// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watch-and-decode example.
//!
//! This example demonstrates:
//! - Declaring a typed configuration shape
//! - Decoding a YAML file and printing every field error at once
//! - Re-decoding whenever the debounced notifier reports a change
//!
//! To run this example:
//! ```bash
//! cargo run --example watch_and_decode --features yaml,reload
//!
//! # In another terminal, edit the printed file, for example:
//! echo "server:
//!   port: 70000
//!   timeout: soon" > /tmp/.../app.yaml
//! ```

use chrono::TimeDelta;
use tokio::sync::{mpsc, watch};
use typedcfg::config_shape;
use typedcfg::prelude::*;

config_shape! {
    #[derive(Debug, Default)]
    pub struct Server {
        pub host: String => "host",
        pub port: u16 => "port",
        pub timeout: TimeDelta => "timeout",
        pub workers: Option<u8> => "workers",
    }
}

config_shape! {
    #[derive(Debug, Default)]
    pub struct AppConfig {
        pub name: String => "name",
        pub server: Server => "server",
        pub debug: bool => "debug",
    }
}

const INITIAL: &str = r#"
name: demo
debug: "true"
server:
  host: localhost
  port: 8080
  timeout: 1m30s
"#;

fn report(file: &ConfigFile) {
    match file.decode::<AppConfig>() {
        Ok(config) => println!("decoded: {:#?}\n", config),
        Err(e) => println!("{}\n", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("=== typedcfg: Watch and Decode Example ===\n");

    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("app.yaml");
    std::fs::write(&path, INITIAL)?;
    println!("Edit {} to see it re-decoded; Ctrl-C to stop.\n", path.display());

    let mut file = ConfigFile::from_file(&path)?;
    report(&file);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let (notify_tx, mut notify_rx) = mpsc::channel(1);
    let watcher = tokio::spawn(typedcfg::service::watch(
        cancel_rx,
        dir.path().to_path_buf(),
        notify_tx,
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = notify_rx.recv() => {
                if changed.is_none() {
                    break;
                }
                match file.reload() {
                    Ok(()) => report(&file),
                    Err(e) => println!("reload failed: {}\n", e),
                }
            }
        }
    }

    let _ = cancel_tx.send(true);
    match watcher.await {
        Ok(Err(e)) if e.is_cancelled() => println!("stopped"),
        Ok(Err(e)) => println!("watch failed: {}", e),
        Ok(Ok(())) => {}
        Err(e) => println!("watch task failed: {}", e),
    }
    Ok(())
}
