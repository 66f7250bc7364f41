// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid placement of layers, driven by a cancelable progress loop.
//!
//! This example shows how to combine:
//! - `understory_grid` to size a grid and place each layer in a cell,
//! - `understory_progress` to report placement progress and stop early on cancel,
//! - a `tracing` subscriber to see what both crates log.
//!
//! Run:
//! - `cargo run -p understory_demos --example layer_grid`
//! - `RUST_LOG=trace cargo run -p understory_demos --example layer_grid -- 11 '{"enabled":true,"shape":{"rows":2,"cols":-1},"stride":-2}'`

use std::error::Error;

use tracing_subscriber::EnvFilter;
use understory_grid::{GridConfig, GridLayout};
use understory_progress::{ProgressEvent, ProgressEvents, ProgressRegistry, progress_range};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let layer_count: usize = args.next().as_deref().unwrap_or("9").parse()?;
    let config: GridConfig = match args.next() {
        Some(json) => serde_json::from_str(&json)?,
        None => GridConfig::enabled(),
    };
    let layout = GridLayout::new(config);

    let extent = layout.effective_shape(layer_count);
    println!(
        "{layer_count} layers -> {} x {} grid, {} occupied cells{}",
        extent.rows,
        extent.cols,
        extent.occupied,
        if extent.wraps() { " (wrapping)" } else { "" }
    );

    let registry = ProgressRegistry::new();
    let mut work = progress_range(0..layer_count)
        .with_description("placing layers")
        .on_cancel(|| println!("placement canceled"));
    let id = registry.track(&mut work);
    work.subscribe(ProgressEvents::VALUE, |event: &ProgressEvent<'_>| {
        if let ProgressEvent::Value(n) = event {
            tracing::debug!(placed = n, "layer placed");
        }
    });

    let mut labels = vec![vec![String::new(); extent.cols]; extent.rows];
    for index in &mut work {
        let cell = layout.position(index, layer_count)?;
        let label = &mut labels[cell.row][cell.col];
        if !label.is_empty() {
            label.push(',');
        }
        label.push_str(&index.to_string());
    }

    if let Some(snapshot) = registry.get(id) {
        println!("{}: {}/{:?}", snapshot.description, snapshot.n, snapshot.total);
    }
    let width = labels.iter().flatten().map(String::len).max().unwrap_or(1);
    for row in &labels {
        let cells: Vec<_> = row.iter().map(|l| format!("[{l:>width$}]")).collect();
        println!("{}", cells.join(" "));
    }
    Ok(())
}
