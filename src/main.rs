//! Cascade Grid demo
//!
//! Fills a grid, clears a few tiles and prints the resulting board and event
//! stream. Usage: `cascade-grid [config.json]`

use std::path::PathBuf;

use cascade_grid::sim::{GridAddress, GridEventKind};
use cascade_grid::{Grid, GridConfig};

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GridConfig::load(&PathBuf::from(path)),
        None => GridConfig::default(),
    };

    let Some(mut grid) = Grid::from_config(&config) else {
        log::error!(
            "Invalid grid geometry: {}x{}, tile {}x{}",
            config.width,
            config.height,
            config.tile_width,
            config.tile_height
        );
        std::process::exit(1);
    };

    log::info!("Cascade Grid starting ({}x{})", config.width, config.height);

    grid.initialize();
    grid.record_events(true);
    grid.subscribe(GridEventKind::TileMoved, |event| {
        log::debug!("observer: {:?}", event);
    });

    let report = grid.settle();
    println!("Initial fill: {} tiles", report.spawned);
    print_board(&grid);
    grid.take_events();

    // Clear a short vertical run in the middle column plus its right neighbor
    let dims = grid.dimensions();
    let column = dims.width() / 2;
    let mut cleared: Vec<GridAddress> = (0..dims.height().min(2))
        .filter_map(|row| dims.to_address(column, row + dims.height() / 2))
        .collect();
    if let Some(&first) = cleared.first() {
        cleared.extend(grid.offset_address(first, 1, 0));
    }

    grid.post_removal(cleared.clone());
    let report = grid.step();
    println!(
        "\nCleared {:?}: {} moved, {} spawned, {} failed",
        cleared, report.moved, report.spawned, report.failed
    );
    print_board(&grid);

    println!("\nEvents:");
    for event in grid.take_events() {
        match serde_json::to_string(&event) {
            Ok(json) => println!("  {}", json),
            Err(err) => log::error!("Cannot serialize event: {}", err),
        }
    }
}

fn print_board(grid: &Grid) {
    for row in grid.kind_rows() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(kind) => format!("{:>2}", kind),
                None => " .".to_string(),
            })
            .collect();
        println!("{}", line.join(" "));
    }
}
