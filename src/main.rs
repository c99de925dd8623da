use clap::Parser;
use log::error;

use dstar_lattice::config::Config;
use dstar_lattice::simulation::Simulation;

fn main() {
    env_logger::init();
    let config = Config::parse();

    if !config.quiet {
        println!("Starting D* Lite simulation...");
        println!("Grid size: {}x{}", config.grid_size, config.grid_size);
        println!(
            "Walls: {}, Rough cells: {} (cost {}), Obstacles per wave: {}",
            config.num_walls, config.num_rough, config.rough_cost, config.num_obstacles
        );
        match config.seed {
            Some(seed) => println!("Seed: {}", seed),
            None => println!("Seed: random"),
        }
        if config.no_visualization {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
            println!("Press Ctrl+C to stop the simulation");
        }
        println!();
    }

    let mut simulation = match Simulation::new(config.clone()) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("failed to create simulation: {}", e);
            eprintln!("Try reducing --num-walls or increasing --grid-size");
            std::process::exit(1);
        }
    };

    let (stats, timing_data) = match simulation.run() {
        Ok(result) => result,
        Err(e) => {
            error!("simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    if config.quiet {
        return;
    }

    println!("\n=== FINAL RESULTS ===");
    println!("{}", stats);

    println!("=== TIMING ANALYSIS ===");
    println!("Total pathfinding calls: {}", timing_data.total_calls());
    println!(
        "Average observe time: {:.2?}",
        timing_data.average_observe_time()
    );
    println!(
        "Average find_path time: {:.2?}",
        timing_data.average_find_path_time()
    );
    println!(
        "Total time in find_path: {:.2?}",
        timing_data.total_find_path_time()
    );
}
