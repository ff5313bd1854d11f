use clap::Parser;

use statespace::driver::SearchDriver;
use statespace::driver::SearchMode;
use statespace::frontier::Strategy;
use statespace::problems::delivery::itinerary;
use statespace::problems::delivery::santa_fe;
use statespace::problems::delivery::DeliveryProblem;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// One of breadth_first, depth_first, uniform_cost, greedy, astar.
    #[arg(short, long, env = "STRATEGY", default_value = "astar")]
    strategy: String,

    /// Search without the visited-state set (may revisit states).
    #[arg(long)]
    tree_search: bool,

    /// Print every expansion.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let strategy: Strategy = args.strategy.parse()?;
    let mode = if args.tree_search {
        SearchMode::Tree
    } else {
        SearchMode::Graph
    };

    // The toy instance of the original exercise: one truck in Rafaela, one
    // package bound for Angelica.
    let problem = DeliveryProblem::new(
        santa_fe()?,
        &[("c1", "rafaela", 1.5)],
        &[("p1", "rafaela", "angelica")],
    )?;

    let mut driver = SearchDriver::new(problem, strategy, mode);
    let outcome = if args.verbose {
        driver.run_with(|n| println!("expanding depth={} g={}", n.depth(), n.g()))?
    } else {
        driver.run()?
    };

    match outcome.path() {
        Some(path) => {
            println!("{strategy}/{mode} found a plan costing {} liters:", path.cost);
            for leg in itinerary(driver.problem(), path) {
                println!(
                    "  {}: {} -> {} ({} liters) carrying {:?}",
                    leg.truck, leg.from, leg.to, leg.fuel, leg.packages
                );
            }
        }
        None => println!("{strategy}/{mode} exhausted the search space without a plan"),
    }

    let stats = outcome.stats();
    println!(
        "expanded {} nodes, generated {}, peak frontier {}",
        stats.expanded, stats.generated, stats.peak_frontier
    );

    Ok(())
}
