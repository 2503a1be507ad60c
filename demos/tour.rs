//! Example: Held-Karp travelling salesman tours through the mask-dp engine.
//!
//! Run with:
//! `cargo run --example tour`

use mask_dp::{aggregate::MinCost, problems::tsp::Tsp, Result, Strategy};

fn main() -> Result<()> {
    let dist = vec![
        vec![0, 10, 15, 20],
        vec![10, 0, 35, 25],
        vec![15, 35, 0, 30],
        vec![20, 25, 30, 0],
    ];

    let closed = Tsp::closed(dist.clone())?;
    for strategy in [Strategy::BottomUp, Strategy::TopDown] {
        match closed.solve_with(strategy)? {
            Some(tour) => println!("{strategy:?} closed tour: cost {} via {:?}", tour.cost, tour.order),
            None => println!("{strategy:?}: no closed tour"),
        }
    }

    let open = Tsp::open(dist.clone())?;
    if let Some(path) = open.solve()? {
        println!("Open path: cost {} via {:?}", path.cost, path.order);
    }

    // Remove the 0-1 road both ways; the tour must detour.
    let mut blocked = dist;
    blocked[0][1] = MinCost::INFINITY;
    blocked[1][0] = MinCost::INFINITY;
    match Tsp::closed(blocked)?.solve()? {
        Some(tour) => println!("Without road 0-1: cost {} via {:?}", tour.cost, tour.order),
        None => println!("Without road 0-1: no tour"),
    }
    Ok(())
}
