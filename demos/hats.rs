//! Example: counting hat assignments with the mask-dp engine.
//!
//! Run with:
//! `cargo run --example hats`

use mask_dp::{problems::hats::HatAssignment, Coverage, Result};

fn main() -> Result<()> {
    let preferences = vec![vec![3, 5, 1], vec![3, 5], vec![1, 2, 3, 4, 5]];

    let problem = HatAssignment::new(&preferences)?;
    println!("People: {}, hats: {}", preferences.len(), problem.hats());
    println!("Ways to give everyone a distinct liked hat: {}", problem.count()?);

    if let Some(fittings) = problem.assignment()? {
        println!("One assignment:");
        for f in fittings {
            println!("  person {} wears hat {}", f.person, f.hat);
        }
    }

    // Only two of the three people need a hat.
    let partial = problem.with_coverage(Coverage::AtLeast(2))?;
    println!("Ways covering at least two people: {}", partial.count()?);
    Ok(())
}
