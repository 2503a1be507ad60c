//! Example: shortest common superstring as an open tour over words.
//!
//! Run with:
//! `cargo run --example superstring`

use mask_dp::{problems::superstring::shortest_superstring, Result};

fn main() -> Result<()> {
    let words = ["catg", "ctaagt", "gcta", "ttca", "atgcatc"];

    let s = shortest_superstring(&words)?;
    println!("Words: {words:?}");
    println!("Superstring ({} chars): {s}", s.len());
    for w in words {
        let at = s.find(w).map_or(String::from("missing"), |i| i.to_string());
        println!("  {w:<8} at {at}");
    }
    Ok(())
}
