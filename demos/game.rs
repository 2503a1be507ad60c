//! Example: deciding the "can I win" game and picking an opening move.
//!
//! Run with:
//! `cargo run --example game`

use mask_dp::{problems::game::CanIWin, Result};

fn main() -> Result<()> {
    for (max_choice, target) in [(10, 11), (10, 10), (4, 6), (12, 40), (15, 100)] {
        let game = CanIWin::new(max_choice, target)?;
        let verdict = if game.first_player_wins()? { "wins" } else { "loses" };
        print!("1..={max_choice}, target {target}: first player {verdict}");
        match game.winning_move()? {
            Some(n) => println!(" (open with {n})"),
            None => println!(),
        }
    }
    Ok(())
}
