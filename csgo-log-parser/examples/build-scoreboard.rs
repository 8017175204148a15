use csgo_log_parser::{parse, Event};

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

// Folds the kill events of a logfile into a kills/deaths scoreboard.
//
// cargo run --example build-scoreboard -- server.log

fn main() -> std::io::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./server.log".to_string());
    let f = File::open(path)?;
    let reader = BufReader::new(f);

    let messages = reader
        .lines()
        .filter_map(|l| l.ok().and_then(|s| parse(&s).ok()));

    let mut kills: HashMap<String, u32> = HashMap::new();
    let mut deaths: HashMap<String, u32> = HashMap::new();

    for message in messages {
        match message.event {
            Event::PlayerKill {
                attacker, victim, ..
            } => {
                *kills.entry(attacker.name).or_insert(0) += 1;
                *deaths.entry(victim.name).or_insert(0) += 1;
            }
            Event::PlayerKilledSuicide { player, .. } => {
                *deaths.entry(player.name).or_insert(0) += 1;
            }
            Event::PlayerKilledBomb { player, .. } => {
                *deaths.entry(player.name).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    let mut board: Vec<(String, u32)> = kills.into_iter().collect();
    board.sort_by(|a, b| b.1.cmp(&a.1));

    for (name, k) in board {
        let d = deaths.get(&name).copied().unwrap_or(0);
        println!("{:<24} {:>3} / {:<3}", name, k, d);
    }

    Ok(())
}
