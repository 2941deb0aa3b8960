use rankskip::{Options, RankedIndex};

fn main() {
    let options = Options {
        seed: Some(42),
        ..Default::default()
    };
    let mut board = match RankedIndex::with_options(options) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("bad options: {}", e);
            return;
        }
    };

    let players = [
        (1200.0, "ada"),
        (980.0, "brian"),
        (1500.0, "carol"),
        (1200.0, "dave"),
        (760.0, "erin"),
    ];
    for (score, name) in players {
        board.insert(score, name);
    }

    println!("{}", board);

    println!("ranking (lowest first):");
    for (i, player) in board.iter().enumerate() {
        println!("  #{} {} {}", i + 1, player.member(), player.score());
    }

    if let Some(rank) = board.get_rank(1200.0, "dave") {
        println!("dave is #{} of {}", rank, board.len());
    }

    // dave improves: move him by deleting the old pair.
    if board.delete(1200.0, "dave").is_ok() {
        board.insert(1600.0, "dave");
    }
    if let Some(top) = board.last() {
        println!("top: {} {}", top.member(), top.score());
    }

    println!("scores 900..=1500:");
    for player in board.range_by_score(900.0, 1500.0) {
        println!("  {} {}", player.member(), player.score());
    }
}
