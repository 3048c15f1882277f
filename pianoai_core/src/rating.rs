/// Star rating (1-5) shown on the results screen.
pub fn stars_for_accuracy(accuracy: u8) -> u8 {
    match accuracy {
        95.. => 5,
        85..=94 => 4,
        70..=84 => 3,
        50..=69 => 2,
        _ => 1,
    }
}
