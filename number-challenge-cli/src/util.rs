pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Lives rendered as hearts, spent lives as hollow ones.
pub fn hearts(lives: u8, max: u8) -> String {
    let spent = max.saturating_sub(lives);
    let mut out = "♥".repeat(usize::from(lives));
    out.push_str(&"♡".repeat(usize::from(spent)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" perfect, ,steady,  timid ");
        assert_eq!(parts, vec!["perfect", "steady", "timid"]);
    }

    #[test]
    fn hearts_show_spent_lives() {
        assert_eq!(hearts(3, 3), "♥♥♥");
        assert_eq!(hearts(1, 3), "♥♡♡");
        assert_eq!(hearts(0, 1), "♡");
    }
}
