//! Console input parsing.

use crate::error::{LotteryError, LotteryResult};

/// Parse a ticket request typed by the human player.
///
/// Accepts a decimal integer in `1..=max`, ignoring surrounding whitespace.
pub fn parse_ticket_request(input: &str, max: u64) -> LotteryResult<u64> {
    let trimmed = input.trim();
    let count: u64 = trimmed.parse().map_err(|_| {
        LotteryError::InvalidInput(format!("'{trimmed}' is not a number"))
    })?;

    if !(1..=max).contains(&count) {
        return Err(LotteryError::InvalidInput(format!(
            "you can only purchase between 1 and {max} tickets"
        )));
    }
    Ok(count)
}

/// Interpret a yes/no answer. Anything other than "y" or "yes" is a no.
pub fn parse_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_requests() {
        assert_eq!(parse_ticket_request("1", 10), Ok(1));
        assert_eq!(parse_ticket_request(" 10\n", 10), Ok(10));
        assert_eq!(parse_ticket_request("7", 10), Ok(7));
    }

    #[test]
    fn test_parse_out_of_range() {
        for input in ["0", "11", "250"] {
            assert!(matches!(
                parse_ticket_request(input, 10),
                Err(LotteryError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_parse_non_numeric() {
        for input in ["", "abc", "-3", "2.5", "ten"] {
            let err = parse_ticket_request(input, 10).unwrap_err();
            assert!(matches!(err, LotteryError::InvalidInput(_)), "{input:?}");
        }
    }

    #[test]
    fn test_parse_yes() {
        assert!(parse_yes("yes"));
        assert!(parse_yes(" YES\n"));
        assert!(parse_yes("y"));
        assert!(!parse_yes("no"));
        assert!(!parse_yes(""));
        assert!(!parse_yes("yess"));
    }
}
