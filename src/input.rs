//! Token grammar for input lines.
//!
//! One line is one simulation run. Tokens are separated by commas and/or
//! whitespace; each token is a piece identifier made of ASCII letters
//! followed by a decimal lane, e.g. `Q0` or `T7`.

use crate::error::{Error, Result};

/// A decoded drop instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub piece: &'a str,
    pub lane: usize,
}

impl<'a> Token<'a> {
    pub fn new(piece: &'a str, lane: usize) -> Self {
        Self { piece, lane }
    }
}

/// Splits a line into raw tokens, skipping empty ones.
pub fn split_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

/// Decodes a single raw token.
pub fn parse_token(token: &str) -> Result<Token<'_>> {
    let malformed = |reason| Error::MalformedInput {
        token: token.to_owned(),
        reason,
    };

    let split = token
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| malformed("missing lane"))?;
    let (piece, lane) = token.split_at(split);

    if piece.is_empty() {
        return Err(malformed("missing piece identifier"));
    }
    if !piece.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(malformed("piece identifier must be letters"));
    }
    if !lane.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("lane must be a decimal number"));
    }
    let lane = lane.parse().map_err(|_| malformed("lane is too large"))?;

    Ok(Token { piece, lane })
}

/// Decodes every token of a line, stopping at the first malformed one.
pub fn parse_line(line: &str) -> Result<Vec<Token<'_>>> {
    split_tokens(line).map(parse_token).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated_line() {
        assert_eq!(
            parse_line("I0,I4,Q8").unwrap(),
            vec![Token::new("I", 0), Token::new("I", 4), Token::new("Q", 8)]
        );
    }

    #[test]
    fn test_parse_mixed_separators_and_blank_tokens() {
        assert_eq!(
            parse_line(" T1, Z3\tI4 ,,\r").unwrap(),
            vec![Token::new("T", 1), Token::new("Z", 3), Token::new("I", 4)]
        );
        assert!(parse_line("   ").unwrap().is_empty());
    }

    #[test]
    fn test_multi_letter_identifier_and_lane() {
        assert_eq!(parse_token("SZ12").unwrap(), Token::new("SZ", 12));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["Q", "7", "Q-1", "Q1x", "Q 1", "é1", "Q99999999999999999999999"] {
            let err = parse_token(token).unwrap_err();
            assert!(
                matches!(err, Error::MalformedInput { .. }),
                "token {token:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_line_reports_first_bad_token() {
        let err = parse_line("Q0,X,T1").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedInput {
                token: "X".into(),
                reason: "missing lane"
            }
        );
    }
}
