use modkit_common::Xyz;
use toolkit::HeaderField;

use crate::error::{AlignError, Result};

/// Read an X, Y, Z triplet from `header` output.
///
/// Values printed in scientific notation can run together without a
/// separating space (`0.1020E+020.1020E+02...`). When the output does not
/// split into exactly three tokens, every token is cut after each `+` and its
/// two exponent digits and the last three pieces are used.
pub fn parse_header_triplet(output: &str, field: HeaderField) -> Result<Xyz> {
    let mut tokens: Vec<&str> = output.split_whitespace().collect();
    if tokens.len() != 3 {
        tokens = tokens.into_iter().flat_map(split_fused).collect();
    }

    let invalid = || AlignError::Header {
        field,
        output: output.trim().to_string(),
    };

    let [x, y, z] = match tokens.as_slice() {
        [.., x, y, z] => [x, y, z],
        _ => return Err(invalid()),
    };
    let parse = |value: &str| value.parse::<f64>().map_err(|_| invalid());
    Ok(Xyz::new(parse(x)?, parse(y)?, parse(z)?))
}

/// Cut a token after every `+` and the two characters following it
fn split_fused(token: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while let Some(offset) = token[start..].find('+') {
        let exponent = start + offset + 1;
        let end = token[exponent..]
            .char_indices()
            .nth(2)
            .map_or(token.len(), |(i, _)| exponent + i);
        pieces.push(&token[start..end]);
        start = end;
    }
    if start < token.len() {
        pieces.push(&token[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_triplet() {
        let xyz = parse_header_triplet("    10.200   10.200   20.000\n", HeaderField::Pixel).unwrap();
        assert_eq!(xyz, Xyz::new(10.2, 10.2, 20.0));
    }

    #[test]
    fn test_fused_scientific_notation() {
        let xyz = parse_header_triplet(
            " 0.1234E+05-0.5000E+030.2000E+02\n",
            HeaderField::Origin,
        )
        .unwrap();
        assert_eq!(xyz, Xyz::new(12340.0, -500.0, 20.0));
    }

    #[test]
    fn test_partially_fused() {
        let xyz = parse_header_triplet("0.1E+010.2E+01 3.5", HeaderField::Pixel).unwrap();
        assert_eq!(xyz, Xyz::new(1.0, 2.0, 3.5));
    }

    #[test]
    fn test_last_three_values_win() {
        let xyz = parse_header_triplet("1 2 3 4", HeaderField::Pixel).unwrap();
        assert_eq!(xyz, Xyz::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_unreadable_header() {
        for output in ["", "1 2", "a b c"] {
            assert!(matches!(
                parse_header_triplet(output, HeaderField::Origin),
                Err(AlignError::Header { field: HeaderField::Origin, .. })
            ));
        }
    }

    #[test]
    fn test_split_fused() {
        assert_eq!(split_fused("1.0E+022.0E+02"), vec!["1.0E+02", "2.0E+02"]);
        assert_eq!(split_fused("3.5"), vec!["3.5"]);
        assert_eq!(split_fused("1.0E+0"), vec!["1.0E+0"]);
        assert_eq!(split_fused("1+\u{fffd}2"), vec!["1+\u{fffd}2"]);
    }

    #[test]
    fn test_non_ascii_header_output_is_an_error() {
        let output = String::from_utf8_lossy(b"1+\xff2 3");
        assert!(matches!(
            parse_header_triplet(&output, HeaderField::Pixel),
            Err(AlignError::Header { .. })
        ));
    }
}
