use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid number '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Error returned when a session line cannot be split into words.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// Trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a percentage as typed into the rate field: `"13"`, `"13%"` or
/// `"8.875 %"` all give the percentage value, not the fraction.
pub fn parse_percent(s: &str) -> Result<Decimal, ParseDecimalError> {
    let trimmed = s.trim();
    parse_decimal(trimmed.strip_suffix('%').unwrap_or(trimmed))
}

/// Splits a session line into words.
///
/// Words are separated by whitespace. A double-quoted run is one word with
/// the quotes removed, so `--name "Ontario HST"` yields two words. `\"`
/// inside quotes is a literal quote.
pub fn split_words(line: &str) -> Result<Vec<String>, SplitError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            '\\' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(SplitError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        let err = parse_decimal("abc").unwrap_err();
        assert!(err.to_string().starts_with("invalid number 'abc'"));
    }

    #[test]
    fn parse_percent_strips_sign() {
        assert_eq!(parse_percent("13").unwrap(), dec!(13));
        assert_eq!(parse_percent("13%").unwrap(), dec!(13));
        assert_eq!(parse_percent(" 8.875 % ").unwrap(), dec!(8.875));
        assert!(parse_percent("ten%").is_err());
    }

    #[test]
    fn split_plain_words() {
        assert_eq!(
            split_words("  calc --region CA_ON   --amount 100 ").unwrap(),
            vec!["calc", "--region", "CA_ON", "--amount", "100"]
        );
    }

    #[test]
    fn split_groups_quoted_words() {
        assert_eq!(
            split_words(r#"add --name "Ontario HST" --description "Sales, \"harmonized\"""#)
                .unwrap(),
            vec!["add", "--name", "Ontario HST", "--description", r#"Sales, "harmonized""#]
        );
    }

    #[test]
    fn split_keeps_empty_quoted_word() {
        assert_eq!(
            split_words(r#"edit tax_1 --city """#).unwrap(),
            vec!["edit", "tax_1", "--city", ""]
        );
    }

    #[test]
    fn split_blank_line_is_empty() {
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn split_rejects_unterminated_quote() {
        assert_eq!(split_words(r#"add --name "Ontario"#), Err(SplitError::UnterminatedQuote));
    }
}
