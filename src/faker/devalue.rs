//! Lossless string encoding for 64-bit integers.
//!
//! Uses the flat devalue layout: a one-element array whose only entry is the
//! tagged pair `["BigInt", "<decimal digits>"]`.

const TAG: &str = "BigInt";

/// Encode `value` as `[["BigInt","<digits>"]]`
#[must_use]
pub fn stringify_bigint(value: i128) -> String {
    format!("[[\"{TAG}\",\"{value}\"]]")
}

/// Decode a string produced by [`stringify_bigint`].
///
/// Returns `None` for anything that is not a devalue bigint.
#[must_use]
pub fn parse_bigint(encoded: &str) -> Option<i128> {
    let parsed: serde_json::Value = serde_json::from_str(encoded).ok()?;
    let outer = parsed.as_array()?;
    if outer.len() != 1 {
        return None;
    }
    let pair = outer[0].as_array()?;
    match pair.as_slice() {
        [tag, digits] if tag.as_str() == Some(TAG) => digits.as_str()?.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringify_layout() {
        assert_eq!(stringify_bigint(0), "[[\"BigInt\",\"0\"]]");
        assert_eq!(stringify_bigint(-5), "[[\"BigInt\",\"-5\"]]");
    }

    #[test]
    fn test_round_trip_beyond_double_precision() {
        let n: i128 = 9_007_199_254_740_993;
        assert_eq!(parse_bigint(&stringify_bigint(n)), Some(n));
        assert_eq!(parse_bigint(&stringify_bigint(i64::MIN as i128)), Some(i64::MIN as i128));
        assert_eq!(parse_bigint(&stringify_bigint(u64::MAX as i128)), Some(u64::MAX as i128));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert_eq!(parse_bigint("42"), None);
        assert_eq!(parse_bigint("[[\"Date\",\"1\"]]"), None);
        assert_eq!(parse_bigint("[[\"BigInt\",\"x\"]]"), None);
        assert_eq!(parse_bigint("[[\"BigInt\",\"1\"],[\"BigInt\",\"2\"]]"), None);
        assert_eq!(parse_bigint("not json"), None);
    }
}
