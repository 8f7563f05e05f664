// ABOUTME: Opaque continuation cursor codec
// ABOUTME: Maps an OrderingKey to and from an unpadded URL-safe base-64 token

//! Cursor wire format.
//!
//! A cursor is `base64url_nopad("<nanoseconds>|<uuid>")`, where `<nanoseconds>`
//! is the signed decimal count of UTC nanoseconds since the Unix epoch and
//! `<uuid>` is the lowercase hyphenated form of the row id. Neither field can
//! contain `|`, so the separator is unambiguous.
//!
//! Decoding only accepts tokens in exactly that form, so each key has one
//! token: a `+` sign, leading zeros or uppercase hex are rejected.
//!
//! The token is a pure function of the key: no secrets, no server identity,
//! so any process of a deployment can decode what another one issued.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use uuid::Uuid;

use crate::constants::MAX_CURSOR_LEN;
use crate::error::CursorError;
use crate::key::OrderingKey;

const SEPARATOR: char = '|';

/// Length of a lowercase hyphenated UUID
const CANONICAL_ID_LEN: usize = 36;

/// Encode an ordering key as an opaque cursor token
pub fn encode_cursor(key: &OrderingKey) -> String {
    let payload = format!("{}{}{}", key.nanos(), SEPARATOR, key.id().hyphenated());
    URL_SAFE_NO_PAD.encode(payload.as_bytes())
}

/// Decode a cursor token back into the ordering key it was built from.
///
/// Checks run in a fixed order and the first failure wins: blank input,
/// oversized token, base-64, payload shape, timestamp, identifier.
pub fn decode_cursor(token: &str) -> Result<OrderingKey, CursorError> {
    if token.trim().is_empty() {
        return Err(CursorError::Empty);
    }

    if token.len() > MAX_CURSOR_LEN {
        return Err(CursorError::Malformed(format!(
            "token is {} characters, max {}",
            token.len(),
            MAX_CURSOR_LEN
        )));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| CursorError::Malformed(e.to_string()))?;

    let payload = String::from_utf8(bytes)
        .map_err(|_| CursorError::Malformed("payload is not UTF-8".to_string()))?;

    let mut parts = payload.split(SEPARATOR);
    let (Some(nanos_part), Some(id_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CursorError::Malformed(
            "expected <timestamp>|<id>".to_string(),
        ));
    };

    let nanos: i64 = nanos_part
        .parse()
        .ok()
        .filter(|nanos: &i64| nanos.to_string() == nanos_part)
        .ok_or_else(|| CursorError::InvalidTimestamp(nanos_part.to_string()))?;

    // Braced, URN and simple forms all have a different length
    if id_part.len() != CANONICAL_ID_LEN {
        return Err(CursorError::InvalidIdentifier(id_part.to_string()));
    }
    let id = Uuid::try_parse(id_part)
        .ok()
        .filter(|id| id.hyphenated().to_string() == id_part)
        .ok_or_else(|| CursorError::InvalidIdentifier(id_part.to_string()))?;

    Ok(OrderingKey::from_nanos(nanos, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn id(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    fn b64(payload: &str) -> String {
        URL_SAFE_NO_PAD.encode(payload)
    }

    fn round_trip(timestamp: DateTime<Utc>, id: Uuid) {
        let key = OrderingKey::new(&timestamp, id).unwrap();
        let cursor = encode_cursor(&key);
        assert!(!cursor.is_empty());

        let decoded = decode_cursor(&cursor).unwrap();
        assert_eq!(decoded, key);
        assert_eq!(decoded.timestamp(), timestamp);
        assert_eq!(decoded.id(), id);
    }

    #[rstest]
    #[case::normal(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(), "123e4567-e89b-12d3-a456-426614174000")]
    #[case::nil_id(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(), "00000000-0000-0000-0000-000000000000")]
    #[case::max_id(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap(), "ffffffff-ffff-ffff-ffff-ffffffffffff")]
    #[case::sub_second(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 45).unwrap() + Duration::nanoseconds(123_456_789), "f47ac10b-58cc-4372-a567-0e02b2c3d479")]
    #[case::end_of_year(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap() + Duration::nanoseconds(999_999_999), "f47ac10b-58cc-4372-a567-0e02b2c3d479")]
    #[case::year_2099(Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 59).unwrap() + Duration::nanoseconds(999_999_999), "6ba7b810-9dad-11d1-80b4-00c04fd430c8")]
    #[case::one_nanosecond_after_epoch(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap() + Duration::nanoseconds(1), "6ba7b810-9dad-11d1-80b4-00c04fd430c8")]
    #[case::before_epoch(Utc.with_ymd_and_hms(1901, 7, 4, 8, 0, 0).unwrap() + Duration::nanoseconds(42), "6ba7b810-9dad-11d1-80b4-00c04fd430c8")]
    fn test_round_trip(#[case] timestamp: DateTime<Utc>, #[case] raw_id: &str) {
        round_trip(timestamp, id(raw_id));
    }

    #[test]
    fn test_round_trip_current_time_random_id() {
        round_trip(Utc::now(), Uuid::new_v4());
    }

    #[test]
    fn test_wire_format() {
        let key = OrderingKey::from_nanos(
            1_704_110_400_000_000_000,
            id("123e4567-e89b-12d3-a456-426614174000"),
        );
        let payload = URL_SAFE_NO_PAD.decode(encode_cursor(&key)).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            "1704110400000000000|123e4567-e89b-12d3-a456-426614174000"
        );
    }

    #[test]
    fn test_uppercase_ids_encode_canonically() {
        let key = OrderingKey::from_nanos(7, id("123E4567-E89B-12D3-A456-426614174000"));
        let payload = URL_SAFE_NO_PAD.decode(encode_cursor(&key)).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            "7|123e4567-e89b-12d3-a456-426614174000"
        );
    }

    #[test]
    fn test_timezone_normalization() {
        let cst = FixedOffset::east_opt(8 * 3600).unwrap();
        let local = cst.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap();
        let raw_id = Uuid::new_v4();

        let cursor = encode_cursor(&OrderingKey::new(&local, raw_id).unwrap());
        let decoded = decode_cursor(&cursor).unwrap();

        assert_eq!(
            decoded.timestamp().timestamp_nanos_opt(),
            local.with_timezone(&Utc).timestamp_nanos_opt()
        );
        assert_eq!(decoded.timestamp().timezone(), Utc);
        assert_eq!(decoded.id(), raw_id);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let raw_id = id("123e4567-e89b-12d3-a456-426614174000");

        let first = encode_cursor(&OrderingKey::new(&t, raw_id).unwrap());
        let second = encode_cursor(&OrderingKey::new(&t, raw_id).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_keys_give_distinct_cursors() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let raw_id = id("123e4567-e89b-12d3-a456-426614174000");
        let other_id = id("123e4567-e89b-12d3-a456-426614174001");

        let base = encode_cursor(&OrderingKey::new(&t, raw_id).unwrap());
        let later =
            encode_cursor(&OrderingKey::new(&(t + Duration::nanoseconds(1)), raw_id).unwrap());
        let other = encode_cursor(&OrderingKey::new(&t, other_id).unwrap());

        assert_ne!(base, later);
        assert_ne!(base, other);
    }

    #[test]
    fn test_cursor_is_url_safe() {
        // Sweep enough keys that every base-64 position sees varied input
        for i in 0..512_i64 {
            let key = OrderingKey::from_nanos(i * 7_919_000_003 - 1_000_000, Uuid::new_v4());
            let cursor = encode_cursor(&key);
            assert!(!cursor.contains('+'), "{cursor}");
            assert!(!cursor.contains('/'), "{cursor}");
            assert!(!cursor.contains('='), "{cursor}");
        }
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   \t")]
    fn test_blank_cursor_is_empty(#[case] token: &str) {
        assert_eq!(decode_cursor(token), Err(CursorError::Empty));
    }

    #[rstest]
    #[case::invalid_alphabet("invalid-base64!@#")]
    #[case::standard_alphabet("ab+/")]
    #[case::padding("MTIz=")]
    #[case::truncated_group("M")]
    fn test_garbage_is_malformed(#[case] token: &str) {
        assert!(matches!(decode_cursor(token), Err(CursorError::Malformed(_))));
    }

    #[test]
    fn test_oversized_token_is_malformed() {
        let token = "A".repeat(MAX_CURSOR_LEN + 1);
        assert!(matches!(decode_cursor(&token), Err(CursorError::Malformed(_))));
    }

    #[test]
    fn test_non_utf8_payload_is_malformed() {
        let token = URL_SAFE_NO_PAD.encode([0xff, 0xfe, b'|', 0xfd]);
        assert!(matches!(decode_cursor(&token), Err(CursorError::Malformed(_))));
    }

    #[test]
    fn test_missing_separator_is_bad_cursor() {
        let err = decode_cursor("MTcwNDE3NjQwMDAwMDAwMDAwMHNvbWV0aGluZw").unwrap_err();
        assert!(matches!(err, CursorError::Malformed(_)));
        assert!(err.to_string().contains("bad cursor"));
    }

    #[test]
    fn test_extra_separator_is_malformed() {
        let token = b64("1|123e4567-e89b-12d3-a456-426614174000|extra");
        assert!(matches!(decode_cursor(&token), Err(CursorError::Malformed(_))));
    }

    #[rstest]
    #[case::word("invalid_timestamp|123e4567-e89b-12d3-a456-426614174000")]
    #[case::float("1.5|123e4567-e89b-12d3-a456-426614174000")]
    #[case::empty_part("|123e4567-e89b-12d3-a456-426614174000")]
    #[case::overflow("99999999999999999999|123e4567-e89b-12d3-a456-426614174000")]
    #[case::plus_sign("+5|123e4567-e89b-12d3-a456-426614174000")]
    #[case::leading_zero("05|123e4567-e89b-12d3-a456-426614174000")]
    #[case::negative_zero("-0|123e4567-e89b-12d3-a456-426614174000")]
    fn test_invalid_timestamp(#[case] payload: &str) {
        assert!(matches!(
            decode_cursor(&b64(payload)),
            Err(CursorError::InvalidTimestamp(_))
        ));
    }

    #[rstest]
    #[case::word("1704176400000000000|invalid-uuid")]
    #[case::empty_part("1704176400000000000|")]
    #[case::simple_form("1704176400000000000|123e4567e89b12d3a456426614174000")]
    #[case::braced_form("1704176400000000000|{123e4567-e89b-12d3-a456-426614174000}")]
    #[case::bad_hex("1704176400000000000|123e4567-e89b-12d3-a456-42661417400g")]
    #[case::uppercase_hex("1704176400000000000|123E4567-E89B-12D3-A456-426614174000")]
    fn test_invalid_identifier(#[case] payload: &str) {
        assert!(matches!(
            decode_cursor(&b64(payload)),
            Err(CursorError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_each_key_has_exactly_one_token() {
        let key = OrderingKey::from_nanos(5, id("123e4567-e89b-12d3-a456-426614174000"));
        let canonical = encode_cursor(&key);
        assert_eq!(decode_cursor(&canonical), Ok(key));

        for variant in [
            "5|123E4567-e89b-12d3-a456-426614174000",
            "+5|123e4567-e89b-12d3-a456-426614174000",
            "005|123e4567-e89b-12d3-a456-426614174000",
        ] {
            let token = b64(variant);
            assert_ne!(token, canonical);
            assert!(decode_cursor(&token).is_err(), "{variant} was accepted");
        }
    }

    #[test]
    fn test_negative_timestamps_decode() {
        let key = OrderingKey::from_nanos(-42, id("123e4567-e89b-12d3-a456-426614174000"));
        assert_eq!(decode_cursor(&b64("-42|123e4567-e89b-12d3-a456-426614174000")), Ok(key));
    }

    #[test]
    fn test_timestamp_is_checked_before_identifier() {
        let token = b64("not-a-number|not-an-id");
        assert!(matches!(
            decode_cursor(&token),
            Err(CursorError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_known_tokens_from_fixtures() {
        // "invalid_timestamp|123e4567-e89b-12d3-a456-426614174000"
        let token = "aW52YWxpZF90aW1lc3RhbXB8MTIzZTQ1NjctZTg5Yi0xMmQzLWE0NTYtNDI2NjE0MTc0MDAw";
        assert!(matches!(
            decode_cursor(token),
            Err(CursorError::InvalidTimestamp(_))
        ));

        // "1704176400000000000|invalid-uuid"
        let token = "MTcwNDE3NjQwMDAwMDAwMDAwMHxpbnZhbGlkLXV1aWQ";
        assert!(matches!(
            decode_cursor(token),
            Err(CursorError::InvalidIdentifier(_))
        ));
    }
}
