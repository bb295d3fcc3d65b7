//! Addition endpoint
//!
//! `GET /suma?dato1=<n>&dato2=<n>` (aliases `a` and `b`).

use hyper::StatusCode;
use serde::{Serialize, Serializer};

use crate::error::ParamError;
use crate::http::{RequestUrl, RouteResponse};

/// Integral values below this print as plain digits; at or above it they
/// switch to exponent notation (`1e+21`)
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// Successful addition payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionResult {
    pub op: &'static str,
    pub by: &'static str,
    #[serde(serialize_with = "serialize_number")]
    pub a: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    #[serde(serialize_with = "serialize_number")]
    pub result: f64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Answer a `/suma` request
pub fn handle_sum(url: &RequestUrl) -> RouteResponse {
    match sum_from_query(url) {
        Ok(sum) => RouteResponse::json(StatusCode::OK, &sum),
        Err(e) => RouteResponse::json(
            StatusCode::BAD_REQUEST,
            &ErrorBody {
                error: e.to_string(),
            },
        ),
    }
}

/// Validate both operands in order and add them
pub fn sum_from_query(url: &RequestUrl) -> Result<AdditionResult, ParamError> {
    let a = operand(url, "dato1", "a")?;
    let b = operand(url, "dato2", "b")?;

    Ok(AdditionResult {
        op: "suma",
        by: "query",
        a,
        b,
        result: add(a, b),
    })
}

/// The alias is consulted only when `name` is absent, not when it is empty
fn operand(url: &RequestUrl, name: &'static str, alias: &str) -> Result<f64, ParamError> {
    match url.param(name).or_else(|| url.param(alias)) {
        None | Some("") => Err(ParamError::Missing(name)),
        Some(raw) => parse_number(raw)
            .filter(|n| n.is_finite())
            .ok_or(ParamError::InvalidNumber(name)),
    }
}

/// Numeric conversion with JavaScript `Number()` rules: surrounding
/// whitespace ignored, blank is zero, `0x`/`0o`/`0b` integer literals
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_integer(&s[2..], radix);
    }

    // Rust also accepts "inf"/"nan" spellings; callers reject non-finite values
    s.parse::<f64>().ok()
}

/// Accumulates exactly and rounds once; only literals wider than 128 bits
/// fall back to step-wise float accumulation
#[allow(clippy::suboptimal_flops, clippy::cast_precision_loss)]
fn parse_radix_integer(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let digit_values = digits
        .chars()
        .map(|c| c.to_digit(radix))
        .collect::<Option<Vec<u32>>>()?;

    let exact = digit_values.iter().try_fold(0_u128, |acc, &d| {
        acc.checked_mul(u128::from(radix))?.checked_add(u128::from(d))
    });
    Some(exact.map_or_else(
        || {
            digit_values
                .iter()
                .fold(0.0_f64, |acc, &d| acc * f64::from(radix) + f64::from(d))
        },
        |n| n as f64,
    ))
}

/// Integral values print without a fraction (`11`, not `11.0`), using the
/// shortest round-trip digits padded with zeros (`123456789012345680000`)
#[allow(
    clippy::trivially_copy_pass_by_ref,
    clippy::float_cmp,
    clippy::cast_possible_truncation
)]
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < PLAIN_INTEGER_LIMIT {
        let integer = shortest_integer(*value).unwrap_or(*value as i128);
        return serializer.serialize_i128(integer);
    }
    serializer.serialize_f64(*value)
}

/// Integer spelled by the shortest round-trip digits of an integral `value`
fn shortest_integer(value: f64) -> Option<i128> {
    // e.g. "-1.2345678901234568e20"
    let formatted = format!("{value:e}");
    let (mantissa, exponent) = formatted.split_once('e')?;
    let exponent: usize = exponent.parse().ok()?;
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let zeros = (exponent + 1).checked_sub(digits.len())?;

    let magnitude: i128 = format!("{digits}{}", "0".repeat(zeros)).parse().ok()?;
    Some(if mantissa.starts_with('-') {
        -magnitude
    } else {
        magnitude
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(target: &str) -> RequestUrl {
        RequestUrl::parse(Some("localhost:3002"), target).unwrap()
    }

    fn body(resp: &RouteResponse) -> serde_json::Value {
        serde_json::from_slice(resp.body()).unwrap()
    }

    #[test]
    fn test_add() {
        assert_eq!(add(5.0, 6.0), 11.0);
        assert_eq!(add(0.1, 0.2), 0.1 + 0.2);
        assert_eq!(add(-1.5, 1.5), 0.0);
    }

    #[test]
    fn test_sum_payload_field_order() {
        let resp = handle_sum(&url("/suma?dato1=5&dato2=6"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.body(),
            br#"{"op":"suma","by":"query","a":5,"b":6,"result":11}"#
        );
    }

    #[test]
    fn test_sum_alias() {
        let sum = sum_from_query(&url("/suma?a=5&b=6")).unwrap();
        assert_eq!(sum.result, 11.0);
    }

    #[test]
    fn test_sum_ieee_results() {
        let cases = [
            ("0.1", "0.2", 0.1 + 0.2),
            ("-3", "1.25", -1.75),
            ("1e3", "2E-1", 1000.0 + 0.2),
            ("+7", ".5", 7.5),
            ("9007199254740993", "0", 9_007_199_254_740_992.0),
        ];
        for (a, b, expected) in cases {
            let sum = sum_from_query(&url(&format!("/suma?dato1={a}&dato2={b}"))).unwrap();
            assert_eq!(sum.result, expected, "{a} + {b}");
        }
    }

    #[test]
    fn test_fraction_serialization() {
        let resp = handle_sum(&url("/suma?dato1=0.1&dato2=0.2"));
        assert_eq!(
            resp.body(),
            br#"{"op":"suma","by":"query","a":0.1,"b":0.2,"result":0.30000000000000004}"#
        );
    }

    #[test]
    fn test_missing_first_operand() {
        let resp = handle_sum(&url("/suma?dato2=6"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&resp)["error"], "Falta el parámetro 'dato1'.");
    }

    #[test]
    fn test_first_error_wins() {
        let resp = handle_sum(&url("/suma?dato1=x"));
        assert_eq!(body(&resp)["error"], "'dato1' debe ser un número válido.");
    }

    #[test]
    fn test_invalid_second_operand() {
        let resp = handle_sum(&url("/suma?dato1=5&dato2=abc"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.body(),
            r#"{"error":"'dato2' debe ser un número válido."}"#.as_bytes()
        );
    }

    #[test]
    fn test_empty_operand_does_not_fall_back_to_alias() {
        assert_eq!(
            sum_from_query(&url("/suma?dato1=&a=5&dato2=1")),
            Err(ParamError::Missing("dato1"))
        );
    }

    #[test]
    fn test_alias_errors_name_canonical_parameter() {
        assert_eq!(
            sum_from_query(&url("/suma?a=1&b=zz")),
            Err(ParamError::InvalidNumber("dato2"))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        for value in ["Infinity", "-Infinity", "NaN", "inf", "1e400"] {
            assert_eq!(
                sum_from_query(&url(&format!("/suma?dato1={value}&dato2=1"))),
                Err(ParamError::InvalidNumber("dato1")),
                "{value}"
            );
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 1 "), Some(1.0));
        assert_eq!(parse_number("   "), Some(0.0));
        assert_eq!(parse_number("0x10"), Some(16.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("0o17"), Some(15.0));
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("-0x10"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("1_000"), None);
    }

    #[test]
    fn test_large_integers_print_without_fraction() {
        let resp = handle_sum(&url("/suma?dato1=9007199254740993&dato2=0"));
        assert_eq!(
            resp.body(),
            br#"{"op":"suma","by":"query","a":9007199254740992,"b":0,"result":9007199254740992}"#
        );

        let resp = handle_sum(&url("/suma?dato1=-123456789012345678901&dato2=0"));
        assert!(std::str::from_utf8(resp.body())
            .unwrap()
            .ends_with(r#""result":-123456789012345680000}"#));

        let resp = handle_sum(&url("/suma?dato1=5e20&dato2=0"));
        assert!(std::str::from_utf8(resp.body())
            .unwrap()
            .ends_with(r#""result":500000000000000000000}"#));
    }

    #[test]
    fn test_shortest_integer() {
        assert_eq!(shortest_integer(11.0), Some(11));
        assert_eq!(shortest_integer(0.0), Some(0));
        assert_eq!(shortest_integer(-0.0), Some(0));
        assert_eq!(shortest_integer(-250.0), Some(-250));
        assert_eq!(shortest_integer(5e20), Some(500_000_000_000_000_000_000));
    }

    #[test]
    fn test_overflowing_sum_renders_null() {
        let resp = handle_sum(&url("/suma?dato1=1e308&dato2=1e308"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(&resp)["result"], serde_json::Value::Null);
        assert!(std::str::from_utf8(resp.body())
            .unwrap()
            .ends_with(r#""result":null}"#));
    }

    #[test]
    fn test_radix_literals_round_once() {
        // 2^53 + 1 rounds to even
        assert_eq!(parse_number("0x20000000000001"), Some(9_007_199_254_740_992.0));
        // 2^64 + 1 needs more than 64 bits before rounding
        assert_eq!(
            parse_number("0x10000000000000001"),
            Some(18_446_744_073_709_551_616.0)
        );
        assert_eq!(
            parse_number("0x1fffffffffffff"),
            Some(9_007_199_254_740_991.0)
        );
        // wider than 128 bits still parses as a finite float
        let wide = parse_number(&format!("0x1{}", "0".repeat(34))).unwrap();
        assert!(wide.is_finite());
        assert!((wide / 2f64.powi(136) - 1.0).abs() < 1e-12);
        assert_eq!(parse_number("0x1g"), None);
    }

    #[test]
    fn test_whitespace_and_hex_operands() {
        let sum = sum_from_query(&url("/suma?dato1=0x10&dato2=%201%20")).unwrap();
        assert_eq!(sum.result, 17.0);
    }
}
