use crate::core::errors::{ErrorKind, ExchangeError};
use serde_json::Value;

/// Substring rules, checked in order; the first match wins
const BROAD: &[(&str, ErrorKind)] = &[
    ("Invalid pair name", ErrorKind::Exchange),
    ("invalid api key", ErrorKind::Authentication),
    ("invalid sign", ErrorKind::Authentication),
    (
        "api key dont have trade permission",
        ErrorKind::Authentication,
    ),
    ("invalid parameter", ErrorKind::InvalidOrder),
    ("invalid order", ErrorKind::InvalidOrder),
    (
        "The given order has already been cancelled",
        ErrorKind::InvalidOrder,
    ),
    ("Requests too often", ErrorKind::DdosProtection),
    ("not available", ErrorKind::ExchangeNotAvailable),
    ("data unavailable", ErrorKind::ExchangeNotAvailable),
    ("external service unavailable", ErrorKind::ExchangeNotAvailable),
    ("Total transaction amount", ErrorKind::InvalidOrder),
    (
        "The given order has already been closed and cannot be cancelled",
        ErrorKind::InvalidOrder,
    ),
    ("Insufficient funds", ErrorKind::InsufficientFunds),
    ("invalid key", ErrorKind::Authentication),
    ("invalid nonce", ErrorKind::InvalidNonce),
    (
        "Total order amount is less than minimal amount",
        ErrorKind::InvalidOrder,
    ),
    ("Rate Limited", ErrorKind::RateLimitExceeded),
];

/// Normalize the envelope's `success` flag
///
/// Booleans are taken as is, numbers are true when non-zero, strings only for
/// `"true"` and `"1"`. Anything else (null, objects, arrays) counts as failure.
pub fn is_success(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => text == "true" || text == "1",
        _ => false,
    }
}

/// Exact lookup shared by error codes and whole error messages
pub fn exact_match(key: &str) -> Option<ErrorKind> {
    match key {
        "803" | "804" | "805" | "806" | "807" => Some(ErrorKind::InvalidOrder),
        "831" | "832" => Some(ErrorKind::InsufficientFunds),
        "833" => Some(ErrorKind::OrderNotFound),
        _ => None,
    }
}

pub fn broad_match(message: &str) -> Option<ErrorKind> {
    BROAD
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, kind)| *kind)
}

fn string_field(response: &Value, key: &str) -> Option<String> {
    match response.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Classify a failed envelope
///
/// Order: exact code, exact message, then broad message match. Unrecognized
/// failures become a generic exchange error. Every error carries `yobit <body>`.
pub fn classify(body: &str, response: &Value) -> ExchangeError {
    let feedback = format!("yobit {}", body);
    let code = string_field(response, "code");
    let message = string_field(response, "error");

    code.as_deref()
        .and_then(exact_match)
        .or_else(|| message.as_deref().and_then(exact_match))
        .or_else(|| message.as_deref().and_then(broad_match))
        .unwrap_or(ErrorKind::Exchange)
        .into_error(feedback)
}

/// Fail when the response carries a falsy `success` flag
///
/// Responses without the flag (public endpoints) pass through.
pub fn handle_errors(body: &str, response: &Value) -> Result<(), ExchangeError> {
    match response.get("success") {
        Some(flag) if !is_success(flag) => Err(classify(body, response)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fail(response: Value) -> ExchangeError {
        let body = response.to_string();
        handle_errors(&body, &response).unwrap_err()
    }

    #[test]
    fn test_success_coercion() {
        assert!(is_success(&json!(true)));
        assert!(is_success(&json!(1)));
        assert!(is_success(&json!("1")));
        assert!(is_success(&json!("true")));
        assert!(!is_success(&json!(false)));
        assert!(!is_success(&json!(0)));
        assert!(!is_success(&json!("0")));
        assert!(!is_success(&json!("false")));
        assert!(!is_success(&Value::Null));
    }

    #[test]
    fn test_success_variants_pass_through() {
        for flag in [json!(1), json!("1"), json!(true), json!("true")] {
            let response = json!({"success": flag, "return": {}});
            assert!(handle_errors(&response.to_string(), &response).is_ok());
        }
        let public = json!({"ltc_btc": {"last": 0.1}});
        assert!(handle_errors(&public.to_string(), &public).is_ok());
    }

    #[test]
    fn test_exact_code_match() {
        assert!(matches!(
            fail(json!({"success": 0, "code": 803, "error": "whatever"})),
            ExchangeError::InvalidOrder(_)
        ));
        assert!(matches!(
            fail(json!({"success": 0, "code": "832", "error": "whatever"})),
            ExchangeError::InsufficientFunds(_)
        ));
        assert!(matches!(
            fail(json!({"success": 0, "code": 833})),
            ExchangeError::OrderNotFound(_)
        ));
    }

    #[test]
    fn test_exact_code_beats_broad_message() {
        let err = fail(json!({"success": 0, "code": 833, "error": "invalid api key"}));
        assert!(matches!(err, ExchangeError::OrderNotFound(_)));
    }

    #[test]
    fn test_broad_matches() {
        let cases = [
            ("invalid api key", "auth"),
            ("invalid sign", "auth"),
            ("api key dont have trade permission", "auth"),
            ("Insufficient funds in wallet of the first currency of the pair", "funds"),
            ("invalid nonce (has already been used)", "nonce"),
            ("Requests too often", "ddos"),
            ("Rate Limited", "rate"),
            ("Service data unavailable", "na"),
            ("Invalid pair name: foo_bar", "exchange"),
            ("Total order amount is less than minimal amount", "order"),
        ];
        for (message, expected) in cases {
            let err = fail(json!({"success": 0, "error": message}));
            let actual = match err {
                ExchangeError::AuthError(_) => "auth",
                ExchangeError::InsufficientFunds(_) => "funds",
                ExchangeError::InvalidNonce(_) => "nonce",
                ExchangeError::DdosProtection(_) => "ddos",
                ExchangeError::RateLimitExceeded(_) => "rate",
                ExchangeError::ExchangeNotAvailable(_) => "na",
                ExchangeError::Exchange(_) => "exchange",
                ExchangeError::InvalidOrder(_) => "order",
                other => panic!("unexpected error for {}: {:?}", message, other),
            };
            assert_eq!(actual, expected, "message: {}", message);
        }
    }

    #[test]
    fn test_broad_match_is_first_in_order() {
        // "invalid api key" precedes "invalid key" and "invalid nonce"
        assert_eq!(
            broad_match("invalid api key, invalid nonce"),
            Some(ErrorKind::Authentication)
        );
        assert_eq!(
            broad_match("The given order has already been cancelled"),
            Some(ErrorKind::InvalidOrder)
        );
    }

    #[test]
    fn test_unmatched_error_is_generic_with_body() {
        let response = json!({"success": 0, "error": "something odd"});
        let body = response.to_string();
        let err = handle_errors(&body, &response).unwrap_err();
        match err {
            ExchangeError::Exchange(message) => {
                assert!(message.starts_with("yobit "));
                assert!(message.contains(&body));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_failure_without_message() {
        assert!(matches!(
            fail(json!({"success": "0"})),
            ExchangeError::Exchange(_)
        ));
    }
}
