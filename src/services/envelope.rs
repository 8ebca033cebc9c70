// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TourAPI response envelope validation.
//!
//! TourAPI reports failures inside a 200 response:
//!
//! ```json
//! {"response": {"header": {"resultCode": "0000", "resultMsg": "OK"},
//!               "body": {"items": {"item": [...]}, "numOfRows": 10,
//!                        "pageNo": 1, "totalCount": 42}}}
//! ```
//!
//! `items` is `""` when there are no results, and `item` is a bare object
//! when there is exactly one. [`normalize_items`] is the only place that
//! deals with either quirk.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Result codes TourAPI uses for success.
const SUCCESS_CODES: &[&str] = &["0000", "00", "0"];

/// Error names the data.go.kr gateway puts in non-JSON (XML) error bodies.
const GATEWAY_AUTH_ERRORS: &[&str] = &[
    "SERVICE_KEY_IS_NOT_REGISTERED_ERROR",
    "SERVICE_ACCESS_DENIED_ERROR",
    "DEADLINE_HAS_EXPIRED_ERROR",
    "UNREGISTERED_IP_ERROR",
];
const GATEWAY_QUOTA_ERROR: &str = "LIMITED_NUMBER_OF_SERVICE_REQUESTS_EXCEEDS_ERROR";

#[derive(Debug, Deserialize)]
struct Envelope {
    response: EnvelopeResponse,
}

#[derive(Debug, Deserialize)]
struct EnvelopeResponse {
    header: EnvelopeHeader,
    #[serde(default)]
    body: Option<ResponseBody>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    #[serde(rename = "resultCode", deserialize_with = "lenient_string")]
    result_code: String,
    #[serde(rename = "resultMsg", default)]
    result_msg: String,
}

/// Some gateway errors carry the result header at the top level.
#[derive(Debug, Deserialize)]
struct FlatHeader {
    #[serde(rename = "resultCode", deserialize_with = "lenient_string")]
    result_code: String,
    #[serde(rename = "resultMsg", default)]
    result_msg: String,
}

/// Validated response body.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    items: Value,
    #[serde(rename = "numOfRows", default, deserialize_with = "lenient_u32")]
    pub num_of_rows: u32,
    #[serde(rename = "pageNo", default, deserialize_with = "lenient_u32")]
    pub page_no: u32,
    #[serde(rename = "totalCount", default, deserialize_with = "lenient_u32")]
    pub total_count: u32,
}

impl ResponseBody {
    /// Decode the result items into `T`, normalizing the container shape.
    pub fn into_items<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        normalize_items(self.items)
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| AppError::TourApi {
                    code: "PARSE".to_string(),
                    message: format!("Unexpected item shape: {}", e),
                })
            })
            .collect()
    }
}

/// Coerce the `items` field into a list of item objects.
///
/// - missing, `""` or no `item` key: empty
/// - `item` is an object: one element
/// - `item` is an array: as is
pub fn normalize_items(items: Value) -> Vec<Value> {
    let Value::Object(mut map) = items else {
        return Vec::new();
    };

    match map.remove("item") {
        Some(Value::Array(list)) => list,
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

/// Parse a raw response body and check the provider result code.
pub fn validate(raw: &str) -> Result<ResponseBody, AppError> {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(parse_err) => {
            if let Ok(flat) = serde_json::from_str::<FlatHeader>(raw) {
                let code = flat.result_code.trim();
                if !code.is_empty() && !SUCCESS_CODES.contains(&code) {
                    return Err(classify_result_code(code, &flat.result_msg));
                }
            }
            return Err(classify_unparsed(raw, &parse_err));
        }
    };

    let header = envelope.response.header;
    let code = header.result_code.trim();

    if SUCCESS_CODES.contains(&code) {
        return Ok(envelope.response.body.unwrap_or_default());
    }

    Err(classify_result_code(code, &header.result_msg))
}

/// Map a non-success provider result code to an error.
pub fn classify_result_code(code: &str, message: &str) -> AppError {
    match code {
        "30" => AppError::TourApiAuth(format!("등록되지 않은 서비스 키입니다 ({})", message)),
        "31" => AppError::TourApiAuth(format!("서비스 키 사용 기간이 만료되었습니다 ({})", message)),
        "20" => AppError::TourApiAuth(format!("서비스 접근이 거부되었습니다 ({})", message)),
        "32" => AppError::TourApiAuth(format!("등록되지 않은 IP입니다 ({})", message)),
        "10" => AppError::BadRequest(format!("잘못된 요청 파라미터입니다 ({})", message)),
        "11" => AppError::BadRequest(format!("필수 요청 파라미터가 없습니다 ({})", message)),
        "22" => AppError::RateLimited(format!("서비스 요청 제한 횟수를 초과했습니다 ({})", message)),
        _ => AppError::TourApi {
            code: code.to_string(),
            message: message.to_string(),
        },
    }
}

/// Non-JSON bodies are gateway errors; match them by name.
fn classify_unparsed(raw: &str, parse_err: &serde_json::Error) -> AppError {
    if let Some(name) = GATEWAY_AUTH_ERRORS.iter().find(|name| raw.contains(*name)) {
        return AppError::TourApiAuth(name.to_string());
    }
    if raw.contains(GATEWAY_QUOTA_ERROR) {
        return AppError::RateLimited(GATEWAY_QUOTA_ERROR.to_string());
    }

    let preview: String = raw.chars().take(200).collect();
    tracing::warn!(error = %parse_err, body = %preview, "Unparseable TourAPI response");
    AppError::TourApi {
        code: "PARSE".to_string(),
        message: parse_err.to_string(),
    }
}

// ─── Lenient field decoding ──────────────────────────────────────────────────
// TourAPI sends some values as strings in one endpoint and numbers in another.

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(opt_string(d)?.unwrap_or_default())
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Optional string field: numbers are stringified, blank strings are `None`.
pub(crate) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn envelope(code: &str, msg: &str, items: Value) -> String {
        json!({
            "response": {
                "header": {"resultCode": code, "resultMsg": msg},
                "body": {"items": items, "numOfRows": 10, "pageNo": 1, "totalCount": 1}
            }
        })
        .to_string()
    }

    #[test]
    fn test_single_object_matches_array_form() {
        let item = json!({"contentid": "126508", "title": "경복궁"});
        let single = normalize_items(json!({ "item": item.clone() }));
        let array = normalize_items(json!({ "item": [item] }));
        assert_eq!(single.len(), 1);
        assert_eq!(single, array);
    }

    #[test]
    fn test_empty_items_shapes() {
        assert!(normalize_items(json!("")).is_empty());
        assert!(normalize_items(Value::Null).is_empty());
        assert!(normalize_items(json!({})).is_empty());
    }

    #[test]
    fn test_success_envelope() {
        let body = validate(&envelope("0000", "OK", json!({"item": [{"a": 1}, {"a": 2}]}))).unwrap();
        assert_eq!(body.total_count, 1);
        let items: Vec<Value> = body.into_items().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_terminal_codes() {
        let err = validate(&envelope("30", "SERVICE_KEY_IS_NOT_REGISTERED_ERROR", json!(""))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!err.can_retry());

        let err = validate(&envelope("11", "NO_MANDATORY_REQUEST_PARAMETERS_ERROR", json!(""))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_quota_code_is_retryable() {
        let err = validate(&envelope("22", "LIMITED", json!(""))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimit);
    }

    #[test]
    fn test_unknown_code_keeps_details() {
        match validate(&envelope("99", "UNKNOWN_ERROR", json!(""))).unwrap_err() {
            AppError::TourApi { code, message } => {
                assert_eq!(code, "99");
                assert_eq!(message, "UNKNOWN_ERROR");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_gateway_xml_error() {
        let xml = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg>\
                   <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
                   <returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>";
        assert_eq!(validate(xml).unwrap_err().kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_top_level_result_header() {
        let raw = json!({"resultCode": "10", "resultMsg": "INVALID_REQUEST_PARAMETER_ERROR"}).to_string();
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.can_retry());

        let raw = json!({"resultCode": 30, "resultMsg": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR"}).to_string();
        assert_eq!(validate(&raw).unwrap_err().kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_top_level_success_code_without_body_is_unparsed() {
        let raw = json!({"resultCode": "0000", "resultMsg": "OK"}).to_string();
        match validate(&raw).unwrap_err() {
            AppError::TourApi { code, .. } => assert_eq!(code, "PARSE"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_count_reads_as_zero() {
        let raw = json!({
            "response": {
                "header": {"resultCode": "0000", "resultMsg": "OK"},
                "body": {"items": "", "numOfRows": 10, "pageNo": 1, "totalCount": 5_000_000_000u64}
            }
        })
        .to_string();
        let body = validate(&raw).unwrap();
        assert_eq!(body.total_count, 0);
        assert_eq!(body.num_of_rows, 10);
    }

    #[test]
    fn test_numeric_result_code() {
        let raw = json!({"response": {"header": {"resultCode": 0, "resultMsg": "OK"}}}).to_string();
        let body = validate(&raw).unwrap();
        let items: Vec<Value> = body.into_items().unwrap();
        assert!(items.is_empty());
    }
}
