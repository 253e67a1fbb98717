//! services/api/src/web/validation.rs
//!
//! Checks path parameters and JSON bodies before anything reaches the store.
//! Every failing field is reported, path first, then body fields in
//! declaration order.

use crate::web::error::ValidationIssue;
use crate::web::rest::{CreateSummaryPayload, UpdateSummaryPayload};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use text_summarizer_core::domain::{
    SummarizationMethod, SummaryId, DEFAULT_SENTENCE_COUNT, MAX_SENTENCE_COUNT,
    MIN_SENTENCE_COUNT,
};
use url::Url;

pub type Validated<T> = Result<T, Vec<ValidationIssue>>;

const INT_PARSING_MSG: &str = "Input should be a valid integer, unable to parse string as an integer";

fn body_loc(field: &str) -> Vec<Value> {
    vec![json!("body"), json!(field)]
}

/// Combines two independent checks, keeping the issues of both.
pub fn both<A, B>(first: Validated<A>, second: Validated<B>) -> Validated<(A, B)> {
    match (first, second) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (first, second) => {
            let mut issues = first.err().unwrap_or_default();
            issues.extend(second.err().unwrap_or_default());
            Err(issues)
        }
    }
}

//=========================================================================================
// Path Parameters
//=========================================================================================

/// A summary id must be an integer greater than zero.
pub fn summary_id(raw: &str) -> Validated<SummaryId> {
    let loc = vec![json!("path"), json!("id")];
    let id = raw.trim().parse::<SummaryId>().map_err(|_| {
        vec![ValidationIssue::new("int_parsing", loc.clone(), INT_PARSING_MSG, json!(raw))]
    })?;
    if id <= 0 {
        return Err(vec![ValidationIssue::new(
            "greater_than",
            loc,
            "Input should be greater than 0",
            json!(raw),
        )
        .with_ctx(json!({ "gt": 0 }))]);
    }
    Ok(id)
}

//=========================================================================================
// Request Bodies
//=========================================================================================

/// Parses the raw body as a JSON object, whatever the declared content type.
fn json_object(body: &[u8]) -> Validated<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(vec![ValidationIssue::new(
            "missing",
            vec![json!("body")],
            "Field required",
            Value::Null,
        )]);
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        vec![ValidationIssue::new(
            "json_invalid",
            vec![json!("body"), json!(e.column())],
            "JSON decode error",
            json!({}),
        )
        .with_ctx(json!({ "error": e.to_string() }))]
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(vec![ValidationIssue::new(
            "model_attributes_type",
            vec![json!("body")],
            "Input should be a valid dictionary or object to extract fields from",
            other,
        )]),
    }
}

fn missing(field: &str, body: &Map<String, Value>) -> ValidationIssue {
    ValidationIssue::new("missing", body_loc(field), "Field required", Value::Object(body.clone()))
}

/// An absolute `http`/`https` URL, returned in normalized form.
fn http_url(body: &Map<String, Value>) -> Result<String, ValidationIssue> {
    let loc = body_loc("url");
    let raw = match body.get("url") {
        None => return Err(missing("url", body)),
        Some(Value::String(raw)) => raw,
        Some(other) => {
            return Err(ValidationIssue::new(
                "url_type",
                loc,
                "URL input should be a string or URL",
                other.clone(),
            ))
        }
    };

    let url = Url::parse(raw).map_err(|e| {
        ValidationIssue::new(
            "url_parsing",
            loc.clone(),
            format!("Input should be a valid URL, {}", e),
            json!(raw),
        )
        .with_ctx(json!({ "error": e.to_string() }))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationIssue::new(
            "url_scheme",
            loc,
            "URL scheme should be 'http' or 'https'",
            json!(raw),
        )
        .with_ctx(json!({ "expected_schemes": "'http' or 'https'" })));
    }
    Ok(url.to_string())
}

fn expected_methods() -> String {
    let quoted: Vec<String> = SummarizationMethod::ALL
        .iter()
        .map(|m| format!("'{}'", m.as_str()))
        .collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        _ => quoted.join(""),
    }
}

fn summarization_method(body: &Map<String, Value>) -> Result<SummarizationMethod, ValidationIssue> {
    match body.get("summarization_method") {
        None => Ok(SummarizationMethod::default()),
        Some(value) => value
            .as_str()
            .and_then(|name| name.parse().ok())
            .ok_or_else(|| {
                let expected = expected_methods();
                ValidationIssue::new(
                    "enum",
                    body_loc("summarization_method"),
                    format!("Input should be {}", expected),
                    value.clone(),
                )
                .with_ctx(json!({ "expected": expected }))
            }),
    }
}

/// Accepts integers, integral floats and numeric strings, like a lenient JSON schema.
fn sentence_count(body: &Map<String, Value>) -> Result<i32, ValidationIssue> {
    let loc = body_loc("sentence_count");
    let Some(value) = body.get("sentence_count") else {
        return Ok(DEFAULT_SENTENCE_COUNT);
    };

    let number: i64 = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            // Integral values beyond i64 saturate and then fail the bounds below.
            (None, Some(f)) if f.fract() == 0.0 => f as i64,
            (None, Some(_)) => {
                return Err(ValidationIssue::new(
                    "int_from_float",
                    loc,
                    "Input should be a valid integer, got a number with a fractional part",
                    value.clone(),
                ))
            }
            (None, None) => {
                return Err(ValidationIssue::new("int_parsing", loc, INT_PARSING_MSG, value.clone()))
            }
        },
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ValidationIssue::new("int_parsing", loc.clone(), INT_PARSING_MSG, value.clone()))?,
        other => {
            return Err(ValidationIssue::new(
                "int_type",
                loc,
                "Input should be a valid integer",
                other.clone(),
            ))
        }
    };

    if number < i64::from(MIN_SENTENCE_COUNT) {
        return Err(ValidationIssue::new(
            "greater_than_equal",
            loc,
            format!("Input should be greater than or equal to {}", MIN_SENTENCE_COUNT),
            value.clone(),
        )
        .with_ctx(json!({ "ge": MIN_SENTENCE_COUNT })));
    }
    if number > i64::from(MAX_SENTENCE_COUNT) {
        return Err(ValidationIssue::new(
            "less_than_equal",
            loc,
            format!("Input should be less than or equal to {}", MAX_SENTENCE_COUNT),
            value.clone(),
        )
        .with_ctx(json!({ "le": MAX_SENTENCE_COUNT })));
    }
    // Bounds checked above.
    Ok(number as i32)
}

fn required_string(body: &Map<String, Value>, field: &str) -> Result<String, ValidationIssue> {
    match body.get(field) {
        None => Err(missing(field, body)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationIssue::new(
            "string_type",
            body_loc(field),
            "Input should be a valid string",
            other.clone(),
        )),
    }
}

/// Reads checked fields through the payload's serde shape, so the parsed type
/// and its published schema stay one definition.
fn into_payload<T: DeserializeOwned>(fields: Value, body: Map<String, Value>) -> Validated<T> {
    serde_json::from_value(fields).map_err(|e| {
        vec![ValidationIssue::new(
            "value_error",
            vec![json!("body")],
            format!("Value error, {}", e),
            Value::Object(body),
        )]
    })
}

pub fn create_payload(body: &[u8]) -> Validated<CreateSummaryPayload> {
    let body = json_object(body)?;
    let url = http_url(&body);
    let method = summarization_method(&body);
    let count = sentence_count(&body);

    match (url, method, count) {
        (Ok(url), Ok(method), Ok(count)) => into_payload(
            json!({
                "url": url,
                "summarization_method": method.as_str(),
                "sentence_count": count,
            }),
            body,
        ),
        (url, method, count) => Err([url.err(), method.err(), count.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}

pub fn update_payload(body: &[u8]) -> Validated<UpdateSummaryPayload> {
    let body = json_object(body)?;
    let url = http_url(&body);
    let summary = required_string(&body, "update_summary");

    match (url, summary) {
        (Ok(url), Ok(summary)) => into_payload(json!({ "url": url, "update_summary": summary }), body),
        (url, summary) => Err([url.err(), summary.err()].into_iter().flatten().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues<T: std::fmt::Debug>(result: Validated<T>) -> Value {
        json!(result.unwrap_err())
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(summary_id("7").unwrap(), 7);
        assert_eq!(
            issues(summary_id("0")),
            json!([{
                "type": "greater_than",
                "loc": ["path", "id"],
                "msg": "Input should be greater than 0",
                "input": "0",
                "ctx": {"gt": 0}
            }])
        );
        assert_eq!(issues(summary_id("abc"))[0]["type"], "int_parsing");
    }

    #[test]
    fn create_payload_applies_defaults_and_normalizes_the_url() {
        let payload = create_payload(br#"{"url": "https://yahoo.com"}"#).unwrap();
        assert_eq!(payload.url, "https://yahoo.com/");
        assert_eq!(payload.summarization_method, SummarizationMethod::Lsa);
        assert_eq!(payload.sentence_count, 10);
    }

    #[test]
    fn create_payload_reports_a_missing_url() {
        assert_eq!(
            issues(create_payload(b"{}")),
            json!([{"type": "missing", "loc": ["body", "url"], "msg": "Field required", "input": {}}])
        );
    }

    #[test]
    fn relative_urls_are_rejected() {
        assert_eq!(
            issues(create_payload(br#"{"url": "www.article.exmaple.com"}"#)),
            json!([{
                "type": "url_parsing",
                "loc": ["body", "url"],
                "msg": "Input should be a valid URL, relative URL without a base",
                "input": "www.article.exmaple.com",
                "ctx": {"error": "relative URL without a base"}
            }])
        );
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert_eq!(
            issues(create_payload(br#"{"url": "invalid://url"}"#)),
            json!([{
                "type": "url_scheme",
                "loc": ["body", "url"],
                "msg": "URL scheme should be 'http' or 'https'",
                "input": "invalid://url",
                "ctx": {"expected_schemes": "'http' or 'https'"}
            }])
        );
    }

    #[test]
    fn unknown_methods_list_the_valid_ones() {
        assert_eq!(
            issues(create_payload(
                br#"{"url": "https://yahoo.com/", "summarization_method": "invalid_summarizer"}"#
            )),
            json!([{
                "type": "enum",
                "loc": ["body", "summarization_method"],
                "msg": "Input should be 'lsa', 'lex_rank', 'text_rank' or 'edmundson'",
                "input": "invalid_summarizer",
                "ctx": {"expected": "'lsa', 'lex_rank', 'text_rank' or 'edmundson'"}
            }])
        );
    }

    #[test]
    fn sentence_count_is_bounded() {
        assert_eq!(
            issues(create_payload(br#"{"url": "https://yahoo.com/", "sentence_count": 3}"#)),
            json!([{
                "type": "greater_than_equal",
                "loc": ["body", "sentence_count"],
                "msg": "Input should be greater than or equal to 5",
                "input": 3,
                "ctx": {"ge": 5}
            }])
        );
        assert_eq!(
            issues(create_payload(br#"{"url": "https://yahoo.com/", "sentence_count": 31}"#))[0]["type"],
            "less_than_equal"
        );
        let payload =
            create_payload(br#"{"url": "https://yahoo.com/", "sentence_count": "30"}"#).unwrap();
        assert_eq!(payload.sentence_count, 30);
    }

    #[test]
    fn huge_integers_fail_the_bounds_not_the_integer_check() {
        for (raw, kind) in [
            ("18446744073709551615", "less_than_equal"),
            ("1e20", "less_than_equal"),
            ("-1e20", "greater_than_equal"),
        ] {
            let body = format!(r#"{{"url": "https://yahoo.com/", "sentence_count": {}}}"#, raw);
            assert_eq!(issues(create_payload(body.as_bytes()))[0]["type"], kind, "{}", raw);
        }
        let payload =
            create_payload(br#"{"url": "https://yahoo.com/", "sentence_count": 12.0}"#).unwrap();
        assert_eq!(payload.sentence_count, 12);
        assert_eq!(
            issues(create_payload(br#"{"url": "https://yahoo.com/", "sentence_count": 12.5}"#))[0]["type"],
            "int_from_float"
        );
    }

    #[test]
    fn checked_payloads_match_their_serde_shape() {
        let bodies: [&[u8]; 3] = [
            br#"{"url": "https://yahoo.com/"}"#,
            br#"{"url": "https://yahoo.com/", "summarization_method": "text_rank"}"#,
            br#"{"url": "https://yahoo.com/", "summarization_method": "edmundson", "sentence_count": 30}"#,
        ];
        for body in bodies {
            let direct: CreateSummaryPayload = serde_json::from_slice(body).unwrap();
            assert_eq!(create_payload(body).unwrap(), direct);
        }

        let body = br#"{"url": "https://google.com/", "update_summary": "Updated summary"}"#;
        let direct: UpdateSummaryPayload = serde_json::from_slice(body).unwrap();
        assert_eq!(update_payload(body).unwrap(), direct);
    }

    #[test]
    fn every_failing_field_is_reported() {
        let reported = issues(create_payload(
            br#"{"url": 5, "summarization_method": "x", "sentence_count": 2.5}"#,
        ));
        let kinds: Vec<&str> = reported
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["url_type", "enum", "int_from_float"]);
    }

    #[test]
    fn update_payload_requires_both_fields() {
        assert_eq!(
            issues(update_payload(br#"{"url": "https://google.com/"}"#)),
            json!([{
                "type": "missing",
                "loc": ["body", "update_summary"],
                "msg": "Field required",
                "input": {"url": "https://google.com/"}
            }])
        );
        assert_eq!(issues(update_payload(b"{}")).as_array().unwrap().len(), 2);
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert_eq!(issues(create_payload(b"not json"))[0]["type"], "json_invalid");
        assert_eq!(issues(create_payload(b"[1, 2]"))[0]["type"], "model_attributes_type");
        assert_eq!(issues(create_payload(b""))[0]["type"], "missing");
    }

    #[test]
    fn path_issues_come_before_body_issues() {
        let combined = both(summary_id("0"), update_payload(b"{}"));
        let kinds: Vec<String> = combined.unwrap_err().into_iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec!["greater_than", "missing", "missing"]);
    }
}
