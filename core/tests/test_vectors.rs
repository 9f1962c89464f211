//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Records are handled as untyped JSON so the
//! vectors also pin down that payloads pass through unchanged. Comparing
//! parsed JSON (not raw strings) avoids false negatives from field ordering.

use reciclaje_core::{ApiClient, ApiError, HttpMethod, HttpRequest, HttpResponse};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:5000/api";

fn client() -> ApiClient {
    ApiClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: sim["content_type"]
            .as_str()
            .map(|ct| vec![("content-type".to_string(), ct.to_string())])
            .unwrap_or_default(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, expected: &str, err: ApiError) {
    match expected {
        "Http" => assert!(matches!(err, ApiError::Http { .. }), "{name}: expected Http, got {err:?}"),
        "DuplicateEmail" => assert!(matches!(err, ApiError::DuplicateEmail), "{name}: expected DuplicateEmail"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let req = c.build_list(case["endpoint"].as_str().unwrap());
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_list::<Value>(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            let records = result.unwrap();
            assert_eq!(Value::Array(records), case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let req = c.build_get(case["endpoint"].as_str().unwrap(), id);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_get::<Value>(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            let record = result.unwrap().unwrap_or(Value::Null);
            assert_eq!(record, case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let req = c.build_create(case["endpoint"].as_str().unwrap(), &case["input"]).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let record = c.parse_create::<Value>(simulated_response(&case)).unwrap();
        assert_eq!(record.unwrap_or(Value::Null), case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let req = c.build_update(case["endpoint"].as_str().unwrap(), &case["input"]).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_update::<Value>(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            let record = result.unwrap().unwrap_or(Value::Null);
            assert_eq!(record, case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let req = c.build_delete(case["endpoint"].as_str().unwrap(), id);
        check_request(name, &req, &case["expected_request"]);
        assert!(!req.path.ends_with(&format!("/{id}")), "{name}: id must not be a path segment");

        let result = c.parse_delete(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
