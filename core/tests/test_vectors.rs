//! Verify request building against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file lists named cases with inputs and the expected derived
//! value (method, request URI or formatted request headers).

use reqctx_core::{HttpMethod, RequestContext, RequestError};

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

#[test]
fn method_test_vectors() {
    let raw = include_str!("../../test-vectors/methods.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();

        let mut ctx = RequestContext::new("http://example.com");
        let result = ctx.set_method_name(input).map(|c| c.method());

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "InvalidMethod" => assert!(
                    matches!(err, RequestError::InvalidMethod(ref m) if m == input),
                    "{name}: expected InvalidMethod"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            assert_eq!(ctx.method(), HttpMethod::Get, "{name}: method unchanged");
        } else {
            let method = result.unwrap();
            assert_eq!(method.as_str(), case["expected"].as_str().unwrap(), "{name}: method");
        }
    }
}

// ---------------------------------------------------------------------------
// Request URI
// ---------------------------------------------------------------------------

#[test]
fn request_uri_test_vectors() {
    let raw = include_str!("../../test-vectors/request_uri.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = case["params"].as_object().unwrap().clone();

        let mut ctx = RequestContext::new(case["uri"].as_str().unwrap());
        ctx.set_request_parameters(params);

        assert_eq!(ctx.request_uri(), case["expected"].as_str().unwrap(), "{name}: request uri");
        assert_eq!(ctx.uri(), case["uri"].as_str().unwrap(), "{name}: uri untouched");
    }
}

// ---------------------------------------------------------------------------
// Request headers
// ---------------------------------------------------------------------------

#[test]
fn header_test_vectors() {
    let raw = include_str!("../../test-vectors/headers.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let mut ctx = RequestContext::new("http://example.com");
        if let Some(content_type) = case.get("content_type") {
            ctx.set_content_type(content_type.as_str().unwrap());
        }
        if let Some(charset) = case.get("charset") {
            ctx.set_charset(charset.as_str().unwrap());
        }
        for pair in case["headers"].as_array().unwrap() {
            let pair = pair.as_array().unwrap();
            ctx.set_header(pair[0].as_str().unwrap(), pair[1].as_str().unwrap());
        }

        let expected: Vec<String> = case["expected"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l.as_str().unwrap().to_string())
            .collect();
        assert_eq!(ctx.request_headers().lines(), expected, "{name}: headers");
    }
}
