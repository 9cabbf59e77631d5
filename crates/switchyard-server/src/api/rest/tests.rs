//! Tests for REST API components

#![cfg(test)]

use super::conversions::*;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use switchyard_core::FilterOperator;
use switchyard_runtime::{
    DestinationResponse, FilteringOutcome, ForwardErrorKind, ForwardingOutcome, PipelineOutcome,
    RoutingOutcome, RuleResult,
};

fn filtering(passed: bool) -> FilteringOutcome {
    FilteringOutcome {
        passed,
        rules_evaluated: 1,
        rule_results: vec![RuleResult {
            field: "objectType".to_string(),
            operator: FilterOperator::Equals,
            rule_value: json!("alert"),
            extracted_value: json!("alert"),
            passed,
            error: None,
        }],
        default_action_applied: !passed,
        error_message: None,
    }
}

fn routing(success: bool) -> RoutingOutcome {
    RoutingOutcome {
        success,
        destination_url: success.then(|| "http://alerts.local/".to_string()),
        field_path: "objectType".to_string(),
        matched_value: Some("alert".to_string()),
        rule_index: success.then_some(0),
        error_message: (!success).then(|| "no matching routing rule found".to_string()),
        total_rules: 1,
        attempts: vec![],
    }
}

fn forwarding(status: Option<u16>) -> ForwardingOutcome {
    ForwardingOutcome {
        success: status.is_some(),
        status_code: status,
        headers: BTreeMap::new(),
        body: b"ok".to_vec(),
        response_time_ms: 4.2,
        error_kind: status.is_none().then_some(ForwardErrorKind::ReadTimeout),
        error_message: status
            .is_none()
            .then(|| "Read timeout after 1 seconds".to_string()),
        destination_url: "http://alerts.local/".to_string(),
    }
}

fn body_of(outcome: PipelineOutcome) -> (StatusCode, Value) {
    let (status, body) = outcome_body(outcome, "req-1");
    (status, serde_json::to_value(body).unwrap())
}

#[test]
fn test_dropped_maps_to_200_processed() {
    let (status, body) = body_of(PipelineOutcome::Dropped {
        filtering: filtering(false),
    });

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "processed");
    assert_eq!(body["result"], "dropped");
    assert_eq!(body["request_id"], "req-1");
    assert_eq!(body["filtering_summary"]["default_action_applied"], true);
    assert_eq!(body["filtering_summary"]["matched_rules"], Value::Null);
    assert!(body.get("routing_summary").is_none());
}

#[test]
fn test_routing_failed_maps_to_404() {
    let (status, body) = body_of(PipelineOutcome::RoutingFailed {
        filtering: filtering(true),
        routing: routing(false),
        error_message: "no matching routing rule found".to_string(),
    });

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["result"], "routing_failed");
    assert_eq!(body["error_message"], "no matching routing rule found");
    assert_eq!(body["routing_summary"]["field_path"], "objectType");
    assert_eq!(body["filtering_summary"]["matched_rules"], json!(["objectType"]));
}

#[test]
fn test_forwarding_failed_maps_to_502() {
    let (status, body) = body_of(PipelineOutcome::ForwardingFailed {
        filtering: filtering(true),
        routing: routing(true),
        forwarding: forwarding(None),
        error_message: "Read timeout after 1 seconds".to_string(),
    });

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["result"], "forwarding_failed");
    assert_eq!(body["forwarding_summary"]["error_type"], "READ_TIMEOUT");
    assert!(body.get("destination_response").is_none());
}

#[test]
fn test_forwarded_maps_to_200_with_destination_response() {
    let forwarded = forwarding(Some(503));
    let response = DestinationResponse::from_outcome(&forwarded).unwrap();
    let (status, body) = body_of(PipelineOutcome::Forwarded {
        filtering: filtering(true),
        routing: routing(true),
        forwarding: forwarded,
        response,
    });

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "forwarded");
    assert_eq!(body["result"], "success");
    assert_eq!(body["destination_response"]["status_code"], 503);
    assert_eq!(body["destination_response"]["body"], "ok");
    assert_eq!(body["routing_summary"]["rule_index"], 0);
    assert!(body.get("error_message").is_none());
}

#[test]
fn test_validation_failed_maps_to_400() {
    let response = outcome_to_response(
        PipelineOutcome::ValidationFailed {
            message: "Payload must be a JSON object".to_string(),
            payload_type: "array",
        },
        "req-1",
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_header_map_skips_non_utf8() {
    let mut headers = HeaderMap::new();
    headers.insert("x-trace-id", HeaderValue::from_static("t-1"));
    headers.insert("x-binary", HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap());

    let map = header_map(&headers);
    assert_eq!(map.get("x-trace-id").map(String::as_str), Some("t-1"));
    assert!(!map.contains_key("x-binary"));
}
