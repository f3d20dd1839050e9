//! How raw price feed payloads become canonical sample sequences.

use serde_json::{json, Value};
use stockpulse_core::{normalize, PricePayload, Sample};

// =============================================================================
// Recognized shapes
// =============================================================================

#[test]
fn time_series_passes_through_in_order() {
    // Given: a time-series response
    let payload = json!([
        {"price": 231.95, "lastUpdatedAt": "2025-05-08T04:11:42.465706306Z"},
        {"price": 124.95, "lastUpdatedAt": "2025-05-08T04:12:30.465706306Z"},
        {"price": 459.09, "lastUpdatedAt": "2025-05-08T04:13:05.465706306Z"}
    ]);

    // When: normalized
    let samples = normalize(&payload);

    // Then: every sample survives with its raw timestamp
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[1].price, 124.95);
    assert_eq!(
        samples[2].last_updated_at.as_deref(),
        Some("2025-05-08T04:13:05.465706306Z")
    );
}

#[test]
fn single_point_envelope_unwraps_to_one_sample() {
    let payload = json!({"stock": {"price": 960.57, "lastUpdatedAt": "2025-05-08T04:26:27Z"}});

    let samples = normalize(&payload);

    assert_eq!(
        samples,
        vec![Sample::at(960.57, "2025-05-08T04:26:27Z")]
    );
}

#[test]
fn envelope_without_timestamp_is_still_a_sample() {
    assert_eq!(normalize(&json!({"stock": {"price": 7}})), vec![Sample::new(7.0)]);
}

#[test]
fn zero_and_negative_prices_are_kept() {
    let samples = normalize(&json!([{"price": 0.0}, {"price": -3.5}]));

    assert_eq!(samples, vec![Sample::new(0.0), Sample::new(-3.5)]);
}

// =============================================================================
// Degenerate shapes
// =============================================================================

#[test]
fn null_and_absent_payloads_are_empty() {
    assert!(normalize(&Value::Null).is_empty());
    assert_eq!(PricePayload::from(None::<Value>), PricePayload::Empty);
    assert_eq!(PricePayload::from(Some(Value::Null)), PricePayload::Empty);
}

#[test]
fn unrecognized_shapes_are_empty() {
    for payload in [
        json!({}),
        json!({"stocks": {"Apple Inc.": "AAPL"}}),
        json!({"stock": null}),
        json!({"stock": {"value": 10}}),
        json!("231.95"),
        json!(231.95),
        json!(true),
    ] {
        assert!(
            normalize(&payload).is_empty(),
            "expected empty samples for {payload}"
        );
    }
}

#[test]
fn envelope_without_numeric_price_is_empty() {
    for payload in [
        json!({"stock": {"lastUpdatedAt": "2025-05-08T04:26:27Z"}}),
        json!({"stock": {"price": "960.57"}}),
        json!({"stock": "NVDA"}),
    ] {
        assert_eq!(
            PricePayload::classify(&payload),
            PricePayload::Empty,
            "expected empty payload for {payload}"
        );
    }
}

#[test]
fn empty_series_stays_a_series() {
    let payload = PricePayload::classify(&json!([]));

    assert_eq!(payload, PricePayload::Series(Vec::new()));
    assert!(payload.is_empty());
}

#[test]
fn malformed_items_are_dropped_from_a_series() {
    let payload = json!([
        {"price": 1.0},
        {"price": "not a number"},
        {"lastUpdatedAt": "2025-05-08T04:26:27Z"},
        {"price": 2.0}
    ]);

    assert_eq!(normalize(&payload), vec![Sample::new(1.0), Sample::new(2.0)]);
}

// =============================================================================
// Raw bodies
// =============================================================================

#[test]
fn non_json_body_degrades_to_empty() {
    assert_eq!(PricePayload::from_json("<html>502</html>"), PricePayload::Empty);
    assert!(PricePayload::try_from_json("<html>502</html>").is_err());
}

#[test]
fn json_body_is_classified() {
    let payload = PricePayload::from_json(r#"{"stock":{"price":12.5}}"#);

    assert_eq!(payload, PricePayload::Single(Sample::new(12.5)));
    assert_eq!(payload.into_samples().len(), 1);
}

#[test]
fn normalized_sample_serializes_with_wire_field_names() {
    let samples = normalize(&json!([{"price": 1.5, "lastUpdatedAt": "t"}, {"price": 2.5}]));

    let round_trip = serde_json::to_value(&samples).expect("serializable");

    assert_eq!(
        round_trip,
        json!([{"price": 1.5, "lastUpdatedAt": "t"}, {"price": 2.5}])
    );
}

// =============================================================================
// Idempotence
// =============================================================================

fn renormalized(payload: &Value) -> (Vec<Sample>, Vec<Sample>) {
    let once = normalize(payload);
    let encoded = serde_json::to_value(&once).expect("samples serialize");
    let twice = normalize(&encoded);
    (once, twice)
}

#[test]
fn normalizing_a_timed_series_twice_changes_nothing() {
    let (once, twice) = renormalized(&json!([
        {"price": 231.95, "lastUpdatedAt": "2025-05-08T04:11:42.465706306Z"},
        {"price": 124.95, "lastUpdatedAt": "2025-05-08T06:12:30+02:00"},
        {"price": 459.09, "lastUpdatedAt": "not a timestamp"}
    ]));

    assert_eq!(once.len(), 3);
    assert_eq!(once, twice);
}

#[test]
fn normalizing_an_untimed_series_twice_changes_nothing() {
    let (once, twice) = renormalized(&json!([{"price": 1.5}, {"price": -2.0}, {"price": 0}]));

    assert_eq!(once.len(), 3);
    assert_eq!(once, twice);
}

#[test]
fn normalizing_after_dropping_malformed_items_is_stable() {
    let (once, twice) = renormalized(&json!([
        {"price": 10.0, "lastUpdatedAt": "2025-05-08T04:00:00Z"},
        {"price": null},
        "stray",
        {"price": 11.0}
    ]));

    assert_eq!(
        once,
        vec![Sample::at(10.0, "2025-05-08T04:00:00Z"), Sample::new(11.0)]
    );
    assert_eq!(once, twice);
}

#[test]
fn normalizing_an_envelope_result_twice_changes_nothing() {
    let (once, twice) = renormalized(&json!({"stock": {"price": 960.57}}));

    assert_eq!(once, vec![Sample::new(960.57)]);
    assert_eq!(once, twice);
}
