//! Price feed client behavior against a scripted transport.

use serde_json::Value;
use stockpulse_core::{ApiErrorKind, AuthRequest, HttpError, Registration, TimeFrame};
use stockpulse_tests::{
    fixture_client, ticker, timed_series_json, Arc, FixtureHttpClient, HttpMethod, HttpResponse,
};

const STOCKS: &str = "/evaluation-service/stocks";
const AAPL: &str = "/evaluation-service/stocks/AAPL";
const MSFT: &str = "/evaluation-service/stocks/MSFT";

// =============================================================================
// Listing and prices
// =============================================================================

#[tokio::test]
async fn listing_maps_company_names_to_tickers() {
    // Given: a feed listing two valid tickers and one malformed entry
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        STOCKS,
        HttpResponse::ok_json(
            r#"{"stocks":{"Apple Inc.":"AAPL","Microsoft Corporation":"MSFT","Broken":"$$$"}}"#,
        ),
    ));
    let client = fixture_client(Arc::clone(&fixture), Some("tok-123"));

    // When: the listing is requested
    let stocks = client.list_stocks().await.expect("listing succeeds");

    // Then: valid entries are returned and the malformed one is skipped
    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks["Apple Inc."].as_str(), "AAPL");
    assert!(!stocks.contains_key("Broken"));

    // And: the request carried the bearer token
    let requests = fixture.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].headers.get("authorization").map(String::as_str),
        Some("Bearer tok-123")
    );
    assert_eq!(
        requests[0].headers.get("accept").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn client_without_token_sends_no_authorization() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        STOCKS,
        HttpResponse::ok_json(r#"{"stocks":{}}"#),
    ));
    let client = fixture_client(Arc::clone(&fixture), None);

    let stocks = client.list_stocks().await.expect("listing succeeds");

    assert!(stocks.is_empty());
    assert!(!fixture.requests()[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn price_request_carries_the_time_frame() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        AAPL,
        HttpResponse::ok_json(timed_series_json(&[10.0, 11.0, 12.0])),
    ));
    let client = fixture_client(Arc::clone(&fixture), Some("tok"));
    let minutes = TimeFrame::minutes(15).expect("valid time frame");

    let samples = client
        .fetch_samples(&ticker("aapl"), Some(minutes))
        .await
        .expect("prices load");

    assert_eq!(samples.len(), 3);
    assert_eq!(
        fixture.requests()[0].url,
        "http://feed.test/evaluation-service/stocks/AAPL?minutes=15"
    );
}

#[tokio::test]
async fn single_point_response_becomes_one_sample() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        AAPL,
        HttpResponse::ok_json(r#"{"stock":{"price":231.9,"lastUpdatedAt":"2025-05-08T04:11:42Z"}}"#),
    ));
    let client = fixture_client(fixture, Some("tok"));

    let samples = client
        .fetch_samples(&ticker("AAPL"), None)
        .await
        .expect("prices load");

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].price, 231.9);
}

// =============================================================================
// Failures and retries
// =============================================================================

#[tokio::test]
async fn transient_outage_is_retried() {
    // Given: the feed is briefly unavailable
    let fixture = Arc::new(
        FixtureHttpClient::new()
            .respond(HttpMethod::Get, AAPL, HttpResponse::with_status(503, "busy"))
            .respond(
                HttpMethod::Get,
                AAPL,
                HttpResponse::ok_json(timed_series_json(&[1.0, 2.0])),
            ),
    );
    let client = fixture_client(Arc::clone(&fixture), Some("tok"));

    // When: prices are fetched
    let samples = client
        .fetch_samples(&ticker("AAPL"), None)
        .await
        .expect("second attempt succeeds");

    // Then: the client tried twice and returned the data
    assert_eq!(samples.len(), 2);
    assert_eq!(fixture.requests().len(), 2);
}

#[tokio::test]
async fn transport_failure_is_retried() {
    let fixture = Arc::new(
        FixtureHttpClient::new()
            .fail(HttpMethod::Get, AAPL, HttpError::new("connection reset"))
            .respond(
                HttpMethod::Get,
                AAPL,
                HttpResponse::ok_json(timed_series_json(&[1.0])),
            ),
    );
    let client = fixture_client(Arc::clone(&fixture), Some("tok"));

    let samples = client
        .fetch_samples(&ticker("AAPL"), None)
        .await
        .expect("retry succeeds");

    assert_eq!(samples.len(), 1);
    assert_eq!(fixture.requests().len(), 2);
}

#[tokio::test]
async fn persistent_outage_gives_up_after_configured_retries() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        AAPL,
        HttpResponse::with_status(503, "down"),
    ));
    let client = fixture_client(Arc::clone(&fixture), Some("tok"));

    let error = client
        .fetch_samples(&ticker("AAPL"), None)
        .await
        .expect_err("outage persists");

    assert_eq!(error.kind(), ApiErrorKind::Unavailable);
    assert!(error.retryable());
    assert_eq!(fixture.requests().len(), 3, "one attempt plus two retries");
}

#[tokio::test]
async fn rejected_token_is_not_retried() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        AAPL,
        HttpResponse::with_status(401, r#"{"message":"invalid token"}"#),
    ));
    let client = fixture_client(Arc::clone(&fixture), Some("expired"));

    let error = client
        .fetch_samples(&ticker("AAPL"), None)
        .await
        .expect_err("unauthorized");

    assert_eq!(error.kind(), ApiErrorKind::Unauthorized);
    assert_eq!(error.code(), "api.unauthorized");
    assert_eq!(fixture.requests().len(), 1);
}

#[tokio::test]
async fn non_json_price_body_yields_no_samples() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Get,
        AAPL,
        HttpResponse::ok_json("<html>maintenance</html>"),
    ));
    let client = fixture_client(fixture, Some("tok"));

    let samples = client
        .fetch_samples(&ticker("AAPL"), None)
        .await
        .expect("degrades to empty");

    assert!(samples.is_empty());
}

#[tokio::test]
async fn basket_reports_partial_failures_in_request_order() {
    // Given: MSFT is unknown to the feed
    let fixture = Arc::new(
        FixtureHttpClient::new()
            .respond(
                HttpMethod::Get,
                AAPL,
                HttpResponse::ok_json(timed_series_json(&[1.0, 2.0, 3.0])),
            )
            .respond(HttpMethod::Get, MSFT, HttpResponse::with_status(404, "")),
    );
    let client = fixture_client(fixture, Some("tok"));
    let tickers = [ticker("MSFT"), ticker("AAPL"), ticker("GOOGL")];

    // When: the basket is fetched
    let basket = client.fetch_basket(&tickers, None).await;

    // Then: AAPL loads, MSFT and the unrouted GOOGL fail without aborting it
    assert_eq!(basket.series.len(), 1);
    assert_eq!(basket.series[0].0.as_str(), "AAPL");
    assert_eq!(basket.series[0].1.len(), 3);

    let failed = basket
        .failures
        .iter()
        .map(|(ticker, error)| (ticker.as_str(), error.kind()))
        .collect::<Vec<_>>();
    assert_eq!(
        failed,
        [
            ("MSFT", ApiErrorKind::NotFound),
            ("GOOGL", ApiErrorKind::NotFound)
        ]
    );
}

// =============================================================================
// Registration and authentication
// =============================================================================

#[tokio::test]
async fn registration_posts_camel_case_form() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Post,
        "/evaluation-service/register",
        HttpResponse::ok_json(r#"{"clientID":"c-1","clientSecret":"s-1","companyName":"Acme"}"#),
    ));
    let client = fixture_client(Arc::clone(&fixture), None);
    let registration = Registration {
        company_name: String::from("Acme"),
        owner_name: String::from("Sam Lee"),
        roll_no: String::from("42"),
        owner_email: String::from("sam@acme.test"),
        access_code: String::from("XyZ"),
    };

    let credentials = client
        .register(&registration)
        .await
        .expect("registration succeeds");

    assert_eq!(credentials.client_id, "c-1");
    assert_eq!(credentials.client_secret, "s-1");

    let requests = fixture.requests();
    let body: Value =
        serde_json::from_str(requests[0].body.as_deref().expect("json body")).expect("valid json");
    assert_eq!(body["rollNo"], "42");
    assert_eq!(body["accessCode"], "XyZ");
    assert_eq!(
        requests[0].headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn authentication_returns_token_and_leaves_client_unchanged() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Post,
        "/evaluation-service/auth",
        HttpResponse::ok_json(r#"{"token_type":"Bearer","access_token":"fresh","expires_in":1746687}"#),
    ));
    let client = fixture_client(fixture, None);
    let request = AuthRequest {
        client_id: String::from("c-1"),
        client_secret: String::from("s-1"),
        company_name: String::new(),
    };

    let token = client
        .authenticate(&request)
        .await
        .expect("auth succeeds");

    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.token_type.as_deref(), Some("Bearer"));
    assert_eq!(client.config().access_token, None);

    let mut authorized = client.clone();
    authorized.set_access_token(token.access_token);
    assert_eq!(authorized.config().access_token.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn empty_token_response_is_rejected() {
    let fixture = Arc::new(FixtureHttpClient::new().respond(
        HttpMethod::Post,
        "/evaluation-service/auth",
        HttpResponse::ok_json(r#"{"access_token":""}"#),
    ));
    let client = fixture_client(fixture, None);
    let request = AuthRequest {
        client_id: String::from("c-1"),
        client_secret: String::from("s-1"),
        company_name: String::from("Acme"),
    };

    let error = client
        .authenticate(&request)
        .await
        .expect_err("empty token");

    assert_eq!(error.kind(), ApiErrorKind::InvalidResponse);
}
