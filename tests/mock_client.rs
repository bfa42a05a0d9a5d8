#![cfg(feature = "mock")]

use gamecharacter::{
    fixtures, testing, Class, Error, ExecuteOptions, GameCharacterQuery, MockClient, MockConfig,
    Race,
};

#[tokio::test]
async fn mock_records_queries_verbatim() {
    let client = MockClient::new(
        MockConfig::default()
            .with_response(fixtures::ok_response())
            .with_response(fixtures::ok_response()),
    );

    let query = GameCharacterQuery::new()
        .with_race(Race::Elf)
        .with_class(Class::Mage);
    client.execute(Some(&query)).await.expect("queued response");
    client
        .execute_with_options(None, ExecuteOptions::default().with_request_id("req_mock"))
        .await
        .expect("queued response");

    let calls = client.calls();
    assert_eq!(
        calls[0].query,
        vec![
            ("race".to_string(), "elf".to_string()),
            ("class".to_string(), "mage".to_string()),
        ]
    );
    assert!(calls[1].query.is_empty());
    assert_eq!(calls[1].request_id.as_deref(), Some("req_mock"));
}

#[tokio::test]
async fn mock_callback_sees_queued_error() {
    let client = MockClient::new(
        MockConfig::default().with_error(Error::Config("offline".into())),
    );

    let mut seen = None;
    let result = client
        .execute_with_callback(None, |res| seen = res.err().map(ToString::to_string))
        .await;

    assert!(result.is_err());
    assert_eq!(seen.as_deref(), Some("config error: offline"));
}

#[test]
fn blocking_mock_error_envelope_passes_through() {
    let client = MockClient::new(
        MockConfig::default().with_response(fixtures::error_response("Unknown class: lich")),
    );

    let resp = client
        .blocking()
        .execute(Some(&GameCharacterQuery::new().with_class("lich")))
        .expect("queued response");
    let err = resp.into_data().expect_err("error envelope");
    assert_eq!(err.api_message(), Some("Unknown class: lich"));
}

#[cfg(feature = "client")]
#[tokio::test]
async fn testing_helper_targets_local_server() {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/gamecharacter"))
        .and(header("x-api-key", testing::TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(testing::ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = testing::test_client(&server.uri()).expect("client");
    let resp = client.execute(None).await.expect("request should succeed");
    assert_eq!(resp, fixtures::ok_response());
}

#[cfg(feature = "client")]
#[tokio::test]
async fn testing_error_body_maps_to_api_error() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(testing::error_body("Bad race", 400)))
        .mount(&server)
        .await;

    let client = testing::test_client(&server.uri()).expect("client");
    let err = client.execute(None).await.expect_err("400 should fail");
    assert_eq!(err.api_message(), Some("Bad race"));
}
