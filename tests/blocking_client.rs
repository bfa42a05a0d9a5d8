//! Blocking client tests against a wiremock server.

#![cfg(feature = "blocking")]

use gamecharacter::{BlockingClient, BlockingConfig, Error, GameCharacterQuery};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope() -> serde_json::Value {
    json!({
        "status": "ok",
        "error": null,
        "data": {
            "name": "Pip Underbough",
            "race": { "name": "Halfling", "traits": ["Lucky", "Brave"] },
            "class": {
                "name": "Rogue",
                "description": "A scoundrel who uses stealth and trickery",
                "primaryStat": "Dexterity",
                "hitDie": "d8"
            },
            "background": "Urchin",
            "personality": "Cheerful pickpocket",
            "motivation": "Buy back the family inn",
            "stats": {
                "strength": { "value": 10, "modifier": 0 },
                "dexterity": { "value": 17, "modifier": 3 },
                "constitution": { "value": 13, "modifier": 1 },
                "intelligence": { "value": 12, "modifier": 1 },
                "wisdom": { "value": 11, "modifier": 0 },
                "charisma": { "value": 14, "modifier": 2 }
            },
            "hp": 9
        },
        "code": 200
    })
}

#[test]
fn blocking_execute_sends_query_and_parses_envelope() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");

    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/v1/gamecharacter"))
            .and(header("x-api-key", "blocking_key"))
            .and(query_param("race", "halfling"))
            .and(query_param("class", "rogue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope()))
            .expect(1)
            .mount(&server)
            .await;
    });

    let client = BlockingClient::new(BlockingConfig {
        api_key: Some("blocking_key".to_string()),
        secure: Some(false),
        host: Some(server.address().to_string()),
        ..Default::default()
    })
    .expect("client creation should succeed");

    let query = GameCharacterQuery::new()
        .with_race("halfling")
        .with_class("rogue");
    let resp = client
        .execute(Some(&query))
        .expect("request should succeed");

    assert_eq!(resp.code, Some(200));
    assert_eq!(serde_json::to_value(&resp).unwrap(), envelope());
    let data = resp.into_data().expect("data present");
    assert_eq!(data.class.primary_stat, "Dexterity");
    assert_eq!(data.race.traits, vec!["Lucky", "Brave"]);
}

#[test]
fn blocking_callback_matches_return_value() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/v1/gamecharacter"))
            .and(query_param_is_missing("race"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope()))
            .expect(2)
            .mount(&server)
            .await;
    });

    let client = BlockingClient::new(BlockingConfig {
        api_key: Some("blocking_key".to_string()),
        base_url: Some(format!("{}/v1/gamecharacter", server.uri())),
        ..Default::default()
    })
    .expect("client creation should succeed");

    let plain = client.execute(None).expect("request should succeed");
    let mut from_callback = None;
    let returned = client
        .execute_with_callback(None, |res| from_callback = res.ok().cloned())
        .expect("request should succeed");

    assert_eq!(from_callback, Some(returned.clone()));
    assert_eq!(returned, plain);
}

#[test]
fn blocking_non_success_status_is_api_error() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/v1/gamecharacter"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "status": "error",
                "error": "Rate limit exceeded",
                "data": null,
                "code": 429
            })))
            .mount(&server)
            .await;
    });

    let client = BlockingClient::new(BlockingConfig {
        api_key: Some("blocking_key".to_string()),
        secure: Some(false),
        host: Some(server.address().to_string()),
        ..Default::default()
    })
    .expect("client creation should succeed");

    let err = client.execute(None).expect_err("429 should fail");
    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 429);
            assert_eq!(api.message, "Rate limit exceeded");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}
