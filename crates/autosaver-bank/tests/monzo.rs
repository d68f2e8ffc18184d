//! Monzo client against a mock API and token endpoint.

use autosaver_bank::{BankClient, Error, MoneyAmount, MonzoBank, monzo};
use autosaver_config::{HttpConfig, MonzoConfig};
use autosaver_oauth::{OAuthSession, TokenRecord, TokenStore};
use rust_decimal_macros::dec;
use serde_json::{Map, json};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ACCOUNT_ID: &str = "acc_accountid";
const POT_ID: &str = "pot_0000";

fn monzo_config(server: &MockServer, pot_target: Option<rust_decimal::Decimal>) -> MonzoConfig {
    MonzoConfig {
        account_id: ACCOUNT_ID.to_string(),
        pot_id: POT_ID.to_string(),
        pot_target,
        client_id: "client_id".to_string(),
        client_secret: Some("client_secret".to_string()),
        redirect_uri: "https://example.com".to_string(),
        user_id: None,
        api_url: server.uri(),
        auth_url: "https://auth.example.com/".to_string(),
    }
}

fn stored_token() -> TokenRecord {
    TokenRecord {
        access_token: "stale".to_string(),
        refresh_token: "stored_refresh".to_string(),
        expires_in: Some(21600),
        expires_at: Some(4_102_444_800.0),
        token_type: Some("Bearer".to_string()),
        extra: Map::new(),
    }
}

async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "next_refresh",
            "expires_in": 21600,
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// A bank whose session resumed from a stored token.
async fn bank(server: &MockServer, pot_target: Option<rust_decimal::Decimal>) -> MonzoBank {
    let config = monzo_config(server, pot_target);
    let http = reqwest::Client::new();
    let session = OAuthSession::resume(
        monzo::oauth_config(&config).unwrap(),
        http.clone(),
        stored_token(),
        Box::new(|_| Ok(())),
    )
    .await
    .unwrap();
    MonzoBank::with_session(&config, http, session).unwrap()
}

fn pots_listing() -> serde_json::Value {
    json!({
        "pots": [
            {
                "id": "pot_other",
                "name": "Holiday",
                "balance": 5_000,
                "deleted": false
            },
            {
                "id": POT_ID,
                "name": "Savings",
                "balance": 9_900,
                "goal_amount": 50_000,
                "currency": "GBP",
                "deleted": false
            }
        ]
    })
}

fn form_value(request: &Request, key: &str) -> Option<String> {
    url::form_urlencoded::parse(&request.body)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn deposits(requests: &[Request]) -> Vec<&Request> {
    requests
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .collect()
}

#[tokio::test]
async fn test_balance_uses_refreshed_token() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .and(query_param("account_id", ACCOUNT_ID))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": 999_900,
            "total_balance": 1_009_800,
            "currency": "GBP",
            "spend_today": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let balance = bank(&server, None).await.get_balance().await.unwrap();
    assert_eq!(balance.as_decimal(), dec!(9999.00));
}

#[tokio::test]
async fn test_goal_target_from_config() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/pots"))
        .and(query_param("current_account_id", ACCOUNT_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(pots_listing()))
        .mount(&server)
        .await;

    let goal = bank(&server, Some(dec!(333)))
        .await
        .get_goal_data()
        .await
        .unwrap();
    assert_eq!(goal.name, "Savings");
    assert_eq!(goal.balance.as_decimal(), dec!(99.00));
    assert_eq!(goal.target.as_decimal(), dec!(333.00));
}

#[tokio::test]
async fn test_goal_target_falls_back_to_pot_goal() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/pots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pots_listing()))
        .mount(&server)
        .await;

    let goal = bank(&server, None).await.get_goal_data().await.unwrap();
    assert_eq!(goal.target.as_decimal(), dec!(500.00));
}

#[tokio::test]
async fn test_missing_pot_is_not_found() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/pots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pots": [{"id": "pot_other", "name": "Holiday", "balance": 1}]
        })))
        .mount(&server)
        .await;

    let err = bank(&server, None).await.get_goal_data().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_deleted_pot_is_not_found() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/pots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pots": [{"id": POT_ID, "name": "Savings", "balance": 1, "deleted": true}]
        })))
        .mount(&server)
        .await;

    let err = bank(&server, None).await.get_goal_data().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_deposit_form() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path(format!("/pots/{POT_ID}/deposit")))
        .and(header("authorization", "Bearer fresh"))
        .and(body_string_contains("source_account_id=acc_accountid"))
        .and(body_string_contains("amount=100"))
        .and(body_string_contains("dedupe_id="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": POT_ID,
            "balance": 10_000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = bank(&server, None)
        .await
        .save_to_goal(MoneyAmount::from_decimal(dec!(1)))
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.raw["balance"], 10_000);

    let requests = server.received_requests().await.unwrap();
    let put = deposits(&requests);
    let dedupe_id = form_value(put[0], "dedupe_id").unwrap();
    assert_eq!(dedupe_id.len(), 36);
}

#[tokio::test]
async fn test_declined_deposit() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let result = bank(&server, None)
        .await
        .save_to_goal(MoneyAmount::from_decimal(dec!(1)))
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.status, 503);
}

#[tokio::test]
async fn test_rejected_token_refreshes_and_resends_with_same_key() {
    let server = MockServer::start().await;
    // One refresh at session start, one after the 401.
    mount_token_endpoint(&server, 2).await;
    Mock::given(method("PUT"))
        .and(path(format!("/pots/{POT_ID}/deposit")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/pots/{POT_ID}/deposit")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": POT_ID})))
        .mount(&server)
        .await;

    let result = bank(&server, None)
        .await
        .save_to_goal(MoneyAmount::from_decimal(dec!(12.34)))
        .await
        .unwrap();
    assert!(result.success);

    let requests = server.received_requests().await.unwrap();
    let put = deposits(&requests);
    assert_eq!(put.len(), 2);
    assert_eq!(form_value(put[0], "amount").as_deref(), Some("1234"));
    assert_eq!(
        form_value(put[0], "dedupe_id"),
        form_value(put[1], "dedupe_id")
    );
}

#[tokio::test]
async fn test_second_rejection_is_auth_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let err = bank(&server, None).await.get_balance().await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn test_connect_persists_refreshed_tokens() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 1})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join(".autosaver"));
    store.save(&stored_token()).unwrap();

    let no_prompt = |_: &str| -> autosaver_oauth::Result<String> {
        panic!("a stored token must not trigger interactive authorization")
    };
    let bank = MonzoBank::connect(
        &monzo_config(&server, None),
        &HttpConfig::default(),
        &store,
        &no_prompt,
    )
    .await
    .unwrap();

    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.access_token, "fresh");
    assert_eq!(saved.refresh_token, "next_refresh");

    std::fs::remove_file(store.path()).unwrap();
    let balance = bank.get_balance().await.unwrap();
    assert_eq!(balance, MoneyAmount::from_minor_units(1));

    // The mid-call refresh wrote the file again.
    assert!(store.exists());
}

#[tokio::test]
async fn test_connect_without_token_runs_interactive_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "granted",
            "refresh_token": "granted_refresh",
            "expires_in": 21600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join(".autosaver"));

    let prompt = |authorization_url: &str| -> autosaver_oauth::Result<String> {
        let url = url::Url::parse(authorization_url).unwrap();
        assert_eq!(url.host_str(), Some("auth.example.com"));
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        Ok(format!("https://example.com/?code=the_code&state={state}"))
    };

    MonzoBank::connect(
        &monzo_config(&server, None),
        &HttpConfig::default(),
        &store,
        &prompt,
    )
    .await
    .unwrap();

    assert_eq!(store.load().unwrap().unwrap().access_token, "granted");
}
