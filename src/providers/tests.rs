//! Provider tests with HTTP mocking.

#[cfg(test)]
mod porkbun_tests {
    use crate::context::Context;
    use crate::error::DdnsError;
    use crate::providers::porkbun::name_type_path;
    use crate::providers::{PorkbunProvider, RecordProvider};
    use crate::record::{Credentials, RecordTarget, RecordType};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    fn provider(owner: &str, base_url: String) -> PorkbunProvider {
        PorkbunProvider::with_base_url(
            reqwest::Client::new(),
            RecordTarget::new("example.com", owner, 600),
            Credentials::new("pk1_key", "sk1_secret"),
            base_url,
        )
    }

    fn auth_body() -> serde_json::Value {
        json!({"secretapikey": "sk1_secret", "apikey": "pk1_key"})
    }

    #[test]
    fn test_lookup_path_keeps_owner_verbatim() {
        for owner in ["*", "vpn", "*.lab", "a-b_c"] {
            let target = RecordTarget::new("example.com", owner, 600);
            let lookup = name_type_path("retrieveByNameType", &target, RecordType::A);
            assert_eq!(
                lookup,
                format!("/api/json/v3/dns/retrieveByNameType/example.com/A/{owner}")
            );
            assert!(!lookup.contains("%2A"));
        }
    }

    #[test]
    fn test_lookup_path_omits_apex_owner() {
        let target = RecordTarget::new("example.com", "@", 600);
        assert_eq!(
            name_type_path("retrieveByNameType", &target, RecordType::Aaaa),
            "/api/json/v3/dns/retrieveByNameType/example.com/AAAA/"
        );
    }

    #[tokio::test]
    async fn test_record_ids() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/retrieveByNameType/example.com/A/vpn"))
            .and(body_json(auth_body()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "SUCCESS",
                "records": [
                    {"id": "106926652", "name": "vpn.example.com", "type": "A", "content": "1.1.1.1", "ttl": "600"},
                    {"id": "106926653", "name": "vpn.example.com", "type": "A", "content": "1.1.1.2", "ttl": "600"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let ids = provider
            .record_ids(&Context::background(), RecordType::A)
            .await
            .unwrap();

        assert_eq!(ids, vec!["106926652", "106926653"]);
    }

    #[tokio::test]
    async fn test_record_ids_wildcard_is_sent_unescaped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/retrieveByNameType/example.com/A/*"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "SUCCESS", "records": [{"id": "7"}]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider("*", mock_server.uri());
        let ids = provider
            .record_ids(&Context::background(), RecordType::A)
            .await
            .unwrap();

        assert_eq!(ids, vec!["7"]);
    }

    #[tokio::test]
    async fn test_record_ids_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/retrieveByNameType/example.com/AAAA/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS", "records": []})),
            )
            .mount(&mock_server)
            .await;

        let provider = provider("@", mock_server.uri());
        let ids = provider
            .record_ids(&Context::background(), RecordType::Aaaa)
            .await
            .unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_record_ids_null_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/retrieveByNameType/example.com/A/vpn"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "SUCCESS", "records": null})),
            )
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let ids = provider
            .record_ids(&Context::background(), RecordType::A)
            .await
            .unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_record_ids_auth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "ERROR",
                "message": "Invalid API key. (002)"
            })))
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let err = provider
            .record_ids(&Context::background(), RecordType::A)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
        assert_eq!(err.to_string(), "for record type A");
        let message = err.root_cause().to_string();
        assert!(message.contains("Invalid API key. (002)"));
        assert!(!message.contains("sk1_secret"));
        assert!(!message.contains("pk1_key"));
    }

    #[tokio::test]
    async fn test_record_ids_malformed_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"records": [{"name": "no id"}]})),
            )
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let err = provider
            .record_ids(&Context::background(), RecordType::A)
            .await
            .unwrap_err();

        assert!(matches!(err.root_cause(), DdnsError::Decode(_)));
    }

    #[tokio::test]
    async fn test_create_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/create/example.com"))
            .and(body_json(json!({
                "secretapikey": "sk1_secret",
                "apikey": "pk1_key",
                "content": "1.2.3.4",
                "name": "vpn",
                "type": "A",
                "ttl": "600"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS", "id": 106926659})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        provider
            .create_record(&Context::background(), RecordType::A, "1.2.3.4")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/edit/example.com/106926652"))
            .and(body_json(json!({
                "secretapikey": "sk1_secret",
                "apikey": "pk1_key",
                "content": "2001:db8::1",
                "name": "@",
                "type": "AAAA",
                "ttl": "600"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider("@", mock_server.uri());
        provider
            .update_record(&Context::background(), RecordType::Aaaa, "2001:db8::1", "106926652")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_record_error_names_record_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let err = provider
            .update_record(&Context::background(), RecordType::A, "1.2.3.4", "42")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "for record type A and record id 42");
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_delete_alias_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/deleteByNameType/example.com/ALIAS/*"))
            .and(body_json(auth_body()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider("*", mock_server.uri());
        provider
            .delete_alias_records(&Context::background())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_alias_records_at_apex() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/json/v3/dns/deleteByNameType/example.com/ALIAS/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider("@", mock_server.uri());
        provider
            .delete_alias_records(&Context::background())
            .await
            .unwrap();
    }

    /// Fake Porkbun that stores created records and lists them back.
    #[derive(Clone, Default)]
    struct EchoingPorkbun {
        records: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Respond for EchoingPorkbun {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let segments: Vec<&str> = request.url.path().split('/').collect();
            let mut records = self.records.lock().unwrap();

            match segments.get(5).copied() {
                Some("create") => {
                    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
                    let record_type = body["type"].as_str().unwrap_or_default().to_string();
                    let id = (records.len() + 1).to_string();
                    records.push((id.clone(), record_type));
                    ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS", "id": id}))
                }
                Some("retrieveByNameType") => {
                    let record_type = segments.get(7).copied().unwrap_or_default();
                    let found: Vec<_> = records
                        .iter()
                        .filter(|(_, t)| t == record_type)
                        .map(|(id, _)| json!({"id": id}))
                        .collect();
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"status": "SUCCESS", "records": found}))
                }
                _ => ResponseTemplate::new(404),
            }
        }
    }

    #[tokio::test]
    async fn test_create_then_query_returns_identifier() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(EchoingPorkbun::default())
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let ctx = Context::background();

        assert!(provider.record_ids(&ctx, RecordType::A).await.unwrap().is_empty());
        provider
            .create_record(&ctx, RecordType::A, "198.51.100.4")
            .await
            .unwrap();

        let ids = provider.record_ids(&ctx, RecordType::A).await.unwrap();
        assert_eq!(ids, vec!["1"]);
        assert!(provider
            .record_ids(&ctx, RecordType::Aaaa)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_sync_against_fake_provider() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(EchoingPorkbun::default())
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let ctx = Context::background();
        let ip = "198.51.100.4".parse().unwrap();

        let first = crate::reconcile::sync(&ctx, &provider, ip).await.unwrap();
        assert_eq!(first.action, crate::reconcile::SyncAction::Created);

        // Second run finds the record and edits it; the fake answers 404 to edits.
        let err = crate::reconcile::sync(&ctx, &provider, ip).await.unwrap_err();
        assert!(err.to_string().contains("record id 1"));
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = provider("vpn", mock_server.uri());
        let ctx = Context::background();
        ctx.cancel();

        let err = provider
            .create_record(&ctx, RecordType::A, "1.2.3.4")
            .await
            .unwrap_err();
        assert!(matches!(err.root_cause(), DdnsError::Cancelled));
    }
}

#[cfg(test)]
mod env_resolution_tests {
    use crate::providers::resolve_env;

    #[test]
    fn test_resolve_env_with_value() {
        assert_eq!(resolve_env("plain_value"), "plain_value");
    }

    #[test]
    fn test_resolve_env_with_existing_var() {
        std::env::set_var("TEST_PORKBUN_DDNS_VAR", "resolved_value");
        assert_eq!(resolve_env("$TEST_PORKBUN_DDNS_VAR"), "resolved_value");
        std::env::remove_var("TEST_PORKBUN_DDNS_VAR");
    }

    #[test]
    fn test_resolve_env_with_missing_var() {
        let result = resolve_env("$NONEXISTENT_VAR_12345");
        assert_eq!(result, "$NONEXISTENT_VAR_12345");
    }
}
