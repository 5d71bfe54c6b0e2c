//! Integration tests for the HTTP-backed suggestion sources.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::init_tracing;
use insight::{
    BindOptions, CatalogSource, ControllerSettings, DismissalCoordinator, Document, FieldBinder,
    FieldTag, HttpSuggestionSource, LookupOutcome, SuggestionFetchError, SuggestionSource,
};
use insight_net::{HttpClient, NetworkError};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{path}", server.uri())).unwrap()
}

mod suggestions_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_sends_query_and_field_tag() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/suggestions"))
            .and(query_param("q", "bank"))
            .and(query_param("field", "Sector"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                "Banking",
                "Bank Operations"
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"));
        let labels = source.fetch_suggestions("bank", FieldTag::Sector).await.unwrap();
        assert_eq!(labels, vec!["Banking", "Bank Operations"]);
    }

    #[tokio::test]
    async fn test_empty_array_is_no_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/suggestions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"));
        assert_eq!(source.fetch_suggestions("xyz123", FieldTag::Year).await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_server_error_is_status_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/suggestions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("no data"))
            .mount(&server)
            .await;

        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"));
        assert_eq!(
            source.fetch_suggestions("ba", FieldTag::Sector).await,
            Err(SuggestionFetchError::Status {
                status: 500,
                message: Some("no data".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_unfollowed_redirect_is_status_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/suggestions"))
            .respond_with(ResponseTemplate::new(300).set_body_json(serde_json::json!(["Stale"])))
            .mount(&server)
            .await;

        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"));
        assert!(matches!(
            source.fetch_suggestions("st", FieldTag::Sector).await,
            Err(SuggestionFetchError::Status { status: 300, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/suggestions"))
            .and(query_param("field", "Location"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "no data"
            })))
            .mount(&server)
            .await;

        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"));
        assert!(matches!(
            source.fetch_suggestions("ka", FieldTag::Location).await,
            Err(SuggestionFetchError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["2021"]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"))
            .with_timeout(Duration::from_millis(100));
        assert_eq!(
            source.fetch_suggestions("20", FieldTag::Year).await,
            Err(SuggestionFetchError::Transport(NetworkError::Timeout))
        );
    }

    #[tokio::test]
    async fn test_bound_field_closes_on_server_error() {
        init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "ba"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["Banking"])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "bax"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let document = Document::new();
        document.add_input("sectorInput").unwrap();
        let source = HttpSuggestionSource::new(HttpClient::new(), endpoint(&server, "/api/suggestions"));
        let binder = FieldBinder::new(document, Arc::new(source))
            .with_coordinator(DismissalCoordinator::new())
            .with_settings(ControllerSettings::immediate());
        let sector = binder
            .bind("sectorInput", FieldTag::Sector, BindOptions::auto_create())
            .unwrap();

        let outcome = sector.input_changed("Ba").unwrap().settled().await;
        assert_eq!(outcome, LookupOutcome::Rendered(1));
        let outcome = sector.input_changed("Bax").unwrap().settled().await;
        assert_eq!(outcome, LookupOutcome::Failed);
        assert!(!sector.is_open());
    }
}

mod catalog {
    use super::*;

    fn catalog_body() -> serde_json::Value {
        serde_json::json!({
            "sectors": ["Banking", "Bakery", "Education"],
            "skills": ["python", "pandas", "sql"],
            "locations": ["Karnataka", "Kerala"]
        })
    }

    #[tokio::test]
    async fn test_catalog_is_fetched_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/autocomplete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
            .expect(1)
            .mount(&server)
            .await;

        let source = CatalogSource::new(HttpClient::new(), endpoint(&server, "/api/autocomplete"));
        assert!(!source.is_loaded());

        let sectors = source.fetch_suggestions("ba", FieldTag::Sector).await.unwrap();
        assert_eq!(sectors, vec!["Banking", "Bakery"]);
        assert!(source.is_loaded());

        let skills = source.clone().fetch_suggestions("p", FieldTag::Skill).await.unwrap();
        assert_eq!(skills, vec!["python", "pandas"]);
        let locations = source.fetch_suggestions("ke", FieldTag::Location).await.unwrap();
        assert_eq!(locations, vec!["Kerala"]);
        assert!(source.fetch_suggestions("20", FieldTag::Year).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_prefetch_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/autocomplete"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/autocomplete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
            .mount(&server)
            .await;

        let source = CatalogSource::new(HttpClient::new(), endpoint(&server, "/api/autocomplete"));
        assert!(matches!(
            source.fetch_suggestions("ba", FieldTag::Sector).await,
            Err(SuggestionFetchError::Status { status: 500, .. })
        ));
        assert!(!source.is_loaded());

        let sectors = source.fetch_suggestions("ed", FieldTag::Sector).await.unwrap();
        assert_eq!(sectors, vec!["Education"]);
    }

    #[tokio::test]
    async fn test_not_modified_catalog_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/autocomplete"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let source = CatalogSource::new(HttpClient::new(), endpoint(&server, "/api/autocomplete"));
        assert!(matches!(
            source.fetch_suggestions("ba", FieldTag::Sector).await,
            Err(SuggestionFetchError::Status { status: 304, .. })
        ));
        assert!(!source.is_loaded());
    }
}
