use quickmarc::config::Config;
use quickmarc::domain::{DomainError, RecordsEditorApi};
use quickmarc::infrastructure::RecordsEditorClient;
use quickmarc::models::{Content, Field, JobState, Record};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to point a client at the mock server
fn client_for(server: &MockServer) -> RecordsEditorClient {
    let config = Config {
        api_url: server.uri(),
        tenant: "diku".to_string(),
        token: Some("test-token".to_string()),
        status_timeout_ms: 5000,
        status_bail_time_ms: 20000,
        http_timeout_secs: 5,
    };
    RecordsEditorClient::new(&config).expect("Failed to build client")
}

fn sample_record() -> Record {
    let mut record = Record::new(
        "02949cama2200517Kii50000",
        vec![
            Field::new("001", Content::text("in0001")),
            Field::new("245", Content::text("$a Title")).with_indicators("1", "0"),
        ],
    );
    record.meta.parsed_record_id = Some("prid-1".to_string());
    record.meta.external_id = Some("inst-1".to_string());
    record
}

#[tokio::test]
async fn test_fetch_record_sends_tenant_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records-editor/records"))
        .and(query_param("externalId", "inst-1"))
        .and(header("X-Okapi-Tenant", "diku"))
        .and(header("X-Okapi-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "parsedRecordId": "prid-1",
            "externalId": "inst-1",
            "marcFormat": "BIBLIOGRAPHIC",
            "leader": "02949cama2200517Kii50000",
            "fields": [
                { "tag": "001", "content": "in0001" },
                { "tag": "008", "content": { "Lang": "eng", "Ills": ["a", "\\", "\\", "\\"] } },
                { "tag": "245", "content": "$a Title", "indicators": ["1", "0"] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).fetch_record("inst-1").await.unwrap();

    assert_eq!(record.meta.parsed_record_id.as_deref(), Some("prid-1"));
    assert_eq!(record.fields.len(), 3);
    assert!(record.field("008").unwrap().content.is_fixed());
}

#[tokio::test]
async fn test_fetch_missing_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records-editor/records"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_record("nope").await.unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[tokio::test]
async fn test_update_puts_to_parsed_record_id() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/records-editor/records/prid-1"))
        .and(body_partial_json(serde_json::json!({
            "parsedRecordId": "prid-1",
            "leader": "02949cama2200517Kii50000"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_record(&sample_record())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_rejection_keeps_backend_code() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/records-editor/records/prid-1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "errors": [{ "message": "bad 008", "code": "ILLEGAL_FIXED_LENGTH_CONTROL_FIELD" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update_record(&sample_record())
        .await
        .unwrap_err();

    assert!(err.is_illegal_fixed_length());
    assert!(matches!(err, DomainError::Rejected { status: 422, .. }));
}

#[tokio::test]
async fn test_update_without_id_is_refused_locally() {
    let server = MockServer::start().await;
    let record = Record::new("02949cama2200517Kii50000", vec![]);

    let err = client_for(&server).update_record(&record).await.unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_returns_job_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/records-editor/records"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "qmRecordId": "abc" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let job = client_for(&server)
        .create_record(&sample_record())
        .await
        .unwrap();
    assert_eq!(job.qm_record_id, "abc");
}

#[tokio::test]
async fn test_record_status_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records-editor/records/status"))
        .and(query_param("qmRecordId", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "qmRecordId": "abc",
            "status": "CREATED",
            "externalId": "xyz"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).record_status("abc").await.unwrap();
    assert_eq!(status.status, JobState::Created);
    assert_eq!(status.external_id.as_deref(), Some("xyz"));
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/records-editor/records"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_record(&sample_record())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DomainError::Rejected {
            status: 500,
            code: None
        }
    );
    assert!(!err.is_illegal_fixed_length());
}
