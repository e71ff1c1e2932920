use super::*;

#[traced_test]
#[tokio::test]
async fn test_fetch_by_url_id_with_contact_email() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/works/W2626778328"))
    .and(query_param("mailto", "me@example.org"))
    .respond_with(ResponseTemplate::new(200).set_body_json(work_json()))
    .expect(1)
    .mount(&server)
    .await;

  let client =
    OpenAlexClient::new().with_base_url(&server.uri()).with_contact_email("me@example.org");
  let paper = client.fetch_by_id("https://openalex.org/W2626778328").await?;

  assert_eq!(paper.display_name, TITLE);
  assert_eq!(paper.abstract_text, "The dominant sequence models");
  assert_eq!(paper.ids.mag.as_deref(), Some("2626778328"));
  assert_eq!(paper.authors.len(), 2);
  assert_eq!(paper.keywords, vec!["Transformer"]);
  Ok(())
}

#[tokio::test]
async fn test_fetch_without_contact_email_sends_no_mailto() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_json(&server, "/works/W2626778328", work_json()).await;

  let client = OpenAlexClient::new().with_base_url(&server.uri());
  client.fetch_by_id("W2626778328").await?;

  let requests = server.received_requests().await.unwrap();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].url.query(), None);
  Ok(())
}

#[tokio::test]
async fn test_fetch_status_failure_is_fetch_error() {
  let server = MockServer::start().await;
  mount_status(&server, "/works/W404", 404).await;

  let client = OpenAlexClient::new().with_base_url(&server.uri());
  let err = client.fetch_by_id("W404").await.unwrap_err();

  assert!(err.is_fetch_error());
  assert!(matches!(err, PapernoteError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_fetch_unparseable_body_is_malformed() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/works/W1"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
    .mount(&server)
    .await;

  let client = OpenAlexClient::new().with_base_url(&server.uri());
  let err = client.fetch_by_id("W1").await.unwrap_err();
  assert!(matches!(err, PapernoteError::MalformedResponse(_)));
  assert!(!err.is_fetch_error());
}

#[tokio::test]
async fn test_unreachable_service_is_fetch_error() {
  // Nothing listens on the discard port.
  let client = OpenAlexClient::new().with_base_url("http://127.0.0.1:9");
  let err = client.fetch_by_id("W1").await.unwrap_err();
  assert!(matches!(err, PapernoteError::Network(_)));
}

#[tokio::test]
async fn test_autocomplete() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/autocomplete/works"))
    .and(query_param("q", "attention is all"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "meta": {"count": 2},
      "results": [
        {"id": "https://openalex.org/W2626778328", "display_name": TITLE,
         "hint": "Ashish Vaswani, Noam Shazeer", "cited_by_count": 60000,
         "external_id": "https://doi.org/10.48550/arxiv.1706.03762", "entity_type": "work"},
        {"id": "https://openalex.org/W2", "display_name": "Attention is all you need in speech"}
      ]
    })))
    .mount(&server)
    .await;

  let client = OpenAlexClient::new().with_base_url(&server.uri());
  let suggestions = client.autocomplete("attention is all").await?;

  assert_eq!(suggestions.len(), 2);
  assert_eq!(suggestions[0].cited_by_count, Some(60000));
  assert_eq!(suggestions[0].hint.as_deref(), Some("Ashish Vaswani, Noam Shazeer"));
  assert_eq!(suggestions[1].hint, None);
  Ok(())
}
