use super::*;

fn client(server: &MockServer) -> PapersWithCodeClient {
  PapersWithCodeClient::new().with_base_url(&format!("{}{PWC_PREFIX}", server.uri()))
}

#[traced_test]
#[tokio::test]
async fn test_find_by_title_takes_first_result() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path(format!("{PWC_PREFIX}/papers")))
    .and(query_param("title", TITLE))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "count": 2,
      "results": [
        {"id": "attention-is-all-you-need", "title": TITLE},
        {"id": "attention-is-all-you-need-2", "title": TITLE}
      ]
    })))
    .mount(&server)
    .await;

  let record = client(&server).find_by_title(TITLE).await?.unwrap();
  assert_eq!(record.id, "attention-is-all-you-need");
  Ok(())
}

#[tokio::test]
async fn test_find_by_title_without_results() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_json(&server, &format!("{PWC_PREFIX}/papers"), json!({"count": 0, "results": []})).await;

  assert_eq!(client(&server).find_by_title("Nothing like it").await?, None);
  Ok(())
}

#[tokio::test]
async fn test_fetch_methods_and_datasets() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_all(&server).await;
  let client = client(&server);

  let methods = client.fetch_methods("attention-is-all-you-need").await?;
  assert_eq!(methods[0].label(), "Multi-Head Attention");

  let datasets = client.fetch_datasets("attention-is-all-you-need").await?;
  assert_eq!(datasets[0].label(), "WMT 2014");
  Ok(())
}

#[tokio::test]
async fn test_lookup_skips_disabled_lists() {
  let server = MockServer::start().await;
  mount_json(&server, &format!("{PWC_PREFIX}/papers"), pwc_search_json()).await;
  mount_json(
    &server,
    &format!("{PWC_PREFIX}/papers/attention-is-all-you-need/datasets"),
    pwc_datasets_json(),
  )
  .await;
  Mock::given(method("GET"))
    .and(path(format!("{PWC_PREFIX}/papers/attention-is-all-you-need/methods")))
    .respond_with(ResponseTemplate::new(200).set_body_json(pwc_methods_json()))
    .expect(0)
    .mount(&server)
    .await;

  let preferences = MetadataPreferences { methods: false, ..Default::default() };
  let record = client(&server).lookup(TITLE, &preferences).await.unwrap();

  assert_eq!(record.methods, None);
  assert_eq!(record.datasets.unwrap().len(), 1);
}

#[traced_test]
#[tokio::test]
async fn test_lookup_degrades_failed_list_to_empty() {
  let server = MockServer::start().await;
  mount_json(&server, &format!("{PWC_PREFIX}/papers"), pwc_search_json()).await;
  mount_json(
    &server,
    &format!("{PWC_PREFIX}/papers/attention-is-all-you-need/methods"),
    pwc_methods_json(),
  )
  .await;
  mount_status(&server, &format!("{PWC_PREFIX}/papers/attention-is-all-you-need/datasets"), 500)
    .await;

  let record = client(&server).lookup(TITLE, &MetadataPreferences::default()).await.unwrap();

  assert_eq!(record.methods.unwrap().len(), 1);
  assert_eq!(record.datasets, Some(Vec::new()));
  assert!(logs_contain("Fetching datasets for attention-is-all-you-need failed"));
}

#[tokio::test]
async fn test_lookup_degrades_failed_search_to_none() {
  let server = MockServer::start().await;
  mount_status(&server, &format!("{PWC_PREFIX}/papers"), 503).await;

  assert_eq!(client(&server).lookup(TITLE, &MetadataPreferences::default()).await, None);
}

#[tokio::test]
async fn test_malformed_search_body() {
  let server = MockServer::start().await;
  mount_json(&server, &format!("{PWC_PREFIX}/papers"), json!({"results": "not a list"})).await;

  let err = client(&server).find_by_title(TITLE).await.unwrap_err();
  assert!(matches!(err, PapernoteError::MalformedResponse(_)));
}
