use papernote::{frontmatter::NoteDocument, vault::FsVault};
use serde_yaml::Value as YamlValue;

use super::*;

const NOTE: &str = "papers/Attention_Is_All_You_Need.md";

fn front_matter(content: &str) -> serde_yaml::Mapping {
  NoteDocument::parse(Path::new(NOTE), content).unwrap().front_matter
}

#[traced_test]
#[tokio::test]
async fn test_creates_full_note() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_all(&server).await;
  let (config, vault_dir) = test_config(&server);

  let outcome = Papernote::from_config(config).create_paper_note("W2626778328").await?;
  assert!(outcome.created);
  assert_eq!(outcome.path, Path::new(NOTE));

  let content = read_note(&vault_dir, NOTE);
  let properties = front_matter(&content);
  assert_eq!(properties.get("id"), Some(&YamlValue::from("https://openalex.org/W2626778328")));
  assert_eq!(properties.get("display_name"), Some(&YamlValue::from(TITLE)));
  assert_eq!(properties.get("pdf_url"), Some(&YamlValue::from("https://papers.nips.cc/paper/7181.pdf")));
  assert_eq!(properties.get("publication_year"), Some(&YamlValue::from(2017)));
  assert_eq!(properties.get("paperswithcode"), Some(&YamlValue::from("attention-is-all-you-need")));
  assert_eq!(properties.get("mag"), Some(&YamlValue::from("2626778328")));
  assert_eq!(
    properties.get("author_names"),
    Some(&serde_yaml::from_str("[Ashish Vaswani, Noam Shazeer]")?)
  );
  assert_eq!(properties.get("keywords"), Some(&serde_yaml::from_str("[Transformer]")?));
  assert!(properties.get("abstract").is_none());
  assert!(properties.get("ids").is_none());
  assert_eq!(outcome.properties, properties.len());

  assert!(content.ends_with(
    "---\nThe dominant sequence models\n\n**Datasets:** \
     [WMT 2014](https://paperswithcode.com/dataset/wmt-2014)\n\n**Methods:** [Multi-Head \
     Attention](https://paperswithcode.com/method/multi-head-attention)"
  ));
  Ok(())
}

#[tokio::test]
async fn test_existing_properties_survive_without_overwrite() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_all(&server).await;
  let (config, vault_dir) = test_config(&server);

  std::fs::create_dir_all(vault_dir.path().join("papers"))?;
  std::fs::write(
    vault_dir.path().join(NOTE),
    "---\ndisplay_name: My own title\nstatus: reading\n---\nMy notes.\n",
  )?;

  let outcome = Papernote::from_config(config).create_paper_note("W2626778328").await?;
  assert!(!outcome.created);

  let content = read_note(&vault_dir, NOTE);
  let properties = front_matter(&content);
  assert_eq!(properties.get("display_name"), Some(&YamlValue::from("My own title")));
  assert_eq!(properties.get("status"), Some(&YamlValue::from("reading")));
  assert_eq!(properties.get("id"), Some(&YamlValue::from("https://openalex.org/W2626778328")));

  let body = NoteDocument::parse(Path::new(NOTE), &content)?.body;
  assert!(body.starts_with("My notes.\nThe dominant sequence models"));
  Ok(())
}

#[tokio::test]
async fn test_overwrite_replaces_existing_properties() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_all(&server).await;
  let (config, vault_dir) = test_config(&server);

  std::fs::create_dir_all(vault_dir.path().join("papers"))?;
  std::fs::write(vault_dir.path().join(NOTE), "---\ndisplay_name: My own title\n---\n")?;

  Papernote::from_config(config.with_overwrite(true)).create_paper_note("W2626778328").await?;

  let properties = front_matter(&read_note(&vault_dir, NOTE));
  assert_eq!(properties.get("display_name"), Some(&YamlValue::from(TITLE)));
  Ok(())
}

#[tokio::test]
async fn test_missing_abstract_is_not_an_error() -> TestResult<()> {
  let server = MockServer::start().await;
  let mut work = work_json();
  work.as_object_mut().unwrap().remove("abstract_inverted_index");
  mount_json(&server, "/works/W2626778328", work).await;
  mount_json(&server, &format!("{PWC_PREFIX}/papers"), json!({"results": []})).await;
  let (config, vault_dir) = test_config(&server);

  let outcome = Papernote::from_config(config).create_paper_note("W2626778328").await?;
  assert_eq!(outcome.paper.abstract_text.as_deref(), Some(""));

  let content = read_note(&vault_dir, NOTE);
  assert!(content.ends_with("---\n"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_implementation_failure_still_creates_note() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_json(&server, "/works/W2626778328", work_json()).await;
  mount_status(&server, &format!("{PWC_PREFIX}/papers"), 500).await;
  let (config, vault_dir) = test_config(&server);

  let outcome = Papernote::from_config(config).create_paper_note("W2626778328").await?;
  assert!(outcome.created);

  let content = read_note(&vault_dir, NOTE);
  let properties = front_matter(&content);
  assert!(properties.get("paperswithcode").is_none());
  assert!(properties.get("pdf_url").is_none());
  assert_eq!(properties.get("doi"), Some(&YamlValue::from("https://doi.org/10.48550/arxiv.1706.03762")));
  assert!(!content.contains("**Methods:**"));
  assert!(!content.contains("**Datasets:**"));
  Ok(())
}

#[tokio::test]
async fn test_bibliographic_failure_leaves_vault_untouched() {
  let server = MockServer::start().await;
  mount_status(&server, "/works/W2626778328", 500).await;
  let (config, vault_dir) = test_config(&server);

  let err = Papernote::from_config(config).create_paper_note("W2626778328").await.unwrap_err();
  assert!(err.is_fetch_error());
  assert_eq!(std::fs::read_dir(vault_dir.path()).unwrap().count(), 0);

  let requests = server.received_requests().await.unwrap();
  assert!(requests.iter().all(|request| !request.url.path().starts_with(PWC_PREFIX)));
}

#[tokio::test]
async fn test_disabled_preferences_stay_out_of_note() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_json(&server, "/works/W2626778328", work_json()).await;
  mount_json(&server, &format!("{PWC_PREFIX}/papers"), pwc_search_json()).await;
  mount_json(
    &server,
    &format!("{PWC_PREFIX}/papers/attention-is-all-you-need/methods"),
    pwc_methods_json(),
  )
  .await;
  Mock::given(method("GET"))
    .and(path(format!("{PWC_PREFIX}/papers/attention-is-all-you-need/datasets")))
    .respond_with(ResponseTemplate::new(200).set_body_json(pwc_datasets_json()))
    .expect(0)
    .mount(&server)
    .await;
  let (config, vault_dir) = test_config(&server);
  let config = config.with_metadata(MetadataPreferences {
    datasets: false,
    authors: false,
    ids: false,
    abstract_text: false,
    ..Default::default()
  });

  let outcome = Papernote::from_config(config).create_paper_note("W2626778328").await?;
  assert_eq!(outcome.paper.datasets, None);

  let content = read_note(&vault_dir, NOTE);
  let properties = front_matter(&content);
  for key in ["author_ids", "author_names", "openalex", "doi", "mag", "paperswithcode"] {
    assert!(properties.get(key).is_none(), "{key} leaked");
  }
  assert!(!content.contains("**Datasets:**"));
  assert!(!content.contains("The dominant sequence models"));
  assert!(content.contains("**Methods:**"));
  Ok(())
}

#[tokio::test]
async fn test_untitled_work_is_rejected() {
  let server = MockServer::start().await;
  mount_json(&server, "/works/W1", json!({"id": "https://openalex.org/W1", "display_name": null}))
    .await;
  let (config, vault_dir) = test_config(&server);

  let err = Papernote::from_config(config).create_paper_note("W1").await.unwrap_err();
  assert!(matches!(err, PapernoteError::MissingTitle(_)));
  assert_eq!(std::fs::read_dir(vault_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_custom_vault() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_all(&server).await;
  let (config, _unused) = test_config(&server);
  let vault_dir = tempdir()?;
  let vault = Arc::new(FsVault::new(vault_dir.path()));

  let papernote = Papernote::with_vault(config, vault.clone());
  papernote.create_paper_note("W2626778328").await?;

  assert!(vault.get_file_by_path(Path::new(NOTE)).await?.is_some());
  Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_for_same_paper_both_succeed() -> TestResult<()> {
  let server = MockServer::start().await;
  mount_all(&server).await;

  for _ in 0..10 {
    let (config, vault_dir) = test_config(&server);
    let papernote = Arc::new(Papernote::from_config(config));

    let runs: Vec<_> = (0..2)
      .map(|_| {
        let papernote = Arc::clone(&papernote);
        tokio::spawn(async move { papernote.create_paper_note("W2626778328").await })
      })
      .collect();
    let mut created = 0;
    for run in runs {
      let outcome = run.await??;
      created += usize::from(outcome.created);
    }
    assert_eq!(created, 1);

    let properties = front_matter(&read_note(&vault_dir, NOTE));
    assert_eq!(properties.get("display_name"), Some(&YamlValue::from(TITLE)));
  }
  Ok(())
}
