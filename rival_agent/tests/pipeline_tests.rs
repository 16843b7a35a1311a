//! End-to-end pipeline tests against mocked external services

use rival_core::{
    CompetitorCategory, CompetitorRecord, Feature, FeatureCategory, GapSeverity, IntelError,
    ReferenceProduct, StoreError,
};
use rival_agent::{AgentConfig, CompetitorSeed, IntelPipeline};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

fn config_for(server: &MockServer) -> AgentConfig {
    AgentConfig {
        github_api_base: server.uri(),
        llm_base_url: server.uri(),
        llm_api_key: Some("test-key".to_string()),
        ..AgentConfig::default()
    }
}

fn reference_product() -> ReferenceProduct {
    ReferenceProduct::new(
        "AI development supervision and code review tool",
        vec![Feature::new(
            "Code Quality Check",
            "Checks code complexity and conventions",
            FeatureCategory::Core,
        )],
    )
}

async fn mount_sonarqube_mocks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/SonarSource/sonarqube"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "stargazers_count": 9200,
            "forks_count": 2100,
            "watchers_count": 9200,
            "open_issues_count": 120,
            "description": "Continuous code quality inspection",
            "language": "Java",
            "topics": ["static-analysis"],
            "created_at": "2014-07-25T07:00:00Z",
            "updated_at": "2026-08-01T12:00:00Z",
            "homepage": "https://www.sonarsource.com"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/SonarSource/sonarqube/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "html_url": "https://github.com/SonarSource/sonarqube/blob/master/README.md"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content":
                "Based on the description, the core feature set is:\n\
                 [{\"name\": \"code quality check\", \"description\": \"Inspects code quality\", \"category\": \"core\"},\n\
                  {\"name\": \"Security Scan\", \"description\": \"Finds vulnerable code\", \"category\": \"core\"},\n\
                  {\"name\": \"Auto Deploy\", \"description\": \"Deploys after checks pass\", \"category\": \"advanced\"}]"
            }}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_collect_then_analyze_end_to_end() {
    init_tracing();
    let server = MockServer::start().await;
    mount_sonarqube_mocks(&server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = dir.path().join("competitors");
    let output_dir = dir.path().join("analysis");
    let pipeline = IntelPipeline::new(&data_dir, &output_dir, &config_for(&server)).unwrap();

    // One seed enriched from the hosting API, one bare seed with a
    // defaulted website and nothing to extract from
    let seeds = vec![
        CompetitorSeed::new("SonarQube")
            .with_website("https://www.sonarsource.com")
            .with_repository("https://github.com/SonarSource/sonarqube"),
        CompetitorSeed::new("Mystery Tool"),
    ];
    let batch = pipeline.collect(&seeds).await.unwrap();
    assert_eq!(batch.collected, vec!["sonarqube", "mystery-tool"]);
    assert!(batch.failed.is_empty());

    let sonarqube = pipeline.store().load("sonarqube").unwrap();
    assert_eq!(sonarqube.description, "Continuous code quality inspection");
    assert_eq!(sonarqube.technology_stack, vec!["Java", "static-analysis"]);

    let mystery = pipeline.store().load("mystery-tool").unwrap();
    assert_eq!(mystery.website, "https://mysterytool.com");
    assert!(mystery.description.is_empty());

    // A manually entered competitor that already carries its features
    let mut manual = CompetitorRecord::new(
        "CodeRabbit",
        CompetitorCategory::Direct,
        "https://coderabbit.ai",
    );
    manual.feature_list = vec![
        Feature::new("Code Quality Check", "Quality gate", FeatureCategory::Core),
        Feature::new("PR Chat", "Discussion on diffs", FeatureCategory::Advanced),
    ];
    pipeline.store().save(&manual).unwrap();

    let report = pipeline.analyze(&reference_product()).await.unwrap();

    // Store order is sorted ids: coderabbit, mystery-tool, sonarqube
    assert_eq!(report.competitors_analyzed, 3);
    let names: Vec<&str> = report
        .competitor_summaries
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["CodeRabbit", "Mystery Tool", "SonarQube"]);

    // CodeRabbit: PR Chat missing (medium). Mystery Tool: nothing.
    // SonarQube: Security Scan missing (high), Auto Deploy missing (medium).
    assert_eq!(report.total_gaps, 3);
    assert_eq!(report.total_suggestions, 1);
    assert_eq!(report.high_priority_suggestions, 1);
    assert_eq!(report.suggestions[0].source_feature, "Security Scan");
    assert_eq!(report.suggestions[0].priority, 4);

    let summaries = &report.competitor_summaries;
    assert_eq!(summaries[0].gap_count, 1);
    assert_eq!(summaries[0].suggestion_count, 0);
    assert_eq!(summaries[1].feature_count, 0);
    assert_eq!(summaries[2].gap_count, 2);
    assert_eq!(summaries[2].suggestion_count, 1);

    // Persisted artifacts: report JSON, Markdown sibling, store summary
    assert_eq!(pipeline.load_report().unwrap(), report);
    let markdown = std::fs::read_to_string(output_dir.join("analysis_report.md")).unwrap();
    assert!(markdown.contains("#### 1. Implement Security Scan"));
    assert!(data_dir.join("summary.json").exists());
}

#[tokio::test]
async fn test_case_insensitive_match_survives_the_full_run() {
    init_tracing();
    let server = MockServer::start().await;
    mount_sonarqube_mocks(&server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pipeline = IntelPipeline::new(
        dir.path().join("competitors"),
        dir.path().join("analysis"),
        &config_for(&server),
    )
    .unwrap();

    pipeline
        .collect(&[CompetitorSeed::new("SonarQube")
            .with_repository("https://github.com/SonarSource/sonarqube")])
        .await
        .unwrap();

    let report = pipeline.analyze(&reference_product()).await.unwrap();

    // The model reply lowercases "code quality check"; it must still match
    // the reference feature and never produce a suggestion
    assert!(report
        .suggestions
        .iter()
        .all(|s| !s.source_feature.eq_ignore_ascii_case("code quality check")));
    assert_eq!(report.total_gaps, 2);
}

#[tokio::test]
async fn test_batch_continues_past_failing_seed() {
    init_tracing();
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = dir.path().join("competitors");
    std::fs::create_dir_all(&data_dir).unwrap();
    // Occupy the record path with a directory so the save fails
    std::fs::create_dir(data_dir.join("broken-seed.json")).unwrap();

    let pipeline = IntelPipeline::new(&data_dir, dir.path().join("analysis"), &config_for(&server))
        .unwrap();

    let batch = pipeline
        .collect(&[
            CompetitorSeed::new("Broken Seed"),
            CompetitorSeed::new("Fine Seed"),
        ])
        .await
        .unwrap();

    assert_eq!(batch.failed, vec!["Broken Seed"]);
    assert_eq!(batch.collected, vec!["fine-seed"]);
}

#[tokio::test]
async fn test_analyze_propagates_store_corruption() {
    init_tracing();
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = dir.path().join("competitors");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("corrupt.json"), "{ definitely not json").unwrap();

    let pipeline = IntelPipeline::new(&data_dir, dir.path().join("analysis"), &config_for(&server))
        .unwrap();

    let err = pipeline.analyze(&reference_product()).await.unwrap_err();
    assert!(matches!(
        err,
        rival_agent::AgentError::Core(IntelError::Store(StoreError::Malformed { .. }))
    ));
}

#[tokio::test]
async fn test_unconfigured_run_degrades_to_empty_analysis() {
    init_tracing();
    // No tokens, unreachable endpoints: the run still completes
    let config = AgentConfig {
        github_api_base: "http://127.0.0.1:9".to_string(),
        llm_base_url: "http://127.0.0.1:9".to_string(),
        ..AgentConfig::default()
    };

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pipeline = IntelPipeline::new(
        dir.path().join("competitors"),
        dir.path().join("analysis"),
        &config,
    )
    .unwrap();

    let batch = pipeline
        .collect(&[CompetitorSeed::new("Offline Tool")
            .with_repository("https://github.com/offline/tool")])
        .await
        .unwrap();
    assert_eq!(batch.collected.len(), 1);

    let record = pipeline.store().load("offline-tool").unwrap();
    assert!(record.description.is_empty());
    assert!(record.technology_stack.is_empty());

    let report = pipeline.analyze(&reference_product()).await.unwrap();
    assert_eq!(report.competitors_analyzed, 1);
    assert_eq!(report.total_gaps, 0);
    assert_eq!(report.total_suggestions, 0);
}

#[tokio::test]
async fn test_gap_severities_follow_competitor_categories() {
    init_tracing();
    let server = MockServer::start().await;
    mount_sonarqube_mocks(&server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pipeline = IntelPipeline::new(
        dir.path().join("competitors"),
        dir.path().join("analysis"),
        &config_for(&server),
    )
    .unwrap();

    pipeline
        .collect(&[CompetitorSeed::new("SonarQube")
            .with_repository("https://github.com/SonarSource/sonarqube")])
        .await
        .unwrap();

    let record = pipeline.store().load("sonarqube").unwrap();
    let extracted = rival_agent::FeatureExtractor::new(&config_for(&server))
        .unwrap()
        .extract(&record)
        .await
        .into_value();
    let gaps = rival_core::analyze_features(
        &reference_product().features,
        &extracted,
        &record.name,
    );

    let by_name = |name: &str| gaps.iter().find(|g| g.feature_name == name).unwrap();
    assert_eq!(by_name("code quality check").severity, GapSeverity::Low);
    assert_eq!(by_name("Security Scan").severity, GapSeverity::High);
    assert_eq!(by_name("Auto Deploy").severity, GapSeverity::Medium);
}
