//! Command handlers run against an in-process context.

use std::io::Write;

use exploration_stats::cli::commands::answers::{self, AnswersArgs, AnswersCommands};
use exploration_stats::cli::commands::record::{self, RecordArgs, RecordCommands};
use exploration_stats::cli::commands::report::{self, ReportArgs};
use exploration_stats::cli::commands::stats::{self, StatsArgs, StatsCommands};
use exploration_stats::cli::output::CommandOutput;
use exploration_stats::cli::AppContext;
use exploration_stats::domain::models::{Config, RuleSignature, StorageBackend};
use exploration_stats::DomainError;

const CONTENT: &str = r"
explorations:
  - id: fractions
    title: Fractions
    states:
      - id: Intro
        rule_specs:
          - { name: Default, dest: Intro }
      - id: Question
        rule_specs:
          - { name: Equals, dest: End }
          - { name: Default, dest: Question }
";

async fn memory_context() -> AppContext {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    AppContext::from_config(config).await.unwrap()
}

fn content_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

async fn record_event(ctx: &AppContext, command: RecordCommands) {
    record::execute(RecordArgs { command }, ctx, true).await.unwrap();
}

#[tokio::test]
async fn test_record_then_report() {
    let ctx = memory_context().await;

    for _ in 0..3 {
        record_event(
            &ctx,
            RecordCommands::StateHit {
                exploration_id: "fractions".to_string(),
                state_id: "Question".to_string(),
            },
        )
        .await;
    }
    record_event(
        &ctx,
        RecordCommands::RuleHit {
            exploration_id: "fractions".to_string(),
            state_id: "Question".to_string(),
            rule: "Default".to_string(),
            dest: "Question".to_string(),
            extra: "7".to_string(),
        },
    )
    .await;

    let file = content_file(CONTENT);
    report::execute(
        ReportArgs {
            content_file: file.path().to_path_buf(),
            limit: None,
        },
        &ctx,
        false,
    )
    .await
    .unwrap();

    let args = ReportArgs {
        content_file: file.path().to_path_buf(),
        limit: None,
    };
    let report = report::build_report(&args, &ctx).await.unwrap();
    assert_eq!(report.total, 1);

    let json = report.to_json();
    assert_eq!(json["total"], 1);
    assert_eq!(json["states"][0]["exp_id"], "fractions");
    assert_eq!(json["states"][0]["exploration_title"], "Fractions");
    assert_eq!(json["states"][0]["state_id"], "Question");
    assert_eq!(json["states"][0]["type"], "incomplete");
    assert_eq!(json["states"][0]["rank"], 2);

    assert!(report.to_human().starts_with("Showing 1 improvable state(s):"));
}

#[tokio::test]
async fn test_report_limit_flag_overrides_config() {
    let ctx = memory_context().await;
    for state_id in ["Intro", "Question"] {
        record_event(
            &ctx,
            RecordCommands::StateHit {
                exploration_id: "fractions".to_string(),
                state_id: state_id.to_string(),
            },
        )
        .await;
    }
    record_event(
        &ctx,
        RecordCommands::RuleHit {
            exploration_id: "fractions".to_string(),
            state_id: "Intro".to_string(),
            rule: "Default".to_string(),
            dest: "Intro".to_string(),
            extra: String::new(),
        },
    )
    .await;

    let file = content_file(CONTENT);
    let report = report::build_report(
        &ReportArgs {
            content_file: file.path().to_path_buf(),
            limit: Some(0),
        },
        &ctx,
    )
    .await
    .unwrap();
    assert_eq!(report.to_json()["total"], 0);
    assert_eq!(report.to_human(), "No improvable states found.");
}

#[tokio::test]
async fn test_report_with_missing_file_fails() {
    let ctx = memory_context().await;
    let result = report::execute(
        ReportArgs {
            content_file: "/nonexistent/content.yaml".into(),
            limit: Some(3),
        },
        &ctx,
        true,
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_report_with_malformed_content_surfaces_domain_error() {
    let ctx = memory_context().await;
    let file = content_file("id: broken\nstates:\n  - id: Intro\n  - id: Intro\n");

    let err = report::execute(
        ReportArgs {
            content_file: file.path().to_path_buf(),
            limit: None,
        },
        &ctx,
        true,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::MalformedContent { .. })
    ));
}

#[tokio::test]
async fn test_invalid_reference_is_rejected() {
    let ctx = memory_context().await;
    let err = record::execute(
        RecordArgs {
            command: RecordCommands::StateHit {
                exploration_id: "   ".to_string(),
                state_id: "Intro".to_string(),
            },
        },
        &ctx,
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::InvalidReference(_))
    ));
}

#[tokio::test]
async fn test_answer_commands() {
    let ctx = memory_context().await;
    for answer in ["half", "0.5", "half"] {
        record_event(
            &ctx,
            RecordCommands::Answer {
                exploration_id: "fractions".to_string(),
                state_id: "Question".to_string(),
                answer: answer.to_string(),
            },
        )
        .await;
    }

    answers::execute(
        AnswersArgs {
            command: AnswersCommands::List {
                exploration_id: "fractions".to_string(),
                state_id: "Question".to_string(),
                top: Some(1),
            },
        },
        &ctx,
        false,
    )
    .await
    .unwrap();

    let listed = answers::list(&ctx, "fractions".to_string(), "Question".to_string(), Some(1))
        .await
        .unwrap();
    let json = listed.to_json();
    assert_eq!(json["total"], 1);
    assert_eq!(json["answers"][0]["answer"], "half");
    assert_eq!(json["answers"][0]["count"], 2);
    assert!(listed
        .to_human()
        .starts_with("Showing 1 unresolved answer(s) for fractions/Question:"));

    let listed = answers::list(&ctx, "fractions".to_string(), "Question".to_string(), None)
        .await
        .unwrap();
    assert_eq!(listed.total, 2);
    assert_eq!(listed.answers[1].answer, "0.5");

    answers::execute(
        AnswersArgs {
            command: AnswersCommands::Resolve {
                exploration_id: "fractions".to_string(),
                state_id: "Question".to_string(),
                answers: vec!["0.5".to_string()],
            },
        },
        &ctx,
        true,
    )
    .await
    .unwrap();
    let remaining = ctx.stats().get_unresolved_answers("fractions", "Question").await.unwrap();
    assert_eq!(remaining.get("half"), Some(&2));
    assert!(!remaining.contains_key("0.5"));

    let resolved = answers::resolve(&ctx, "fractions".to_string(), "Question".to_string(), &["half".to_string()])
        .await
        .unwrap();
    assert_eq!(resolved.to_json()["removed"], 1);
    assert_eq!(resolved.to_human(), "Resolved 1 answer(s) for fractions/Question");

    answers::execute(
        AnswersArgs {
            command: AnswersCommands::Clear {
                exploration_id: "fractions".to_string(),
                state_id: "Question".to_string(),
            },
        },
        &ctx,
        false,
    )
    .await
    .unwrap();
    assert!(ctx
        .stats()
        .get_unresolved_answers("fractions", "Question")
        .await
        .unwrap()
        .is_empty());

    let cleared = answers::clear(&ctx, "fractions".to_string(), "Question".to_string())
        .await
        .unwrap();
    let json = cleared.to_json();
    assert_eq!(json["success"], true);
    assert!(json.get("removed").is_none());
    let listed = answers::list(&ctx, "fractions".to_string(), "Question".to_string(), None)
        .await
        .unwrap();
    assert_eq!(listed.to_human(), "No unresolved answers for fractions/Question.");
}

#[tokio::test]
async fn test_stats_commands() {
    let ctx = memory_context().await;
    for _ in 0..2 {
        record_event(
            &ctx,
            RecordCommands::StateHit {
                exploration_id: "fractions".to_string(),
                state_id: "Intro".to_string(),
            },
        )
        .await;
    }
    record_event(
        &ctx,
        RecordCommands::RuleHit {
            exploration_id: "fractions".to_string(),
            state_id: "Intro".to_string(),
            rule: "Default".to_string(),
            dest: "Intro".to_string(),
            extra: "learner typed 5".to_string(),
        },
    )
    .await;
    record_event(
        &ctx,
        RecordCommands::Answer {
            exploration_id: "fractions".to_string(),
            state_id: "Intro".to_string(),
            answer: "5".to_string(),
        },
    )
    .await;

    stats::execute(
        StatsArgs {
            command: StatsCommands::Show {
                exploration_id: "fractions".to_string(),
                state_id: "Intro".to_string(),
                top: None,
            },
        },
        &ctx,
        false,
    )
    .await
    .unwrap();

    let summary = stats::show(&ctx, "fractions", "Intro", None).await.unwrap();
    let json = summary.to_json();
    assert_eq!(json["exploration_id"], "fractions");
    assert_eq!(json["state_id"], "Intro");
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["default_rule_hits"], 1);
    assert_eq!(json["incomplete_count"], 1);
    assert_eq!(json["rules"][0]["rule"]["name"], "Default");
    assert_eq!(json["rules"][0]["hits"], 1);
    assert_eq!(json["top_unresolved_answers"][0][0], "5");
    assert_eq!(json["top_unresolved_answers"][0][1], 1);
    assert!(summary.to_human().contains("Total hits:         2"));

    let summary = stats::show(&ctx, "fractions", "Intro", Some(0)).await.unwrap();
    assert!(summary.summary.top_unresolved_answers.is_empty());

    stats::execute(
        StatsArgs {
            command: StatsCommands::RuleLog {
                exploration_id: "fractions".to_string(),
                state_id: "Intro".to_string(),
                rule: "Default".to_string(),
                dest: "Intro".to_string(),
                limit: 5,
            },
        },
        &ctx,
        true,
    )
    .await
    .unwrap();

    let log = stats::rule_log(&ctx, "fractions", "Intro", RuleSignature::default_rule("Intro"), 5)
        .await
        .unwrap();
    let json = log.to_json();
    assert_eq!(json["total"], 1);
    assert_eq!(json["rule"]["dest"], "Intro");
    assert_eq!(json["records"][0]["extra_info"], "learner typed 5");

    let empty = stats::rule_log(&ctx, "fractions", "Intro", RuleSignature::new("Equals", "End"), 5)
        .await
        .unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.to_human().starts_with("No audit records for rule"));
}
