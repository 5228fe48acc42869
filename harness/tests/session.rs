//! Whole sessions with a mock runner, mock launcher and mock emulator

mod common;

use harness::traits::MockTestRunner;
use harness::*;
use shared::{TestItem, TestOutcome};

use common::{MockEmulator, TestFixtures, TestHelpers};

#[tokio::test]
async fn test_session_runs_selected_and_records_passed_metrics() {
    let emulator = MockEmulator::healthy(&["s3", "lambda"]).await;
    // collected for the passing test only
    emulator.mount_metrics(2, 1).await;
    emulator.mount_metrics_reset(200, 2).await;
    emulator.mount_state_reset(2).await;

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let mut session = TestSession::new(
        &config,
        Box::new(TestHelpers::counting_launcher(0, 1)),
        Box::new(TestHelpers::runner()),
    )
    .unwrap();

    let summary = session
        .run(
            Some("s3"),
            TestHelpers::items(&[TestFixtures::S3_CREATE, TestFixtures::S3_FAILING, TestFixtures::LAMBDA_INVOKE]),
        )
        .await
        .unwrap();

    assert_eq!(
        summary,
        SessionSummary {
            passed: 1,
            failed: 1,
            skipped: 0,
            deselected: vec![(
                TestItem::parse(TestFixtures::LAMBDA_INVOKE).unwrap(),
                SkipReason::NoMatchingService,
            )],
        }
    );
    assert!(!summary.success());
    assert_eq!(session.lifecycle().state(), LifecycleState::Stopped);

    let rows = TestHelpers::report_rows(session.report());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| &row[7] == TestFixtures::S3_CREATE));
}

#[tokio::test]
async fn test_deselected_items_reported_with_reasons() {
    let emulator = MockEmulator::healthy(&["rds", "eks"]).await;
    emulator.mount_metrics(0, 1).await;
    emulator.mount_metrics_reset(200, 1).await;
    emulator.mount_state_reset(1).await;

    let mut runner = MockTestRunner::new();
    runner
        .expect_run()
        .withf(|item| item.node_id() == TestFixtures::RDS_CREATE)
        .times(1)
        .returning(|_| Ok(TestOutcome::Passed));

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let mut session = TestSession::new(
        &config,
        Box::new(TestHelpers::counting_launcher(0, 1)),
        Box::new(runner),
    )
    .unwrap();

    let summary = session
        .run(
            Some("rds,eks"),
            TestHelpers::items(&[
                TestFixtures::RDS_PAGINATED,
                TestFixtures::RDS_CREATE,
                "tests/test_eks.py::test_create_cluster",
                TestFixtures::S3_CREATE,
            ]),
        )
        .await
        .unwrap();

    assert_eq!(summary.passed, 1);
    let reported: Vec<_> = summary
        .deselected
        .iter()
        .map(|(item, reason)| (item.node_id(), reason.clone()))
        .collect();
    assert_eq!(
        reported,
        vec![
            (
                TestFixtures::RDS_PAGINATED,
                SkipReason::ExcludedTestCase("test_rds.py::test_get_databases_paginated".to_string()),
            ),
            (
                "tests/test_eks.py::test_create_cluster",
                SkipReason::ExcludedService("eks".to_string()),
            ),
            (TestFixtures::S3_CREATE, SkipReason::NoMatchingService),
        ]
    );
    assert_eq!(summary.to_string(), "1 passed, 0 failed, 0 skipped, 3 deselected");
}

#[tokio::test]
async fn test_keep_running_skips_teardown() {
    let emulator = MockEmulator::healthy(&["s3"]).await;
    emulator.mount_metrics(0, 1).await;
    emulator.mount_metrics_reset(200, 1).await;
    emulator.mount_state_reset(1).await;

    let dir = TestHelpers::report_dir();
    let mut config = TestHelpers::config(&emulator.uri(), dir.path());
    config.keep_running = true;

    let mut session = TestSession::new(
        &config,
        Box::new(TestHelpers::counting_launcher(0, 0)),
        Box::new(TestHelpers::runner()),
    )
    .unwrap();

    let summary = session
        .run(Some("s3"), TestHelpers::items(&[TestFixtures::S3_CREATE]))
        .await
        .unwrap();
    assert!(summary.success());
    assert_eq!(session.lifecycle().state(), LifecycleState::Running);
}

#[tokio::test]
async fn test_metrics_reset_failure_aborts_session_with_teardown() {
    let emulator = MockEmulator::healthy(&["s3"]).await;
    emulator.mount_metrics(1, 1).await;
    emulator.mount_metrics_reset(500, 1).await;
    emulator.mount_state_reset(1).await;

    let mut runner = MockTestRunner::new();
    runner.expect_run().times(1).returning(|_| Ok(TestOutcome::Passed));

    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config(&emulator.uri(), dir.path());
    let mut session = TestSession::new(
        &config,
        Box::new(TestHelpers::counting_launcher(0, 1)),
        Box::new(runner),
    )
    .unwrap();

    let err = session
        .run(
            Some("s3"),
            TestHelpers::items(&[TestFixtures::S3_CREATE, "tests/test_s3.py::test_second"]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::MetricsResetFailed { .. }));
    assert_eq!(session.lifecycle().state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_select_with_explicit_services_leaves_emulator_alone() {
    let dir = TestHelpers::report_dir();
    let config = TestHelpers::config("http://127.0.0.1:9", dir.path());
    let mut session = TestSession::new(
        &config,
        Box::new(TestHelpers::idle_launcher()),
        Box::new(MockTestRunner::new()),
    )
    .unwrap();

    let selection = session
        .select(
            Some("lambda"),
            TestHelpers::items(&[TestFixtures::S3_CREATE, TestFixtures::LAMBDA_INVOKE]),
        )
        .await
        .unwrap();
    session.shutdown().await;

    assert_eq!(selection.selected.len(), 1);
    assert_eq!(selection.selected[0].node_id(), TestFixtures::LAMBDA_INVOKE);
    assert_eq!(session.lifecycle().state(), LifecycleState::NotStarted);
}
