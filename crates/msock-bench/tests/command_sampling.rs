//! Sampling real processes
//!
//! `sh` stands in for the msock example binaries, printing the same kind of
//! timing record.

#![cfg(unix)]

use msock_bench::{
    BenchError, BenchmarkRunner, CommandSampler, Config, FailurePolicy, ParseError, Progress,
    SampleError, SampleSource,
};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

fn stub(script: &str) -> CommandSampler {
    CommandSampler::new("sh").args(["-c", script])
}

#[tokio::test]
async fn test_sample_from_stub_output() {
    let mut sampler = stub(
        "echo '1503.117ms total, 150.312ns per message, 1503117.000ns per process'; echo 'done!'",
    );
    assert_eq!(sampler.sample().await.unwrap(), 150.312);
}

#[tokio::test]
async fn test_malformed_output_is_parse_error() {
    let mut sampler = stub("echo a,b,c");
    match sampler.sample().await {
        Err(SampleError::Parse(ParseError::MissingUnit { field })) => assert_eq!(field, "b"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_output_is_parse_error() {
    let mut sampler = stub("true");
    assert!(matches!(
        sampler.sample().await,
        Err(SampleError::Parse(ParseError::FieldCount { found: 1 }))
    ));
}

#[tokio::test]
async fn test_nonzero_exit_is_reported() {
    let mut sampler = stub("echo '1ms total, 2ns per message, 3ns per process'; exit 3");
    match sampler.sample().await {
        Err(SampleError::ExitStatus { status }) => assert_eq!(status.code(), Some(3)),
        other => panic!("expected exit status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_kills_hung_process() {
    let mut sampler = stub("sleep 30").timeout(Duration::from_millis(200));
    let started = Instant::now();

    let result = sampler.sample().await;

    assert!(matches!(result, Err(SampleError::Timeout(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_working_dir_is_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("timing.txt"),
        "10ms total, 42.5ns per message, 10ns per process\n",
    )
    .unwrap();

    let mut sampler = stub("cat timing.txt").working_dir(dir.path());
    assert_eq!(sampler.sample().await.unwrap(), 42.5);
}

#[tokio::test]
async fn test_run_over_varying_samples() {
    // Each run bumps a counter file, so the samples are 1ns..=5ns
    let dir = tempfile::tempdir().unwrap();
    let script = r#"n=$(cat count 2>/dev/null || echo 0); n=$((n + 1)); echo $n > count; echo "${n}ms total, ${n}ns per message, ${n}ns per process""#;
    let sampler = stub(script).working_dir(dir.path());

    let mut config = Config::default();
    config.benchmark.iterations = 5;

    let mut runner = BenchmarkRunner::new(sampler);
    let mut progress = Progress::new(Vec::new());
    let results = runner.run(&config, &mut progress).await.unwrap();

    assert_eq!(results.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(results.summary.mean, 3.0);
    assert!((results.summary.std_dev - 1.4142135624).abs() < 1e-9);
    assert_eq!(progress.into_inner(), b".....\n".to_vec());
}

#[tokio::test]
async fn test_skip_policy_with_flaky_process() {
    // Odd runs fail, even runs succeed
    let dir = tempfile::tempdir().unwrap();
    let script = r#"n=$(cat count 2>/dev/null || echo 0); n=$((n + 1)); echo $n > count; if [ $((n % 2)) -eq 1 ]; then exit 1; fi; echo "1ms total, 100ns per message, 1ns per process""#;
    let sampler = stub(script).working_dir(dir.path());

    let mut config = Config::default();
    config.benchmark.iterations = 4;
    config.benchmark.on_failure = FailurePolicy::Skip;

    let mut runner = BenchmarkRunner::new(sampler);
    let mut progress = Progress::new(Vec::new());
    let results = runner.run(&config, &mut progress).await.unwrap();

    assert_eq!(results.samples, vec![100.0, 100.0]);
    assert_eq!(results.failed_iterations, 2);
    assert_eq!(progress.into_inner(), b"x.x.\n".to_vec());
}

#[tokio::test]
async fn test_abort_policy_names_iteration() {
    let mut config = Config::default();
    config.benchmark.iterations = 3;

    let mut runner = BenchmarkRunner::new(stub("echo a,b,c"));
    let mut progress = Progress::new(Vec::new());
    let err = runner.run(&config, &mut progress).await.unwrap_err();

    assert!(matches!(err, BenchError::Sample { iteration: 0, .. }));
    assert_eq!(progress.marks(), 0);
}
