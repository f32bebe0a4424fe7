//! Simulation loops driven on tokio's paused clock.

use std::time::Duration;

use atpl_extractor::broadcast::JobEventKind;
use atpl_extractor::model::{CreateJobRequest, Credentials, JobStatus, LogFilter};
use atpl_extractor::simulation::{ScriptedSource, SimulationConfig};
use atpl_extractor::{Database, ExtractionService};

fn config() -> SimulationConfig {
    SimulationConfig {
        tick_interval_ms: 1000,
        questions_per_subject: 100,
        ..SimulationConfig::default()
    }
}

fn service_with(db: Database, source: ScriptedSource) -> ExtractionService {
    ExtractionService::with_sources(db, config(), source.factory())
}

fn create(service: &ExtractionService, subjects: &[&str]) -> String {
    service
        .create_job(CreateJobRequest {
            name: "Simulated run".to_string(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            credentials: Some(Credentials::new("pilot", "secret")),
            settings: None,
        })
        .unwrap()
        .id
}

#[tokio::test(start_paused = true)]
async fn test_job_runs_to_completion() {
    let service = service_with(
        Database::open_in_memory().unwrap(),
        ScriptedSource::new().always_increment(50),
    );
    let job_id = create(&service, &["010"]);
    let mut events = service.store().progress().subscribe();

    service.start(&job_id).unwrap();
    assert!(service.simulations().is_active(&job_id));

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let job = service.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.extracted_questions, 100);
    assert!(job.end_time.is_some());
    assert!(!service.simulations().is_active(&job_id));

    let results = service.list_results(Some(&job_id)).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_name, "010_questions.json");
    assert_eq!(results[0].question_count, 100);

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(event.kind);
    }
    assert_eq!(kinds.first(), Some(&JobEventKind::Started));
    assert!(kinds.contains(&JobEventKind::Progress));
    assert_eq!(kinds.last(), Some(&JobEventKind::Completed));

    let messages: Vec<String> = service
        .list_logs(&job_id, &LogFilter::default())
        .unwrap()
        .into_iter()
        .map(|l| l.message)
        .collect();
    assert!(messages.contains(&"Extraction progress: 100/100 questions".to_string()));
    assert!(messages.contains(&"Extraction job completed successfully".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_counters_until_resumed() {
    let service = service_with(
        Database::open_in_memory().unwrap(),
        ScriptedSource::new().always_increment(30),
    );
    let job_id = create(&service, &["010"]);

    service.start(&job_id).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    service.pause(&job_id).unwrap();
    assert!(!service.simulations().is_active(&job_id));

    tokio::time::sleep(Duration::from_secs(10)).await;
    let paused = service.get_job(&job_id).unwrap();
    assert_eq!(paused.status, JobStatus::Paused);
    assert_eq!(paused.extracted_questions, 30);

    service.start(&job_id).unwrap();
    tokio::time::sleep(Duration::from_millis(3500)).await;
    let done = service.get_job(&job_id).unwrap();
    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.extracted_questions, 100);
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_the_loop() {
    let service = service_with(
        Database::open_in_memory().unwrap(),
        ScriptedSource::new().always_increment(10),
    );
    let job_id = create(&service, &["010", "050"]);

    service.start(&job_id).unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    service.stop(&job_id).unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let job = service.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.extracted_questions, 20);
    assert_eq!(service.simulations().active_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_launch_is_refused() {
    let service = service_with(Database::open_in_memory().unwrap(), ScriptedSource::new());
    let job_id = create(&service, &["010"]);

    service.start(&job_id).unwrap();
    assert!(!service.simulations().launch(&job_id));
    assert_eq!(service.simulations().active_count(), 1);

    service.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_pauses_jobs_left_running() {
    let db = Database::open_in_memory().unwrap();
    let service = service_with(db.clone(), ScriptedSource::new());
    let first = create(&service, &["010"]);
    let second = create(&service, &["021"]);
    service.start(&first).unwrap();
    service.start(&second).unwrap();

    service.shutdown().await;
    assert_eq!(service.simulations().active_count(), 0);
    // Shutdown leaves the stored status alone.
    assert_eq!(service.get_job(&first).unwrap().status, JobStatus::Running);

    let restarted = service_with(db, ScriptedSource::new());
    let mut paused = restarted.reconcile_interrupted().unwrap();
    paused.sort();
    let mut expected = vec![first.clone(), second];
    expected.sort();
    assert_eq!(paused, expected);

    let logs = restarted.list_logs(&first, &LogFilter::default()).unwrap();
    assert_eq!(
        logs.last().map(|l| l.message.as_str()),
        Some("Extraction interrupted by server restart")
    );
}

#[tokio::test(start_paused = true)]
async fn test_storage_error_fails_the_job() {
    let db = Database::open_in_memory().unwrap();
    let service = service_with(
        db.clone(),
        ScriptedSource::new().always_increment(10).chances([true]),
    );
    let job_id = create(&service, &["010"]);

    // The first tick rolls a failure and cannot store it.
    db.with_conn(|conn| Ok(conn.execute_batch("DROP TABLE failed_questions")?))
        .unwrap();

    service.start(&job_id).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let job = service.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.extracted_questions, 0);
    assert!(job.end_time.is_some());
    assert!(!service.simulations().is_active(&job_id));

    let last = service
        .list_logs(&job_id, &LogFilter::default())
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(last.message, "Simulation error");
    assert!(last.details.unwrap().contains("failed_questions"));
}
