//! Orchestrator module for the movies ETL pipeline.
//!
//! Coordinates the extractor, transformer, and loader components.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::extractor::Extractor;
use crate::loader::MovieLoader;
use crate::transformer::MovieTransformer;
use movies_etl_shared::{ChangeCutoff, EntityKind};

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Entity kinds processed by each run, in order.
    pub entities: Vec<EntityKind>,
    /// Create the target index before the first run if it is missing.
    pub create_index: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            entities: EntityKind::ALL.to_vec(),
            create_index: true,
        }
    }
}

/// Outcome of one entity pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityReport {
    pub kind: EntityKind,
    /// Number of batches extracted.
    pub batches: usize,
    /// Rows extracted, equal to documents submitted.
    pub extracted: usize,
    /// Documents the engine accepted.
    pub indexed: usize,
    /// Documents the engine refused.
    pub failed: usize,
    /// Latest change of the driving table among the extracted movies.
    pub high_water_mark: Option<DateTime<Utc>>,
}

impl EntityReport {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            batches: 0,
            extracted: 0,
            indexed: 0,
            failed: 0,
            high_water_mark: None,
        }
    }
}

/// Outcome of one run over all configured entity kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub cutoff: ChangeCutoff,
    pub entities: Vec<EntityReport>,
}

impl RunReport {
    pub fn indexed(&self) -> usize {
        self.entities.iter().map(|e| e.indexed).sum()
    }

    pub fn failed(&self) -> usize {
        self.entities.iter().map(|e| e.failed).sum()
    }

    /// Latest change instant seen by any pass.
    ///
    /// Each pass measures the table that selected its movies, so the value
    /// can be passed back as `ChangeCutoff::Since` to skip changes this run
    /// already extracted.
    pub fn high_water_mark(&self) -> Option<DateTime<Utc>> {
        self.entities.iter().filter_map(|e| e.high_water_mark).max()
    }
}

/// Orchestrator that drives extract, transform and load.
///
/// Batches are processed strictly one after another: the next batch is not
/// extracted until the previous one was loaded, including its retries.
pub struct Orchestrator {
    extractor: Extractor,
    transformer: MovieTransformer,
    loader: MovieLoader,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(extractor: Extractor, transformer: MovieTransformer, loader: MovieLoader) -> Self {
        Self::with_config(extractor, transformer, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        extractor: Extractor,
        transformer: MovieTransformer,
        loader: MovieLoader,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            extractor,
            transformer,
            loader,
            config,
        }
    }

    /// Run the pipeline once, or on a fixed interval until Ctrl-C.
    ///
    /// With an interval, a failed run is logged and the next one is still
    /// scheduled; without one, the failure is returned. The cutoff is
    /// re-evaluated by every run.
    #[instrument(skip(self))]
    pub async fn run(&self, cutoff: ChangeCutoff, interval: Option<Duration>) -> Result<(), PipelineError> {
        info!(index = %self.loader.index_name(), "Starting movies ETL orchestrator");

        if let ChangeCutoff::StartOfCurrentDay = cutoff {
            warn!("Cutoff is the start of the current day: rows changed on days without a run are skipped");
        }

        if self.config.create_index {
            self.loader.ensure_index().await?;
        }

        let Some(interval) = interval else {
            self.run_once(cutoff).await?;
            return Ok(());
        };

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            if let Err(e) = self.run_once(cutoff).await {
                error!(error = %e, data_error = e.is_data_error(), "Run failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!("Orchestrator shutdown complete");
        Ok(())
    }

    /// Process every configured entity kind once.
    #[instrument(skip(self))]
    pub async fn run_once(&self, cutoff: ChangeCutoff) -> Result<RunReport, PipelineError> {
        let mut entities = Vec::with_capacity(self.config.entities.len());

        for kind in &self.config.entities {
            entities.push(self.run_entity(*kind, cutoff).await?);
        }

        let report = RunReport { cutoff, entities };
        info!(
            indexed = report.indexed(),
            failed = report.failed(),
            high_water_mark = ?report.high_water_mark(),
            "Run complete"
        );

        Ok(report)
    }

    /// Page through one entity kind's changes, loading each batch before
    /// fetching the next.
    async fn run_entity(&self, kind: EntityKind, cutoff: ChangeCutoff) -> Result<EntityReport, PipelineError> {
        let mut report = EntityReport::new(kind);
        let mut pager = self.extractor.pages(kind, cutoff);

        while let Some(rows) = pager.next_batch().await? {
            let batch_mark = rows.iter().map(|row| row.changed_at).max();
            report.high_water_mark = report.high_water_mark.max(batch_mark);
            report.batches += 1;
            report.extracted += rows.len();

            let documents = self.transformer.transform_batch(rows)?;
            let summary = self.loader.load(&documents).await?;

            report.indexed += summary.succeeded;
            report.failed += summary.failed;
        }

        info!(
            entity = %kind,
            batches = report.batches,
            extracted = report.extracted,
            indexed = report.indexed,
            failed = report.failed,
            "Entity pass complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone};
    use movies_etl_repository::{MovieSource, SearchEngineClient, SearchError, StoreError};
    use movies_etl_shared::SourceRow;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    fn row(id: Uuid, minutes: i64) -> SourceRow {
        let modified = NaiveDate::from_ymd_opt(2021, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + ChronoDuration::minutes(minutes);
        SourceRow {
            id,
            created: modified,
            modified,
            title: format!("Movie {minutes}"),
            description: Some("Description".to_string()),
            create_date: Some(modified.date()),
            age_qualification: Some(16),
            rating: Some(8.1),
            file: Some("movie.mp4".to_string()),
            categories: vec!["Drama".to_string()],
            genres: vec!["Thriller".to_string()],
            actors: vec![],
            writers: vec![],
            directors: vec![],
            changed_at: modified.and_utc(),
        }
    }

    /// Source with a fixed, sorted row set per entity kind.
    struct MockSource {
        rows: HashMap<EntityKind, Vec<SourceRow>>,
        queried: Mutex<Vec<EntityKind>>,
    }

    impl MockSource {
        fn new(counts: &[(EntityKind, usize)]) -> Self {
            let mut rows = HashMap::new();
            for (kind, count) in counts {
                let mut batch: Vec<SourceRow> = (0..*count)
                    .map(|i| row(Uuid::new_v4(), i as i64))
                    .collect();
                batch.sort_by_key(|r| r.id);
                rows.insert(*kind, batch);
            }
            Self {
                rows,
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MovieSource for MockSource {
        async fn fetch_changed(
            &self,
            kind: EntityKind,
            cutoff: ChangeCutoff,
            after: Option<Uuid>,
            limit: usize,
        ) -> Result<Vec<SourceRow>, StoreError> {
            self.queried.lock().unwrap().push(kind);
            Ok(self
                .rows
                .get(&kind)
                .map(|rows| {
                    rows.iter()
                        .filter(|r| cutoff.instant().map_or(true, |since| r.changed_at > since))
                        .filter(|r| after.map_or(true, |a| r.id > a))
                        .take(limit)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    /// Search client that accepts every document except the refused ids.
    struct MockSearchClient {
        refused: Mutex<Vec<String>>,
        bulk_calls: AtomicUsize,
        index_checks: AtomicUsize,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self {
                refused: Mutex::new(Vec::new()),
                bulk_calls: AtomicUsize::new(0),
                index_checks: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockSearchClient {
        async fn ping(&self) -> Result<(), SearchError> {
            Ok(())
        }

        async fn bulk(&self, body: String) -> Result<String, SearchError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            let refused = self.refused.lock().unwrap();

            let items: Vec<Value> = body
                .lines()
                .step_by(2)
                .map(|line| {
                    let action: Value = serde_json::from_str(line).unwrap();
                    let id = action["index"]["_id"].as_str().unwrap().to_string();
                    if refused.contains(&id) {
                        serde_json::json!({ "index": {
                            "_id": id,
                            "status": 400,
                            "error": { "type": "mapper_parsing_exception" }
                        }})
                    } else {
                        serde_json::json!({ "index": { "_id": id, "status": 201 } })
                    }
                })
                .collect();

            Ok(serde_json::json!({ "errors": !refused.is_empty(), "items": items }).to_string())
        }

        async fn ensure_index_exists(&self, _index: &str, _settings: &Value) -> Result<(), SearchError> {
            self.index_checks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn orchestrator(source: Arc<MockSource>, client: Arc<MockSearchClient>) -> Orchestrator {
        let retry = RetryPolicy::new(2, Duration::from_millis(10));
        Orchestrator::new(
            Extractor::new(source, retry.clone()),
            MovieTransformer::new(),
            MovieLoader::new(client, retry, "movies"),
        )
    }

    #[tokio::test]
    async fn test_run_once_processes_entities_in_order() {
        let source = Arc::new(MockSource::new(&[
            (EntityKind::Movie, 150),
            (EntityKind::Person, 3),
            (EntityKind::Genre, 0),
        ]));
        let client = Arc::new(MockSearchClient::new());
        let orchestrator = orchestrator(source.clone(), client.clone());

        let report = orchestrator
            .run_once(ChangeCutoff::StartOfCurrentDay)
            .await
            .unwrap();

        let kinds: Vec<EntityKind> = report.entities.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, EntityKind::ALL.to_vec());

        let movie = &report.entities[0];
        assert_eq!(movie.batches, 2);
        assert_eq!(movie.extracted, 150);
        assert_eq!(movie.indexed, 150);

        let genre = &report.entities[2];
        assert_eq!(genre.batches, 0);
        assert_eq!(genre.high_water_mark, None);

        assert_eq!(report.indexed(), 153);
        assert_eq!(report.failed(), 0);
        // Two movie pages, one person page, no genre page
        assert_eq!(client.bulk_calls.load(Ordering::SeqCst), 3);

        let queried = source.queried.lock().unwrap();
        assert_eq!(
            *queried,
            vec![EntityKind::Movie, EntityKind::Movie, EntityKind::Person, EntityKind::Genre]
        );
    }

    #[tokio::test]
    async fn test_high_water_mark_is_latest_change() {
        let source = Arc::new(MockSource::new(&[(EntityKind::Movie, 5)]));
        let client = Arc::new(MockSearchClient::new());
        let orchestrator = orchestrator(source, client);

        let report = orchestrator
            .run_once(ChangeCutoff::StartOfCurrentDay)
            .await
            .unwrap();

        let expected = Utc.with_ymd_and_hms(2021, 3, 5, 0, 4, 0).unwrap();
        assert_eq!(report.entities[0].high_water_mark, Some(expected));
        assert_eq!(report.high_water_mark(), Some(expected));
    }

    #[tokio::test]
    async fn test_person_pass_reports_person_change_time() {
        let mut source = MockSource::new(&[(EntityKind::Person, 3)]);
        // The people changed hours after the movies themselves
        for row in source.rows.get_mut(&EntityKind::Person).unwrap() {
            row.changed_at = row.modified.and_utc() + ChronoDuration::hours(5);
        }
        let latest_movie_change = source.rows[&EntityKind::Person]
            .iter()
            .map(|r| r.modified.and_utc())
            .max();
        let client = Arc::new(MockSearchClient::new());
        let orchestrator = orchestrator(Arc::new(source), client);

        let report = orchestrator
            .run_once(ChangeCutoff::StartOfCurrentDay)
            .await
            .unwrap();

        let person = &report.entities[1];
        assert_eq!(person.kind, EntityKind::Person);
        assert_eq!(
            person.high_water_mark,
            Some(Utc.with_ymd_and_hms(2021, 3, 5, 5, 2, 0).unwrap())
        );
        assert_ne!(person.high_water_mark, latest_movie_change);
    }

    #[tokio::test]
    async fn test_high_water_mark_resumes_as_cutoff() {
        let source = Arc::new(MockSource::new(&[(EntityKind::Movie, 5)]));
        let client = Arc::new(MockSearchClient::new());
        let orchestrator = orchestrator(source, client.clone());

        let since = Utc.with_ymd_and_hms(2021, 3, 5, 0, 2, 0).unwrap();
        let first = orchestrator
            .run_once(ChangeCutoff::Since(since))
            .await
            .unwrap();
        assert_eq!(first.entities[0].extracted, 2);

        let resume = ChangeCutoff::Since(first.high_water_mark().unwrap());
        let second = orchestrator.run_once(resume).await.unwrap();

        assert_eq!(second.entities[0].extracted, 0);
        assert_eq!(second.high_water_mark(), None);
        assert_eq!(client.bulk_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refused_documents_do_not_fail_the_run() {
        let source = Arc::new(MockSource::new(&[(EntityKind::Movie, 5)]));
        let refused_id = source.rows[&EntityKind::Movie][1].id.to_string();
        let client = Arc::new(MockSearchClient::new());
        client.refused.lock().unwrap().push(refused_id);
        let orchestrator = orchestrator(source, client);

        let report = orchestrator
            .run_once(ChangeCutoff::StartOfCurrentDay)
            .await
            .unwrap();

        assert_eq!(report.entities[0].indexed, 4);
        assert_eq!(report.failed(), 1);
    }

    #[tokio::test]
    async fn test_malformed_row_aborts_the_run() {
        let mut source = MockSource::new(&[(EntityKind::Movie, 3)]);
        source.rows.get_mut(&EntityKind::Movie).unwrap()[2].categories.clear();
        let client = Arc::new(MockSearchClient::new());
        let orchestrator = orchestrator(Arc::new(source), client.clone());

        let err = orchestrator
            .run_once(ChangeCutoff::StartOfCurrentDay)
            .await
            .unwrap_err();

        assert!(err.is_data_error());
        assert_eq!(client.bulk_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_run_creates_index_first() {
        let source = Arc::new(MockSource::new(&[(EntityKind::Movie, 2)]));
        let client = Arc::new(MockSearchClient::new());
        let orchestrator = orchestrator(source, client.clone());

        orchestrator
            .run(ChangeCutoff::StartOfCurrentDay, None)
            .await
            .unwrap();

        assert_eq!(client.index_checks.load(Ordering::SeqCst), 1);
        assert_eq!(client.bulk_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_index_creation_can_be_disabled() {
        let source = Arc::new(MockSource::new(&[(EntityKind::Movie, 2)]));
        let client = Arc::new(MockSearchClient::new());
        let retry = RetryPolicy::new(2, Duration::from_millis(10));
        let orchestrator = Orchestrator::with_config(
            Extractor::new(source, retry.clone()),
            MovieTransformer::new(),
            MovieLoader::new(client.clone(), retry, "movies"),
            OrchestratorConfig {
                entities: vec![EntityKind::Movie],
                create_index: false,
            },
        );

        orchestrator
            .run(ChangeCutoff::StartOfCurrentDay, None)
            .await
            .unwrap();

        assert_eq!(client.index_checks.load(Ordering::SeqCst), 0);
    }
}
