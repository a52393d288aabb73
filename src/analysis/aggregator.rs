use std::collections::BTreeMap;

use futures::{StreamExt, stream};
use indicatif::ProgressBar;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::{AnalysisError, TrackAnalyzer, merger},
    types::{AudioFeatures, CollectionAggregate, TrackRecord, TrackStub},
    warning,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("no track in the collection could be analyzed")]
    EmptyCollection,

    #[error("aggregation cancelled")]
    Cancelled,
}

/// Per-track breakdown keyed by the title the caller submitted.
pub type TrackBreakdown = BTreeMap<String, TrackRecord>;

/// Drives a [`TrackAnalyzer`] over a whole collection and folds the results.
pub struct CollectionAggregator {
    analyzer: TrackAnalyzer,
    concurrency: usize,
    progress: Option<ProgressBar>,
}

impl CollectionAggregator {
    pub fn new(analyzer: TrackAnalyzer) -> Self {
        Self {
            analyzer,
            concurrency: 1,
            progress: None,
        }
    }

    /// Number of tracks analyzed at once. Results keep input order either way.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub async fn aggregate(
        &self,
        tracks: &[TrackStub],
        cancel: &CancellationToken,
    ) -> Result<(CollectionAggregate, TrackBreakdown), AggregateError> {
        if let Some(pb) = &self.progress {
            pb.set_length(tracks.len() as u64);
            pb.set_position(0);
        }

        let outcomes: Vec<(&TrackStub, Result<TrackRecord, AnalysisError>)> =
            stream::iter(tracks)
                .map(|stub| async move {
                    if let Some(pb) = &self.progress {
                        pb.set_message(format!("{} - {}", stub.primary_artist(), stub.title));
                    }
                    let outcome = self
                        .analyzer
                        .analyze(&stub.id, &stub.title, stub.primary_artist(), cancel)
                        .await;
                    if let Some(pb) = &self.progress {
                        pb.inc(1);
                    }
                    (stub, outcome)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        let mut records: Vec<TrackRecord> = Vec::with_capacity(outcomes.len());
        let mut breakdown = TrackBreakdown::new();

        for (stub, outcome) in outcomes {
            match outcome {
                Ok(record) => {
                    breakdown.insert(stub.title.clone(), record.clone());
                    records.push(record);
                }
                Err(AnalysisError::Cancelled) => return Err(AggregateError::Cancelled),
                Err(e) => warning!("Skipping {} by {}: {}", stub.title, stub.primary_artist(), e),
            }
        }

        let features = AudioFeatures::mean(records.iter().map(|r| &r.features))
            .ok_or(AggregateError::EmptyCollection)?;

        let aggregate = CollectionAggregate {
            features,
            ai: merger::merge(&records),
        };

        Ok((aggregate, breakdown))
    }
}
