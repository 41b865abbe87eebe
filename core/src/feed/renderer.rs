use crate::api::DisasterRecord;
use crate::feed::layer::{LayerKind, LayerSet};
use crate::feed::marker::Marker;
use crate::feed::timestamp::TimestampFormatter;
use crate::prelude::{DisasterApi, TransportError, TransportResult};
use crate::telemetry::{LogManager, MetricsRecorder};
use std::sync::Arc;

/// Result of one refresh, for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshStatus {
    Applied { markers: usize },
    Failed(TransportError),
}

/// Keeps the marker layers consistent with the latest backend snapshot.
pub struct FeedRenderer {
    layers: LayerSet,
    formatter: TimestampFormatter,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl FeedRenderer {
    pub fn new(formatter: TimestampFormatter) -> Self {
        Self::with_metrics(formatter, Arc::new(MetricsRecorder::new()))
    }

    pub fn with_metrics(formatter: TimestampFormatter, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            layers: LayerSet::new(),
            formatter,
            logger: LogManager::new(),
            metrics,
        }
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    /// Fetches the listing and applies it. Never fails outward.
    pub async fn refresh(&mut self, api: &dyn DisasterApi) -> RefreshStatus {
        let fetched = api.list_disasters().await;
        self.apply(fetched)
    }

    /// Applies one fetch result.
    ///
    /// On failure the layers are left untouched. On success every layer is
    /// cleared once and refilled, whichever call lands last wins.
    pub fn apply(&mut self, fetched: TransportResult<Vec<DisasterRecord>>) -> RefreshStatus {
        let records = match fetched {
            Ok(records) => records,
            Err(err) => {
                self.logger.refresh_failed(&err);
                self.metrics.record_refresh_failure();
                return RefreshStatus::Failed(err);
            }
        };

        let markers = records
            .iter()
            .map(|record| Marker::from_record(record, &self.formatter))
            .collect::<Vec<_>>();
        let count = markers.len();
        self.layers.replace_all(markers);

        if count == 0 {
            self.logger.empty_feed();
        } else {
            self.logger.refresh_applied(&self.layers);
        }
        self.metrics.record_refresh();
        RefreshStatus::Applied { markers: count }
    }

    /// Presentation only; markers are kept.
    pub fn toggle(&mut self, kind: LayerKind) {
        self.layers.toggle(kind);
    }
}
