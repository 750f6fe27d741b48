//! Scan sessions
//!
//! A session is owned by the caller. It is reset when a program is
//! submitted and filled in one go when results are retrieved.

use chrono::{DateTime, Duration, Utc};
use probekit_core::HasHeight;
use serde::{Deserialize, Serialize};

/// Points and timing of one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSession<P> {
    points: Vec<P>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl<P> Default for ScanSession<P> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }
}

/// Summary figures for a retrieved scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanStatistics {
    /// Number of points
    pub count: usize,
    /// Lowest Z
    pub min_z: f64,
    /// Highest Z
    pub max_z: f64,
    /// Mean Z
    pub mean_z: f64,
    /// `max_z - min_z`
    pub range_z: f64,
    /// Time between submission and retrieval
    pub duration: Option<Duration>,
}

impl<P> ScanSession<P> {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the points and stamp the start time
    pub fn begin(&mut self) {
        self.begin_at(Utc::now());
    }

    /// [`begin`](Self::begin) with an explicit timestamp
    pub fn begin_at(&mut self, at: DateTime<Utc>) {
        self.points.clear();
        self.started_at = Some(at);
        self.finished_at = None;
    }

    /// Store the retrieved points and stamp the end time
    pub fn complete(&mut self, points: Vec<P>) {
        self.complete_at(points, Utc::now());
    }

    /// [`complete`](Self::complete) with an explicit timestamp
    pub fn complete_at(&mut self, points: Vec<P>, at: DateTime<Utc>) {
        self.points = points;
        self.finished_at = Some(at);
    }

    /// Retrieved points in visitation order
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// When the program was submitted
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the results were retrieved
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// True once results have been stored
    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Elapsed time between submission and retrieval
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

impl<P: HasHeight> ScanSession<P> {
    /// Z statistics, `None` when there are no points
    pub fn statistics(&self) -> Option<ScanStatistics> {
        if self.points.is_empty() {
            return None;
        }

        let (min_z, max_z, sum) = self.points.iter().map(HasHeight::height).fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), z| (min.min(z), max.max(z), sum + z),
        );

        Some(ScanStatistics {
            count: self.points.len(),
            min_z,
            max_z,
            mean_z: sum / self.points.len() as f64,
            range_z: max_z - min_z,
            duration: self.duration(),
        })
    }
}
