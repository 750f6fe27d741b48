//! Scan controller
//!
//! Sits between the operator-facing layer and a [`ControllerHost`]. Only one
//! program may be outstanding at a time: a submission made while another is
//! in flight fails with [`HostError::Busy`] until the earlier one has been
//! retrieved or abandoned.

use crate::host::ControllerHost;
use parking_lot::Mutex;
use probekit_core::{HostError, RotarySamplePoint, SamplePoint};
use probekit_scan::decoder::{
    decode_rotary_store, decode_surface_store, decode_z_probe_store, VariableStore,
};
use probekit_scan::{Retrieval, ScanKind, ScanProgram, ScanSession, ZProbeReading};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives one host, one scan at a time
pub struct ScanController<H: ControllerHost> {
    host: H,
    outstanding: Mutex<Option<ScanKind>>,
}

impl<H: ControllerHost> ScanController<H> {
    /// Create a controller for a host
    pub fn new(host: H) -> Self {
        Self {
            host,
            outstanding: Mutex::new(None),
        }
    }

    /// The wrapped host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Kind of the program awaiting retrieval, if any
    pub fn outstanding(&self) -> Option<ScanKind> {
        *self.outstanding.lock()
    }

    /// True while a program awaits retrieval
    pub fn is_busy(&self) -> bool {
        self.outstanding.lock().is_some()
    }

    /// Submit a program and reset the session that will receive its results
    pub async fn submit<P>(
        &self,
        program: &ScanProgram,
        session: &mut ScanSession<P>,
    ) -> Result<(), HostError> {
        {
            let mut outstanding = self.outstanding.lock();
            if outstanding.is_some() {
                warn!("Rejected {} program: a scan is already outstanding", program.kind);
                return Err(HostError::Busy);
            }
            *outstanding = Some(program.kind);
        }

        if let Err(e) = self.host.submit_program(&program.text()).await {
            *self.outstanding.lock() = None;
            return Err(e);
        }

        session.begin();
        info!(
            "Submitted {} program ({} points) to {}",
            program.kind,
            program.total_points,
            self.host.name()
        );
        Ok(())
    }

    /// Give up on the outstanding program
    pub fn abandon(&self) {
        if let Some(kind) = self.outstanding.lock().take() {
            info!("Abandoned outstanding {} program", kind);
        }
    }

    async fn store(&self) -> Result<VariableStore, HostError> {
        let snapshot = self.host.config_snapshot().await?;
        VariableStore::from_snapshot(&snapshot)
    }

    /// Fail when a different kind of program is outstanding
    fn check_kind(&self, requested: ScanKind) -> Result<(), HostError> {
        match *self.outstanding.lock() {
            Some(outstanding) if outstanding != requested => {
                warn!(
                    "Refused {} retrieval: a {} scan is outstanding",
                    requested, outstanding
                );
                Err(HostError::KindMismatch {
                    outstanding: outstanding.to_string(),
                    requested: requested.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn settle<T>(&self, retrieval: &Retrieval<T>) {
        if !matches!(retrieval, Retrieval::NotReady) {
            *self.outstanding.lock() = None;
        }
    }

    async fn retrieve_points<P>(
        &self,
        session: &mut ScanSession<P>,
        kind: ScanKind,
        decode: fn(&VariableStore) -> Retrieval<Vec<P>>,
    ) -> Result<Retrieval<usize>, HostError> {
        self.check_kind(kind)?;
        let retrieval = decode(&self.store().await?);
        self.settle(&retrieval);
        Ok(retrieval.map(|points| {
            let count = points.len();
            session.complete(points);
            count
        }))
    }

    /// Retrieve surface scan points into a session
    ///
    /// On success the session holds the points and the count is returned.
    /// Fails with [`HostError::KindMismatch`] while another kind of program is
    /// outstanding, leaving it outstanding.
    pub async fn retrieve_surface(
        &self,
        session: &mut ScanSession<SamplePoint>,
    ) -> Result<Retrieval<usize>, HostError> {
        self.retrieve_points(session, ScanKind::Surface, decode_surface_store).await
    }

    /// Retrieve rotary scan points into a session
    pub async fn retrieve_rotary(
        &self,
        session: &mut ScanSession<RotarySamplePoint>,
    ) -> Result<Retrieval<usize>, HostError> {
        self.retrieve_points(session, ScanKind::Rotary, decode_rotary_store).await
    }

    /// Retrieve the single Z probe reading
    pub async fn retrieve_z_probe(&self) -> Result<Retrieval<ZProbeReading>, HostError> {
        self.check_kind(ScanKind::ZProbe)?;
        let retrieval = decode_z_probe_store(&self.store().await?);
        self.settle(&retrieval);
        Ok(retrieval)
    }

    /// Poll the completion flag until it is set
    pub async fn wait_for_completion(
        &self,
        poll: Duration,
        timeout: Duration,
    ) -> Result<(), HostError> {
        let waiting = async {
            loop {
                if self.store().await?.is_complete() {
                    return Ok::<(), HostError>(());
                }
                debug!("Completion flag not set, polling again in {:?}", poll);
                tokio::time::sleep(poll).await;
            }
        };

        match tokio::time::timeout(timeout, waiting).await {
            Ok(result) => result,
            Err(_) => Err(HostError::CompletionTimeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[derive(Default)]
    struct MockHost {
        submitted: Arc<Mutex<Vec<String>>>,
        snapshot: Arc<Mutex<Value>>,
        reject: bool,
    }

    #[async_trait]
    impl ControllerHost for MockHost {
        fn name(&self) -> &str {
            "mock"
        }

        async fn submit_program(&self, program: &str) -> Result<(), HostError> {
            if self.reject {
                return Err(HostError::SubmissionRejected {
                    reason: "offline".to_string(),
                });
            }
            self.submitted.lock().push(program.to_string());
            Ok(())
        }

        async fn config_snapshot(&self) -> Result<Value, HostError> {
            Ok(self.snapshot.lock().clone())
        }
    }

    fn program() -> ScanProgram {
        ScanProgram {
            kind: ScanKind::Surface,
            total_points: 1,
            lines: vec!["&COMPLETE = 0".to_string()],
        }
    }

    #[tokio::test]
    async fn test_busy_until_retrieved() {
        let host = MockHost::default();
        let snapshot = host.snapshot.clone();
        *snapshot.lock() = json!({ "opensbp": { "tempVariables": { "COMPLETE": 0 } } });
        let controller = ScanController::new(host);
        let mut session = ScanSession::new();

        controller.submit(&program(), &mut session).await.unwrap();
        assert!(controller.is_busy());
        assert!(matches!(
            controller.submit(&program(), &mut session).await,
            Err(HostError::Busy)
        ));

        let retrieval = controller.retrieve_surface(&mut session).await.unwrap();
        assert_eq!(retrieval, Retrieval::NotReady);
        assert!(controller.is_busy());

        *snapshot.lock() = json!({ "opensbp": { "tempVariables": {
            "COMPLETE": 1,
            "SCANDATA": "[{&quot;x&quot;:1,&quot;y&quot;:2,&quot;z&quot;:0.5,&quot;i&quot;:1}]"
        } } });
        let retrieval = controller.retrieve_surface(&mut session).await.unwrap();
        assert_eq!(retrieval, Retrieval::Ready(1));
        assert!(!controller.is_busy());
        assert_eq!(session.points(), &[SamplePoint::new(1, 1.0, 2.0, 0.5)]);
        assert!(session.is_complete());
    }

    #[tokio::test]
    async fn test_retrieving_other_kind_keeps_gate() {
        let host = MockHost::default();
        *host.snapshot.lock() = json!({ "opensbp": { "tempVariables": {
            "COMPLETE": 1,
            "PROBEDATA": "{}"
        } } });
        let controller = ScanController::new(host);
        let mut surface: ScanSession<SamplePoint> = ScanSession::new();
        let mut rotary: ScanSession<RotarySamplePoint> = ScanSession::new();
        controller.submit(&program(), &mut surface).await.unwrap();

        assert!(matches!(
            controller.retrieve_rotary(&mut rotary).await,
            Err(HostError::KindMismatch { .. })
        ));
        assert!(matches!(
            controller.retrieve_z_probe().await,
            Err(HostError::KindMismatch { .. })
        ));
        assert_eq!(controller.outstanding(), Some(ScanKind::Surface));
        assert!(rotary.points().is_empty());
        assert!(rotary.started_at().is_none());
    }

    #[tokio::test]
    async fn test_rejected_submission_releases_gate() {
        let host = MockHost {
            reject: true,
            ..Default::default()
        };
        let controller = ScanController::new(host);
        let mut session: ScanSession<SamplePoint> = ScanSession::new();
        assert!(matches!(
            controller.submit(&program(), &mut session).await,
            Err(HostError::SubmissionRejected { .. })
        ));
        assert!(!controller.is_busy());
        assert!(session.started_at().is_none());
    }

    #[tokio::test]
    async fn test_missing_channel_propagates() {
        let host = MockHost::default();
        *host.snapshot.lock() = json!({ "machine": {} });
        let controller = ScanController::new(host);
        let mut session = ScanSession::new();
        assert!(matches!(
            controller.retrieve_rotary(&mut session).await,
            Err(HostError::ChannelMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_abandon() {
        let controller = ScanController::new(MockHost::default());
        let mut session: ScanSession<SamplePoint> = ScanSession::new();
        controller.submit(&program(), &mut session).await.unwrap();
        assert_eq!(controller.outstanding(), Some(ScanKind::Surface));
        controller.abandon();
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_wait_for_completion_times_out() {
        let host = MockHost::default();
        *host.snapshot.lock() = json!({ "opensbp": { "tempVariables": {} } });
        let controller = ScanController::new(host);
        let result = controller
            .wait_for_completion(Duration::from_millis(5), Duration::from_millis(30))
            .await;
        assert!(matches!(
            result,
            Err(HostError::CompletionTimeout { timeout_ms: 30 })
        ));
    }
}
