use probekit_core::{HostError, ProbeConfig, RotaryAxis, SamplePoint};
use probekit_host::{
    CylinderSurface, MachinePosition, OperatorScript, ScanController, SimulatedController,
    SimulatedHost, TiltedSurface,
};
use probekit_scan::{
    ProgramEmitter, Retrieval, RotaryScanParameters, ScanParameters, ScanSession,
};
use std::time::Duration;

const POLL: Duration = Duration::from_millis(10);
const TIMEOUT: Duration = Duration::from_secs(10);

fn parked() -> MachinePosition {
    MachinePosition {
        z: 1.0,
        ..Default::default()
    }
}

fn surface_host() -> SimulatedHost {
    let surface = |x: f64, y: f64, _a: f64, _b: f64| {
        if x > 5.0 {
            None
        } else {
            Some(0.2 + 0.01 * x - 0.02 * y)
        }
    };
    SimulatedHost::new(
        SimulatedController::new(surface, parked())
            .with_operator(OperatorScript::with_answers(["0.75"])),
    )
}

fn nine_points() -> ScanParameters {
    ScanParameters {
        start_x: 0.0,
        start_y: 0.0,
        end_x: 1.0,
        end_y: 1.0,
        spacing: 0.5,
    }
}

#[tokio::test]
async fn test_surface_scan_on_simulator() {
    let program = ProgramEmitter::new(ProbeConfig::default())
        .surface_scan(&nine_points())
        .unwrap();
    let controller = ScanController::new(surface_host());
    let mut session = ScanSession::new();

    controller.submit(&program, &mut session).await.unwrap();
    assert!(matches!(
        controller.submit(&program, &mut session).await,
        Err(HostError::Busy)
    ));

    controller.wait_for_completion(POLL, TIMEOUT).await.unwrap();
    controller.host().join().await.unwrap();

    let retrieval = controller.retrieve_surface(&mut session).await.unwrap();
    assert_eq!(retrieval, Retrieval::Ready(9));
    assert!(!controller.is_busy());

    let expected = [
        (0.0, 0.0),
        (0.5, 0.0),
        (1.0, 0.0),
        (1.0, 0.5),
        (0.5, 0.5),
        (0.0, 0.5),
        (0.0, 1.0),
        (0.5, 1.0),
        (1.0, 1.0),
    ];
    for (k, point) in session.points().iter().enumerate() {
        let (x, y) = expected[k];
        assert_eq!(point.index, k as u32 + 1);
        assert!((point.x - x).abs() < 1e-9);
        assert!((point.y - y).abs() < 1e-9);
        // zeroed on the surface at the origin then offset by the 0.75 block
        let z = 0.75 + 0.01 * x - 0.02 * y;
        assert!((point.z - z).abs() < 1e-9, "point {}: {}", k + 1, point.z);
    }

    let stats = session.statistics().unwrap();
    assert_eq!(stats.count, 9);
    assert!((stats.range_z - 0.03).abs() < 1e-9);

    let report = controller.host().last_run().unwrap().unwrap();
    assert_eq!(report.probes, 10);
    assert_eq!(report.prompts.last().map(String::as_str), Some("Complete"));
}

#[tokio::test]
async fn test_probe_miss_never_completes() {
    let params = ScanParameters {
        end_x: 6.0,
        spacing: 1.0,
        ..nine_points()
    };
    let program = ProgramEmitter::new(ProbeConfig::default())
        .surface_scan(&params)
        .unwrap();
    let controller = ScanController::new(surface_host());
    let mut session: ScanSession<SamplePoint> = ScanSession::new();

    controller.submit(&program, &mut session).await.unwrap();
    controller.host().join().await.unwrap();
    assert!(matches!(
        controller.host().last_run(),
        Some(Err(HostError::ProgramAborted { .. }))
    ));

    let retrieval = controller.retrieve_surface(&mut session).await.unwrap();
    assert_eq!(retrieval, Retrieval::NotReady);
    assert!(controller.is_busy());
    assert!(session.points().is_empty());

    let waited = controller
        .wait_for_completion(POLL, Duration::from_millis(50))
        .await;
    assert!(matches!(
        waited,
        Err(HostError::CompletionTimeout { timeout_ms: 50 })
    ));

    controller.abandon();
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_rotary_scan_on_simulator() {
    let params = RotaryScanParameters {
        start: 0.0,
        end: 1.0,
        spacing: 0.5,
        angle_step: 90.0,
        ..RotaryScanParameters::default()
    };
    let program = ProgramEmitter::new(ProbeConfig::default())
        .rotary_scan(&params)
        .unwrap();
    assert_eq!(program.total_points, 12);

    let cylinder = CylinderSurface {
        axis_height: -1.0,
        radius: 1.0,
        runout: 0.1,
    };
    let host = SimulatedHost::new(
        SimulatedController::new(cylinder, parked())
            .with_operator(OperatorScript::with_answers(["1.0"])),
    );
    let controller = ScanController::new(host);
    let mut session = ScanSession::new();

    controller.submit(&program, &mut session).await.unwrap();
    controller.wait_for_completion(POLL, TIMEOUT).await.unwrap();
    controller.host().join().await.unwrap();

    let retrieval = controller.retrieve_rotary(&mut session).await.unwrap();
    assert_eq!(retrieval, Retrieval::Ready(12));

    for (k, point) in session.points().iter().enumerate() {
        let angle = (k / 3) as f64 * 90.0;
        let position = (k % 3) as f64 * 0.5;
        assert_eq!(point.index, k as u32 + 1);
        assert!((point.a - angle).abs() < 1e-9);
        assert_eq!(point.b, 0.0);
        assert!((point.x - position).abs() < 1e-9);
        // first contact at A=0 was declared to be one radius above the axis
        let z = 0.9 + 0.1 * angle.to_radians().cos();
        assert!((point.z - z).abs() < 1e-9, "point {}: {}", k + 1, point.z);
    }

    assert!(matches!(controller.host().last_run(), Some(Ok(_))));
}

#[tokio::test]
async fn test_manual_rotation_prompts_operator() {
    let params = RotaryScanParameters {
        start: 0.0,
        end: 0.5,
        spacing: 1.0,
        angle_step: 180.0,
        rotary_axis: RotaryAxis::B,
        manual_rotation: true,
        ..RotaryScanParameters::default()
    };
    let program = ProgramEmitter::new(ProbeConfig::default())
        .rotary_scan(&params)
        .unwrap();

    let host = SimulatedHost::new(
        SimulatedController::new(
            CylinderSurface {
                axis_height: -1.0,
                radius: 1.0,
                runout: 0.0,
            },
            parked(),
        )
        .with_operator(OperatorScript::with_answers(["1.0"])),
    );
    let controller = ScanController::new(host);
    let mut session = ScanSession::new();
    controller.submit(&program, &mut session).await.unwrap();
    controller.wait_for_completion(POLL, TIMEOUT).await.unwrap();
    controller.host().join().await.unwrap();

    let report = controller.host().last_run().unwrap().unwrap();
    assert!(report
        .prompts
        .contains(&"Rotate the B-axis to 180 degrees, then press OK".to_string()));

    let retrieval = controller.retrieve_rotary(&mut session).await.unwrap();
    assert_eq!(retrieval, Retrieval::Ready(2));
    assert!((session.points()[1].b - 180.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_z_probe_on_simulator() {
    let program = ProgramEmitter::new(ProbeConfig::default()).z_probe().unwrap();
    let host = SimulatedHost::new(SimulatedController::new(
        TiltedSurface {
            height: -0.3,
            slope_x: 0.0,
            slope_y: 0.0,
        },
        parked(),
    ));
    let controller = ScanController::new(host);
    let mut session: ScanSession<SamplePoint> = ScanSession::new();

    controller.submit(&program, &mut session).await.unwrap();
    controller.wait_for_completion(POLL, TIMEOUT).await.unwrap();
    controller.host().join().await.unwrap();

    let reading = controller.retrieve_z_probe().await.unwrap().ready().unwrap();
    assert!((reading.probe_z + 0.3).abs() < 1e-9);
    assert!(reading.complete);
    assert!(!controller.is_busy());
}
