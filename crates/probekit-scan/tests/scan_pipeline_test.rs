use probekit_core::{ProbeConfig, SamplePoint};
use probekit_scan::decoder::{decode_surface, Retrieval};
use probekit_scan::program::{ProgramEmitter, ScanKind};
use probekit_scan::session::ScanSession;
use probekit_scan::{ScanParameters, ScanPlanner};
use serde_json::json;

fn reference_config() -> ProbeConfig {
    ProbeConfig {
        probe_speed: 1.0,
        safe_z: 0.5,
        retract_distance: 0.125,
        input_number: 7,
        max_probe_depth: -2.0,
        ..ProbeConfig::default()
    }
}

fn nine_point_area() -> ScanParameters {
    ScanParameters {
        start_x: 0.0,
        start_y: 0.0,
        end_x: 1.0,
        end_y: 1.0,
        spacing: 0.5,
    }
}

const EXPECTED_ORDER: [(f64, f64); 9] = [
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

#[test]
fn test_nine_point_surface_scan() {
    let params = nine_point_area();

    let plan = ScanPlanner::new().surface(&params).unwrap();
    let order: Vec<(f64, f64)> = plan.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(order, EXPECTED_ORDER.to_vec());

    let program = ProgramEmitter::new(reference_config())
        .surface_scan(&params)
        .unwrap();
    assert_eq!(program.kind, ScanKind::Surface);
    let text = program.text();

    // one append block per sample, each closed by its index field
    for index in 1..=9 {
        let needle = format!("&SCANDATA = &SCANDATA + \",&quot;i&quot;:\" + {}\n", index);
        assert_eq!(text.matches(&needle).count(), 1, "block {}", index);
    }
    assert!(!text.contains("&quot;i&quot;:\" + 10\n"));
    assert!(text.contains("&TOTALPOINTS = 9\n"));
    assert!(text.ends_with("&COMPLETE = 1\nPAUSE \"Complete\"\n"));

    // what the controller would have accumulated
    let objects: Vec<String> = EXPECTED_ORDER
        .iter()
        .enumerate()
        .map(|(k, (x, y))| {
            format!(
                "{{&quot;x&quot;:{},&quot;y&quot;:{},&quot;z&quot;:{},&quot;i&quot;:{}}}",
                x,
                y,
                -0.01 * (k as f64 + 1.0),
                k + 1
            )
        })
        .collect();
    let accumulator = format!("[{}]", objects.join(","));
    let snapshot = json!({
        "opensbp": {
            "tempVariables": {
                "COMPLETE": 1,
                "TOTALPOINTS": 9,
                "SCANCOMPLETE": 1,
                "SCANDATA": accumulator,
            }
        }
    });

    let mut session = ScanSession::new();
    session.begin();
    let points = match decode_surface(&snapshot).unwrap() {
        Retrieval::Ready(points) => points,
        other => panic!("expected points, got {:?}", other),
    };
    session.complete(points);

    assert_eq!(session.points().len(), 9);
    for (k, point) in session.points().iter().enumerate() {
        let (x, y) = EXPECTED_ORDER[k];
        assert_eq!(
            *point,
            SamplePoint::new(k as u32 + 1, x, y, -0.01 * (k as f64 + 1.0))
        );
    }

    let stats = session.statistics().unwrap();
    assert_eq!(stats.count, 9);
    assert_eq!(stats.max_z, -0.01);
}

#[test]
fn test_aborted_run_never_reads_as_success() {
    let partial = "[{&quot;x&quot;:0,&quot;y&quot;:0,&quot;z&quot;:-0.01,&quot;i&quot;:1},{&quot;x&quot;:0.5";

    let not_finished = json!({
        "opensbp": { "tempVariables": { "COMPLETE": 0, "SCANDATA": partial } }
    });
    assert_eq!(decode_surface(&not_finished).unwrap(), Retrieval::NotReady);

    let flagged = json!({
        "opensbp": { "tempVariables": { "COMPLETE": 1, "SCANDATA": partial } }
    });
    assert!(matches!(
        decode_surface(&flagged).unwrap(),
        Retrieval::Malformed { .. }
    ));
}

#[test]
fn test_dense_grid_is_rejected_before_emission() {
    let params = ScanParameters {
        start_x: 0.0,
        start_y: 0.0,
        end_x: 100.0,
        end_y: 100.0,
        spacing: 0.1,
    };
    let err = ProgramEmitter::new(reference_config())
        .surface_scan(&params)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parameter error: Too many points (1002001). Maximum is 10000"
    );
}
