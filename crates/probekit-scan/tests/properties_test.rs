use probekit_core::{LinearAxis, RotaryAxis, RotarySamplePoint, SamplePoint};
use probekit_scan::decoder::{decode_rotary_store, decode_surface_store, Retrieval, VariableStore};
use probekit_scan::encoder::{render_array, render_object};
use probekit_scan::{RotaryScanParameters, ScanParameters, ScanPlanner, MAX_SCAN_POINTS};
use proptest::prelude::*;
use serde_json::json;

fn arb_surface() -> impl Strategy<Value = ScanParameters> {
    (
        -50.0..50.0f64,
        -50.0..50.0f64,
        0.1..20.0f64,
        0.1..20.0f64,
        0.25..5.0f64,
    )
        .prop_map(|(start_x, start_y, width, height, spacing)| ScanParameters {
            start_x,
            start_y,
            end_x: start_x + width,
            end_y: start_y + height,
            spacing,
        })
        .prop_filter("within point cap", |p| p.total_points() <= MAX_SCAN_POINTS)
}

fn arb_rotary() -> impl Strategy<Value = RotaryScanParameters> {
    (
        -10.0..10.0f64,
        0.1..10.0f64,
        0.25..2.0f64,
        1.0..=360.0f64,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(start, length, spacing, angle_step, along_y, b_axis)| RotaryScanParameters {
                start,
                end: start + length,
                spacing,
                angle_step,
                linear_axis: if along_y { LinearAxis::Y } else { LinearAxis::X },
                rotary_axis: if b_axis { RotaryAxis::B } else { RotaryAxis::A },
                manual_rotation: false,
            },
        )
        .prop_filter("within point cap", |p| p.total_points() <= MAX_SCAN_POINTS)
}

fn coordinate() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6f64
}

fn ready_store(variable: &str, text: String) -> VariableStore {
    VariableStore::from_pairs(vec![
        ("COMPLETE".to_string(), json!(1)),
        (variable.to_string(), json!(text)),
    ])
}

proptest! {
    #[test]
    fn prop_surface_plan_shape(params in arb_surface()) {
        let plan = ScanPlanner::new().surface(&params).unwrap();
        prop_assert_eq!(plan.points.len() as u64, params.total_points());

        for (k, point) in plan.points.iter().enumerate() {
            prop_assert_eq!(point.index as usize, k + 1);
            prop_assert!(point.x >= params.start_x && point.x <= params.end_x);
            prop_assert!(point.y >= params.start_y && point.y <= params.end_y);
        }

        if plan.x_count > 1 {
            for row in plan.points.chunks(plan.x_count) {
                let ascending = row[0].row % 2 == 0;
                for pair in row.windows(2) {
                    if ascending {
                        prop_assert!(pair[1].x > pair[0].x);
                    } else {
                        prop_assert!(pair[1].x < pair[0].x);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_rotary_plan_angles(params in arb_rotary()) {
        let plan = ScanPlanner::new().rotary(&params).unwrap();
        prop_assert_eq!(plan.points.len() as u64, params.total_points());

        for (k, angle) in plan.angles().enumerate() {
            prop_assert_eq!(angle, k as f64 * params.angle_step);
            prop_assert!(angle < 360.0);
        }
        for (k, point) in plan.points.iter().enumerate() {
            prop_assert_eq!(point.index as usize, k + 1);
            prop_assert!(point.position >= params.start && point.position <= params.end);
        }
    }

    #[test]
    fn prop_surface_round_trip(
        coords in prop::collection::vec((coordinate(), coordinate(), coordinate()), 0..40)
    ) {
        let points: Vec<SamplePoint> = coords
            .iter()
            .enumerate()
            .map(|(k, (x, y, z))| SamplePoint::new(k as u32 + 1, *x, *y, *z))
            .collect();

        let objects: Vec<String> = points
            .iter()
            .map(|p| {
                render_object(&[
                    ("x", p.x.to_string()),
                    ("y", p.y.to_string()),
                    ("z", p.z.to_string()),
                    ("i", p.index.to_string()),
                ])
                .unwrap()
            })
            .collect();

        let decoded = decode_surface_store(&ready_store("SCANDATA", render_array(&objects)));
        prop_assert_eq!(decoded, Retrieval::Ready(points));
    }

    #[test]
    fn prop_rotary_round_trip(
        coords in prop::collection::vec(
            (coordinate(), coordinate(), coordinate(), 0.0..360.0f64, 0.0..360.0f64),
            1..20
        )
    ) {
        let points: Vec<RotarySamplePoint> = coords
            .iter()
            .enumerate()
            .map(|(k, (x, y, z, a, b))| RotarySamplePoint::new(k as u32 + 1, *x, *y, *z, *a, *b))
            .collect();

        let objects: Vec<String> = points
            .iter()
            .map(|p| {
                render_object(&[
                    ("x", p.x.to_string()),
                    ("y", p.y.to_string()),
                    ("z", p.z.to_string()),
                    ("a", p.a.to_string()),
                    ("b", p.b.to_string()),
                    ("i", p.index.to_string()),
                ])
                .unwrap()
            })
            .collect();

        let decoded = decode_rotary_store(&ready_store("rotaryData", render_array(&objects)));
        prop_assert_eq!(decoded, Retrieval::Ready(points));
    }
}
