use muscle_chart::chart::{LabelPosition, MuscleBarChart, TrainingZone, project_visual_tree};
use muscle_chart::core::{ChartConfiguration, Viewport};
use muscle_chart::render::{LineStrokeStyle, NullRenderer, Renderer};

const HOST_JSON: &str = r#"{
    "muscles": {
        "Pecs": {"targetCompound": ["Bench press"], "synergists": ["Dips"]},
        "Lats": {"targetCompound": ["Pull-up", "Row"]}
    },
    "barData": {
        "Chest": [
            {"name": "Pecs", "targetCompound": 9, "synergists": 2.5}
        ],
        "Back": [
            {"name": "Lats", "targetCompound": 12},
            {"name": "Traps", "stabilizers": 3}
        ],
        "Arms": [
            {"name": "Biceps", "targetIsolation": 6, "synergists": 6},
            {"name": "Triceps", "targetIsolation": 4, "synergists": 4.5},
            {"name": "Forearms", "stabilizers": 7}
        ]
    }
}"#;

fn host_config() -> ChartConfiguration {
    serde_json::from_str(HOST_JSON).expect("host json")
}

#[test]
fn flattened_series_keeps_group_then_intra_group_order() {
    let config = host_config();
    let tree = MuscleBarChart::build(&config.muscles, &config.bar_data).expect("tree");
    let names: Vec<&str> = tree.data.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Pecs", "Lats", "Traps", "Biceps", "Triceps", "Forearms"]
    );
}

#[test]
fn dividers_mark_each_later_group_start() {
    let tree = MuscleBarChart::from_configuration(&host_config()).expect("tree");
    let dividers: Vec<&str> = tree.group_dividers.iter().map(|d| d.x.as_str()).collect();
    assert_eq!(dividers, vec!["Lats", "Biceps"]);
    assert!(
        tree.group_dividers
            .iter()
            .all(|d| d.dash.dash_px == 3.0 && d.dash.gap_px == 3.0)
    );

    let labels: Vec<&str> = tree.group_areas.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["Chest", "Back", "Arms"]);
    assert!(tree.group_areas.iter().all(|a| a.overflow_visible));
    assert!(
        tree.group_areas
            .iter()
            .all(|a| a.label_position == LabelPosition::InsideTop && a.label_offset_px == 10.0)
    );
}

#[test]
fn reference_bands_are_fixed_regardless_of_data() {
    let tree = MuscleBarChart::from_configuration(&host_config()).expect("tree");
    let bands: Vec<(f64, f64, TrainingZone, &str)> = tree
        .reference_bands
        .iter()
        .map(|b| (b.y1, b.y2, b.zone, b.label.as_str()))
        .collect();
    assert_eq!(
        bands,
        vec![
            (15.0, 30.0, TrainingZone::Hypertrophy, "Hypertrophy range"),
            (10.0, 20.0, TrainingZone::Strength, "Strength range"),
        ]
    );
    let ys: Vec<f64> = tree.reference_lines.iter().map(|l| l.y).collect();
    assert_eq!(ys, vec![10.0, 15.0, 20.0, 30.0]);
}

#[test]
fn projected_frame_carries_dashed_reference_lines() {
    let tree = MuscleBarChart::from_configuration(&host_config()).expect("tree");
    let frame = project_visual_tree(&tree, Viewport::new(900, 600)).expect("frame");

    let dashed = frame
        .lines
        .iter()
        .filter(|line| matches!(line.stroke_style, LineStrokeStyle::Dashed { .. }))
        .count();
    // Four horizontal reference lines and two group dividers.
    assert_eq!(dashed, 6);

    for label in ["Strength range", "Hypertrophy range", "Sets per week", "Forearms"] {
        assert!(frame.texts.iter().any(|text| text.text == label), "{label}");
    }

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.last_line_count, frame.lines.len());
    assert_eq!(renderer.last_rect_count, frame.rects.len());
    assert_eq!(renderer.last_text_count, frame.texts.len());
    assert!(renderer.last_rect_count > 0);
    assert_eq!(renderer.frames_rendered, 1);
}

#[test]
fn visual_tree_serializes_for_external_renderers() {
    let tree = MuscleBarChart::from_configuration(&host_config()).expect("tree");
    let json = serde_json::to_value(&tree).expect("json");
    assert_eq!(json["y_axis"]["domain"], serde_json::json!([0.0, 50.0]));
    assert_eq!(json["bars"][3]["category"], "stabilizers");
    assert_eq!(json["data"][0]["targetCompound"], 9.0);
}
