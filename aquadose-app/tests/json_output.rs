use serde_json::Value;
use std::process::{Command, Output};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/knowledge_base");

fn aquadose(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aquadose"))
        .arg("--data-dir")
        .arg(DATA_DIR)
        .arg("--json")
        .args(args)
        .output()
        .unwrap()
}

/// Stdout must hold exactly one JSON document.
fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "aquadose failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}):\n{}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn analyze_json_is_the_only_stdout() {
    let output = aquadose(&["analyze", "TANK-60P", "--as-of", "2026-10-15"]);
    let json = stdout_json(&output);

    assert!(json["multiplier"].as_f64().unwrap() > 0.0);
    assert_eq!(json["as_of"], "2026-10-15");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loading knowledge base"));
    assert!(stderr.contains("[Analysis]"));
}

#[test]
fn project_json_keeps_progress_on_stderr() {
    let runs = std::env::temp_dir().join(format!("aquadose_json_runs_{}", std::process::id()));
    let runs = runs.to_str().unwrap().to_string();
    let output = aquadose(&[
        "project",
        "TANK-60P",
        "--as-of",
        "2026-10-15",
        "--no-plots",
        "--output-dir",
        &runs,
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["aquarium_id"], "TANK-60P");
    assert_eq!(json["points"].as_array().unwrap().len(), 15);
    std::fs::remove_dir_all(&runs).unwrap();
}

#[test]
fn calculators_print_plain_json() {
    let presets = stdout_json(&aquadose(&["presets"]));
    assert!(!presets.as_array().unwrap().is_empty());

    let mix = stdout_json(&aquadose(&[
        "mix", "--tap-gh", "15", "--tap-kh", "10", "--target-gh", "6",
    ]));
    assert!(mix.is_object());
}
