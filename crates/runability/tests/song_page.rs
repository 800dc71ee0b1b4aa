//! Extraction and scoring against a full song page.

use runability::*;
use serde_json::json;

/// Trimmed-down copy of a song page's markup.
const ANTI_HERO_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Anti-Hero by Taylor Swift</title></head>
<body>
  <main>
    <h1>Anti-Hero</h1>
    <div class="flex flex-col">
      <p>
        This track is <span class="font-semibold">high energy</span>, with
        a tempo of <span class="font-semibold">97 BPM</span>. It is
        <span class="font-semibold">
          danceable
        </span>
        with a time signature of 4 beats per bar.
      </p>
    </div>
    <dl class="grid">
      <div><dt class="text-sm">Key </dt><dd>E Major</dd></div>
      <div><dt class="text-sm">Tempo (BPM) </dt><dd>97</dd></div>
      <dt class="text-sm">Duration </dt>
      <dd class="text-lg"> 3:21 </dd>
    </dl>
  </main>
</body>
</html>"#;

#[test]
fn test_full_page_extraction() {
    let labels = extract_labels(ANTI_HERO_PAGE);
    assert_eq!(labels.energy_label.as_deref(), Some("high energy"));
    assert_eq!(labels.danceability_label.as_deref(), Some("danceable"));
    assert_eq!(labels.duration.as_deref(), Some("3:21"));
}

#[test]
fn test_full_page_score() {
    let result = ScoreTables::default().score(extract_labels(ANTI_HERO_PAGE));
    assert_eq!(result.duration, "3:21");
    assert!((result.runability_score - 0.7875).abs() < 1e-9);
}

#[test]
fn test_result_json_shape() {
    let result = ScoreTables::default().score(extract_labels(ANTI_HERO_PAGE));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["duration"], "3:21");
    assert_eq!(value["energy"], json!({ "label": "high energy", "score": 0.8 }));
    assert_eq!(
        value["danceability"],
        json!({ "label": "danceable", "score": 0.75 })
    );
    assert!(value["runability_score"].is_f64());
}

#[test]
fn test_absent_labels_serialize_as_null() {
    let result = ScoreTables::default().score(extract_labels("<html></html>"));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({
            "duration": "Unknown",
            "runability_score": 0.0,
            "energy": null,
            "danceability": null,
        })
    );
}
