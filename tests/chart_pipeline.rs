//! End-to-end runs of the chart pipeline over snapshot directories.

use {
    chrono::{DateTime, Utc},
    serde_json::{Value, json},
    std::{fs, path::Path, time::Duration},
    tempfile::tempdir,
    vaccination_chart::{Calendar, ChartError, Collector, Processor, write_chart},
};

fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
}

fn probe(
    practice_id: &str,
    insurance: &str,
    next: Option<&str>,
    slotted: Option<&str>,
) -> Value {
    let availabilities: Vec<Value> = slotted
        .map(|date| vec![json!({ "date": date, "slots": ["09:00"] })])
        .unwrap_or_default();

    json!({
        "source": {
            "bookingSource": {
                "vaccination": "BIONTECH_PFIZER",
                "insurance": insurance,
                "site": { "doctolib": { "practiceId": practice_id } }
            },
            "url": "https://example.org"
        },
        "response": {
            "next": next,
            "data": { "total": 0, "availabilities": availabilities }
        }
    })
}

fn failed_probe(practice_id: &str) -> Value {
    json!({
        "source": {
            "bookingSource": {
                "vaccination": "MODERNA",
                "insurance": "PUBLIC",
                "site": { "doctolib": { "practiceId": practice_id } }
            }
        },
        "error": { "status": 503 }
    })
}

fn write_batch(dir: &Path, name: &str, date: &str, results: Vec<Value>) {
    let batch = json!({ "date": date, "results": results });
    fs::write(dir.join(name), serde_json::to_string(&batch).unwrap()).unwrap();
}

fn processor(public_only: bool) -> Processor {
    Processor::new(Calendar::default(), Duration::from_secs(3600), public_only)
}

fn run(
    input: &Path,
    output: &Path,
    public_only: bool,
    now: DateTime<Utc>,
) -> vaccination_chart::Result<()> {
    let batches = Collector::new(input).run()?;
    let chart = processor(public_only).process(&batches, now)?;
    write_chart(output, &chart)
}

fn seed(dir: &Path) {
    write_batch(
        dir,
        "2021-06-01T08-00.json",
        "2021-06-01T08:00:00.000Z",
        vec![
            probe("158431", "PUBLIC", Some("2021-06-04"), None),
            probe("158431", "PUBLIC", Some("2021-06-02"), Some("2021-06-06")),
            probe("158431", "PUBLIC", None, None),
            probe("158431", "PRIVATE", Some("2021-06-02"), None),
            failed_probe("158434"),
        ],
    );
    write_batch(
        dir,
        "2021-06-02T11-00.json",
        "2021-06-02T11:00:00.000Z",
        vec![probe("158436", "PUBLIC", Some("2021-06-03"), None)],
    );
    write_batch(
        dir,
        "2021-06-02T10-59.json",
        "2021-06-02T10:59:59.999Z",
        vec![probe("158433", "PUBLIC", Some("2021-06-03"), None)],
    );
}

#[test]
fn test_full_chart_output() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed(input.path());

    let out = output.path().join("chartData.json");
    run(input.path(), &out, true, at("2021-06-02T12:00:00Z")).unwrap();

    let chart: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(chart["updatedAt"], "2021-06-02T12:00:00.000Z");

    // Only the batch sampled exactly one hour before now is recent
    assert_eq!(
        chart["current"],
        json!([{ "type": "BIONTECH_PFIZER", "location": "TEGEL", "insurance": "PUBLIC", "days": 1 }])
    );

    let overall = chart["overall"].as_array().unwrap();
    assert_eq!(overall.len(), 2);
    assert_eq!(overall[0]["date"], "2021-06-01");
    // 3 and 5 days, the missing one excluded, the private one filtered out
    assert_eq!(
        overall[0]["vaccinations"],
        json!([{ "type": "BIONTECH_PFIZER", "location": "ARENA", "insurance": "PUBLIC", "days": 4 }])
    );
    assert_eq!(overall[1]["date"], "2021-06-02");
    assert_eq!(overall[1]["vaccinations"].as_array().unwrap().len(), 2);
}

#[test]
fn test_private_records_form_their_own_group() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed(input.path());

    let out = output.path().join("chartData.json");
    run(input.path(), &out, false, at("2021-06-02T12:00:00Z")).unwrap();

    let chart: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let first_day = chart["overall"][0]["vaccinations"].as_array().unwrap();
    assert_eq!(first_day.len(), 2);
    assert_eq!(first_day[1]["insurance"], "PRIVATE");
    assert_eq!(first_day[1]["days"], 1);
}

#[test]
fn test_identical_runs_are_byte_identical() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed(input.path());

    let now = at("2021-06-02T12:00:00Z");
    let first = output.path().join("first.json");
    let second = output.path().join("second.json");
    run(input.path(), &first, true, now).unwrap();
    run(input.path(), &second, true, now).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_unknown_site_aborts_without_output() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed(input.path());
    write_batch(
        input.path(),
        "2021-06-03.json",
        "2021-06-03T08:00:00.000Z",
        vec![probe("424242", "PUBLIC", Some("2021-06-05"), None)],
    );

    let out = output.path().join("chartData.json");
    let err = run(input.path(), &out, true, at("2021-06-03T09:00:00Z")).unwrap_err();
    assert!(matches!(err, ChartError::UnknownSite(ref id) if id == "424242"));
    assert!(!out.exists());
}

#[test]
fn test_empty_directory_writes_empty_series() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    let out = output.path().join("chartData.json");
    run(input.path(), &out, true, at("2021-06-02T12:00:00Z")).unwrap();

    let chart: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        chart,
        json!({ "updatedAt": "2021-06-02T12:00:00.000Z", "current": [], "overall": [] })
    );
}

#[test]
fn test_unfamiliar_insurance_class_does_not_abort() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_batch(
        input.path(),
        "a.json",
        "2021-06-02T11:30:00.000Z",
        vec![
            probe("158431", "SELF_PAYER", Some("2021-06-09"), None),
            probe("158431", "PUBLIC", Some("2021-06-04"), None),
        ],
    );
    let now = at("2021-06-02T12:00:00Z");

    let filtered = output.path().join("filtered.json");
    run(input.path(), &filtered, true, now).unwrap();
    let chart: Value = serde_json::from_str(&fs::read_to_string(&filtered).unwrap()).unwrap();
    assert_eq!(
        chart["current"],
        json!([{ "type": "BIONTECH_PFIZER", "location": "ARENA", "insurance": "PUBLIC", "days": 2 }])
    );

    let unfiltered = output.path().join("unfiltered.json");
    run(input.path(), &unfiltered, false, now).unwrap();
    let chart: Value = serde_json::from_str(&fs::read_to_string(&unfiltered).unwrap()).unwrap();
    let current = chart["current"].as_array().unwrap();
    assert_eq!(current.len(), 2);
    assert_eq!(current[0]["insurance"], "SELF_PAYER");
    assert_eq!(current[0]["days"], 7);
}
