use std::fs::{self, OpenOptions};
use std::io::Write;

use predicates::str::contains;
use tempfile::TempDir;

macro_rules! saga_trip {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("saga-trip")
    };
}

#[test]
fn resume_finishes_a_rollback_that_failed_midway() {
    let dir = TempDir::new().expect("create temp dir");
    let journal = dir.path().join("trip.jsonl");
    let broken = dir.path().join("broken.toml");
    fs::write(
        &broken,
        "[flight]\nbook = \"decline\"\n\n[hotel]\ncancel = \"unavailable\"\n",
    )
    .expect("write scenario");

    saga_trip!()
        .arg("run")
        .arg("--scenario")
        .arg(&broken)
        .arg("--journal")
        .arg(&journal)
        .assert()
        .failure()
        .stdout(contains("Trip trip-1 halted at flight-failed"))
        .stderr(contains("caused by: hotel service unavailable"));

    saga_trip!()
        .arg("resume")
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success()
        .stdout(contains("Trip trip-1: hotel-cancelled"));
}

#[test]
fn resume_continues_forward_after_an_outage() {
    let dir = TempDir::new().expect("create temp dir");
    let journal = dir.path().join("trip.jsonl");
    let outage = dir.path().join("outage.toml");
    fs::write(&outage, "[car]\nbook = \"unavailable\"\n").expect("write scenario");

    saga_trip!()
        .arg("run")
        .arg("--scenario")
        .arg(&outage)
        .arg("--journal")
        .arg(&journal)
        .assert()
        .failure()
        .stdout(contains("halted at flight-booked"));

    saga_trip!()
        .arg("resume")
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success()
        .stdout(contains("Trip trip-1: car-rented"))
        .stdout(contains("car: CAR-trip-1"));
}

#[test]
fn resume_skips_an_entry_cut_off_mid_write() {
    let dir = TempDir::new().expect("create temp dir");
    let journal = dir.path().join("trip.jsonl");
    let outage = dir.path().join("outage.toml");
    fs::write(&outage, "[car]\nbook = \"unavailable\"\n").expect("write scenario");

    saga_trip!()
        .arg("run")
        .arg("--scenario")
        .arg(&outage)
        .arg("--journal")
        .arg(&journal)
        .assert()
        .failure()
        .stdout(contains("halted at flight-booked"));
    OpenOptions::new()
        .append(true)
        .open(&journal)
        .expect("open journal")
        .write_all(br#"{"trip_id":"trip-1","state":"car-re"#)
        .expect("write partial entry");

    saga_trip!()
        .arg("resume")
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success()
        .stdout(contains("Trip trip-1: car-rented"));

    let content = fs::read_to_string(&journal).expect("read journal");
    let states: Vec<String> = content
        .lines()
        .map(|line| {
            let entry: serde_json::Value =
                serde_json::from_str(line).expect("journal line is json");
            entry["state"].as_str().expect("state is a string").to_string()
        })
        .collect();
    assert_eq!(
        states,
        vec!["init", "hotel-booked", "flight-booked", "car-rented"]
    );
}

#[test]
fn resume_of_a_finished_trip_changes_nothing() {
    let dir = TempDir::new().expect("create temp dir");
    let journal = dir.path().join("trip.jsonl");

    saga_trip!()
        .arg("run")
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success();
    let before = fs::read_to_string(&journal).expect("read journal");

    saga_trip!()
        .arg("resume")
        .arg("--journal")
        .arg(&journal)
        .assert()
        .success()
        .stdout(contains("Trip trip-1: car-rented"));

    let after = fs::read_to_string(&journal).expect("read journal");
    assert_eq!(before, after);
}

#[test]
fn resume_without_journal_has_nothing_to_do() {
    let dir = TempDir::new().expect("create temp dir");

    saga_trip!()
        .arg("resume")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stdout(contains("Nothing to resume."))
        .stderr(contains("caused by: no transaction to execute"));
}

#[test]
fn resume_rejects_corrupt_journal() {
    let dir = TempDir::new().expect("create temp dir");
    let journal = dir.path().join("trip.jsonl");
    fs::write(&journal, "{\"trip_id\":\"trip-1\",\"state\":\"init\"}\nnot json\n")
        .expect("write journal");

    saga_trip!()
        .arg("resume")
        .arg("--journal")
        .arg(&journal)
        .assert()
        .failure()
        .stderr(contains("corrupt entry on line 2"));
}
