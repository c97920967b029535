use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

const HEADER: &str = "time,c0,c1,c2,c3,c4,c5,c6,c7,c8,c9,c10,c11\n";

fn test_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(test_dir.join("csv")).expect("failed to create test directory");
    test_dir
}

// Standard layout: temperature 0, wind avg 5, humidity 6, rain 8, gust 9,
// direction 10, battery 11.
fn write_month(dir: &Path, name: &str, rows: &[(&str, &str)]) {
    let mut contents = HEADER.to_string();
    for (stamp, humidity) in rows {
        contents += &format!("\"{stamp}\",12.5,0,0,0,0,1.5,{humidity},0,4.2,3.0,180,3300\n");
    }
    fs::write(dir.join("csv").join(name), contents).expect("failed to write input file");
}

fn write_inputs(dir: &Path) {
    let jan = [
        ("Mon, 01 Jan 2024 00:00:00", "60"),
        ("Tue, 02 Jan 2024 00:00:00", "61"),
        ("Wed, 03 Jan 2024 00:00:00", "62"),
        ("Thu, 04 Jan 2024 00:00:00", "63"),
        ("Fri, 05 Jan 2024 00:00:00", "64"),
        ("Sat, 06 Jan 2024 00:00:00", "65"),
        ("Sun, 07 Jan 2024 00:00:00", "66"),
        ("Mon, 08 Jan 2024 00:00:00", "67"),
        ("Tue, 09 Jan 2024 00:00:00", "68"),
        ("Wed, 10 Jan 2024 00:00:00", "69"),
    ];
    let feb = [
        ("Thu, 01 Feb 2024 06:00:00", "70"),
        ("Fri, 02 Feb 2024 06:00:00", ""),
        ("Sat, 03 Feb 2024 06:00:00", "72"),
        ("Sun, 04 Feb 2024 06:00:00", "73"),
        ("Mon, 05 Feb 2024 06:00:00", "74"),
    ];
    write_month(dir, "2024-02.csv", &feb);
    write_month(dir, "2024-01.csv", &jan);
}

fn run_bin(args: &[&str]) -> (Output, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_weather-report"));

    let output = Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute command");

    let stderr_str = String::from_utf8_lossy(&output.stderr).into_owned();
    (output, stderr_str)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("failed to convert path to string")
}

#[test]
fn summary_lists_months() {
    let test_dir = test_dir("summary_lists_months");
    write_inputs(&test_dir);
    let input_dir = test_dir.join("csv");

    let (output, stderr_str) = run_bin(&["--input-dir", path_str(&input_dir), "summary"]);

    assert!(output.status.success(), "summary failed\nstderr:\n{stderr_str}\n");
    assert!(stderr_str.contains("14 readings from 2024-01-01 00:00:00 to 2024-02-05 06:00:00"));
    assert!(stderr_str.contains("2024-01: 10 readings"));
    assert!(stderr_str.contains("2024-02: 4 readings"));
    let jan = stderr_str.find("2024-01: ").expect("missing January");
    let feb = stderr_str.find("2024-02: ").expect("missing February");
    assert!(jan < feb);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn render_writes_document() {
    let test_dir = test_dir("render_writes_document");
    write_inputs(&test_dir);
    let input_dir = test_dir.join("csv");
    let output_file = test_dir.join("report.html");

    let (output, stderr_str) = run_bin(&[
        "--input-dir",
        path_str(&input_dir),
        "--output",
        path_str(&output_file),
        "render",
    ]);

    assert!(output.status.success(), "render failed\nstderr:\n{stderr_str}\n");

    // 2 title pages, 4 overview charts, the monthly header, then a month
    // title and 4 charts for each of the 2 months.
    let n_pages = 2 + 4 + 1 + 2 * (1 + 4);
    assert!(stderr_str.contains(&format!("wrote {n_pages} pages covering 2 months")));

    let html = fs::read_to_string(&output_file).expect("failed to read report");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<section class=\"page\"").count(), n_pages);
    assert_eq!(html.matches("<svg").count(), n_pages);
    assert!(html.contains("data-title=\"Rain 2024-02\""));
    assert!(html.ends_with("</html>\n"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn malformed_input_aborts_before_output() {
    let test_dir = test_dir("malformed_input_aborts_before_output");
    write_inputs(&test_dir);
    fs::write(
        test_dir.join("csv").join("broken.csv"),
        format!("{HEADER}\"yesterday\",1,2,3,4,5,6,7,8,9,10,11,12\n"),
    )
    .expect("failed to write input file");
    let input_dir = test_dir.join("csv");
    let output_file = test_dir.join("report.html");

    let (output, stderr_str) = run_bin(&[
        "--input-dir",
        path_str(&input_dir),
        "--output",
        path_str(&output_file),
        "render",
    ]);

    assert!(!output.status.success());
    assert!(stderr_str.contains("broken.csv"));
    assert!(stderr_str.contains("failed to parse timestamp"));
    assert!(!output_file.exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn column_map_mismatch_is_reported() {
    let test_dir = test_dir("column_map_mismatch_is_reported");
    write_inputs(&test_dir);

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + &format!("input_dir = {:?}\n", path_str(&test_dir.join("csv")))
        + "[station]\n"
        + "variant = \"soil\"\n";
    fs::write(&config_path, config_contents).expect("failed to write config file");

    let (output, stderr_str) = run_bin(&["--config", path_str(&config_path), "summary"]);

    assert!(!output.status.success());
    assert!(stderr_str.contains("does the station column map match the input?"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_is_rejected() {
    let test_dir = test_dir("invalid_config_is_rejected");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[station]\n"
        + "variant = \"compact\"\n"
        + "[station.channels]\n"
        + "humidity = 7\n";
    fs::write(&config_path, config_contents).expect("failed to write config file");

    let (output, stderr_str) = run_bin(&["--config", path_str(&config_path), "summary"]);

    assert!(!output.status.success());
    assert!(stderr_str.contains("out of range"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn empty_input_dir_is_an_error() {
    let test_dir = test_dir("empty_input_dir_is_an_error");
    let input_dir = test_dir.join("csv");

    let (output, stderr_str) = run_bin(&["--input-dir", path_str(&input_dir), "render"]);

    assert!(!output.status.success());
    assert!(stderr_str.contains("no *.csv files found"));

    fs::remove_dir_all(&test_dir).ok();
}
