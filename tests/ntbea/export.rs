use ntbea::{Ntbea, SearchSpace};

use crate::test_functions::max_m;

fn finished_run() -> Ntbea {
    let space = SearchSpace::new(vec![3, 3, 3]).unwrap();
    let mut ntbea = Ntbea::builder(space, &[1, 3])
        .neighbours(5)
        .seed(13)
        .build()
        .unwrap();
    ntbea.run(max_m, 4).unwrap();
    ntbea
}

#[test]
fn test_statistics_csv() {
    let ntbea = finished_run();
    let mut buf = Vec::new();
    ntbea.write_statistics_csv(&mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "gen,currentPointFitness,bestNeighbourUCB,bestOfSampled,1-tupleCoverage,3-tupleCoverage"
    );
    assert_eq!(lines.len(), 5);
    for (i, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], (i + 1).to_string());
        let fitness: f64 = fields[1].parse().unwrap();
        assert_eq!(fitness, ntbea.statistics().records()[i].current_fitness);
    }
}

#[test]
fn test_report_lists_every_tuple_then_history() {
    let ntbea = finished_run();
    let mut buf = Vec::new();
    ntbea.write_report(&mut buf).unwrap();
    let report = String::from_utf8(buf).unwrap();

    assert!(report.starts_with("1-Tuple[0]\tSamples: 4"));
    assert!(report.contains("1-Tuple[2]"));
    assert!(report.contains("3-Tuple[0, 1, 2]\tSamples: 4"));
    assert!(report.contains("Pattern / Samples / Mean / STD / Min / Max"));

    let history = report
        .split_once("Best of Sampled | Mean value estimate")
        .expect("history section")
        .1;
    assert_eq!(history.lines().filter(|l| l.contains("->")).count(), 4);
}

#[test]
fn test_save_to_files() {
    let ntbea = finished_run();
    let dir = std::env::temp_dir().join(format!("ntbea-export-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let csv_path = dir.join("stats.csv");
    ntbea.statistics().save_csv(&csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 5);

    let report_path = dir.join("report.txt");
    ntbea.save_report(&report_path).unwrap();
    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("Best of Sampled"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_save_to_missing_directory_fails() {
    let ntbea = finished_run();
    let path = std::env::temp_dir()
        .join("ntbea-no-such-dir")
        .join("nested")
        .join("stats.csv");
    assert!(ntbea.statistics().save_csv(&path).is_err());
    assert!(ntbea.save_report(&path).is_err());
    // The model is untouched by failed exports.
    assert_eq!(ntbea.model().sampled_points().len(), 4);
}
