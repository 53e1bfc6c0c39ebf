use roam_lab_abstract::{Position, RoutingProtocol, ScenarioConfig, SweepParameter, SweepSpec};
use roam_lab_simulator::{BatchSettings, Simulator, run_batch, run_sweep};

fn parked() -> ScenarioConfig {
    ScenarioConfig {
        robot_start: Position::new(50.0, 50.0),
        robot_speed_mps: 0.0,
        speed_changes: Vec::new(),
        ..Default::default()
    }
}

#[test]
fn same_seed_gives_same_arrivals() {
    let config = ScenarioConfig {
        seed: 11,
        loss_rate: 0.2,
        ..Default::default()
    };

    let mut first: Vec<f64> = Vec::new();
    let mut sim = Simulator::new(config.clone()).unwrap();
    sim.run_until_complete(&mut first);

    let mut second: Vec<f64> = Vec::new();
    let mut sim = Simulator::new(config).unwrap();
    sim.run_until_complete(&mut second);

    assert_eq!(first, second);
}

#[test]
fn every_histogram_holds_only_its_own_run() {
    let settings = BatchSettings {
        runs: 4,
        warmup_s: 0,
    };
    let outcome = run_batch(&ScenarioConfig::default(), &settings).unwrap();

    assert_eq!(outcome.histograms.len(), 4);
    assert_eq!(outcome.runs.len(), 4);
    for (histogram, report) in outcome.histograms.iter().zip(&outcome.runs) {
        assert_eq!(histogram.len(), 30);
        assert_eq!(histogram.iter().sum::<u64>(), u64::from(report.packets_delivered));
    }
    let seeds: Vec<u64> = outcome.runs.iter().map(|r| r.seed).collect();
    assert_eq!(seeds, vec![1, 2, 3, 4]);
}

#[test]
fn deterministic_runs_have_zero_spread() {
    // A parked robot with no loss never consumes randomness on the data path.
    let settings = BatchSettings {
        runs: 3,
        warmup_s: 3,
    };
    let outcome = run_batch(&parked(), &settings).unwrap();

    assert_eq!(outcome.points.len(), 27);
    assert_eq!(outcome.points[0].x, 3.0);
    assert_eq!(outcome.points[26].x, 29.0);
    assert!(outcome.points.iter().all(|p| p.stddev == 0.0));
    // 3..4 is an on phase, 4..5 an off phase
    assert!(outcome.points[0].mean > 0.0);
    assert_eq!(outcome.points[1].mean, 0.0);
}

#[test]
fn sweep_points_follow_swept_values() {
    let settings = BatchSettings {
        runs: 2,
        warmup_s: 0,
    };
    let sweep = SweepSpec {
        parameter: SweepParameter::AppDataRate,
        values: vec![50_000.0, 100_000.0, 200_000.0],
    };
    let outcome = run_sweep(&parked(), &settings, &sweep).unwrap();

    let xs: Vec<f64> = outcome.points.iter().map(|p| p.x).collect();
    assert_eq!(xs, sweep.values);
    assert_eq!(outcome.totals.len(), 2);
    assert!(outcome.points[0].mean < outcome.points[1].mean);
    assert!(outcome.points[1].mean < outcome.points[2].mean);
}

#[test]
fn olsr_batch_delivers_no_more_than_aodv() {
    let settings = BatchSettings {
        runs: 3,
        warmup_s: 0,
    };
    let total = |routing| {
        let config = ScenarioConfig {
            routing,
            ..Default::default()
        };
        let outcome = run_batch(&config, &settings).unwrap();
        outcome.points.iter().map(|p| p.mean).sum::<f64>()
    };
    assert!(total(RoutingProtocol::Olsr) <= total(RoutingProtocol::Aodv));
}

#[test]
fn sweep_over_extreme_robot_speed_finishes() {
    let settings = BatchSettings {
        runs: 1,
        warmup_s: 0,
    };
    let config = ScenarioConfig {
        sim_time_s: 5,
        ..Default::default()
    };
    let sweep = SweepSpec {
        parameter: SweepParameter::RobotSpeed,
        values: vec![1e10],
    };
    let outcome = run_sweep(&config, &settings, &sweep).unwrap();
    assert_eq!(outcome.points.len(), 1);
    assert_eq!(outcome.points[0].x, 1e10);
}
