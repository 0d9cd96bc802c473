// End-to-end tests: shipped defaults and data through a full session.

use std::fs;
use std::path::{Path, PathBuf};

use bidbot_cli::config::{self, Config};
use bidbot_cli::session::{run_auction, SessionReport};
use bidbot_core::{BidReason, Decision, DecisionEngine, Role};
use bidbot_data::PlayerTables;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Copy `defaults/` and `data/` into a fresh temp dir laid out like a
/// working directory.
fn stage_workdir(name: &str) -> PathBuf {
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    for dir in ["defaults", "data"] {
        fs::create_dir_all(tmp.join(dir)).unwrap();
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            fs::copy(&path, tmp.join(dir).join(path.file_name().unwrap())).unwrap();
        }
    }
    tmp
}

fn load_staged(tmp: &Path) -> Config {
    config::ensure_config_files(tmp).expect("defaults should copy");
    config::load_config_from(tmp).expect("staged config should load")
}

fn run(config: &Config, tables: &PlayerTables) -> (SessionReport, Vec<String>) {
    let mut engine = DecisionEngine::from_config(tables, &config.engine);
    let mut bids = ChaCha8Rng::seed_from_u64(config.session.bid_seed);
    let outcomes = run_auction(&mut engine, &config.session.candidates, &mut bids).unwrap();
    let lines = outcomes.iter().map(|o| o.describe()).collect();
    (SessionReport::new(&engine, outcomes), lines)
}

#[test]
fn default_session_runs_end_to_end() {
    let tmp = stage_workdir("bidbot_e2e_default");
    let mut config = load_staged(&tmp);
    config.engine.policy.seed = Some(17);
    let tables = PlayerTables::load(&config.data).unwrap();
    assert_eq!(tables.len(), 17);

    let (report, lines) = run(&config, &tables);

    assert_eq!(report.outcomes.len(), 4);
    // Bowler and keeper quotas are open, so both are always bought.
    assert_eq!(report.outcomes[2].name, "R Ashwin");
    assert_eq!(report.outcomes[2].decision, Decision::Bid(BidReason::Quota));
    assert_eq!(report.outcomes[3].name, "H Klaasen");
    assert_eq!(report.outcomes[3].decision, Decision::Bid(BidReason::Quota));
    assert!(lines[2].starts_with("bids on R Ashwin at "));
    assert!(lines[3].starts_with("bids on H Klaasen at "));

    assert_eq!(report.role_counts[Role::Bowler.label()], 1);
    assert_eq!(report.role_counts[Role::WicketKeeper.label()], 1);
    assert!(report.foreign_count >= 1);
    let spent: f64 = report.acquired.iter().map(|a| a.price).sum();
    assert!((report.remaining_budget - (40.0 - spent)).abs() < 1e-9);
    assert!(report.final_epsilon >= 0.05 && report.final_epsilon <= 0.5 * 0.9 * 0.9);

    let _ = fs::remove_dir_all(&tmp);
}

#[test]
fn seeded_sessions_are_reproducible() {
    let tmp = stage_workdir("bidbot_e2e_repro");
    let mut config = load_staged(&tmp);
    config.engine.policy.seed = Some(5);
    let tables = PlayerTables::load(&config.data).unwrap();

    let (first, first_lines) = run(&config, &tables);
    let (second, second_lines) = run(&config, &tables);

    assert_eq!(first_lines, second_lines);
    assert_eq!(first.remaining_budget, second.remaining_budget);
    assert_eq!(first.states_visited, second.states_visited);

    let _ = fs::remove_dir_all(&tmp);
}

#[test]
fn report_serializes_to_json() {
    let tmp = stage_workdir("bidbot_e2e_report");
    let mut config = load_staged(&tmp);
    config.engine.policy.seed = Some(8);
    let tables = PlayerTables::load(&config.data).unwrap();

    let (report, _) = run(&config, &tables);
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string_pretty(&report).unwrap()).unwrap();

    assert_eq!(json["outcomes"].as_array().unwrap().len(), 4);
    assert_eq!(json["outcomes"][3]["decision"]["Bid"], "Quota");
    assert_eq!(json["role_counts"]["Wicket Keeper"], 1);
    assert!(json["remaining_budget"].as_f64().unwrap() < 40.0);

    let _ = fs::remove_dir_all(&tmp);
}
