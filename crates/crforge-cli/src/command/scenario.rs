use std::path::PathBuf;

use anyhow::Context;
use crforge_model::scenario::{HarnessConfig, ScenarioHarness, ScenarioReport};

use crate::{command::model_arg::ModelArg, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScenarioArg {
    #[clap(flatten)]
    model: ModelArg,
    /// Scenario definitions (JSON object or array of objects)
    #[arg(long)]
    scenario: PathBuf,
    /// Smallest rating drop, exclusive, reported as significant
    #[arg(long)]
    threshold: Option<f32>,
    /// Print reports as JSON
    #[arg(long)]
    json: bool,
    /// Output file path for JSON reports
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScenarioArg) -> anyhow::Result<()> {
    let ScenarioArg {
        model,
        scenario,
        threshold,
        json,
        output,
    } = arg;
    let scenarios = util::read_scenario_file(scenario)?;
    let model = model.train()?;

    let mut config = HarnessConfig::default();
    if let Some(threshold) = threshold {
        config.significance_threshold = *threshold;
    }
    let harness = ScenarioHarness::new(&model, config);
    let reports = harness
        .run_all(&scenarios)
        .with_context(|| format!("Failed to run scenarios from {}", scenario.display()))?;

    if *json || output.is_some() {
        util::save_json(&reports, output.as_deref())?;
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

pub(crate) fn print_report(report: &ScenarioReport) {
    println!("Scenario: {}", report.scenario);
    println!("  Baseline: CR {:.2}", report.baseline_estimate);
    for outcome in &report.outcomes {
        let mark = if outcome.significant { "*" } else { " " };
        println!(
            "  {mark} {:<24} ({:<8}) CR {:.2}  delta {:+.2}",
            outcome.name,
            outcome.dimension.to_string(),
            outcome.estimate,
            outcome.delta
        );
    }
    println!("  Verdicts (threshold {:.2}):", report.threshold);
    for sensitivity in &report.sensitivities {
        let verdict = if sensitivity.sensitive {
            "sensitive"
        } else {
            "not sensitive"
        };
        println!(
            "    {:<8} max delta {:+.2} => {verdict}",
            sensitivity.dimension.to_string(),
            sensitivity.max_delta
        );
    }
    if let Some(dimension) = report.dominant_dimension() {
        println!("  The model weighs {dimension} more.");
    }
}
