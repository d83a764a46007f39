use crforge_model::{
    derived::{DerivedFeature as _, OffensiveThreat},
    presets,
    scenario::{Dimension, HarnessConfig, ScenarioHarness},
    stat_name::{ARMOR_CLASS, HIT_POINTS},
};

use crate::{
    command::{model_arg::ModelArg, scenario::print_report},
    report::MonsterEstimate,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    #[clap(flatten)]
    model: ModelArg,
}

pub(crate) fn run(arg: &DemoArg) -> anyhow::Result<()> {
    let DemoArg { model } = arg;
    let model = model.train()?;
    eprintln!("Training completed.");

    println!();
    println!("Test 1: custom boss");
    let boss = presets::lord_of_cinder();
    println!(
        "  {}: HP {} | AC {} | {} damage per round",
        boss.display_name(0),
        boss.stats.get_or(HIT_POINTS, 0.0),
        boss.stats.get_or(ARMOR_CLASS, 0.0),
        OffensiveThreat.compute(&boss.stats),
    );
    println!("  Estimated CR: {:.2}", model.predict(&boss.stats));

    println!();
    println!("Test 2: glass cannon check");
    let harness = ScenarioHarness::new(&model, HarnessConfig::default());
    let report = harness.run(&presets::glass_cannon())?;
    print_report(&report);
    let offense_counts = report
        .sensitivity(Dimension::Offense)
        .is_some_and(|s| s.sensitive);
    if offense_counts {
        println!("  Result: the model recognizes offense.");
    } else {
        println!("  Result: the model still hesitates on damage.");
    }

    println!();
    println!("Test 3: balanced roster");
    let roster = presets::balanced_roster();
    for MonsterEstimate { name, estimate } in MonsterEstimate::from_records(&model, &roster) {
        println!("  {name:<30} -> CR {estimate:.2}");
    }
    Ok(())
}
