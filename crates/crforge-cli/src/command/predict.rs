use std::path::PathBuf;

use crate::{command::model_arg::ModelArg, report::MonsterEstimate, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    #[clap(flatten)]
    model: ModelArg,
    /// Monster stats (JSON object or array of objects)
    #[arg(long)]
    monster: PathBuf,
    /// Print estimates as JSON
    #[arg(long)]
    json: bool,
    /// Output file path for JSON estimates
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let PredictArg {
        model,
        monster,
        json,
        output,
    } = arg;
    let monsters = util::read_monster_file(monster)?;
    let model = model.train()?;

    let estimates = MonsterEstimate::from_records(&model, &monsters);
    if *json || output.is_some() {
        util::save_json(&estimates, output.as_deref())?;
    } else {
        for MonsterEstimate { name, estimate } in &estimates {
            println!("{name:<30} -> CR {estimate:.2}");
        }
    }
    Ok(())
}
