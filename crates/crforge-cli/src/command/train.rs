use std::path::PathBuf;

use crate::{command::model_arg::ModelArg, report::TrainingReport, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    pub(crate) model: ModelArg,
    /// Write the training report as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg { model, output } = arg;
    let model = model.train()?;

    let report = TrainingReport::new(&model);
    report.print();

    if let Some(path) = output {
        util::save_json(&report, Some(path.as_path()))?;
        eprintln!();
        eprintln!("Report saved successfully");
        eprintln!("  Path: {}", path.display());
        eprintln!("  Trained at: {}", report.trained_at);
    }
    Ok(())
}
