use clap::{Parser, Subcommand};

use self::{demo::DemoArg, predict::PredictArg, scenario::ScenarioArg, train::TrainArg};

mod demo;
mod model_arg;
mod predict;
mod scenario;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a model and report its fit and feature importances
    Train(#[clap(flatten)] TrainArg),
    /// Estimate the challenge rating of monsters from a JSON file
    Predict(#[clap(flatten)] PredictArg),
    /// Run what-if scenarios from a JSON file
    Scenario(#[clap(flatten)] ScenarioArg),
    /// Run the built-in sanity checks on a trained model
    Demo(#[clap(flatten)] DemoArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Predict(arg) => predict::run(&arg)?,
        Mode::Scenario(arg) => scenario::run(&arg)?,
        Mode::Demo(arg) => demo::run(&arg)?,
    }
    Ok(())
}
