//! This module contains the main entrypoint to the remodel cli.

use anyhow::{format_err, Result};
use clap::{ArgEnum, Args, Parser, Subcommand};
use colored::Colorize;
use remodel_core::{
	config::Config, Frame, HttpService, ModelView, Pojo, Readiness, Report, Role, Roles, Statistic,
};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
	name = "remodel",
	about = "Inspect, score and download models trained on a remote cluster.",
	disable_help_subcommand = true
)]
struct Options {
	#[clap(long, env = "REMODEL_URL", help = "the url of the cluster")]
	url: Option<String>,
	#[clap(short, long, help = "the path to a config file")]
	config: Option<PathBuf>,
	#[clap(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	#[clap(about = "describe a model")]
	Show(ModelOptions),
	#[clap(about = "print a model's metrics")]
	Metrics(MetricsOptions),
	#[clap(about = "print a model's parameters")]
	Params(ParamsOptions),
	#[clap(about = "rename a model")]
	Rename(RenameOptions),
	#[clap(about = "delete a model from the cluster")]
	Delete(ModelOptions),
	#[clap(about = "score a frame with a model")]
	Predict(PredictOptions),
	#[clap(about = "download a model as a pojo or mojo")]
	Download(DownloadOptions),
	#[clap(about = "print the options of one of a model's charts as json")]
	Chart(ChartOptions),
}

#[derive(Args)]
struct ModelOptions {
	#[clap(help = "the id of the model")]
	model: String,
}

#[derive(Args)]
struct RoleOptions {
	#[clap(long, help = "report the training metrics")]
	train: bool,
	#[clap(long, help = "report the validation metrics")]
	valid: bool,
	#[clap(long, help = "report the cross-validation metrics")]
	xval: bool,
}

impl RoleOptions {
	fn roles(&self) -> Roles {
		Roles {
			train: self.train,
			valid: self.valid,
			xval: self.xval,
		}
	}
}

#[derive(Args)]
struct MetricsOptions {
	#[clap(help = "the id of the model")]
	model: String,
	#[clap(short, long, help = "a single statistic to print, such as mse or auc")]
	statistic: Option<Statistic>,
	#[clap(flatten)]
	roles: RoleOptions,
}

#[derive(Args)]
struct ParamsOptions {
	#[clap(help = "the id of the model")]
	model: String,
	#[clap(long, arg_enum, default_value = "actual", help = "which values to print")]
	view: ParamsView,
}

#[derive(ArgEnum, Clone, Copy)]
enum ParamsView {
	Default,
	Actual,
	Full,
}

#[derive(Args)]
struct RenameOptions {
	#[clap(help = "the id of the model")]
	model: String,
	#[clap(help = "the new id of the model")]
	new_id: String,
}

#[derive(Args)]
struct PredictOptions {
	#[clap(help = "the id of the model")]
	model: String,
	#[clap(help = "the id of the frame to score")]
	frame: String,
	#[clap(long, help = "predict the leaf node each row lands in", conflicts_with = "deepfeatures")]
	leaf_node_assignment: bool,
	#[clap(long, help = "extract the activations of this hidden layer")]
	deepfeatures: Option<usize>,
}

#[derive(Args)]
struct DownloadOptions {
	#[clap(help = "the id of the model")]
	model: String,
	#[clap(long, arg_enum, default_value = "mojo")]
	format: DownloadFormat,
	#[clap(short, long, help = "the directory to write to, the pojo is printed if omitted")]
	dir: Option<PathBuf>,
	#[clap(long, help = "also download h2o-genmodel.jar")]
	genmodel_jar: bool,
}

#[derive(ArgEnum, Clone, Copy)]
enum DownloadFormat {
	Pojo,
	Mojo,
}

#[derive(Args)]
struct ChartOptions {
	#[clap(help = "the id of the model")]
	model: String,
	#[clap(arg_enum)]
	kind: ChartKind,
	#[clap(long, help = "the x axis of the scoring history")]
	timestep: Option<String>,
	#[clap(long, help = "the metric of the scoring history")]
	metric: Option<String>,
	#[clap(short, long, help = "the number of bars to chart")]
	n: Option<usize>,
}

#[derive(ArgEnum, Clone, Copy)]
enum ChartKind {
	ScoringHistory,
	Varimp,
	StdCoef,
}

fn main() {
	let env = env_logger::Env::default().default_filter_or("remodel_cli=info,remodel_core=info");
	env_logger::Builder::from_env(env)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
	let options = Options::parse();
	if let Err(error) = run(options) {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn run(options: Options) -> Result<()> {
	let mut config = match &options.config {
		Some(path) => Config::from_path(path)?,
		None => Config::default(),
	};
	if let Some(url) = options.url {
		config.url = url;
	}
	let service = HttpService::new(&config)?;
	let fetch = |id: &str| fetch_model(&service, &config, id);
	match options.command {
		Command::Show(options) => {
			let mut model = fetch(&options.model)?;
			match model.show()? {
				Report::Details(details) => print!("{}", details),
				report => println!("{}", report),
			}
		}
		Command::Metrics(options) => {
			let mut model = fetch(&options.model)?;
			let roles = options.roles.roles();
			match options.statistic {
				Some(statistic) => println!("{}", model.metric(statistic, roles)?),
				None => cli_metrics(&mut model, roles)?,
			}
		}
		Command::Params(options) => {
			let mut model = fetch(&options.model)?;
			let json = match options.view {
				ParamsView::Default => serde_json::to_string_pretty(&model.default_parameters()?)?,
				ParamsView::Actual => serde_json::to_string_pretty(&model.actual_parameters()?)?,
				ParamsView::Full => serde_json::to_string_pretty(model.full_parameters()?)?,
			};
			println!("{}", json);
		}
		Command::Rename(options) => {
			let mut model = fetch(&options.model)?;
			model.rename(&options.new_id)?;
			eprintln!("Renamed {} to {}.", options.model, options.new_id);
		}
		Command::Delete(options) => {
			let mut model = fetch(&options.model)?;
			model.delete()?;
			if model.readiness() == Readiness::Removed {
				eprintln!("Deleted {}.", options.model);
			}
		}
		Command::Predict(options) => {
			let mut model = fetch(&options.model)?;
			let frame = Frame::new(options.frame);
			let predictions = match (options.leaf_node_assignment, options.deepfeatures) {
				(true, _) => model.predict_leaf_node_assignment(&frame)?,
				(false, Some(layer)) => model.deepfeatures(&frame, layer)?,
				(false, None) => model.predict(&frame)?,
			};
			println!("{}", predictions);
		}
		Command::Download(options) => {
			let mut model = fetch(&options.model)?;
			match options.format {
				DownloadFormat::Pojo => {
					match model.download_pojo(options.dir.as_deref(), options.genmodel_jar)? {
						Pojo::Source(source) => print!("{}", source),
						Pojo::File(path) => eprintln!("Your pojo was written to {}.", path.display()),
					}
				}
				DownloadFormat::Mojo => {
					let dir = match options.dir {
						Some(dir) => dir,
						None => std::env::current_dir()?,
					};
					let path = model.download_mojo(&dir, options.genmodel_jar)?;
					eprintln!("Your mojo was written to {}.", path.display());
				}
			}
		}
		Command::Chart(options) => {
			let mut model = fetch(&options.model)?;
			let json = match options.kind {
				ChartKind::ScoringHistory => {
					let chart = model
						.scoring_history_chart(options.timestep.as_deref(), options.metric.as_deref())?
						.ok_or_else(|| format_err!("model {} has no scoring history", options.model))?;
					serde_json::to_string_pretty(&chart)?
				}
				ChartKind::Varimp => {
					let chart = model
						.varimp_chart(options.n)?
						.ok_or_else(|| format_err!("model {} has no variable importances", options.model))?;
					serde_json::to_string_pretty(&chart)?
				}
				ChartKind::StdCoef => {
					let chart = model
						.std_coef_chart(options.n)?
						.ok_or_else(|| format_err!("model {} has no coefficients", options.model))?;
					serde_json::to_string_pretty(&chart)?
				}
			};
			println!("{}", json);
		}
	}
	Ok(())
}

fn fetch_model<'a>(
	service: &'a HttpService,
	config: &Config,
	id: &str,
) -> Result<ModelView<&'a HttpService>> {
	Ok(ModelView::fetch(service, id)?.with_poll_interval(config.poll_interval()))
}

/// Print the whole metric block of every requested role.
fn cli_metrics(model: &mut ModelView<&HttpService>, roles: Roles) -> Result<()> {
	for role in roles.resolve() {
		let role_roles = match role {
			Role::Train => Roles::train(),
			Role::Valid => Roles::valid(),
			Role::Xval => Roles::xval(),
		};
		match model.model_performance(None, role_roles)? {
			Some(metrics) => print!("{}", metrics),
			None => log::warn!("the model has no {} metrics", role),
		}
	}
	Ok(())
}
