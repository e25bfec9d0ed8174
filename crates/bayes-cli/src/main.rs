use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use serde::Serialize;
use std::path::PathBuf;

use bayes_cli::naive_bayes::input::NaiveBayesConfig;
use bayes_cli::naive_bayes::run;

fn data_arg() -> Arg {
    Arg::new("data")
        .help("Path to the input data file (*.csv or *.tsv)")
        .required(true)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::FilePath)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a JSON configuration file. Command-line flags override its values.")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn model_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .help("Target column. Inferred from the column names when omitted.")
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new("features")
                .short('f')
                .long("features")
                .help("Comma-separated feature columns, e.g. brand,ram_gb,price_idr")
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BAYES_LOG", "error,bayes=info"))
        .init();

    let matches = Command::new("bayes")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Naive Bayes training, evaluation and recommendation for tabular data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("columns")
                .about("Show detected column types and a candidate target column")
                .arg(data_arg()),
        )
        .subcommand(model_args(
            Command::new("train")
                .about("Train a model on the labeled rows and print it as JSON")
                .arg(data_arg())
                .arg(config_arg()),
        ))
        .subcommand(
            model_args(
                Command::new("evaluate")
                    .about("Evaluate a model with a holdout, k-fold or manual split")
                    .arg(data_arg())
                    .arg(config_arg()),
            )
            .arg(
                Arg::new("mode")
                    .short('m')
                    .long("mode")
                    .help("Evaluation mode")
                    .value_parser(["split", "cv", "manual"]),
            )
            .arg(
                Arg::new("train_percent")
                    .long("train-percent")
                    .help("Share of rows used for training in split mode (default 80)")
                    .value_parser(clap::value_parser!(f64)),
            )
            .arg(
                Arg::new("folds")
                    .short('k')
                    .long("folds")
                    .help("Number of folds in cv mode, clamped to 2..=10 (default 5)")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("train_indices")
                    .long("train-indices")
                    .help("Training row indices for manual mode, e.g. 0-79")
                    .value_parser(clap::builder::NonEmptyStringValueParser::new()),
            )
            .arg(
                Arg::new("test_indices")
                    .long("test-indices")
                    .help("Test row indices for manual mode, e.g. 80-99")
                    .value_parser(clap::builder::NonEmptyStringValueParser::new()),
            )
            .arg(
                Arg::new("report")
                    .long("report")
                    .help("Path of the HTML report")
                    .value_parser(clap::builder::NonEmptyStringValueParser::new())
                    .value_hint(ValueHint::FilePath)
                    .conflicts_with("no_report"),
            )
            .arg(
                Arg::new("no_report")
                    .long("no-report")
                    .help("Disable HTML report generation.")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("seed")
                    .long("seed")
                    .help("Seed for the shuffled split")
                    .value_parser(clap::value_parser!(u64)),
            ),
        )
        .subcommand(
            model_args(
                Command::new("recommend")
                    .about("Score every row and list the best matches for a label")
                    .arg(data_arg())
                    .arg(config_arg()),
            )
            .arg(
                Arg::new("label")
                    .short('l')
                    .long("label")
                    .help("Class (or price tier) to recommend for")
                    .value_parser(clap::builder::NonEmptyStringValueParser::new()),
            )
            .arg(
                Arg::new("top")
                    .short('n')
                    .long("top")
                    .help("Number of rows to return (default 10)")
                    .value_parser(clap::value_parser!(usize)),
            )
            .arg(
                Arg::new("output_file")
                    .short('o')
                    .long("output")
                    .help("Write every scored row to this CSV file")
                    .value_parser(clap::builder::NonEmptyStringValueParser::new())
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let outcome = match matches.subcommand() {
        Some(("columns", sub_m)) => handle_columns(sub_m),
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        Some(("recommend", sub_m)) => handle_recommend(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = outcome {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_columns(matches: &ArgMatches) -> Result<()> {
    let Some(path) = matches.get_one::<String>("data") else {
        anyhow::bail!("Missing data file");
    };
    bayes_cli::util::validate_tsv_or_csv_file(path)?;
    print_json(&run::run_columns(path)?)
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config = NaiveBayesConfig::from_arguments(matches)?;
    log::info!("[bayes::train] Training on {}", config.data);
    print_json(&run::run_train(&config)?)
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let config = NaiveBayesConfig::from_arguments(matches)?;
    log::info!(
        "[bayes::evaluate] Evaluating {} ({})",
        config.data,
        config.evaluation.name()
    );
    print_json(&run::run_evaluate(&config)?)
}

fn handle_recommend(matches: &ArgMatches) -> Result<()> {
    let config = NaiveBayesConfig::from_arguments(matches)?;
    log::info!("[bayes::recommend] Scoring {}", config.data);
    print_json(&run::run_recommend(&config)?)
}
