use dialoguer::Select;

use crate::compare::{self, PairOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::io::excel_read;
use crate::model::{Level, Strategy};

/// Runs the interactive comparison loop: pick a granularity, pick a
/// strategy, run the batch, repeat until an exit choice.
pub fn run_menu(config: &Config) -> Result<()> {
    let bundle = excel_read::load_bundle(config)?;

    loop {
        let level = match select_level()? {
            Some(level) => level,
            None => break,
        };
        let strategy = match select_strategy(config.fuzzy_threshold)? {
            Some(strategy) => strategy,
            None => break,
        };

        let outcomes = compare::run_comparisons(
            &bundle,
            level,
            strategy,
            config.fuzzy_threshold,
            &config.output_dir,
        )?;
        print_outcomes(bundle.reference.name(), &outcomes);
    }
    Ok(())
}

fn select_level() -> Result<Option<Level>> {
    let items = [
        "Commune only (ADM2)",
        "Commune + Section Communale (ADM2 + ADM3)",
        "Exit",
    ];
    let choice = Select::new()
        .with_prompt("Comparison level")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => Some(Level::Commune),
        1 => Some(Level::CommuneSection),
        _ => None,
    })
}

fn select_strategy(threshold: f64) -> Result<Option<Strategy>> {
    let items = [
        "Exact match (case-sensitive)".to_string(),
        "Case-insensitive match".to_string(),
        "Normalized match (ignore accents, punctuation, case)".to_string(),
        format!("Fuzzy match (threshold = {threshold})"),
        "Exit".to_string(),
    ];
    let choice = Select::new()
        .with_prompt("Comparison method")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => Some(Strategy::Exact),
        1 => Some(Strategy::CaseInsensitive),
        2 => Some(Strategy::Normalized),
        3 => Some(Strategy::Fuzzy),
        _ => None,
    })
}

fn print_outcomes(reference_name: &str, outcomes: &[PairOutcome]) {
    for outcome in outcomes {
        compare::print_summary(reference_name, outcome);
    }
}
