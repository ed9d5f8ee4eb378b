use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::core::types::ContrastMode;
use crate::design::contrast::{max_pair_count, unique_factor_values, ContrastState, PrimaryContrasts};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    All,
    Baseline,
    Explicit,
}

impl From<Mode> for ContrastMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::All => Self::AllAgainstAll,
            Mode::Baseline => Self::Baseline,
            Mode::Explicit => Self::Explicit,
        }
    }
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("levels_source")
        .required(true)
        .args(["levels", "sample_sheet"])
))]
pub struct ContrastsArgs {
    /// Levels of the primary factor
    #[arg(long, value_delimiter = ',')]
    pub levels: Vec<String>,

    /// Sample sheet as a JSON array of row objects
    #[arg(long, requires = "factor")]
    pub sample_sheet: Option<PathBuf>,

    /// Primary factor column of the sample sheet
    #[arg(long)]
    pub factor: Option<String>,

    /// Contrast mode
    #[arg(short, long, value_enum, default_value = "all")]
    pub mode: Mode,

    /// Reference level (baseline mode)
    #[arg(long)]
    pub baseline: Option<String>,

    /// Levels compared against the baseline (baseline mode)
    #[arg(long, value_delimiter = ',')]
    pub compare: Vec<String>,

    /// Explicit pair as LEVEL_A:LEVEL_B (explicit mode, repeatable)
    #[arg(long = "pair")]
    pub pairs: Vec<String>,
}

pub fn run(args: ContrastsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let levels = match (&args.sample_sheet, &args.factor) {
        (Some(path), Some(factor)) => {
            let rows = load_sample_sheet(path)?;
            unique_factor_values(&rows, factor)
        }
        _ => {
            let mut levels = args.levels.clone();
            levels.sort();
            levels.dedup();
            levels
        }
    };

    let state = build_state(&args, &levels)?;
    let contrasts = state.primary_contrasts();
    let disabled = state.is_disabled(levels.len());

    if verbose {
        eprintln!(
            "{} levels, at most {} distinct pairs",
            levels.len(),
            max_pair_count(levels.len())
        );
    }

    match format {
        OutputFormat::Text => {
            println!("Levels: {}", levels.join(", "));
            println!("Mode:   {}", state.mode);
            match &contrasts {
                Some(contrasts) => print_text_contrasts(contrasts),
                None => println!("Contrasts: incomplete"),
            }
            if levels.len() < 2 {
                println!("At least two levels are required");
            }
            println!("Ready:  {}", if disabled { "no" } else { "yes" });
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "levels": levels,
                "mode": state.mode,
                "disabled": disabled,
                "primary_contrasts": contrasts,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("mode\tlevel_a\tlevel_b");
            for (a, b) in contrast_rows(contrasts.as_ref()) {
                println!("{}\t{a}\t{b}", state.mode);
            }
        }
    }

    Ok(())
}

/// Replay the command-line choices through the contrast engine
fn build_state(args: &ContrastsArgs, levels: &[String]) -> anyhow::Result<ContrastState> {
    let mut state = ContrastState::new();
    state.mode = args.mode.into();

    let known = |level: &str| -> anyhow::Result<()> {
        if levels.iter().any(|l| l == level) {
            Ok(())
        } else {
            anyhow::bail!("Unknown level '{level}'; expected one of: {}", levels.join(", "))
        }
    };

    if let Some(baseline) = &args.baseline {
        known(baseline)?;
        state.baseline = state.baseline.select_baseline(baseline);
    }
    for level in &args.compare {
        known(level)?;
        state.baseline = state.baseline.toggle_compare(level);
    }

    for (index, pair) in args.pairs.iter().enumerate() {
        let (a, b) = pair
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("Pair '{pair}' must be LEVEL_A:LEVEL_B"))?;
        known(a)?;
        known(b)?;

        let id = if index == 0 { 0 } else { state.explicit.add_pair() };
        state.explicit.update_pair(id, 0, a);
        if state
            .explicit
            .disabled_values(levels, id, a)
            .iter()
            .any(|level| level == b)
        {
            tracing::warn!(pair = %pair, "Pair repeats an existing contrast or compares a level with itself");
        }
        state.explicit.update_pair(id, 1, b);
    }

    if !args.pairs.is_empty() && state.explicit.is_all_pairs_used(levels.len()) {
        tracing::info!("Every distinct pair of levels is in use");
    }

    Ok(state)
}

fn load_sample_sheet(path: &Path) -> anyhow::Result<Vec<BTreeMap<String, String>>> {
    let content = std::fs::read_to_string(path)?;
    let rows: Vec<BTreeMap<String, Value>> = serde_json::from_str(&content)?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(column, value)| match value {
                    Value::String(s) => Some((column, s)),
                    Value::Number(n) => Some((column, n.to_string())),
                    Value::Bool(b) => Some((column, b.to_string())),
                    _ => None,
                })
                .collect()
        })
        .collect())
}

fn print_text_contrasts(contrasts: &PrimaryContrasts) {
    match contrasts {
        PrimaryContrasts::AllAgainstAll => println!("Contrasts: every level against every other"),
        PrimaryContrasts::Baseline { baseline, compare } => {
            println!("Contrasts:");
            for level in compare {
                println!("  {level} vs {baseline}");
            }
        }
        PrimaryContrasts::Explicit { pairs } => {
            println!("Contrasts:");
            for [a, b] in pairs {
                println!("  {a} vs {b}");
            }
        }
    }
}

fn contrast_rows(contrasts: Option<&PrimaryContrasts>) -> Vec<(&str, &str)> {
    match contrasts {
        Some(PrimaryContrasts::Baseline { baseline, compare }) => compare
            .iter()
            .map(|level| (baseline.as_str(), level.as_str()))
            .collect(),
        Some(PrimaryContrasts::Explicit { pairs }) => pairs
            .iter()
            .map(|[a, b]| (a.as_str(), b.as_str()))
            .collect(),
        _ => Vec::new(),
    }
}
