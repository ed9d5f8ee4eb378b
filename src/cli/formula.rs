use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::design::formula::{
    formula_columns, generate_formula, parse_classification_file, FormulaColumn, FormulaSelection,
};

#[derive(Args)]
pub struct FormulaArgs {
    /// JSON object mapping each sample-sheet column to its type (or null)
    #[arg(short, long, required = true)]
    pub classification: PathBuf,

    /// Primary factor column
    #[arg(short, long)]
    pub primary: Option<String>,

    /// Covariate columns, in selection order
    #[arg(long = "covariate", value_delimiter = ',')]
    pub covariates: Vec<String>,
}

pub fn run(args: FormulaArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let classification = parse_classification_file(&args.classification)?;
    let columns = formula_columns(&classification);

    if verbose {
        eprintln!(
            "{} classified columns, {} usable in a formula",
            classification.len(),
            columns.len()
        );
    }

    let mut selection = FormulaSelection::new();
    if let Some(primary) = &args.primary {
        if !columns.iter().any(|c| &c.column_name == primary) {
            anyhow::bail!("Primary factor '{primary}' is not a formula column");
        }
        selection = selection.select_primary(primary);
    }
    for covariate in &args.covariates {
        selection = selection.toggle_covariate(covariate);
    }

    let formula = generate_formula(&columns, &selection);

    match format {
        OutputFormat::Text => print_text_formula(&columns, &selection, formula.as_deref()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "columns": columns,
                "primary": selection.primary(),
                "covariates": selection.covariates(),
                "valid": selection.is_valid(),
                "formula": formula,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("column\ttype\trole");
            for column in &columns {
                let role = if selection.primary() == Some(column.column_name.as_str()) {
                    "primary"
                } else if selection.covariates().contains(&column.column_name) {
                    "covariate"
                } else {
                    "-"
                };
                println!("{}\t{:?}\t{role}", column.column_name, column.column_type);
            }
        }
    }

    Ok(())
}

fn print_text_formula(
    columns: &[FormulaColumn],
    selection: &FormulaSelection,
    formula: Option<&str>,
) {
    println!("Formula columns:");
    for column in columns {
        println!("  {:<20} {:?}", column.column_name, column.column_type);
    }

    match formula {
        Some(formula) => println!("\nFormula: {formula}"),
        None => println!("\nNo primary factor selected"),
    }

    let ignored: Vec<&str> = selection
        .covariates()
        .iter()
        .filter(|c| !columns.iter().any(|col| &col.column_name == *c))
        .map(String::as_str)
        .collect();
    if !ignored.is_empty() {
        println!("Ignored covariates: {}", ignored.join(", "));
    }
}
