//! FILENAME: app/cli/src/pipeline.rs
//! Command-line transformation pipeline.
//!
//! Steps run in a fixed order regardless of flag order on the command line:
//! 1. `--rename old=new`
//! 2. `--drop col`
//! 3. `--filter "col<op>value"` (all filters must hold)
//! 4. `--select a,b,c`
//! 5. `--group-by a,b` with `--agg col:op[:output]`; without `--agg` the
//!    name-driven grouping is used
//! 6. `--sort col` (with `--desc`)

use anyhow::{bail, Context, Result};
use clap::Args;

use engine::{Predicate, SortOrder, Table};
use group_engine::{group_by, group_by_columns, AggregateField, AggregationType, GroupDefinition};

#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Rename a column (repeatable)
    #[arg(long = "rename", value_name = "OLD=NEW")]
    pub renames: Vec<String>,

    /// Drop a column (repeatable)
    #[arg(long = "drop", value_name = "COLUMN")]
    pub drops: Vec<String>,

    /// Keep rows matching a comparison, e.g. "age>25" or "city='Oslo'" (repeatable)
    #[arg(long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Keep only these columns, in this order
    #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
    pub select: Vec<String>,

    /// Group rows by these columns
    #[arg(long = "group-by", value_delimiter = ',', value_name = "COLUMNS")]
    pub group_by: Vec<String>,

    /// Aggregate a column per group: col:count|sum|mean|median|mode|stddev[:output] (repeatable)
    #[arg(long = "agg", value_name = "SPEC")]
    pub aggregates: Vec<String>,

    /// Sort by a column
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending (nulls last)
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Grouping {
    Definition(GroupDefinition),
    ByName(Vec<String>),
}

/// Parsed, validated pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    renames: Vec<(String, String)>,
    drops: Vec<String>,
    filters: Vec<Predicate>,
    select: Vec<String>,
    grouping: Option<Grouping>,
    sort: Option<(String, SortOrder)>,
}

impl Pipeline {
    pub fn from_args(args: &PipelineArgs) -> Result<Pipeline> {
        let renames = args
            .renames
            .iter()
            .map(|r| parse_rename(r))
            .collect::<Result<Vec<_>>>()?;

        let filters = args
            .filters
            .iter()
            .map(|f| Predicate::parse(f).with_context(|| format!("Invalid --filter '{}'", f)))
            .collect::<Result<Vec<_>>>()?;

        let grouping = if !args.aggregates.is_empty() {
            let mut definition = GroupDefinition::new(args.group_by.iter().cloned());
            for spec in &args.aggregates {
                definition = definition.aggregate(parse_aggregate(spec)?);
            }
            Some(Grouping::Definition(definition))
        } else if !args.group_by.is_empty() {
            Some(Grouping::ByName(args.group_by.clone()))
        } else {
            None
        };

        let order = if args.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };

        Ok(Pipeline {
            renames,
            drops: args.drops.clone(),
            filters,
            select: args.select.clone(),
            grouping,
            sort: args.sort.clone().map(|column| (column, order)),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Pipeline::default()
    }

    pub fn apply(&self, mut table: Table) -> Result<Table> {
        for (old, new) in &self.renames {
            table
                .rename_column(old, new)
                .with_context(|| format!("Cannot rename '{}' to '{}'", old, new))?;
        }
        for column in &self.drops {
            table.drop_column(column);
        }
        if !self.filters.is_empty() {
            table = table
                .filter(|row| {
                    for predicate in &self.filters {
                        if !predicate.eval(row)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                })
                .context("Filter failed")?;
        }
        if !self.select.is_empty() {
            table = table.select_columns(&self.select);
        }
        match &self.grouping {
            Some(Grouping::Definition(definition)) => {
                table = group_by(&table, definition).context("Grouping failed")?;
            }
            Some(Grouping::ByName(columns)) => {
                table = group_by_columns(&table, columns).context("Grouping failed")?;
            }
            None => {}
        }
        if let Some((column, order)) = &self.sort {
            table = table
                .sort_by_with(column, *order)
                .with_context(|| format!("Cannot sort by '{}'", column))?;
        }
        log::debug!("pipeline produced {} rows x {} columns", table.row_count(), table.column_count());
        Ok(table)
    }
}

fn parse_rename(spec: &str) -> Result<(String, String)> {
    match spec.split_once('=') {
        Some((old, new)) if !old.trim().is_empty() && !new.trim().is_empty() => {
            Ok((old.trim().to_string(), new.trim().to_string()))
        }
        _ => bail!("Invalid --rename '{}', expected OLD=NEW", spec),
    }
}

fn parse_aggregate(spec: &str) -> Result<AggregateField> {
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    let (column, op, output) = match parts.as_slice() {
        [column, op] => (*column, *op, None),
        [column, op, output] => (*column, *op, Some(*output)),
        _ => bail!("Invalid --agg '{}', expected COLUMN:OP[:OUTPUT]", spec),
    };
    if column.is_empty() {
        bail!("Invalid --agg '{}': missing column", spec);
    }
    let aggregation: AggregationType = op
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .with_context(|| format!("Invalid --agg '{}'", spec))?;

    let field = AggregateField::new(column, aggregation);
    Ok(match output {
        Some(output) if !output.is_empty() => field.with_output(output),
        _ => field,
    })
}
