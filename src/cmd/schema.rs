//! Schema command - print the rate table format and the CSV output columns

use super::calculate::BreakdownRecord;
use crate::core::RateFile;
use clap::Args;
use schemars::schema_for;

/// Description of one CSV column, generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for rate table files (--rates)
    JsonSchema,
    /// CSV header row written by `calculate --csv`
    CsvHeader,
    /// CSV column descriptions for `calculate --csv`
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(RateFile);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", BreakdownRecord::csv_header().join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Output Format");
        println!("=================");
        println!();
        for field in BreakdownRecord::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:14} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Amounts are in GBP; rate is a fraction (0.19 = 19%)");
        Ok(())
    }
}
