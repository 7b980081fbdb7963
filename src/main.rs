use clap::{Parser, Subcommand};
use sitax::cmd::{
    calculate::CalculateCommand, html_report::HtmlCommand, schema::SchemaCommand,
    years::YearsCommand,
};

#[derive(Parser, Debug)]
#[command(
    name = "sitax",
    version,
    about = "Calculate Scottish income tax on an annual salary"
)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate income tax and take-home pay for a salary
    Calculate(CalculateCommand),
    /// List the configured tax years and their bands
    Years(YearsCommand),
    /// Print the rate table JSON schema or the CSV output columns
    Schema(SchemaCommand),
    /// Generate an HTML report for a salary
    Html(HtmlCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Calculate(calculate) => calculate.exec(),
        Command::Years(years) => years.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Html(html) => html.exec(),
    }
}
