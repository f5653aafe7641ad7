//! Command-line extraction front end: authenticate, fetch base rows, and
//! materialize dotted field paths into a printed grid.

mod output;
mod profile;

use clap::{Parser, Subcommand};
use rowhop_core::{materialize::Materializer, path::FieldPath, source::ID_FIELD};
use rowhop_rpc::{ObjectClient, Session};
use serde_json::Value as Json;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "rowhop",
    version,
    about = "Flatten relational business-object rows into tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract rows from a collection and print them as CSV or JSON.
    Extract(ExtractArgs),
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Service base URL, e.g. https://erp.example.com
    #[arg(long)]
    url: Option<String>,

    /// Database name.
    #[arg(long)]
    db: Option<String>,

    /// Login user.
    #[arg(long)]
    user: Option<String>,

    /// Password or API key.
    #[arg(long, env = "ROWHOP_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// JSON connection profile; explicit flags override its values.
    #[arg(long)]
    profile: Option<std::path::PathBuf>,

    /// Base collection to extract from.
    #[arg(long)]
    collection: String,

    /// Comma-separated dotted field paths, e.g. name,partner_id.name
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Filter domain as a JSON array.
    #[arg(long)]
    domain: Option<String>,

    /// Maximum number of base rows.
    #[arg(long)]
    limit: Option<u32>,

    /// Sort order, e.g. "id desc".
    #[arg(long)]
    order: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Skip the header row.
    #[arg(long)]
    no_header: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Extract(args) => extract(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn extract(args: &ExtractArgs) -> anyhow::Result<()> {
    let profile = profile::resolve(args)?;

    let paths = args
        .fields
        .iter()
        .map(|spec| FieldPath::parse(spec))
        .collect::<Result<Vec<_>, _>>()?;
    anyhow::ensure!(!paths.is_empty(), "at least one field path is required");

    let domain = parse_domain(args.domain.as_deref())?;

    // The base read needs each path's first segment; `id` keeps rows
    // addressable either way.
    let mut base_fields = vec![ID_FIELD.to_string()];
    for path in &paths {
        let first = &path.segments()[0];
        if !base_fields.contains(first) {
            base_fields.push(first.clone());
        }
    }

    let session = Session::authenticate(&profile)?;
    let client = ObjectClient::new(session);
    let base_rows = client.search_read(
        &args.collection,
        &domain,
        &base_fields,
        args.limit,
        args.order.as_deref(),
    )?;
    tracing::info!(collection = %args.collection, rows = base_rows.len(), "fetched base rows");

    let specs: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let grid = Materializer::new(&client).materialize(&args.collection, &base_rows, &specs)?;

    let mut stdout = std::io::stdout().lock();
    match args.format {
        Format::Csv => {
            let header = if args.no_header {
                None
            } else {
                Some(specs.as_slice())
            };
            output::write_csv(&mut stdout, header, &grid)?;
        }
        Format::Json => output::write_json(&mut stdout, &grid)?,
    }
    Ok(())
}

fn parse_domain(raw: Option<&str>) -> anyhow::Result<Json> {
    let Some(raw) = raw else {
        return Ok(Json::Array(Vec::new()));
    };
    let parsed: Json = serde_json::from_str(raw)?;
    anyhow::ensure!(parsed.is_array(), "domain must be a JSON array");
    Ok(parsed)
}
