use anyhow::{anyhow, bail, Context, Result};
use prowler::{
    annotate::attach_profiles,
    any_network::AnyNetworkParser,
    apis::{CostanzoApi, CostanzoDataset},
    config::{AnalysisConfig, DEFAULT_CONFIG_PATH},
    kegg::{parse_xref_path, xref_map, KeggDatabase, KeggOrganisms},
    logging::init_tracing,
    parser::NetworkParser,
    sga::Sga2Parser,
    NetworkStats,
};
use std::collections::HashMap;
use std::path::Path;
use std::{env, fs, io};

fn usage() {
    eprintln!(
        "Usage:\n  \
  prowler_cli --version\n  \
  prowler_cli [--config PATH] annotate INPUTS [--out FILE]\n  \
  prowler_cli [--config PATH] stats INPUTS\n  \
  prowler_cli fetch-sga DATASET [--out-dir DIR]\n\n  \
  INPUTS: --network FILE --format sga|any --orthology FILE --xref FILE --organisms FILE\n  \
          [--sheet NAME]  read an 'any' network from a spreadsheet worksheet\n  \
  DATASET: raw|lenient_cutoff|intermediate_cutoff|stringent_cutoff\n\n  \
  Logging: PROWLER_LOG=prowler=debug"
    );
}

fn parse_global_config_arg(args: &[String]) -> (Option<String>, usize) {
    if args.len() >= 3 && args[1] == "--config" {
        return (Some(args[2].clone()), 3);
    }
    (None, 1)
}

fn load_config(path: Option<&str>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load_from_path(path)
            .with_context(|| format!("Could not load config '{path}'")),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            AnalysisConfig::load_from_path(DEFAULT_CONFIG_PATH)
                .with_context(|| format!("Could not load config '{DEFAULT_CONFIG_PATH}'"))
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn parse_options(args: &[String]) -> Result<HashMap<String, String>> {
    let mut ret = HashMap::new();
    let mut iter = args.iter();
    while let Some(key) = iter.next() {
        let name = key
            .strip_prefix("--")
            .ok_or_else(|| anyhow!("Unexpected argument '{key}'"))?;
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("Missing value for {key}"))?;
        ret.insert(name.to_string(), value.clone());
    }
    Ok(ret)
}

fn required<'a>(options: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    options
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing --{name}"))
}

fn build_stats(config: &AnalysisConfig, options: &HashMap<String, String>) -> Result<NetworkStats> {
    let network = required(options, "network")?;
    let mut table = match required(options, "format")? {
        "sga" => Sga2Parser::new().parse_path(Path::new(network)),
        "any" => {
            let parser = AnyNetworkParser::new(&config.query_column, &config.array_column);
            let parser = match options.get("sheet").or(config.sheet_name.as_ref()) {
                Some(sheet) => parser.with_sheet(sheet),
                None => parser.with_delimiter(config.delimiter_byte()),
            };
            parser.parse_path(Path::new(network))
        }
        other => bail!("Unknown network format '{other}', expected 'sga' or 'any'"),
    }
    .with_context(|| format!("Could not parse network '{network}'"))?;

    let organisms_path = required(options, "organisms")?;
    let organisms = KeggOrganisms::from_path(organisms_path)
        .with_context(|| format!("Could not read organism list '{organisms_path}'"))?;
    let universe = organisms.resolve_universe(&config.reference_species)?;

    let xref_path = required(options, "xref")?;
    let xref = xref_map(
        &parse_xref_path(xref_path)
            .with_context(|| format!("Could not read cross-reference '{xref_path}'"))?,
    );
    let orthology_path = required(options, "orthology")?;
    let db = KeggDatabase::from_path(orthology_path)
        .with_context(|| format!("Could not read orthology database '{orthology_path}'"))?;

    let report = attach_profiles(&mut table, &universe, &xref, &db);
    if let Some(message) = report.missing_orthology_message() {
        tracing::warn!(count = report.orfs_without_orthology.len(), "{message}");
    }
    Ok(NetworkStats::new(table, config.pss_threshold)?)
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("prowler {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (config_path, cmd_idx) = parse_global_config_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        bail!("Missing command");
    }
    let config = load_config(config_path.as_deref())?;
    let command = &args[cmd_idx];

    match command.as_str() {
        "annotate" => {
            let options = parse_options(&args[cmd_idx + 1..])?;
            let stats = build_stats(&config, &options)?;
            let symbols = config.symbols()?;
            match options.get("out") {
                Some(out) => {
                    let file = fs::File::create(out)
                        .with_context(|| format!("Could not create '{out}'"))?;
                    stats
                        .table()
                        .write_tsv(file, &symbols, Some(stats.pss_scores()))?;
                    eprintln!("Wrote {} profiled interactions to '{out}'", stats.table().len());
                }
                None => stats
                    .table()
                    .write_tsv(io::stdout().lock(), &symbols, Some(stats.pss_scores()))?,
            }
            Ok(())
        }
        "stats" => {
            let options = parse_options(&args[cmd_idx + 1..])?;
            let stats = build_stats(&config, &options)?;
            println!("{}", serde_json::to_string_pretty(&stats.summary())?);
            Ok(())
        }
        "fetch-sga" => {
            let name = args
                .get(cmd_idx + 1)
                .ok_or_else(|| anyhow!("Missing dataset name"))?;
            let dataset = CostanzoDataset::from_name(name)
                .ok_or_else(|| anyhow!("Unknown SGA dataset '{name}'"))?;
            let options = parse_options(&args[cmd_idx + 2..])?;
            let dir = options.get("out-dir").map(String::as_str).unwrap_or(".");
            let path = CostanzoApi::new()
                .download(dataset, Path::new(dir))
                .with_context(|| format!("Could not download '{}'", dataset.file_name()))?;
            eprintln!("Wrote '{}'", path.display());
            Ok(())
        }
        _ => {
            usage();
            bail!("Unknown command '{command}'")
        }
    }
}
