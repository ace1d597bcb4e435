//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvJournalAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::table_export::write_order_table;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::analysis::{run_analysis, AnalysisConfig, AnalysisResult};
use crate::domain::config_validation::{parse_date, validate_analysis_config};
use crate::domain::daily::DateOrder;
use crate::domain::error::JournalError;
use crate::domain::format::{dollar, or_na, percent, round};
use crate::domain::order::flatten_trades;
use crate::domain::series::{build_symbol_series, select_order_table};
use crate::ports::config_port::ConfigPort;
use crate::ports::journal_port::JournalPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "journalyzer", about = "Trading journal analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a journal and write a performance report
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        journal: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Export flattened order events as a replay-ready table
    Orders {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        journal: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        combine: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List distinct symbols in a journal
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        journal: Option<PathBuf>,
    },
    /// Show the journal's data range
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        journal: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            journal,
            symbol,
            output,
            dry_run,
        } => run_analyze(
            &config,
            journal.as_ref(),
            symbol.as_deref(),
            output.as_ref(),
            dry_run,
        ),
        Command::Orders {
            config,
            journal,
            symbol,
            combine,
            output,
        } => run_orders(
            config.as_ref(),
            journal.as_ref(),
            symbol.as_deref(),
            combine,
            output.as_ref(),
        ),
        Command::ListSymbols { config, journal } => {
            run_list_symbols(config.as_ref(), journal.as_ref())
        }
        Command::Info { config, journal } => run_info(config.as_ref(), journal.as_ref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = JournalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Map the `[account]` and `[analysis]` sections onto analysis parameters.
/// Assumes `validate_analysis_config` already passed.
pub fn build_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, JournalError> {
    let start_date = match adapter.get_string("analysis", "start_date") {
        Some(s) => Some(parse_date(&s, "analysis", "start_date")?),
        None => None,
    };
    let end_date = match adapter.get_string("analysis", "end_date") {
        Some(s) => Some(parse_date(&s, "analysis", "end_date")?),
        None => None,
    };
    let account_start = match adapter.get_string("account", "start_date") {
        Some(s) => Some(
            parse_date(&s, "account", "start_date")?
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        ),
        None => None,
    };

    let date_order = match adapter.get_string("analysis", "date_order") {
        Some(s) => DateOrder::parse(&s).ok_or_else(|| JournalError::ConfigInvalid {
            section: "analysis".into(),
            key: "date_order".into(),
            reason: format!("expected ascending or descending, got {:?}", s),
        })?,
        None => DateOrder::Ascending,
    };

    Ok(AnalysisConfig {
        start_date,
        end_date,
        symbols: resolve_symbols(None, adapter),
        initial_balance: adapter.get_double("account", "initial_balance", 1_000_000.0),
        account_start,
        date_order,
    })
}

/// CLI symbol flag wins over the config allow-list; empty means every
/// instrument.
pub fn resolve_symbols(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(s) = symbol_override {
        return vec![s.trim().to_uppercase()];
    }

    if let Some(symbols) = config.get_string("analysis", "symbols") {
        return symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    vec![]
}

fn journal_adapter(
    config: Option<&FileConfigAdapter>,
    journal_override: Option<&PathBuf>,
) -> Result<CsvJournalAdapter, JournalError> {
    if let Some(path) = journal_override {
        let delimiter = config
            .and_then(|c| c.get_string("journal", "delimiter"))
            .filter(|s| s.len() == 1)
            .map(|s| s.as_bytes()[0])
            .unwrap_or(crate::adapters::csv_adapter::DEFAULT_DELIMITER);
        return Ok(CsvJournalAdapter::with_delimiter(path.clone(), delimiter));
    }

    match config {
        Some(c) => CsvJournalAdapter::from_config(c),
        None => Err(JournalError::ConfigMissing {
            section: "journal".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn run_analyze(
    config_path: &PathBuf,
    journal_override: Option<&PathBuf>,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if dry_run {
        eprintln!("Config validated successfully");
        return ExitCode::SUCCESS;
    }

    // Stage 2: build analysis parameters
    let mut analysis_config = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if symbol_override.is_some() {
        analysis_config.symbols = resolve_symbols(symbol_override, &adapter);
    }

    // Stage 3: fetch the journal
    let journal = match journal_adapter(Some(&adapter), journal_override) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let trades = match journal.fetch_trades() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Loaded {} closed trades", trades.len());

    // Stage 4: run the pipeline
    let result = match run_analysis(&trades, &analysis_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: console summary
    print_summary(&result);

    // Stage 6: write the report
    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.txt"));

    match TextReportAdapter::new().write(&result, &output.display().to_string()) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_summary(result: &AnalysisResult) {
    let stats = &result.stats;

    eprintln!("\n=== Performance Summary ===");
    eprintln!("Trades:           {}", stats.trade_count);
    eprintln!(
        "Win Rate:         {}",
        or_na(stats.win_rate, |v| percent(v, 1))
    );
    eprintln!(
        "Expectancy:       {}",
        or_na(stats.expectancy, |v| dollar(v, 2))
    );
    eprintln!(
        "Profit Factor:    {}",
        or_na(stats.profit_factor, |v| round(v, 2))
    );
    eprintln!(
        "Consistency:      {}",
        or_na(stats.consistency_score, |v| percent(v, 1))
    );
    eprintln!(
        "Net Profit:       {}",
        dollar(stats.total_net_profit, 2)
    );
    eprintln!(
        "Final Balance:    {}",
        dollar(result.equity.final_balance(), 2)
    );

    let mut symbols: Vec<&str> = result.trades.iter().map(|t| t.symbol.as_str()).collect();
    symbols.sort_unstable();
    symbols.dedup();

    if symbols.len() > 1 {
        eprintln!("\n=== Per-Symbol Summary ===");
        for symbol in symbols {
            let count = result.trades.iter().filter(|t| t.symbol == symbol).count();
            let net: f64 = result
                .trades
                .iter()
                .filter(|t| t.symbol == symbol)
                .map(|t| t.net_profit())
                .sum();
            let sign = if net >= 0.0 { "+" } else { "" };
            eprintln!("  {}:  {} trades, {}{}", symbol, count, sign, dollar(net, 2));
        }
    }
}

fn run_orders(
    config_path: Option<&PathBuf>,
    journal_override: Option<&PathBuf>,
    symbol_override: Option<&str>,
    combine: bool,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let config = match config_path {
        Some(p) => match load_config(p) {
            Ok(c) => Some(c),
            Err(code) => return code,
        },
        None => None,
    };

    let journal = match journal_adapter(config.as_ref(), journal_override) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let trades = match journal.fetch_trades() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match symbol_override {
        Some(s) => vec![s.trim().to_uppercase()],
        None => config
            .as_ref()
            .map(|c| resolve_symbols(None, c))
            .unwrap_or_default(),
    };

    let events = match flatten_trades(&trades) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let series = build_symbol_series(&events);
    let table = match select_order_table(&series, &symbols, combine) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("orders.csv"));

    match write_order_table(&table, &output) {
        Ok(()) => {
            eprintln!(
                "Wrote {} order rows for {} symbol(s) to {}",
                table.row_count(),
                table.symbols().len(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: Option<&PathBuf>, journal_override: Option<&PathBuf>) -> ExitCode {
    let config = match config_path {
        Some(p) => match load_config(p) {
            Ok(c) => Some(c),
            Err(code) => return code,
        },
        None => None,
    };

    let journal = match journal_adapter(config.as_ref(), journal_override) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match journal.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: Option<&PathBuf>, journal_override: Option<&PathBuf>) -> ExitCode {
    let config = match config_path {
        Some(p) => match load_config(p) {
            Ok(c) => Some(c),
            Err(code) => return code,
        },
        None => None,
    };

    let journal = match journal_adapter(config.as_ref(), journal_override) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match journal.data_range() {
        Ok(Some((first_open, last_close, count))) => {
            println!("{} trades, {} to {}", count, first_open, last_close);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("journal is empty");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
