use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use gapbench_core::{
    GapModel, Instance, Solve, SolveOutcome, SolveStatus, SolveStrategy, SolverConfig, SolverError,
};
use gapbench_highs::HighsSolver;
use serde::Serialize;
use std::env;
use std::fmt;
use std::fs::{self, File, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TIME_LIMIT_SECONDS: f64 = 180.0;
const DEFAULT_THREADS: u32 = 6;
const DEFAULT_MAX_AGENTS: usize = 80;
const CSV_HEADER: &str =
    "timestamp,instance,run_time_seconds,note,best_objective,explored_nodes,dual_bound,gap_percent";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generalized assignment benchmark runner and instance checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve benchmark instances and append one CSV row per solve
    Run(RunArgs),
    /// Parse and validate instances without solving
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Instance names to solve, resolved as <instances-dir>/<name>.in
    #[arg(long = "instance", value_delimiter = ',', required = true)]
    instances: Vec<String>,

    /// Directory containing instance files
    #[arg(long, default_value = "instances")]
    instances_dir: PathBuf,

    /// Engine time limit per instance, in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_SECONDS)]
    time_limit: f64,

    /// Algorithm for the continuous relaxations
    #[arg(long, value_enum, default_value = "barrier")]
    strategy: StrategyArg,

    /// Worker threads for the engine
    #[arg(long, default_value_t = DEFAULT_THREADS)]
    threads: u32,

    /// Engine presolve switch
    #[arg(long, value_enum, default_value = "off")]
    presolve: PresolveArg,

    /// Largest accepted agent count per instance
    #[arg(long, default_value_t = DEFAULT_MAX_AGENTS)]
    max_agents: usize,

    /// CSV output path (defaults to results/<run_id>.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Abort the batch when the engine fails on an instance
    #[arg(long)]
    halt_on_engine_failure: bool,

    /// Print the task -> agent assignment of each incumbent
    #[arg(long)]
    show_assignment: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Instance names to validate, resolved as <instances-dir>/<name>.in
    #[arg(long = "instance", value_delimiter = ',', required = true)]
    instances: Vec<String>,

    /// Directory containing instance files
    #[arg(long, default_value = "instances")]
    instances_dir: PathBuf,

    /// Largest accepted agent count per instance
    #[arg(long, default_value_t = DEFAULT_MAX_AGENTS)]
    max_agents: usize,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum StrategyArg {
    PrimalSimplex,
    DualSimplex,
    Barrier,
}

impl StrategyArg {
    fn to_strategy(self) -> SolveStrategy {
        match self {
            StrategyArg::PrimalSimplex => SolveStrategy::PrimalSimplex,
            StrategyArg::DualSimplex => SolveStrategy::DualSimplex,
            StrategyArg::Barrier => SolveStrategy::Barrier,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum PresolveArg {
    On,
    Off,
}

impl PresolveArg {
    fn enabled(self) -> bool {
        matches!(self, PresolveArg::On)
    }
}

/// One output row of the benchmark log.
#[derive(Debug, Clone, Serialize)]
struct InstanceRecord {
    timestamp: String,
    instance: String,
    run_time_seconds: Option<f64>,
    note: String,
    best_objective: Option<f64>,
    explored_nodes: Option<u64>,
    dual_bound: Option<f64>,
    gap_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BatchSummary {
    attempted: usize,
    completed: usize,
    failed: usize,
}

/// Conditions that halt the whole batch rather than a single instance.
#[derive(Debug)]
enum RunnerError {
    Sink(io::Error),
    Engine {
        instance: String,
        source: SolverError,
    },
}

impl RunnerError {
    fn code(&self) -> &'static str {
        match self {
            RunnerError::Sink(_) => "RUNNER_SINK_IO",
            RunnerError::Engine { .. } => "RUNNER_ENGINE_FAILURE",
        }
    }
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Sink(err) => {
                write!(f, "[{}] output sink failed: {}", self.code(), err)
            }
            RunnerError::Engine { instance, source } => {
                write!(
                    f,
                    "[{}] engine failed on instance '{}': {}",
                    self.code(),
                    instance,
                    source
                )
            }
        }
    }
}

impl std::error::Error for RunnerError {}

/// Append-only CSV sink, flushed after every row.
struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        writer.flush()?;
        Ok(Self { writer })
    }

    fn append(&mut self, record: &InstanceRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{}",
            record.timestamp,
            record.instance,
            format_option_seconds(record.run_time_seconds),
            record.note,
            format_option_number(record.best_objective),
            format_option_count(record.explored_nodes),
            format_option_number(record.dual_bound),
            format_option_percent(record.gap_percent),
        )?;
        self.writer.flush()
    }
}

/// Drives named instances through parse, build, and solve, forwarding one
/// record per successful solve to the report sink.
struct BenchmarkRunner<S> {
    engine: S,
    instances_dir: PathBuf,
    max_agents: usize,
    config: SolverConfig,
    halt_on_engine_failure: bool,
    show_assignment: bool,
}

impl<S: Solve> BenchmarkRunner<S> {
    fn new(engine: S, instances_dir: PathBuf, max_agents: usize, config: SolverConfig) -> Self {
        Self {
            engine,
            instances_dir,
            max_agents,
            config,
            halt_on_engine_failure: false,
            show_assignment: false,
        }
    }

    fn with_halt_on_engine_failure(mut self, halt: bool) -> Self {
        self.halt_on_engine_failure = halt;
        self
    }

    fn with_show_assignment(mut self, show: bool) -> Self {
        self.show_assignment = show;
        self
    }

    /// Run the batch in input order.
    ///
    /// A failing instance is logged, counted, and skipped; only a broken sink
    /// or an engine failure under the halt policy stops the batch.
    fn run<W: Write>(
        &mut self,
        names: &[String],
        report: &mut ReportWriter<W>,
    ) -> Result<(BatchSummary, Vec<InstanceRecord>), RunnerError> {
        let mut summary = BatchSummary::default();
        let mut records = Vec::with_capacity(names.len());

        for name in names {
            summary.attempted += 1;
            let path = self.instances_dir.join(format!("{name}.in"));

            let source = match fs::read_to_string(&path) {
                Ok(source) => source,
                Err(err) => {
                    error!(
                        component = "runner",
                        operation = "load_instance",
                        status = "error",
                        instance = %name,
                        path = %path.display(),
                        error = %err,
                        "Failed to read instance file"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let instance = match Instance::parse(name, &source, self.max_agents) {
                Ok(instance) => instance,
                Err(err) => {
                    error!(
                        component = "runner",
                        operation = "parse_instance",
                        status = "error",
                        instance = %name,
                        error = %err,
                        "Failed to parse instance"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let gap = match GapModel::build(&instance) {
                Ok(gap) => gap,
                Err(err) => {
                    error!(
                        component = "runner",
                        operation = "build_model",
                        status = "error",
                        instance = %name,
                        error = %err,
                        "Failed to build model"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let outcome = match self.engine.solve(gap.model(), &self.config) {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(
                        component = "runner",
                        operation = "solve_instance",
                        status = "error",
                        instance = %name,
                        error = %err,
                        "Engine failed on instance"
                    );
                    if self.halt_on_engine_failure {
                        return Err(RunnerError::Engine {
                            instance: name.clone(),
                            source: err,
                        });
                    }
                    summary.failed += 1;
                    continue;
                }
            };

            let record = build_record(name, &outcome);
            report.append(&record).map_err(RunnerError::Sink)?;
            if self.show_assignment {
                print_assignment(name, &gap.assignment_from(&outcome.primal_values));
            }
            info!(
                component = "runner",
                operation = "solve_instance",
                status = "success",
                instance = %name,
                solve_status = %outcome.status,
                objective = ?outcome.best_objective,
                "Recorded benchmark row"
            );
            summary.completed += 1;
            records.push(record);
        }

        Ok((summary, records))
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_command(args),
        Command::Check(args) => check_command(args),
    }
}

fn run_command(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.time_limit <= 0.0 {
        return Err(boxed_input_error("time-limit must be greater than zero"));
    }
    if args.threads == 0 {
        return Err(boxed_input_error("threads must be greater than zero"));
    }
    if args.max_agents == 0 {
        return Err(boxed_input_error("max-agents must be greater than zero"));
    }

    let run_id = build_run_id()?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("results/{run_id}.csv")));
    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let config = SolverConfig::new()
        .with_strategy(args.strategy.to_strategy())
        .with_time_limit(args.time_limit)
        .with_threads(args.threads)
        .with_presolve(args.presolve.enabled());

    let file = File::create(&output_path)?;
    let mut report = ReportWriter::new(BufWriter::new(file))?;

    let mut runner = BenchmarkRunner::new(
        HighsSolver::new(),
        args.instances_dir.clone(),
        args.max_agents,
        config,
    )
    .with_halt_on_engine_failure(args.halt_on_engine_failure)
    .with_show_assignment(args.show_assignment);

    let (summary, records) = runner.run(&args.instances, &mut report)?;

    render_records(args.format, &records)?;
    println!("report: {}", output_path.display());
    println!(
        "attempted: {} completed: {} failed: {}",
        summary.attempted, summary.completed, summary.failed
    );

    if summary.completed == 0 {
        return Err(boxed_input_error(
            "every instance failed; see diagnostics above",
        ));
    }

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.max_agents == 0 {
        return Err(boxed_input_error("max-agents must be greater than zero"));
    }

    let mut failures = 0usize;
    for name in &args.instances {
        let path = args.instances_dir.join(format!("{name}.in"));
        match fs::read_to_string(&path) {
            Ok(source) => match Instance::parse(name, &source, args.max_agents) {
                Ok(instance) => println!(
                    "{}: {} agents, {} tasks",
                    instance.name(),
                    instance.nb_agents(),
                    instance.nb_tasks()
                ),
                Err(err) => {
                    println!("{name}: {err}");
                    failures += 1;
                }
            },
            Err(err) => {
                println!("{name}: cannot read {}: {err}", path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(boxed_input_error("some instances failed validation"));
    }
    Ok(())
}

fn build_record(instance: &str, outcome: &SolveOutcome) -> InstanceRecord {
    InstanceRecord {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        instance: instance.to_string(),
        run_time_seconds: outcome.run_time_seconds,
        note: completion_note(outcome),
        best_objective: outcome
            .best_objective
            .map(|objective| round_to_significant(objective, 3)),
        explored_nodes: outcome.explored_nodes,
        dual_bound: outcome.dual_bound,
        gap_percent: outcome.relative_gap.map(|gap| gap * 100.0),
    }
}

/// Free-text row summary. Uses `;` separators so rows stay comma-free.
fn completion_note(outcome: &SolveOutcome) -> String {
    match outcome.status {
        SolveStatus::Optimal => match outcome.best_objective {
            Some(objective) => format!(
                "optimal solution found with profit {}",
                round_to_significant(objective, 3)
            ),
            None => "optimal status without reported objective".to_string(),
        },
        SolveStatus::TimeLimit => match (outcome.best_objective, outcome.dual_bound) {
            (Some(objective), Some(bound)) => format!(
                "time limit reached with feasible solution; best profit {}; dual bound {}",
                round_to_significant(objective, 3),
                round_to_significant(bound, 3)
            ),
            (Some(objective), None) => format!(
                "time limit reached with feasible solution; best profit {}",
                round_to_significant(objective, 3)
            ),
            (None, Some(bound)) => format!(
                "time limit reached without feasible solution; dual bound {}",
                round_to_significant(bound, 3)
            ),
            (None, None) => "time limit reached without feasible solution".to_string(),
        },
        SolveStatus::Infeasible => "model is infeasible".to_string(),
        SolveStatus::Unbounded => "model is unbounded".to_string(),
        SolveStatus::InfeasibleOrUnbounded => "model is infeasible or unbounded".to_string(),
        SolveStatus::Unknown => "solver returned an unrecognized status".to_string(),
    }
}

fn round_to_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor();
    let scale = 10f64.powi(digits as i32 - 1 - magnitude as i32);
    (value * scale).round() / scale
}

fn print_assignment(instance: &str, assignment: &[Option<usize>]) {
    for (task, agent) in assignment.iter().enumerate() {
        match agent {
            Some(agent) => println!("{instance}: task {task} -> agent {agent}"),
            None => println!("{instance}: task {task} -> unassigned"),
        }
    }
}

fn render_records(
    format: OutputFormat,
    records: &[InstanceRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            print_record_table(records);
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
            Ok(())
        }
        OutputFormat::Ndjson => {
            for record in records {
                println!("{}", serde_json::to_string(record)?);
            }
            Ok(())
        }
    }
}

fn print_record_table(records: &[InstanceRecord]) {
    println!(
        "{:<16} {:>12} {:>14} {:>12} {:>14} {:>8}  {}",
        "instance", "runtime_s", "objective", "nodes", "dual_bound", "gap_%", "note"
    );
    for record in records {
        println!(
            "{:<16} {:>12} {:>14} {:>12} {:>14} {:>8}  {}",
            record.instance,
            format_option_seconds(record.run_time_seconds),
            format_option_number(record.best_objective),
            format_option_count(record.explored_nodes),
            format_option_number(record.dual_bound),
            format_option_percent(record.gap_percent),
            record.note,
        );
    }
}

fn format_option_seconds(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |seconds| format!("{:.3}", seconds))
}

fn format_option_number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |number| format!("{}", number))
}

fn format_option_count(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |count| count.to_string())
}

fn format_option_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |pct| format!("{:.2}", pct))
}

fn build_run_id() -> Result<String, Box<dyn std::error::Error>> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| io::Error::other(err.to_string()))?
        .as_millis();
    Ok(format!("bench_{millis}"))
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(io::Error::new(
        io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let level_value = env::var("GAPBENCH_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = if level_value.eq_ignore_ascii_case("off") {
        EnvFilter::default().add_directive(LevelFilter::OFF.into())
    } else {
        EnvFilter::try_new(&level_value)
            .map_err(|err| boxed_input_error(&format!("invalid GAPBENCH_LOG filter: {err}")))?
    };
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        BatchSummary, BenchmarkRunner, InstanceRecord, ReportWriter, RunnerError, build_record,
        completion_note, round_to_significant,
    };
    use gapbench_core::{Model, Solve, SolveOutcome, SolveStatus, SolverConfig, SolverError};
    use std::collections::VecDeque;
    use std::path::PathBuf;

    const SMALL: &str = "2 2\n3 1\n2 4\n1 1\n1 1\n1 1\n";
    const SHORT_PROFIT_ROW: &str = "2 2\n3\n2 4\n1 1\n1 1\n1 1\n";

    fn approx_eq(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "left={left}, right={right}");
    }

    struct ScriptedEngine {
        results: VecDeque<Result<SolveOutcome, SolverError>>,
    }

    impl ScriptedEngine {
        fn new(results: Vec<Result<SolveOutcome, SolverError>>) -> Self {
            Self {
                results: results.into(),
            }
        }
    }

    impl Solve for ScriptedEngine {
        fn solve(
            &mut self,
            _model: &Model,
            _config: &SolverConfig,
        ) -> Result<SolveOutcome, SolverError> {
            self.results
                .pop_front()
                .unwrap_or_else(|| Err(SolverError::InternalError("script exhausted".to_string())))
        }
    }

    fn optimal_outcome(objective: f64) -> SolveOutcome {
        let mut outcome = SolveOutcome::new(SolveStatus::Optimal);
        outcome.run_time_seconds = Some(0.05);
        outcome.best_objective = Some(objective);
        outcome.dual_bound = Some(objective);
        outcome.explored_nodes = Some(1);
        outcome.relative_gap = Some(0.0);
        outcome.primal_values = vec![1.0, 0.0, 0.0, 1.0];
        outcome
    }

    fn temp_instance_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gapbench_{}_{label}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn runner_with(engine: ScriptedEngine, dir: PathBuf) -> BenchmarkRunner<ScriptedEngine> {
        BenchmarkRunner::new(engine, dir, 80, SolverConfig::new())
    }

    #[test]
    fn test_round_to_significant_three_digits() {
        approx_eq(round_to_significant(1234.56, 3), 1230.0);
        approx_eq(round_to_significant(0.012345, 3), 0.0123);
        approx_eq(round_to_significant(7.0, 3), 7.0);
        approx_eq(round_to_significant(-456.7, 3), -457.0);
        approx_eq(round_to_significant(0.0, 3), 0.0);
    }

    #[test]
    fn test_completion_note_wording() {
        assert_eq!(
            completion_note(&optimal_outcome(7.0)),
            "optimal solution found with profit 7"
        );

        let mut timeout = SolveOutcome::new(SolveStatus::TimeLimit);
        timeout.best_objective = Some(120.0);
        timeout.dual_bound = Some(125.0);
        assert_eq!(
            completion_note(&timeout),
            "time limit reached with feasible solution; best profit 120; dual bound 125"
        );

        let empty_timeout = SolveOutcome::new(SolveStatus::TimeLimit);
        assert_eq!(
            completion_note(&empty_timeout),
            "time limit reached without feasible solution"
        );

        assert_eq!(
            completion_note(&SolveOutcome::new(SolveStatus::Infeasible)),
            "model is infeasible"
        );
        assert_eq!(
            completion_note(&SolveOutcome::new(SolveStatus::Unknown)),
            "solver returned an unrecognized status"
        );
    }

    #[test]
    fn test_notes_never_contain_commas() {
        let mut timeout = SolveOutcome::new(SolveStatus::TimeLimit);
        timeout.best_objective = Some(1234.5);
        timeout.dual_bound = Some(1300.0);
        for outcome in [
            optimal_outcome(7.0),
            timeout,
            SolveOutcome::new(SolveStatus::Infeasible),
            SolveOutcome::new(SolveStatus::Unbounded),
            SolveOutcome::new(SolveStatus::InfeasibleOrUnbounded),
            SolveOutcome::new(SolveStatus::Unknown),
        ] {
            assert!(!completion_note(&outcome).contains(','));
        }
    }

    #[test]
    fn test_build_record_rounds_and_scales() {
        let mut outcome = SolveOutcome::new(SolveStatus::TimeLimit);
        outcome.run_time_seconds = Some(180.2);
        outcome.best_objective = Some(1234.56);
        outcome.dual_bound = Some(1300.0);
        outcome.relative_gap = Some(0.015);

        let record = build_record("big", &outcome);
        assert_eq!(record.instance, "big");
        assert!(!record.timestamp.is_empty());
        match record.best_objective {
            Some(objective) => approx_eq(objective, 1230.0),
            None => panic!("objective should be present"),
        }
        match record.gap_percent {
            Some(pct) => approx_eq(pct, 1.5),
            None => panic!("gap should be present"),
        }
        assert_eq!(record.explored_nodes, None);
        assert!(record.note.starts_with("time limit reached"));
    }

    #[test]
    fn test_report_writer_emits_header_and_dashes() {
        let mut sink = Vec::new();
        {
            let mut report = ReportWriter::new(&mut sink).unwrap();
            report
                .append(&InstanceRecord {
                    timestamp: "2026-01-01T00:00:00Z".to_string(),
                    instance: "small".to_string(),
                    run_time_seconds: Some(0.041),
                    note: "optimal solution found with profit 7".to_string(),
                    best_objective: Some(7.0),
                    explored_nodes: None,
                    dual_bound: Some(7.0),
                    gap_percent: Some(0.0),
                })
                .unwrap();
        }

        let text = String::from_utf8(sink).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "timestamp,instance,run_time_seconds,note,best_objective,explored_nodes,dual_bound,gap_percent"
            )
        );
        assert_eq!(
            lines.next(),
            Some(
                "2026-01-01T00:00:00Z,small,0.041,optimal solution found with profit 7,7,-,7,0.00"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_runner_isolates_malformed_instances() {
        let dir = temp_instance_dir("isolation");
        std::fs::write(dir.join("bad.in"), SHORT_PROFIT_ROW).unwrap();
        std::fs::write(dir.join("good.in"), SMALL).unwrap();

        let engine = ScriptedEngine::new(vec![Ok(optimal_outcome(7.0))]);
        let mut runner = runner_with(engine, dir.clone());
        let mut sink = Vec::new();
        let mut report = ReportWriter::new(&mut sink).unwrap();

        let names = vec!["bad".to_string(), "good".to_string()];
        let (summary, records) = runner.run(&names, &mut report).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                attempted: 2,
                completed: 1,
                failed: 1,
            }
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instance, "good");

        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().count(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_runner_records_missing_metric_as_dash() {
        let dir = temp_instance_dir("missing_metric");
        std::fs::write(dir.join("small.in"), SMALL).unwrap();

        let mut outcome = optimal_outcome(7.0);
        outcome.explored_nodes = None;
        let engine = ScriptedEngine::new(vec![Ok(outcome)]);
        let mut runner = runner_with(engine, dir.clone());
        let mut sink = Vec::new();
        let mut report = ReportWriter::new(&mut sink).unwrap();

        let names = vec!["small".to_string()];
        let (summary, records) = runner.run(&names, &mut report).unwrap();

        assert_eq!(summary.completed, 1);
        assert_eq!(records[0].explored_nodes, None);
        assert!(records[0].best_objective.is_some());
        assert!(records[0].dual_bound.is_some());

        let text = String::from_utf8(sink).unwrap();
        let row = text.lines().nth(1).unwrap();
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[5], "-");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_runner_halts_on_engine_failure_when_configured() {
        let dir = temp_instance_dir("halt");
        std::fs::write(dir.join("first.in"), SMALL).unwrap();
        std::fs::write(dir.join("second.in"), SMALL).unwrap();

        let engine = ScriptedEngine::new(vec![
            Err(SolverError::EngineFailure("engine exploded".to_string())),
            Ok(optimal_outcome(7.0)),
        ]);
        let mut runner = runner_with(engine, dir.clone()).with_halt_on_engine_failure(true);
        let mut sink = Vec::new();
        let mut report = ReportWriter::new(&mut sink).unwrap();

        let names = vec!["first".to_string(), "second".to_string()];
        let err = runner.run(&names, &mut report).unwrap_err();
        match &err {
            RunnerError::Engine { instance, .. } => assert_eq!(instance, "first"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("[RUNNER_ENGINE_FAILURE]"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_runner_continues_past_engine_failure_by_default() {
        let dir = temp_instance_dir("continue");
        std::fs::write(dir.join("first.in"), SMALL).unwrap();
        std::fs::write(dir.join("second.in"), SMALL).unwrap();

        let engine = ScriptedEngine::new(vec![
            Err(SolverError::EngineFailure("engine exploded".to_string())),
            Ok(optimal_outcome(7.0)),
        ]);
        let mut runner = runner_with(engine, dir.clone());
        let mut sink = Vec::new();
        let mut report = ReportWriter::new(&mut sink).unwrap();

        let names = vec!["first".to_string(), "second".to_string()];
        let (summary, records) = runner.run(&names, &mut report).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                attempted: 2,
                completed: 1,
                failed: 1,
            }
        );
        assert_eq!(records[0].instance, "second");

        std::fs::remove_dir_all(&dir).ok();
    }
}
