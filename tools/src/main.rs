//! staffing-runner: headless quota reconciliation runner.
//!
//! Usage:
//!   staffing-runner --db staffing.db --data-dir ./data
//!   staffing-runner --demo --seed 12345 --json
//!   staffing-runner --db staffing.db --ipc-mode

use anyhow::{Context, Result};
use staffing_core::{
    board::StaffingBoard,
    cache::ReadThroughCache,
    config::StaffingConfig,
    engine::{ReconciliationEngine, RunStats},
    generator::{self, DemoShape},
    model::{QuotaIdentity, ReconciliationRecord},
    source::{fetch_inputs, FetchFilter},
    store::{RunSnapshot, SqliteStore},
    summary::{self, FacilitySummary, Totals},
};
use std::env;
use std::io::{self, BufRead, Write};
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetTarget {
        identity: QuotaIdentity,
        target: u32,
    },
    Archive {
        identity: QuotaIdentity,
        hours: Option<String>,
    },
    Unarchive {
        identity: QuotaIdentity,
        hours: Option<String>,
    },
    Reload,
    /// Termination history of one employee, from the shared cache.
    History {
        name: String,
    },
    /// Drop the cached history after a new upload.
    InvalidateHistory,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    run_id: &'a str,
    stats: &'a RunStats,
    facilities: Vec<FacilitySummary>,
    totals: Totals,
    records: &'a [ReconciliationRecord],
}

struct Session {
    store: SqliteStore,
    engine: ReconciliationEngine,
    filter: FetchFilter,
    board: StaffingBoard,
    history: ReadThroughCache<SqliteStore>,
    stats: RunStats,
    run_id: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let demo = args.iter().any(|a| a == "--demo");
    let json = args.iter().any(|a| a == "--json");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let filter = FetchFilter {
        facility: arg_value(&args, "--facility").map(str::to_string),
        cost_center: arg_value(&args, "--cost-center").map(str::to_string),
    };

    let config = StaffingConfig::load(data_dir)?;

    if !ipc_mode && !json {
        println!("Staffing quota reconciliation — staffing-runner");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        if demo {
            println!("  demo seed: {seed}");
        }
        println!();
    }

    // For :memory: use SQLite shared-memory URI so the fetch connections
    // all share the same in-memory database.
    let db_effective: String = if db == ":memory:" {
        format!("file:staffing_{}?mode=memory&cache=shared", Uuid::new_v4().simple())
    } else {
        db.to_string()
    };
    let store = SqliteStore::open(&db_effective)?.with_terminated_status(&config.terminated_status);
    store.migrate()?;

    if demo {
        seed_demo(&store, seed)?;
    }

    let history = ReadThroughCache::new(store.reopen()?);
    let mut session = Session {
        store,
        engine: ReconciliationEngine::new(config),
        filter,
        board: StaffingBoard::default(),
        history,
        stats: RunStats::default(),
        run_id: String::new(),
    };
    session.reload()?;

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else if json {
        let state = session.ui_state();
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_summary(&session);
    }

    Ok(())
}

impl Session {
    /// Fetch both inputs, reconcile, persist the snapshot, refresh the board.
    fn reload(&mut self) -> Result<()> {
        let mut roster_store = self.store.reopen()?;
        let (roster, quotas) = fetch_inputs(&mut roster_store, &self.store, &self.filter)
            .context("fetching roster and quota lines")?;

        let run = self.engine.run(&roster, &quotas);
        let snapshot = RunSnapshot::new(run.records.clone());
        self.store.save_run_snapshot(&snapshot)?;
        let run_id = snapshot.run_id;

        log::info!(
            "run {run_id}: {} records ({} withheld)",
            run.records.len(),
            run.withheld.len()
        );
        self.board.replace(run.records);
        self.stats = run.stats;
        self.run_id = run_id;
        Ok(())
    }

    fn ui_state(&self) -> UiState<'_> {
        let facilities = summary::summarize_by_facility(self.board.records());
        let totals = summary::totals(&facilities);
        UiState {
            run_id: &self.run_id,
            stats: &self.stats,
            facilities,
            totals,
            records: self.board.records(),
        }
    }
}

fn seed_demo(store: &SqliteStore, seed: u64) -> Result<()> {
    let data = generator::generate(seed, &DemoShape::default());
    for employee in &data.roster {
        store.insert_employee(employee)?;
    }
    for quota in &data.quotas {
        store.insert_quota_line(quota)?;
    }
    for termination in &data.terminations {
        store.insert_termination(termination)?;
    }
    log::info!(
        "seeded demo dataset: {} employees, {} quota lines",
        data.roster.len(),
        data.quotas.len()
    );
    Ok(())
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        // Board commands roll themselves back on failure; report and go on.
        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::Reload => session.reload(),
            IpcCommand::InvalidateHistory => {
                session.history.invalidate();
                Ok(())
            }
            IpcCommand::History { name } => {
                match session.history.get() {
                    Ok(history) => {
                        let reply = serde_json::json!({
                            "employee": name,
                            "terminations": history.by_name(&name),
                        });
                        writeln!(stdout, "{reply}")?;
                        stdout.flush()?;
                    }
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
                continue;
            }
            IpcCommand::SetTarget { identity, target } => session
                .board
                .update_target(&session.store, &identity, target)
                .map(drop)
                .map_err(Into::into),
            IpcCommand::Archive { identity, hours } => session
                .board
                .archive(&session.store, &identity, hours.as_deref())
                .map(drop)
                .map_err(Into::into),
            IpcCommand::Unarchive { identity, hours } => session
                .board
                .unarchive(&session.store, &identity, hours.as_deref())
                .map(drop)
                .map_err(Into::into),
        };

        match outcome {
            Ok(()) => writeln!(stdout, "{}", serde_json::to_string(&session.ui_state())?)?,
            Err(e) => write_error(&mut stdout, &format!("{e:#}"))?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_summary(session: &Session) {
    let facilities = summary::summarize_by_facility(session.board.records());
    let totals = summary::totals(&facilities);
    let stats = &session.stats;

    println!("=== Reconciliation summary (run {}) ===", session.run_id);
    println!(
        "  roster: {} employees in {} groups   quota lines: {}",
        stats.roster_size, stats.groups, stats.quota_lines
    );
    println!(
        "  matched: {} exact, {} by fallback   unmatched: {}   conflicts: {}",
        stats.exact_matches, stats.fallback_matches, stats.unmatched_quotas, stats.claim_conflicts
    );
    println!(
        "  residual groups: {}   withheld: {}",
        stats.residual_groups, stats.withheld
    );
    println!();
    println!(
        "  {:<32} {:>7} {:>7} {:>9} {:>7}  {:<8} {}",
        "facility", "target", "active", "inactive", "balance", "status", "deficit lines"
    );
    for f in &facilities {
        println!(
            "  {:<32} {:>7} {:>7} {:>9} {:>+7}  {:<8} {}/{}",
            f.facility_name,
            f.target,
            f.active,
            f.inactive,
            f.balance(),
            f.status.to_string(),
            f.deficit_lines,
            f.lines
        );
    }
    println!(
        "  {:<32} {:>7} {:>7} {:>9} {:>+7}",
        "TOTAL",
        totals.target,
        totals.active,
        totals.inactive,
        totals.balance()
    );
}

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], name: &str, default: T) -> T {
    arg_value(args, name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
