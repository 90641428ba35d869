//! CLI for the Spectral trust passport portfolio.
//!
//! Subcommands:
//! - `synthesize`: Run the verification engine for an ad-hoc passport, print artifacts.
//! - `list` / `show`: Inspect the stored portfolio.
//! - `create` / `verify` / `approve` / `monitor`: Passport lifecycle.
//! - `policies list|add|apply`: Manage buyer policies.
//! - `export`: Print a passport packet (JSON) or report (text).
//! - `summary`: Print the board summary.
//! - `audit`: Print the operator audit trail, newest first.
//!
//! Exit codes: 0 = success, 1 = not found / nothing to report, 2 = error.

use std::path::PathBuf;
use std::process;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use spectral_common::{
    CliOverrides, CreationStep, ModelInfo, MonitoringStatus, PassportStatus, PolicyStatus,
    SpectralConfig, Subject, TrustPassport,
};
use spectral_compliance::error::ComplianceError;
use spectral_compliance::export::{
    board_summary, passport_report, to_json, to_pretty_json, PassportPacket,
};
use spectral_compliance::policy::PolicyEngine;
use spectral_compliance::portfolio::{NewPassport, NewPolicy, PortfolioService};
use spectral_compliance::store::FileStore;
use spectral_compliance::synthesis::run_deterministic_verification_at;

#[derive(Parser)]
#[command(name = "spectral", about = "Spectral AI trust passport toolkit", version)]
struct Cli {
    /// Directory holding the persisted collections.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log filter directive (e.g. `info`, `spectral_compliance=debug`).
    #[arg(long, global = true)]
    log: Option<String>,
    /// Operator name recorded in the audit trail.
    #[arg(long, global = true)]
    operator: Option<String>,
    /// Do not seed demo data into an empty store.
    #[arg(long, global = true)]
    no_seed: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine for an ad-hoc passport without touching the store.
    Synthesize {
        #[arg(long)]
        id: String,
        #[arg(long)]
        org: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        use_case: String,
        #[arg(long, default_value = "Production")]
        environment: String,
    },
    /// List passports in the portfolio.
    List,
    /// Print one passport as JSON.
    Show { id: String },
    /// Create a draft passport.
    Create {
        #[arg(long)]
        org: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        use_case: String,
        #[arg(long)]
        environment: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        model_version: String,
        /// Comma-separated list of model customizations.
        #[arg(long, default_value = "")]
        customizations: String,
    },
    /// Run verification and mark the passport verified.
    Verify { id: String },
    /// Approve a passport that is under review.
    Approve { id: String },
    /// Toggle runtime monitoring for a passport.
    Monitor { id: String },
    /// Manage buyer policies.
    Policies {
        #[command(subcommand)]
        command: PolicyCommands,
    },
    /// Export a passport packet or report.
    Export {
        id: String,
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
    },
    /// Print the board summary for the portfolio.
    Summary,
    /// Print the audit trail, newest first.
    Audit {
        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum PolicyCommands {
    /// List policies with their applied-model counts.
    List,
    /// Add a policy from a rules file.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Path to the YAML or JSON rules document.
        #[arg(long)]
        rules_file: PathBuf,
        /// Create the policy as active instead of draft.
        #[arg(long)]
        active: bool,
    },
    /// Re-evaluate all active policies and explain each result.
    Apply,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Text,
}

fn main() {
    let cli = Cli::parse();

    let config = SpectralConfig::resolve(&CliOverrides {
        data_dir: cli.data_dir,
        log_filter: cli.log,
        operator: cli.operator,
        no_seed: cli.no_seed,
    });

    if let Err(e) = init_tracing(&config) {
        eprintln!("Error: {}", e);
        process::exit(2);
    }

    let exit_code = match cli.command {
        Commands::Synthesize {
            id,
            org,
            product,
            use_case,
            environment,
        } => run_synthesize(id, org, product, use_case, environment),
        Commands::List => with_service(&config, run_list),
        Commands::Show { id } => with_service(&config, |s| run_show(s, &id)),
        Commands::Create {
            org,
            product,
            use_case,
            environment,
            provider,
            model_version,
            customizations,
        } => {
            let new = NewPassport {
                org,
                product,
                use_case,
                environment,
                model: ModelInfo {
                    provider,
                    version: model_version,
                    customizations: split_list(&customizations),
                },
            };
            with_service(&config, |s| run_create(s, new))
        }
        Commands::Verify { id } => with_service(&config, |s| {
            print_result(s.verify(&id).map(summary_line))
        }),
        Commands::Approve { id } => with_service(&config, |s| {
            print_result(s.approve(&id).map(summary_line))
        }),
        Commands::Monitor { id } => with_service(&config, |s| {
            print_result(s.toggle_monitoring(&id).map(|p| {
                let state = match p.monitoring_status {
                    MonitoringStatus::Active => "active",
                    MonitoringStatus::Inactive => "inactive",
                };
                format!("{}: monitoring {}", p.id, state)
            }))
        }),
        Commands::Policies { command } => match command {
            PolicyCommands::List => with_service(&config, run_policies_list),
            PolicyCommands::Add {
                name,
                description,
                rules_file,
                active,
            } => with_service(&config, |s| {
                run_policies_add(s, name, description, &rules_file, active)
            }),
            PolicyCommands::Apply => with_service(&config, run_policies_apply),
        },
        Commands::Export { id, format } => with_service(&config, |s| run_export(s, &id, format)),
        Commands::Summary => with_service(&config, run_summary),
        Commands::Audit { limit } => with_service(&config, |s| run_audit(s, limit)),
    };

    process::exit(exit_code);
}

fn init_tracing(config: &SpectralConfig) -> Result<(), ComplianceError> {
    let filter = EnvFilter::try_new(&config.log_filter).map_err(|e| {
        ComplianceError::config_error(format!(
            "invalid log filter '{}': {}",
            config.log_filter, e
        ))
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn report_error(err: &ComplianceError) -> i32 {
    eprintln!("Error: {}", err);
    match err {
        ComplianceError::NotFound { .. } => 1,
        _ => 2,
    }
}

fn print_result(result: Result<String, ComplianceError>) -> i32 {
    match result {
        Ok(line) => {
            println!("{}", line);
            0
        }
        Err(e) => report_error(&e),
    }
}

fn summary_line(p: &TrustPassport) -> String {
    format!(
        "{}\t{}\t{}\t{}%\t{}",
        p.id,
        p.status.as_str(),
        p.subject.product,
        p.overall_compliance,
        p.subject.org
    )
}

fn with_service<F>(config: &SpectralConfig, f: F) -> i32
where
    F: FnOnce(&mut PortfolioService<FileStore>) -> i32,
{
    let store = FileStore::new(config.data_dir.clone());
    let mut service = match PortfolioService::open(store, config) {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };
    for message in service.load_errors() {
        eprintln!("Warning: {}", message);
    }
    f(&mut service)
}

fn run_synthesize(
    id: String,
    org: String,
    product: String,
    use_case: String,
    environment: String,
) -> i32 {
    let passport = TrustPassport {
        id,
        monitoring_status: MonitoringStatus::Inactive,
        overall_compliance: 0,
        passport_version: "0.1".to_string(),
        issued_at: String::new(),
        spectral_signature: None,
        vendor_attestation: None,
        subject: Subject {
            org,
            product,
            model: ModelInfo {
                provider: String::new(),
                version: String::new(),
                customizations: vec![],
            },
            environment,
            use_case,
        },
        verification: None,
        coverage_matrix: None,
        risk_register: None,
        expiration: String::new(),
        status: PassportStatus::UnderReview,
        creation_step: CreationStep::Complete,
        policies: None,
        review_notes: None,
    };
    let artifacts = run_deterministic_verification_at(&passport, Utc::now());
    match to_pretty_json(&artifacts) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => report_error(&e),
    }
}

fn run_list(service: &mut PortfolioService<FileStore>) -> i32 {
    if service.list().is_empty() {
        eprintln!("Portfolio is empty");
        return 1;
    }
    for p in service.list() {
        println!("{}", summary_line(p));
    }
    0
}

fn run_show(service: &mut PortfolioService<FileStore>, id: &str) -> i32 {
    let Some(passport) = service.get(id) else {
        eprintln!("Error: passport '{}' not found", id);
        return 1;
    };
    match to_pretty_json(passport) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => report_error(&e),
    }
}

fn run_create(service: &mut PortfolioService<FileStore>, new: NewPassport) -> i32 {
    print_result(service.add_passport(new).map(|p| p.id.clone()))
}

fn run_policies_list(service: &mut PortfolioService<FileStore>) -> i32 {
    for p in service.policies().list() {
        let status = match p.status {
            PolicyStatus::Active => "active",
            PolicyStatus::Draft => "draft",
        };
        println!(
            "{}\t{}\t{}\tapplied to {} model(s)",
            p.id, status, p.name, p.models_applied
        );
    }
    0
}

fn run_policies_apply(service: &mut PortfolioService<FileStore>) -> i32 {
    if let Err(e) = service.apply_policies() {
        return report_error(&e);
    }
    let engine = PolicyEngine;
    for policy in service.policies().list() {
        if policy.status != PolicyStatus::Active {
            continue;
        }
        println!(
            "{}\t{}\tapplied to {} model(s)",
            policy.id, policy.name, policy.models_applied
        );
        for passport in service.list() {
            let eval = engine.evaluate_detailed(passport, policy);
            println!(
                "  {}\t{}\t{}",
                eval.passport_id,
                eval.status.as_str(),
                eval.reason
            );
        }
    }
    0
}

fn run_policies_add(
    service: &mut PortfolioService<FileStore>,
    name: String,
    description: String,
    rules_file: &std::path::Path,
    active: bool,
) -> i32 {
    let rules = match std::fs::read_to_string(rules_file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "Error: cannot read rules file '{}': {}",
                rules_file.display(),
                e
            );
            return 2;
        }
    };
    let status = if active {
        PolicyStatus::Active
    } else {
        PolicyStatus::Draft
    };
    print_result(
        service
            .add_policy(NewPolicy {
                name,
                description,
                rules,
                status,
            })
            .map(|p| format!("{}\tapplied to {} model(s)", p.id, p.models_applied)),
    )
}

fn run_export(service: &mut PortfolioService<FileStore>, id: &str, format: ExportFormat) -> i32 {
    let Some(passport) = service.get(id).cloned() else {
        eprintln!("Error: passport '{}' not found", id);
        return 1;
    };
    let now = Utc::now();
    let (output, label) = match format {
        ExportFormat::Json => match to_json(&PassportPacket::new(&passport, now)) {
            Ok(json) => (json, "JSON"),
            Err(e) => return report_error(&e),
        },
        ExportFormat::Text => (passport_report(&passport, now).render_text(), "TEXT"),
    };
    println!("{}", output);
    let recorded = service.record(
        &format!("Downloaded {} Packet", label),
        &format!("Product: {}", passport.subject.product),
    );
    match recorded {
        Ok(()) => 0,
        Err(e) => report_error(&e),
    }
}

fn run_summary(service: &mut PortfolioService<FileStore>) -> i32 {
    match board_summary(service.list(), Utc::now()) {
        Some(report) => {
            println!("{}", report.render_text());
            let details = format!("Models included: {}", service.list().len());
            match service.record("Board Summary Exported", &details) {
                Ok(()) => 0,
                Err(e) => report_error(&e),
            }
        }
        None => {
            eprintln!("Portfolio is empty; nothing to summarize");
            1
        }
    }
}

fn run_audit(service: &mut PortfolioService<FileStore>, limit: Option<usize>) -> i32 {
    let entries = service.audit().entries();
    if entries.is_empty() {
        eprintln!("Audit log is empty");
        return 1;
    }
    for entry in entries.iter().take(limit.unwrap_or(entries.len())) {
        println!(
            "{}\t{}\t{}\t{}",
            entry.timestamp, entry.user, entry.action, entry.details
        );
    }
    0
}
