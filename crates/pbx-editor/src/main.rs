use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use pbx_document::{template, IdentifierPool, ObjectId, ProjectDocument};
use pbx_editor::{cloudkit_plan, run_plan, CloudKitSpec};
use pbx_verify::external::{self, ExternalCheck, ExternalOutcome};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("pbx-editor")
        .version(pbx_editor::VERSION)
        .about("Structural editor for Xcode-style project descriptors")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("apply")
                .about("Apply the entitlements-and-capability edit plan")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the project descriptor"),
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .required(true)
                        .help("Application group receiving the file reference"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .required(true)
                        .help("Native target identifier (24 hex chars)"),
                )
                .arg(
                    Arg::new("bundle-id")
                        .long("bundle-id")
                        .required(true)
                        .help("Bundle identifier anchoring the build-settings bodies"),
                )
                .arg(
                    Arg::new("entitlements")
                        .long("entitlements")
                        .help("Entitlements file name (defaults to <group>.entitlements)"),
                )
                .arg(
                    Arg::new("team")
                        .long("team")
                        .help("Development team for the target attributes"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the session report as JSON"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Re-open the descriptor and run structural assertions")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the project descriptor"),
                )
                .arg(
                    Arg::new("entitlements")
                        .long("entitlements")
                        .required(true)
                        .help("Entitlements file name the plan registered"),
                )
                .arg(
                    Arg::new("check-timeout")
                        .long("check-timeout")
                        .default_value("120")
                        .value_parser(value_parser!(u64))
                        .help("Timeout in seconds for the external check command"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the verification report as JSON"),
                )
                .arg(
                    Arg::new("check")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .help("External check command (e.g. a build invocation) after --"),
                ),
        )
        .subcommand(
            Command::new("scaffold")
                .about("Render a minimal valid project descriptor")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the descriptor"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .required(true)
                        .help("Application name"),
                )
                .arg(
                    Arg::new("bundle-id")
                        .long("bundle-id")
                        .required(true)
                        .help("Bundle identifier for the target configurations"),
                ),
        );

    let matches = cli.get_matches();

    let result = match matches.subcommand() {
        Some(("apply", args)) => run_apply(args),
        Some(("verify", args)) => run_verify(args),
        Some(("scaffold", args)) => run_scaffold(args),
        _ => Ok(0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run_apply(args: &ArgMatches) -> anyhow::Result<i32> {
    let project = args.get_one::<PathBuf>("project").cloned().context("--project")?;
    let group = args.get_one::<String>("group").cloned().context("--group")?;
    let target: ObjectId = args
        .get_one::<String>("target")
        .context("--target")?
        .parse()
        .context("parsing --target identifier")?;
    let bundle = args.get_one::<String>("bundle-id").cloned().context("--bundle-id")?;
    let entitlements = args
        .get_one::<String>("entitlements")
        .cloned()
        .unwrap_or_else(|| format!("{group}.entitlements"));
    let team = args.get_one::<String>("team").cloned();

    let spec = CloudKitSpec {
        app_name: group,
        target,
        entitlements_file: entitlements,
        bundle_identifier: bundle,
        development_team: team,
    };
    let report = run_plan(&project, &cloudkit_plan(&spec))?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.generate_text());
    }

    Ok(i32::from(!report.passed()))
}

fn run_verify(args: &ArgMatches) -> anyhow::Result<i32> {
    let project = args.get_one::<PathBuf>("project").cloned().context("--project")?;
    let entitlements = args
        .get_one::<String>("entitlements")
        .cloned()
        .context("--entitlements")?;

    let assertions = pbx_verify::standard_assertions(&entitlements);
    let report = pbx_verify::verify_file(&project, &assertions)?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.generate_text());
    }

    let mut failed = !report.passed();

    let check: Vec<String> = args
        .get_many::<String>("check")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();
    if let Some((program, rest)) = check.split_first() {
        let timeout = *args.get_one::<u64>("check-timeout").context("--check-timeout")?;
        let mut external = ExternalCheck::new(program.clone(), Duration::from_secs(timeout));
        for arg in rest {
            external = external.arg(arg.clone());
        }
        match external::run(&external)? {
            ExternalOutcome::Passed => println!("External check: PASS"),
            ExternalOutcome::Failed { status } => {
                println!("External check: FAIL (status {status:?})");
                failed = true;
            }
            ExternalOutcome::TimedOut => {
                println!("External check: TIMED OUT after {timeout}s");
                failed = true;
            }
        }
    }

    Ok(i32::from(failed))
}

fn run_scaffold(args: &ArgMatches) -> anyhow::Result<i32> {
    let output = args.get_one::<PathBuf>("output").cloned().context("--output")?;
    let name = args.get_one::<String>("name").cloned().context("--name")?;
    let bundle = args.get_one::<String>("bundle-id").cloned().context("--bundle-id")?;

    let mut spec = template::TemplateSpec::new(name, bundle);
    let mut pool = IdentifierPool::new();

    // Rebuilding over an existing descriptor keeps its target identity.
    if output.is_file() {
        let existing = ProjectDocument::new(std::fs::read_to_string(&output)?);
        pool = IdentifierPool::scan(&existing);
        if let Some(target) = template::existing_target(&existing) {
            spec = spec.with_target(target);
        }
    }

    let document = template::render(&spec, &mut pool);
    std::fs::write(&output, document.as_str())?;

    println!("Wrote {}", output.display());
    if let Some(target) = template::existing_target(&document) {
        println!("Target: {target}");
    }

    Ok(0)
}
