use clap::{Parser, Subcommand};
use docs_prebuild::config::{self, PrebuildConfig};
use docs_prebuild::contributors::ScriptContributorSource;
use docs_prebuild::generators::CommandGenerator;
use docs_prebuild::hook::{self, HookConfig, HookError, PreBuildHook};
use docs_prebuild::output;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Flags that tune a single hook run.
#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Abort when the packaging source directory is missing
    #[arg(long)]
    strict: bool,

    /// Regenerate every derived document regardless of age
    #[arg(long)]
    force: bool,

    /// Keep derived documents modified within this many minutes
    #[arg(long, value_name = "N")]
    freshness_minutes: Option<u64>,
}

fn version_string() -> &'static str {
    let on_tag = env!("PREBUILD_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PREBUILD_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docs-prebuild")]
#[command(about = "Pre-build hook for the documentation site")]
#[command(long_about = "\
Pre-build hook for the documentation site

Runs before every site build and prepares the docs tree:

  1. Deletes the previous playground archive
  2. Zips the toolkit source into docs/playground/jaclang.zip
  3. Regenerates derived documents older than the freshness window:
       docs/internals/jac_ast.md              AST reference
       docs/learn/jac_ref.md                  language reference
       docs/communityhub/top_contributors.md  contributor leaderboard

A missing toolkit source is a warning unless --strict is given. Generator
failures always abort the build.

Run 'docs-prebuild gen-config' to generate a documented prebuild.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Documentation project root; every command runs here
    #[arg(long, default_value = ".", global = true)]
    project_root: PathBuf,

    /// Config file [default: <project-root>/prebuild.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full hook: archive, then stale documents
    Run(RunArgs),
    /// Rebuild only the playground archive
    Archive,
    /// Report what a run would do without touching anything
    Check,
    /// Print a stock prebuild.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    docs_prebuild::init_tracing(cli.verbose);

    match cli.command {
        Command::Run(ref args) => {
            let mut prebuild = load_config(&cli)?;
            if let Some(minutes) = args.freshness_minutes {
                prebuild.freshness_minutes = minutes;
                prebuild.validate()?;
            }
            let mut hook_config = HookConfig::resolve(&prebuild, &cli.project_root)?;
            hook_config.strict |= args.strict;
            hook_config.force = args.force;

            let report = with_hook(&hook_config, &prebuild, &cli.project_root, |hook| {
                hook.run()
            })?;
            output::print_run_output(&report, &cli.project_root);
        }
        Command::Archive => {
            let prebuild = load_config(&cli)?;
            let hook_config = HookConfig::resolve(&prebuild, &cli.project_root)?;

            let (removed, summary) =
                with_hook(&hook_config, &prebuild, &cli.project_root, |hook| {
                    hook.package_required()
                })?;
            output::print_archive_output(removed, &summary, &cli.project_root);
        }
        Command::Check => {
            let prebuild = load_config(&cli)?;
            let hook_config = HookConfig::resolve(&prebuild, &cli.project_root)?;
            let statuses = hook::inspect_documents(&hook_config, SystemTime::now());
            output::print_check_output(
                hook_config.source_root.as_deref(),
                &statuses,
                hook_config.freshness,
                &cli.project_root,
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `--config`, or the project's `prebuild.toml` when not given.
///
/// An explicitly named file must exist; the default one is optional.
fn load_config(cli: &Cli) -> Result<PrebuildConfig, Box<dyn std::error::Error>> {
    let path = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            path.clone()
        }
        None => cli.project_root.join(config::CONFIG_FILENAME),
    };
    tracing::debug!(path = %path.display(), "Loading config");
    Ok(config::load_config(&path)?)
}

/// Build the command-backed generators and hand a hook over them to `f`.
fn with_hook<T>(
    hook_config: &HookConfig,
    prebuild: &PrebuildConfig,
    project_root: &Path,
    f: impl FnOnce(&PreBuildHook<'_>) -> Result<T, HookError>,
) -> Result<T, HookError> {
    let ast_reference =
        CommandGenerator::new(prebuild.docs.ast_reference.command.clone(), project_root);
    let language_reference = CommandGenerator::new(
        prebuild.docs.language_reference.command.clone(),
        project_root,
    );
    let contributors = ScriptContributorSource {
        interpreter: prebuild.contributors.interpreter.clone(),
        script: PathBuf::from(&prebuild.contributors.script),
        working_dir: project_root.to_path_buf(),
    };
    let hook = PreBuildHook::new(
        hook_config,
        &ast_reference,
        &language_reference,
        &contributors,
    );
    f(&hook)
}
