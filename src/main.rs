//! orgpress CLI - publish Org-mode notes into a Hugo site
//!
//! Usage: orgpress <COMMAND>
//!
//! Commands:
//!   publish  Export one document into the section its output path names
//!   build    Convert a nested Org directory into a Hugo section
//!   resolve  Show the section and publish directory for an output path

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use orgpress::build::{self, BuildOptions, ExecuteOptions, NinjaOptions, StepKind};
use orgpress::config::{load_layered, EngineConfig, LoadedConfig};
use orgpress::paths::resolve_path;
use orgpress::{EmacsEngine, ExportRequest, Publisher, ResolvedPaths};

/// orgpress - publish Org-mode notes into a Hugo site
#[derive(Parser, Debug)]
#[command(name = "orgpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: <org dir>/orgpress.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Engine overrides shared by commands that export
#[derive(Args, Debug, Clone, Default)]
struct EngineArgs {
    /// Emacs executable
    #[arg(long, value_name = "PROGRAM")]
    emacs: Option<String>,

    /// File to load before exporting (repeatable; replaces configured files)
    #[arg(long = "load", value_name = "FILE")]
    load: Vec<PathBuf>,
}

impl EngineArgs {
    fn apply(&self, engine: &mut EngineConfig) {
        if let Some(program) = &self.emacs {
            engine.program = program.clone();
        }
        if !self.load.is_empty() {
            engine.load = self.load.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export one document into the section its output path names
    Publish {
        /// Org document to export
        source: PathBuf,

        /// Desired Markdown file, under <site>/content/
        output: PathBuf,

        /// Hugo site root
        #[arg(long)]
        site: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Convert a nested Org directory into a Hugo section
    Build {
        /// Directory containing the nested Org database
        org_dir: PathBuf,

        /// Section directory, e.g. hugo-site/content/posts
        out_dir: PathBuf,

        /// Worker threads (default: one per CPU)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Rebuild outputs that look up to date
        #[arg(short, long)]
        force: bool,

        /// Dry run - show the plan without writing
        #[arg(long)]
        dry_run: bool,

        /// Write build.ninja into the output directory instead of building
        #[arg(long)]
        emit_ninja: bool,

        /// Program run on each converted file (the file path is appended)
        #[arg(long, value_name = "PROGRAM")]
        post_process: Option<String>,

        /// Do not copy .md files found in the Org directory
        #[arg(long)]
        no_copy_markdown: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Show the section and publish directory for an output path
    Resolve {
        /// Desired Markdown file, under <site>/content/
        output: PathBuf,

        /// Hugo site root
        #[arg(long)]
        site: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Publish {
            source,
            output,
            site,
            engine,
        } => cmd_publish(cli.config.as_deref(), &source, &output, &site, &engine, cli.json),
        Commands::Build {
            org_dir,
            out_dir,
            jobs,
            force,
            dry_run,
            emit_ninja,
            post_process,
            no_copy_markdown,
            engine,
        } => {
            let flags = BuildFlags {
                jobs,
                force,
                dry_run,
                emit_ninja,
                post_process,
                no_copy_markdown,
            };
            cmd_build(cli.config.as_deref(), &org_dir, &out_dir, &flags, &engine, cli.json)
        }
        Commands::Resolve { output, site } => cmd_resolve(&output, &site, cli.json),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("ORGPRESS_LOG")
        .format_timestamp(None)
        .init();
}

fn load_config(explicit: Option<&Path>, project_dir: Option<&Path>, json: bool) -> Result<LoadedConfig> {
    let loaded = load_layered(explicit, project_dir)?;
    if !json {
        for w in &loaded.warnings {
            match w.line {
                Some(line) => eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, w.file.display(), line),
                None => eprintln!("⚠ Unknown config key '{}' in {}", w.key, w.file.display()),
            }
        }
    }
    Ok(loaded)
}

fn cmd_publish(
    config: Option<&Path>,
    source: &Path,
    output: &Path,
    site: &Path,
    engine_args: &EngineArgs,
    json: bool,
) -> Result<()> {
    let source_path = resolve_path(source)?;
    let mut loaded = load_config(config, source_path.parent(), json)?;
    engine_args.apply(&mut loaded.config.engine);

    let publisher = Publisher::new(EmacsEngine::from_config(&loaded.config.engine)?);
    let report = publisher
        .publish(&ExportRequest::new(source, output, site))
        .with_context(|| format!("publishing {}", source.display()))?;

    if json {
        let output = serde_json::json!({
            "event": "publish",
            "source": report.source_doc.display().to_string(),
            "output": report.output_file.display().to_string(),
            "section": report.section,
            "publish_dir": report.publish_dir.display().to_string(),
            "overridden": report.overridden.iter().map(|d| d.keyword).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("✓ {} → {}", report.source_doc.display(), report.output_file.display());
        for d in &report.overridden {
            println!("  ↳ ignored #+{}: {}", d.keyword, d.value);
        }
    }

    Ok(())
}

struct BuildFlags {
    jobs: Option<usize>,
    force: bool,
    dry_run: bool,
    emit_ninja: bool,
    post_process: Option<String>,
    no_copy_markdown: bool,
}

fn cmd_build(
    config: Option<&Path>,
    org_dir: &Path,
    out_dir: &Path,
    flags: &BuildFlags,
    engine_args: &EngineArgs,
    json: bool,
) -> Result<()> {
    let loaded = load_config(config, Some(resolve_path(org_dir)?.as_path()), json)?;
    let config_source = loaded.source.clone();
    let mut cfg = loaded.config;
    engine_args.apply(&mut cfg.engine);
    if let Some(jobs) = flags.jobs {
        cfg.build.jobs = jobs;
    }
    if let Some(program) = &flags.post_process {
        cfg.build.post_process = vec![program.clone()];
    }
    if flags.no_copy_markdown {
        cfg.build.copy_markdown = false;
    }

    // Validate the engine settings before touching the output tree.
    let engine = EmacsEngine::from_config(&cfg.engine)?;

    let prepared = build::prepare(&BuildOptions {
        org_dir: org_dir.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        force: flags.force,
        copy_markdown: cfg.build.copy_markdown,
    })?;

    if !json {
        println!("📦 orgpress build");
        println!("Source: {}", prepared.org_dir.display());
        println!("Section: {}", prepared.layout.section_dir.display());
        println!("Site: {}", prepared.layout.site_root.display());
    }

    if flags.dry_run {
        print_plan(&prepared, json)?;
        return Ok(());
    }

    if flags.emit_ninja {
        let exe = std::env::current_exe().context("locating the orgpress executable")?;
        let path = build::write_ninja(
            &prepared,
            &NinjaOptions {
                exe: &exe,
                site_root: &prepared.layout.site_root,
                engine: &cfg.engine,
                config: config_source.as_deref(),
                post_process: &cfg.build.post_process,
            },
        )?;
        if json {
            let output = serde_json::json!({
                "event": "ninja",
                "path": path.display().to_string(),
                "steps": prepared.plan.steps.len(),
            });
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("\n✓ Wrote {}", path.display());
            println!("  Run: ninja -C {}", prepared.layout.section_dir.display());
        }
        return Ok(());
    }

    let publisher = Publisher::new(engine);
    let report = build::run(
        &prepared,
        &publisher,
        &ExecuteOptions {
            jobs: cfg.build.jobs,
            post_process: cfg.build.post_process.clone(),
        },
    )?;

    if json {
        let output = serde_json::json!({
            "event": "build",
            "status": if report.is_success() { "success" } else { "partial" },
            "converted": report.converted.len(),
            "copied": report.copied.len(),
            "skipped": report.skipped.len(),
            "errors": report.failed.len()
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Build Results:");
        if !report.converted.is_empty() {
            println!("  ✓ Converted: {} files", report.converted.len());
        }
        if !report.copied.is_empty() {
            println!("  ✓ Copied: {} files", report.copied.len());
        }
        if !report.skipped.is_empty() {
            println!("  ⚠ Up to date: {} files", report.skipped.len());
        }
        if !report.failed.is_empty() {
            println!("  ✗ Errors: {}", report.failed.len());
            for failure in &report.failed {
                println!("    - {}: {}", failure.input.display(), failure.message);
            }
        }
        println!();
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} steps failed",
            report.failed.len(),
            report.failed.len() + report.converted.len() + report.copied.len()
        );
    }

    Ok(())
}

fn print_plan(prepared: &build::PreparedBuild, json: bool) -> Result<()> {
    let plan = &prepared.plan;

    if json {
        let steps: Vec<_> = plan
            .steps
            .iter()
            .map(|s| {
                serde_json::json!({
                    "kind": match s.kind {
                        StepKind::Convert => "convert",
                        StepKind::Copy => "copy",
                    },
                    "input": s.input.display().to_string(),
                    "output": s.output.display().to_string(),
                    "pending": s.is_pending(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "event": "plan",
            "site": prepared.layout.site_root.display().to_string(),
            "steps": steps,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!();
    for step in &plan.steps {
        let label = match (step.kind, step.is_pending()) {
            (_, false) => "ok    ",
            (StepKind::Convert, true) => "org2md",
            (StepKind::Copy, true) => "copy  ",
        };
        println!("  {} {} → {}", label, step.input.display(), step.output.display());
    }
    println!();
    println!(
        "Summary: {} to convert, {} to copy, {} up to date",
        plan.pending().filter(|s| s.kind == StepKind::Convert).count(),
        plan.pending().filter(|s| s.kind == StepKind::Copy).count(),
        plan.steps.iter().filter(|s| !s.is_pending()).count()
    );

    Ok(())
}

fn cmd_resolve(output: &Path, site: &Path, json: bool) -> Result<()> {
    let paths = ResolvedPaths::resolve(&resolve_path(output)?, &resolve_path(site)?)?;

    if json {
        let out = serde_json::json!({
            "event": "resolve",
            "content_root": paths.content_root.display().to_string(),
            "section": paths.section,
            "publish_dir": paths.publish_dir.display().to_string(),
        });
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("section: {}", paths.section);
        println!("publish_dir: {}", paths.publish_dir.display());
    }

    Ok(())
}
