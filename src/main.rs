// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the iconsprite binary.
//!
//! Without flags the CLI builds every sprite set of the conventional layout
//! below the current directory once. `--config` selects a YAML configuration
//! and `--watch` keeps rebuilding on SVG changes until interrupted.

use std::{
    path::PathBuf,
    process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use clap::{ArgAction, Parser};
use iconsprite::{BuildConfig, BuildEvent, BuildSummary, Error, WatchEvent, run_build, watch};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface for building icon sprites.
#[derive(Debug, Parser,)]
#[command(name = "iconsprite", version, about = "Build SVG icon sprites and their manifest")]
struct Cli
{
    /// Keep running and rebuild whenever an SVG source changes.
    #[arg(short = 'w', long = "watch", action = ArgAction::SetTrue)]
    watch: bool,

    /// Path to a YAML configuration describing the sprite sets.
    #[arg(long = "config", value_name = "PATH", env = "ICONSPRITE_CONFIG")]
    config: Option<PathBuf,>,

    /// Project root used for the built-in layout when no configuration is
    /// given.
    #[arg(long = "root", value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    let cli = Cli::parse();
    init_tracing(cli.verbose,);

    if let Err(error,) = run(&cli,) {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing(verbose: bool,)
{
    let level = if verbose { "debug" } else { "info" };
    let filter = std::env::var("RUST_LOG",).unwrap_or_else(|_| level.to_owned(),);

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter,),)
        .with(tracing_subscriber::fmt::layer().with_target(false,).with_writer(std::io::stderr,),)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, artifact and watcher errors.
fn run(cli: &Cli,) -> Result<(), Error,>
{
    let config = resolve_config(cli,)?;
    let summary = build_with_progress(&config,)?;
    println!("{}", summary_line(&summary,));

    if cli.watch {
        run_watch(&config,)?;
    }

    Ok((),)
}

fn resolve_config(cli: &Cli,) -> Result<BuildConfig, Error,>
{
    match cli.config.as_deref() {
        Some(path,) => BuildConfig::load(path,),
        None => Ok(BuildConfig::defaults(&cli.root,),),
    }
}

fn summary_line(summary: &BuildSummary,) -> String
{
    format!("Generated {} icons across {} sprites", summary.icon_count(), summary.sprite_count())
}

fn progress_style() -> ProgressStyle
{
    ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}",)
        .expect("valid template",)
        .progress_chars("=> ",)
}

fn build_with_progress(config: &BuildConfig,) -> Result<BuildSummary, Error,>
{
    let mut bar: Option<ProgressBar,> = None;

    run_build(config, |event| match event {
        BuildEvent::SetStarted {
            set,
            files,
        } => {
            let progress = ProgressBar::new(files as u64,);
            progress.set_style(progress_style(),);
            progress.set_prefix(set.to_owned(),);
            bar = Some(progress,);
        }
        BuildEvent::IconProcessed {
            id, ..
        } => {
            if let Some(progress,) = &bar {
                progress.set_message(id.to_owned(),);
                progress.inc(1,);
            }
        }
        BuildEvent::IconFailed {
            path, ..
        } => {
            if let Some(progress,) = &bar {
                progress.println(format!("skipped unreadable {}", path.display()),);
                progress.inc(1,);
            }
        }
        BuildEvent::SetWritten {
            icons,
            output,
            ..
        } => {
            if let Some(progress,) = bar.take() {
                progress.finish_with_message(format!("{icons} icons -> {}", output.display()),);
            }
        }
        BuildEvent::SetSkipped {
            set,
        } => println!("{set}: no SVG files found, skipped"),
        BuildEvent::Phase {
            ..
        } => {}
    },)
}

fn run_watch(config: &BuildConfig,) -> Result<(), Error,>
{
    let running = Arc::new(AtomicBool::new(true,),);
    let flag = Arc::clone(&running,);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst,),)?;

    watch(config, running, |event| match event {
        WatchEvent::Started {
            directories,
        } => {
            println!("Watching {} icon directories, press Ctrl+C to stop", directories.len());
        }
        WatchEvent::Changed {
            path,
        } => println!("Changed: {}", path.display()),
        WatchEvent::Rebuilt {
            summary,
        } => println!("{}", summary_line(summary,)),
        WatchEvent::RebuildFailed {
            error,
        } => eprintln!("Rebuild failed: {}", error.to_display_string()),
        WatchEvent::Stopped => println!("Stopped watching"),
    },)
}

#[cfg(test)]
mod tests
{
    use std::{fs, path::Path};

    use clap::Parser;
    use tempfile::tempdir;

    use super::{Cli, build_with_progress, resolve_config, run, summary_line};

    #[test]
    fn cli_defaults_to_single_build_in_current_directory()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME")],).expect("failed to parse CLI",);

        assert!(!cli.watch);
        assert!(!cli.verbose);
        assert_eq!(cli.root, Path::new("."));
    }

    #[test]
    fn cli_accepts_short_watch_and_config()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "-w", "--config", "icons.yaml", "--verbose",],)
            .expect("failed to parse CLI",);

        assert!(cli.watch);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("icons.yaml")));
    }

    #[test]
    fn cli_rejects_unknown_flags()
    {
        assert!(Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--bogus"],).is_err());
    }

    #[test]
    fn resolve_config_uses_root_for_defaults()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--root", "/theme"],).expect("failed to parse CLI",);
        let config = resolve_config(&cli,).expect("defaults never fail",);

        assert_eq!(config.manifest_file, Path::new("/theme/dist/icon-manifest.json"));
    }

    #[test]
    fn resolve_config_reports_missing_file()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--config", "/definitely/missing.yaml"],)
            .expect("failed to parse CLI",);
        let error = resolve_config(&cli,).expect_err("expected io error",);

        assert!(matches!(error, iconsprite::Error::Io { .. }));
    }

    #[test]
    fn run_builds_configured_sets()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let icons = temp.path().join("svg",);
        fs::create_dir_all(&icons,).expect("failed to create icons dir",);
        fs::write(icons.join("home.svg",), "<svg viewBox=\"0 0 32 32\"><path/></svg>",).expect("failed to write icon",);
        let config_path = temp.path().join("iconsprite.yaml",);
        let yaml = r#"
manifest: out/manifest.json
sprites:
  - input_dir: svg
    output_file: out/icons.svg
    sprite_id: icons
"#;
        fs::write(&config_path, yaml,).expect("failed to write config",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "--config",
            config_path.to_str().expect("utf8",),
        ],)
        .expect("failed to parse CLI",);

        run(&cli,).expect("build failed",);

        assert!(temp.path().join("out/icons.svg").exists());
        assert!(temp.path().join("out/manifest.json").exists());
    }

    #[test]
    fn summary_line_counts_icons_and_sprites()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let icons = temp.path().join("assets/icons",);
        fs::create_dir_all(&icons,).expect("failed to create icons dir",);
        fs::write(icons.join("a.svg",), "<svg><g/></svg>",).expect("failed to write icon",);
        fs::write(icons.join("b.svg",), "<svg><g/></svg>",).expect("failed to write icon",);

        let config = iconsprite::BuildConfig::defaults(temp.path(),);
        let summary = build_with_progress(&config,).expect("build failed",);

        assert_eq!(summary_line(&summary,), "Generated 2 icons across 1 sprites");
    }
}
