// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Build driver producing sprite documents and the combined manifest.
//!
//! Every configured set is discovered, assembled and written in configuration
//! order. The manifest is written last, so a failed sprite write never leaves
//! a manifest that references artifacts from two different builds.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::{BuildConfig, SpriteSet},
    discover::discover_svg_files,
    error::Error,
    file::write_artifact,
    pipeline::{IconOutcome, assemble_files},
    repository::SpriteRepository,
};

/// Stage of a build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase
{
    /// No build is running.
    #[default]
    Idle,
    /// Source files of a set are being discovered.
    Discovering,
    /// Discovered icons are being normalized and assembled.
    Building,
    /// The sprite document of a set is being written.
    Writing,
    /// The combined manifest is being written.
    Finalizing,
    /// The pass finished.
    Done,
}

impl fmt::Display for BuildPhase
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        let label = match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Building => "building",
            Self::Writing => "writing",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        };
        f.write_str(label,)
    }
}

/// Progress notification emitted while a build pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum BuildEvent<'a,>
{
    /// The pass entered `phase`, for the named set when the phase is per set.
    Phase
    {
        phase: BuildPhase,
        set:   Option<&'a str,>,
    },
    /// A set has `files` source files to process.
    SetStarted
    {
        set:   &'a str,
        files: usize,
    },
    /// One icon was normalized.
    IconProcessed
    {
        set: &'a str,
        id: &'a str,
    },
    /// One source file could not be read and was skipped.
    IconFailed
    {
        set:  &'a str,
        path: &'a Path,
    },
    /// A set had no source files and produced no artifact.
    SetSkipped
    {
        set: &'a str,
    },
    /// The sprite document of a set was written.
    SetWritten
    {
        set:    &'a str,
        icons:  usize,
        output: &'a Path,
    },
}

/// Outcome of one sprite set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct SetReport
{
    /// Name of the set.
    pub name:         String,
    /// Key of the sprite in the manifest.
    pub sprite_id:    String,
    /// Location of the written sprite document.
    pub output_file:  PathBuf,
    /// Number of symbols in the sprite.
    pub icon_count:   usize,
    /// Number of source files that could not be read.
    pub failed_files: usize,
}

/// Outcome of a build pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct BuildSummary
{
    /// Sets that produced a sprite, in configuration order.
    pub sets:          Vec<SetReport,>,
    /// Names of sets skipped because they had no source files.
    pub skipped:       Vec<String,>,
    /// Location of the written manifest.
    pub manifest_file: PathBuf,
}

impl BuildSummary
{
    /// Total number of icons across all written sprites.
    pub fn icon_count(&self,) -> usize
    {
        self.sets.iter().map(|set| set.icon_count,).sum()
    }

    /// Number of written sprites.
    pub fn sprite_count(&self,) -> usize
    {
        self.sets.len()
    }
}

/// Runs a full build pass for `config`.
///
/// Each pass uses a fresh [`SpriteRepository`], so icons whose sources were
/// deleted since the previous pass disappear from the artifacts.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when a sprite document or the manifest
/// cannot be written and [`Error::Serialize`] when the manifest cannot be
/// encoded. Unreadable source files are reported through `on_event` and do
/// not fail the pass.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use iconsprite::{BuildConfig, run_build};
///
/// # fn example() -> Result<(), iconsprite::Error> {
/// let config = BuildConfig::defaults(Path::new(".",),);
/// let summary = run_build(&config, |_| {},)?;
/// println!(
///     "Generated {} icons across {} sprites",
///     summary.icon_count(),
///     summary.sprite_count()
/// );
/// # Ok(())
/// # }
/// ```
pub fn run_build<F,>(config: &BuildConfig, mut on_event: F,) -> Result<BuildSummary, Error,>
where
    F: FnMut(BuildEvent<'_,>,),
{
    let repository = SpriteRepository::new();
    let mut sets = Vec::with_capacity(config.sprite_sets.len(),);
    let mut skipped = Vec::new();

    for set in &config.sprite_sets {
        match build_set(set, &repository, &mut on_event,)? {
            Some(report,) => sets.push(report,),
            None => skipped.push(set.name.clone(),),
        }
    }

    enter(&mut on_event, BuildPhase::Finalizing, None,);
    let manifest = repository.manifest();
    write_artifact(&config.manifest_file, &manifest.to_json()?,)?;
    info!("Generated manifest: {}", config.manifest_file.display());

    enter(&mut on_event, BuildPhase::Done, None,);

    Ok(BuildSummary {
        sets,
        skipped,
        manifest_file: config.manifest_file.clone(),
    },)
}

fn build_set<F,>(
    set: &SpriteSet,
    repository: &SpriteRepository,
    on_event: &mut F,
) -> Result<Option<SetReport,>, Error,>
where
    F: FnMut(BuildEvent<'_,>,),
{
    let name = set.name.as_str();

    enter(on_event, BuildPhase::Discovering, Some(name,),);
    let files = discover_svg_files(&set.input_dir, set.recursive,);
    if files.is_empty() {
        warn!("No SVG files found in {} for {name}, skipping", set.input_dir.display());
        on_event(BuildEvent::SetSkipped {
            set: name,
        },);
        return Ok(None,);
    }

    info!("Found {} SVG files for {name}", files.len());
    on_event(BuildEvent::SetStarted {
        set:   name,
        files: files.len(),
    },);

    enter(on_event, BuildPhase::Building, Some(name,),);
    let mut failed_files = 0;
    let sprite = assemble_files(
        &set.sprite_id,
        &set.input_dir,
        set.recursive,
        &files,
        |outcome| match outcome {
            IconOutcome::Processed {
                id, ..
            } => on_event(BuildEvent::IconProcessed {
                set: name,
                id,
            },),
            IconOutcome::Failed {
                file, ..
            } => {
                failed_files += 1;
                on_event(BuildEvent::IconFailed {
                    set:  name,
                    path: &file.path,
                },);
            }
        },
    );
    let sprite = repository.register(sprite,);

    enter(on_event, BuildPhase::Writing, Some(name,),);
    write_artifact(&set.output_file, &sprite.document,)?;
    info!("Generated sprite with {} icons: {}", sprite.icon_count(), set.output_file.display());
    on_event(BuildEvent::SetWritten {
        set:    name,
        icons:  sprite.icon_count(),
        output: &set.output_file,
    },);

    Ok(Some(SetReport {
        name: set.name.clone(),
        sprite_id: set.sprite_id.clone(),
        output_file: set.output_file.clone(),
        icon_count: sprite.icon_count(),
        failed_files,
    },),)
}

fn enter<F,>(on_event: &mut F, phase: BuildPhase, set: Option<&str,>,)
where
    F: FnMut(BuildEvent<'_,>,),
{
    match set {
        Some(name,) => debug!("Build phase: {phase} ({name})"),
        None => debug!("Build phase: {phase}"),
    }
    on_event(BuildEvent::Phase {
        phase,
        set,
    },);
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::manifest::Manifest;

    fn write(root: &Path, relative: &str, contents: &str,)
    {
        let path = root.join(relative,);
        if let Some(parent,) = path.parent() {
            fs::create_dir_all(parent,).expect("failed to create parent",);
        }
        fs::write(path, contents,).expect("failed to write file",);
    }

    fn collect_phases(config: &BuildConfig,) -> (Result<BuildSummary, Error,>, Vec<(BuildPhase, Option<String,>,),>,)
    {
        let mut phases = Vec::new();
        let result = run_build(config, |event| {
            if let BuildEvent::Phase {
                phase,
                set,
            } = event
            {
                phases.push((phase, set.map(str::to_owned,),),);
            }
        },);
        (result, phases,)
    }

    #[test]
    fn build_writes_sprites_and_manifest()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg viewBox=\"0 0 32 32\"><path/></svg>",);
        write(root.path(), "assets/icons/folder/star.svg", "<svg width=\"16\" height=\"16\"><circle/></svg>",);
        write(root.path(), "assets/large-icons/hero.svg", "<svg viewBox=\"0 0 64 64\"><g/></svg>",);
        let config = BuildConfig::defaults(root.path(),);

        let summary = run_build(&config, |_| {},).expect("build failed",);

        assert_eq!(summary.sprite_count(), 2);
        assert_eq!(summary.icon_count(), 3);
        assert!(summary.skipped.is_empty());

        let manifest = Manifest::load(&config.manifest_file,).expect("manifest missing",);
        assert_eq!(manifest.lookup("home",).map(|entry| entry.view_box.as_str()), Some("0 0 32 32"));
        assert_eq!(manifest.lookup("folder-star",).map(|entry| entry.sprite.as_str()), Some("icons"));
        assert_eq!(manifest.lookup("hero",).map(|entry| entry.sprite.as_str()), Some("large-icons"));

        let document = fs::read_to_string(root.path().join("dist/icons-sprite.svg",),).expect("sprite missing",);
        assert_eq!(document.matches("<symbol ",).count(), 2);
    }

    #[test]
    fn phases_follow_configuration_order()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg><g/></svg>",);
        let config = BuildConfig::defaults(root.path(),);

        let (result, phases,) = collect_phases(&config,);
        result.expect("build failed",);

        let icons = Some("icons".to_owned(),);
        let large = Some("largeIcons".to_owned(),);
        assert_eq!(
            phases,
            vec![
                (BuildPhase::Discovering, icons.clone()),
                (BuildPhase::Building, icons.clone()),
                (BuildPhase::Writing, icons),
                (BuildPhase::Discovering, large),
                (BuildPhase::Finalizing, None),
                (BuildPhase::Done, None),
            ]
        );
    }

    #[test]
    fn empty_set_is_skipped_without_artifact()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg><g/></svg>",);
        let config = BuildConfig::defaults(root.path(),);

        let summary = run_build(&config, |_| {},).expect("build failed",);

        assert_eq!(summary.skipped, vec!["largeIcons"]);
        assert!(!root.path().join("dist/large-icons-sprite.svg",).exists());
        let manifest = Manifest::load(&config.manifest_file,).expect("manifest missing",);
        assert_eq!(manifest.sprite_count(), 1);
        assert!(manifest.fragment("large-icons",).is_none());
    }

    #[test]
    fn build_leaves_no_temporary_files()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg><g/></svg>",);
        write(root.path(), "assets/large-icons/hero.svg", "<svg><g/></svg>",);
        let config = BuildConfig::defaults(root.path(),);

        run_build(&config, |_| {},).expect("first build failed",);
        run_build(&config, |_| {},).expect("second build failed",);

        let mut names: Vec<String,> = fs::read_dir(root.path().join("dist",),)
            .expect("dist missing",)
            .map(|entry| entry.expect("entry",).file_name().to_string_lossy().into_owned(),)
            .collect();
        names.sort();
        assert_eq!(names, vec!["icon-manifest.json", "icons-sprite.svg", "large-icons-sprite.svg"]);
    }

    #[test]
    fn failed_sprite_write_prevents_manifest()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg><g/></svg>",);
        write(root.path(), "blocked", "regular file standing in for a directory",);

        let mut config = BuildConfig::defaults(root.path(),);
        config.sprite_sets[0].output_file = root.path().join("blocked/icons-sprite.svg",);

        let error = run_build(&config, |_| {},).expect_err("expected write failure",);

        assert!(matches!(error, Error::ArtifactIo { .. }));
        assert!(!config.manifest_file.exists());
    }

    #[test]
    fn deleted_sources_disappear_on_rebuild()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg><g/></svg>",);
        write(root.path(), "assets/icons/star.svg", "<svg><g/></svg>",);
        let config = BuildConfig::defaults(root.path(),);

        run_build(&config, |_| {},).expect("first build failed",);
        fs::remove_file(root.path().join("assets/icons/star.svg",),).expect("remove failed",);
        run_build(&config, |_| {},).expect("second build failed",);

        let manifest = Manifest::load(&config.manifest_file,).expect("manifest missing",);
        assert!(manifest.lookup("home",).is_some());
        assert!(manifest.lookup("star",).is_none());
    }

    #[test]
    fn unreadable_file_is_reported_and_skipped()
    {
        let root = tempdir().expect("failed to create temp dir",);
        write(root.path(), "assets/icons/home.svg", "<svg><g/></svg>",);
        fs::write(root.path().join("assets/icons/binary.svg",), b"\xff\xfe\x00",).expect("write failed",);
        let config = BuildConfig::defaults(root.path(),);

        let mut failed = Vec::new();
        let summary = run_build(&config, |event| {
            if let BuildEvent::IconFailed {
                path, ..
            } = event
            {
                failed.push(path.to_path_buf(),);
            }
        },)
        .expect("build failed",);

        assert_eq!(failed, vec![root.path().join("assets/icons/binary.svg")]);
        assert_eq!(summary.sets[0].failed_files, 1);
        assert_eq!(summary.sets[0].icon_count, 1);
    }

    #[test]
    fn phase_labels_are_lowercase()
    {
        assert_eq!(BuildPhase::default(), BuildPhase::Idle);
        assert_eq!(BuildPhase::Finalizing.to_string(), "finalizing");
    }
}
