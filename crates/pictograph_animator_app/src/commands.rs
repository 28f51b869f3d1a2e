// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command implementations.

use crate::cli::Commands;
use crate::config::{AnimatorConfig, ConfigError};
use pictograph_animator_core::{AnimationEngine, BeatClock, LoadError, PropState, SequenceData};
use pictograph_animator_library::{
    embed_sequence, extract_sequence, Catalog, CatalogError, CodecError, DirectorySource,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input or output file access failed
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The image did not yield a sequence
    #[error("{}: {source}", path.display())]
    Codec {
        /// Image path
        path: PathBuf,
        /// Codec failure
        source: CodecError,
    },

    /// JSON input was not a sequence
    #[error("Invalid sequence JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The sequence cannot be animated
    #[error("Cannot load sequence: {0}")]
    Load(#[from] LoadError),

    /// Catalog failure
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No catalog category has this label
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Pose of both props at one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    /// Frame number, from 0
    pub frame: usize,
    /// Beat queried for this frame
    pub beat: f32,
    /// Blue prop
    pub blue: PropState,
    /// Red prop
    pub red: PropState,
}

/// Run one command; `config_path` is where the configuration was read from
pub fn execute(
    command: Commands,
    config: &AnimatorConfig,
    config_path: &Path,
) -> Result<(), AppError> {
    match command {
        Commands::InitConfig { force } => {
            if config_path.exists() && !force {
                tracing::warn!("{:?} already exists, use --force to overwrite", config_path);
                return Ok(());
            }
            AnimatorConfig::default().save(config_path)?;
            tracing::info!("Wrote default configuration to {:?}", config_path);
            Ok(())
        }
        Commands::Inspect { file } => inspect(&file),
        Commands::Pose { file, beat } => pose(&file, beat, config),
        Commands::Play {
            file,
            fps,
            speed,
            once,
            max_frames,
            json,
        } => {
            let mut engine = load_engine(&file, config)?;
            let fps = fps.unwrap_or(config.playback.fps);
            let clock = BeatClock::new()
                .with_speed(speed.unwrap_or(config.playback.speed))
                .with_looping(config.playback.looping && !once);

            for record in play_frames(&mut engine, clock, fps, max_frames) {
                if json {
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    println!(
                        "{:>5}  {}",
                        record.frame,
                        format_states(record.beat, &record.blue, &record.red)
                    );
                }
            }
            Ok(())
        }
        Commands::Catalog {
            root,
            query,
            category,
        } => catalog(
            root.unwrap_or_else(|| config.library.root.clone()),
            &query,
            category.as_deref(),
            config,
        ),
        Commands::Export { file, out } => {
            let data = read_sequence(&file)?;
            let bytes = embed_sequence(&data).map_err(|source| AppError::Codec {
                path: out.clone(),
                source,
            })?;
            fs::write(&out, bytes).map_err(|source| AppError::Io {
                path: out.clone(),
                source,
            })?;
            tracing::info!("Wrote {} steps to {:?}", data.steps().len(), out);
            Ok(())
        }
    }
}

/// Read a sequence from a PNG, or from a JSON array when the extension is `.json`
pub fn read_sequence(path: &Path) -> Result<SequenceData, AppError> {
    let io_err = |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    };

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let text = fs::read_to_string(path).map_err(io_err)?;
        return Ok(SequenceData::from_json_str(&text)?);
    }

    let bytes = fs::read(path).map_err(io_err)?;
    extract_sequence(&bytes).map_err(|source| AppError::Codec {
        path: path.to_path_buf(),
        source,
    })
}

/// Drive `clock` at `fps` and query the engine once per frame.
///
/// Stops when the clock stops (the frame at the final beat is included) or
/// after `max_frames` frames.
pub fn play_frames(
    engine: &mut AnimationEngine,
    mut clock: BeatClock,
    fps: u32,
    max_frames: usize,
) -> Vec<FrameRecord> {
    let delta = 1.0 / fps.max(1) as f32;
    let mut frames = Vec::new();
    clock.play();

    for frame in 0..max_frames {
        let Some(states) = engine.query(clock.beat) else {
            break;
        };
        frames.push(FrameRecord {
            frame,
            beat: clock.beat,
            blue: states.blue,
            red: states.red,
        });

        if !clock.is_playing() {
            break;
        }
        clock.update(delta, engine.total_beats(), engine.can_loop());
    }

    frames
}

fn load_engine(path: &Path, config: &AnimatorConfig) -> Result<AnimationEngine, AppError> {
    let mut engine = AnimationEngine::new(config.engine);
    engine.load(read_sequence(path)?)?;
    Ok(engine)
}

fn inspect(path: &Path) -> Result<(), AppError> {
    let data = read_sequence(path)?;
    let meta = data.meta();

    println!("File:       {}", path.display());
    println!("Word:       {}", meta.word.as_deref().unwrap_or("-"));
    println!("Author:     {}", meta.author.as_deref().unwrap_or("-"));
    println!(
        "Level:      {}",
        meta.level.map_or_else(|| "-".to_string(), |l| l.to_string())
    );
    println!("Prop type:  {}", meta.prop_type.as_deref().unwrap_or("-"));
    println!("Grid mode:  {}", meta.grid_mode.as_deref().unwrap_or("-"));
    println!("Steps:      {}", data.steps().len());
    println!("Moves:      {}", data.move_count());
    for (key, value) in &meta.extra {
        println!("{:<11} {}", format!("{key}:"), value);
    }

    let mut engine = AnimationEngine::default();
    match engine.load(data) {
        Ok(()) => println!("Beats:      {}", engine.total_beats()),
        Err(err) => println!("Playable:   no ({err})"),
    }
    Ok(())
}

fn pose(path: &Path, beat: f32, config: &AnimatorConfig) -> Result<(), AppError> {
    let mut engine = load_engine(path, config)?;
    if let Some(states) = engine.query(beat) {
        println!("{}", format_states(beat, &states.blue, &states.red));
    }
    Ok(())
}

fn catalog(
    root: PathBuf,
    query: &str,
    category: Option<&str>,
    config: &AnimatorConfig,
) -> Result<(), AppError> {
    let catalog = Catalog::new(DirectorySource::new(root), config.library.catalog_config());
    let index = catalog.index()?;

    let category = match category {
        Some(label) => Some(
            index
                .category(label)
                .cloned()
                .ok_or_else(|| AppError::UnknownCategory(label.to_string()))?,
        ),
        None => None,
    };

    let items = catalog.search(query, category.as_ref())?;
    for item in &items {
        println!(
            "{:<12} {:<16} moves {:>3}  versions {}{}",
            item.name,
            item.metadata.author.as_deref().unwrap_or("-"),
            item.move_count(),
            item.versions.len(),
            if item.placeholder { "  (placeholder)" } else { "" }
        );
    }

    let labels: Vec<String> = index.categories.iter().map(ToString::to_string).collect();
    println!("{} of {} sequences", items.len(), index.total_count);
    println!("Categories: {}", labels.join(", "));
    Ok(())
}

fn format_states(beat: f32, blue: &PropState, red: &PropState) -> String {
    format!(
        "beat {:>7.3}  blue {}  red {}",
        beat,
        format_state(blue),
        format_state(red)
    )
}

fn format_state(state: &PropState) -> String {
    format!(
        "({:>8.2}, {:>8.2}) path {:>6.1}° staff {:>6.1}°",
        state.x,
        state.y,
        state.center_path_angle.to_degrees(),
        state.staff_rotation_angle.to_degrees()
    )
}
