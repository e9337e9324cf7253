use anyhow::Context;
use clap::{Parser, Subcommand};
use reveal_assets::TextureStore;
use reveal_common::Viewport;
use reveal_render::{DebugTextRenderer, Renderer};
use reveal_scene::{
    FrameLoop, GalleryLayout, ManualClock, SceneConfig, SceneSync, fov_for_height, reveal_timeline,
};
use reveal_timeline::Ease;
use reveal_tools::SceneInspector;
use std::ops::ControlFlow;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reveal-cli", about = "Headless tools for the reveal scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the default scene config
    Info {
        /// Also list the slots recorded in a texture manifest
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Run the scene on a manual clock and print frames
    Simulate {
        /// Number of frames to tick
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Print every Nth frame
        #[arg(long, default_value = "30")]
        every: u64,
        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,
        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: u32,
        /// Scroll delta applied before the first frame
        #[arg(long, default_value = "0")]
        scroll: f32,
        /// Reveal progress (0-1)
        #[arg(long, default_value = "0")]
        progress: f32,
        /// Placeholder image count when no directory is given
        #[arg(long, default_value = "8")]
        count: usize,
        /// Directory of PNG/JPEG images
        #[arg(long)]
        images: Option<PathBuf>,
        /// Scene config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the gallery's texture manifest (JSON) here
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Print the camera field of view for viewport heights
    Fov {
        /// Viewport heights in pixels
        #[arg(default_values_t = [600.0, 720.0, 1080.0, 1200.0])]
        heights: Vec<f32>,
        /// Camera distance
        #[arg(long, default_value = "600")]
        distance: f32,
    },
    /// Sample the corner timeline across progress
    Timeline {
        /// Number of samples between 0 and 1
        #[arg(short, long, default_value = "10")]
        steps: u32,
        /// Ease name (linear, power1_out, ...)
        #[arg(long, default_value = "linear")]
        ease: Ease,
        /// Duration of each corner tween
        #[arg(long, default_value = "1")]
        duration: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { manifest } => {
            println!("reveal-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scroll: {}", reveal_scroll::crate_info());
            println!("assets: {}", reveal_assets::crate_info());
            println!("render: {}", reveal_render::crate_info());
            println!();
            println!("Default config:");
            print!("{}", SceneConfig::default().to_yaml()?);

            if let Some(path) = manifest {
                let slots = TextureStore::load_manifest(&path)
                    .with_context(|| format!("read manifest {}", path.display()))?;
                println!();
                println!("Manifest {}: {} slots", path.display(), slots.len());
                for (i, info) in slots.iter().enumerate() {
                    println!(
                        "  [{i:>3}] {} {}x{} id={:016x}",
                        info.name, info.width, info.height, info.id.0
                    );
                }
            }
        }
        Commands::Simulate {
            frames,
            every,
            width,
            height,
            scroll,
            progress,
            count,
            images,
            config,
            manifest,
        } => {
            let config = match config {
                Some(path) => SceneConfig::load(&path)
                    .with_context(|| format!("load config {}", path.display()))?,
                None => SceneConfig::default(),
            };
            let textures = match images {
                Some(dir) => TextureStore::load_dir(&dir)
                    .with_context(|| format!("load images from {}", dir.display()))?,
                None => TextureStore::placeholders(count, 32),
            };
            if let Some(path) = &manifest {
                textures
                    .save_manifest(path)
                    .with_context(|| format!("write manifest {}", path.display()))?;
                println!("Wrote manifest {}", path.display());
            }

            let layout = GalleryLayout::new(config.gallery, textures.aspects());
            let viewport = Viewport::from_pixels(width, height)?;
            let mut scene = SceneSync::new(config, layout, viewport)?;
            scene.scroll_by(scroll);
            scene.set_progress(progress);

            println!(
                "Simulating {frames} frames: {} images, viewport {width}x{height}, scroll limit {:.1}",
                textures.len(),
                scene.scroll_limit()
            );

            let renderer = DebugTextRenderer::new();
            let every = every.max(1);
            let mut frame_loop = FrameLoop::new(ManualClock::at_60hz(frames));
            frame_loop.run(&mut scene, |view| {
                if view.frame % every == 0 || view.frame == frames {
                    print!("{}", renderer.render(view));
                }
                ControlFlow::Continue(())
            });

            println!("{}", SceneInspector::summary(&scene));
            let ticked = scene.shutdown();
            println!("Done: {ticked} frames");
        }
        Commands::Fov { heights, distance } => {
            for h in heights {
                println!("height={h:>7.1} fov={:.2}", fov_for_height(h, distance));
            }
        }
        Commands::Timeline {
            steps,
            ease,
            duration,
        } => {
            let reveal = reveal_scene::RevealConfig {
                duration,
                ease,
                ..Default::default()
            };
            let mut timeline = reveal_timeline(&reveal);
            println!(
                "Timeline: {} tweens, duration {:.2}, ease {ease}",
                timeline.tweens().len(),
                timeline.duration()
            );
            let steps = steps.max(1);
            for i in 0..=steps {
                let p = i as f32 / steps as f32;
                let c = timeline.seek_progress(p);
                println!(
                    "progress={p:.3} corners=({:.3}, {:.3}, {:.3}, {:.3})",
                    c.x, c.y, c.z, c.w
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_parses_ease_names() {
        let cli = Cli::try_parse_from(["reveal-cli", "timeline", "--ease", "power1_out"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Timeline {
                ease: Ease::Power1Out,
                ..
            }
        ));
    }

    #[test]
    fn timeline_rejects_unknown_ease() {
        assert!(Cli::try_parse_from(["reveal-cli", "timeline", "--ease", "bounce"]).is_err());
    }

    #[test]
    fn manifest_flags() {
        let cli =
            Cli::try_parse_from(["reveal-cli", "simulate", "--manifest", "slots.json"]).unwrap();
        let Commands::Simulate { manifest, .. } = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(manifest, Some(PathBuf::from("slots.json")));

        let cli = Cli::try_parse_from(["reveal-cli", "info", "--manifest", "slots.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Info { manifest: Some(_) }));
    }
}
