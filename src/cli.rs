use crate::config::{Config, load_config};
use crate::ir::History;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use crate::repo::{GitSource, HistorySource, JsonSource};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_STEM: &str = "git_history";

#[derive(Parser, Debug)]
#[command(name = "ghsvg", version, about = "Render a repository's commit history as a snake-wrapped SVG")]
pub struct Args {
    /// Repository to read (any path inside the work tree)
    #[arg(short = 'r', long = "repo", default_value = ".")]
    pub repo: PathBuf,

    /// Read commits from a JSON history file instead of a repository
    #[arg(short = 'j', long = "history", conflicts_with = "repo")]
    pub history: Option<PathBuf>,

    /// Output file (svg/png). Defaults to git_history.<ext>; '-' writes SVG to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width of the band nodes wrap in
    #[arg(long = "wrap-width")]
    pub wrap_width: Option<f32>,

    /// Seed for branch colors and the star field
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Skip insertion/deletion counts (faster on large repositories)
    #[arg(long = "no-stats")]
    pub no_stats: bool,

    /// Plain background without stars or galaxy
    #[arg(long = "no-decorations")]
    pub no_decorations: bool,

    /// Also write computed positions and connectors as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = resolve_config(&args)?;
    let history = load_history(&args)?;
    if history.is_empty() {
        log::warn!("no commits found; writing an empty canvas");
    }

    let layout = compute_layout(&history, &config.layout);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)
            .with_context(|| format!("failed to write layout dump {}", path.display()))?;
    }

    let svg = render_svg(&history, &layout, &config.theme, &config.render);
    let output = resolve_output(args.output.as_deref(), args.output_format);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, output.as_deref())
                .with_context(|| format!("failed to write {}", display_target(output.as_deref())))?;
        }
        OutputFormat::Png => {
            let path = png_target(output.as_deref())?;
            write_png(&svg, path, &config)?;
        }
    }
    log::info!("wrote {}", display_target(output.as_deref()));
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref()).with_context(|| {
        format!(
            "failed to load config {}",
            args.config.as_deref().map(|p| p.display().to_string()).unwrap_or_default()
        )
    })?;
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(wrap_width) = args.wrap_width {
        config.layout.wrap_width = wrap_width;
    }
    if args.seed.is_some() {
        config.render.seed = args.seed;
    }
    if args.no_decorations {
        config.render.decorations = false;
    }
}

fn load_history(args: &Args) -> Result<History> {
    match args.history.as_deref() {
        Some(path) => JsonSource::new(path)
            .load_history()
            .with_context(|| format!("failed to load history from {}", path.display())),
        None => GitSource::new(&args.repo)
            .with_stats(!args.no_stats)
            .load_history()
            .with_context(|| format!("failed to read repository at {}", args.repo.display())),
    }
}

/// `None` means stdout.
fn resolve_output(output: Option<&Path>, format: OutputFormat) -> Option<PathBuf> {
    match output {
        Some(path) if path == Path::new("-") => None,
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(format!(
            "{DEFAULT_OUTPUT_STEM}.{}",
            format.extension()
        ))),
    }
}

fn png_target(output: Option<&Path>) -> Result<&Path> {
    output.ok_or_else(|| anyhow::anyhow!("PNG output cannot go to stdout"))
}

fn display_target(output: Option<&Path>) -> String {
    output
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdout".to_string())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
        .with_context(|| format!("failed to write {}", output.display()))
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_follow_format() {
        assert_eq!(
            resolve_output(None, OutputFormat::Svg),
            Some(PathBuf::from("git_history.svg"))
        );
        assert_eq!(
            resolve_output(None, OutputFormat::Png),
            Some(PathBuf::from("git_history.png"))
        );
        assert_eq!(resolve_output(Some(Path::new("-")), OutputFormat::Svg), None);
        assert_eq!(
            resolve_output(Some(Path::new("out/map.svg")), OutputFormat::Svg),
            Some(PathBuf::from("out/map.svg"))
        );
    }

    #[test]
    fn png_needs_a_file_target() {
        let stdout = resolve_output(Some(Path::new("-")), OutputFormat::Png);
        assert!(png_target(stdout.as_deref()).is_err());
        assert_eq!(display_target(stdout.as_deref()), "stdout");

        let file = resolve_output(None, OutputFormat::Png);
        assert_eq!(png_target(file.as_deref()).unwrap(), Path::new("git_history.png"));
        assert_eq!(display_target(file.as_deref()), "git_history.png");
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "ghsvg",
            "--wrap-width",
            "900",
            "--seed",
            "3",
            "--no-decorations",
        ])
        .unwrap();
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.layout.wrap_width, 900.0);
        assert_eq!(config.render.seed, Some(3));
        assert!(!config.render.decorations);
    }

    #[test]
    fn history_file_conflicts_with_repo() {
        assert!(Args::try_parse_from(["ghsvg", "-r", "repo", "-j", "history.json"]).is_err());
        let args = Args::try_parse_from(["ghsvg", "-j", "history.json", "-e", "png"]).unwrap();
        assert_eq!(args.history, Some(PathBuf::from("history.json")));
        assert_eq!(args.output_format, OutputFormat::Png);
        assert_eq!(args.repo, PathBuf::from("."));
    }
}
