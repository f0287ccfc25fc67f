use brandkit_render::config::parse_override;
use brandkit_render::{AssetWriter, BrandConfig, BrandFonts, RasterOptions, generate};
use brandkit_text::{FontCache, FontFile, FontLocator, TextStyle};
use serde::Serialize;
use std::io::Write as _;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Render(brandkit_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<brandkit_render::Error> for CliError {
    fn from(value: brandkit_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<brandkit_text::FontError> for CliError {
    fn from(value: brandkit_text::FontError) -> Self {
        Self::Render(value.into())
    }
}

impl From<brandkit_text::GlyphNotFound> for CliError {
    fn from(value: brandkit_text::GlyphNotFound) -> Self {
        Self::Render(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Help,
    Archon,
    Social,
    Rasterize,
    Measure,
    Fonts,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    config: Option<PathBuf>,
    overrides: Vec<String>,
    font_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    background: Option<String>,
    verbose: bool,
    json: bool,
    font: Option<PathBuf>,
    font_size: Option<f64>,
    letter_spacing_em: f64,
    advance: bool,
    text: Option<String>,
}

fn usage() -> &'static str {
    "brandkit\n\
\n\
USAGE:\n\
  brandkit archon [--config <json>] [--set <key=value>]... [--font-dir <dir>] [--out-dir <dir>] [--verbose]\n\
  brandkit social [--config <json>] [--set <key=value>]... [--font-dir <dir>] [--out-dir <dir>] [--verbose]\n\
  brandkit rasterize [--config <json>] [--set <key=value>]... [--out-dir <dir>] [--background <css-color>] [--verbose]\n\
  brandkit measure --font <path> --size <px> [--letter-spacing <em>] [--advance] [--json] <text>\n\
  brandkit fonts [--config <json>] [--font-dir <dir>]\n\
\n\
NOTES:\n\
  - --out-dir is the root that receives the brand/ tree (default: current directory).\n\
  - --font-dir is searched before the per-user and system font directories.\n\
  - --set overrides one config value by dotted path, e.g. --set social.grain_seed=7.\n\
  - measure prints the ink width; --advance prints the pen offset after the text instead.\n\
  - RUST_LOG overrides the log filter; --verbose raises the default to debug.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_command(word: &str) -> Option<Command> {
    match word {
        "archon" => Some(Command::Archon),
        "social" => Some(Command::Social),
        "rasterize" => Some(Command::Rasterize),
        "measure" => Some(Command::Measure),
        "fonts" => Some(Command::Fonts),
        _ => None,
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            // Only the first positional word names the command; later ones are text.
            word if args.command == Command::Help && !word.starts_with('-') => {
                args.command = parse_command(word).ok_or(CliError::Usage(usage()))?;
            }
            "--verbose" | "-v" => args.verbose = true,
            "--json" => args.json = true,
            "--advance" => args.advance = true,
            "--config" => args.config = Some(PathBuf::from(next_value(&mut it)?)),
            "--set" => args.overrides.push(next_value(&mut it)?.clone()),
            "--font-dir" => args.font_dir = Some(PathBuf::from(next_value(&mut it)?)),
            "--out-dir" => args.out_dir = Some(PathBuf::from(next_value(&mut it)?)),
            "--font" => args.font = Some(PathBuf::from(next_value(&mut it)?)),
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--size" => {
                let size = next_value(&mut it)?
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(size.is_finite() && size > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.font_size = Some(size);
            }
            "--letter-spacing" => {
                let em = next_value(&mut it)?
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(em.is_finite() && em >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.letter_spacing_em = em;
            }
            "--" => {
                let Some(rest) = it.next() else {
                    continue;
                };
                if args.text.is_some() || it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.text = Some(rest.clone());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            text => {
                if args.text.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.text = Some(text.to_string());
            }
        }
    }

    match args.command {
        Command::Help => return Err(CliError::Usage(usage())),
        Command::Measure => {
            if args.font.is_none() || args.font_size.is_none() || args.text.is_none() {
                return Err(CliError::Usage(usage()));
            }
        }
        _ => {
            if args.text.is_some() {
                return Err(CliError::Usage(usage()));
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "brandkit={default},brandkit_render={default},brandkit_text={default}"
        ))
    });
    // Logs go to stderr; stdout carries command output.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn load_config(args: &Args) -> Result<BrandConfig, CliError> {
    let overrides = args
        .overrides
        .iter()
        .map(|raw| parse_override(raw).ok_or(CliError::Usage(usage())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BrandConfig::load(args.config.as_deref(), &overrides)?)
}

fn font_locator(args: &Args) -> FontLocator {
    let locator = FontLocator::system();
    match &args.font_dir {
        Some(dir) => locator.with_preferred_dir(dir.clone()),
        None => locator,
    }
}

fn out_root(args: &Args) -> PathBuf {
    args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Serialize)]
struct MeasureOut<'a> {
    text: &'a str,
    font: String,
    font_size: f64,
    letter_spacing_em: f64,
    ink_width: f64,
    advance_after: f64,
}

fn run_measure(args: &Args) -> Result<(), CliError> {
    let (Some(font_path), Some(font_size), Some(text)) =
        (&args.font, args.font_size, args.text.as_deref())
    else {
        return Err(CliError::Usage(usage()));
    };

    let font = FontFile::load(font_path)?;
    let style = TextStyle::new(font_size, args.letter_spacing_em);
    let ink_width = brandkit_text::measure_ink_width(text, &font.metrics, &style)?;
    let advance_after = brandkit_text::advance_after_prefix(text, &font.metrics, &style)?;

    if args.json {
        let out = MeasureOut {
            text,
            font: font.file_name(),
            font_size,
            letter_spacing_em: args.letter_spacing_em,
            ink_width,
            advance_after,
        };
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &out)?;
        writeln!(stdout)?;
    } else if args.advance {
        println!("{advance_after:.2}");
    } else {
        println!("{ink_width:.2}");
    }
    Ok(())
}

fn print_written(writer: &AssetWriter) {
    for asset in writer.written() {
        match &asset.detail {
            Some(detail) => println!("  {} ({detail})", asset.path.display()),
            None => println!("  {}", asset.path.display()),
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Help => Err(CliError::Usage(usage())),
        Command::Measure => run_measure(&args),
        Command::Fonts => {
            let config = load_config(&args)?;
            let locator = font_locator(&args);
            let mut missing = 0usize;
            for (name, resolved) in brandkit_render::fonts::font_report(&config.fonts, &locator) {
                match resolved {
                    Ok(path) => println!("{name}: {path}"),
                    Err(_) => {
                        missing += 1;
                        println!("{name}: not found");
                    }
                }
            }
            if missing > 0 {
                let dirs = locator
                    .dirs()
                    .iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::warn!(missing, searched = %dirs, "brand fonts missing");
            }
            Ok(())
        }
        Command::Archon => {
            let config = load_config(&args)?;
            let locator = font_locator(&args);
            let mut cache = FontCache::new();
            let font = brandkit_render::fonts::load_font(
                &locator,
                &mut cache,
                &config.fonts.bebas_neue,
            )?;

            let mut writer = AssetWriter::new(out_root(&args));
            generate::generate_archon(&config.archon, &font, &mut writer)?;
            print_written(&writer);
            Ok(())
        }
        Command::Social => {
            let config = load_config(&args)?;
            let locator = font_locator(&args);
            let mut cache = FontCache::new();
            let fonts = BrandFonts::load(&config.fonts, &locator, &mut cache)?;

            let mut writer = AssetWriter::new(out_root(&args));
            generate::generate_social(&config.social, &fonts, &mut writer)?;
            print_written(&writer);
            Ok(())
        }
        Command::Rasterize => {
            let config = load_config(&args)?;
            let locator = font_locator(&args);
            let mut cache = FontCache::new();
            // The SVGs reference the brand families by name; register whichever are installed.
            let mut fonts = Vec::new();
            for name in [
                &config.fonts.bebas_neue,
                &config.fonts.fraunces_light_italic,
                &config.fonts.dm_mono,
            ] {
                match brandkit_render::fonts::load_font(&locator, &mut cache, name) {
                    Ok(font) => fonts.push(font.data.clone()),
                    Err(err) => tracing::warn!(font = %name, error = %err, "brand font unavailable"),
                }
            }
            let options = RasterOptions {
                background: args.background.clone(),
                fonts,
                ..Default::default()
            };
            let mut writer = AssetWriter::new(out_root(&args));
            generate::rasterize(&config.rasterize, &options, &mut writer)?;
            print_written(&writer);
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        match err {
            CliError::Usage(msg) => {
                eprintln!("{msg}");
                std::process::exit(2);
            }
            err => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }
}
