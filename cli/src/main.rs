//! xml2docx CLI - xml2rfc to .docx conversion tool
//!
//! Converts RFCs and Internet-Drafts written in the xml2rfc vocabulary to
//! Word documents or kramdown-rfc Markdown.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use xml2docx::render::JsonFormat;
use xml2docx::{Compression, ConvertOptions, Converter, Diagnostic};

/// xml2rfc to Office Open XML conversion
#[derive(Parser)]
#[command(
    name = "xml2docx",
    version,
    about = "Convert xml2rfc documents to .docx",
    long_about = "xml2docx - Convert IETF xml2rfc documents (v2 and v3) to Office Open XML.\n\n\
                  Produces .docx packages or kramdown-rfc Markdown."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an xml2rfc document
    Convert {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (default: input with .docx or .md extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the resolved document model as JSON
        #[arg(long, value_name = "IR.json")]
        dump: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "docx")]
        format: OutputFormat,

        /// Store package entries without compression
        #[arg(long)]
        store: bool,

        /// Fail when any diagnostic is reported
        #[arg(long)]
        strict: bool,
    },

    /// Show document metadata, statistics and diagnostics
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Output format
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Office Open XML word-processing package
    Docx,
    /// kramdown-rfc Markdown
    Markdown,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Markdown => "md",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        match e.downcast_ref::<xml2docx::Error>() {
            Some(err) => eprintln!("{} [{}]: {}", "Error".red().bold(), err.kind(), err),
            None => eprintln!("{}: {}", "Error".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("xml2docx={}", level)),
    )
    .format_timestamp(None)
    .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            dump,
            format,
            store,
            strict,
        } => {
            let output = output.unwrap_or_else(|| default_output(&input, format));
            let mut options = ConvertOptions::new();
            if store {
                options = options.with_compression(Compression::Store);
            }
            let converter = Converter::new(options);
            log::debug!("converting {} to {}", input.display(), output.display());

            let pb = create_spinner("Reading document...");
            let data = fs::read(&input)?;

            pb.set_message("Converting...");
            let (document, diagnostics) = match format {
                OutputFormat::Docx => {
                    let conversion = converter.convert(&data)?;
                    pb.finish_and_clear();
                    report_diagnostics(&conversion.diagnostics);
                    check_strict(strict, &conversion.diagnostics)?;
                    conversion.save(&output)?;
                    (conversion.document, conversion.diagnostics)
                }
                OutputFormat::Markdown => {
                    let built = converter.build(&data)?;
                    let markdown =
                        xml2docx::render::to_markdown(&built.document, converter.options())?;
                    pb.finish_and_clear();
                    report_diagnostics(&built.diagnostics);
                    check_strict(strict, &built.diagnostics)?;
                    write_atomic(&output, markdown.as_bytes())?;
                    (built.document, built.diagnostics)
                }
            };

            if let Some(dump) = dump {
                let json = xml2docx::render::to_json(&document, JsonFormat::Pretty)?;
                write_atomic(&dump, json.as_bytes())?;
                println!("{} Wrote model dump: {}", "✓".green().bold(), dump.display());
            }

            println!(
                "{} Converted to {}: {}{}",
                "✓".green().bold(),
                format.extension(),
                output.display(),
                if diagnostics.is_empty() {
                    String::new()
                } else {
                    format!(" ({} warnings)", diagnostics.len())
                }
            );
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing document...");

            let data = fs::read(&input)?;
            let built = Converter::default().build(&data)?;
            let doc = &built.document;
            let meta = &doc.metadata;

            pb.finish_and_clear();

            println!("{}", "Document Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Vocabulary".bold(), doc.vocabulary);
            println!("{}: {}", "Title".bold(), meta.title);
            if let Some(ref name) = meta.doc_name {
                println!("{}: {}", "Docname".bold(), name);
            }
            if let Some(ref number) = meta.number {
                println!("{}: RFC {}", "Number".bold(), number);
            }
            if let Some(ref category) = meta.category {
                println!("{}: {}", "Category".bold(), category);
            }
            if !meta.authors.is_empty() {
                println!("{}: {}", "Authors".bold(), meta.creators());
            }
            if let Some(ref date) = meta.date {
                println!("{}: {}", "Date".bold(), date.display());
            }

            let stats = doc.statistics();
            let words = doc.plain_text().split_whitespace().count();
            println!("\n{}", "Content Statistics".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Headings".bold(), stats.headings);
            println!("{}: {}", "Paragraphs".bold(), stats.paragraphs);
            println!("{}: {}", "List items".bold(), stats.list_items);
            println!("{}: {}", "Figures".bold(), stats.figures);
            println!("{}: {}", "Tables".bold(), stats.tables);
            println!("{}: {}", "References".bold(), stats.references);
            println!("{}: {}", "Words".bold(), words);

            println!("\n{}", "Diagnostics".cyan().bold());
            println!("{}", "─".repeat(40));
            if built.diagnostics.is_empty() {
                println!("{} none", "✓".green().bold());
            }
            for diagnostic in &built.diagnostics {
                println!("{} {}", "!".yellow().bold(), diagnostic);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Write `data` to a temporary file next to `path`, then rename it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}: {}", "warning".yellow().bold(), diagnostic);
    }
}

fn check_strict(strict: bool, diagnostics: &[Diagnostic]) -> Result<(), Box<dyn std::error::Error>> {
    if strict && !diagnostics.is_empty() {
        return Err(format!(
            "{} diagnostics reported in strict mode; no output written",
            diagnostics.len()
        )
        .into());
    }
    Ok(())
}

fn print_version() {
    println!("{} {}", "xml2docx".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("xml2rfc to Office Open XML conversion");
    println!();
    println!("Input: xml2rfc v2 (RFC 7749) and v3 (RFC 7991)");
    println!("Output: .docx, kramdown-rfc Markdown");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "xml2docx", "-vv", "convert", "-i", "draft.xml", "--dump", "ir.json", "--store",
            "--strict", "--format", "markdown",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert {
                input,
                output,
                dump,
                format,
                store,
                strict,
            } => {
                assert_eq!(input, PathBuf::from("draft.xml"));
                assert!(output.is_none());
                assert_eq!(dump, Some(PathBuf::from("ir.json")));
                assert!(matches!(format, OutputFormat::Markdown));
                assert!(store && strict);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["xml2docx", "convert"]).is_err());
    }

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output(Path::new("drafts/draft-x-00.xml"), OutputFormat::Docx),
            PathBuf::from("drafts/draft-x-00.docx")
        );
        assert_eq!(
            default_output(Path::new("rfc.xml"), OutputFormat::Markdown),
            PathBuf::from("rfc.md")
        );
    }

    #[test]
    fn test_strict_rejects_diagnostics() {
        let diagnostics = vec![Diagnostic::unresolved_reference("nowhere")];
        assert!(check_strict(true, &diagnostics).is_err());
        assert!(check_strict(false, &diagnostics).is_ok());
        assert!(check_strict(true, &[]).is_ok());
    }

    #[test]
    fn test_write_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("draft.md");
        fs::write(&target, "old").unwrap();

        write_atomic(&target, b"# New\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "# New\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

        let missing = dir.path().join("no-such-dir").join("draft.md");
        assert!(write_atomic(&missing, b"x").is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_convert_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.xml");
        fs::write(
            &input,
            r#"<rfc><front><title>T</title><author fullname="A"/></front><middle/><back/></rfc>"#,
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "xml2docx",
            "convert",
            "-i",
            input.to_str().unwrap(),
            "--format",
            "markdown",
        ])
        .unwrap();
        run(cli).unwrap();
        let md = fs::read_to_string(dir.path().join("doc.md")).unwrap();
        assert!(md.contains("title: \"T\""));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_convert_writes_package() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.xml");
        fs::write(
            &input,
            r#"<rfc><front><title>T</title><author fullname="A"/></front><middle/><back/></rfc>"#,
        )
        .unwrap();
        let dump = dir.path().join("ir.json");
        let cli = Cli::try_parse_from([
            "xml2docx",
            "convert",
            "-i",
            input.to_str().unwrap(),
            "--dump",
            dump.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();
        assert!(dir.path().join("doc.docx").exists());
        assert!(fs::read_to_string(&dump).unwrap().contains("\"title\": \"T\""));
    }
}
