use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use walkdir::WalkDir;

use xmldocmd::preprocess;
use xmldocmd::{
    parse_document, ConvertOptions, MarkdownRenderer, MetadataTable, OpenResolver,
    PresentationMode, Settings, TracingWarnings, TypeResolver, UnexpectedTagAction, FOOTER,
};

/// Where the XML comes from and where the Markdown goes.
enum Source {
    File(PathBuf),
    Stdin,
}

enum Sink {
    File(PathBuf),
    Stdout,
}

struct Run {
    options: ConvertOptions,
    settings: Settings,
    secondary_dir: Option<PathBuf>,
}

fn cli() -> Command {
    Command::new("xmldocmd")
        .about("Convert XML API documentation to Markdown")
        .arg(
            Arg::new("inputfile")
                .short('i')
                .long("inputfile")
                .help("Input XML documentation file"),
        )
        .arg(
            Arg::new("cin")
                .long("cin")
                .help("Read the input XML from stdin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("outputfile")
                .short('o')
                .long("outputfile")
                .help("Output Markdown file, or output directory in search mode"),
        )
        .arg(
            Arg::new("cout")
                .long("cout")
                .help("Write the Markdown to stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("secondaryDir")
                .short('l')
                .long("secondaryDir")
                .help("Also copy each result to <DIR>/docs/"),
        )
        .arg(
            Arg::new("unexpected")
                .short('u')
                .long("unexpected")
                .help("What to do with unknown tags")
                .value_parser(["accept", "warn", "error"])
                .default_value("error")
                .ignore_case(true),
        )
        .arg(
            Arg::new("search")
                .short('s')
                .long("search")
                .help("Search this directory for build output directories"),
        )
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .help("Name of the build output directories to search for")
                .default_value("Release"),
        )
        .arg(
            Arg::new("git")
                .short('g')
                .long("git")
                .help("Link to anchors on a single page instead of per-assembly pages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("readme")
                .short('r')
                .long("readme")
                .help("Name the output README.md")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("settings")
                .short('f')
                .long("settings")
                .help("Settings file")
                .default_value("settings.json"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("xmldocmd=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xmldocmd=info"))
    };

    // stdout may carry the Markdown itself
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn main() -> Result<()> {
    let mut command = cli();
    if std::env::args_os().len() <= 1 {
        command.print_help()?;
        println!();
        return Ok(());
    }

    let matches = command.get_matches();
    init_logging(matches.get_flag("verbose"));

    let start = Instant::now();
    let result = run(&matches);
    info!("Total time: {:.2?}", start.elapsed());
    result
}

fn run(matches: &ArgMatches) -> Result<()> {
    let settings_path = matches
        .get_one::<String>("settings")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));

    let unexpected_tags = matches
        .get_one::<String>("unexpected")
        .map(|value| value.parse::<UnexpectedTagAction>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();

    let mode = if matches.get_flag("git") {
        PresentationMode::SinglePage
    } else {
        PresentationMode::SameSite
    };

    let run = Run {
        options: ConvertOptions {
            unexpected_tags,
            mode,
        },
        settings: Settings::load_or_create(&settings_path),
        secondary_dir: matches.get_one::<String>("secondaryDir").map(PathBuf::from),
    };

    let output = matches.get_one::<String>("outputfile").map(PathBuf::from);
    let readme = matches.get_flag("readme");

    if let Some(search) = matches.get_one::<String>("search") {
        let Some(output_dir) = output else {
            bail!("--search needs an output directory (-o)");
        };
        let directory = matches
            .get_one::<String>("directory")
            .map(String::as_str)
            .unwrap_or("Release");
        return convert_search(&run, Path::new(search), directory, &output_dir, readme);
    }

    let source = if matches.get_flag("cin") {
        Source::Stdin
    } else if let Some(input) = matches.get_one::<String>("inputfile") {
        Source::File(PathBuf::from(input))
    } else {
        bail!("no input: pass --inputfile, --cin or --search");
    };

    let sink = if matches.get_flag("cout") {
        Sink::Stdout
    } else if let Some(output) = output {
        Sink::File(output)
    } else {
        bail!("no output: pass --outputfile or --cout");
    };

    convert(&run, &source, &sink)
}

/// Convert every XML file found in directories named `directory` below
/// `search`.
fn convert_search(
    run: &Run,
    search: &Path,
    directory: &str,
    output_dir: &Path,
    readme: bool,
) -> Result<()> {
    if !search.is_dir() {
        bail!("search directory \"{}\" does not exist", search.display());
    }
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    info!(
        "Searching \"{}\" for \"{}\" directories, writing to \"{}\"",
        search.display(),
        directory,
        output_dir.display()
    );

    let build_dirs = WalkDir::new(search)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir() && entry.file_name() == directory);

    let mut files = BTreeSet::new();
    for build_dir in build_dirs {
        for entry in WalkDir::new(build_dir.path()).into_iter().filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "xml") {
                files.insert(path.to_path_buf());
            }
        }
    }

    for file in files {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        if run.settings.ignores(&file_name) {
            debug!(file = %file.display(), "ignored by settings");
            continue;
        }

        let output = if readme {
            output_dir.join("README.md")
        } else {
            output_dir.join(file.with_extension("md").file_name().unwrap_or_default())
        };

        info!("Converting {} to {}", file.display(), output.display());
        convert(run, &Source::File(file), &Sink::File(output))?;
    }

    info!("Conversion to Markdown done");
    Ok(())
}

fn convert(run: &Run, source: &Source, sink: &Sink) -> Result<()> {
    let xml = match source {
        Source::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        Source::Stdin => {
            let mut xml = String::new();
            io::stdin().read_to_string(&mut xml)?;
            xml
        }
    };

    let mut document = parse_document(&xml).context("failed to parse documentation XML")?;
    preprocess::prepare(&mut document, &run.settings.namespaces_to_remove);

    let table = match source {
        Source::File(path) => load_metadata(path),
        Source::Stdin => None,
    };
    let resolver: &dyn TypeResolver = match &table {
        Some(table) => table,
        None => &OpenResolver,
    };

    let renderer = MarkdownRenderer::new(run.options, resolver, &TracingWarnings);
    let mut markdown = renderer.render(&document)?;
    markdown.push_str(FOOTER);

    match sink {
        Sink::Stdout => {
            io::stdout().write_all(markdown.as_bytes())?;
        }
        Sink::File(path) => {
            fs::write(path, &markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if let Some(dir) = &run.secondary_dir {
                copy_to_secondary(path, dir);
            }
        }
    }

    Ok(())
}

// The metadata sidecar is optional; without it every member is public and
// types are unresolved.
fn load_metadata(xml_path: &Path) -> Option<MetadataTable> {
    let sidecar = MetadataTable::sidecar_path(xml_path);
    if !sidecar.exists() {
        debug!(path = %sidecar.display(), "no metadata sidecar");
        return None;
    }

    match MetadataTable::load(&sidecar) {
        Ok(table) => {
            debug!(path = %sidecar.display(), assembly = table.assembly().unwrap_or("?"), "loaded metadata");
            Some(table)
        }
        Err(e) => {
            warn!(path = %sidecar.display(), error = %e, "failed to load metadata, continuing without");
            None
        }
    }
}

fn copy_to_secondary(output: &Path, dir: &Path) {
    let Some(file_name) = output.file_name() else {
        return;
    };
    let docs = dir.join("docs");
    let target = docs.join(file_name);

    let copied = fs::create_dir_all(&docs).and_then(|_| fs::copy(output, &target));
    if let Err(e) = copied {
        warn!(target = %target.display(), error = %e, "failed to copy to secondary output directory");
    }
}
