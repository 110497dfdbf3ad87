use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use dicom_deidentification::config::{Config, ConfigBuilder, RedactionScope, TracingLevel, UidRoot};
use dicom_deidentification::generator::{IdentifierGenerator, IdentifierKind};
use dicom_deidentification::identifiers::{Identifiers, ResolvedIdentifiers};
use dicom_deidentification::listing::list_tags;
use dicom_deidentification::{DeidentificationError, Deidentifier};
use dicom_object::file::ReadPreamble;
use dicom_object::OpenFileOptions;
use env_logger::Builder;
use log::{debug, info, warn, Level, LevelFilter};
use rayon::prelude::*;
use std::fmt;
use std::{
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// De-identify DICOM files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file ('-' for stdin) or directory
    #[arg(short, long, value_name = "INPUT_PATH", required_unless_present = "generate_id")]
    input: Option<PathBuf>,

    /// Output file ('-' for stdout) or directory
    #[arg(
        short,
        long,
        value_name = "OUTPUT_PATH",
        required_unless_present_any = ["generate_id", "list_tags"]
    )]
    output: Option<PathBuf>,

    /// UID root (default: '9999')
    #[arg(short, long)]
    uid_root: Option<String>,

    /// Recursively look for files in input directory
    #[arg(short, long)]
    recursive: bool,

    /// Continue when file found is not DICOM
    #[arg(short, long = "continue")]
    r#continue: bool,

    /// Show more verbose output (-v for a summary, -vv for every tag)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Also remove confidential elements from the items of sequences
    #[arg(long)]
    nested: bool,

    /// JSON configuration file, command line options take precedence
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Replacement Study Instance UID
    #[arg(long, value_name = "UID")]
    study_uid: Option<String>,

    /// Replacement Series Instance UID
    #[arg(long, value_name = "UID")]
    series_uid: Option<String>,

    /// Replacement SOP Instance UID (single file input only)
    #[arg(long, value_name = "UID")]
    sop_uid: Option<String>,

    /// Replacement Patient ID
    #[arg(long, value_name = "ID")]
    patient_id: Option<String>,

    /// List the tags of the input file instead of de-identifying it
    #[arg(long)]
    list_tags: bool,

    /// Print a newly generated identifier of the given kind (study, series, sop, patient)
    #[arg(long, value_name = "KIND")]
    generate_id: Option<IdentifierKind>,
}

struct DicomOutputFilePath {
    study_instance_uid: String,
    series_instance_uid: String,
    sop_instance_uid: String,
}

impl fmt::Display for DicomOutputFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}.dcm",
            self.study_instance_uid, self.series_instance_uid, self.sop_instance_uid
        )
    }
}

impl DicomOutputFilePath {
    fn to_path_buf(&self) -> PathBuf {
        format!("{}", self).into()
    }

    fn from_identifiers(identifiers: &ResolvedIdentifiers) -> Self {
        Self {
            study_instance_uid: identifiers.study_instance_uid.clone(),
            series_instance_uid: identifiers.series_instance_uid.clone(),
            sop_instance_uid: identifiers.sop_instance_uid.clone(),
        }
    }
}

fn open_input(input_path: &Path) -> Result<Box<dyn Read>> {
    if input_path == Path::new("-") {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(input_path).with_context(|| {
            format!("failed to open {}", input_path.display())
        })?))
    }
}

fn deidentify(deidentifier: &Deidentifier, input_path: &Path, output_path: &Path) -> Result<()> {
    let input_src = open_input(input_path)?;

    let result = deidentifier
        .deidentify(input_src)
        .with_context(|| format!("failed to de-identify {}", input_path.display()))?;

    for failure in result
        .report
        .dataset
        .failures
        .iter()
        .chain(&result.report.header.failures)
    {
        // the media storage SOP instance UID is overwritten instead of removed
        if failure.mandatory {
            debug!("{}: {} overwritten, not removed", input_path.display(), failure.tag);
        } else {
            info!(
                "{}: {} could not be removed: {}",
                input_path.display(),
                failure.tag,
                failure.message
            );
        }
    }

    let output_target: Box<dyn Write> = if output_path == Path::new("-") {
        Box::new(io::stdout().lock())
    } else {
        let output_file_path = if output_path.is_dir() {
            let file_path = DicomOutputFilePath::from_identifiers(&result.report.identifiers);
            output_path.join(file_path.to_path_buf())
        } else {
            output_path.to_path_buf()
        };

        // Create intermediate output file directories if they don't exist yet
        if let Some(parent_dir) = output_file_path.parent() {
            std::fs::create_dir_all(parent_dir)?;
        }

        Box::new(
            File::create(&output_file_path)
                .with_context(|| format!("failed to create {}", output_file_path.display()))?,
        )
    };

    result
        .write(output_target)
        .with_context(|| format!("failed to write de-identified {}", input_path.display()))?;

    Ok(())
}

fn print_tags(input_path: &Path) -> Result<()> {
    let obj = OpenFileOptions::new()
        .read_preamble(ReadPreamble::Always)
        .from_reader(open_input(input_path)?)
        .with_context(|| format!("failed to read {}", input_path.display()))?;

    let mut stdout = io::stdout().lock();
    for line in list_tags(obj.meta()).iter().chain(&list_tags(&*obj)) {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config_builder = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config = Config::from_json(&json)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            ConfigBuilder::from_config(config)
        }
        None => ConfigBuilder::new(),
    };

    // UID root
    if let Some(uid_root) = &args.uid_root {
        match uid_root.parse::<UidRoot>() {
            Ok(uid_root) => config_builder = config_builder.uid_root(uid_root),
            Err(e) => bail!(e),
        }
    }

    if args.nested {
        config_builder = config_builder.redaction_scope(RedactionScope::Nested);
    }

    if args.verbose > 0 {
        config_builder = config_builder.tracing_level(TracingLevel::from(args.verbose));
    }

    Ok(config_builder.build())
}

fn identifiers(args: &Args) -> Identifiers {
    let mut identifiers = Identifiers::new();
    identifiers.set(IdentifierKind::StudyInstanceUid, args.study_uid.clone());
    identifiers.set(IdentifierKind::SeriesInstanceUid, args.series_uid.clone());
    identifiers.set(IdentifierKind::SopInstanceUid, args.sop_uid.clone());
    identifiers.set(IdentifierKind::PatientId, args.patient_id.clone());
    identifiers
}

fn init_logging(tracing_level: TracingLevel) {
    let log_level = LevelFilter::from(tracing_level);

    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "Error",
                Level::Warn => "Warning",
                Level::Info => "Info",
                Level::Debug => "Debug",
                Level::Trace => "Trace",
            };
            writeln!(buf, "{}: {}", level, record.args())
        })
        .filter(None, log_level);
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // -v takes precedence over the configuration file
    let config = load_config(&args)?;
    init_logging(config.get_tracing_level());

    if let Some(kind) = args.generate_id {
        let generator = IdentifierGenerator::new(config.get_uid_root().clone());
        println!("{}", generator.generate(kind));
        return Ok(());
    }

    let Some(input_path) = args.input.as_deref() else {
        bail!("no input given");
    };

    if args.list_tags {
        if input_path.is_dir() {
            bail!("tags can only be listed for a single file or stdin ('-')");
        }
        return print_tags(input_path);
    }

    let Some(output_path) = args.output.as_deref() else {
        bail!("no output given");
    };
    let continue_on_read_error = args.r#continue;
    let deidentifier = Deidentifier::new(&config).with_identifiers(identifiers(&args));

    // Input is stdin or a file
    if input_path == Path::new("-") || input_path.is_file() {
        deidentify(&deidentifier, input_path, output_path)?;
        return Ok(());
    }

    // Input is a directory
    if input_path.is_dir() {
        if output_path == Path::new("-") || !output_path.is_dir() {
            bail!("output path should be an existing directory");
        }
        if args.sop_uid.is_some() {
            bail!("a replacement SOP Instance UID can only be given for a single file");
        }

        // instances of one study or series keep sharing their identifiers
        let deidentifier = deidentifier.with_mapping();

        let mut walk_dir = WalkDir::new(input_path);
        if !args.recursive {
            walk_dir = walk_dir.max_depth(1);
        }

        // Process files
        walk_dir
            .into_iter()
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let path_buf = entry.into_path();
                if path_buf.is_file() {
                    Some(path_buf)
                } else {
                    None
                }
            })
            .par_bridge() // convert to a parallel iterator
            .try_for_each(|path_buf| {
                let result = deidentify(&deidentifier, &path_buf, output_path);
                match result {
                    Err(e) if continue_on_read_error => {
                        if let Some(&DeidentificationError::ReadError(_)) =
                            e.downcast_ref::<DeidentificationError>()
                        {
                            warn!("{}", e);
                            return Ok(());
                        }
                        Err(e)
                    }
                    Err(e) => Err(e),
                    Ok(v) => Ok(v),
                }
            })?;

        return Ok(());
    }

    bail!("Input should either be a file, stdin ('-') or a directory");
}
