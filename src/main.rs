//! oficio CLI - render official correspondence to PDF or a preview

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use oficio::{
    export_file_name, render_pdf, render_preview, DocError, DocumentRecord, DocumentType,
    FontFiles, Image, PdfExporter, RenderStamp, Settings,
};

#[derive(Parser)]
#[command(name = "oficio")]
#[command(version)]
#[command(about = "Lay out and paginate official ministry correspondence", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document record (JSON) to an A4 PDF
    Render {
        /// Document record file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document type to use when the record has none
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        document_type: Option<String>,

        /// Output directory; the file is named after the document number
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Layout settings (JSON)
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Directory holding serif.ttf, serif-bold.ttf, sans.ttf and sans-bold.ttf
        #[arg(long, value_name = "DIR")]
        font_dir: Option<PathBuf>,

        /// Letterhead image
        #[arg(long, value_name = "FILE")]
        logo: Option<PathBuf>,

        /// Seed for the authentication mark
        #[arg(long)]
        seed: Option<u64>,

        /// Also write a preview next to the PDF
        #[arg(long, value_enum)]
        preview: Option<PreviewFormat>,
    },

    /// Print a reflowable preview of a document record
    Preview {
        /// Document record file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document type to use when the record has none
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        document_type: Option<String>,

        /// Preview format
        #[arg(long, value_enum, default_value = "text")]
        format: PreviewFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Layout settings (JSON)
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PreviewFormat {
    Html,
    Text,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings, DocError> {
    match path {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

fn load_record(
    input: &Path,
    document_type: Option<String>,
    settings: &Settings,
) -> Result<DocumentRecord, DocError> {
    let json = std::fs::read_to_string(input)?;
    let requested = document_type
        .map(|t| t.parse::<DocumentType>())
        .transpose()?;
    DocumentRecord::from_provider_json(&json, requested, &settings.constants)
}

fn run(command: Commands) -> Result<(), DocError> {
    match command {
        Commands::Render {
            input,
            document_type,
            out_dir,
            settings,
            font_dir,
            logo,
            seed,
            preview,
        } => {
            let settings = load_settings(settings)?;
            let record = load_record(&input, document_type, &settings)?;

            let mut exporter = match font_dir {
                Some(dir) => PdfExporter::with_embedded_fonts(FontFiles::from_dir(dir)?)?,
                None => PdfExporter::with_standard_fonts(),
            };
            if let Some(logo) = logo {
                exporter.set_logo(Image::from_path(logo)?);
            }

            let mut stamp = RenderStamp::now();
            if let Some(seed) = seed {
                stamp = stamp.with_seed(seed);
            }

            let bytes = render_pdf(&record, &settings, exporter, stamp)?;
            std::fs::create_dir_all(&out_dir)?;
            let path = out_dir.join(export_file_name(record.document_number()));
            std::fs::write(&path, bytes)?;
            println!("{}", path.display());

            if let Some(format) = preview {
                let rendered = render_preview(&record, &settings, stamp)?;
                let (text, extension) = match format {
                    PreviewFormat::Html => (rendered.to_html(), "html"),
                    PreviewFormat::Text => (rendered.to_string(), "txt"),
                };
                let preview_path = path.with_extension(extension);
                std::fs::write(&preview_path, text)?;
                println!("{}", preview_path.display());
            }
        }
        Commands::Preview {
            input,
            document_type,
            format,
            output,
            settings,
        } => {
            let settings = load_settings(settings)?;
            let record = load_record(&input, document_type, &settings)?;
            let preview = render_preview(&record, &settings, RenderStamp::now())?;
            let rendered = match format {
                PreviewFormat::Html => preview.to_html(),
                PreviewFormat::Text => preview.to_string(),
            };
            match output {
                Some(path) => std::fs::write(path, rendered)?,
                None => print!("{rendered}"),
            }
        }
    }
    Ok(())
}
