use case_film::picker::{ModelPicker, NoPrompt, PromptPicker};
use case_film::{catalog, config, detect, output, process, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "case-film")]
#[command(about = "Turn customer artwork into print-ready phone-case films")]
#[command(long_about = "\
Turn customer artwork into print-ready phone-case films

Each file name carries the order number and the device:

  3_iphone15pro.png      → 3_iPhone15Pro.png
  07-IP16PROMAX.jpg      → 07_iPhone16ProMax.png
  5b-x.png               → 5b_iPhoneX.png

Every film is a transparent 14.8 × 25.5 cm sheet at 300 dpi with the artwork
mirrored, scaled to the case width (+0.3 cm) and centered, plus the order
and model in small gray type at the top left.

Pass one folder to process it recursively into '<folder> (PRINT MODE)', or
a list of files to write into 'PRINT_MODE_OUTPUT' next to the first one.
When the model cannot be detected you are asked to pick one.

Run 'case-film gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file with physical constants (defaults apply without one)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device catalog TOML replacing the builtin table
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert artwork files into print films
    Process {
        /// One folder, or one or more image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Put the output folder here instead of next to the inputs
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip files whose model cannot be detected instead of asking
        #[arg(long)]
        no_prompt: bool,

        /// Write a JSON report of the run
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show how file names resolve, without reading any file
    Detect {
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// List the device catalog
    Models,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn load_catalog(path: Option<&Path>) -> Result<catalog::Catalog, catalog::CatalogError> {
    match path {
        Some(path) => catalog::Catalog::load(path),
        None => Ok(catalog::Catalog::builtin()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            inputs,
            output: custom_output,
            no_prompt,
            report,
        } => {
            let film_config = config::load_config(cli.config.as_deref())?;
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let batch = scan::plan(&inputs, custom_output.as_deref(), &film_config.output)?;

            if batch.inputs.is_empty() {
                println!("No image files found.");
                return Ok(());
            }

            let mut picker: Box<dyn ModelPicker> = if no_prompt {
                Box::new(NoPrompt)
            } else {
                Box::new(PromptPicker::stdio())
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process_batch(
                &batch,
                &catalog,
                &film_config,
                picker.as_mut(),
                Some(tx),
            );
            printer.join().map_err(|_| "output thread panicked")?;
            let result = result?;

            println!();
            output::print_batch_summary(&result);
            if let Some(path) = report {
                process::write_report(&result, &path)?;
                println!("Report: {}", path.display());
            }
        }
        Command::Detect { filenames } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            for filename in &filenames {
                println!(
                    "{}",
                    output::format_resolution(&detect::resolve(filename), &catalog)
                );
            }
        }
        Command::Models => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            for line in output::format_models(&catalog) {
                println!("{}", line);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
