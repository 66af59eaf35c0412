use asm24::{assemble_file, Options};
use color_print::cprintln;
use log::LevelFilter;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source files, given without the `.as` extension
    #[clap(required = true)]
    files: Vec<String>,

    /// Dump the assembled image next to the source
    #[clap(short, long)]
    dump: bool,

    /// Log every stage
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    use clap::Parser;

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(level)
        .without_timestamps()
        .init()
    {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let opts = Options { dump: args.dump };
    for base in &args.files {
        match assemble_file(base, &opts) {
            Ok(true) => cprintln!("<green,bold>ok</>: {}", base),
            Ok(false) => cprintln!("<red,bold>failed</>: {}", base),
            Err(e) => cprintln!("<red,bold>error</>: {}", e),
        }
    }
}
