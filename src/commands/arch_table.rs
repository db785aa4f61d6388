use std::path::PathBuf;

use clap::{Args, ValueEnum};

use konfluxctl::arch_table::{self, ArchTableConfig, TableFormat};
use konfluxctl::log_status;
use konfluxctl::utils::io;

#[derive(Args)]
pub struct ArchTableArgs {
    /// Repository root containing pipelineruns/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
    format: FormatArg,

    /// Write the table to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// TOML configuration file with exceptions and accelerator rules
    #[arg(long, default_value = "exceptions.toml")]
    config: PathBuf,

    /// Read PipelineRun files from this git branch instead of the
    /// working tree (no checkout needed)
    #[arg(long)]
    branch: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Markdown,
    Csv,
    Text,
    Jira,
}

impl FormatArg {
    fn as_table_format(self) -> TableFormat {
        match self {
            FormatArg::Markdown => TableFormat::Markdown,
            FormatArg::Csv => TableFormat::Csv,
            FormatArg::Text => TableFormat::Text,
            FormatArg::Jira => TableFormat::Jira,
        }
    }
}

pub fn run_raw(args: ArchTableArgs) -> konfluxctl::Result<(String, i32)> {
    let config = ArchTableConfig::load(&args.config)?;

    let components = match args.branch.as_deref() {
        Some(branch) => arch_table::collect_components_from_branch(&args.base_dir, branch)?,
        None => arch_table::collect_components(&args.base_dir)?,
    };

    let table = arch_table::generate(&components, &config, args.format.as_table_format());

    match &args.output {
        Some(path) => {
            io::write_file(path, &format!("{}\n", table), "write table")?;
            log_status!("arch-table", "Table written to {}", path.display());
            Ok((String::new(), 0))
        }
        None => Ok((format!("{}\n", table), 0)),
    }
}
