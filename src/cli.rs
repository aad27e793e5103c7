use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hdlflow",
    about = "Fail-fast sequencer for QuestaSim simulation flows and release-doc assembly",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile, elaborate and simulate SystemVerilog files using QuestaSim.
    Sim(SimArgs),
    /// Convert release-document Markdown sections to PDF using pandoc.
    Md2pdf(Md2PdfArgs),
    /// Merge section PDFs into a single release document (order-based).
    Merge(MergeArgs),
    /// Full release: convert all sections, merge, delete intermediate PDFs.
    Release(ReleaseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// Base name for design file (will look for ../<name>.sv and ../tb/<name>_tb.sv).
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Enable VCD/waveform dump during simulation.
    #[arg(long)]
    pub dump: bool,

    /// Work library name.
    #[arg(long, default_value = "work")]
    pub work: String,

    /// Top-level module name for simulation (default: <name>_tb).
    #[arg(long)]
    pub top: Option<String>,

    /// Directory the flow runs in; inputs and logs resolve against it.
    #[arg(long = "base-dir", default_value = ".")]
    pub base_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct Md2PdfArgs {
    /// Section name to convert, or "all" for the full release set.
    #[arg(value_name = "SECTION")]
    pub target: String,

    /// Directory holding the section Markdown files.
    #[arg(long = "doc-dir", default_value = "../../doc/impl")]
    pub doc_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Output document name (without .pdf extension).
    #[arg(value_name = "OUT_NAME")]
    pub out: String,

    /// Directory holding the section PDFs.
    #[arg(long = "doc-dir", default_value = "../../doc/impl")]
    pub doc_dir: PathBuf,

    /// Directory the merged document is written to.
    #[arg(long = "out-dir", default_value = "../../doc")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Release document name (without .pdf extension).
    #[arg(value_name = "OUT_NAME")]
    pub out: String,

    /// Directory holding the section Markdown files.
    #[arg(long = "doc-dir", default_value = "../../doc/impl")]
    pub doc_dir: PathBuf,

    /// Directory the merged document is written to.
    #[arg(long = "out-dir", default_value = "../../doc")]
    pub out_dir: PathBuf,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
