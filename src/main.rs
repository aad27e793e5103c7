mod cli;
mod config;
mod doc;
mod error;
mod flow;
mod runner;

use std::process::exit;

use anyhow::Result;
use owo_colors::OwoColorize;

use cli::Commands;
use config::Config;

fn main() {
    // Single top-level exit point: every failure below propagates here as a
    // typed error and maps to exit code 1.
    if let Err(err) = run() {
        eprintln!("{} {err}", "error:".red().bold());
        exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::Cli::parse();
    let cfg = Config::load();

    match args.command {
        Commands::Sim(a) => flow::run(
            &cfg,
            &flow::FlowOptions {
                name: a.name,
                dump: a.dump,
                work: a.work,
                top: a.top,
                base_dir: a.base_dir,
            },
        ),
        Commands::Md2pdf(a) => doc::md2pdf(&cfg, &a.doc_dir, &a.target),
        Commands::Merge(a) => doc::merge(&cfg, &a.doc_dir, &a.out_dir, &a.out),
        Commands::Release(a) => doc::release(&cfg, &a.doc_dir, &a.out_dir, &a.out),
    }
}
