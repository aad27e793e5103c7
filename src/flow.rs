//! QuestaSim compile/elaborate/simulate flow driver.
//!
//! The five-step plan (vlib, vlog design, vlog tb, vopt, vsim) is built as
//! data and then fed step by step through the command runner. A failing step
//! stops the flow; a failed compile invalidates everything downstream, so
//! there is no partial-success path.

use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::Config;
use crate::error::FlowError;
use crate::runner::{self, BANNER};

#[derive(Debug, Clone)]
pub struct FlowOptions {
    /// Base name shared by design (`../<name>.sv`) and testbench
    /// (`../tb/<name>_tb.sv`).
    pub name: String,
    /// Enable VCD waveform dump during simulation.
    pub dump: bool,
    /// Work library name.
    pub work: String,
    /// Top-level module override; defaults to `<name>_tb`.
    pub top: Option<String>,
    /// Directory the flow runs in. Inputs, the work library and the log
    /// files all resolve against it.
    pub base_dir: PathBuf,
}

impl FlowOptions {
    fn top_module(&self) -> String {
        self.top
            .clone()
            .unwrap_or_else(|| format!("{}_tb", self.name))
    }
}

/// One planned external invocation. Log names are kept relative to the base
/// directory until execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub argv: Vec<String>,
    pub log: Option<String>,
}

pub fn run(cfg: &Config, opts: &FlowOptions) -> Result<()> {
    let design_rel = format!("../{}.sv", opts.name);
    let tb_rel = format!("../tb/{}_tb.sv", opts.name);

    // Pre-flight: both sources must exist before any tool is launched.
    let design_file = opts.base_dir.join(&design_rel);
    if !design_file.exists() {
        return Err(FlowError::MissingInputFile { path: design_file }.into());
    }
    let tb_file = opts.base_dir.join(&tb_rel);
    if !tb_file.exists() {
        return Err(FlowError::MissingInputFile { path: tb_file }.into());
    }

    println!("\n{BANNER}");
    println!("QuestaSim SystemVerilog Simulation Flow");
    println!("{BANNER}");
    println!("Design file:    {design_rel}");
    println!("Testbench file: {tb_rel}");
    println!("Top module:     {}", opts.top_module());
    println!("Work library:   {}", opts.work);
    println!("Dump enabled:   {}", opts.dump);

    let work_exists = opts.base_dir.join(&opts.work).exists();
    let plan = build_plan(cfg, opts, work_exists);
    for step in &plan {
        let log = step.log.as_ref().map(|name| opts.base_dir.join(name));
        runner::run_step(&step.argv, &step.label, log.as_deref(), &opts.base_dir)?;
    }

    println!("\n{BANNER}");
    println!("{}", "✓ All steps completed successfully!".green());
    println!("\nGenerated log files:");
    for step in &plan {
        if let Some(log) = &step.log {
            println!("  - {log}");
        }
    }
    if opts.dump {
        println!("\n✓ Waveform dump saved to: {}.vcd", opts.name);
    }
    println!("{BANNER}");
    Ok(())
}

fn build_plan(cfg: &Config, opts: &FlowOptions, work_exists: bool) -> Vec<Step> {
    let name = &opts.name;
    let work = &opts.work;
    let top = opts.top_module();
    let design_rel = format!("../{name}.sv");
    let tb_rel = format!("../tb/{name}_tb.sv");

    let mut plan = Vec::new();

    if !work_exists {
        plan.push(Step {
            label: "Creating work library".into(),
            argv: vec![cfg.tool("VLIB_BIN"), work.clone()],
            log: Some(format!("{name}_vlib.log")),
        });
    }

    plan.push(Step {
        label: format!("Compiling {design_rel}"),
        argv: vec![
            cfg.tool("VLOG_BIN"),
            "-sv".into(),
            "-work".into(),
            work.clone(),
            design_rel,
        ],
        log: Some(format!("{name}_compile_design.log")),
    });

    plan.push(Step {
        label: format!("Compiling {tb_rel}"),
        argv: vec![
            cfg.tool("VLOG_BIN"),
            "-sv".into(),
            "-work".into(),
            work.clone(),
            tb_rel,
        ],
        log: Some(format!("{name}_compile_tb.log")),
    });

    plan.push(Step {
        label: format!("Elaborating {top}"),
        argv: vec![
            cfg.tool("VOPT_BIN"),
            "+acc".into(),
            "-work".into(),
            work.clone(),
            top.clone(),
            "-o".into(),
            format!("{top}_opt"),
        ],
        log: Some(format!("{name}_elaborate.log")),
    });

    plan.push(Step {
        label: "Running simulation".into(),
        argv: vec![
            cfg.tool("VSIM_BIN"),
            "-c".into(),
            "-work".into(),
            work.clone(),
            format!("{top}_opt"),
            "-do".into(),
            sim_directives(name, opts.dump),
        ],
        log: Some(format!("{name}_simulate.log")),
    });

    plan
}

/// Inline `-do` script for vsim. With dump enabled the VCD directives come
/// before the mandatory run-to-completion and quit.
fn sim_directives(name: &str, dump: bool) -> String {
    let mut directives = Vec::new();
    if dump {
        directives.push(format!("vcd file {name}.vcd"));
        directives.push("vcd add -r /*".to_string());
        directives.push("vcd on".to_string());
    }
    directives.push("run -all".to_string());
    directives.push("quit -f".to_string());
    directives.join("; ")
}
