//! Release-document assembly: pandoc converts Markdown sections to PDF,
//! pdfunite merges them in document order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::Config;
use crate::error::FlowError;
use crate::runner;

/// Section files in release-document order. The merge is order-based, not
/// name-based.
pub const SECTIONS: &[&str] = &[
    "tittle",
    "index",
    "lof",
    "lot",
    "release_note",
    "usb_2p0_phy_layer",
    "parameters",
    "enums",
    "defines",
    "features",
    "limitations",
    "file_structure",
    "registers",
    "line_det_line_drv",
    "possible_testcases",
];

/// Convert one section, or every section when `target` is `all`.
pub fn md2pdf(cfg: &Config, doc_dir: &Path, target: &str) -> Result<()> {
    if target == "all" {
        for section in SECTIONS {
            convert(cfg, doc_dir, section)?;
        }
        Ok(())
    } else {
        convert(cfg, doc_dir, target)
    }
}

fn convert(cfg: &Config, doc_dir: &Path, section: &str) -> Result<()> {
    let md = doc_dir.join(format!("{section}.md"));
    if !md.exists() {
        return Err(FlowError::MissingInputFile { path: md }.into());
    }
    let argv = pandoc_argv(cfg, doc_dir, section);
    runner::run_step(
        &argv,
        &format!("Converting {section}.md"),
        None,
        Path::new("."),
    )?;
    Ok(())
}

fn pandoc_argv(cfg: &Config, doc_dir: &Path, section: &str) -> Vec<String> {
    vec![
        cfg.tool("PANDOC_BIN"),
        doc_dir.join(format!("{section}.md")).display().to_string(),
        "-o".into(),
        doc_dir.join(format!("{section}.pdf")).display().to_string(),
        format!("--pdf-engine={}", cfg.tool("PDF_ENGINE")),
    ]
}

/// Merge every section PDF into `<out_dir>/<out_name>.pdf`.
pub fn merge(cfg: &Config, doc_dir: &Path, out_dir: &Path, out_name: &str) -> Result<()> {
    // Pre-flight: every section PDF must exist before pdfunite runs.
    for section in SECTIONS {
        let pdf = doc_dir.join(format!("{section}.pdf"));
        if !pdf.exists() {
            return Err(FlowError::MissingInputFile { path: pdf }.into());
        }
    }
    let argv = merge_argv(cfg, doc_dir, out_dir, out_name);
    runner::run_step(&argv, "Merging section PDFs", None, Path::new("."))?;
    Ok(())
}

fn merge_argv(cfg: &Config, doc_dir: &Path, out_dir: &Path, out_name: &str) -> Vec<String> {
    let mut argv = vec![cfg.tool("PDFUNITE_BIN")];
    for section in SECTIONS {
        argv.push(doc_dir.join(format!("{section}.pdf")).display().to_string());
    }
    argv.push(out_dir.join(format!("{out_name}.pdf")).display().to_string());
    argv
}

/// Full release: convert all sections, merge, then delete the intermediate
/// section PDFs. The merged document survives; a failed deletion is reported
/// but does not fail the release.
pub fn release(cfg: &Config, doc_dir: &Path, out_dir: &Path, out_name: &str) -> Result<()> {
    md2pdf(cfg, doc_dir, "all")?;
    merge(cfg, doc_dir, out_dir, out_name)?;
    cleanup_pdfs(doc_dir);
    println!(
        "{} Release document written to {}",
        "✓".green(),
        out_dir.join(format!("{out_name}.pdf")).display()
    );
    Ok(())
}

fn cleanup_pdfs(doc_dir: &Path) {
    let entries = match fs::read_dir(doc_dir) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Error reading {}: {err}", doc_dir.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path: PathBuf = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf || !path.is_file() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => println!("Deleted: {}", path.display()),
            Err(err) => eprintln!("Error deleting {}: {err}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_argv_preserves_document_order() {
        let cfg = Config::from_pairs(&[]);
        let argv = merge_argv(&cfg, Path::new("doc/impl"), Path::new("doc"), "specs_v0p1");
        assert_eq!(argv[0], "pdfunite");
        assert_eq!(argv.len(), SECTIONS.len() + 2);
        // First input is the title page, last input the testcase list.
        assert!(argv[1].ends_with("tittle.pdf"));
        assert!(argv[SECTIONS.len()].ends_with("possible_testcases.pdf"));
        assert!(argv.last().unwrap().ends_with("specs_v0p1.pdf"));
    }

    #[test]
    fn pandoc_argv_names_engine_and_output() {
        let cfg = Config::from_pairs(&[]);
        let argv = pandoc_argv(&cfg, Path::new("doc/impl"), "registers");
        assert_eq!(argv[0], "pandoc");
        assert!(argv[1].ends_with("registers.md"));
        assert_eq!(argv[2], "-o");
        assert!(argv[3].ends_with("registers.pdf"));
        assert_eq!(argv[4], "--pdf-engine=wkhtmltopdf");
    }

    #[test]
    fn md2pdf_rejects_missing_section() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::from_pairs(&[]);
        let err = md2pdf(&cfg, dir.path(), "no_such_section").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FlowError>(),
            Some(FlowError::MissingInputFile { .. })
        ));
    }

    #[test]
    fn merge_requires_every_section_pdf() {
        let dir = tempfile::tempdir().unwrap();
        // All but one section present.
        for section in &SECTIONS[1..] {
            std::fs::write(dir.path().join(format!("{section}.pdf")), b"%PDF-1.4").unwrap();
        }
        let cfg = Config::from_pairs(&[]);
        let err = merge(&cfg, dir.path(), dir.path(), "out").unwrap_err();
        match err.downcast_ref::<FlowError>() {
            Some(FlowError::MissingInputFile { path }) => {
                assert!(path.ends_with("tittle.pdf"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn release_deletes_intermediate_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        let doc_dir = dir.path().join("impl");
        let out_dir = dir.path().to_path_buf();
        std::fs::create_dir(&doc_dir).unwrap();
        for section in SECTIONS {
            std::fs::write(doc_dir.join(format!("{section}.md")), "# section\n").unwrap();
            // Stub tools do not produce output, so pre-create the PDFs the
            // merge pre-flight expects.
            std::fs::write(doc_dir.join(format!("{section}.pdf")), b"%PDF-1.4").unwrap();
        }
        let cfg = Config::from_pairs(&[
            ("PANDOC_BIN", "/bin/true"),
            ("PDFUNITE_BIN", "/bin/true"),
        ]);

        release(&cfg, &doc_dir, &out_dir, "specs_r0p1").unwrap();
        for section in SECTIONS {
            assert!(!doc_dir.join(format!("{section}.pdf")).exists());
        }
        // Markdown sources are untouched.
        assert!(doc_dir.join("tittle.md").exists());
    }
}
