//! Reading benchmark reports from disk.

use crate::error::{ReportError, Result};
use crate::schema::BenchmarkReport;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub fn parse_report(text: &str) -> Result<BenchmarkReport> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_report(path: &Path) -> Result<BenchmarkReport> {
    info!(path = %path.display(), "loading benchmark report");
    let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_report(&text)?;
    info!(
        path = %path.display(),
        families = report.fixture_families.len(),
        "benchmark report loaded"
    );
    Ok(report)
}

/// Expands inputs into report files: files are taken as given, directories are
/// walked for `*.json` files in path order. A file reached more than once is kept
/// at its first position only.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for root in inputs {
        if root.is_file() {
            out.push(root.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| ReportError::Io {
                path: e.path().unwrap_or(root.as_path()).to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                found.push(path.to_path_buf());
            }
        }
        found.sort();
        debug!(root = %root.display(), reports = found.len(), "collected report files");
        out.extend(found);
    }

    let mut seen = HashSet::new();
    out.retain(|path| seen.insert(fs::canonicalize(path).unwrap_or_else(|_| path.clone())));

    if out.is_empty() {
        return Err(ReportError::NoInputs);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"{
        "baseInfo": {"time": "2018-06-01T10:00:00Z"},
        "deviceList": {},
        "fixtureFamilies": []
    }"#;

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(
            parse_report("{not json"),
            Err(ReportError::Parse { .. })
        ));
        // Missing required top-level field.
        assert!(matches!(
            parse_report(r#"{"baseInfo": {"time": 1}}"#),
            Err(ReportError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_report_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        fs::write(&path, MINIMAL).unwrap();

        let report = load_report(&path).unwrap();
        assert!(report.fixture_families.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_report(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_collect_inputs_walks_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.json"), MINIMAL).unwrap();
        fs::write(nested.join("a.json"), MINIMAL).unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();

        let single = dir.path().join("b.json");
        let files = collect_inputs(&[single.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, [single, nested.join("a.json")]);
    }

    #[test]
    fn test_collect_inputs_same_file_through_other_path() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("a.json"), MINIMAL).unwrap();

        let indirect = nested.join("..").join("nested").join("a.json");
        let files = collect_inputs(&[indirect.clone(), nested.clone(), nested]).unwrap();
        assert_eq!(files, [indirect]);
    }

    #[test]
    fn test_collect_inputs_empty() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            collect_inputs(&[dir.path().to_path_buf()]),
            Err(ReportError::NoInputs)
        ));
    }
}
