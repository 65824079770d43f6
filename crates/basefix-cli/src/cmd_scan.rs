use crate::ScanArgs;
use anyhow::{Context, Result};
use basefix::{CompletedRecord, PathResolver, ScanConfig};

pub fn run(scan: ScanArgs, json: bool, pretty: bool) -> Result<()> {
    let resolver = PathResolver::new()
        .with_anchor(scan.anchor.as_str())
        .context("Invalid --anchor")?;
    let config = ScanConfig::new()
        .with_resolver(resolver)
        .with_stale_policy(scan.stale_policy());

    let text = match basefix::read_log(&scan.log) {
        Ok(text) => text,
        Err(basefix::FixError::LogNotFound(path)) => {
            eprintln!("Log file not found: {}", path.display());
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", scan.log)),
    };

    let records: Vec<CompletedRecord> = basefix::scan(&text, &config).collect();
    println!("{}", render(&records, json, pretty)?);
    Ok(())
}

fn render(records: &[CompletedRecord], json: bool, pretty: bool) -> Result<String> {
    if json {
        let out = if pretty {
            serde_json::to_string_pretty(records)
        } else {
            serde_json::to_string(records)
        };
        return out.context("Failed to serialize records");
    }

    if records.is_empty() {
        return Ok("No complete records found.".to_string());
    }
    let mut lines: Vec<String> = records
        .iter()
        .map(|r| format!("{}: {} | {} -> {}", r.line, r.fixture_path, r.expected, r.actual))
        .collect();
    lines.push(format!("{} record(s)", records.len()));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CompletedRecord> {
        let log = "curBaseFile:\nfile:///w/test/a.cj\ninBase={1}\nresult={2}\n";
        basefix::scan(log, &ScanConfig::default()).collect()
    }

    #[test]
    fn test_render_text() {
        let out = render(&sample(), false, false).unwrap();
        assert_eq!(out, "4: ./a.cj | inBase={1} -> {2}\n1 record(s)");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render(&[], false, false).unwrap(),
            "No complete records found."
        );
        assert_eq!(render(&[], true, false).unwrap(), "[]");
    }

    #[test]
    fn test_render_json() {
        let out = render(&sample(), true, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["fixture_path"], "./a.cj");
        assert_eq!(value[0]["line"], 4);
    }

    #[test]
    fn test_run_with_temp_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let log = temp.path().join("build_log.txt");
        std::fs::write(&log, "curBaseFile:\nfile:///w/test/a.cj\ninBase={1}\nresult={2}\n")
            .unwrap();
        let args = ScanArgs {
            log,
            anchor: "test".into(),
            reset_on_new_path: true,
        };
        assert!(run(args, false, false).is_ok());
    }
}
