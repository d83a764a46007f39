use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use crforge_model::{dataset::Record, scenario::Scenario};
use serde_json::Value;

/// Write `value` as pretty JSON to `output_path`, or to stdout when it is `None`
///
/// # Errors
///
/// Returns error if the file cannot be created or written
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let (mut writer, destination): (Box<dyn Write>, String) = match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {destination}"))?;
    writeln!(writer)
        .with_context(|| format!("Failed to write newline after JSON to {destination}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {destination}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read monsters from a JSON file holding one stat object or an array of them
///
/// # Errors
///
/// Returns error if the file cannot be parsed or a stat is not a number
pub fn read_monster_file<P>(path: P) -> anyhow::Result<Vec<Record>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let value: Value = read_json_file("monster", path)?;
    Record::list_from_json(&value)
        .with_context(|| format!("Invalid monster in {}", path.display()))
}

/// Read scenarios from a JSON file holding one scenario or an array of them
///
/// # Errors
///
/// Returns error if the file cannot be parsed as scenarios
pub fn read_scenario_file<P>(path: P) -> anyhow::Result<Vec<Scenario>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let value: Value = read_json_file("scenario", path)?;
    let scenarios = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|scenario| vec![scenario])
    };
    scenarios.with_context(|| format!("Invalid scenario in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_monster_file() {
        let single = write_json(r#"{ "name": "Imp", "hit_points": 10, "wisdom_save": null }"#);
        let monsters = read_monster_file(single.path()).unwrap();
        assert_eq!(monsters.len(), 1);
        assert_eq!(monsters[0].name.as_deref(), Some("Imp"));
        assert!(!monsters[0].stats.contains("wisdom_save"));

        let many = write_json(r#"[{ "hit_points": 10 }, { "hit_points": 20 }]"#);
        assert_eq!(read_monster_file(many.path()).unwrap().len(), 2);

        let bad = write_json(r#"{ "hit_points": "ten" }"#);
        assert!(read_monster_file(bad.path()).is_err());
    }

    #[test]
    fn test_save_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimates.json");
        let estimates = serde_json::json!([{ "name": "Imp", "estimate": 1.5 }]);
        save_json(&estimates, Some(path.as_path())).unwrap();
        let written: Value = read_json_file("estimates", &path).unwrap();
        assert_eq!(written[0]["name"], "Imp");
        assert_eq!(written[0]["estimate"], 1.5);

        let missing_dir = dir.path().join("missing").join("out.json");
        assert!(save_json(&1, Some(missing_dir.as_path())).is_err());
    }

    #[test]
    fn test_read_scenario_file() {
        let single = write_json(r#"{ "name": "s", "baseline": { "hit_points": 10 } }"#);
        let scenarios = read_scenario_file(single.path()).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert!(scenarios[0].variants.is_empty());

        let many = write_json(
            r#"[{ "name": "a", "baseline": {} }, { "name": "b", "baseline": {} }]"#,
        );
        assert_eq!(read_scenario_file(many.path()).unwrap().len(), 2);
    }
}
