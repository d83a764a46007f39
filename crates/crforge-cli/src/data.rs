use std::path::Path;

use anyhow::Context;
use crforge_model::{
    dataset::{Dataset, NAME_COLUMN, Record, parse_cell},
    schema::NON_FEATURE_COLUMNS,
    stat_mapping::StatMapping,
};

/// Read a monster table from a CSV file with a header row
///
/// The `name` column becomes the record name, empty cells and missing-value
/// markers such as `NA` are left out of the record, and every other cell must
/// be a number.
///
/// # Errors
///
/// Returns error if the file cannot be read or a cell is not numeric
pub fn read_dataset_file<P>(path: P) -> anyhow::Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut records = vec![];
    for (row, result) in reader.records().enumerate() {
        let line = row + 2;
        let cells = result
            .with_context(|| format!("Failed to read CSV line {line}: {}", path.display()))?;
        let mut name = None;
        let mut stats = StatMapping::new();
        for (column, cell) in columns.iter().zip(cells.iter()) {
            if column == NAME_COLUMN {
                name = (!cell.is_empty()).then(|| cell.to_owned());
                continue;
            }
            if NON_FEATURE_COLUMNS.contains(&column.as_str()) {
                continue;
            }
            let value = parse_cell(column, cell).with_context(|| {
                format!("Invalid value on CSV line {line}: {}", path.display())
            })?;
            if let Some(value) = value {
                stats
                    .insert(column.as_str(), value)
                    .with_context(|| format!("Invalid value on CSV line {line}"))?;
            }
        }
        records.push(Record::new(name, stats));
    }

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        columns = columns.len(),
        "dataset loaded"
    );
    Ok(Dataset::new(columns, records))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_dataset() {
        let file = write_csv(
            "Unnamed: 0,name,hit_points,armor_class,cr\n\
             0,Goblin,7,15,0.25\n\
             1,,22, ,1\n\
             2,Kobold,5,N/A,0.125\n",
        );
        let dataset = read_dataset_file(file.path()).unwrap();
        assert_eq!(
            dataset.columns(),
            ["Unnamed: 0", "name", "hit_points", "armor_class", "cr"]
        );
        assert_eq!(dataset.len(), 3);

        let goblin = &dataset.records()[0];
        assert_eq!(goblin.name.as_deref(), Some("Goblin"));
        assert_eq!(goblin.stats.get("hit_points"), Some(7.0));
        assert_eq!(goblin.stats.get("cr"), Some(0.25));
        assert!(!goblin.stats.contains("Unnamed: 0"));

        let unnamed = &dataset.records()[1];
        assert_eq!(unnamed.name, None);
        assert!(!unnamed.stats.contains("armor_class"));

        let kobold = &dataset.records()[2];
        assert!(!kobold.stats.contains("armor_class"));
        assert_eq!(kobold.stats.get("cr"), Some(0.125));
    }

    #[test]
    fn test_rejects_non_numeric_cell() {
        let file = write_csv("name,hit_points,cr\nGoblin,seven,0.25\n");
        let err = read_dataset_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_missing_file() {
        assert!(read_dataset_file("/nonexistent/monsters.csv").is_err());
    }
}
