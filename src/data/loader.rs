use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{SurveyDataset, SurveyRecord};

/// Source columns that must be present for a file to count as survey data.
const REQUIRED_COLUMNS: [&str; 2] = ["Bioregion", "Biomass.250m2"];

/// A structurally broken survey file.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("no rows in {path}")]
    Empty { path: String },
    #[error("missing required column '{column}' in {path}")]
    MissingColumn { column: String, path: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the survey dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columnar survey file (recommended)
/// * `.csv`     – header row with the source column names
/// * `.json`    – records-oriented array (`df.to_json(orient='records')`)
pub fn load_file(path: &Path) -> Result<SurveyDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if records.is_empty() {
        return Err(DatasetError::Empty {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(SurveyDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema: Utf8 columns for the categorical dimensions
/// (`Bioregion`, `Subzone.name`, `Island`, `ORDER`, `Family`,
/// `Functional.Group`, `epoca`, `site`, `species`), an integer `year`, and
/// Float64 `Biomass.250m2` / `latitude` / `longitude`. Unknown columns are
/// ignored; missing optional columns load as nulls.
fn load_parquet(path: &Path) -> Result<Vec<SurveyRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for required in REQUIRED_COLUMNS {
            if schema.index_of(required).is_err() {
                return Err(DatasetError::MissingColumn {
                    column: required.to_string(),
                    path: path.display().to_string(),
                }
                .into());
            }
        }

        let col = |name: &str| -> Option<&Arc<dyn Array>> {
            schema.index_of(name).ok().map(|i| batch.column(i))
        };

        let bioregion = col("Bioregion");
        let subzone = col("Subzone.name");
        let island = col("Island");
        let order = col("ORDER");
        let family = col("Family");
        let functional_group = col("Functional.Group");
        let season = col("epoca");
        let year = col("year");
        let biomass = col("Biomass.250m2");
        let site = col("site");
        let species = col("species");
        let latitude = col("latitude");
        let longitude = col("longitude");

        for row in 0..batch.num_rows() {
            records.push(SurveyRecord {
                bioregion: bioregion.and_then(|c| string_cell(c, row)),
                subzone: subzone.and_then(|c| string_cell(c, row)),
                island: island.and_then(|c| string_cell(c, row)),
                order: order.and_then(|c| string_cell(c, row)),
                family: family.and_then(|c| string_cell(c, row)),
                functional_group: functional_group.and_then(|c| string_cell(c, row)),
                season: season.and_then(|c| string_cell(c, row)),
                year: year.and_then(|c| int_cell(c, row)),
                biomass: biomass.and_then(|c| float_cell(c, row)).unwrap_or(0.0),
                site: site.and_then(|c| string_cell(c, row)),
                species: species.and_then(|c| string_cell(c, row)),
                latitude: latitude.and_then(|c| float_cell(c, row)),
                longitude: longitude.and_then(|c| float_cell(c, row)),
            });
        }
    }

    Ok(records)
}

// -- Arrow cell helpers --

fn string_cell(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(row).to_string()),
        _ => int_cell(col, row)
            .map(|i| i.to_string())
            .or_else(|| float_cell(col, row).map(|f| f.to_string())),
    }
}

fn int_cell(col: &Arc<dyn Array>, row: usize) -> Option<i32> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as i32),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row) as i32),
        _ => None,
    }
}

fn float_cell(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the source column names, one record per row.
/// Empty cells load as nulls; a non-numeric biomass cell loads as 0.0 so it
/// contributes nothing to any sum.
fn load_csv(path: &Path) -> Result<Vec<SurveyRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn {
                column: required.to_string(),
                path: path.display().to_string(),
            }
            .into());
        }
    }
    let idx = |name: &str| headers.iter().position(|h| h == name);

    let bioregion = idx("Bioregion");
    let subzone = idx("Subzone.name");
    let island = idx("Island");
    let order = idx("ORDER");
    let family = idx("Family");
    let functional_group = idx("Functional.Group");
    let season = idx("epoca");
    let year = idx("year");
    let biomass = idx("Biomass.250m2");
    let site = idx("site");
    let species = idx("species");
    let latitude = idx("latitude");
    let longitude = idx("longitude");

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let text = |i: Option<usize>| -> Option<String> {
            i.and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        let number = |i: Option<usize>| -> Option<f64> {
            i.and_then(|i| record.get(i))
                .and_then(|s| s.trim().parse::<f64>().ok())
        };

        records.push(SurveyRecord {
            bioregion: text(bioregion),
            subzone: text(subzone),
            island: text(island),
            order: text(order),
            family: text(family),
            functional_group: text(functional_group),
            season: text(season),
            year: number(year).map(|y| y as i32),
            biomass: number(biomass).unwrap_or(0.0),
            site: text(site),
            species: text(species),
            latitude: number(latitude),
            longitude: number(longitude),
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON row, with the source file's column spellings.
#[derive(Debug, Deserialize)]
struct RawJsonRecord {
    #[serde(rename = "Bioregion")]
    bioregion: Option<String>,
    #[serde(rename = "Subzone.name")]
    subzone: Option<String>,
    #[serde(rename = "Island")]
    island: Option<String>,
    #[serde(rename = "ORDER")]
    order: Option<String>,
    #[serde(rename = "Family")]
    family: Option<String>,
    #[serde(rename = "Functional.Group")]
    functional_group: Option<String>,
    #[serde(rename = "epoca")]
    season: Option<String>,
    year: Option<i32>,
    #[serde(rename = "Biomass.250m2")]
    biomass: Option<f64>,
    site: Option<String>,
    species: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn load_json(path: &Path) -> Result<Vec<SurveyRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let raw: Vec<RawJsonRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    Ok(raw
        .into_iter()
        .map(|r| SurveyRecord {
            bioregion: r.bioregion,
            subzone: r.subzone,
            island: r.island,
            order: r.order,
            family: r.family,
            functional_group: r.functional_group,
            season: r.season,
            year: r.year,
            biomass: r.biomass.unwrap_or(0.0),
            site: r.site,
            species: r.species,
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("peces-explorer-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_round_trips_a_record() {
        let path = temp_path("fish.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "Bioregion,Island,epoca,year,Biomass.250m2,site,species"
        )
        .unwrap();
        writeln!(f, "Norte,Darwin,Fría,2011,12.5,DAR-03,Caranx melampygus").unwrap();
        writeln!(f, "Sur,,Caliente,2012,,ESP-01,").unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].bioregion.as_deref(), Some("Norte"));
        assert_eq!(ds.records[0].year, Some(2011));
        assert_eq!(ds.records[0].biomass, 12.5);
        // Empty cells: null island and species, biomass defaults to 0.0.
        assert_eq!(ds.records[1].island, None);
        assert_eq!(ds.records[1].biomass, 0.0);
    }

    #[test]
    fn csv_without_required_columns_is_rejected() {
        let path = temp_path("bad.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "a,b,c").unwrap();
        writeln!(f, "1,2,3").unwrap();

        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("Bioregion"));
    }

    #[test]
    fn json_records_are_parsed() {
        let path = temp_path("fish.json");
        std::fs::write(
            &path,
            r#"[{"Bioregion": "Occidente", "Island": "Fernandina", "epoca": "Fría",
                "year": 2015, "Biomass.250m2": 3.75, "Functional.Group": "Herbívoro"}]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].functional_group.as_deref(), Some("Herbívoro"));
        assert_eq!(ds.records[0].biomass, 3.75);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(load_file(Path::new("fish.feather")).is_err());
    }
}
