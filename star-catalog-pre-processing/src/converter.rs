/// Star catalog converter turning a raw CSV export into the engine's JSON asset.
use crate::catalog::{CatalogFile, CatalogRow, RawStarRow, RowOutcome};
use constants::path::CATALOG_FILE_EXTENSION;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

/// Row counts reported once a conversion finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub kept: usize,
    pub too_faint: usize,
    pub malformed: usize,
}

pub struct StarCatalogConverter {
    input_path: PathBuf,
    output_path: PathBuf,
    magnitude_ceiling: f64,
}

impl StarCatalogConverter {
    pub fn new(input_path: &Path, output_path: Option<&Path>, magnitude_ceiling: f64) -> Self {
        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(input_path));

        Self {
            input_path: input_path.to_path_buf(),
            output_path,
            magnitude_ceiling,
        }
    }

    /// Read, validate and write the catalog.
    pub fn convert(&self) -> Result<ConversionSummary, Box<dyn std::error::Error>> {
        println!(
            "Converting {} (magnitude ceiling {:.1})...",
            self.input_path.display(),
            self.magnitude_ceiling
        );

        let reader = csv::Reader::from_path(&self.input_path)?;
        let (rows, unreadable) = read_rows(reader)?;
        println!("Read {} rows ({} unreadable)", rows.len(), unreadable);

        let (stars, mut summary) = self.classify_rows(&rows)?;
        summary.malformed += unreadable;

        let catalog = CatalogFile {
            source: self
                .input_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            magnitude_ceiling: self.magnitude_ceiling,
            stars,
        };

        let writer = BufWriter::new(File::create(&self.output_path)?);
        serde_json::to_writer_pretty(writer, &catalog)?;

        println!(
            "Wrote {}: {} stars kept, {} fainter than ceiling, {} malformed",
            self.output_path.display(),
            summary.kept,
            summary.too_faint,
            summary.malformed
        );
        Ok(summary)
    }

    /// Classify rows in parallel. Output order equals input order.
    fn classify_rows(
        &self,
        rows: &[RawStarRow],
    ) -> Result<(Vec<CatalogRow>, ConversionSummary), Box<dyn std::error::Error>> {
        let pb = ProgressBar::new(rows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} stars ({percent}%) {msg}")?
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Validating rows");

        let outcomes: Vec<RowOutcome> = rows
            .par_iter()
            .map(|row| {
                let outcome = row.classify(self.magnitude_ceiling);
                pb.inc(1);
                outcome
            })
            .collect();
        pb.finish_with_message("Rows validated");

        Ok(collect_outcomes(outcomes))
    }
}

/// Deserialize every record, counting records the CSV layer cannot decode.
pub fn read_rows<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<(Vec<RawStarRow>, usize), csv::Error> {
    // Header problems are fatal; individual record problems are not.
    reader.headers()?;

    let mut rows = Vec::new();
    let mut unreadable = 0;
    for record in reader.deserialize::<RawStarRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(_) => unreadable += 1,
        }
    }
    Ok((rows, unreadable))
}

fn collect_outcomes(outcomes: Vec<RowOutcome>) -> (Vec<CatalogRow>, ConversionSummary) {
    let mut summary = ConversionSummary::default();
    let mut stars = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            RowOutcome::Kept(row) => {
                summary.kept += 1;
                stars.push(row);
            }
            RowOutcome::TooFaint => summary.too_faint += 1,
            RowOutcome::Malformed => summary.malformed += 1,
        }
    }
    (stars, summary)
}

/// `stars.csv` becomes `stars.catalog.json` beside the input.
fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stars".to_string());
    input_path.with_file_name(format!("{stem}.{CATALOG_FILE_EXTENSION}"))
}
