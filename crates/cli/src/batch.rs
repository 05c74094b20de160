//! Catalogue-wide batch runs: parallel generation, summary, result table.

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use symgen::api::{catalogue, generate, GenerateCfg, GeneratorSet};

/// How one group ended.
#[derive(Clone, Debug)]
pub enum Status {
    Ok(GeneratorSet),
    Failed(String),
    OverBudget,
}

impl Status {
    fn label(&self) -> &'static str {
        match self {
            Status::Ok(_) => "ok",
            Status::Failed(_) => "failed",
            Status::OverBudget => "over_budget",
        }
    }
}

/// Result for one catalogue entry.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub name: &'static str,
    pub dimension: usize,
    pub status: Status,
    pub elapsed: Duration,
}

impl Outcome {
    pub fn generators(&self) -> Option<&GeneratorSet> {
        match &self.status {
            Status::Ok(set) => Some(set),
            _ => None,
        }
    }
}

/// Generate every catalogue group of `dimension` on a pool of `threads`
/// workers (0 = rayon default). Results come back in catalogue order.
pub fn run_catalogue(
    dimension: usize,
    cfg: &GenerateCfg,
    budget: Option<Duration>,
    threads: usize,
) -> Result<Vec<Outcome>> {
    let names = catalogue::names(dimension);
    if names.is_empty() {
        bail!("no catalogue groups in dimension {dimension}");
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("building worker pool")?;
    tracing::info!(dimension, groups = names.len(), threads = pool.current_num_threads(), "batch");
    Ok(pool.install(|| {
        names
            .par_iter()
            .map(|&name| run_one(dimension, name, cfg, budget))
            .collect()
    }))
}

fn run_one(
    dimension: usize,
    name: &'static str,
    cfg: &GenerateCfg,
    budget: Option<Duration>,
) -> Outcome {
    let start = Instant::now();
    let status = match catalogue::lookup(dimension, name) {
        Ok(group) => match generate(&group, cfg) {
            Ok(set) => Status::Ok(set),
            Err(e) => Status::Failed(e.to_string()),
        },
        Err(e) => Status::Failed(e.to_string()),
    };
    let elapsed = start.elapsed();
    let status = match (status, budget) {
        (Status::Ok(_), Some(limit)) if elapsed > limit => Status::OverBudget,
        (status, _) => status,
    };
    match &status {
        Status::Ok(set) => tracing::debug!(name, generators = set.len(), "done"),
        Status::Failed(reason) => tracing::warn!(name, reason = %reason, "failed"),
        Status::OverBudget => {
            tracing::warn!(name, elapsed_ms = elapsed.as_millis() as u64, "over budget")
        }
    }
    Outcome {
        name,
        dimension,
        status,
        elapsed,
    }
}

/// Aggregate figures printed after a batch and stored in the sidecar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub printed: usize,
    pub failures: Vec<String>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub average: Option<f64>,
}

impl Summary {
    pub fn of(outcomes: &[Outcome]) -> Self {
        let lengths: Vec<usize> = outcomes
            .iter()
            .filter_map(Outcome::generators)
            .map(GeneratorSet::len)
            .collect();
        let failures = outcomes
            .iter()
            .filter(|o| o.generators().is_none())
            .map(|o| o.name.to_string())
            .collect();
        let average = if lengths.is_empty() {
            None
        } else {
            Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
        };
        Self {
            printed: lengths.len(),
            failures,
            min: lengths.iter().copied().min(),
            max: lengths.iter().copied().max(),
            average,
        }
    }
}

/// One row per group: name, dimension, points, translations, status, elapsed_ms.
pub fn to_frame(outcomes: &[Outcome]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = outcomes.iter().map(|o| o.name).collect();
    let dims: Vec<u32> = outcomes.iter().map(|o| o.dimension as u32).collect();
    let points: Vec<Option<u32>> = outcomes
        .iter()
        .map(|o| o.generators().map(|s| s.points.len() as u32))
        .collect();
    let translations: Vec<Option<u32>> = outcomes
        .iter()
        .map(|o| o.generators().map(|s| s.translations.len() as u32))
        .collect();
    let status: Vec<&str> = outcomes.iter().map(|o| o.status.label()).collect();
    let elapsed: Vec<f64> = outcomes.iter().map(|o| o.elapsed.as_secs_f64() * 1e3).collect();
    df!(
        "name" => names,
        "dimension" => dims,
        "points" => points,
        "translations" => translations,
        "status" => status,
        "elapsed_ms" => elapsed
    )
}

/// Write `df` as parquet for `.parquet` paths, CSV otherwise.
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        _ => {
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use symgen::api::{OrderingStrategy, TranslationPruning};
    use tempfile::tempdir;

    #[test]
    fn plane_batch_succeeds_in_catalogue_order() {
        let outcomes = run_catalogue(2, &GenerateCfg::default(), None, 2).unwrap();
        let names: Vec<&str> = outcomes.iter().map(|o| o.name).collect();
        assert_eq!(names, catalogue::names(2));
        let summary = Summary::of(&outcomes);
        assert_eq!(summary.printed, 17);
        assert!(summary.failures.is_empty());
        // p1 and p4 need two; p2mm needs a rotation, a mirror and two translations
        assert_eq!(summary.min, Some(2));
        assert_eq!(summary.max, Some(4));
    }

    #[test]
    fn zero_budget_marks_groups_over_budget() {
        let cfg = GenerateCfg {
            ordering: OrderingStrategy::Legacy,
            pruning: TranslationPruning::Skip,
            ..GenerateCfg::default()
        };
        let outcomes = run_catalogue(3, &cfg, Some(Duration::ZERO), 1).unwrap();
        // Fm-3m cannot finish in zero time
        let fcc = outcomes.iter().find(|o| o.name == "Fm-3m").unwrap();
        assert!(matches!(fcc.status, Status::OverBudget));
        assert!(Summary::of(&outcomes).failures.contains(&"Fm-3m".to_string()));
    }

    #[test]
    fn unsupported_dimension_is_an_error() {
        assert!(run_catalogue(4, &GenerateCfg::default(), None, 1).is_err());
    }

    #[test]
    fn summary_of_empty_batch() {
        let s = Summary::of(&[]);
        assert_eq!((s.printed, s.min, s.max, s.average), (0, None, None, None));
    }

    #[test]
    fn table_round_trips_through_csv() {
        let outcomes = run_catalogue(2, &GenerateCfg::default(), None, 1).unwrap();
        let mut df = to_frame(&outcomes).unwrap();
        assert_eq!(df.shape(), (17, 6));

        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/plane.csv");
        write_frame(&mut df, &path).unwrap();
        let back = LazyCsvReader::new(&path)
            .with_infer_schema_length(Some(100))
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(back.shape(), (17, 6));
        let columns: Vec<String> =
            back.get_column_names().into_iter().map(|c| c.to_string()).collect();
        assert_eq!(
            columns,
            ["name", "dimension", "points", "translations", "status", "elapsed_ms"]
        );
    }

    #[test]
    fn parquet_by_extension() {
        let outcomes = run_catalogue(2, &GenerateCfg::default(), None, 1).unwrap();
        let mut df = to_frame(&outcomes).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("plane.parquet");
        write_frame(&mut df, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");
    }
}
