use {
    crate::{ChartError, ChartSource, Result, types::ProbeBatch},
    std::{
        fs,
        path::{Path, PathBuf},
    },
    tracing::{info, warn},
};

/// Loads every `*.json` snapshot in a directory. Files are read in name order
/// so repeated runs over the same directory see the same batch sequence.
pub struct Collector {
    input_dir: PathBuf,
}

impl Collector {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    pub fn snapshot_paths(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.input_dir).map_err(|source| ChartError::Io {
            path: self.input_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ChartError::Io {
                path: self.input_dir.clone(),
                source,
            })?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
                paths.push(path);
            } else {
                warn!("Skipping {}", path.display());
            }
        }

        paths.sort();
        Ok(paths)
    }

    pub fn run(&self) -> Result<Vec<ProbeBatch>> {
        let paths = self.snapshot_paths()?;

        let batches = paths
            .iter()
            .map(|path| Self::read_batch(path))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Collected {} batches ({} probe results) from {}",
            batches.len(),
            batches.iter().map(|b| b.results.len()).sum::<usize>(),
            self.input_dir.display()
        );

        Ok(batches)
    }

    fn read_batch(path: &Path) -> Result<ProbeBatch> {
        let content = fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ChartError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn write_chart(path: &Path, chart: &ChartSource) -> Result<()> {
    let json = serde_json::to_string_pretty(chart)?;
    fs::write(path, json).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })
}
