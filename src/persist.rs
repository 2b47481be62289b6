use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Value;

pub const FORMAT_VERSION: u32 = 1;

/// Canonical position → {action id → probability}.
pub type StrategyTable = BTreeMap<String, BTreeMap<String, f64>>;

/// One strategy table per player role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyTables {
    pub first: StrategyTable,
    pub second: StrategyTable,
}

/// File names written by `save_strategy_tables`, first player then second.
pub const TICTACTOE_POLICY_FILES: [&str; 2] = ["policy_x.json", "policy_o.json"];
pub const NOTAKTO_POLICY_FILES: [&str; 2] = ["policy_p1.json", "policy_p2.json"];

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported format version {got} (expected {expected})")]
    Version { got: u32, expected: u32 },
}

impl PersistError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        PersistError::Io { path: path.to_path_buf(), source }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        PersistError::Json { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuesHeader {
    pub version: u32,
    pub game: String,
    pub boards: Option<usize>,
    pub max_depth: u8,
    // No timestamp, so identical solves produce identical files.
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValuesDb {
    header: ValuesHeader,
    entries: BTreeMap<String, Value>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let file = fs::File::create(path).map_err(|e| PersistError::io(path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, value).map_err(|e| PersistError::json(path, e))?;
    w.write_all(b"\n").map_err(|e| PersistError::io(path, e))?;
    w.flush().map_err(|e| PersistError::io(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, PersistError> {
    let file = fs::File::open(path).map_err(|e| PersistError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| PersistError::json(path, e))
}

/// Save one strategy table as a JSON object with sorted keys.
pub fn save_strategy_table<P: AsRef<Path>>(path: P, table: &StrategyTable) -> Result<(), PersistError> {
    write_json(path.as_ref(), table)
}

/// Load a table written by `save_strategy_table`.
pub fn load_strategy_table<P: AsRef<Path>>(path: P) -> Result<StrategyTable, PersistError> {
    read_json(path.as_ref())
}

/// Write both role tables into `dir` (created if missing) and return their paths.
pub fn save_strategy_tables<P: AsRef<Path>>(
    dir: P,
    tables: &StrategyTables,
    names: [&str; 2],
) -> Result<[PathBuf; 2], PersistError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
    let first = dir.join(names[0]);
    let second = dir.join(names[1]);
    save_strategy_table(&first, &tables.first)?;
    save_strategy_table(&second, &tables.second)?;
    Ok([first, second])
}

/// Save solved values (canonical position → value for the player to move).
pub fn save_values<P: AsRef<Path>>(
    path: P,
    header: &ValuesHeader,
    entries: &BTreeMap<String, Value>,
) -> Result<(), PersistError> {
    let db = ValuesDb {
        header: header.clone(),
        entries: entries.clone(),
    };
    write_json(path.as_ref(), &db)
}

/// Load values written by `save_values`; rejects other format versions.
pub fn load_values<P: AsRef<Path>>(
    path: P,
) -> Result<(ValuesHeader, BTreeMap<String, Value>), PersistError> {
    let db: ValuesDb = read_json(path.as_ref())?;
    if db.header.version != FORMAT_VERSION {
        return Err(PersistError::Version {
            got: db.header.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok((db.header, db.entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let err = load_strategy_table("/nonexistent/dir/policy_x.json").expect_err("must fail");
        assert!(err.to_string().contains("policy_x.json"), "got: {err}");
    }
}
