pub mod block;
pub mod reader;
pub mod writer;

pub use reader::RunReader;
pub use writer::{RunWriter, write_run};

use std::path::{Path, PathBuf};

/// Maximum values per block. Bounds the reader's memory per open run.
pub const BLOCK_CAPACITY: usize = 512;

/// File name for the run holding input row `index`.
pub fn run_file_name(index: usize) -> String {
    format!("row-{index:04}.run")
}

/// Full path of the run for row `index` under `dir`.
pub fn run_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(run_file_name(index))
}
