use clap::{Parser, Subcommand};
use std::path::PathBuf;

use SlotDB::SearchMode;

/// Диагностический CLI для slotted-страниц SlotDB (in-memory, без персистентности)
#[derive(Parser, Debug)]
#[command(name = "slotdb", version, about = "SlotDB page CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Apply a JSON list of operations to one fresh page and print the result
    ///
    /// JSON формат (массив объектов):
    /// [
    ///   {"op":"put","key":"alpha","value":"1"},
    ///   {"op":"put","key":"bin","value":"hex:deadbeef"},
    ///   {"op":"get","key":"alpha"},
    ///   {"op":"search","key":"beta"},
    ///   {"op":"del","key":"alpha"},
    ///   {"op":"wipe"}
    /// ]
    Run {
        /// Page size in bytes (default: SLOTDB_PAGE_SIZE or 4096)
        #[arg(long)]
        page_size: Option<usize>,
        /// JSON-файл с операциями
        #[arg(long)]
        ops_file: Option<PathBuf>,
        /// JSON-строка с операциями (если ops_file не задан)
        #[arg(long)]
        ops_json: Option<String>,
        /// Search strategy (default: SLOTDB_SEARCH or binary)
        #[arg(long)]
        search: Option<SearchMode>,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Print a printable-ASCII dump of the page
        #[arg(long, default_value_t = false)]
        dump: bool,
        /// Check page invariants after every operation
        #[arg(long, default_value_t = false)]
        verify: bool,
    },
    /// Fill one page with random keys until an insert is rejected
    Fill {
        #[arg(long)]
        page_size: Option<usize>,
        /// Key length in bytes
        #[arg(long, default_value_t = 8)]
        key_size: usize,
        /// Value length in bytes
        #[arg(long, default_value_t = 16)]
        value_size: usize,
        /// PRNG seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
