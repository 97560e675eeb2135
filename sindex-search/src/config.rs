use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct Config {
    /// Address the search server listens on
    #[arg(long, env = "SINDEX_SEARCH_LISTEN", default_value = "127.0.0.1:7700")]
    pub listen: String,

    /// Root directory scanned for secure index files
    #[arg(long, env = "SINDEX_SEARCH_INDEX_ROOT", default_value = "index")]
    pub index_root: PathBuf,
}
