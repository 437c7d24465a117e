use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "mates-server", version, about = "friend graph server")]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Directory holding the user database
    #[arg(long, default_value = "mates-data")]
    pub data_dir: PathBuf,

    /// Log filter, e.g. "info" or "mates_server=debug"
    #[arg(long, default_value = "info")]
    pub log: String,
}
