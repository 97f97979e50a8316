use clap::Parser;

use crate::codec::MAX_FRAME_SIZE;

pub const HOST: &str = "127.0.0.1";
pub const PORT: u16 = 6379;
pub const QUEUE_CAPACITY: usize = 1024;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tinydis", version, about)]
pub struct Config {
    /// The address to listen on
    #[arg(long, env = "TINYDIS_HOST", default_value = HOST)]
    pub host: String,

    /// The port to listen on
    #[arg(short, long, env = "TINYDIS_PORT", default_value_t = PORT)]
    pub port: u16,

    /// Largest frame, in bytes, a client may send
    #[arg(long, env = "MAX_FRAME_SIZE", default_value_t = MAX_FRAME_SIZE)]
    pub max_frame_size: usize,

    /// How many requests may wait for the executor before submitters block
    #[arg(long, env = "TINYDIS_QUEUE_CAPACITY", default_value_t = QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            max_frame_size: MAX_FRAME_SIZE,
            queue_capacity: QUEUE_CAPACITY,
        }
    }
}
