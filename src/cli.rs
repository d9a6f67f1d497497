//! Command-line interface for the addon server

use clap::Parser;

/// MDBList ratings addon for Stremio
///
/// Serves Cinemeta metadata with MDBList ratings layered into the
/// description. Set MDBLIST_API_KEY to enable enrichment; without it the
/// addon still serves plain Cinemeta records.
#[derive(Parser, Debug)]
#[command(name = "ratingsmeta")]
#[command(about = "Cinemeta metadata with MDBList ratings in the description")]
#[command(version)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "7000")]
    pub port: u16,
}
