use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rtsp_scan::{Headers, ParseConfig, RtspRequest, RtspResponse, ScanError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rtsp-scan",
    about = "Tokenize an RTSP request or response and print its parts"
)]
struct Args {
    /// Message file to read (stdin when omitted)
    path: Option<PathBuf>,

    /// Treat the input as a response instead of a request
    #[arg(long)]
    response: bool,

    /// Maximum number of header lines
    #[arg(long, default_value_t = ParseConfig::default().max_headers)]
    max_headers: usize,

    /// Reject folded (continuation) header lines
    #[arg(long)]
    no_fold: bool,

    /// Require the blank line that ends the header block
    #[arg(long)]
    strict: bool,

    /// Log scanner decisions (overridden by RUST_LOG)
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> ParseConfig {
        ParseConfig {
            max_headers: self.max_headers,
            fold_continuations: !self.no_fold,
            require_terminator: self.strict,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rtsp-scan: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ScanError> {
    let raw = read_input(args.path.as_ref())?;
    let config = args.config();

    if args.response {
        let response = RtspResponse::parse_with(&raw, &config)?;
        println!("version: {}", response.version);
        println!("status:  {} {}", response.status_code, response.reason);
        print_headers(&response.headers);
        println!("body:    {} bytes", response.body.len());
    } else {
        let request = RtspRequest::parse_with(&raw, &config)?;
        println!("method:  {}", request.method);
        println!("uri:     {}", request.uri);
        match request.request_uri() {
            Ok(uri) => {
                if let Some(scheme) = uri.scheme {
                    println!("  scheme: {scheme}");
                }
                if let Some((host, port)) = uri.host_and_port() {
                    println!("  host:   {host}");
                    if let Some(port) = port {
                        println!("  port:   {port}");
                    }
                }
                println!("  path:   {}", uri.path);
                if let Some(query) = uri.query {
                    println!("  query:  {query}");
                }
            }
            Err(e) => tracing::warn!(error = %e, "request URI not split"),
        }
        println!("version: {}", request.version);
        print_headers(&request.headers);
        if let Some(range) = request.range() {
            println!("range:   {}", range?);
        }
        println!("body:    {} bytes", request.body.len());
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path),
        None => {
            let mut raw = Vec::new();
            io::stdin().read_to_end(&mut raw)?;
            Ok(raw)
        }
    }
}

fn print_headers(headers: &Headers<'_>) {
    println!("headers: {}", headers.len());
    for header in headers {
        println!("  [{}] {}: {:?}", header.line, header.name, header.value);
    }
}
