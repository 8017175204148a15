use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use csgo_log_parser::{parse, to_json};

// Usage
//   csgo-log-json server.log
//   cat server.log | csgo-log-json

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let reader: Box<dyn BufRead> = match args.get(1) {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("unable to open logfile {}", path))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut err = stderr.lock();

    let mut lines = 0u64;
    let mut failures = 0u64;

    for line in reader.lines() {
        let line = line.context("unable to read line")?;
        lines += 1;

        match parse(&line) {
            Ok(message) => writeln!(out, "{}", to_json(&message)?)?,
            Err(e) => {
                // a bad line must not abort the stream; report it and move on
                failures += 1;
                let wrapped = serde_json::json!({ "error": e.to_string(), "line": line });
                writeln!(err, "{}", wrapped)?;
            }
        }
    }

    tracing::debug!(lines, failures, "finished reading input");

    Ok(())
}
