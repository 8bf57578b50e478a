/*
 * Copyright 2025 Vijaykumar Singh
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! tape-encode - serialize JSON lines of key/value records into tape blobs

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tapeavro::{AvroEngine, AvroTopic, Record, TapeAvroSerializer, TopicConfig};

#[derive(Parser)]
#[command(name = "tape-encode")]
#[command(about = "Serialize JSON key/value records into Avro tape blobs")]
struct Args {
    /// Topic definition (TOML) with key and value schemas
    #[arg(short, long)]
    topic: PathBuf,

    /// JSON lines input, one {"key": ..., "value": ...} per line; stdin if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print one hex line per record instead of length-prefixed binary
    #[arg(long)]
    hex: bool,
}

#[derive(Deserialize)]
struct JsonRecord {
    key: serde_json::Value,
    value: serde_json::Value,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();

    let topic_config = TopicConfig::from_file(&args.topic)
        .with_context(|| format!("Failed to load topic from {}", args.topic.display()))?;
    let topic: AvroTopic<serde_json::Value, serde_json::Value> =
        AvroTopic::from_config(&topic_config).context("Failed to parse topic schemas")?;
    let mut serializer =
        TapeAvroSerializer::with_config(&topic, &AvroEngine, topic_config.serializer.clone())
            .context("Failed to bind topic schemas")?;

    info!("Encoding records for topic {}", topic.name());

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut blob = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: JsonRecord = serde_json::from_str(&line)
            .with_context(|| format!("Invalid record on line {}", line_no + 1))?;
        let record = Record::new(parsed.key, parsed.value);

        blob.clear();
        serializer
            .serialize(&record, &mut blob)
            .with_context(|| format!("Failed to serialize record on line {}", line_no + 1))?;
        debug!("Line {} -> {} bytes", line_no + 1, blob.len());

        write_blob(&mut output, &blob, args.hex).context("Failed to write output")?;
    }
    output.flush().context("Failed to flush output")?;

    let stats = serializer.stats();
    info!(
        "Encoded {} records ({} bytes, {} key cache hits, {} key encodings)",
        stats.records, stats.bytes_written, stats.key_cache_hits, stats.key_encodings
    );
    Ok(())
}

/// Frame a blob the way a length-delimited tape entry would be stored
fn write_blob(output: &mut dyn Write, blob: &[u8], hex: bool) -> io::Result<()> {
    if hex {
        let line: String = blob.iter().map(|b| format!("{:02x}", b)).collect();
        writeln!(output, "{}", line)
    } else {
        output.write_all(&(blob.len() as u32).to_be_bytes())?;
        output.write_all(blob)
    }
}
