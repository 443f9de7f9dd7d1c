//! `sislc` CLI — convert between JSON, XML and SISL.
//!
//! ## Usage
//!
//! ```sh
//! # JSON (stdin) → SISL (stdout)
//! echo '{"name":"Alice"}' | sislc --dumps
//!
//! # SISL → JSON
//! echo '{name: !str "Alice"}' | sislc --loads
//!
//! # XML source or target
//! sislc --dumps --xml --input data.xml
//! sislc --loads --xml --output data.xml
//!
//! # Split into fragments of at most 40 characters
//! echo '{"a":1,"b":2,"c":3}' | sislc --dumps --max-length 40
//!
//! # Join fragments (a JSON array of SISL strings on stdin)
//! echo '["{a: !int \"1\"}", "{b: !int \"2\"}"]' | sislc --loads
//! ```
//!
//! Exit code 0 on success; any failure prints one prefixed diagnostic on
//! stderr (`input-io:`, `sisl-parse:`, ...) and exits non-zero.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};

#[derive(Parser)]
#[command(
    name = "sislc",
    version,
    about = "SISL (Simple Indented Structured Language) converter",
    group = ArgGroup::new("direction").required(true)
)]
struct Cli {
    /// Convert JSON (or XML with --xml) to SISL
    #[arg(long, group = "direction")]
    dumps: bool,

    /// Convert SISL (or a JSON array of SISL fragments) to JSON (or XML with --xml)
    #[arg(long, group = "direction")]
    loads: bool,

    /// Read or write XML instead of JSON
    #[arg(long)]
    xml: bool,

    /// Split --dumps output into SISL fragments of at most N characters
    #[arg(long, value_name = "N")]
    max_length: Option<usize>,

    /// Read input from a file instead of stdin
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Write output to a file (atomically) instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.max_length.is_some() && !cli.dumps {
        bail!("cli-usage: --max-length can only be used with --dumps");
    }
    if cli.max_length == Some(0) {
        bail!("cli-usage: --max-length must be positive");
    }

    let input = read_input(cli.input.as_deref())?;
    let output = if cli.dumps {
        do_dumps(&cli, &input)?
    } else {
        do_loads(&cli, &input)?
    };
    write_output(cli.output.as_deref(), &output)
}

/// Source (JSON or XML) → SISL, splitting when --max-length is set.
fn do_dumps(cli: &Cli, input: &str) -> Result<String> {
    let doc = if cli.xml {
        sisl_core::xml_to_document(input)?
    } else {
        sisl_core::from_json_str(input)?
    };

    match cli.max_length {
        None => Ok(sisl_core::write(&doc)?),
        Some(max_length) => {
            let mut parts = sisl_core::split(&doc, max_length)?;
            if parts.len() == 1 {
                // Fits in one fragment: print the bare SISL string.
                Ok(parts.remove(0))
            } else {
                Ok(serde_json::to_string(&parts)?)
            }
        }
    }
}

/// SISL (or a JSON array of SISL fragments) → JSON or XML.
fn do_loads(cli: &Cli, input: &str) -> Result<String> {
    let doc = if input.trim_start().starts_with('[') {
        let fragments: Vec<String> = serde_json::from_str(input)
            .map_err(|err| anyhow::anyhow!("json-parse: invalid fragment array: {err}"))?;
        sisl_core::join(&fragments)?
    } else {
        sisl_core::parse(input)?
    };

    if cli.xml {
        Ok(sisl_core::document_to_xml(&doc)?)
    } else {
        Ok(sisl_core::to_json_string(&doc)?)
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("input-io: cannot open input file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("input-io: cannot read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    let text = if content.ends_with('\n') {
        content.to_string()
    } else {
        format!("{content}\n")
    };
    match path {
        Some(path) => write_file_atomic(path, &text),
        None => {
            io::stdout()
                .write_all(text.as_bytes())
                .context("output-io: cannot write stdout")?;
            Ok(())
        }
    }
}

/// Stage the content in a sibling temporary file and rename it into place,
/// so a failed run never leaves partial output behind.
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let staged = std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(err) = staged {
        let _ = std::fs::remove_file(&tmp);
        return Err(err)
            .with_context(|| format!("output-io: cannot write output file: {}", path.display()));
    }
    Ok(())
}
