use std::{
    fs::File,
    io::{self, BufWriter, Read as _, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use methcomp::PairedSample;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Both measurement series as they appear in a JSON input file.
#[derive(Debug, serde::Deserialize)]
struct PairedInput {
    method1: Vec<f64>,
    method2: Vec<f64>,
}

/// Read paired measurements from `path`, or from stdin when `path` is `None`
///
/// # Arguments
///
/// * `path` - Input file; either a JSON object with `method1` and `method2`
///   arrays, or a two-column CSV (comma, semicolon, tab or space separated)
///   with an optional header line
///
/// # Returns
///
/// The validated paired sample
pub fn read_paired_sample(path: Option<&Path>) -> anyhow::Result<PairedSample> {
    let (source, text) = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read input from stdin")?;
            ("stdin".to_string(), text)
        }
    };

    let (method1, method2) = parse_paired(&text)
        .with_context(|| format!("Failed to parse paired measurements from {source}"))?;
    tracing::debug!(%source, n = method1.len(), "input read");

    let sample = PairedSample::new(method1, method2)
        .with_context(|| format!("Invalid paired measurements in {source}"))?;
    Ok(sample)
}

fn parse_paired(text: &str) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    if text.trim_start().starts_with('{') {
        let input: PairedInput = serde_json::from_str(text).context("Invalid JSON input")?;
        return Ok((input.method1, input.method2));
    }
    parse_csv(text)
}

fn parse_csv(text: &str) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    let mut method1 = vec![];
    let mut method2 = vec![];
    let rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    for (line_no, line) in rows {
        let fields = line
            .split([',', ';', '\t', ' '])
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>();
        let [first, second] = fields.as_slice() else {
            bail!("line {line_no}: expected 2 columns, found {}", fields.len());
        };
        match (first.parse::<f64>(), second.parse::<f64>()) {
            (Ok(x), Ok(y)) => {
                method1.push(x);
                method2.push(y);
            }
            // a header is only allowed before the first data row
            _ if method1.is_empty() => tracing::debug!(line_no, "skipping header line"),
            _ => bail!("line {line_no}: cannot parse '{line}' as two numbers"),
        }
    }
    Ok((method1, method2))
}
