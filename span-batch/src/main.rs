//! Processador em lote: lê registros `{"tokens": [...], "tags": [...]}` em JSON Lines,
//! resolve os spans com o `span-core` e escreve `{"text": ..., "spans": [...]}` por linha.
//!
//! Logs vão para stderr; stdout fica reservado para a saída JSON Lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use span_core::{
    resolve_batch, DecoderConfig, FinalTokenPolicy, MentionAggregation, Mode, OffsetStrategy,
    OrphanPolicy, Record,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Política para registros que falham (entrada malformada ou erro do resolvedor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnError {
    /// Registra um aviso e segue para o próximo registro
    Skip,
    /// Interrompe o lote no primeiro erro, na ordem das linhas; as linhas anteriores já
    /// foram escritas
    Abort,
}

#[derive(Debug, Parser)]
#[command(
    name = "span-batch",
    version,
    about = "Converte tags por token em spans de caracteres (JSON Lines)"
)]
struct Cli {
    /// Arquivo de entrada JSON Lines ("-" para stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Arquivo de saída JSON Lines ("-" para stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Modo de decodificação: bio | uniform
    #[arg(long, default_value = "bio", value_parser = parse_snake::<Mode>)]
    mode: Mode,

    /// Configuração do decodificador em JSON (as flags abaixo têm precedência)
    #[arg(long)]
    config: Option<PathBuf>,

    /// incremental_cursor | suffix_search
    #[arg(long, value_parser = parse_snake::<OffsetStrategy>)]
    strategy: Option<OffsetStrategy>,

    /// include | exclude
    #[arg(long, value_parser = parse_snake::<FinalTokenPolicy>)]
    final_token: Option<FinalTokenPolicy>,

    /// ignore | reject
    #[arg(long, value_parser = parse_snake::<OrphanPolicy>)]
    orphans: Option<OrphanPolicy>,

    #[arg(long, value_enum, default_value_t = OnError::Skip)]
    on_error: OnError,

    /// Escreve a contagem de menções por rótulo neste arquivo JSON
    #[arg(long)]
    mentions_output: Option<PathBuf>,
}

/// Reaproveita os nomes snake_case do serde como valores de flag.
fn parse_snake<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

impl Cli {
    fn decoder_config(&self) -> anyhow::Result<DecoderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                DecoderConfig::from_json_str(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => DecoderConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(final_token) = self.final_token {
            config.final_token = final_token;
        }
        if let Some(orphans) = self.orphans {
            config.orphans = orphans;
        }
        Ok(config)
    }
}

/// Registros resolvidos em paralelo por vez; mantém a memória constante em entradas grandes.
const CHUNK_SIZE: usize = 1024;

/// Estatísticas de uma execução.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    resolved: usize,
    skipped: usize,
    spans: usize,
}

/// Uma linha não vazia da entrada, com o número da linha e o resultado do parse.
type Entry = (usize, serde_json::Result<Record>);

/// Escreve os resultados de cada bloco na ordem das linhas de entrada.
struct BatchWriter<'a, W: Write> {
    writer: W,
    mode: Mode,
    config: &'a DecoderConfig,
    on_error: OnError,
    summary: Summary,
    mentions: MentionAggregation,
}

impl<W: Write> BatchWriter<'_, W> {
    /// Resolve um bloco e trata cada linha em ordem: a primeira falha, seja de parse ou
    /// do resolvedor, é a que interrompe o lote com `OnError::Abort`.
    fn write_chunk(&mut self, chunk: Vec<Entry>) -> anyhow::Result<()> {
        let mut records = Vec::with_capacity(chunk.len());
        let mut slots = Vec::with_capacity(chunk.len());
        for (line_no, parsed) in chunk {
            match parsed {
                Ok(record) => {
                    records.push(record);
                    slots.push((line_no, None));
                }
                Err(e) => slots.push((line_no, Some(e))),
            }
        }

        let mut results = resolve_batch(&records, self.mode, self.config).into_iter();
        let mut resolved = Vec::with_capacity(records.len());
        for (line_no, parse_error) in slots {
            let outcome = match parse_error {
                Some(e) => Err(anyhow::Error::new(e).context("malformed record")),
                None => results
                    .next()
                    .context("resolver returned fewer results than records")?
                    .map_err(anyhow::Error::new),
            };
            match outcome {
                Ok(record) => {
                    serde_json::to_writer(&mut self.writer, &record)?;
                    self.writer.write_all(b"\n")?;
                    self.summary.resolved += 1;
                    self.summary.spans += record.spans.len();
                    resolved.push(record);
                }
                Err(e) if self.on_error == OnError::Skip => {
                    warn!(line = line_no, error = %format!("{e:#}"), "skipping record");
                    self.summary.skipped += 1;
                }
                Err(e) => return Err(e.context(format!("line {line_no}"))),
            }
        }

        self.mentions.merge(MentionAggregation::from_records(&resolved));
        Ok(())
    }
}

/// Lê, resolve e escreve um lote em blocos de `CHUNK_SIZE` linhas.
fn run<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    mode: Mode,
    config: &DecoderConfig,
    on_error: OnError,
) -> anyhow::Result<(Summary, MentionAggregation)> {
    run_chunked(reader, writer, mode, config, on_error, CHUNK_SIZE)
}

fn run_chunked<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    mode: Mode,
    config: &DecoderConfig,
    on_error: OnError,
    chunk_size: usize,
) -> anyhow::Result<(Summary, MentionAggregation)> {
    let mut batch = BatchWriter {
        writer,
        mode,
        config,
        on_error,
        summary: Summary::default(),
        mentions: MentionAggregation::new(),
    };
    let chunk_size = chunk_size.max(1);
    let mut chunk: Vec<Entry> = Vec::with_capacity(chunk_size);

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        chunk.push((line_no, serde_json::from_str(&line)));
        if chunk.len() == chunk_size {
            batch.write_chunk(std::mem::take(&mut chunk))?;
        }
    }
    if !chunk.is_empty() {
        batch.write_chunk(chunk)?;
    }
    batch.writer.flush()?;

    Ok((batch.summary, batch.mentions))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.decoder_config()?;

    let reader: Box<dyn BufRead> = match cli.input.as_str() {
        "-" => Box::new(BufReader::new(io::stdin())),
        path => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input {path}"))?,
        )),
    };
    let writer: Box<dyn Write> = match cli.output.as_str() {
        "-" => Box::new(BufWriter::new(io::stdout())),
        path => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output {path}"))?,
        )),
    };

    info!(mode = ?cli.mode, ?config, "resolving spans");
    let (summary, mentions) = run(reader, writer, cli.mode, &config, cli.on_error)?;
    info!(
        resolved = summary.resolved,
        skipped = summary.skipped,
        spans = summary.spans,
        "batch finished"
    );

    if let Some(path) = &cli.mentions_output {
        let file = File::create(path)
            .with_context(|| format!("creating mentions output {}", path.display()))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &mentions)?;
        out.flush()?;
        info!(path = %path.display(), "mention counts written");
    }

    Ok(())
}
