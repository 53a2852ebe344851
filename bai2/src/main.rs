use bai2lib::{
    error::{Bai2Error, Result},
    formats::{bai2::Bai2, csv::Csv, json::Json},
    traits::{ReadFormat, WriteFormat},
};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Write};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutFmt {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name="bai2", version, about="Декодирование BAI2-выписок в JSON или CSV")]
struct Cli {
    /// Входной BAI2-файл (по умолчанию stdin)
    #[arg(short='i', long="input")]
    input: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(short='o', long="output")]
    output: Option<String>,

    /// Формат выхода
    #[arg(long="out-format", value_enum)]
    out_format: OutFmt,

    /// JSON с отступами (для --out-format json)
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // reader
    let reader: Box<dyn io::Read> = match cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let file = Bai2::read(BufReader::new(reader))?;

    // writer
    let mut writer: Box<dyn Write> = match cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    match cli.out_format {
        OutFmt::Json if cli.pretty => Json::write_pretty(&mut writer, &file),
        OutFmt::Json => Json::write(&mut writer, &file),
        OutFmt::Csv => Csv::write(&mut writer, &file),
    }?;

    writer.flush().map_err(Bai2Error::from)
}
