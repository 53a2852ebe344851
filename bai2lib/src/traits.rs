//! Унифицированные трэйты чтения/записи на основе std::io::{BufRead, Write}.
//!
//! BAI2 читается, JSON/CSV пишутся; формата с обоими направлениями нет.

use crate::{error::Result, model::Bai2File};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Bai2File>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, file: &Bai2File) -> Result<()>;
}
