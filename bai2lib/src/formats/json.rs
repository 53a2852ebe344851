//! Каноническая JSON-выгрузка: фиксированный порядок ключей на каждом уровне
//! (его задаёт порядок полей структур модели), компактный вывод — пригоден
//! для детерминированных диффов и golden-файлов.

use crate::{error::Result, model::Bai2File, traits::WriteFormat};
use std::io::Write;

pub struct Json;

impl WriteFormat for Json {
    fn write<W: Write>(mut w: W, file: &Bai2File) -> Result<()> {
        serde_json::to_writer(&mut w, file)?;
        Ok(())
    }
}

impl Json {
    /// То же дерево с отступами — для глаз, не для диффов.
    pub fn write_pretty<W: Write>(mut w: W, file: &Bai2File) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, file)?;
        Ok(())
    }
}
