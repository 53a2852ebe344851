//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Bai2Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Нарушение позиционной грамматики: в записи нет обязательного поля.
    /// Фатально для всего файла; несёт порядковый номер логической записи,
    /// код записи и её исходный текст.
    #[error("structural error at record {ordinal} (code {code}): {msg}: {raw}")]
    Structural {
        ordinal: usize,
        code: String,
        msg: String,
        raw: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Bai2Error>;
