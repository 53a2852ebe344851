//! Табличная выгрузка транзакций: по строке на запись 16, сумма раскладывается
//! в колонку Spent или Received по таблице классификации кодов типов.
//! Таблица принадлежит вызывающей стороне; встроенная — лишь значение по умолчанию.

use crate::{error::Result, model::Bai2File, traits::WriteFormat};
use csv::WriterBuilder;
use std::io::Write;

const HEADER: [&str; 7] = [
    "Account Number",
    "Transaction Date",
    "Description",
    "Payee",
    "Category Or Match",
    "Spent",
    "Received",
];

/// Классификация кодов типов транзакций по колонкам выгрузки.
#[derive(Debug, Clone)]
pub struct Classification {
    pub spent: Vec<String>,
    pub received: Vec<String>,
}

impl Default for Classification {
    fn default() -> Self {
        Classification {
            spent: vec!["142".into(), "451".into(), "475".into()],
            received: vec!["201".into(), "495".into(), "501".into()],
        }
    }
}

impl Classification {
    /// (spent, received) для данного кода; неклассифицированный код — обе пустые.
    fn route<'a>(&self, type_code: &str, amount: &'a str) -> (&'a str, &'a str) {
        if self.spent.iter().any(|c| c == type_code) {
            (amount, "")
        } else if self.received.iter().any(|c| c == type_code) {
            ("", amount)
        } else {
            ("", "")
        }
    }
}

#[derive(serde::Serialize)]
struct Row<'a> {
    account_number: &'a str,
    transaction_date: &'a str,
    description: &'a str,
    payee: &'a str,
    category: &'a str,
    spent: &'a str,
    received: &'a str,
}

pub struct Csv;

impl Csv {
    /// Выгрузка с заданной таблицей классификации. Дата транзакции — asOfDate
    /// группы-владельца: позиционное соответствие Detail ↔ группа обязано
    /// сохраняться (порядок обхода фиксирован порядком в документе).
    pub fn write_with<W: Write>(mut w: W, file: &Bai2File, table: &Classification) -> Result<()> {
        let mut wrt = WriterBuilder::new().has_headers(false).from_writer(&mut w);
        wrt.write_record(HEADER)?;

        for group in &file.groups {
            for account in &group.accounts {
                for detail in account.details.as_deref().unwrap_or(&[]) {
                    let (spent, received) = table.route(&detail.type_code, &detail.amount);
                    wrt.serialize(Row {
                        account_number: &account.account_number,
                        transaction_date: &group.as_of_date,
                        description: &detail.text,
                        payee: "",
                        category: "",
                        spent,
                        received,
                    })?;
                }
            }
        }
        wrt.flush()?;
        Ok(())
    }
}

impl WriteFormat for Csv {
    fn write<W: Write>(w: W, file: &Bai2File) -> Result<()> {
        Csv::write_with(w, file, &Classification::default())
    }
}
