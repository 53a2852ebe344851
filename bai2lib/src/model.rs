//! Доменные модели — дерево BAI2-файла: файл → группы → счета → итоги/транзакции.
//!
//! Денежные поля (суммы, контрольные итоги) хранятся строками: BAI2-суммы —
//! масштабированные целые, и точное текстовое представление обязано пережить
//! декодирование без потерь. Для арифметики есть явные `*_decimal`-аксессоры.
//!
//! Порядок полей в структурах фиксирует канонический порядок ключей JSON-выгрузки.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Bai2Error, Result};

/// Непрозрачная funds-type-подструктура (сроки доступности средств).
/// Содержимое не интерпретируется; BTreeMap даёт детерминированный порядок.
pub type FundsType = BTreeMap<String, String>;

/// Итоговая запись по счёту (код 88 до первой транзакции): остатки, обороты.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    pub type_code: String,
    pub amount: String,
    pub item_count: u32,
    pub funds_type: FundsType,
}

/// Транзакция (код 16) с возможными 88-продолжениями свободного текста.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Detail {
    pub type_code: String,
    pub amount: String,
    pub funds_type: FundsType,
    pub bank_reference_number: String,
    pub customer_reference_number: String,
    /// Свободный текст, всегда с ровно одним замыкающим `/`.
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: String,
    /// Код валюты из записи 03; замыкающий `/`-маркер продолжения срезан.
    pub currency_code: String,
    pub summaries: Vec<Summary>,
    pub account_control_total: String,
    pub number_records: u32,
    /// `None` — у счёта не было ни одной записи 16 (в JSON это `null`,
    /// отличимый от пустого списка).
    #[serde(rename = "Details")]
    pub details: Option<Vec<Detail>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub receiver: String,
    pub originator: String,
    pub group_status: u32,
    pub as_of_date: String,
    pub as_of_time: String,
    pub currency_code: String,
    pub as_of_date_modifier: u32,
    pub group_control_total: String,
    pub number_of_accounts: u32,
    pub number_of_records: u32,
    #[serde(rename = "Accounts")]
    pub accounts: Vec<Account>,
}

/// Корень декодированного документа.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bai2File {
    pub sender: String,
    pub receiver: String,
    pub file_created_date: String,
    pub file_created_time: String,
    pub file_id_number: String,
    pub physical_record_length: u32,
    pub block_size: u32,
    pub version_number: u32,
    pub file_control_total: String,
    pub number_of_groups: u32,
    pub number_of_records: u32,
    #[serde(rename = "Groups")]
    pub groups: Vec<Group>,
}

/// Расхождение заявленного в трейлере количества с фактическим.
/// Сообщается, но никогда не «исправляется» молча.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountMismatch {
    Groups { declared: u32, actual: usize },
    Accounts {
        group_index: usize,
        declared: u32,
        actual: usize,
    },
}

impl std::fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountMismatch::Groups { declared, actual } => {
                write!(f, "file declares {declared} groups, found {actual}")
            }
            CountMismatch::Accounts { group_index, declared, actual } => {
                write!(
                    f,
                    "group #{group_index} declares {declared} accounts, found {actual}"
                )
            }
        }
    }
}

fn parse_decimal(what: &str, s: &str) -> Result<Decimal> {
    Decimal::from_str_exact(s.trim()).map_err(|e| Bai2Error::Parse(format!("{what}: {e}")))
}

impl Bai2File {
    /// Структурная проверка контрольных количеств по всему дереву.
    /// Пустой вектор — документ согласован.
    pub fn count_mismatches(&self) -> Vec<CountMismatch> {
        let mut out = Vec::new();
        if self.number_of_groups as usize != self.groups.len() {
            out.push(CountMismatch::Groups {
                declared: self.number_of_groups,
                actual: self.groups.len(),
            });
        }
        for (i, g) in self.groups.iter().enumerate() {
            if g.number_of_accounts as usize != g.accounts.len() {
                out.push(CountMismatch::Accounts {
                    group_index: i,
                    declared: g.number_of_accounts,
                    actual: g.accounts.len(),
                });
            }
        }
        out
    }

    pub fn control_total_decimal(&self) -> Result<Decimal> {
        parse_decimal("file control total", &self.file_control_total)
    }
}

impl Group {
    pub fn control_total_decimal(&self) -> Result<Decimal> {
        parse_decimal("group control total", &self.group_control_total)
    }
}

impl Account {
    pub fn control_total_decimal(&self) -> Result<Decimal> {
        parse_decimal("account control total", &self.account_control_total)
    }
}

impl Summary {
    pub fn amount_decimal(&self) -> Result<Decimal> {
        parse_decimal("summary amount", &self.amount)
    }
}

impl Detail {
    pub fn amount_decimal(&self) -> Result<Decimal> {
        parse_decimal("detail amount", &self.amount)
    }
}
