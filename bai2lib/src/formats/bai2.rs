//! Декодер BAI2: нормализация строк, склейка продолжений, токенизация,
//! иерархический разбор (файл → группы → счета → итоги/транзакции).
//!
//! Разбор максимально «живучий»: третьесторонние банковские фиды не всегда
//! строго соответствуют формату, поэтому фатальны только нарушения
//! позиционной грамматики; осиротевшие трейлеры игнорируются, обрыв входа
//! даёт частичный документ с принудительно закрытыми контекстами.

use crate::{
    error::{Bai2Error, Result},
    model::{Account, Bai2File, Detail, FundsType, Group, Summary},
};
use log::{debug, warn};
use std::io::BufRead;

/// Восемь распознаваемых префиксов кодов записей.
const RECORD_PREFIXES: [&str; 8] = ["01,", "02,", "03,", "16,", "49,", "88,", "98,", "99,"];

fn has_record_prefix(line: &str) -> bool {
    RECORD_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Курсор логических записей: строки обрезаны, продолжения приклеены к
/// предыдущей записи побайтово (без разделителя). Пустая строка обрывает
/// склейку и в запись не попадает. Заглядывание вперёд — ровно одна строка.
struct LogicalRecords {
    lines: Vec<String>,
    pos: usize,
}

impl LogicalRecords {
    fn from_reader<R: BufRead>(r: R) -> Result<Self> {
        let mut lines = Vec::new();
        for line in r.lines() {
            let line = line?;
            lines.push(line.trim().to_string());
        }
        Ok(LogicalRecords { lines, pos: 0 })
    }

    fn next_record(&mut self) -> Option<String> {
        while self.pos < self.lines.len() && self.lines[self.pos].is_empty() {
            self.pos += 1;
        }
        if self.pos >= self.lines.len() {
            return None;
        }
        let mut record = self.lines[self.pos].clone();
        self.pos += 1;
        while self.pos < self.lines.len() {
            let next = &self.lines[self.pos];
            if next.is_empty() || has_record_prefix(next) {
                break;
            }
            record.push_str(next);
            self.pos += 1;
        }
        Some(record)
    }
}

/// Поле по индексу; отсутствующее — пустая строка.
fn field(parts: &[&str], i: usize) -> String {
    parts.get(i).copied().unwrap_or("").to_string()
}

/// Числовое поле: отсутствует или не число — 0, разбор не валится.
fn int_or_zero(parts: &[&str], i: usize) -> u32 {
    parts
        .get(i)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Код 88 перегружен: до первой транзакции счёта это итоговая запись,
/// после — продолжение свободного текста последней транзакции. Различается
/// явным под-состоянием, а не формой полей (минимальная раскладка совпадает).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubState {
    Summary,
    Detail,
}

/// Один экземпляр — один входной поток; контексты группы/счёта держатся
/// владением и при закрытии перемещаются в последовательность родителя.
struct Decoder {
    file: Bai2File,
    group: Option<Group>,
    account: Option<Account>,
    details: Vec<Detail>,
    sub: SubState,
    ordinal: usize,
    done: bool,
}

impl Decoder {
    fn new() -> Self {
        Decoder {
            file: Bai2File::default(),
            group: None,
            account: None,
            details: Vec::new(),
            sub: SubState::Summary,
            ordinal: 0,
            done: false,
        }
    }

    fn structural(&self, parts: &[&str], msg: &str, raw: &str) -> Bai2Error {
        Bai2Error::Structural {
            ordinal: self.ordinal,
            code: field(parts, 0),
            msg: msg.to_string(),
            raw: raw.to_string(),
        }
    }

    /// 01 — заголовок файла.
    fn file_header(&mut self, parts: &[&str], raw: &str) -> Result<()> {
        if parts.len() < 8 {
            return Err(self.structural(parts, "invalid file header", raw));
        }
        self.file.sender = field(parts, 1);
        self.file.receiver = field(parts, 2);
        self.file.file_created_date = field(parts, 3);
        self.file.file_created_time = field(parts, 4);
        self.file.file_id_number = field(parts, 5);
        self.file.physical_record_length = int_or_zero(parts, 6);
        self.file.block_size = int_or_zero(parts, 7);
        self.file.version_number = int_or_zero(parts, 8);
        Ok(())
    }

    /// 02 — заголовок группы. Незакрытая предыдущая группа дозакрывается.
    fn group_header(&mut self, parts: &[&str]) {
        if self.group.is_some() {
            warn!("record {}: group header with open group, force-closing", self.ordinal);
            self.close_account();
            self.close_group();
        }
        self.group = Some(Group {
            receiver: field(parts, 1),
            originator: field(parts, 2),
            group_status: int_or_zero(parts, 3),
            as_of_date: field(parts, 4),
            as_of_time: field(parts, 5),
            currency_code: field(parts, 6),
            as_of_date_modifier: int_or_zero(parts, 7),
            ..Group::default()
        });
        self.sub = SubState::Summary;
    }

    /// 03 — идентификатор счёта. Открытый счёт закрывается первым.
    /// Грамматика проверяется до решения о пропуске: кривая запись фатальна
    /// и вне группы.
    fn account_header(&mut self, parts: &[&str], raw: &str) -> Result<()> {
        if parts.len() < 3 {
            return Err(self.structural(parts, "invalid account identifier", raw));
        }
        if self.group.is_none() {
            debug!("record {}: account identifier outside a group, skipping", self.ordinal);
            return Ok(());
        }
        self.close_account();
        let currency = parts[2].strip_suffix('/').unwrap_or(parts[2]);
        self.account = Some(Account {
            account_number: field(parts, 1),
            currency_code: currency.to_string(),
            ..Account::default()
        });
        self.sub = SubState::Summary;
        Ok(())
    }

    /// 88 — итоговая запись или продолжение текста, по под-состоянию.
    fn continuation(&mut self, parts: &[&str]) {
        let Some(account) = self.account.as_mut() else {
            debug!("record {}: 88 outside an account, skipping", self.ordinal);
            return;
        };
        match self.sub {
            SubState::Summary => {
                account.summaries.push(Summary {
                    type_code: field(parts, 1),
                    amount: field(parts, 2),
                    item_count: int_or_zero(parts, 3),
                    funds_type: FundsType::new(),
                });
            }
            SubState::Detail => {
                // Текст накапливается: срезаем один замыкающий `/`,
                // доклеиваем хвост записи (запятые внутри сохраняются),
                // возвращаем ровно один `/`.
                if let Some(detail) = self.details.last_mut() {
                    if let Some(stripped) = detail.text.strip_suffix('/') {
                        detail.text.truncate(stripped.len());
                    }
                    detail.text.push_str(&parts[1..].join(","));
                    if !detail.text.ends_with('/') {
                        detail.text.push('/');
                    }
                }
            }
        }
    }

    /// 16 — транзакция; хвост с индекса 6 — свободный текст как есть.
    fn transaction_detail(&mut self, parts: &[&str], raw: &str) -> Result<()> {
        if parts.len() < 5 {
            return Err(self.structural(parts, "invalid transaction detail", raw));
        }
        if self.account.is_none() {
            debug!("record {}: 16 outside an account, skipping", self.ordinal);
            return Ok(());
        }
        let mut funds_type = FundsType::new();
        funds_type.insert("type_code".to_string(), field(parts, 3));
        let mut text = if parts.len() > 6 {
            parts[6..].join(",")
        } else {
            String::new()
        };
        if !text.ends_with('/') {
            text.push('/');
        }
        self.details.push(Detail {
            type_code: field(parts, 1),
            amount: field(parts, 2),
            funds_type,
            bank_reference_number: field(parts, 4),
            customer_reference_number: field(parts, 5),
            text,
        });
        self.sub = SubState::Detail;
        Ok(())
    }

    /// 49 — трейлер счёта. Без открытого счёта — no-op.
    fn account_trailer(&mut self, parts: &[&str]) {
        if self.account.is_none() {
            debug!("record {}: orphan account trailer, ignoring", self.ordinal);
            return;
        }
        if let Some(account) = self.account.as_mut() {
            account.account_control_total = field(parts, 1);
            account.number_records = int_or_zero(parts, 2);
        }
        self.close_account();
    }

    /// 98 — трейлер группы. Без открытой группы — no-op.
    fn group_trailer(&mut self, parts: &[&str]) {
        if self.group.is_none() {
            debug!("record {}: orphan group trailer, ignoring", self.ordinal);
            return;
        }
        self.close_account();
        if let Some(group) = self.group.as_mut() {
            group.group_control_total = field(parts, 1);
            group.number_of_accounts = int_or_zero(parts, 2);
            group.number_of_records = int_or_zero(parts, 3);
        }
        self.close_group();
    }

    /// 99 — трейлер файла; терминален. Всё ещё открытое дозакрывается.
    fn file_trailer(&mut self, parts: &[&str], raw: &str) -> Result<()> {
        if parts.len() < 4 {
            return Err(self.structural(parts, "invalid file trailer", raw));
        }
        self.close_account();
        self.close_group();
        self.file.file_control_total = field(parts, 1);
        self.file.number_of_groups = int_or_zero(parts, 2);
        self.file.number_of_records = int_or_zero(parts, 3);
        self.done = true;
        Ok(())
    }

    /// Перемещает открытый счёт в текущую группу. Трейлерные поля, если
    /// были, уже проставлены; при принудительном закрытии остаются пустыми.
    fn close_account(&mut self) {
        if let Some(mut account) = self.account.take() {
            if !self.details.is_empty() {
                account.details = Some(std::mem::take(&mut self.details));
            }
            if let Some(group) = self.group.as_mut() {
                group.accounts.push(account);
            }
        }
        self.details.clear();
        self.sub = SubState::Summary;
    }

    /// Перемещает открытую группу в документ.
    fn close_group(&mut self) {
        if let Some(group) = self.group.take() {
            self.file.groups.push(group);
        }
    }

    fn dispatch(&mut self, record: &str) -> Result<()> {
        self.ordinal += 1;
        if record.len() < 3 {
            debug!("record {}: too short, skipping", self.ordinal);
            return Ok(());
        }
        let parts: Vec<&str> = record.split(',').collect();
        match parts[0] {
            "01" => self.file_header(&parts, record)?,
            "02" => self.group_header(&parts),
            "03" => self.account_header(&parts, record)?,
            "88" => self.continuation(&parts),
            "16" => self.transaction_detail(&parts, record)?,
            "49" => self.account_trailer(&parts),
            "98" => self.group_trailer(&parts),
            "99" => self.file_trailer(&parts, record)?,
            other => debug!("record {}: unrecognized code {other:?}, skipping", self.ordinal),
        }
        Ok(())
    }

    fn finish(mut self) -> Bai2File {
        if !self.done && (self.account.is_some() || self.group.is_some()) {
            warn!("input ended with open contexts, force-closing (truncated feed?)");
            self.close_account();
            self.close_group();
        }
        for m in self.file.count_mismatches() {
            warn!("control count mismatch: {m}");
        }
        self.file
    }
}

pub struct Bai2;

impl crate::traits::ReadFormat for Bai2 {
    fn read<R: BufRead>(r: R) -> Result<Bai2File> {
        let mut records = LogicalRecords::from_reader(r)?;
        let mut decoder = Decoder::new();
        while let Some(record) = records.next_record() {
            decoder.dispatch(&record)?;
            if decoder.done {
                break;
            }
        }
        Ok(decoder.finish())
    }
}
