//! Свойства на сгенерированных фикстурах: на корректном входе заявленные
//! количества сходятся с фактическими, на оборванном декодер всё равно
//! возвращает частичный документ.

use bai2lib::{formats::bai2::Bai2, traits::ReadFormat};
use proptest::prelude::*;
use std::io::Cursor;

/// Форма файла: группы → счета → количество транзакций в каждом счёте.
type Shape = Vec<Vec<usize>>;

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop::collection::vec(prop::collection::vec(0usize..4, 1..4), 1..4)
}

/// Корректный BAI2-файл заданной формы, с согласованными трейлерами.
fn well_formed_lines(shape: &Shape) -> Vec<String> {
    let mut lines = vec!["01,SENDER,RECV,250711,0100,FILEID,80,1,2".to_string()];
    for (gi, accounts) in shape.iter().enumerate() {
        lines.push(format!("02,RECV,ORIG,1,2507{:02},0100,USD,0", gi + 1));
        for (ai, &ndetails) in accounts.iter().enumerate() {
            lines.push(format!("03,ACCT{gi}{ai},USD/"));
            for di in 0..ndetails {
                lines.push(format!("16,201,{},,REF{di},,tx {di} of ACCT{gi}{ai}/", (di + 1) * 100));
            }
            lines.push(format!("49,0,{}", ndetails + 2));
        }
        lines.push(format!("98,0,{},0", accounts.len()));
    }
    lines.push(format!("99,0,{},0", shape.len()));
    lines
}

proptest! {
    /// На корректном входе дерево в точности повторяет форму,
    /// контрольные количества сходятся.
    #[test]
    fn well_formed_counts_reconcile(shape in shape_strategy()) {
        let input = well_formed_lines(&shape).join("\n");
        let file = Bai2::read(Cursor::new(input)).expect("read");

        prop_assert!(file.count_mismatches().is_empty());
        prop_assert_eq!(file.number_of_groups as usize, file.groups.len());
        prop_assert_eq!(file.groups.len(), shape.len());
        for (group, accounts) in file.groups.iter().zip(&shape) {
            prop_assert_eq!(group.number_of_accounts as usize, group.accounts.len());
            prop_assert_eq!(group.accounts.len(), accounts.len());
            for (account, &ndetails) in group.accounts.iter().zip(accounts) {
                let actual = account.details.as_deref().map_or(0, <[_]>::len);
                prop_assert_eq!(actual, ndetails);
            }
        }
    }

    /// Обрыв на любой границе строки (заголовок файла цел) декодируется
    /// без ошибки в частичный документ не больше исходного.
    #[test]
    fn truncated_input_still_decodes(shape in shape_strategy(), frac in 0.0f64..1.0) {
        let lines = well_formed_lines(&shape);
        let cut = 1 + ((lines.len() - 1) as f64 * frac) as usize;
        let input = lines[..cut].join("\n");

        let file = Bai2::read(Cursor::new(input)).expect("partial read");
        prop_assert!(file.groups.len() <= shape.len());
        for group in &file.groups {
            prop_assert!(group.accounts.len() <= 3);
        }
    }
}
