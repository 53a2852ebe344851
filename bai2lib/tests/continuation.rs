use bai2lib::{formats::bai2::Bai2, traits::ReadFormat};
use std::io::Cursor;

fn wrap(detail_lines: &str) -> String {
    format!(
        "01,SENDER,RECV,250711,0100,FILEID,80,1,2\n\
         02,RECV,ORIG,1,250711,0100,USD,0\n\
         03,ACCT123,USD/\n\
         {detail_lines}\n\
         49,10000,2\n\
         98,10000,1,4\n\
         99,10000,1,6\n"
    )
}

/// Склейка продолжений ассоциативна: одна логическая запись, разрезанная на
/// 1, 2 или 3 последовательные строки без кода записи, декодируется одинаково.
#[test]
fn merge_is_associative() {
    let whole = wrap("16,201,10000,,BANKREF,CUSTREF,Transfer to savings/");
    let in_two = wrap("16,201,10000,,BANKREF,CUSTREF,Transf\ner to savings/");
    let in_three = wrap("16,201,10000,,BANKREF,CUSTREF,Transf\ner to sav\nings/");

    let base = Bai2::read(Cursor::new(whole)).expect("read whole");
    for split in [in_two, in_three] {
        let file = Bai2::read(Cursor::new(split)).expect("read split");
        assert_eq!(file, base);
        assert_eq!(
            file.groups[0].accounts[0].details.as_deref().unwrap()[0].text,
            "Transfer to savings/"
        );
    }
}

/// Запятые внутри свободного текста переживают и токенизацию, и склейку.
#[test]
fn embedded_commas_survive() {
    let input = wrap("16,201,10000,,BANKREF,CUSTREF,Rent, July, unit 5/");
    let file = Bai2::read(Cursor::new(input)).expect("read");
    assert_eq!(
        file.groups[0].accounts[0].details.as_deref().unwrap()[0].text,
        "Rent, July, unit 5/"
    );
}

/// 88 внутри транзакции строго дописывает текст, ничего не заменяя,
/// и терминатор `/` никогда не задваивается.
#[test]
fn detail_continuation_appends() {
    let input = wrap(
        "16,201,10000,,BANKREF,CUSTREF,part one/\n\
         88,part two/\n\
         88,part three/",
    );
    let file = Bai2::read(Cursor::new(input)).expect("read");
    let text = &file.groups[0].accounts[0].details.as_deref().unwrap()[0].text;

    assert_eq!(text, "part onepart twopart three/");
    assert!(text.ends_with('/'));
    assert!(!text.ends_with("//"));
}

#[test]
fn detail_continuation_keeps_commas() {
    let input = wrap(
        "16,201,10000,,BANKREF,CUSTREF,invoice 12/\n\
         88,items: 3, total: 10000/",
    );
    let file = Bai2::read(Cursor::new(input)).expect("read");
    assert_eq!(
        file.groups[0].accounts[0].details.as_deref().unwrap()[0].text,
        "invoice 12items: 3, total: 10000/"
    );
}

/// Пустая строка обрывает склейку: строка без кода записи после пустой
/// к предыдущей записи уже не приклеивается.
#[test]
fn blank_line_ends_merge() {
    let input = wrap("16,201,10000,,BANKREF,CUSTREF,part one/\n\nstray continuation");
    let file = Bai2::read(Cursor::new(input)).expect("read");
    let details = file.groups[0].accounts[0].details.as_deref().unwrap();
    // хвост стал отдельной записью с нераспознанным кодом и выброшен
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].text, "part one/");
}

/// Без пустой строки тот же хвост приклеивается — контроль к предыдущему тесту.
#[test]
fn unprefixed_line_merges_without_blank() {
    let input = wrap("16,201,10000,,BANKREF,CUSTREF,part one/\nstray continuation");
    let file = Bai2::read(Cursor::new(input)).expect("read");
    assert_eq!(
        file.groups[0].accounts[0].details.as_deref().unwrap()[0].text,
        "part one/stray continuation/"
    );
}

/// Текст без терминатора в источнике получает ровно один `/`.
#[test]
fn missing_terminator_is_added() {
    let input = wrap("16,201,10000,,BANKREF,CUSTREF,no slash here");
    let file = Bai2::read(Cursor::new(input)).expect("read");
    assert_eq!(
        file.groups[0].accounts[0].details.as_deref().unwrap()[0].text,
        "no slash here/"
    );
}
