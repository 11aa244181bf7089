#![no_main]

use charcsv::{Reader, Writer};
use libfuzzer_sys::fuzz_target;

fn read(text: &str) -> Vec<Vec<String>> {
    Reader::from_text(text)
        .into_rows()
        .map(|row| row.unwrap().to_vec())
        .collect()
}

fn write(rows: &[Vec<String>]) -> String {
    let mut wtr = Writer::from_sink(String::new());
    wtr.write_rows(rows).unwrap();
    wtr.into_inner()
}

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is rejected by the source before it reaches the parser.
    let mut bytes = Reader::from_reader(data);
    for row in bytes.rows() {
        if row.is_err() {
            break;
        }
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let rows = read(text);
        let canonical = write(&rows);
        assert_eq!(read(&canonical), rows);
        assert_eq!(write(&read(&canonical)), canonical);
    }
});
