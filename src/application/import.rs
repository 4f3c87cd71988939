use crate::domain::CertificateRecord;
use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"\d{4}").expect("valid year pattern");
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse a bulk-import CSV into registry records.
///
/// Recognized headers (case-insensitive): `register_number` or `usn`,
/// `student_name`, and optionally `semester`, `exam_month_year`,
/// `total_marks`, `class_or_result`, `college`. Rows missing the identifier
/// or the name are skipped silently; nothing is rejected loudly.
pub fn import_csv(text: &str) -> Result<Vec<CertificateRecord>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;

        let field = |name: &str| -> Option<&str> {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|idx| row.get(idx))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let certificate_id = field("register_number").or_else(|| field("usn"));
        let student_name = field("student_name");

        let (certificate_id, student_name) = match (certificate_id, student_name) {
            (Some(id), Some(name)) => (id, name),
            _ => continue,
        };

        let semester = field("semester");
        let date_str = field("exam_month_year");
        let graduation_year = date_str
            .and_then(|d| YEAR_RE.find(d))
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or_else(|| chrono::Utc::now().year());

        let degree_name = semester
            .map(|s| format!("Semester {}", s))
            .unwrap_or_else(|| "University Result".to_string());

        let mut record = CertificateRecord::new(
            certificate_id,
            student_name,
            &degree_name,
            field("college").unwrap_or("University"),
            graduation_year,
            date_str.unwrap_or(""),
        );
        record.semester = semester.map(str::to_string);
        record.total_marks = field("total_marks").map(str::to_string);
        record.result_status = field("class_or_result").map(str::to_string);

        records.push(record);
    }

    Ok(records)
}
