//! CSV exports.
//!
//! Both exports use CRLF line endings and minimal quoting.

use super::ReportError;
use crate::models::{DashboardData, Table};
use csv::{Terminator, WriterBuilder};

/// Download name of the summary export.
pub const SUMMARY_FILE_NAME: &str = "CERIA_SKM_Ringkasan.csv";

/// Download name of the full export.
pub const FULL_FILE_NAME: &str = "CERIA_SKM_DataPenuh.csv";

fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.flexible(true).terminator(Terminator::CRLF);
    builder
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ReportError> {
    writer.into_inner().map_err(|e| ReportError::Io(e.into_error()))
}

/// One row per question, a blank row, then the overall row.
///
/// The blank row is a bare terminator written between two writers; an
/// empty record would come out as `""`.
pub fn summary_csv(data: &DashboardData) -> Result<Vec<u8>, ReportError> {
    let mut out = Vec::new();

    {
        let mut w = builder().from_writer(&mut out);
        w.write_record(["Pertanyaan", "Rata-rata", "Keterangan"])?;
        for (label, avg, remark) in data.questions() {
            let avg = format!("{:.2}", avg);
            w.write_record([label, avg.as_str(), remark.label()])?;
        }
        w.flush()?;
    }

    out.extend_from_slice(b"\r\n");

    {
        let mut w = builder().from_writer(&mut out);
        let overall = format!("{:.2}", data.overall);
        w.write_record([
            "Rata-rata Keseluruhan",
            overall.as_str(),
            data.overall_remark.label(),
        ])?;
        w.flush()?;
    }

    Ok(out)
}

/// Header row followed by every data row, right-padded to header width.
pub fn full_csv(table: &Table) -> Result<Vec<u8>, ReportError> {
    let mut w = builder().from_writer(Vec::new());
    w.write_record(&table.headers)?;

    for row in &table.rows {
        w.write_record(&table.pad_row(row))?;
    }

    finish(w)
}
