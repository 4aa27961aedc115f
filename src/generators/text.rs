use super::lines::{header_lines, item_lines, ReportLine};
use super::{export_filename, ExportFile, ReportKind};
use crate::models::{HeaderContext, LineItem};

const TITLE: &str = "SOLICITUDES DE CHEQUE / TRANSFERENCIA";
const RULE: &str = "========================================";

/// Reporte de texto plano. Misma entrada, mismos bytes.
pub fn text_report(header: Option<&HeaderContext>, items: &[LineItem]) -> String {
    let mut out: Vec<String> = vec![TITLE.to_string()];
    out.extend(header_lines(header).iter().map(render_line));
    out.push(format!("Total de solicitudes: {}", items.len()));

    if items.is_empty() {
        out.push(String::new());
        out.push("Sin solicitudes registradas.".to_string());
    }

    for (index, item) in items.iter().enumerate() {
        out.push(String::new());
        out.push(RULE.to_string());
        out.push(format!("SOLICITUD {}", index + 1));
        out.push(RULE.to_string());

        for (position, line) in item_lines(item).iter().enumerate() {
            if matches!(line, ReportLine::Section(_)) && position > 0 {
                out.push(String::new());
            }
            out.push(render_line(line));
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn render_line(line: &ReportLine) -> String {
    match line {
        ReportLine::Section(title) => format!("{}:", title),
        ReportLine::Field { label, value } | ReportLine::Long { label, value } => {
            format!("{}: {}", label, value)
        }
    }
}

pub struct TextReportGenerator;

impl TextReportGenerator {
    pub fn generate(header: Option<&HeaderContext>, items: &[LineItem], today: chrono::NaiveDate) -> ExportFile {
        let tracking_code = header.map(|h| h.tracking_code.as_str());
        let date = header.map(|h| h.date).unwrap_or(today);

        ExportFile {
            filename: export_filename(ReportKind::TextReport, tracking_code, date),
            content_type: ReportKind::TextReport.content_type(),
            bytes: text_report(header, items).into_bytes(),
        }
    }
}
