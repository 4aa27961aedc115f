//! Secuencia fija de campos compartida por el reporte de texto y el libro detallado.

use crate::formatting::{amount_to_words, format_currency, long_date_es, or_na, yes_no};
use crate::models::{HeaderContext, LineItem, NOT_AVAILABLE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// Título de sección en mayúsculas, sin los dos puntos.
    Section(&'static str),
    /// Etiqueta y valor en la misma fila.
    Field { label: &'static str, value: String },
    /// Valor largo que va en la fila siguiente a su etiqueta.
    Long { label: &'static str, value: String },
}

impl ReportLine {
    fn field(label: &'static str, value: impl Into<String>) -> Self {
        ReportLine::Field {
            label,
            value: value.into(),
        }
    }

    fn long(label: &'static str, value: impl Into<String>) -> Self {
        ReportLine::Long {
            label,
            value: value.into(),
        }
    }
}

pub fn header_lines(header: Option<&HeaderContext>) -> Vec<ReportLine> {
    let Some(header) = header else {
        return ["Destinatario", "Gestor", "Fecha", "Número NE", "Referencia"]
            .into_iter()
            .map(|label| ReportLine::field(label, NOT_AVAILABLE))
            .collect();
    };

    vec![
        ReportLine::field("Destinatario", or_na(header.recipient.as_deref())),
        ReportLine::field("Gestor", or_na(Some(&header.manager))),
        ReportLine::field("Fecha", long_date_es(header.date)),
        ReportLine::field("Número NE", or_na(Some(&header.tracking_code))),
        ReportLine::field("Referencia", or_na(header.reference.as_deref())),
    ]
}

pub fn item_lines(item: &LineItem) -> Vec<ReportLine> {
    let data = &item.data;

    let words = match data.amount_in_words.as_deref().map(str::trim) {
        Some(words) if !words.is_empty() => words.to_string(),
        _ => or_na(Some(&amount_to_words(data.amount.as_ref(), data.currency.as_ref()))),
    };

    let mut lines = vec![
        ReportLine::Section("DATOS DE LA SOLICITUD"),
        ReportLine::field("ID", item.id.clone()),
        ReportLine::field("Monto", format_currency(data.amount.as_ref(), data.currency.as_ref())),
        ReportLine::field("Moneda", or_na(data.currency.as_ref().map(|c| c.label()))),
        ReportLine::long("Monto en letras", words),
        ReportLine::field("Consignatario", or_na(data.consignee.as_deref())),
        ReportLine::field("No. de Declaración", or_na(data.declaration_number.as_deref())),
        ReportLine::field("Código Aduanero", or_na(data.customs_code.as_deref())),
        ReportLine::field("Código de Referencia", or_na(data.reference_code.as_deref())),
        ReportLine::Section("DATOS BANCARIOS"),
        ReportLine::field(
            "Banco",
            data.bank
                .as_ref()
                .map(|bank| bank.display())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ];

    if !data.suppresses_account() {
        lines.push(ReportLine::field("No. de Cuenta", or_na(data.account_number.as_deref())));
        lines.push(ReportLine::field(
            "Moneda de la Cuenta",
            data.account_currency
                .as_ref()
                .map(|currency| currency.display())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
    }

    lines.extend([
        ReportLine::Section("BENEFICIARIOS"),
        ReportLine::field("Beneficiario (Cheque)", or_na(data.check_payee.as_deref())),
        ReportLine::field("Beneficiario (Transferencia)", or_na(data.transfer_payee.as_deref())),
        ReportLine::Section("DOCUMENTACIÓN FISCAL"),
        ReportLine::field("Pago de Impuestos", yes_no(data.tax_payment)),
    ]);
    if data.tax_payment {
        lines.push(ReportLine::field(
            "Referencia de Pago",
            or_na(data.tax_payment_reference.as_deref()),
        ));
    }
    lines.push(ReportLine::field(
        "Comprobante de Pago Adjunto",
        yes_no(data.tax_receipt_attached),
    ));

    lines.push(ReportLine::field("Constancia de No Retención", yes_no(data.no_withholding)));
    if data.no_withholding {
        lines.push(ReportLine::field(
            "No. de Constancia",
            or_na(data.certificate_number.as_deref()),
        ));
        lines.push(ReportLine::field(
            "Constancia Vigente",
            data.certificate_valid.map(yes_no).unwrap_or(NOT_AVAILABLE),
        ));
    }
    lines.push(ReportLine::field("Constancia Adjunta", yes_no(data.certificate_attached)));

    lines.extend([
        ReportLine::Section("NOTIFICACIONES"),
        ReportLine::long("Correos de Notificación", or_na(Some(&data.emails_display()))),
        ReportLine::long("Observación", or_na(data.observation.as_deref())),
    ]);

    lines
}
