//! Generación de reportes PDF
//!
//! Renderiza el registro de una visita y el historial de un período en A4
//! con la fuente Helvetica incorporada. El renderizado es síncrono; el
//! documento no cruza ningún `.await`.

use chrono::{DateTime, FixedOffset, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Pt,
};
use uuid::Uuid;

use crate::models::VisitDetail;
use crate::utils::errors::{AppError, AppResult};

/// Máximo de filas incluidas en el PDF de historial
pub const HISTORY_ROW_LIMIT: i64 = 5000;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 36.0;
const LINE_HEIGHT: f32 = 14.0;
const HEADER_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 10.0;
const COLUMN_SIZE: f32 = 11.0;
const ROW_GAP: f32 = 6.0;
const NAME_MAX_CHARS: usize = 28;
const LAYER: &str = "Layer 1";

/// Columnas del historial (x en puntos)
const COL_ENTRADA: f32 = MARGIN;
const COL_SAIDA: f32 = MARGIN + 140.0;
const COL_PLACA: f32 = MARGIN + 280.0;
const COL_PESSOA: f32 = MARGIN + 360.0;

pub fn visit_report_path(visit_id: Uuid) -> String {
    format!("visits/{}.pdf", visit_id)
}

pub fn history_report_path(start: &str, end: &str) -> String {
    format!("reports/history_{}_{}.pdf", start, end)
}

/// Fecha y hora en el huso de los reportes (dd/mm/aaaa hh:mm:ss)
pub fn format_time(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}

/// Recorta nombres largos para que quepan en la columna
fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_MAX_CHARS {
        let head: String = name.chars().take(NAME_MAX_CHARS - 1).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn pdf_error(err: printpdf::Error) -> AppError {
    AppError::Internal(format!("Erro ao gerar PDF: {}", err))
}

/// Posición en puntos (origen abajo a la izquierda) convertida a milímetros
fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

/// Cursor de escritura sobre el documento; agrega páginas al llegar al margen
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> AppResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, pt(PAGE_WIDTH), pt(PAGE_HEIGHT), LAYER);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn text(&self, text: &str, x: f32, size: f32) {
        self.layer.use_text(text, size, pt(x), pt(self.y), &self.font);
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(pt(PAGE_WIDTH), pt(PAGE_HEIGHT), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(self) -> AppResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

/// Renderizador de reportes con el huso horario configurado
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    offset: FixedOffset,
}

impl ReportRenderer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// "Registro de Visita": filial, persona, placa, entrada y salida
    pub fn render_visit(&self, visit: &VisitDetail) -> AppResult<Vec<u8>> {
        let mut writer = PageWriter::new("Registro de Visita")?;

        let title = "Registro de Visita";
        let title_width = title.chars().count() as f32 * 18.0 * 0.5;
        writer.text(title, (PAGE_WIDTH - title_width) / 2.0, 18.0);
        writer.advance(18.0 + LINE_HEIGHT * 2.0);

        let branch = visit.branch_name.as_deref().unwrap_or("-");
        let person = visit
            .person
            .as_ref()
            .map(|p| p.full_name.as_str())
            .unwrap_or("-");
        let plate = visit
            .vehicle
            .as_ref()
            .map(|v| v.plate.as_str())
            .unwrap_or("-");

        let mut lines = vec![
            format!("Filial: {}", branch),
            format!("Pessoa: {}", person),
            format!("Placa: {}", plate),
            format!("Entrada: {}", format_time(visit.checkin_time, self.offset)),
        ];
        if let Some(checkout) = visit.checkout_time {
            lines.push(format!("Saída: {}", format_time(checkout, self.offset)));
        }

        for line in &lines {
            writer.text(line, MARGIN, 12.0);
            writer.advance(LINE_HEIGHT + 4.0);
        }

        writer.finish()
    }

    /// Tabla de entradas y salidas del período, con saltos de página
    pub fn render_history(
        &self,
        start: &str,
        end: &str,
        visits: &[VisitDetail],
    ) -> AppResult<Vec<u8>> {
        let mut writer = PageWriter::new("Relatório de Entradas e Saídas")?;

        writer.text(
            "Relatório de Entradas e Saídas - Filial Atual",
            MARGIN,
            HEADER_SIZE,
        );
        writer.advance(HEADER_SIZE + 6.0);
        writer.text(&format!("Período: {} a {}", start, end), MARGIN, TEXT_SIZE);
        writer.advance(LINE_HEIGHT + 8.0);

        writer.text("Entrada", COL_ENTRADA, COLUMN_SIZE);
        writer.text("Saída", COL_SAIDA, COLUMN_SIZE);
        writer.text("Placa", COL_PLACA, COLUMN_SIZE);
        writer.text("Pessoa", COL_PESSOA, COLUMN_SIZE);
        writer.advance(LINE_HEIGHT * 2.0 + 2.0);

        if visits.is_empty() {
            writer.text("Nenhum registro no período.", MARGIN, TEXT_SIZE);
            return writer.finish();
        }

        for visit in visits {
            if writer.y < MARGIN + 40.0 {
                writer.new_page();
            }

            let entrada = format_time(visit.checkin_time, self.offset);
            let saida = visit
                .checkout_time
                .map(|t| format_time(t, self.offset))
                .unwrap_or_else(|| "-".to_string());
            let placa = visit
                .vehicle
                .as_ref()
                .map(|v| v.plate.as_str())
                .unwrap_or("-");
            let pessoa = visit
                .person
                .as_ref()
                .map(|p| truncate_name(&p.full_name))
                .unwrap_or_else(|| "-".to_string());

            writer.text(&entrada, COL_ENTRADA, TEXT_SIZE);
            writer.text(&saida, COL_SAIDA, TEXT_SIZE);
            writer.text(placa, COL_PLACA, TEXT_SIZE);
            writer.text(&pessoa, COL_PESSOA, TEXT_SIZE);
            writer.advance(LINE_HEIGHT + ROW_GAP);
        }

        writer.finish()
    }
}
