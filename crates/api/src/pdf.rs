//! PDF rendering for monthly bills.
//!
//! Pure presentation: the renderer formats a [`MonthlyStatement`] into an A4
//! document and never recomputes totals. Layout is a fixed seven-column
//! table; rows that overflow the page continue on a fresh page with the
//! table header repeated.

use milkbook_core::billing::MonthlyStatement;
use milkbook_core::ledger::EntryKind;
use milkbook_db::models::seller::SellerBasic;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

/// Error produced while assembling the PDF document.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("pdf generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

const PAGE_WIDTH: f32 = 210.0; // A4, mm
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 6.0;
/// Start a new page when the cursor drops below this line.
const PAGE_FLOOR: f32 = 25.0;

/// Left edge of each column: Date, Qty(L), Price/L, Fat, Type, Total, Note.
const COLUMNS: [f32; 7] = [15.0, 43.0, 66.0, 89.0, 107.0, 131.0, 158.0];

/// Render the monthly bill for one customer.
///
/// Missing seller details render as `-` placeholders; leave days render as a
/// row of dashes with a `holiday` note.
pub fn render_monthly_bill(
    seller: Option<&SellerBasic>,
    customer_name: &str,
    customer_phone: &str,
    statement: &MonthlyStatement,
) -> Result<Vec<u8>, PdfError> {
    let (doc, page, layer) = PdfDocument::new(
        "Milk Service - Monthly Bill",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    // Title.
    layer.use_text("Milk Service - Monthly Bill", 16.0, Mm(62.0), Mm(y), &bold);
    y -= 10.0;

    // Header block.
    let (seller_name, seller_phone) = match seller {
        Some(s) => (s.name.as_str(), s.phone.as_str()),
        None => ("-", "-"),
    };
    let display = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    layer.use_text(
        format!("Month     : {}", statement.month.label()),
        11.0,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= 5.5;
    layer.use_text(
        format!("Seller    : {}  ({})", display(seller_name), display(seller_phone)),
        11.0,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= 5.5;
    layer.use_text(
        format!(
            "Customer  : {}  ({})",
            display(customer_name),
            display(customer_phone)
        ),
        11.0,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= 9.0;

    // Table.
    table_header(&layer, &bold, y);
    y -= ROW_HEIGHT;

    for entry in &statement.entries {
        if y < PAGE_FLOOR {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN;
            table_header(&layer, &bold, y);
            y -= ROW_HEIGHT;
        }

        let date = entry.date.format("%d/%m/%Y").to_string();
        let cells: [String; 7] = match &entry.kind {
            EntryKind::Leave => [
                date,
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "holiday".into(),
            ],
            EntryKind::Delivery(d) => [
                date,
                d.quantity.normalize().to_string(),
                d.price_per_litre.normalize().to_string(),
                d.fat.normalize().to_string(),
                d.milk_type.to_string(),
                format!("{:.2}", d.total),
                if d.sent { "received".into() } else { String::new() },
            ],
        };
        text_row(&layer, &font, 10.0, y, &cells);
        y -= ROW_HEIGHT;
    }

    // Footer totals.
    y -= 1.0;
    rule(&layer, y);
    y -= 7.0;
    layer.use_text(
        format!("Total litres: {:.2} L", statement.total_litres),
        12.0,
        Mm(MARGIN),
        Mm(y),
        &bold,
    );
    y -= 6.5;
    layer.use_text(
        format!("Total amount: {:.2}", statement.total_amount),
        12.0,
        Mm(MARGIN),
        Mm(y),
        &bold,
    );

    Ok(doc.save_to_bytes()?)
}

/// Write the column captions and the rule under them.
fn table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
    let captions = ["Date", "Qty(L)", "Price/L", "Fat", "Type", "Total", "Note"];
    for (caption, x) in captions.iter().zip(COLUMNS) {
        layer.use_text(*caption, 11.0, Mm(x), Mm(y), bold);
    }
    rule(layer, y - 2.0);
}

/// Write one table row, one cell per column.
fn text_row(layer: &PdfLayerReference, font: &IndirectFontRef, size: f32, y: f32, cells: &[String; 7]) {
    for (cell, x) in cells.iter().zip(COLUMNS) {
        layer.use_text(cell.as_str(), size, Mm(x), Mm(y), font);
    }
}

/// Horizontal rule across the content width.
fn rule(layer: &PdfLayerReference, y: f32) {
    let line = Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    };
    layer.set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
    layer.set_outline_thickness(0.5);
    layer.add_line(line);
}
