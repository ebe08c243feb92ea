use label_sheet::pdf::{FontBook, Info, PdfRenderer};
use label_sheet::{aggregate, CurrencyTable, DirQrCache, LabelRecord, LabelSheet, LabelTypes, QrCodeEncoder};

fn main() {
    let types = LabelTypes::from_json(
        r#"{
            "S-18475": {
                "name": "Landscape Label",
                "label_width": 2.0, "label_height": 1.0,
                "labels_per_row": 3, "labels_per_column": 8,
                "label_orientation": "landscape",
                "page_width_inch": 8.5, "page_height_inch": 11.0,
                "margin_top": 0.5, "margin_bottom": 0.5,
                "margin_left": 0.5, "margin_right": 0.5,
                "qrcode_x_offset": 0.1, "qrcode_y_offset": 0.1,
                "sku_x_offset": 0.9, "sku_y_offset": 0.1,
                "show_product_name": 1,
                "product_name_x_offset": 0.9, "product_name_y_offset": 0.3,
                "product_name_auto_fit_min_font_size": 5,
                "product_name_auto_fit_max_height": 0.5,
                "price_x_offset": 1.85, "price_y_offset": 0.5,
                "currency": "EUR"
            }
        }"#,
    )
    .expect("valid label types");
    let config = types.get("S-18475").expect("label type exists");

    // the label type asks for Helvetica; any TrueType font will do
    let mut fonts = FontBook::new();
    fonts
        .load("Helvetica", include_bytes!("../assets/DejaVuSans.ttf").to_vec())
        .expect("can load font");
    fonts
        .load("Helvetica-Bold", include_bytes!("../assets/DejaVuSans-Bold.ttf").to_vec())
        .expect("can load font");

    // QR codes are cached on disk between runs
    let qr = DirQrCache::new("qr-cache", QrCodeEncoder).expect("can create QR cache");

    let rows = vec![
        LabelRecord::from_fields(1, "HW-0001", "Hex bolt M6 x 40 zinc plated", "0.35", "12"),
        LabelRecord::from_fields(2, "HW-0002", "Wood screw", "0.10", "30"),
        LabelRecord::from_fields(3, "HW-0001", "Hex bolt M6 x 40 zinc plated", "0.35", "6"),
        LabelRecord::from_fields(4, "HW-0003", "Spring washer", "free", "5"),
    ];
    let aggregation = aggregate(rows);
    for skipped in &aggregation.skipped {
        println!("skipped: {skipped}");
    }

    let sheet = LabelSheet::new(config, &fonts, &qr, &CurrencyTable::common());
    let mut renderer = PdfRenderer::for_sheet(config, &fonts);
    let mut info = Info::new();
    info.title(&config.display_name).subject("Item labels");
    renderer.set_info(info);

    let summary = sheet
        .generate(&aggregation.records, &mut renderer)
        .expect("can lay out labels");
    println!("{} labels on {} pages", summary.labels, summary.pages);

    let file_name = config.output_file_name(chrono::Local::now().date_naive());
    renderer.save(&file_name).expect("can write PDF");
    println!("wrote {file_name}");

    // and a preview of a single label
    let mut preview = PdfRenderer::for_preview(config, &fonts);
    sheet.preview(&mut preview).expect("can lay out preview");
    preview.save("preview.pdf").expect("can write PDF");
}
