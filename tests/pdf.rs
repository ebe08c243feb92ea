use label_sheet::pdf::{FontBook, Info, PdfRenderer};
use label_sheet::{CurrencyTable, LabelRecord, LabelSheet, LabelTypes, MemoryQrCache, QrCodeEncoder};

fn fonts() -> FontBook {
    let mut fonts = FontBook::new();
    fonts
        .load("Helvetica", include_bytes!("../assets/DejaVuSans.ttf").to_vec())
        .unwrap();
    fonts
        .load("Helvetica-Bold", include_bytes!("../assets/DejaVuSans-Bold.ttf").to_vec())
        .unwrap();
    fonts
}

fn types() -> LabelTypes {
    LabelTypes::from_json(
        r#"{
            "S-18475": {
                "name": "Landscape Label",
                "label_width": 2.0, "label_height": 1.0,
                "labels_per_row": 3, "labels_per_column": 8,
                "label_orientation": "landscape",
                "page_width_inch": 8.5, "page_height_inch": 11.0,
                "margin_top": 0.5, "margin_bottom": 0.5,
                "margin_left": 0.5, "margin_right": 0.5,
                "show_product_name": 1,
                "currency": "EUR"
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn renders_a_sheet_to_pdf() {
    let fonts = fonts();
    let types = types();
    let config = types.get("S-18475").unwrap();
    let qr = MemoryQrCache::with_size(QrCodeEncoder, 64);
    let sheet = LabelSheet::new(config, &fonts, &qr, &CurrencyTable::common());

    let records = vec![
        LabelRecord::from_fields(1, "A-1", "Widget with a rather long name", "5", "20").unwrap(),
        LabelRecord::from_fields(2, "B-2", "Gadget", "12.5", "10").unwrap(),
    ];
    let mut renderer = PdfRenderer::for_sheet(config, &fonts);
    let mut info = Info::new();
    info.title("Labels").author("label-sheet tests");
    renderer.set_info(info);

    let summary = sheet.generate(&records, &mut renderer).unwrap();
    assert_eq!(summary.labels, 30);
    assert_eq!(summary.pages, 2);
    assert_eq!(renderer.page_count(), 2);
    assert_eq!(qr.len(), 2);

    let mut out = Vec::new();
    renderer.write(&mut out).unwrap();
    assert!(out.starts_with(b"%PDF"));
}

#[test]
fn renders_a_preview_to_a_file() {
    let fonts = fonts();
    let types = types();
    let config = types.get("S-18475").unwrap();
    let qr = MemoryQrCache::with_size(QrCodeEncoder, 64);
    let sheet = LabelSheet::new(config, &fonts, &qr, &CurrencyTable::common());

    let mut renderer = PdfRenderer::for_preview(config, &fonts);
    sheet.preview(&mut renderer).unwrap();
    assert_eq!(renderer.page_count(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(config.output_file_name(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    renderer.save(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
