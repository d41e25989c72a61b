use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use oficio::{
    export_file_name, render_pdf, DocumentRecord, DocumentType, Image, OfficialConstants,
    PdfExporter, RenderStamp, Settings,
};

const OFICIO_JSON: &str = r#"{
    "documentType": "Oficio",
    "documentNumber": "OFICIO N.° 0231-2025-MRE/DGC",
    "cityAndDate": "Lima, 2 de junio de 2025",
    "urgency": "Urgente",
    "recipientName": "Carlos Quispe",
    "recipientTitle": "Embajador",
    "recipientEntity": "Embajada del Perú en Chile",
    "senderName": "María Salas",
    "senderTitle": "Directora General de Comunidades Peruanas en el Exterior",
    "senderEntity": "Ministerio de Relaciones Exteriores",
    "subject": "Coordinación de la visita oficial",
    "bodyParagraphs": [
        "Tengo el honor de dirigirme a usted para coordinar la visita oficial.",
        "Hago propicia la oportunidad para renovarle las seguridades de mi consideración."
    ],
    "reference": "Mensaje N.° 12-2025"
}"#;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn oficio() -> DocumentRecord {
    DocumentRecord::from_json(OFICIO_JSON, &OfficialConstants::default()).expect("valid oficio")
}

fn stamp() -> RenderStamp {
    RenderStamp::now().with_seed(2025)
}

/// The page count written into the page tree
fn page_count(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    let start = text.find("/Count ").expect("page tree present") + "/Count ".len();
    text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .expect("numeric count")
}

#[test]
fn exports_a_pdf() {
    init();
    let bytes = render_pdf(
        &oficio(),
        &Settings::default(),
        PdfExporter::with_standard_fonts(),
        stamp(),
    )
    .expect("can render");
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Times-Roman"));
    assert!(text.contains("/Helvetica-Bold"));
    assert_eq!(page_count(&bytes), 1);
    // the footer is drawn once and shared by every page
    assert!(text.contains("/Subtype /Form"));
}

#[test]
fn long_documents_span_several_pages() {
    init();
    let paragraphs: Vec<String> = (1..=14)
        .map(|n| format!("{n}. {}", lipsum::lipsum(110)))
        .collect();
    let record = DocumentRecord::builder(DocumentType::InformeTecnico)
        .document_number("INFORME TÉCNICO N.° 9-2025-MRE/OGTI")
        .recipient("Ana Torres", "Directora", "")
        .sender("Luis Paredes", "Jefe de la Oficina de Tecnologías", "")
        .subject("Estado de la red institucional")
        .body(paragraphs)
        .build()
        .expect("valid record");

    let bytes = render_pdf(
        &record,
        &Settings::default(),
        PdfExporter::with_standard_fonts(),
        stamp(),
    )
    .expect("can render");
    assert!(page_count(&bytes) > 1);
}

#[test]
fn letterhead_image_is_embedded() {
    let logo = RgbaImage::from_pixel(120, 30, Rgba([150, 0, 0, 255]));
    let mut png = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(logo)
        .write_to(&mut png, ImageFormat::Png)
        .expect("can encode png");

    let mut exporter = PdfExporter::with_standard_fonts();
    exporter.set_logo(Image::from_bytes(png.into_inner()).expect("valid image"));
    let bytes = render_pdf(&oficio(), &Settings::default(), exporter, stamp()).expect("can render");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Subtype /Image"));
}

#[test]
fn writes_under_the_document_number() {
    let dir = tempfile::tempdir().expect("temp dir");
    let record = oficio();
    let bytes = render_pdf(
        &record,
        &Settings::default(),
        PdfExporter::with_standard_fonts(),
        stamp(),
    )
    .expect("can render");

    let path = dir.path().join(export_file_name(record.document_number()));
    std::fs::write(&path, &bytes).expect("can write");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("OFICIO N_° 0231-2025-MRE_DGC.pdf")
    );
    assert_eq!(std::fs::read(&path).expect("can read").len(), bytes.len());
}
