use desktop::file_summary::{file_label, format_size};
use script_pipeline::SourceFile;

#[test]
fn formats_sizes() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(2048), "2.0 KB");
    assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
}

#[test]
fn labels_follow_ingest_routing() {
    let png = SourceFile::new("frame.png", "image/png", vec![0; 1536]);
    assert_eq!(file_label(&png), "frame.png · 1.5 KB · inline");

    // Word documents route by name even with a generic declared type.
    let docx = SourceFile::new("brief.docx", "application/octet-stream", vec![0; 10]);
    assert_eq!(file_label(&docx), "brief.docx · 10 B · text");

    let txt = SourceFile::new("notes.txt", "text/plain", vec![]);
    assert_eq!(file_label(&txt), "notes.txt · 0 B · skipped");
}
