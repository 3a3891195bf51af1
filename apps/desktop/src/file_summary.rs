//! Labels for the attached-files list.

use script_pipeline::ingest::route_for;
use script_pipeline::SourceFile;

pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}

/// `name · size · route`, where route is what ingestion will do with the file.
pub fn file_label(file: &SourceFile) -> String {
    format!(
        "{} · {} · {}",
        file.name,
        format_size(file.size()),
        route_for(file).label()
    )
}
