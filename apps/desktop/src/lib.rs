pub mod file_summary;
