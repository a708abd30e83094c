use std::path::PathBuf;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A file chosen through the picker or dropped onto the upload area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: path.into(),
        }
    }

    pub fn icon(&self) -> FileIcon {
        FileIcon::for_name(&self.name)
    }

    pub fn size_label(&self) -> String {
        format_mib(self.size_bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    /// Excel workbook (`.xlsx`).
    Spreadsheet,
    /// Anything else, rendered as tabular data.
    Tabular,
}

impl FileIcon {
    pub fn for_name(name: &str) -> Self {
        if name.ends_with(".xlsx") {
            FileIcon::Spreadsheet
        } else {
            FileIcon::Tabular
        }
    }
}

/// Size in MiB with two decimals, labelled the way the dashboard shows it.
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MIB)
}
