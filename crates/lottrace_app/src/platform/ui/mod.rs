pub mod layout;
pub mod render;

pub use layout::{DashboardLayout, Region};
pub use render::render;

/// Control that receives Enter/Space and typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    DropZone,
    Upload,
    DownloadLink,
    Inspect,
    LotA,
    LotB,
    Search,
}

/// Inline prompt standing in for the native file dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerPrompt {
    pub input: String,
    pub error: Option<String>,
}

/// Surface-only state the core does not track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chrome {
    pub focus: Focus,
    pub picker: Option<PickerPrompt>,
}
