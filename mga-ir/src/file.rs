use crate::PackageRef;

/// File-level configuration shared by every producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// Package the generated file belongs to.
    pub package: PackageRef,
    /// Custom header text (e.g., a license notice), without comment markers.
    pub header_text: Option<String>,
}

impl FileSpec {
    pub fn new(package: PackageRef) -> Self {
        Self {
            package,
            header_text: None,
        }
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header_text = Some(text.into());
        self
    }
}
