pub mod resx;

// Reexporting the format for easier access
pub use resx::Format as ResxFormat;

/// File extension of every resource file this crate reads and writes.
pub const RESX_EXTENSION: &str = "resx";
