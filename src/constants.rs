// Archive layout
pub const DESCRIPTOR_NAME: &str = "geogebra.xml";
pub const ARCHIVE_EXTENSION: &str = "ggb";
// Upper bound on buffer space reserved up front for the descriptor
pub const MAX_DESCRIPTOR_PREALLOC: usize = 16 * 1024 * 1024;

// Descriptor schema
pub const ELEMENT_TAG: &[u8] = b"element";
pub const COORDS_TAG: &[u8] = b"coords";
pub const TYPE_ATTR: &[u8] = b"type";
pub const LABEL_ATTR: &[u8] = b"label";
pub const X_ATTR: &[u8] = b"x";
pub const Y_ATTR: &[u8] = b"y";
pub const POINT_TYPE: &str = "point";

// Output format
pub const OUTPUT_SUFFIX: &str = "_points.csv";
pub const LABEL_COLUMN: &str = "点名称";
pub const X_COLUMN: &str = "x";
pub const Y_COLUMN: &str = "y";
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// Console output
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;
