mod coords;
mod xml_parser;

// Re-export public API
pub use coords::{convert_candidates, parse_coordinate};
pub use xml_parser::{scan_point_elements, PointCandidate, RawCoords};
