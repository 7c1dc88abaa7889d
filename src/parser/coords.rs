use super::xml_parser::PointCandidate;
use crate::models::{ConversionWarning, PointRecord};
use tracing::{debug, warn};

/// Parses one coordinate attribute as a finite decimal number.
///
/// Surrounding whitespace is tolerated. Returns `None` for anything that is not a
/// number, including `inf` and `NaN`.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Converts scanned point elements into records.
///
/// Elements without a `<coords>` child, or with an empty or absent `x`/`y`, are
/// skipped silently. Elements whose coordinates do not parse produce one
/// [`ConversionWarning`] each and are skipped. Document order is preserved.
pub fn convert_candidates(
    candidates: Vec<PointCandidate>,
) -> (Vec<PointRecord>, Vec<ConversionWarning>) {
    let mut points = Vec::with_capacity(candidates.len());
    let mut warnings = Vec::new();

    for candidate in candidates {
        let Some(coords) = candidate.coords else {
            debug!(label = %candidate.label, "Point has no coords, skipping");
            continue;
        };

        let (x, y) = match (coords.x, coords.y) {
            (Some(x), Some(y)) if !x.is_empty() && !y.is_empty() => (x, y),
            _ => {
                debug!(label = %candidate.label, "Point has empty coordinates, skipping");
                continue;
            }
        };

        match (parse_coordinate(&x), parse_coordinate(&y)) {
            (Some(x), Some(y)) => points.push(PointRecord::new(candidate.label, x, y)),
            _ => {
                let warning = ConversionWarning {
                    label: candidate.label,
                    x,
                    y,
                };
                warn!(
                    label = %warning.label,
                    x = %warning.x,
                    y = %warning.y,
                    "{warning}"
                );
                warnings.push(warning);
            }
        }
    }

    (points, warnings)
}
