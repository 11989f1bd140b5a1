//! Feature vectorization: reconcile a [`FeatureVector`] with the trained
//! column schema.
//!
//! The classifier was fitted on a frame whose columns are the numeric
//! feature names plus dummy-encoded dominant-font columns named
//! `most_common_font_<category>` (first category dropped, so it is encoded
//! as all-zeros). At inference the reconciliation is explicit and total:
//!
//! * every expected column gets exactly one value, in schema order;
//! * a dummy column is 1 only when its category IS the dominant font —
//!   an unseen category therefore zeroes every dummy column;
//! * expected columns this crate never computes are filled with 0;
//! * computed fields with no expected column are dropped;
//! * non-finite values are flushed to 0.

use super::features::FeatureVector;

/// Column-name prefix of the dummy-encoded dominant-font categories.
pub const FONT_DUMMY_PREFIX: &str = "most_common_font_";

/// Map features onto the trained schema, in schema order.
///
/// The output length always equals `expected_columns.len()`.
pub fn vectorize(features: &FeatureVector, expected_columns: &[String]) -> Vec<f64> {
    expected_columns
        .iter()
        .map(|column| {
            let value = match column.strip_prefix(FONT_DUMMY_PREFIX) {
                Some(category) => {
                    if category == features.most_common_font {
                        1.0
                    } else {
                        0.0
                    }
                }
                None => numeric_field(features, column).unwrap_or(0.0),
            };
            if value.is_finite() { value } else { 0.0 }
        })
        .collect()
}

/// Numeric fields by trained column name. `None` covers both "absent on
/// this document path" (PDF line spacings) and "never computed at all".
fn numeric_field(features: &FeatureVector, name: &str) -> Option<f64> {
    match name {
        "unique_fonts" => Some(features.unique_fonts as f64),
        "font_size_variance" => Some(features.font_size_variance),
        "unique_line_spacings" => features.unique_line_spacings.map(|n| n as f64),
        "left_margin_cm" => Some(features.left_margin_cm),
        "right_margin_cm" => Some(features.right_margin_cm),
        "top_margin_cm" => Some(features.top_margin_cm),
        "bottom_margin_cm" => Some(features.bottom_margin_cm),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(dominant: &str) -> FeatureVector {
        FeatureVector {
            unique_fonts: 2,
            most_common_font: dominant.to_string(),
            font_size_variance: 1.25,
            unique_line_spacings: Some(1),
            left_margin_cm: 4.0,
            right_margin_cm: 3.0,
            top_margin_cm: 3.0,
            bottom_margin_cm: 3.0,
        }
    }

    fn schema(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn output_order_and_count_match_the_schema() {
        let columns = schema(&[
            "unique_fonts",
            "font_size_variance",
            "unique_line_spacings",
            "left_margin_cm",
            "right_margin_cm",
            "top_margin_cm",
            "bottom_margin_cm",
            "most_common_font_Calibri",
            "most_common_font_Times New Roman",
        ]);
        let row = vectorize(&features("Times New Roman"), &columns);
        assert_eq!(row.len(), columns.len());
        assert_eq!(row, vec![2.0, 1.25, 1.0, 4.0, 3.0, 3.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn unseen_dominant_font_zeroes_every_dummy_column() {
        let columns = schema(&[
            "most_common_font_Calibri",
            "most_common_font_Times New Roman",
        ]);
        let row = vectorize(&features("Comic Sans MS"), &columns);
        assert_eq!(row, vec![0.0, 0.0]);
    }

    #[test]
    fn first_trained_category_encodes_as_all_zeros() {
        // Drop-first: the first category has no column of its own, so a
        // document dominated by it produces all-zero dummies — identical to
        // the training encoding.
        let columns = schema(&["most_common_font_Times New Roman"]);
        let row = vectorize(&features("Arial"), &columns);
        assert_eq!(row, vec![0.0], "Arial was the dropped first category");
    }

    #[test]
    fn pdf_path_fills_absent_spacing_with_zero() {
        let mut f = features("Arial");
        f.unique_line_spacings = None;
        let row = vectorize(&f, &schema(&["unique_line_spacings"]));
        assert_eq!(row, vec![0.0]);
    }

    #[test]
    fn unknown_expected_column_is_filled_with_zero() {
        let row = vectorize(&features("Arial"), &schema(&["page_count", "unique_fonts"]));
        assert_eq!(row, vec![0.0, 2.0]);
    }

    #[test]
    fn non_finite_values_are_flushed_to_zero() {
        let mut f = features("Arial");
        f.font_size_variance = f64::NAN;
        let row = vectorize(&f, &schema(&["font_size_variance"]));
        assert_eq!(row, vec![0.0]);
    }

    #[test]
    fn extra_computed_fields_are_dropped() {
        // A schema narrower than the computed record: only what it names
        // survives.
        let row = vectorize(&features("Arial"), &schema(&["unique_fonts"]));
        assert_eq!(row, vec![2.0]);
    }
}
