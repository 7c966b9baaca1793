//! Point construction from raw coordinate pairs and geodesic distance.

use geo::{Distance, Geodesic, Point};

use crate::FieldValue;

/// Build a point from a raw `[x, y]` coordinate pair.
///
/// Both members must be numeric; any other shape yields `None`.
///
/// # Examples
/// ```
/// use geobufr_core::{FieldValue, point_from_value};
///
/// let point = point_from_value(&FieldValue::from((11.01, 47.80))).unwrap();
/// assert_eq!((point.x(), point.y()), (11.01, 47.80));
/// assert!(point_from_value(&FieldValue::from("11.01 47.80")).is_none());
/// ```
#[must_use]
pub fn point_from_value(value: &FieldValue) -> Option<Point<f64>> {
    let FieldValue::Array(members) = value else {
        return None;
    };
    match members.as_slice() {
        [x, y] => Some(Point::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

/// Geodesic distance in metres between two longitude/latitude points on the
/// WGS84 ellipsoid.
///
/// # Examples
/// ```
/// use geo::Point;
/// use geobufr_core::distance;
///
/// let hohenpeissenberg = Point::new(11.010754, 47.800864);
/// let garmisch = Point::new(11.0621, 47.4830);
/// let metres = distance(hohenpeissenberg, garmisch);
/// assert!((34_000.0..37_000.0).contains(&metres));
/// ```
#[must_use]
pub fn distance(center: Point<f64>, position: Point<f64>) -> f64 {
    Geodesic.distance(position, center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FieldValue::Array(vec![FieldValue::Int(11), FieldValue::Float(47.5)]), Some((11.0, 47.5)))]
    #[case(FieldValue::Array(vec![FieldValue::Float(11.0)]), None)]
    #[case(FieldValue::Array(vec![FieldValue::Float(1.0), FieldValue::Float(2.0), FieldValue::Float(3.0)]), None)]
    #[case(FieldValue::Array(vec![FieldValue::Missing, FieldValue::Float(47.5)]), None)]
    #[case(FieldValue::Missing, None)]
    fn builds_points_only_from_numeric_pairs(
        #[case] value: FieldValue,
        #[case] expected: Option<(f64, f64)>,
    ) {
        let point = point_from_value(&value).map(|p| (p.x(), p.y()));
        assert_eq!(point, expected);
    }

    #[rstest]
    fn distance_is_zero_at_the_center() {
        let center = Point::new(11.010754, 47.800864);
        assert!(distance(center, center) < 1.0e-6);
    }
}
