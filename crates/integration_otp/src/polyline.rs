//! Google encoded polyline decoding (precision 1e5), as used by `legGeometry`

use domain::GeoLocation;

const PRECISION: f64 = 1e5;

/// Decode an encoded polyline; a truncated trailing point is dropped
pub(crate) fn decode(encoded: &str) -> Vec<GeoLocation> {
    let mut bytes = encoded.bytes();
    let mut points = Vec::new();
    let (mut lat, mut lon) = (0_i64, 0_i64);

    while let Some(dlat) = next_delta(&mut bytes) {
        let Some(dlon) = next_delta(&mut bytes) else {
            break;
        };
        lat += dlat;
        lon += dlon;
        #[allow(clippy::cast_precision_loss)]
        points.push(GeoLocation::new_unchecked(
            lat as f64 / PRECISION,
            lon as f64 / PRECISION,
        ));
    }

    points
}

fn next_delta(bytes: &mut impl Iterator<Item = u8>) -> Option<i64> {
    let mut result = 0_i64;
    let mut shift = 0;
    loop {
        let chunk = i64::from(bytes.next()?.checked_sub(63)?);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return None;
        }
    }
    Some(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reference_polyline() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(points.len(), expected.len());
        for (point, (lat, lon)) in points.iter().zip(expected) {
            assert!((point.latitude() - lat).abs() < 1e-6);
            assert!((point.longitude() - lon).abs() < 1e-6);
        }
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Latitude of the second point without its longitude
        let points = decode("_p~iF~ps|U_ulL");
        assert_eq!(points.len(), 1);
    }
}
