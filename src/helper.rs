use nalgebra::{Vector2, Vector3};

// Euclidean distance between two points.
pub fn distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (b - a).magnitude()
}

// Unit normal of the triangle (a, b, c) by the right hand rule, i.e. the normalized
// cross product of b - a and c - a. Degenerate triangles give the zero vector.
pub fn triangle_normal(tri: &[Vector3<f64>; 3]) -> Vector3<f64> {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    if n.norm_squared() <= f64::EPSILON * f64::EPSILON {
        return Vector3::zeros();
    }
    n.normalize()
}

pub fn midpoint(a: &Vector2<f64>, b: &Vector2<f64>) -> Vector2<f64> {
    (a + b) / 2.
}

// Scales every vector onto the sphere of the given radius around the origin.
pub fn project_all(mut slice: impl AsMut<[Vector3<f64>]>, radius: f64) {
    for x in slice.as_mut().iter_mut() {
        x.normalize_mut();
        *x *= radius;
    }
}

// Rounds to a fixed number of decimal places, returning the scaled integer so
// that equal roundings compare and hash exactly.
pub fn round_scaled(x: f64, places: u32) -> i64 {
    (x * 10f64.powi(places as i32)).round() as i64
}

// acos in degrees, with the argument clamped into the domain to absorb rounding error.
pub fn acos_degrees(cos: f64) -> f64 {
    cos.max(-1.).min(1.).acos().to_degrees()
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;

    #[test]
    fn normal_is_right_hand_rule() {
        let tri = [
            Vector3::new(0., 0., 0.),
            Vector3::new(1., 0., 0.),
            Vector3::new(0., 1., 0.),
        ];
        assert_relative_eq!(triangle_normal(&tri), Vector3::new(0., 0., 1.));
    }

    #[test]
    fn degenerate_normal_is_zero() {
        let p = Vector3::new(1., 2., 3.);
        assert_eq!(triangle_normal(&[p, p, p]), Vector3::zeros());
    }

    #[test]
    fn projection_lands_on_sphere() {
        let mut verts = vec![Vector3::new(3., 4., 0.), Vector3::new(-1., 1., 1.)];
        project_all(&mut verts, 2.5);
        for v in verts.iter() {
            assert_relative_eq!(v.magnitude(), 2.5, epsilon = 1e-12);
        }
        assert_relative_eq!(verts[0], Vector3::new(1.5, 2., 0.), epsilon = 1e-12);
    }

    #[test]
    fn rounding_to_thousandths() {
        assert_eq!(round_scaled(1.0514622, 3), 1051);
        assert_eq!(round_scaled(0.5465331, 3), 547);
        assert_eq!(distance(&Vector3::zeros(), &Vector3::new(3., 4., 0.)), 5.);
    }

    #[test]
    fn acos_clamps_out_of_domain() {
        assert_relative_eq!(acos_degrees(1. + 1e-15), 0.);
        assert_relative_eq!(acos_degrees(0.5), 60., epsilon = 1e-12);
    }
}
