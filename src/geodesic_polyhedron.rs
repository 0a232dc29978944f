use log::debug;
use nalgebra::Vector3;

use crate::{error::DomeError, helper::project_all};

// A triangle as three indices into the vertex data. The order is counterclockwise when
// viewed from outside the sphere, so the right hand rule gives the outward normal.
pub type Face = [usize; 3];

// Subdivision is capped because the face count grows as 20n^2.
pub const MAX_FREQUENCY: usize = 6;

// (1+sqrt(5))/2
const GOLDEN_RATIO: f64 = 1.618_033_988_749_894_848_204_586_834_365_638_118;

// Constant data for a frequency 1 mesh, i.e. an icosahedron or D20
const φ: f64 = GOLDEN_RATIO;
const initial_verts: [Vector3<f64>; 12] = [
    Vector3::new(0., φ, -1.),
    Vector3::new(-φ, 1., 0.),
    Vector3::new(-1., 0., -φ),
    Vector3::new(1., 0., -φ),
    Vector3::new(φ, 1., 0.),
    Vector3::new(0., φ, 1.),
    Vector3::new(-1., 0., φ),
    Vector3::new(-φ, -1., 0.),
    Vector3::new(0., -φ, -1.),
    Vector3::new(φ, -1., 0.),
    Vector3::new(1., 0., φ),
    Vector3::new(0., -φ, 1.),
];
// Faces oriented counterclockwise as seen from outside
const initial_tris: [Face; 20] = [
    [0, 2, 1],
    [0, 3, 2],
    [0, 4, 3],
    [0, 5, 4],
    [0, 1, 5],
    [7, 6, 1],
    [8, 7, 2],
    [9, 8, 3],
    [10, 9, 4],
    [6, 10, 5],
    [2, 7, 1],
    [3, 8, 2],
    [4, 9, 3],
    [5, 10, 4],
    [1, 6, 5],
    [11, 6, 7],
    [11, 7, 8],
    [11, 8, 9],
    [11, 9, 10],
    [11, 10, 6],
];

// Barycentric interpolation on the triangle specified by tri
fn get_vert(tri: Face, a: f64, b: f64) -> Vector3<f64> {
    let v1 = initial_verts[tri[0]] - initial_verts[tri[1]];
    let v2 = initial_verts[tri[2]] - initial_verts[tri[1]];

    initial_verts[tri[1]] + (a * v1 + b * v2)
}

pub fn validate(radius: f64, frequency: usize) -> Result<(), DomeError> {
    if !radius.is_finite() || radius <= 0. {
        return Err(DomeError::invalid_parameter(format!(
            "radius must be a positive number, got {}",
            radius
        )));
    }
    if !(1..=MAX_FREQUENCY).contains(&frequency) {
        return Err(DomeError::invalid_parameter(format!(
            "frequency must be between 1 and {}, got {}",
            MAX_FREQUENCY, frequency
        )));
    }
    Ok(())
}

/*
Generates a geodesic polyhedron, created by subdividing each face of an icosahedron
into new faces based on the frequency. The frequency is the number of segments each
edge is subdivided into so that, for example, frequency 2 yields
```
 /\
/\/\
```
while frequency 3 yields
```
  /\
 /\/\
/\/\/\
```
Returns the vertex data in an array of vectors, and the face data in an array of triangle faces
represented as a triple of indices into the vertex data. There are 20n^2 faces and 10n^2+2
vertices, and every vertex is projected onto the sphere of the given radius.
*/
pub fn generate_polyhedron(
    radius: f64,
    frequency: usize,
) -> Result<(Vec<Vector3<f64>>, Vec<Face>), DomeError> {
    validate(radius, frequency)?;
    let n = frequency;

    // Computes the output vertices and the uniqueified indices
    let (uniq, mut out_verts) = {
        let mut out_verts = Vec::with_capacity(10 * n * n + 2);
        let mut int_verts = Vec::new();

        // To generate each vertex, take the 3 vertices of a face in order.
        // The vector from the 2nd vertex to the 1st and 2nd to 3rd form a
        // basis for a plane. They are at 60 degrees from each other.
        // For a frequency n, take each i/n multiple of these basis vectors
        // where i ranges from 0 to n. This gets you a parallelogram.
        // Our desired triangle is half of this, so we just cut off
        // the indices at the correct point in the triangle.
        let nf = n as f64;
        for tri in initial_tris.iter() {
            for i in 0..n + 1 {
                for j in 0..(n + 1 - i) {
                    int_verts.push(get_vert(*tri, (i as f64) / nf, (j as f64) / nf));
                }
            }
        }

        let mut acc = Vec::with_capacity(int_verts.len());

        // Deduplicate vertices shared between faces by a simple distance check, which
        // also yields the map from face-local vertex data to deduplicated data.
        for vert in int_verts.iter() {
            if let Some((ind, _)) = out_verts
                .iter()
                .enumerate()
                .find(|(_, other): &(usize, &Vector3<f64>)| (*other - vert).norm_squared() < 1e-10)
            {
                acc.push(ind);
            } else {
                acc.push(out_verts.len());
                out_verts.push(*vert);
            }
        }

        (acc, out_verts)
    };

    // This function gets the deduplicated index of vertex (i, j) of face.
    let get_out_vert_ind = |face: usize, i: usize, j: usize| {
        // The number of verts in a face
        let num = ((n + 1) * (n + 2)) / 2;
        let base = face * num;

        // The number of verts in rows 1 through k of a face, given n+1 verts on an edge.
        // Computed as total number of verts - number of verts in a triangle with n-k verts.
        fn ind(n: usize, k: usize) -> usize {
            (2 * n * k + k - k * k) / 2
        }

        uniq[base + ind(n + 1, i) + j]
    };

    // Stepping i walks towards the 1st vertex of the face and j towards the 3rd, so
    // (i, j) -> (i, j+1) -> (i+1, j) keeps the winding of the original face.
    let mut out_tris = Vec::with_capacity(20 * n * n);
    for (ind, _) in initial_tris.iter().enumerate() {
        // Do the triangles with two vertices on the bottom
        for i in 0..n {
            for j in 0..(n - i) {
                out_tris.push([
                    get_out_vert_ind(ind, i, j),
                    get_out_vert_ind(ind, i, j + 1),
                    get_out_vert_ind(ind, i + 1, j),
                ]);
            }
        }

        // Do the triangles with two vertices on the top
        for i in 1..n {
            for j in 0..(n - i) {
                out_tris.push([
                    get_out_vert_ind(ind, i, j),
                    get_out_vert_ind(ind, i - 1, j + 1),
                    get_out_vert_ind(ind, i, j + 1),
                ]);
            }
        }
    }

    project_all(&mut out_verts, radius);
    debug!(
        "generated frequency {} polyhedron: {} vertices, {} faces",
        n,
        out_verts.len(),
        out_tris.len()
    );

    Ok((out_verts, out_tris))
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::{generate_polyhedron, MAX_FREQUENCY};
    use crate::{error::ErrorKind, helper::triangle_normal};

    #[test]
    fn geodesic_polyhedron_count() {
        for n in 1..=MAX_FREQUENCY {
            let (verts, tris) = generate_polyhedron(1., n).unwrap();
            assert_eq!(verts.len(), 10 * n * n + 2);
            assert_eq!(tris.len(), 20 * n * n);
        }
    }

    #[test]
    fn vertices_lie_on_sphere() {
        let (verts, _) = generate_polyhedron(3.5, 4).unwrap();
        for v in verts.iter() {
            assert_relative_eq!(v.magnitude(), 3.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn faces_wind_outward() {
        for n in 1..=MAX_FREQUENCY {
            let (verts, tris) = generate_polyhedron(1., n).unwrap();
            for tri in tris.iter() {
                let corners = [verts[tri[0]], verts[tri[1]], verts[tri[2]]];
                let centroid = corners[0] + corners[1] + corners[2];
                assert!(triangle_normal(&corners).dot(&centroid) > 0.);
            }
        }
    }

    #[test]
    fn faces_reference_distinct_vertices() {
        let (verts, tris) = generate_polyhedron(1., 3).unwrap();
        for tri in tris.iter() {
            assert!(tri.iter().all(|&i| i < verts.len()));
            assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        for (radius, frequency) in [(0., 1), (-1., 2), (f64::NAN, 2), (1., 0), (1., 7)] {
            let err = generate_polyhedron(radius, frequency).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }
}
