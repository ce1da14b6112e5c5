//! Camera to sRGB color matrix derivation.

/// Linear sRGB (D65) -> XYZ
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

pub type Matrix3 = [[f32; 3]; 3];

pub const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Builds the camera -> linear sRGB matrix from the decoder's XYZ -> camera matrix.
///
/// sRGB -> camera is formed first and each row normalized to sum to one, so a
/// white-balanced neutral stays neutral. The result is its inverse. Unknown
/// (all-zero) or singular matrices fall back to identity.
pub fn camera_to_srgb(xyz_to_cam: &[[f32; 3]; 4]) -> Matrix3 {
    let mut rgb_to_cam = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            rgb_to_cam[r][c] = (0..3).map(|k| xyz_to_cam[r][k] * SRGB_TO_XYZ[k][c]).sum();
        }
        let row_sum: f32 = rgb_to_cam[r].iter().sum();
        if row_sum.abs() < f32::EPSILON {
            return IDENTITY;
        }
        for value in rgb_to_cam[r].iter_mut() {
            *value /= row_sum;
        }
    }

    invert(&rgb_to_cam).unwrap_or(IDENTITY)
}

fn invert(m: &Matrix3) -> Option<Matrix3> {
    let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
    };

    let det = m[0][0] * cofactor(1, 2, 1, 2) - m[0][1] * cofactor(1, 2, 0, 2)
        + m[0][2] * cofactor(1, 2, 0, 1);
    if !det.is_finite() || det.abs() < 1e-8 {
        return None;
    }
    let inv_det = 1.0 / det;

    Some([
        [
            cofactor(1, 2, 1, 2) * inv_det,
            -cofactor(0, 2, 1, 2) * inv_det,
            cofactor(0, 1, 1, 2) * inv_det,
        ],
        [
            -cofactor(1, 2, 0, 2) * inv_det,
            cofactor(0, 2, 0, 2) * inv_det,
            -cofactor(0, 1, 0, 2) * inv_det,
        ],
        [
            cofactor(1, 2, 0, 1) * inv_det,
            -cofactor(0, 2, 0, 1) * inv_det,
            cofactor(0, 1, 0, 1) * inv_det,
        ],
    ])
}

#[inline]
pub fn apply(m: &Matrix3, rgb: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
        m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
        m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
    ]
}
