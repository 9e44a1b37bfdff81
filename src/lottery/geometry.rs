//! Target poses for the three card formations and the reveal slots.
//!
//! Everything here is pure: same inputs, same poses.
use cgmath::{InnerSpace, Matrix3, Vector3, vec3};
use std::f32::consts::PI;

// table
const TABLE_COLUMN_GAP: f32 = 40.0;
const TABLE_ROW_GAP: f32 = 20.0;
const TABLE_HALF_SPAN_PER_COLUMN: f32 = 90.0;
const TABLE_TOP: f32 = 1000.0;

// sphere
const SPHERE_RADIUS: f32 = 800.0;
const SPHERE_LOOK_SCALE: f32 = 2.0;

// helix
const HELIX_RADIUS: f32 = 800.0;
const HELIX_STEP_ANGLE: f32 = 0.213;
const HELIX_SPACING: f32 = 8.0;
const HELIX_TOP: f32 = 450.0;
const HELIX_SCALE: f32 = 1.1;

// reveal
const REVEAL_PER_ROW: usize = 5;
const REVEAL_COLUMN_GAP: f32 = 100.0;
const REVEAL_ROW_GAP: f32 = 60.0;
// round sizes whose first row needs a half-step shift to look centred
const REVEAL_SHIFTED_TOTALS: [usize; 4] = [2, 4, 7, 9];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, f: f32) -> Self {
        Self { width: self.width * f, height: self.height * f }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    /// Euler XYZ in radians (R = Rx·Ry·Rz).
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Pose {
    pub fn at(position: Vector3<f32>) -> Self {
        Self { position, rotation: vec3(0.0, 0.0, 0.0), scale: vec3(1.0, 1.0, 1.0) }
    }

    /// Pose at `position` whose local +Z axis points at `target`.
    pub fn looking_at(position: Vector3<f32>, target: Vector3<f32>) -> Self {
        Self { rotation: look_at_euler(position, target), ..Self::at(position) }
    }
}

/// Which formation the cards are arranged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formation {
    Table,
    Sphere,
    Helix,
}

/// 1-based (column, row) of each slot; a new row starts every `row_count` slots.
pub fn table_coords(count: usize, row_count: usize) -> Vec<(u32, u32)> {
    let row_count = row_count.max(1);
    (0..count)
        .map(|i| ((i % row_count) as u32 + 1, (i / row_count) as u32 + 1))
        .collect()
}

pub fn table_layout(count: usize, row_count: usize, card: Size) -> Vec<Pose> {
    let span = row_count as f32 * TABLE_HALF_SPAN_PER_COLUMN;
    table_coords(count, row_count)
        .into_iter()
        .map(|(col, row)| {
            Pose::at(vec3(
                col as f32 * (card.width + TABLE_COLUMN_GAP) - span,
                -(row as f32) * (card.height + TABLE_ROW_GAP) + TABLE_TOP,
                0.0,
            ))
        })
        .collect()
}

pub fn sphere_layout(count: usize) -> Vec<Pose> {
    let n = count as f32;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f32 / n).clamp(-1.0, 1.0).acos();
            let theta = (n * PI).sqrt() * phi;
            let position = vec3(
                SPHERE_RADIUS * theta.cos() * phi.sin(),
                SPHERE_RADIUS * theta.sin() * phi.sin(),
                -SPHERE_RADIUS * phi.cos(),
            );
            Pose::looking_at(position, position * SPHERE_LOOK_SCALE)
        })
        .collect()
}

pub fn helix_layout(count: usize) -> Vec<Pose> {
    (0..count)
        .map(|i| {
            let phi = i as f32 * HELIX_STEP_ANGLE + PI;
            let position = vec3(
                HELIX_RADIUS * phi.sin(),
                -(i as f32 * HELIX_SPACING) + HELIX_TOP,
                HELIX_RADIUS * (phi + PI).cos(),
            );
            let target = vec3(position.x * 2.0, position.y, position.z * 2.0);
            Pose {
                scale: vec3(HELIX_SCALE, HELIX_SCALE, HELIX_SCALE),
                ..Pose::looking_at(position, target)
            }
        })
        .collect()
}

pub fn layout(formation: Formation, count: usize, row_count: usize, card: Size) -> Vec<Pose> {
    match formation {
        Formation::Table => table_layout(count, row_count, card),
        Formation::Sphere => sphere_layout(count),
        Formation::Helix => helix_layout(count),
    }
}

/// On-screen offset of the `index`-th winner among `total` in a round.
/// Rows of five, filled centre first and then alternating left/right.
pub fn element_position(index: usize, total: usize, card: Size, window: Size) -> (f32, f32) {
    let center_y = window.height / 2.0 - card.height / 2.0;
    let step = card.width + REVEAL_COLUMN_GAP;
    let k = index % REVEAL_PER_ROW;
    let row = (index / REVEAL_PER_ROW) as f32;

    let mut x = if k == 0 {
        0.0
    } else {
        let reach = k.div_ceil(2) as f32 * step;
        if k % 2 == 0 { reach } else { -reach }
    };
    let y = center_y - row * (card.height + REVEAL_ROW_GAP);

    let plain = !REVEAL_SHIFTED_TOTALS.contains(&total) || (total > REVEAL_PER_ROW && index < REVEAL_PER_ROW);
    if !plain {
        x += step / 2.0;
    }
    (x, y)
}

/// Euler XYZ angles that rotate local +Z onto `target - position`, keeping
/// world +Y as up.
pub fn look_at_euler(position: Vector3<f32>, target: Vector3<f32>) -> Vector3<f32> {
    let up = vec3(0.0, 1.0, 0.0);
    let mut z = target - position;
    if z.magnitude2() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.magnitude2() == 0.0 {
        // forward parallel to up
        if up.z.abs() == 1.0 { z.x += 0.0001; } else { z.z += 0.0001; }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    euler_xyz(&Matrix3::from_cols(x, y, z))
}

/// Decompose a pure rotation matrix into XYZ Euler angles.
pub fn euler_xyz(m: &Matrix3<f32>) -> Vector3<f32> {
    // cgmath is column-major: m.c.r
    let m11 = m.x.x;
    let m12 = m.y.x;
    let m13 = m.z.x;
    let m22 = m.y.y;
    let m23 = m.z.y;
    let m32 = m.y.z;
    let m33 = m.z.z;

    let y = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999_9 {
        vec3((-m23).atan2(m33), y, (-m12).atan2(m11))
    } else {
        vec3(m32.atan2(m22), y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rad;

    const CARD: Size = Size::new(140.0, 200.0);

    fn forward(rotation: Vector3<f32>) -> Vector3<f32> {
        let m = Matrix3::from_angle_x(Rad(rotation.x))
            * Matrix3::from_angle_y(Rad(rotation.y))
            * Matrix3::from_angle_z(Rad(rotation.z));
        m * vec3(0.0, 0.0, 1.0)
    }

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-3
    }

    #[test]
    fn table_rows_wrap_every_row_count() {
        let coords = table_coords(7, 3);
        assert_eq!(coords[0], (1, 1));
        assert_eq!(coords[2], (3, 1));
        assert_eq!(coords[3], (1, 2));
        assert_eq!(coords[6], (1, 3));

        let poses = table_layout(7, 3, CARD);
        assert_eq!(poses[0].position, vec3(180.0 - 270.0, 780.0, 0.0));
        assert_eq!(poses[4].position, vec3(360.0 - 270.0, 560.0, 0.0));
        assert!(poses.iter().all(|p| p.rotation == vec3(0.0, 0.0, 0.0)));
    }

    #[test]
    fn empty_counts_give_empty_layouts() {
        assert!(table_layout(0, 17, CARD).is_empty());
        assert!(sphere_layout(0).is_empty());
        assert!(helix_layout(0).is_empty());
    }

    #[test]
    fn sphere_cards_sit_on_radius_and_face_outward() {
        for pose in sphere_layout(119) {
            assert!((pose.position.magnitude() - SPHERE_RADIUS).abs() < 0.5);
            assert!(close(forward(pose.rotation), pose.position.normalize()));
        }
    }

    #[test]
    fn helix_faces_away_from_axis() {
        let poses = helix_layout(50);
        assert!(close(poses[0].position, vec3(0.0, 450.0, 800.0)));
        assert!(close(poses[0].rotation, vec3(0.0, 0.0, 0.0)));
        assert_eq!(poses[10].position.y, 450.0 - 80.0);
        assert_eq!(poses[10].scale, vec3(1.1, 1.1, 1.1));
        for pose in &poses {
            let outward = vec3(pose.position.x, 0.0, pose.position.z).normalize();
            assert!(close(forward(pose.rotation), outward));
        }
    }

    #[test]
    fn look_at_handles_vertical_forward() {
        let r = look_at_euler(vec3(0.0, 0.0, 0.0), vec3(0.0, 5.0, 0.0));
        assert!(r.x.is_finite() && r.y.is_finite() && r.z.is_finite());
        assert!(forward(r).y > 0.99);
    }

    #[test]
    fn reveal_single_card_is_centred() {
        let window = Size::new(1920.0, 1080.0);
        assert_eq!(element_position(0, 1, CARD, window), (0.0, 540.0 - 100.0));
    }

    #[test]
    fn reveal_alternates_sides() {
        let window = Size::new(1920.0, 1080.0);
        let step = CARD.width + 100.0;
        let xs: Vec<f32> = (0..5).map(|i| element_position(i, 5, CARD, window).0).collect();
        assert_eq!(xs, vec![0.0, -step, step, -2.0 * step, 2.0 * step]);
        let (_, y5) = element_position(5, 10, CARD, window);
        assert_eq!(y5, 440.0 - (200.0 + 60.0));
    }

    #[test]
    fn reveal_even_rows_are_shifted_half_a_step() {
        let window = Size::new(1920.0, 1080.0);
        let half = (CARD.width + 100.0) / 2.0;
        assert_eq!(element_position(0, 2, CARD, window).0, half);
        assert_eq!(element_position(1, 2, CARD, window).0, -half);
        // first row of a 7 stays plain, the second row of two is shifted
        assert_eq!(element_position(0, 7, CARD, window).0, 0.0);
        assert_eq!(element_position(5, 7, CARD, window).0, half);
        assert_eq!(element_position(6, 7, CARD, window).0, -half);
    }

    #[test]
    fn reveal_is_deterministic() {
        let window = Size::new(1280.0, 720.0);
        let card = CARD.scaled(2.0);
        for total in 1..=10 {
            for i in 0..total {
                assert_eq!(element_position(i, total, card, window), element_position(i, total, card, window));
            }
        }
    }
}
