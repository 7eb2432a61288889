//! Animator: per-tick rotation and float offsets.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::scene::SceneState;
use crate::shape::FloatMotion;

/// Advances every object by one tick.
///
/// Rotation grows by the angular velocity and wraps into `[0, 2π)`. The vertical
/// position is recomputed from the base position and `elapsed` (seconds), so it
/// stays within the configured amplitude however long the loop runs.
pub fn advance<H>(scene: &mut SceneState<H>, elapsed: f32) {
    for object in &mut scene.objects {
        let shape = &object.shape;
        object.rotation = wrap(object.rotation + shape.angular_velocity);
        object.position = Vec3::new(
            shape.position.x,
            shape.position.y + float_offset(shape.float, shape.position.x, elapsed),
            shape.position.z,
        );
    }
    scene.ticks += 1;
}

/// `sin(elapsed * frequency + phase) * amplitude`.
#[inline]
pub fn float_offset(motion: FloatMotion, phase: f32, elapsed: f32) -> f32 {
    (elapsed * motion.frequency + phase).sin() * motion.amplitude
}

#[inline]
fn wrap(rotation: Vec3) -> Vec3 {
    Vec3::new(
        rotation.x.rem_euclid(TAU),
        rotation.y.rem_euclid(TAU),
        rotation.z.rem_euclid(TAU),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SurfaceHost;
    use crate::palette::Section;
    use crate::projection::Projection;
    use crate::scene::SceneBuilder;
    use crate::testing::FakeHost;
    use folio_engine::coords::Rect;

    fn scene_for(section: Section) -> SceneState<crate::testing::FakeHandle> {
        let mut host = FakeHost::new();
        let mut ctx = host.acquire(Rect::from_size(800.0, 600.0)).unwrap();
        SceneBuilder::build(&section.palette(), Projection::default(), &mut ctx)
    }

    /// Distance between two angles on the circle.
    fn angular_gap(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn rotation_after_n_ticks_is_initial_plus_n_velocities() {
        for section in Section::ALL {
            for n in [0u32, 1, 7, 240, 1000] {
                let mut scene = scene_for(section);
                for t in 0..n {
                    advance(&mut scene, t as f32 / 60.0);
                }
                for object in &scene.objects {
                    let expected = object.shape.rotation + object.shape.angular_velocity * n as f32;
                    for axis in 0..3 {
                        assert!(
                            angular_gap(object.rotation[axis], expected[axis]) < 1e-3,
                            "{section} after {n} ticks: {} vs {}",
                            object.rotation[axis],
                            expected[axis]
                        );
                    }
                }
                assert_eq!(scene.ticks, n as u64);
            }
        }
    }

    #[test]
    fn rotation_stays_wrapped() {
        let mut scene = scene_for(Section::About);
        for t in 0..5000 {
            advance(&mut scene, t as f32 / 60.0);
        }
        for object in &scene.objects {
            assert!(object.rotation.min_element() >= 0.0);
            assert!(object.rotation.max_element() < TAU);
        }
    }

    #[test]
    fn vertical_offset_is_bounded_by_amplitude() {
        for section in Section::ALL {
            let mut scene = scene_for(section);
            for t in 0..2000 {
                advance(&mut scene, t as f32 * 0.037);
                for object in &scene.objects {
                    let dy = (object.position.y - object.shape.position.y).abs();
                    assert!(dy <= object.shape.float.amplitude + 1e-5);
                    assert_eq!(object.position.x, object.shape.position.x);
                    assert_eq!(object.position.z, object.shape.position.z);
                }
            }
        }
    }

    #[test]
    fn float_offset_is_phase_shifted_by_base_x() {
        let motion = FloatMotion::new(1.0, 0.5);
        assert_eq!(float_offset(motion, 0.0, 0.0), 0.0);
        assert!((float_offset(motion, std::f32::consts::FRAC_PI_2, 0.0) - 0.5).abs() < 1e-6);
        assert_eq!(float_offset(FloatMotion::NONE, 1.0, 123.0), 0.0);
    }
}
