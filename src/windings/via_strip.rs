use std::f64::consts::TAU;

use tracing::{debug, warn};

use crate::error::{GeometryError, Result};
use crate::geometry::{Layer, Via, ViaParams};
use crate::ident::IdGenerator;
use crate::math::arc_2d::polar_point;
use crate::math::Point;

/// Places a row of vias across an angular sector just outside a radius.
///
/// As many vias as fit with `min_spacing` between drills along the arc at
/// `inner_radius` are spread evenly over the sector, with a half step of
/// margin at each end.
pub struct ViaStrip {
    at: Point,
    layers: Vec<Layer>,
    inner_radius: f64,
    start_angle: f64,
    end_angle: f64,
    params: ViaParams,
}

impl ViaStrip {
    /// Creates a new `ViaStrip` operation.
    #[must_use]
    pub fn new(
        at: Point,
        layers: Vec<Layer>,
        inner_radius: f64,
        start_angle: f64,
        end_angle: f64,
        params: ViaParams,
    ) -> Self {
        Self {
            at,
            layers,
            inner_radius,
            start_angle,
            end_angle,
            params,
        }
    }

    /// Returns the signed sweep of the sector.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if the sweep is not finite or
    /// covers more than a full turn.
    fn sweep(&self) -> Result<f64> {
        let sweep = self.end_angle - self.start_angle;
        if !sweep.is_finite() || sweep.abs() > TAU {
            return Err(GeometryError::InvalidGeometry(format!(
                "via strip sector from {} to {} must span at most a full turn",
                self.start_angle, self.end_angle
            ))
            .into());
        }
        Ok(sweep)
    }

    /// Returns how many vias fit in the sector.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if the radius is not positive,
    /// the sector is not a finite angle of at most a full turn, or the via
    /// dimensions are not buildable.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn via_count(&self) -> Result<usize> {
        self.params.validate()?;
        if !self.inner_radius.is_finite() || self.inner_radius <= 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "via strip radius {} must be positive",
                self.inner_radius
            ))
            .into());
        }
        let width = self.inner_radius * self.sweep()?.abs();
        let pitch = self.params.drill + self.params.min_spacing;
        Ok((width / pitch).floor() as usize)
    }

    /// Executes the placement. A sector too narrow for one via yields no vias.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if the radius is not positive,
    /// the sector is not finite or spans more than a full turn, the via
    /// dimensions are not buildable, or fewer than two layers are given.
    pub fn execute(&self, ids: &mut impl IdGenerator) -> Result<Vec<Via>> {
        let sweep = self.sweep()?;
        let count = self.via_count()?;
        if count == 0 {
            warn!(
                start_angle = self.start_angle,
                end_angle = self.end_angle,
                inner_radius = self.inner_radius,
                "via strip sector too narrow for a single via"
            );
            return Ok(Vec::new());
        }

        let via_radius = self.inner_radius + self.params.size / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let delta_angle = sweep / count as f64;
        let initial_angle = self.start_angle + delta_angle / 2.0;
        debug!(count, via_radius, delta_angle, "placing via strip");

        (0..count)
            .map(|n| {
                #[allow(clippy::cast_precision_loss)]
                let angle = initial_angle + n as f64 * delta_angle;
                Via::new(
                    self.at + polar_point(via_radius, angle).coords,
                    &self.params,
                    self.layers.clone(),
                    ids.next_id(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoilError;
    use crate::ident::SequentialIds;
    use crate::math::arc_2d::{angle_in_sweep, angle_of};
    use approx::assert_relative_eq;

    fn strip(start_angle: f64, end_angle: f64) -> ViaStrip {
        ViaStrip::new(
            Point::new(0.11, 0.11),
            vec![Layer::Front, Layer::Inner(1)],
            0.010,
            start_angle,
            end_angle,
            ViaParams::default(),
        )
    }

    #[test]
    fn fills_sector_with_max_count() {
        // 5 mm of arc at a 0.9 mm pitch.
        let vias = strip(0.0, 0.5).execute(&mut SequentialIds::default()).unwrap();
        assert_eq!(vias.len(), 5);
    }

    #[test]
    fn vias_sit_inside_sector_at_pad_radius() {
        let center = Point::new(0.11, 0.11);
        let vias = strip(1.0, 1.5).execute(&mut SequentialIds::default()).unwrap();
        for via in &vias {
            let offset = via.at() - center;
            assert_relative_eq!(offset.norm(), 0.0104, max_relative = 1e-9);
            assert!(angle_in_sweep(angle_of(&offset), 1.0, 0.5));
            assert_eq!(via.layers(), &[Layer::Front, Layer::Inner(1)]);
        }
        assert_relative_eq!(angle_of(&(vias[0].at() - center)), 1.05, epsilon = 1e-9);
    }

    #[test]
    fn neighbours_keep_min_spacing() {
        let vias = strip(0.0, 0.5).execute(&mut SequentialIds::default()).unwrap();
        let params = ViaParams::default();
        for pair in vias.windows(2) {
            let pitch = (pair[1].at() - pair[0].at()).norm();
            assert!(pitch - params.drill >= params.min_spacing - 1e-12, "pitch={pitch}");
        }
    }

    #[test]
    fn clockwise_sector_is_supported() {
        let vias = strip(0.5, 0.0).execute(&mut SequentialIds::default()).unwrap();
        assert_eq!(vias.len(), 5);
        let first = angle_of(&(vias[0].at() - Point::new(0.11, 0.11)));
        assert_relative_eq!(first, 0.45, epsilon = 1e-9);
    }

    #[test]
    fn narrow_sector_yields_no_vias() {
        let vias = strip(0.0, 0.05).execute(&mut SequentialIds::default()).unwrap();
        assert!(vias.is_empty());
    }

    #[test]
    fn infinite_sector_is_rejected() {
        let err = strip(0.0, f64::INFINITY)
            .execute(&mut SequentialIds::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CoilError::Geometry(GeometryError::InvalidGeometry(_))
        ));
        assert!(strip(f64::NAN, 0.5).via_count().is_err());
    }

    #[test]
    fn sector_past_full_turn_is_rejected() {
        let err = strip(0.0, 7.0)
            .execute(&mut SequentialIds::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CoilError::Geometry(GeometryError::InvalidGeometry(_))
        ));
        assert!(strip(0.0, -7.0).via_count().is_err());
    }

    #[test]
    fn unbuildable_vias_cannot_be_counted() {
        let mut s = strip(0.0, 0.5);
        s.params.drill = 0.0;
        s.params.min_spacing = 0.0;
        assert!(s.via_count().is_err());
    }

    #[test]
    fn full_turn_counts_vias_around_circle() {
        // 62.8 mm of arc at a 0.9 mm pitch.
        assert_eq!(strip(0.0, TAU).via_count().unwrap(), 69);
    }

    #[test]
    fn ids_are_unique() {
        let vias = strip(0.0, 1.0).execute(&mut SequentialIds::default()).unwrap();
        for (i, a) in vias.iter().enumerate() {
            for b in &vias[i + 1..] {
                assert_ne!(a.id(), b.id());
            }
        }
    }
}
