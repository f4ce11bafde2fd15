//! Physical parameters of the vehicle.
use serde::{Deserialize, Serialize};

/// Physical constants of a single-track (bicycle) vehicle model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VehicleParams {
    /// Front wheel cornering stiffness [N/rad].
    pub k_f: f32,

    /// Rear wheel cornering stiffness [N/rad].
    pub k_r: f32,

    /// Distance from CG to front axle [m].
    pub l_f: f32,

    /// Distance from CG to rear axle [m].
    pub l_r: f32,

    /// Mass [kg].
    pub m: f32,

    /// Polar moment of inertia at CG [kg*m^2].
    pub i_z: f32,

    /// Tire-road friction coefficient.
    pub miu: f32,

    /// Acceleration of gravity [m/s^2].
    pub g: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            k_f: -128915.5,
            k_r: -85943.6,
            l_f: 1.06,
            l_r: 1.85,
            m: 1412.0,
            i_z: 1536.7,
            miu: 1.0,
            g: 9.81,
        }
    }
}

impl VehicleParams {
    /// Static vertical loads `(F_zf, F_zr)` on the front and rear axles [N].
    pub fn static_loads(&self) -> (f32, f32) {
        let l = self.l_f + self.l_r;
        (
            self.l_r * self.m * self.g / l,
            self.l_f * self.m * self.g / l,
        )
    }
}
