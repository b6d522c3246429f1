use crate::material::ParamRetention;
use crate::StrError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Holds the material parameters of one spatial zone
///
/// Immutable after construction; looked up by position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneParams {
    /// Intrinsic permeability [m2] (scalar, isotropic)
    pub permeability: f64,

    /// Porosity [-]
    pub porosity: f64,

    /// Capillary-pressure / relative-permeability parameters
    pub retention: ParamRetention,

    /// Volumetric heat capacity of the solid grains [J/(K m3)]
    pub rho_cp_solid: f64,

    /// Thermal conductivity of the solid grains [W/(m K)]
    pub lambda_solid: f64,
}

/// Holds an axis-aligned bounding-box zone
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Zone {
    /// Bounding box (x_min, x_max, y_min, y_max)
    pub bbox: (f64, f64, f64, f64),

    /// Material parameters inside the box
    pub params: ZoneParams,
}

impl Zone {
    /// Returns whether a position lies inside this zone (boundaries included)
    pub fn contains(&self, pos: &Vector2<f64>) -> bool {
        let (x_min, x_max, y_min, y_max) = self.bbox;
        x_min <= pos[0] && pos[0] <= x_max && y_min <= pos[1] && pos[1] <= y_max
    }
}

/// Maps positions to material-law parameters, permeability, and porosity
///
/// A position is classified by testing the zones in insertion order; the first
/// matching zone wins, otherwise the background parameters apply. All queries
/// are pure functions of position: no allocation, no side effects.
pub struct SpatialParams {
    /// Parameters outside all zones
    pub background: ZoneParams,

    /// Bounding-box zones, tested in insertion order
    pub zones: Vec<Zone>,
}

impl SpatialParams {
    /// Allocates a new instance with background parameters only
    pub fn new(background: ZoneParams) -> Self {
        SpatialParams {
            background,
            zones: Vec::new(),
        }
    }

    /// Adds a bounding-box zone (x_min, x_max, y_min, y_max)
    pub fn add_zone(&mut self, bbox: (f64, f64, f64, f64), params: ZoneParams) -> Result<&mut Self, StrError> {
        let (x_min, x_max, y_min, y_max) = bbox;
        if x_max <= x_min || y_max <= y_min {
            return Err("zone bounding box is empty");
        }
        self.zones.push(Zone { bbox, params });
        Ok(self)
    }

    /// Returns the zone parameters at a position
    pub fn zone_at(&self, pos: &Vector2<f64>) -> &ZoneParams {
        for zone in &self.zones {
            if zone.contains(pos) {
                return &zone.params;
            }
        }
        &self.background
    }

    /// Returns the material-law parameters at a position
    pub fn material_law_params_at(&self, pos: &Vector2<f64>) -> &ParamRetention {
        &self.zone_at(pos).retention
    }

    /// Returns the intrinsic permeability at a position
    pub fn intrinsic_permeability(&self, pos: &Vector2<f64>) -> f64 {
        self.zone_at(pos).permeability
    }

    /// Returns the porosity at a position
    pub fn porosity(&self, pos: &Vector2<f64>) -> f64 {
        self.zone_at(pos).porosity
    }

    /// Returns the volumetric heat capacity of the solid grains at a position
    pub fn heat_capacity_solid(&self, pos: &Vector2<f64>) -> f64 {
        self.zone_at(pos).rho_cp_solid
    }

    /// Computes the effective thermal conductivity of the saturated porous medium
    ///
    /// Somerton-type mixture law: interpolates between the dry and the fully
    /// liquid-saturated conductivity with the square root of the liquid saturation.
    pub fn effective_thermal_conductivity(
        &self,
        pos: &Vector2<f64>,
        sl: f64,
        lambda_liquid: f64,
        lambda_gas: f64,
    ) -> f64 {
        let zone = self.zone_at(pos);
        let phi = zone.porosity;
        let lambda_dry = f64::powf(zone.lambda_solid, 1.0 - phi) * f64::powf(lambda_gas, phi);
        let lambda_wet = f64::powf(zone.lambda_solid, 1.0 - phi) * f64::powf(lambda_liquid, phi);
        lambda_dry + f64::sqrt(f64::max(sl, 0.0)) * (lambda_wet - lambda_dry)
    }

    /// Returns sample parameters: granite-like solid with zero-capillarity linear retention
    pub fn sample_coarse() -> ZoneParams {
        ZoneParams {
            permeability: 1e-12,
            porosity: 0.3,
            retention: crate::material::ParamRetention::sample_linear_zero_pc(),
            rho_cp_solid: 2700.0 * 790.0,
            lambda_solid: 2.8,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
