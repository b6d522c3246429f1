use serde::{Deserialize, Serialize};

/// Minimum effective saturation used to regularize the capillary pressure
///
/// Keeps pc finite near the residual saturations. The relative
/// permeabilities are not regularized: a phase at zero saturation must
/// have zero mobility.
const SE_MIN: f64 = 1e-4;

/// Parameters of the capillary-pressure / relative-permeability closure (material law)
///
/// All relations are written in terms of the liquid (wetting) saturation `sl`
/// and use the effective saturation `se = (sl - sl_res) / (1 - sl_res - sg_res)`
/// clamped for regularization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParamRetention {
    /// Brooks-Corey law with entry pressure and pore-size distribution index λ
    BrooksCorey {
        pc_entry: f64, // entry (air-entry) capillary pressure
        lambda: f64,   // pore-size distribution index
        sl_res: f64,   // residual liquid saturation
        sg_res: f64,   // residual gas saturation
    },

    /// Van Genuchten law with m = 1 - 1/n (Mualem relative permeabilities)
    VanGenuchten {
        alpha: f64,  // α parameter [1/Pa]
        n: f64,      // n parameter
        sl_res: f64, // residual liquid saturation
        sg_res: f64, // residual gas saturation
    },

    /// Regularized linear law: pc interpolates between entry and maximum
    /// pressure; relative permeabilities equal the phase's effective saturation
    Linear {
        pc_entry: f64, // capillary pressure at full liquid saturation
        pc_max: f64,   // capillary pressure at residual liquid saturation
        sl_res: f64,   // residual liquid saturation
        sg_res: f64,   // residual gas saturation
    },
}

impl ParamRetention {
    /// Returns the effective liquid saturation clamped to [0, 1]
    fn effective_saturation(&self, sl: f64) -> f64 {
        let (sl_res, sg_res) = match self {
            ParamRetention::BrooksCorey { sl_res, sg_res, .. } => (*sl_res, *sg_res),
            ParamRetention::VanGenuchten { sl_res, sg_res, .. } => (*sl_res, *sg_res),
            ParamRetention::Linear { sl_res, sg_res, .. } => (*sl_res, *sg_res),
        };
        let se = (sl - sl_res) / (1.0 - sl_res - sg_res);
        f64::min(f64::max(se, 0.0), 1.0)
    }

    /// Computes the capillary pressure pc(sl) = pg - pl
    pub fn capillary_pressure(&self, sl: f64) -> f64 {
        let se = f64::max(self.effective_saturation(sl), SE_MIN);
        match self {
            ParamRetention::BrooksCorey { pc_entry, lambda, .. } => pc_entry * f64::powf(se, -1.0 / lambda),
            ParamRetention::VanGenuchten { alpha, n, .. } => {
                let m = 1.0 - 1.0 / n;
                (1.0 / alpha) * f64::powf(f64::powf(se, -1.0 / m) - 1.0, 1.0 / n)
            }
            ParamRetention::Linear { pc_entry, pc_max, .. } => pc_entry + (pc_max - pc_entry) * (1.0 - se),
        }
    }

    /// Computes the relative permeability of the liquid (wetting) phase
    pub fn relative_permeability_liquid(&self, sl: f64) -> f64 {
        let se = self.effective_saturation(sl);
        match self {
            ParamRetention::BrooksCorey { lambda, .. } => f64::powf(se, (2.0 + 3.0 * lambda) / lambda),
            ParamRetention::VanGenuchten { n, .. } => {
                let m = 1.0 - 1.0 / n;
                let t = 1.0 - f64::powf(1.0 - f64::powf(se, 1.0 / m), m);
                f64::sqrt(se) * t * t
            }
            ParamRetention::Linear { .. } => se,
        }
    }

    /// Computes the relative permeability of the gas (non-wetting) phase
    pub fn relative_permeability_gas(&self, sl: f64) -> f64 {
        let se = self.effective_saturation(sl);
        match self {
            ParamRetention::BrooksCorey { lambda, .. } => {
                let sn = 1.0 - se;
                sn * sn * (1.0 - f64::powf(se, (2.0 + lambda) / lambda))
            }
            ParamRetention::VanGenuchten { n, .. } => {
                let m = 1.0 - 1.0 / n;
                f64::powf(1.0 - se, 1.0 / 3.0) * f64::powf(1.0 - f64::powf(se, 1.0 / m), 2.0 * m)
            }
            ParamRetention::Linear { .. } => 1.0 - se,
        }
    }

    /// Returns sample Brooks-Corey parameters
    pub fn sample_brooks_corey() -> Self {
        ParamRetention::BrooksCorey {
            pc_entry: 1e3,
            lambda: 2.0,
            sl_res: 0.0,
            sg_res: 0.0,
        }
    }

    /// Returns a zero-capillarity linear law (useful for verification problems)
    pub fn sample_linear_zero_pc() -> Self {
        ParamRetention::Linear {
            pc_entry: 0.0,
            pc_max: 0.0,
            sl_res: 0.0,
            sg_res: 0.0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
