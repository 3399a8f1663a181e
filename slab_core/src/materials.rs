//! # Eco-Slab Materials
//!
//! Fixed business parameters for the eco-slab flooring system: product
//! geometry, unit costs, and unit weights. These are not configurable at
//! runtime; every quotation is priced from the same table.
//!
//! ## Layout
//!
//! ```text
//!   length axis ──────────────────────────────►
//!   ┃beam┃ block course ┃beam┃ block course ┃beam┃
//!   0.15 m    0.40 m     0.15 m   0.40 m
//!   └── BEAM_SPACING ──┘
//! ```
//!
//! Beams span the room width. Blocks sit between beams, each block covering
//! `BLOCK_LENGTH` of the beam's span.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::materials::{BEAM_SPACING, ECO_BEAM};
//!
//! assert!((BEAM_SPACING - 0.55).abs() < 1e-12);
//! assert_eq!(ECO_BEAM.unit_cost.0, 520.0);
//! ```

use serde::Serialize;

use crate::units::Shillings;

/// Beam cost per metre of beam (KSh)
pub const BEAM_COST_PER_METER: f64 = 520.0;

/// Block cost per unit (KSh)
pub const BLOCK_COST_PER_UNIT: f64 = 90.0;

/// Beam thickness along the length axis (m)
pub const BEAM_THICKNESS: f64 = 0.15;

/// Block footprint along the length axis (m)
pub const BLOCK_SPAN: f64 = 0.4;

/// Block footprint along the width axis (m)
pub const BLOCK_LENGTH: f64 = 0.2;

/// Centre-to-centre beam pitch (m)
pub const BEAM_SPACING: f64 = BEAM_THICKNESS + BLOCK_SPAN;

/// Block allowance added for handling losses
pub const BREAKAGE_RATE: f64 = 0.10;

/// Beam weight per beam-metre (kg)
pub const BEAM_UNIT_WEIGHT_KG: f64 = 18.0;

/// Weight of one block (kg)
pub const BLOCK_UNIT_WEIGHT_KG: f64 = 15.0;

/// Weight counted per broken block (kg)
pub const BREAKAGE_UNIT_WEIGHT_KG: f64 = 14.0;

/// Smallest end gap (m) that still takes a partial block layer
pub const BLOCK_LAYER_MIN_GAP: f64 = 0.2;

/// Largest end gap (m) closed by a block layer; anything wider gets a beam
pub const BLOCK_LAYER_MAX_GAP: f64 = 0.4;

/// Tolerance for comparing floating-point remainders against geometry
/// thresholds. Keeps 5.5 m / 0.55 m at exactly ten pitches.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Longest room side (m) accepted for an estimate. Keeps beam and block
/// counts well inside their integer types.
pub const MAX_ROOM_DIMENSION_M: f64 = 1_000.0;

/// A product line as printed on the quotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductSpec {
    /// Trade name
    pub name: &'static str,
    /// Nominal dimensions as quoted to the client
    pub dimensions: &'static str,
    /// Price per unit
    pub unit_cost: Shillings,
}

impl ProductSpec {
    /// "Eco-beams of 150mm × 50mm"
    pub fn supply_line(&self) -> String {
        format!("{} of {}", self.name, self.dimensions)
    }

    /// Unit cost without decimals, as used in cost labels ("@ 520")
    pub fn price_tag(&self) -> String {
        format!("@ {:.0}", self.unit_cost.0)
    }
}

/// Pre-stressed eco-beam, priced per metre
pub const ECO_BEAM: ProductSpec = ProductSpec {
    name: "Eco-beams",
    dimensions: "150mm × 50mm",
    unit_cost: Shillings(BEAM_COST_PER_METER),
};

/// Hollow eco-block, priced per piece
pub const ECO_BLOCK: ProductSpec = ProductSpec {
    name: "Eco-blocks",
    dimensions: "120 × 200 × 400mm",
    unit_cost: Shillings(BLOCK_COST_PER_UNIT),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_spacing() {
        assert!((BEAM_SPACING - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_block_layer_window_fits_inside_pitch() {
        assert!(BLOCK_LAYER_MIN_GAP < BLOCK_LAYER_MAX_GAP);
        assert!(BLOCK_LAYER_MAX_GAP < BEAM_SPACING);
    }

    #[test]
    fn test_supply_lines() {
        assert_eq!(ECO_BEAM.supply_line(), "Eco-beams of 150mm × 50mm");
        assert_eq!(ECO_BLOCK.supply_line(), "Eco-blocks of 120 × 200 × 400mm");
        assert_eq!(ECO_BEAM.price_tag(), "@ 520");
        assert_eq!(ECO_BLOCK.price_tag(), "@ 90");
    }
}
