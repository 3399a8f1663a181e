//! # Slab Calculations
//!
//! Calculations follow the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Summary` - Results (JSON-serializable)
//! - `calculate(input) -> Result<*Summary, SlabError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`slab`] - Eco-slab beam and block takeoff with costing

pub mod slab;

// Re-export commonly used types
pub use slab::{
    calculate, estimate, BreakagePolicy, LayoutAdjustment, Room, RoomTakeoff, SlabInput,
    SlabSummary, WidthGroup,
};
