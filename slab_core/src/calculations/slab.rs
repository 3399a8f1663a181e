//! # Eco-Slab Quantity Estimation
//!
//! Converts a list of room dimensions into beam counts, block counts,
//! breakage allowance, weight, and cost for an eco-slab floor.
//!
//! ## Method
//!
//! For each room, in input order:
//!
//! 1. Beams run across the width, so each beam is `width` long.
//! 2. The length is divided into whole beam pitches (`BEAM_SPACING`). The
//!    leftover end gap decides the layout adjustment:
//!    - `0.2 <= gap <= 0.4` adds a partial block layer
//!    - `gap > 0.4` adds one more beam
//!    - smaller gaps are absorbed
//! 3. Each block course between two beams holds `floor(width / BLOCK_LENGTH)`
//!    blocks. There are `num_beams - 1` courses (never fewer than zero).
//! 4. Costs, weights, and areas accumulate across rooms. Beams are grouped by
//!    width rounded to 0.1 m for the quotation's line items.
//!
//! ## Breakage
//!
//! Under [`BreakagePolicy::RunningTotal`] (the default) the breakage
//! allowance is recomputed on every room from the cumulative unbroken block
//! count, and only the value computed for the last room survives. Total
//! blocks, block cost, and breakage weight all derive from that last value.
//! [`BreakagePolicy::PerRoom`] sums each room's own rounded-up allowance
//! instead, which never gives fewer blocks.
//!
//! ## Example
//!
//! ```rust
//! use slab_core::calculations::slab::{estimate, Room};
//!
//! let summary = estimate("Acme Builders", &[Room::new(3.0, 5.0)]).unwrap();
//! assert_eq!(summary.total_num_beams, 9);
//! assert_eq!(summary.total_blocks, 132);
//! assert!((summary.grand_total.0 - 25_920.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{SlabError, SlabResult};
use crate::materials::{
    BEAM_COST_PER_METER, BEAM_SPACING, BEAM_UNIT_WEIGHT_KG, BLOCK_COST_PER_UNIT,
    BLOCK_LAYER_MAX_GAP, BLOCK_LAYER_MIN_GAP, BLOCK_LENGTH, BLOCK_UNIT_WEIGHT_KG,
    BREAKAGE_RATE, BREAKAGE_UNIT_WEIGHT_KG, GEOMETRY_EPSILON, MAX_ROOM_DIMENSION_M,
};
use crate::units::{Kilograms, Meters, Shillings, SqMeters, Tonnes};

/// A room to be floored.
///
/// ## JSON Example
///
/// ```json
/// { "width": 3.0, "length": 5.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Clear width in metres (the beam span)
    pub width: f64,
    /// Clear length in metres (the axis beams are spaced along)
    pub length: f64,
}

impl Room {
    pub fn new(width: f64, length: f64) -> Self {
        Room { width, length }
    }

    /// Floor area
    pub fn area(&self) -> SqMeters {
        Meters(self.width) * Meters(self.length)
    }
}

/// How the block breakage allowance is accumulated across rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakagePolicy {
    /// Recompute from the running block total after every room; the last
    /// room's value is the one quoted.
    #[default]
    RunningTotal,
    /// Sum each room's own rounded-up allowance.
    PerRoom,
}

impl BreakagePolicy {
    pub fn display_name(&self) -> &'static str {
        match self {
            BreakagePolicy::RunningTotal => "running total",
            BreakagePolicy::PerRoom => "per room",
        }
    }
}

/// What the end gap along the length axis calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAdjustment {
    /// Gap is narrower than a partial block layer; absorbed
    None,
    /// Gap takes one extra partial layer of blocks
    ExtraBlockLayer,
    /// Gap is too wide for blocks; one extra beam row
    ExtraBeam,
}

impl LayoutAdjustment {
    /// Classify the end gap. Both ends of the block-layer window are
    /// inclusive, so a gap of exactly 0.4 m takes blocks, not a beam.
    pub fn from_gap_end(gap_end: f64) -> Self {
        if gap_end + GEOMETRY_EPSILON >= BLOCK_LAYER_MIN_GAP
            && gap_end <= BLOCK_LAYER_MAX_GAP + GEOMETRY_EPSILON
        {
            LayoutAdjustment::ExtraBlockLayer
        } else if gap_end > BLOCK_LAYER_MAX_GAP + GEOMETRY_EPSILON && gap_end < BEAM_SPACING {
            LayoutAdjustment::ExtraBeam
        } else {
            LayoutAdjustment::None
        }
    }

    pub fn extra_beams(self) -> u32 {
        match self {
            LayoutAdjustment::ExtraBeam => 1,
            _ => 0,
        }
    }

    pub fn extra_block_layers(self) -> u32 {
        match self {
            LayoutAdjustment::ExtraBlockLayer => 1,
            _ => 0,
        }
    }
}

/// Input parameters for a slab estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "client_name": "Acme Builders",
///   "rooms": [
///     { "width": 3.0, "length": 5.0 },
///     { "width": 4.2, "length": 3.6 }
///   ],
///   "breakage_policy": "running_total"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabInput {
    /// Client the quotation is addressed to
    pub client_name: String,

    /// Rooms in the order they were measured
    pub rooms: Vec<Room>,

    /// Breakage accumulation rule
    #[serde(default)]
    pub breakage_policy: BreakagePolicy,
}

impl SlabInput {
    pub fn new(client_name: impl Into<String>, rooms: Vec<Room>) -> Self {
        SlabInput {
            client_name: client_name.into(),
            rooms,
            breakage_policy: BreakagePolicy::default(),
        }
    }

    pub fn with_breakage_policy(mut self, policy: BreakagePolicy) -> Self {
        self.breakage_policy = policy;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SlabResult<()> {
        if self.rooms.is_empty() {
            return Err(SlabError::invalid_input(
                "rooms",
                "[]",
                "At least one room is required",
            ));
        }
        for (i, room) in self.rooms.iter().enumerate() {
            check_dimension(format!("rooms[{}].width", i), room.width)?;
            check_dimension(format!("rooms[{}].length", i), room.length)?;
        }
        Ok(())
    }
}

fn check_dimension(field: String, value: f64) -> SlabResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SlabError::invalid_input(
            field,
            value.to_string(),
            "Must be a positive number of metres",
        ));
    }
    if value > MAX_ROOM_DIMENSION_M {
        return Err(SlabError::invalid_input(
            field,
            value.to_string(),
            format!("Must not exceed {} m", MAX_ROOM_DIMENSION_M),
        ));
    }
    Ok(())
}

/// Quantities for a single room, before any cross-room accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTakeoff {
    /// The measured room
    pub room: Room,

    /// Leftover length after whole beam pitches (m)
    pub gap_end_m: f64,

    /// Adjustment the end gap calls for
    pub layout: LayoutAdjustment,

    /// Blocks across one beam span
    pub blocks_per_beam: u32,

    /// Beams in this room, including any extra beam
    pub num_beams: u32,

    /// Full block courses between beams (clamped at zero)
    pub block_rows: u32,

    /// Unbroken blocks for this room
    pub blocks: u64,

    /// Rounded-up breakage for this room's blocks alone
    pub breakage_blocks: u64,

    /// Total beam length, `num_beams × width`
    pub beam_length: Meters,

    /// Beam cost for this room
    pub beam_cost: Shillings,

    /// Beam plus block weight for this room (excludes breakage)
    pub weight: Kilograms,
}

impl RoomTakeoff {
    /// Take off quantities for one room.
    pub fn compute(room: Room) -> Self {
        let (whole_pitches, gap_end_m) = split_span(room.length, BEAM_SPACING);
        let layout = LayoutAdjustment::from_gap_end(gap_end_m);

        let (blocks_per_beam, _) = split_span(room.width, BLOCK_LENGTH);
        let num_beams = whole_pitches + layout.extra_beams();
        let block_rows = num_beams.saturating_sub(1);

        let blocks = u64::from(blocks_per_beam) * u64::from(block_rows)
            + u64::from(layout.extra_block_layers()) * u64::from(blocks_per_beam);

        let beam_length = Meters(room.width) * f64::from(num_beams);
        let beam_cost = Shillings(beam_length.0 * BEAM_COST_PER_METER);
        let weight = Kilograms(beam_length.0 * BEAM_UNIT_WEIGHT_KG)
            + Kilograms(blocks as f64 * BLOCK_UNIT_WEIGHT_KG);

        RoomTakeoff {
            room,
            gap_end_m,
            layout,
            blocks_per_beam,
            num_beams,
            block_rows,
            blocks,
            breakage_blocks: breakage_allowance(blocks),
            beam_length,
            beam_cost,
            weight,
        }
    }
}

/// Beams sharing one rounded width; a line item on the quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidthGroup {
    /// Room width rounded to 0.1 m
    pub width: Meters,
    /// Beams of this width across all rooms
    pub num_beams: u64,
    /// Beam metres of this width across all rooms
    pub total_length: Meters,
}

/// Results of a slab estimate.
///
/// Created fresh for each request and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabSummary {
    /// Client the quotation is addressed to
    pub client_name: String,

    /// Breakage rule the totals were computed with
    pub breakage_policy: BreakagePolicy,

    /// Beam line items in first-seen width order
    pub width_groups: Vec<WidthGroup>,

    /// Per-room takeoffs in input order
    pub rooms: Vec<RoomTakeoff>,

    /// Beams across all rooms
    pub total_num_beams: u64,

    /// Beam metres across all rooms
    pub total_beam_length: Meters,

    /// Blocks before breakage
    pub total_unbroken_blocks: u64,

    /// Breakage allowance included in `total_blocks`
    pub breakage_blocks: u64,

    /// Blocks to supply, including breakage
    pub total_blocks: u64,

    /// Floor area across all rooms
    pub total_area: SqMeters,

    /// Beams, blocks, and breakage weight
    pub total_weight: Tonnes,

    /// Beam cost across all rooms
    pub total_beam_cost: Shillings,

    /// Cost of `total_blocks`
    pub total_block_cost: Shillings,

    /// Beam cost plus block cost
    pub grand_total: Shillings,
}

impl SlabSummary {
    /// Look up the line item for a width (rounded to 0.1 m first).
    pub fn width_group(&self, width: f64) -> Option<&WidthGroup> {
        let key = width_key(width);
        self.width_groups.iter().find(|g| width_key(g.width.0) == key)
    }
}

/// Estimate quantities and costs with the default breakage policy.
///
/// # Arguments
///
/// * `client_name` - Client the quotation is addressed to
/// * `rooms` - Rooms in measurement order
///
/// # Returns
///
/// * `Ok(SlabSummary)` - Estimated quantities and costs
/// * `Err(SlabError::InvalidInput)` - Empty room list or a non-positive dimension
pub fn estimate(client_name: &str, rooms: &[Room]) -> SlabResult<SlabSummary> {
    calculate(&SlabInput::new(client_name, rooms.to_vec()))
}

/// Estimate quantities and costs for a slab input.
///
/// # Example
///
/// ```rust
/// use slab_core::calculations::slab::{calculate, BreakagePolicy, Room, SlabInput};
///
/// let input = SlabInput::new("Client", vec![Room::new(3.0, 2.05), Room::new(3.0, 2.05)])
///     .with_breakage_policy(BreakagePolicy::PerRoom);
/// let summary = calculate(&input).unwrap();
/// assert_eq!(summary.total_blocks, 100);
/// ```
pub fn calculate(input: &SlabInput) -> SlabResult<SlabSummary> {
    input.validate()?;

    let mut takeoffs = Vec::with_capacity(input.rooms.len());
    let mut width_groups: Vec<WidthGroup> = Vec::new();

    let mut cumulative_unbroken: u64 = 0;
    let mut breakage: u64 = 0;
    let mut total_blocks: u64 = 0;
    let mut total_block_cost = Shillings::default();

    let mut total_num_beams: u64 = 0;
    let mut total_beam_length = Meters::default();
    let mut total_area = SqMeters::default();
    let mut total_weight = Tonnes::default();
    let mut total_beam_cost = Shillings::default();

    for (i, room) in input.rooms.iter().enumerate() {
        let takeoff = RoomTakeoff::compute(*room);

        if takeoff.num_beams == 0 {
            warn!(
                room = i,
                width = room.width,
                length = room.length,
                "room is shorter than one beam pitch; no beams quoted"
            );
        }

        cumulative_unbroken += takeoff.blocks;
        match input.breakage_policy {
            // Overwritten each room: only the last recomputation is quoted.
            BreakagePolicy::RunningTotal => breakage = breakage_allowance(cumulative_unbroken),
            BreakagePolicy::PerRoom => breakage += takeoff.breakage_blocks,
        }
        total_blocks = cumulative_unbroken + breakage;
        total_block_cost = Shillings(BLOCK_COST_PER_UNIT) * total_blocks as f64;

        total_beam_cost += takeoff.beam_cost;
        total_beam_length += takeoff.beam_length;
        total_num_beams += u64::from(takeoff.num_beams);
        total_area += room.area();
        total_weight += Tonnes::from(takeoff.weight);

        add_to_width_group(&mut width_groups, room.width, u64::from(takeoff.num_beams), takeoff.beam_length);

        debug!(
            room = i,
            gap_end = takeoff.gap_end_m,
            layout = ?takeoff.layout,
            beams = takeoff.num_beams,
            blocks = takeoff.blocks,
            running_blocks = total_blocks,
            "room takeoff"
        );

        takeoffs.push(takeoff);
    }

    total_weight += Tonnes::from(Kilograms(breakage as f64 * BREAKAGE_UNIT_WEIGHT_KG));
    let grand_total = total_beam_cost + total_block_cost;

    Ok(SlabSummary {
        client_name: input.client_name.clone(),
        breakage_policy: input.breakage_policy,
        width_groups,
        rooms: takeoffs,
        total_num_beams,
        total_beam_length,
        total_unbroken_blocks: cumulative_unbroken,
        breakage_blocks: breakage,
        total_blocks,
        total_area,
        total_weight,
        total_beam_cost,
        total_block_cost,
        grand_total,
    })
}

/// Split `total` into whole `pitch` units and the leftover.
///
/// A ratio within [`GEOMETRY_EPSILON`] of an integer counts as that integer,
/// so exact multiples leave no remainder.
pub fn split_span(total: f64, pitch: f64) -> (u32, f64) {
    let whole = (total / pitch + GEOMETRY_EPSILON).floor().max(0.0);
    let remainder = (total - whole * pitch).max(0.0);
    (whole as u32, remainder)
}

/// Rounded-up breakage allowance for a block count.
pub fn breakage_allowance(blocks: u64) -> u64 {
    (blocks as f64 * BREAKAGE_RATE - GEOMETRY_EPSILON).ceil().max(0.0) as u64
}

/// Width bucket in decimetres (0.1 m).
///
/// Rounds the exact binary value of `width` to one decimal, ties to even:
/// 2.05 (stored just below) goes to 2.0 and the exact tie 2.25 to 2.2.
/// `width * 10.0` would round the product instead and give 2.1 and 2.3.
fn width_key(width: f64) -> i64 {
    format!("{:.1}", width)
        .parse::<f64>()
        .map_or(0, |rounded| (rounded * 10.0).round() as i64)
}

fn add_to_width_group(groups: &mut Vec<WidthGroup>, width: f64, num_beams: u64, beam_length: Meters) {
    let key = width_key(width);
    match groups.iter_mut().find(|g| width_key(g.width.0) == key) {
        Some(group) => {
            group.num_beams += num_beams;
            group.total_length += beam_length;
        }
        None => groups.push(WidthGroup {
            width: Meters(key as f64 / 10.0),
            num_beams,
            total_length: beam_length,
        }),
    }
}
