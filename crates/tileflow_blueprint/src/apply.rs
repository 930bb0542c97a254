//! The modifier engine: applies a modifier stack to a cell set.
//!
//! The entry point is [`apply_stack`]. A modifier referencing a layer id
//! that no longer exists logs a warning and passes its input through
//! unchanged - generation continues with a degraded but still deterministic
//! result.

use crate::context::{LayerContext, PaintWrite};
use crate::modifier::{BooleanOp, Modifier, ModifierKind, SelectMode, MIN_ISLAND_SIZE};
use log::warn;
use rand::Rng;
use tileflow_core::algebra;
use tileflow_core::{CellSet, Neighborhood};
use tileflow_autotile::{classify, compute_code, GridKind, TileRole};
use uuid::Uuid;

/// Cap on cellular-automata smoothing rounds; guarantees termination for
/// arbitrary persisted configurations.
const MAX_SMOOTHING_STEPS: u32 = 16;

/// Run a full modifier stack over `seed`, in list order.
pub fn apply_stack(seed: CellSet, modifiers: &[Modifier], ctx: &mut LayerContext<'_>) -> CellSet {
    let mut current = seed;
    for modifier in modifiers {
        if modifier.enabled {
            current = apply_modifier(current, modifier, ctx);
        }
    }
    current
}

/// Apply a single modifier stage.
pub fn apply_modifier(input: CellSet, modifier: &Modifier, ctx: &mut LayerContext<'_>) -> CellSet {
    match &modifier.kind {
        ModifierKind::AddLayers { layer_ids } => {
            let mut result = input;
            for &id in layer_ids {
                match ctx.sibling(id) {
                    Some(other) => result = result.union(other),
                    None => warn_missing_layer("AddLayers", id),
                }
            }
            result
        }

        ModifierKind::SubtractLayers { layer_ids } => {
            let mut result = input;
            for &id in layer_ids {
                match ctx.sibling(id) {
                    Some(other) => result = result.subtract(other),
                    None => warn_missing_layer("SubtractLayers", id),
                }
            }
            result
        }

        ModifierKind::Boolean { op, layer_id } => match ctx.sibling(*layer_id) {
            Some(other) => match op {
                BooleanOp::Add => input.union(other),
                BooleanOp::Subtract => input.subtract(other),
                BooleanOp::Intersect => input.intersect(other),
                BooleanOp::Xor => input.symmetric_difference(other),
            },
            None => {
                warn_missing_layer("Boolean", *layer_id);
                input
            }
        },

        ModifierKind::Expand {
            iterations,
            neighborhood,
        } => algebra::expand(&input, *iterations, *neighborhood, ctx.rect),

        ModifierKind::Shrink {
            iterations,
            neighborhood,
        } => algebra::shrink(&input, *iterations, *neighborhood, ctx.rect),

        ModifierKind::Smooth { iterations } => algebra::smooth(&input, *iterations),

        ModifierKind::Invert => {
            let full: CellSet = ctx.rect.iter().collect();
            full.subtract(&input)
        }

        ModifierKind::Select { mode } => apply_select(input, mode, ctx),

        ModifierKind::SelectByRule { rules } => algebra::filter_by_rule(&input, rules, ctx.rect),

        ModifierKind::SelectBasedOnNeighbour {
            layer_id,
            neighborhood,
            min_count,
            max_count,
            count_unoccupied,
        } => match ctx.sibling(*layer_id) {
            Some(reference) => input
                .iter()
                .filter(|&pos| {
                    let count = algebra::neighbor_count(
                        pos,
                        reference,
                        *neighborhood,
                        *count_unoccupied,
                        ctx.rect,
                    );
                    (*min_count..=*max_count).contains(&count)
                })
                .collect(),
            None => {
                warn_missing_layer("SelectBasedOnNeighbour", *layer_id);
                input
            }
        },

        ModifierKind::FindPositionOnIslands => find_positions_on_islands(&input, ctx),

        ModifierKind::PushToPaintPositions {
            layer_id,
            clear_before_push,
        } => {
            ctx.paint_writes.push(PaintWrite {
                layer_id: *layer_id,
                cells: input.clone(),
                clear_before_push: *clear_before_push,
            });
            input
        }

        ModifierKind::CellularAutomata {
            fill_probability,
            smoothing_steps,
            ensure_connected,
        } => cellular_automata(
            input,
            *fill_probability,
            *smoothing_steps,
            *ensure_connected,
            ctx,
        ),
    }
}

fn warn_missing_layer(modifier: &str, layer_id: Uuid) {
    warn!("{modifier} references unknown layer {layer_id}; input passed through unchanged");
}

// ─── Selection ───────────────────────────────────────────────────────────────

fn apply_select(input: CellSet, mode: &SelectMode, ctx: &mut LayerContext<'_>) -> CellSet {
    match mode {
        SelectMode::Random { probability } => {
            let p = probability.clamp(0.0, 1.0);
            input.iter().filter(|_| ctx.rng.gen_bool(p)).collect()
        }
        SelectMode::Border => algebra::border_and_interior(&input).0,
        SelectMode::Fill => algebra::border_and_interior(&input).1,
        SelectMode::Edges => select_by_role(&input, &[
            TileRole::EdgeFill,
            TileRole::EdgeWay,
            TileRole::EdgeCornerFill,
        ]),
        SelectMode::Corners => select_by_role(&input, &[TileRole::CornerFill, TileRole::CornerWay]),
        SelectMode::InteriorCorners => select_by_role(&input, &[
            TileRole::InteriorCorner,
            TileRole::DoubleCorner,
            TileRole::ThreeCorner,
        ]),
        SelectMode::NeighborCount {
            min,
            max,
            neighborhood,
            invert,
        } => input
            .iter()
            .filter(|&pos| {
                let count = algebra::neighbor_count(pos, &input, *neighborhood, *invert, ctx.rect);
                (*min..=*max).contains(&count)
            })
            .collect(),
    }
}

/// Keep the cells whose classified role is one of `roles`.
fn select_by_role(set: &CellSet, roles: &[TileRole]) -> CellSet {
    set.iter()
        .filter(|&pos| {
            classify(compute_code(pos, set), GridKind::Normal)
                .is_some_and(|class| roles.contains(&class.role))
        })
        .collect()
}

// ─── Islands ─────────────────────────────────────────────────────────────────

/// One seeded-random representative per island. Components below
/// [`MIN_ISLAND_SIZE`] are noise and yield nothing.
fn find_positions_on_islands(input: &CellSet, ctx: &mut LayerContext<'_>) -> CellSet {
    let mut result = CellSet::new();
    for component in algebra::connected_components(input) {
        if component.len() < MIN_ISLAND_SIZE {
            continue;
        }
        let pick = ctx.rng.gen_range(0..component.len());
        if let Some(pos) = component.iter().nth(pick) {
            result.insert(pos);
        }
    }
    result
}

// ─── Cellular automata ───────────────────────────────────────────────────────

/// Stochastic fill: noise field at `fill_probability`, majority smoothing,
/// optional largest-component retention. The generated field is unioned with
/// the incoming set so earlier stages act as guaranteed seeds.
fn cellular_automata(
    input: CellSet,
    fill_probability: f64,
    smoothing_steps: u32,
    ensure_connected: bool,
    ctx: &mut LayerContext<'_>,
) -> CellSet {
    let p = fill_probability.clamp(0.0, 1.0);

    // Row-major seeding keeps the draw order, and therefore the field,
    // reproducible for a given seed.
    let mut field: CellSet = ctx.rect.iter().filter(|_| ctx.rng.gen_bool(p)).collect();
    field = field.union(&input);

    for _ in 0..smoothing_steps.min(MAX_SMOOTHING_STEPS) {
        let next: CellSet = ctx
            .rect
            .iter()
            .filter(|&pos| {
                let neighbors =
                    algebra::neighbor_count(pos, &field, Neighborhood::Eight, false, ctx.rect);
                // Majority rule: survive with 4, be born with 5.
                neighbors >= 5 || (neighbors == 4 && field.contains(pos))
            })
            .collect();
        if next == field {
            break;
        }
        field = next;
    }

    if ensure_connected {
        algebra::connected_components(&field)
            .into_iter()
            .max_by_key(CellSet::len)
            .unwrap_or_default()
    } else {
        field
    }
}
