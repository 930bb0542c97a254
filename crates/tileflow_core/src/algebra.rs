//! Pure cell-set algebra
//!
//! Every function here is side-effect free on its inputs. These are the
//! primitives the blueprint modifiers compose: neighbor counting, ring
//! growth and erosion, silhouette smoothing, connected-component extraction,
//! and 3x3 pattern-rule filtering.

use crate::{CellPos, CellSet, Direction, GridRect, Neighborhood};
use serde::{Deserialize, Serialize};

/// Count the neighbors of `pos` within `reference` (or, when `invert`, the
/// neighbors *not* in `reference`), clipped to `rect`.
pub fn neighbor_count(
    pos: CellPos,
    reference: &CellSet,
    neighborhood: Neighborhood,
    invert: bool,
    rect: GridRect,
) -> u32 {
    let mut count = 0;
    for &dir in neighborhood.directions() {
        let n = pos.neighbor(dir);
        if !rect.contains(n) {
            continue;
        }
        if reference.contains(n) != invert {
            count += 1;
        }
    }
    count
}

/// Count the occupied 8-neighbors of `pos`, ignoring grid bounds.
///
/// Used for border/interior detection, where an off-grid neighbor counts as
/// unoccupied.
fn occupied_eight(pos: CellPos, set: &CellSet) -> u32 {
    Direction::ALL
        .iter()
        .filter(|&&dir| set.contains(pos.neighbor(dir)))
        .count() as u32
}

/// Split a set into its border cells (8-neighborhood not fully occupied) and
/// its interior cells (fully surrounded).
pub fn border_and_interior(set: &CellSet) -> (CellSet, CellSet) {
    let mut border = CellSet::new();
    let mut interior = CellSet::new();
    for pos in set {
        if occupied_eight(pos, set) == 8 {
            interior.insert(pos);
        } else {
            border.insert(pos);
        }
    }
    (border, interior)
}

/// Grow the set outward by `iterations` rings, clipped to `rect`.
///
/// Each ring grows only from the current border: fully-interior cells cannot
/// contribute new neighbors, so they are excluded from the growth front.
pub fn expand(
    set: &CellSet,
    iterations: u32,
    neighborhood: Neighborhood,
    rect: GridRect,
) -> CellSet {
    let mut current = set.clone();
    for _ in 0..iterations {
        let (border, _) = border_and_interior(&current);
        let mut grown = current.clone();
        for pos in &border {
            for &dir in neighborhood.directions() {
                let n = pos.neighbor(dir);
                if rect.contains(n) {
                    grown.insert(n);
                }
            }
        }
        if grown == current {
            break;
        }
        current = grown;
    }
    current
}

/// Erode the set from the outside by `iterations` rings.
///
/// A cell is eroded when any neighbor in `neighborhood` is unoccupied
/// (off-grid neighbors count as unoccupied, so the grid edge erodes too).
pub fn shrink(
    set: &CellSet,
    iterations: u32,
    neighborhood: Neighborhood,
    rect: GridRect,
) -> CellSet {
    let mut current = set.clone();
    for _ in 0..iterations {
        let eroded: CellSet = current
            .iter()
            .filter(|&pos| {
                neighborhood.directions().iter().all(|&dir| {
                    let n = pos.neighbor(dir);
                    rect.contains(n) && current.contains(n)
                })
            })
            .collect();
        if eroded == current {
            break;
        }
        current = eroded;
    }
    current
}

/// Smooth the silhouette by dropping weakly connected cells.
///
/// Iteration `i` removes every cell with fewer than `4 + i` occupied
/// 8-neighbors, so later rounds demand progressively stronger support.
pub fn smooth(set: &CellSet, iterations: u32) -> CellSet {
    let mut current = set.clone();
    for i in 0..iterations {
        let threshold = 4 + i;
        let kept: CellSet = current
            .iter()
            .filter(|&pos| occupied_eight(pos, &current) >= threshold)
            .collect();
        if kept == current {
            break;
        }
        current = kept;
    }
    current
}

/// Extract the 4-connected components of a set.
///
/// Explicit-stack flood fill - recursion would blow the stack on large
/// islands. Components are returned in order of their smallest member, and
/// their union is exactly the input with no cell in two components.
pub fn connected_components(set: &CellSet) -> Vec<CellSet> {
    let mut visited = CellSet::new();
    let mut components = Vec::new();
    let mut stack: Vec<CellPos> = Vec::new();

    for seed in set {
        if visited.contains(seed) {
            continue;
        }
        let mut component = CellSet::new();
        stack.push(seed);
        visited.insert(seed);
        while let Some(pos) = stack.pop() {
            component.insert(pos);
            for &dir in &Direction::CARDINAL {
                let n = pos.neighbor(dir);
                if set.contains(n) && visited.insert(n) {
                    stack.push(n);
                }
            }
        }
        components.push(component);
    }
    components
}

/// One cell of a 3x3 rule pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PatternCell {
    /// Always matches.
    #[default]
    DontCare,
    /// Matches only an occupied cell.
    Occupied,
    /// Matches only an unoccupied cell.
    Unoccupied,
}

/// A 3x3 occupancy pattern centered on the candidate cell.
///
/// Stored row-major with row 0 the northern row; the center cell (index 4)
/// is ignored during matching - the candidate itself is already known to be
/// occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePattern {
    pub cells: [PatternCell; 9],
}

impl RulePattern {
    pub fn new(cells: [PatternCell; 9]) -> Self {
        Self { cells }
    }

    /// The `(dx, dy)` offset of pattern index `i` relative to the center.
    fn offset(i: usize) -> (i32, i32) {
        let col = (i % 3) as i32;
        let row = (i / 3) as i32;
        (col - 1, 1 - row)
    }

    /// Whether this rule matches at `pos` against `set`. Off-grid neighbors
    /// count as unoccupied.
    pub fn matches(&self, pos: CellPos, set: &CellSet, rect: GridRect) -> bool {
        self.cells.iter().enumerate().all(|(i, &cell)| {
            if i == 4 {
                return true;
            }
            let (dx, dy) = Self::offset(i);
            let n = pos.offset(dx, dy);
            let occupied = rect.contains(n) && set.contains(n);
            match cell {
                PatternCell::DontCare => true,
                PatternCell::Occupied => occupied,
                PatternCell::Unoccupied => !occupied,
            }
        })
    }
}

/// Keep the cells of `set` matching at least one rule in `rules`.
pub fn filter_by_rule(set: &CellSet, rules: &[RulePattern], rect: GridRect) -> CellSet {
    set.iter()
        .filter(|&pos| rules.iter().any(|rule| rule.matches(pos, set, rect)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cells: &[(i32, i32)]) -> CellSet {
        cells.iter().map(|&(x, y)| CellPos::new(x, y)).collect()
    }

    fn block(x0: i32, y0: i32, w: i32, h: i32) -> CellSet {
        let mut s = CellSet::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                s.insert(CellPos::new(x, y));
            }
        }
        s
    }

    fn rect10() -> GridRect {
        GridRect::new(10, 10).unwrap()
    }

    #[test]
    fn neighbor_count_clips_to_bounds() {
        let s = set(&[(0, 0), (1, 0), (0, 1)]);
        // (0,0) has two in-bounds occupied cardinal neighbors; west and
        // south are off-grid and must not count even when inverted.
        assert_eq!(
            neighbor_count(CellPos::new(0, 0), &s, Neighborhood::Four, false, rect10()),
            2
        );
        assert_eq!(
            neighbor_count(CellPos::new(0, 0), &s, Neighborhood::Four, true, rect10()),
            0
        );
    }

    #[test]
    fn border_interior_partition_of_3x3() {
        let s = block(1, 1, 3, 3);
        let (border, interior) = border_and_interior(&s);
        assert_eq!(interior.len(), 1);
        assert!(interior.contains(CellPos::new(2, 2)));
        assert_eq!(border.len(), 8);
        assert_eq!(border.union(&interior), s);
    }

    #[test]
    fn expand_zero_iterations_is_identity() {
        let s = block(2, 2, 2, 2);
        assert_eq!(expand(&s, 0, Neighborhood::Four, rect10()), s);
        assert_eq!(shrink(&s, 0, Neighborhood::Four, rect10()), s);
        assert_eq!(smooth(&s, 0), s);
    }

    #[test]
    fn expand_single_cell_four_directions() {
        let s = set(&[(5, 5)]);
        let grown = expand(&s, 1, Neighborhood::Four, rect10());
        assert_eq!(grown.len(), 5, "a plus-shape around the seed");
        assert!(grown.contains(CellPos::new(5, 6)));
        assert!(grown.contains(CellPos::new(4, 5)));
    }

    #[test]
    fn expand_clips_to_grid() {
        let s = set(&[(0, 0)]);
        let grown = expand(&s, 1, Neighborhood::Eight, rect10());
        assert_eq!(grown.len(), 4, "only in-bounds neighbors are added");
    }

    #[test]
    fn shrink_erodes_one_ring() {
        let s = block(2, 2, 4, 4);
        let eroded = shrink(&s, 1, Neighborhood::Four, rect10());
        assert_eq!(eroded, block(3, 3, 2, 2));
    }

    #[test]
    fn shrink_past_empty_is_stable() {
        let s = block(2, 2, 2, 2);
        let gone = shrink(&s, 10, Neighborhood::Four, rect10());
        assert!(gone.is_empty());
        assert_eq!(shrink(&gone, 3, Neighborhood::Four, rect10()), gone);
    }

    #[test]
    fn smooth_drops_isolated_cells() {
        let mut s = block(2, 2, 4, 4);
        s.insert(CellPos::new(8, 8));
        let smoothed = smooth(&s, 1);
        assert!(!smoothed.contains(CellPos::new(8, 8)));
        assert!(smoothed.contains(CellPos::new(3, 3)));
    }

    #[test]
    fn smooth_repeated_reaches_fixpoint() {
        let s = block(1, 1, 5, 5);
        let once = smooth(&s, 1);
        let again = smooth(&once, 1);
        let third = smooth(&again, 1);
        assert_eq!(again, third, "repeated smoothing must stabilize");
    }

    #[test]
    fn components_partition_the_input() {
        let a = block(0, 0, 3, 3);
        let b = block(6, 6, 2, 2);
        let input = a.union(&b);
        let components = connected_components(&input);
        assert_eq!(components.len(), 2);

        let mut union = CellSet::new();
        let mut total = 0;
        for c in &components {
            total += c.len();
            union = union.union(c);
        }
        assert_eq!(union, input, "components must cover the input");
        assert_eq!(total, input.len(), "components must be disjoint");
    }

    #[test]
    fn components_split_on_diagonal_touch() {
        // Diagonal adjacency is not 4-connected.
        let input = set(&[(0, 0), (1, 1)]);
        assert_eq!(connected_components(&input).len(), 2);
    }

    #[test]
    fn rule_matches_any_of_set() {
        use PatternCell::*;
        let s = block(2, 2, 3, 1);
        // Rule: west neighbor occupied, east neighbor unoccupied - selects
        // the eastern end of a horizontal run.
        let rule = RulePattern::new([
            DontCare, DontCare, DontCare,
            Occupied, DontCare, Unoccupied,
            DontCare, DontCare, DontCare,
        ]);
        let selected = filter_by_rule(&s, &[rule], rect10());
        assert_eq!(selected, set(&[(4, 2)]));
    }

    #[test]
    fn rule_row_zero_is_north() {
        use PatternCell::*;
        let s = set(&[(5, 5), (5, 6)]);
        // North neighbor occupied: matches only the lower cell.
        let rule = RulePattern::new([
            DontCare, Occupied, DontCare,
            DontCare, DontCare, DontCare,
            DontCare, DontCare, DontCare,
        ]);
        let selected = filter_by_rule(&s, &[rule], rect10());
        assert_eq!(selected, set(&[(5, 5)]));
    }
}
