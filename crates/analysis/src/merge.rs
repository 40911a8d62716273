//! Inner-range clipping and merging of visible cells into polygons.

use foundation::math::LonLat;

use crate::grid::Cell;
use crate::sightline::group_by_sightline;

/// A contiguous run of visible cells along one sightline, merged into a
/// single quadrilateral.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRun {
    pub line_id: usize,
    pub circle_start: usize,
    pub circle_end: usize,
    /// Closed ring: inner-left, inner-right, outer-right, outer-left,
    /// inner-left.
    pub ring: Vec<LonLat>,
}

/// Drop cells closer to the viewpoint than the inner analysis radius.
pub fn clip_inner(cells: &[Cell], radial_range_min_m: f64, radial_step_m: f64) -> Vec<Cell> {
    let step_start = radial_range_min_m / radial_step_m;
    cells
        .iter()
        .filter(|c| c.circle_id as f64 >= step_start)
        .cloned()
        .collect()
}

/// Merge consecutive visible cells per sightline.
///
/// A run extends while the next cell is visible and its `circle_id` is the
/// direct successor of the previous one; the merged quad keeps the first
/// cell's inner corners and takes the last cell's outer corners. Invisible
/// cells and ring gaps close the current run.
pub fn merge_visible(cells: &[Cell]) -> Vec<MergedRun> {
    let mut runs = Vec::new();
    for line in group_by_sightline(cells) {
        let mut open: Option<MergedRun> = None;
        let mut prev_circle = 0usize;
        for &idx in &line {
            let cell = &cells[idx];
            if !cell.visible {
                if let Some(run) = open.take() {
                    runs.push(run);
                }
                continue;
            }
            let extends = open.is_some() && cell.circle_id == prev_circle + 1;
            if extends {
                if let Some(run) = open.as_mut() {
                    run.circle_end = cell.circle_id;
                    run.ring[2] = cell.corners[2];
                    run.ring[3] = cell.corners[3];
                }
            } else {
                if let Some(run) = open.take() {
                    runs.push(run);
                }
                open = Some(run_from(cell));
            }
            prev_circle = cell.circle_id;
        }
        if let Some(run) = open.take() {
            runs.push(run);
        }
    }
    runs
}

fn run_from(cell: &Cell) -> MergedRun {
    MergedRun {
        line_id: cell.line_id,
        circle_start: cell.circle_id,
        circle_end: cell.circle_id,
        ring: vec![
            cell.corners[0],
            cell.corners[1],
            cell.corners[2],
            cell.corners[3],
            cell.corners[0],
        ],
    }
}
