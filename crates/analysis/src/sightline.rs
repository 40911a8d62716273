//! Sightline grouping and line-of-sight analysis.

use crate::grid::Cell;

/// Group cell indices by sightline, ordered by increasing distance from the
/// viewpoint.
pub fn group_by_sightline(cells: &[Cell]) -> Vec<Vec<usize>> {
    let lines = cells.iter().map(|c| c.line_id).max().map_or(0, |m| m + 1);
    let mut grouped = vec![Vec::new(); lines];
    for (idx, cell) in cells.iter().enumerate() {
        grouped[cell.line_id].push(idx);
    }
    for line in &mut grouped {
        line.sort_by_key(|&idx| cells[idx].circle_id);
    }
    grouped
}

/// Whether the last point of `elevations` is visible from the first.
///
/// `elevations[0]` is the cell next to the viewpoint; a lone cell is always
/// visible. For longer chains the site slope is the mean rise per step
/// toward the target, and the target is invisible when any cell along the
/// chain pokes above that line of sight.
pub fn line_of_sight_clear(elevations: &[f64], eye_height_m: f64) -> bool {
    if elevations.len() <= 1 {
        return true;
    }
    let slope = (elevations[elevations.len() - 1] - elevations[0]) / elevations.len() as f64;
    for (i, elevation) in elevations.iter().enumerate().skip(1) {
        if elevations[0] + eye_height_m + slope * (i as f64 + 1.0) < *elevation {
            return false;
        }
    }
    true
}

/// Evaluate visibility for every cell, sightline by sightline.
///
/// Each cell is judged independently against the full elevation chain back
/// to the viewpoint; marking a far cell invisible never re-evaluates nearer
/// ones.
pub fn assign_visibility(cells: &mut [Cell], eye_height_m: f64) {
    let grouped = group_by_sightline(cells);
    for line in grouped {
        for (k, &idx) in line.iter().enumerate() {
            let chain: Vec<f64> = line[..=k].iter().map(|&i| cells[i].elevation_m).collect();
            cells[idx].visible = line_of_sight_clear(&chain, eye_height_m);
        }
    }
}
