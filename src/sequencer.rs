//! Nearest-neighbour route sequencing.
//!
//! Starting at the warehouse, repeatedly visit the closest unvisited stop.
//! O(n²) and not an optimal tour, but per-agent stop counts are bounded by
//! the capacity limits so n stays small.

use crate::haversine::haversine_km;
use crate::traits::Stop;

/// Visiting order over `stops` as indices into the slice.
///
/// Equal distances go to the stop that appears first in `stops`.
pub fn visiting_order<T: Stop>(origin: (f64, f64), stops: &[T]) -> Vec<usize> {
    let mut visited = vec![false; stops.len()];
    let mut order = Vec::with_capacity(stops.len());
    let mut current = origin;

    for _ in 0..stops.len() {
        let mut next: Option<(usize, f64)> = None;
        for (i, stop) in stops.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let dist = haversine_km(current, stop.location());
            if next.is_none_or(|(_, best)| dist < best) {
                next = Some((i, dist));
            }
        }

        let Some((i, _)) = next else { break };
        visited[i] = true;
        order.push(i);
        current = stops[i].location();
    }

    order
}

/// Permute `stops` into nearest-neighbour visiting order.
pub fn sequence<T: Stop>(origin: (f64, f64), stops: Vec<T>) -> Vec<T> {
    let order = visiting_order(origin, &stops);
    let mut slots: Vec<Option<T>> = stops.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
