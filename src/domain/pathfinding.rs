// A* route planning over the waypoint graph.

use super::world::Waypoint;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Open-set entry. Ordered so the max-heap pops the lowest `f` first and,
/// among equal `f`, the entry pushed earliest.
#[derive(Debug, Clone, Copy)]
struct Open {
    f: f32,
    seq: u64,
    node: usize,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Shortest waypoint route from `start` to `goal`, both inclusive.
///
/// Edge cost and heuristic are straight-line distance. Returns `[start]` when
/// `start == goal` and an empty path when either index is out of range or the
/// goal is unreachable.
pub fn find_path(waypoints: &[Waypoint], start: usize, goal: usize) -> Vec<usize> {
    let n = waypoints.len();
    if start >= n || goal >= n {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let goal_pos = waypoints[goal].position;
    let mut g = vec![f32::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();
    let mut seq = 0u64;

    g[start] = 0.0;
    open.push(Open {
        f: waypoints[start].position.distance(goal_pos),
        seq,
        node: start,
    });

    while let Some(Open { node, .. }) = open.pop() {
        if closed[node] {
            // Stale duplicate from an earlier, worse push.
            continue;
        }
        if node == goal {
            return reconstruct(&came_from, goal);
        }
        closed[node] = true;

        let here = waypoints[node].position;
        for &next in &waypoints[node].neighbors {
            if next >= n || closed[next] {
                continue;
            }
            let tentative = g[node] + here.distance(waypoints[next].position);
            if tentative < g[next] {
                g[next] = tentative;
                came_from[next] = Some(node);
                seq += 1;
                open.push(Open {
                    f: tentative + waypoints[next].position.distance(goal_pos),
                    seq,
                    node: next,
                });
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(prev) = came_from[cur] {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}
