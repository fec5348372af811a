//! Navigation Module: directional nearest-neighbor graph for focus elements.
//!
//! For every element and every cardinal direction, the neighbor is the
//! closest candidate (squared distance between centers) whose displacement
//! falls in that direction's 90 degree cone. Ties go to the first candidate
//! in input order. O(N^2 * 4); rebuilt whenever the element set or layout
//! changes.

use crate::context::Engine;
use crate::types::{code, Code, Color, Handle, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Cone predicate. On an exact diagonal both the vertical and the
    /// horizontal predicate admit the candidate.
    pub fn admits(self, delta: Point) -> bool {
        let (ax, ay) = (delta.x.unsigned_abs(), delta.y.unsigned_abs());
        match self {
            Direction::Up => delta.y < 0 && ax <= ay,
            Direction::Left => delta.x < 0 && ax >= ay,
            Direction::Down => delta.y > 0 && ax <= ay,
            Direction::Right => delta.x > 0 && ax >= ay,
        }
    }

    pub fn from_code(c: Code) -> Option<Self> {
        match c {
            code::UP => Some(Direction::Up),
            code::LEFT => Some(Direction::Left),
            code::DOWN => Some(Direction::Down),
            code::RIGHT => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn code(self) -> Code {
        match self {
            Direction::Up => code::UP,
            Direction::Left => code::LEFT,
            Direction::Down => code::DOWN,
            Direction::Right => code::RIGHT,
        }
    }

    /// Overlay color for this direction's links.
    pub fn color(self) -> Color {
        match self {
            Direction::Up => Color(0xFFFF_0000),
            Direction::Left => Color(0xFF00_FF00),
            Direction::Down => Color(0xFF00_00FF),
            Direction::Right => Color(0xFFFF_FF00),
        }
    }
}

/// Input to the graph build: one entry per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavNode {
    pub center: Point,
    pub navigatable: bool,
}

/// Neighbor indices into the input slice, indexed by `Direction as usize`.
pub type Neighbors = [Option<usize>; 4];

pub fn build_graph(nodes: &[NavNode]) -> Vec<Neighbors> {
    let mut graph = vec![[None; 4]; nodes.len()];
    for dir in Direction::ALL {
        for (self_id, links) in graph.iter_mut().enumerate() {
            links[dir as usize] = best_candidate(nodes, self_id, dir);
        }
    }
    graph
}

fn best_candidate(nodes: &[NavNode], self_id: usize, dir: Direction) -> Option<usize> {
    let origin = nodes[self_id].center;
    let mut best: Option<(usize, i64)> = None;
    for (candidate_id, candidate) in nodes.iter().enumerate() {
        if candidate_id == self_id || !candidate.navigatable {
            continue;
        }
        let delta = candidate.center - origin;
        if !dir.admits(delta) {
            continue;
        }
        let distance = delta.magnitude_sq();
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate_id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Clear and reassign all four neighbor slots of every listed element.
/// Handles that do not name a live element are ignored.
pub fn setup_navigation(engine: &mut Engine, elements: &[Handle]) {
    let handles: Vec<Handle> = elements
        .iter()
        .copied()
        .filter(|h| engine.elements.contains_key(h))
        .collect();
    let nodes: Vec<NavNode> = handles
        .iter()
        .map(|h| {
            let element = &engine.elements[h];
            NavNode {
                center: element.rect.center(),
                navigatable: element.navigatable,
            }
        })
        .collect();

    let graph = build_graph(&nodes);
    for (handle, links) in handles.iter().zip(graph) {
        if let Some(element) = engine.elements.get_mut(handle) {
            element.neighbors = links.map(|link| link.map(|i| handles[i]));
        }
    }
    tracing::debug!(count = handles.len(), "navigation graph rebuilt");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: i32, y: i32) -> NavNode {
        NavNode {
            center: Point::new(x, y),
            navigatable: true,
        }
    }

    const UP: usize = Direction::Up as usize;
    const LEFT: usize = Direction::Left as usize;
    const DOWN: usize = Direction::Down as usize;
    const RIGHT: usize = Direction::Right as usize;

    #[test]
    fn test_three_element_cones() {
        // 0 at (0,0), 1 at (0,-50), 2 at (50,0)
        let graph = build_graph(&[node(0, 0), node(0, -50), node(50, 0)]);

        assert_eq!(graph[0][UP], Some(1));
        assert_eq!(graph[0][LEFT], None);
        assert_eq!(graph[0][DOWN], None);
        assert_eq!(graph[0][RIGHT], Some(2));

        // From (0,-50): (0,0) is delta (0,50), (50,0) is delta (50,50).
        // Both pass Down; (0,0) is closer. (50,50) also passes Right on the diagonal.
        assert_eq!(graph[1][UP], None);
        assert_eq!(graph[1][LEFT], None);
        assert_eq!(graph[1][DOWN], Some(0));
        assert_eq!(graph[1][RIGHT], Some(2));

        // From (50,0): (0,0) is delta (-50,0), (0,-50) is delta (-50,-50).
        assert_eq!(graph[2][UP], Some(1));
        assert_eq!(graph[2][LEFT], Some(0));
        assert_eq!(graph[2][DOWN], None);
        assert_eq!(graph[2][RIGHT], None);
    }

    #[test]
    fn test_single_element_has_no_neighbors() {
        let graph = build_graph(&[node(10, 10)]);
        assert_eq!(graph, vec![[None; 4]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_graph(&[]).is_empty());
    }

    #[test]
    fn test_coincident_centers_never_link() {
        let graph = build_graph(&[node(5, 5), node(5, 5)]);
        assert_eq!(graph, vec![[None; 4], [None; 4]]);
    }

    #[test]
    fn test_diagonal_admitted_by_both_axes() {
        let delta = Point::new(5, -5);
        assert!(Direction::Up.admits(delta));
        assert!(Direction::Right.admits(delta));
        assert!(!Direction::Down.admits(delta));
        assert!(!Direction::Left.admits(delta));
        assert!(!Direction::Up.admits(Point::new(0, 0)));
        assert!(!Direction::Right.admits(Point::new(0, 0)));
    }

    #[test]
    fn test_equal_distance_tie_goes_to_first_seen() {
        let graph = build_graph(&[node(0, 0), node(10, -20), node(-10, -20)]);
        assert_eq!(graph[0][UP], Some(1));

        let graph = build_graph(&[node(0, 0), node(-10, -20), node(10, -20)]);
        assert_eq!(graph[0][UP], Some(1));
    }

    #[test]
    fn test_closest_wins_over_order() {
        let graph = build_graph(&[node(0, 0), node(100, 0), node(30, 5)]);
        assert_eq!(graph[0][RIGHT], Some(2));
    }

    #[test]
    fn test_non_navigatable_excluded_as_candidate() {
        let mut nodes = vec![node(0, 0), node(20, 0), node(60, 0)];
        nodes[1].navigatable = false;
        let graph = build_graph(&nodes);
        assert_eq!(graph[0][RIGHT], Some(2));
        assert_eq!(graph[2][LEFT], Some(0));
        // It still gets outgoing links of its own
        assert_eq!(graph[1][RIGHT], Some(2));
    }

    #[test]
    fn test_row_of_buttons() {
        let nodes: Vec<NavNode> = (0..4).map(|i| node(25 + i * 40, 170)).collect();
        let graph = build_graph(&nodes);
        for i in 0..4 {
            assert_eq!(graph[i][LEFT], i.checked_sub(1));
            assert_eq!(graph[i][RIGHT], if i < 3 { Some(i + 1) } else { None });
            assert_eq!(graph[i][UP], None);
            assert_eq!(graph[i][DOWN], None);
        }
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let graph = build_graph(&[node(i32::MIN, 0), node(i32::MAX, 0), node(0, i32::MIN)]);
        assert_eq!(graph[0][RIGHT], Some(1));
        assert_eq!(graph[1][LEFT], Some(0));
        assert_eq!(graph[0][UP], Some(2));
        assert_eq!(graph[2][DOWN], Some(1));
        assert_eq!(graph[2][LEFT], Some(0));
    }

    #[test]
    fn test_direction_codes_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
        assert_eq!(Direction::from_code(code::ESCAPE), None);
    }
}
