//! State values and the edges between them.
//!
//! The machine attaches no meaning to a state beyond identity. Ordering is
//! only needed because transition tables are keyed by `(from, to)` pairs in
//! an ordered map.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Bound satisfied by every value usable as a state.
///
/// Blanket-implemented, so `bool`, integers and plain enums all qualify
/// without any extra code.
///
/// # Required Traits
///
/// - `Clone`: handlers keep their own copy of an edge's endpoints
/// - `Ord`: transition tables are ordered maps over `(from, to)`
/// - `Debug`: states show up in log output
///
/// # Example
///
/// ```rust
/// use tinysm::core::State;
///
/// fn assert_state<S: State>() {}
///
/// #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// assert_state::<bool>();
/// assert_state::<u8>();
/// assert_state::<Door>();
/// ```
pub trait State: Clone + Ord + Debug + 'static {}

impl<T> State for T where T: Clone + Ord + Debug + 'static {}

/// An ordered `(from, to)` pair identifying one entry of a transition table.
///
/// Edges where `from == to` are self-loops: taking one keeps the state but
/// still runs the exit and enter callbacks of that state.
///
/// # Example
///
/// ```rust
/// use tinysm::core::Edge;
///
/// let edge: Edge<u8> = (0, 1).into();
/// assert_eq!(edge.from, 0);
/// assert_eq!(edge.to, 1);
/// assert!(!edge.is_self_loop());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge<S> {
    /// State the machine must be in for the edge to be taken
    pub from: S,
    /// State the machine is in once the edge is taken
    pub to: S,
}

impl<S> Edge<S> {
    pub fn new(from: S, to: S) -> Self {
        Self { from, to }
    }

    pub fn into_pair(self) -> (S, S) {
        (self.from, self.to)
    }
}

impl<S: PartialEq> Edge<S> {
    /// Whether the edge starts and ends in the same state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl<S> From<(S, S)> for Edge<S> {
    fn from((from, to): (S, S)) -> Self {
        Self { from, to }
    }
}

impl<S: Debug> Debug for Edge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {:?}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Running,
        Stopped,
    }

    #[test]
    fn edge_from_pair_keeps_order() {
        let edge: Edge<TestState> = (TestState::Idle, TestState::Running).into();

        assert_eq!(edge.from, TestState::Idle);
        assert_eq!(edge.to, TestState::Running);
        assert_eq!(edge.into_pair(), (TestState::Idle, TestState::Running));
    }

    #[test]
    fn self_loop_detection() {
        assert!(Edge::new(TestState::Running, TestState::Running).is_self_loop());
        assert!(!Edge::new(TestState::Running, TestState::Stopped).is_self_loop());
    }

    #[test]
    fn edges_order_by_start_then_end() {
        let mut table = BTreeMap::new();
        table.insert(Edge::new(TestState::Running, TestState::Idle), "b");
        table.insert(Edge::new(TestState::Idle, TestState::Stopped), "a2");
        table.insert(Edge::new(TestState::Idle, TestState::Running), "a1");

        let order: Vec<_> = table.values().copied().collect();
        assert_eq!(order, vec!["a1", "a2", "b"]);
    }

    #[test]
    fn reversed_pair_is_a_distinct_edge() {
        let forward = Edge::new(TestState::Idle, TestState::Running);
        let backward = Edge::new(TestState::Running, TestState::Idle);

        assert_ne!(forward, backward);
    }

    #[test]
    fn edge_debug_is_readable() {
        let edge = Edge::new(TestState::Idle, TestState::Stopped);
        assert_eq!(format!("{:?}", edge), "Idle -> Stopped");
    }

    #[test]
    fn edge_serializes_correctly() {
        let edge = Edge::new(TestState::Idle, TestState::Running);
        let json = serde_json::to_string(&edge).unwrap();
        let deserialized: Edge<TestState> = serde_json::from_str(&json).unwrap();
        assert_eq!(edge, deserialized);
    }
}
