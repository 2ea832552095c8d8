// src/graph/cycle.rs

//! Three-colour depth-first cycle detection.
//!
//! White nodes are unvisited, grey nodes sit on the current DFS path and
//! black nodes are fully explored. Reaching a grey node again means the path
//! closed on itself. The colour map lives on the stack of each call, so the
//! check is a pure query that can run any number of times.

use super::dependency::DependencyGraph;
use super::NodeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

impl<N: NodeKey> DependencyGraph<N> {
    /// Returns `true` if the graph contains at least one cycle.
    ///
    /// A self-loop counts as a cycle.
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find the first cycle reachable from the nodes in insertion order.
    ///
    /// The returned nodes form the cycle path in traversal order, starting at
    /// the node that was revisited. A self-loop yields a single node.
    pub fn find_cycle(&self) -> Option<Vec<N>> {
        let mut colors = vec![Color::White; self.len()];

        for start in 0..self.len() {
            if colors[start] != Color::White {
                continue;
            }

            // Explicit DFS stack of (node, index of next successor to visit).
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            colors[start] = Color::Grey;

            while let Some(&(node, cursor)) = stack.last() {
                let Some(&next) = self.successor_indices(node).get(cursor) else {
                    colors[node] = Color::Black;
                    stack.pop();
                    continue;
                };

                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                match colors[next] {
                    Color::White => {
                        colors[next] = Color::Grey;
                        stack.push((next, 0));
                    }
                    Color::Grey => {
                        let from = stack
                            .iter()
                            .position(|&(n, _)| n == next)
                            .unwrap_or(0);
                        return Some(
                            stack[from..]
                                .iter()
                                .map(|&(n, _)| self.node_at(n).clone())
                                .collect(),
                        );
                    }
                    Color::Black => {}
                }
            }
        }

        None
    }
}
