use std::fmt;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::RangeForest;

/// Renders a node and its branches as a `termtree` value.
pub trait TreeNodeConvert {
    fn to_tree_string(&self, root: Index) -> Tree<String>;
}

impl<L, C> TreeNodeConvert for RangeForest<L, C>
where
    L: fmt::Debug,
    C: fmt::Display,
{
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: Index) -> Tree<String> {
        fn build_tree<L: fmt::Debug, C: fmt::Display>(
            forest: &RangeForest<L, C>,
            node_idx: Index,
        ) -> Tree<String> {
            match forest.node(node_idx) {
                Some(node) => {
                    let leaves: Vec<_> = node
                        .segments()
                        .iter()
                        .flat_map(|segment| segment.branches().iter())
                        .map(|&child| build_tree(forest, child))
                        .collect();
                    Tree::new(node.to_string()).with_leaves(leaves)
                }
                None => Tree::new("Released node".to_string()),
            }
        }

        build_tree(self, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Interval;

    #[test]
    fn given_root_with_branch_when_rendered_then_branch_is_leaf() {
        let mut forest: RangeForest<&str, i64> = RangeForest::new();
        let root = forest.insert_root(Interval::closed_open(0, 100).unwrap());
        forest.set_id(root, "root").unwrap();
        forest.split_range(root, 1, 50).unwrap();
        forest.add_branch_at(root, 1, 70).unwrap();

        let rendered = forest.to_tree_string(root).to_string();

        assert!(rendered.starts_with("\"root\" L1 [0, 100): [0, 50) [50, 100)"));
        assert!(rendered.contains("L2 [50, 70]: [50, 70]"));
    }
}
