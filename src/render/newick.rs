use super::RenderError;
use bio::io::newick;

/// Leaf names of the first tree in a Newick string, in visitation order.
pub fn newick_leaf_names(text: &str) -> Result<Vec<String>, RenderError> {
    let first = match text.find(';') {
        Some(end) => &text[..=end],
        None => text,
    };
    let tree = newick::from_string(first.trim())
        .map_err(|e| RenderError::InvalidTree(e.to_string()))?;
    let graph = &tree.g;

    let labels = graph
        .node_indices()
        .map(|node| graph[node].as_str())
        .collect::<Vec<_>>();
    let mut children = vec![Vec::new(); labels.len()];
    let mut has_parent = vec![false; labels.len()];
    for edge in graph.edge_indices() {
        if let Some((parent, child)) = graph.edge_endpoints(edge) {
            children[parent.index()].push(child.index());
            has_parent[child.index()] = true;
        }
    }
    // nodes are created left to right, so index order is sibling order
    for siblings in &mut children {
        siblings.sort_unstable();
    }

    let mut leaves = Vec::new();
    let mut stack = (0..labels.len())
        .filter(|node| !has_parent[*node])
        .rev()
        .collect::<Vec<_>>();
    while let Some(node) = stack.pop() {
        if children[node].is_empty() {
            if labels[node].is_empty() {
                log::debug!("Skipping unnamed Newick leaf");
            } else {
                leaves.push(labels[node].to_string());
            }
        } else {
            stack.extend(children[node].iter().rev());
        }
    }

    if leaves.is_empty() {
        return Err(RenderError::InvalidTree("tree has no named leaves".to_string()));
    }
    Ok(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_order() {
        let leaves = newick_leaf_names("((a_1:0.1,b_2:0.2):0.05,(c_3,d_4),e_5);").unwrap();
        assert_eq!(leaves, vec!["a_1", "b_2", "c_3", "d_4", "e_5"]);
    }

    #[test]
    fn test_nested_order_follows_tree() {
        let leaves = newick_leaf_names("((b:0.1,a:0.2):0.3,c:0.4);\n").unwrap();
        assert_eq!(leaves, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_first_tree_only() {
        assert_eq!(newick_leaf_names("(a,b);(c,d);").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            newick_leaf_names("((a,b);"),
            Err(RenderError::InvalidTree(_))
        ));
        assert!(newick_leaf_names("(a,b));").is_err());
        assert!(newick_leaf_names("").is_err());
    }
}
