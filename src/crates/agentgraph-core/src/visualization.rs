//! Mermaid rendering of a graph's structure.
//!
//! Text only - feeding the output to a Mermaid renderer (or a Markdown
//! viewer) is up to the caller. Static edges draw solid, conditional
//! branches draw dotted with their routing key as the label.

use crate::graph::{Edge, Graph, END, START};

/// Render the structure as a Mermaid `flowchart TD`.
pub fn mermaid(graph: &Graph) -> String {
    let mut out = String::from("flowchart TD\n");

    out.push_str(&format!("    {}([{}])\n", ident(START), START));
    let mut names: Vec<&String> = graph.nodes.keys().collect();
    names.sort();
    for name in &names {
        out.push_str(&format!("    {}({})\n", ident(name), name));
    }
    out.push_str(&format!("    {}([{}])\n", ident(END), END));

    let mut sources: Vec<&String> = graph.edges.keys().collect();
    sources.sort();
    for from in sources {
        match &graph.edges[from.as_str()] {
            Edge::Direct(to) => {
                out.push_str(&format!("    {} --> {}\n", ident(from), ident(to)));
            }
            Edge::Conditional { branches, .. } => {
                let mut keys: Vec<&String> = branches.keys().collect();
                keys.sort();
                for key in keys {
                    out.push_str(&format!(
                        "    {} -. {} .-> {}\n",
                        ident(from),
                        key,
                        ident(&branches[key.as_str()])
                    ));
                }
            }
        }
    }
    out
}

// Mermaid identifiers cannot start with underscores; the markers also read
// better without them.
fn ident(name: &str) -> String {
    format!("n_{}", name.trim_matches('_'))
}
