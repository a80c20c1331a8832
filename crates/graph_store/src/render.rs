use crate::adjacency::VertexTable;

/// Layout of the debug string produced by `to_string_with`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Written after every edge.
    pub delimiter: String,
    /// Digits printed after the decimal point of each weight.
    pub weight_precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            weight_precision: 2,
        }
    }
}

/// One line per vertex in ascending id order: `"{id}: "`, then each outgoing
/// edge followed by the delimiter.
pub(crate) fn render(table: &VertexTable, options: &RenderOptions) -> String {
    let mut out = String::new();
    for (vertex, record) in table.iter() {
        out.push_str(&vertex.to_string());
        out.push_str(": ");
        for edge in record.edges(vertex) {
            out.push_str(&format!("{:.*}", options.weight_precision, edge));
            out.push_str(&options.delimiter);
        }
        out.push('\n');
    }
    out
}
