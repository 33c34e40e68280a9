use crate::bind::BindMap;

/// Read access shared by every finished statement.
pub trait BuiltStatement {
    /// Final SQL text, terminated with `;`.
    fn sql(&self) -> &str;

    /// Placeholder name (without `:`) to bound value.
    fn bind_map(&self) -> &BindMap;

    /// The bind map as a JSON object, ready for an execution layer.
    fn binds_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.bind_map())
    }
}
