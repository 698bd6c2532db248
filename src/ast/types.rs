//! The five base types named in declarations, parameters, and return types.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BaseType {
    Bool,
    Int,
    Double,
    String,
    Void,
}

impl std::fmt::Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BaseType::Bool => "bool",
            BaseType::Int => "int",
            BaseType::Double => "double",
            BaseType::String => "string",
            BaseType::Void => "void",
        })
    }
}
