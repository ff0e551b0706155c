//! Display name and formatting for Ty.

use super::Ty;

impl Ty {
    /// Get the display name for this type, as used in diagnostics.
    pub fn name(&self) -> std::borrow::Cow<'static, str> {
        match self {
            Ty::Null => "Null".into(),
            Ty::Object => "Object".into(),
            Ty::Bool => "Bool".into(),
            Ty::Int8 => "Int8".into(),
            Ty::Int16 => "Int16".into(),
            Ty::Int32 => "Int32".into(),
            Ty::Int64 => "Int64".into(),
            Ty::UInt32 => "UInt32".into(),
            Ty::UInt64 => "UInt64".into(),
            Ty::Float32 => "Float32".into(),
            Ty::Float64 => "Float64".into(),
            Ty::Decimal => "Decimal".into(),
            Ty::Char => "Char".into(),
            Ty::Str => "Str".into(),
            Ty::Array(elem) => format!("{}[]", elem.name()).into(),
            Ty::Dict => "Dict".into(),
            Ty::Nullable(inner) => format!("{}?", inner.name()).into(),
            Ty::ByRef(inner) => format!("ref {}", inner.name()).into(),
            Ty::Class(c) => c.name.clone().into(),
            Ty::Generic { name, args } => format_instantiation(name, args).into(),
            Ty::Interface { name, args } => format_instantiation(name, args).into(),
            Ty::Var(name) => name.clone().into(),
            Ty::Delegate { params, ret } => {
                let params: Vec<String> = params.iter().map(|p| p.name().to_string()).collect();
                format!("({}) -> {}", params.join(", "), ret.name()).into()
            }
        }
    }
}

fn format_instantiation(name: &str, args: &[Ty]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = args.iter().map(|a| a.name().to_string()).collect();
    format!("{}<{}>", name, args.join(", "))
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
