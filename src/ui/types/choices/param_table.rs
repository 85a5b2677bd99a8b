//! Flattens the JSON schema of a tagged choice into one line per parameter,
//! which is what `fimtdd schema <component> --kind <kind>` prints.

use anyhow::{Context, Result, bail};
use schemars::Schema;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

type Object = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Number,
    Flag,
}

impl ParamType {
    /// First non-null JSON type; `Option<T>` fields carry `[T, "null"]`.
    fn from_schema(node: &Object) -> Option<Self> {
        let names: Vec<&str> = match node.get("type")? {
            Value::String(name) => vec![name.as_str()],
            Value::Array(names) => names.iter().filter_map(Value::as_str).collect(),
            _ => return None,
        };
        names.into_iter().find_map(|name| match name {
            "string" => Some(ParamType::Text),
            "integer" => Some(ParamType::Integer),
            "number" => Some(ParamType::Number),
            "boolean" => Some(ParamType::Flag),
            _ => None,
        })
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ParamType::Text => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Flag => "boolean",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamLine {
    pub name: String,
    pub ty: ParamType,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub help: Option<String>,
}

impl Display for ParamLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<32} {:<8}", self.name, self.ty)?;
        if let Some(default) = &self.default {
            write!(f, " default={default}")?;
        }
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => write!(f, " range=[{lo}, {hi}]")?,
            (Some(lo), None) => write!(f, " min={lo}")?,
            (None, Some(hi)) => write!(f, " max={hi}")?,
            (None, None) => {}
        }
        if let Some(help) = &self.help {
            write!(f, "  {help}")?;
        }
        Ok(())
    }
}

/// Parameter lines of the variant tagged `tag`. Variants without a params
/// block yield no lines; an unknown tag is an error.
pub fn parameter_lines(schema: &Schema, tag: &str) -> Result<Vec<ParamLine>> {
    let root = schema.as_object().context("schema root is not an object")?;
    let variants = root
        .get("oneOf")
        .or_else(|| root.get("anyOf"))
        .and_then(Value::as_array)
        .context("schema has no tagged variants")?;

    let Some(variant) = variants
        .iter()
        .filter_map(|v| v.get("properties")?.as_object())
        .find(|props| variant_tag(props) == Some(tag))
    else {
        bail!("no variant tagged '{tag}'");
    };

    let Some(params) = variant.get("params").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };
    let params = follow_ref(root, params)?;
    let Some(fields) = params.get("properties").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let mut lines = Vec::with_capacity(fields.len());
    for (name, field) in fields {
        let field = field
            .as_object()
            .with_context(|| format!("field '{name}' is not a schema object"))?;
        let field = follow_ref(root, field)?;
        let Some(ty) = ParamType::from_schema(field) else {
            continue;
        };
        lines.push(ParamLine {
            name: name.clone(),
            ty,
            default: field.get("default").cloned(),
            min: bound(field, "minimum", "exclusiveMinimum"),
            max: bound(field, "maximum", "exclusiveMaximum"),
            help: field
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned),
        });
    }
    Ok(lines)
}

fn variant_tag(props: &Object) -> Option<&str> {
    let tag = props.get("type")?;
    if let Some(value) = tag.get("const") {
        return value.as_str();
    }
    match tag.get("enum")?.as_array()?.as_slice() {
        [only] => only.as_str(),
        _ => None,
    }
}

/// Resolves `{"$ref": "#/$defs/Name"}`; any other node is returned as is.
fn follow_ref<'a>(root: &'a Object, node: &'a Object) -> Result<&'a Object> {
    let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
        return Ok(node);
    };
    let name = reference
        .strip_prefix("#/$defs/")
        .with_context(|| format!("unsupported reference '{reference}'"))?;
    root.get("$defs")
        .and_then(|defs| defs.get(name))
        .and_then(Value::as_object)
        .with_context(|| format!("dangling reference '{reference}'"))
}

fn bound(field: &Object, inclusive: &str, exclusive: &str) -> Option<f64> {
    field
        .get(inclusive)
        .or_else(|| field.get(exclusive))
        .and_then(Value::as_f64)
}
