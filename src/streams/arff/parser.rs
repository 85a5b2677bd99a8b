use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::io::{BufRead, Error, ErrorKind, Seek};
use std::sync::Arc;

#[derive(Debug)]
pub(super) enum AttributeKind {
    Numeric,
    Nominal(Vec<String>),
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidData, msg.into())
}

fn read_header_line<R: BufRead>(reader: &mut R, line: &mut String) -> Result<(), Error> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            "ARFF file ended before @data",
        ));
    }
    Ok(())
}

/// Reads everything up to and including `@data`. Returns the header and the
/// byte offset of the first data line.
///
/// The target defaults to the last attribute and has to be numeric.
pub(super) fn parse_header<R: BufRead + Seek>(
    reader: &mut R,
    target_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();
    let mut line = String::new();
    let mut pending_line: Option<String> = None;

    loop {
        read_header_line(reader, &mut line)?;
        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.to_lowercase();
        if low.starts_with("@relation") {
            let raw = line.trim()["@relation".len()..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
            break;
        } else if low.starts_with("@attribute") || low.starts_with("@data") {
            pending_line = Some(line.clone());
            break;
        }
    }

    let data_start_pos = loop {
        match pending_line.take() {
            Some(pending) => line = pending,
            None => read_header_line(reader, &mut line)?,
        }
        if is_comment_or_empty(&line) {
            continue;
        }

        let low = line.to_lowercase();
        if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line)?;
            let attribute: AttributeRef = match kind {
                AttributeKind::Numeric => Arc::new(NumericAttribute::new(name)),
                AttributeKind::Nominal(values) => {
                    Arc::new(NominalAttribute::with_values(name, values))
                }
            };
            attributes.push(attribute);
        } else if low.starts_with("@data") {
            break reader.stream_position()?;
        } else {
            return Err(invalid(format!(
                "Unsupported header directive: {}",
                line.trim()
            )));
        }
    };

    if attributes.is_empty() {
        return Err(invalid("ARFF header declares no attributes"));
    }
    let target = target_index.unwrap_or(attributes.len() - 1);
    let Some(target_attribute) = attributes.get(target) else {
        return Err(invalid(format!(
            "target index {target} out of range for {} attributes",
            attributes.len()
        )));
    };
    if !target_attribute.is_numeric() {
        return Err(invalid(format!(
            "target attribute '{}' must be numeric",
            target_attribute.name()
        )));
    }

    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attributes,
        target,
    );

    Ok((header, data_start_pos))
}

pub(super) fn parse_attribute_line(line: &str) -> Result<(String, AttributeKind), Error> {
    let trimmed = line.trim();
    if !trimmed.to_ascii_lowercase().starts_with("@attribute") {
        return Err(invalid("Line is not '@attribute'"));
    }
    let rest = trimmed["@attribute".len()..].trim();

    let (name, after_name) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let end = rest[1..]
                .find(quote)
                .map(|i| i + 1)
                .ok_or_else(|| invalid("Attribute name without closing quote marks"))?;
            (rest[1..end].to_string(), rest[end + 1..].trim())
        }
        _ => {
            let mut it = rest.splitn(2, char::is_whitespace);
            let name = it.next().unwrap_or_default().to_string();
            let after = it
                .next()
                .ok_or_else(|| invalid("Attribute type is missing"))?;
            (name, after.trim())
        }
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, AttributeKind::Numeric));
    }

    if after_name.starts_with('{') {
        let close = after_name
            .rfind('}')
            .ok_or_else(|| invalid("Nominal set without closing '}'"))?;

        let values = after_name[1..close]
            .split(',')
            .map(|s| strip_surrounding_quotes(s.trim()).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(invalid("Empty nominal domain"));
        }

        return Ok((name, AttributeKind::Nominal(values)));
    }

    Err(invalid(format!("Attribute kind not supported: {after_name}")))
}

/// Converts one data row. Nominal labels become their declaration index and
/// `?` becomes NaN.
pub(super) fn parse_instance_values(
    header: &InstanceHeader,
    line: &str,
) -> Result<Vec<f64>, Error> {
    let tokens = split_csv_preserving_quotes(line);
    if tokens.len() != header.attributes.len() {
        return Err(invalid(format!(
            "Number of columns ({}) differs from number of attributes ({})",
            tokens.len(),
            header.attributes.len()
        )));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (idx, raw) in tokens.iter().enumerate() {
        let raw = raw.trim();
        if raw == "?" {
            values.push(f64::NAN);
            continue;
        }

        let attr = &header.attributes[idx];

        if attr.as_any().is::<NumericAttribute>() {
            let v: f64 = raw.parse().map_err(|_| {
                invalid(format!("Invalid numeric value '{raw}' for attribute #{idx}"))
            })?;
            values.push(v);
            continue;
        }

        if let Some(nominal) = attr.as_any().downcast_ref::<NominalAttribute>() {
            let key = strip_surrounding_quotes(raw);
            let Some(pos) = nominal.index_of_value(key) else {
                return Err(invalid(format!(
                    "Nominal value '{key}' not found in domain of attribute #{idx}"
                )));
            };
            values.push(pos as f64);
            continue;
        }

        return Err(invalid(format!("Unsupported attribute type at column #{idx}")));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::Attribute;
    use std::any::Any;
    use std::io::{Cursor, ErrorKind};

    fn hdr(attrs: Vec<AttributeRef>, target_index: usize) -> InstanceHeader {
        InstanceHeader::new("r".into(), attrs, target_index)
    }

    fn header_of(text: &str, target: Option<usize>) -> Result<(InstanceHeader, u64), Error> {
        parse_header(&mut Cursor::new(text.as_bytes().to_vec()), target)
    }

    #[test]
    fn parse_attribute_line_missing_type_after_name() {
        let err = parse_attribute_line("@attribute outlook").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_name_without_closing_quote() {
        let err = parse_attribute_line("@attribute 'bad {x, y}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_quoted_name_with_space() {
        let (name, kind) = parse_attribute_line("@attribute 'air temp' real").unwrap();
        assert_eq!(name, "air temp");
        assert!(matches!(kind, AttributeKind::Numeric));
    }

    #[test]
    fn parse_attribute_line_rejects_non_attribute_line() {
        let err = parse_attribute_line("@relation r").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_empty_nominal_domain() {
        for line in ["@attribute a {}", "@attribute a {   }"] {
            let err = parse_attribute_line(line).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData);
        }
    }

    #[test]
    fn parse_attribute_line_trailing_comma_nominal_domain() {
        let (name, kind) = parse_attribute_line("@attribute a {x, }").unwrap();
        assert_eq!(name, "a");
        match kind {
            AttributeKind::Nominal(v) => assert_eq!(v, vec!["x"]),
            _ => panic!("expected nominal"),
        }
    }

    #[test]
    fn parse_attribute_line_nominal_missing_closing_brace() {
        let err = parse_attribute_line("@attribute a {x, y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_attribute_line_unsupported_type_string() {
        let err = parse_attribute_line("@attribute note string").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_instance_values_wrong_arity() {
        let h = hdr(
            vec![
                Arc::new(NumericAttribute::new("a")) as AttributeRef,
                Arc::new(NumericAttribute::new("b")) as AttributeRef,
            ],
            1,
        );
        let err = parse_instance_values(&h, "1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_instance_values_invalid_numeric() {
        let h = hdr(vec![Arc::new(NumericAttribute::new("x")) as AttributeRef], 0);
        let err = parse_instance_values(&h, "abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_instance_values_maps_nominal_labels_and_missing() {
        let nom = NominalAttribute::with_values("c", vec!["x".into(), "y".into()]);
        let h = hdr(
            vec![
                Arc::new(nom) as AttributeRef,
                Arc::new(NumericAttribute::new("t")) as AttributeRef,
            ],
            1,
        );
        let values = parse_instance_values(&h, "'y', ?").unwrap();
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());

        let err = parse_instance_values(&h, "z, 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    struct DummyAttr;

    impl Attribute for DummyAttr {
        fn name(&self) -> &str {
            "d"
        }
        fn is_numeric(&self) -> bool {
            false
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn arff_representation(&self) -> String {
            "@attribute d dummy".into()
        }
    }

    #[test]
    fn parse_instance_values_unsupported_attribute_type() {
        let h = hdr(vec![Arc::new(DummyAttr) as AttributeRef], 0);
        let err = parse_instance_values(&h, "42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_header_unexpected_eof_before_data() {
        let err = header_of("@relation r\n@attribute a numeric\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn parse_header_unsupported_header_directive() {
        let err = header_of("@relation r\n@foo bar\n@data\n1\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn parse_header_attribute_before_relation_is_reprocessed() {
        let (h, _pos) = header_of("@attribute a numeric\n@data\n1\n", None).unwrap();
        assert_eq!(h.relation_name(), "unnamed_relation");
        assert_eq!(h.number_of_attributes(), 1);
    }

    #[test]
    fn parse_header_target_defaults_to_last_attribute() {
        let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n";
        let (h, pos) = header_of(text, None).unwrap();
        assert_eq!(h.target_index(), 1);
        assert_eq!(pos, text.len() as u64);
    }

    #[test]
    fn parse_header_rejects_bad_targets() {
        let text = "@relation r\n@attribute a numeric\n@attribute c {u, v}\n@data\n";
        let nominal = header_of(text, None).unwrap_err();
        assert_eq!(nominal.kind(), ErrorKind::InvalidData);

        let out_of_range = header_of(text, Some(5)).unwrap_err();
        assert_eq!(out_of_range.kind(), ErrorKind::InvalidData);

        let (h, _) = header_of(text, Some(0)).unwrap();
        assert_eq!(h.target_index(), 0);
    }

    #[test]
    fn parse_header_without_attributes_errors() {
        let err = header_of("@relation r\n@data\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
