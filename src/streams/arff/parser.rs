use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute, StringAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::collections::HashMap;
use std::io::{BufRead, Error, ErrorKind, Seek};
use std::sync::Arc;

const DEFAULT_RELATION: &str = "unnamed_relation";

fn invalid(msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidData, msg.into())
}

#[derive(Debug, PartialEq)]
pub(super) enum AttributeKind {
    Numeric,
    Nominal(Vec<String>),
    String,
}

#[derive(Debug, PartialEq)]
pub(super) enum Directive {
    Relation(String),
    Attribute { name: String, kind: AttributeKind },
    Data,
}

/// `true` for blank lines and `%` comments.
pub(super) fn is_skippable(line: &str) -> bool {
    let t = line.trim_start();
    t.is_empty() || t.starts_with('%')
}

/// Header line to directive. Blank and comment lines give `None`.
pub(super) fn parse_directive(line: &str) -> Result<Option<Directive>, Error> {
    if is_skippable(line) {
        return Ok(None);
    }
    let line = line.trim();
    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(k, r)| (k, r.trim()));

    match keyword.to_ascii_lowercase().as_str() {
        "@relation" => Ok(Some(Directive::Relation(
            strip_surrounding_quotes(rest).to_string(),
        ))),
        "@attribute" => {
            let (name, type_spec) = split_attribute_name(rest)?;
            let kind = parse_kind(type_spec)?;
            Ok(Some(Directive::Attribute { name, kind }))
        }
        "@data" => Ok(Some(Directive::Data)),
        _ => Err(invalid(format!("unexpected header line: {line}"))),
    }
}

/// Splits `name type...`, where the name may be quoted and contain spaces.
fn split_attribute_name(rest: &str) -> Result<(String, &str), Error> {
    match rest.chars().next() {
        Some(q @ ('\'' | '"')) => {
            let close = rest[1..]
                .find(q)
                .ok_or_else(|| invalid("attribute name is missing its closing quote"))?;
            Ok((rest[1..=close].to_string(), rest[close + 2..].trim()))
        }
        Some(_) => match rest.split_once(char::is_whitespace) {
            Some((name, type_spec)) if !type_spec.trim().is_empty() => {
                Ok((name.to_string(), type_spec.trim()))
            }
            _ => Err(invalid(format!("attribute '{rest}' has no type"))),
        },
        None => Err(invalid("attribute declaration is empty")),
    }
}

fn parse_kind(type_spec: &str) -> Result<AttributeKind, Error> {
    if let Some(body) = type_spec.strip_prefix('{') {
        let body = body
            .strip_suffix('}')
            .ok_or_else(|| invalid("nominal domain is missing its closing '}'"))?;
        let labels: Vec<String> = body
            .split(',')
            .map(|l| strip_surrounding_quotes(l.trim()).to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if labels.is_empty() {
            return Err(invalid("nominal domain is empty"));
        }
        return Ok(AttributeKind::Nominal(labels));
    }

    let word = type_spec
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match word.as_str() {
        "numeric" | "real" | "integer" => Ok(AttributeKind::Numeric),
        "string" => Ok(AttributeKind::String),
        other => Err(invalid(format!("attribute type '{other}' is not supported"))),
    }
}

fn build_attribute(name: String, kind: AttributeKind) -> AttributeRef {
    match kind {
        AttributeKind::Numeric => Arc::new(NumericAttribute::new(name)),
        AttributeKind::Nominal(labels) => Arc::new(NominalAttribute::from_labels(name, labels)),
        AttributeKind::String => Arc::new(StringAttribute::new(name)),
    }
}

/// Reads directives up to and including `@data`.
///
/// Returns the header and the byte offset where the data section begins.
/// `class_index` of `None` selects the last attribute.
pub(super) fn parse_header<R: BufRead + Seek>(
    reader: &mut R,
    class_index: Option<usize>,
) -> Result<(InstanceHeader, u64), Error> {
    let mut relation = None;
    let mut attributes: Vec<AttributeRef> = Vec::new();
    let mut line = String::new();

    let data_offset = loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "ARFF file ended before @data",
            ));
        }
        match parse_directive(&line)? {
            None => {}
            Some(Directive::Relation(name)) => relation = Some(name),
            Some(Directive::Attribute { name, kind }) => {
                attributes.push(build_attribute(name, kind));
            }
            Some(Directive::Data) => break reader.stream_position()?,
        }
    };

    let class_index = class_index.unwrap_or(attributes.len().saturating_sub(1));
    let header = InstanceHeader::new(
        relation.unwrap_or_else(|| DEFAULT_RELATION.to_string()),
        attributes,
        class_index,
    );
    Ok((header, data_offset))
}

#[derive(Debug)]
enum Column {
    Numeric,
    Nominal(HashMap<String, usize>),
    Ignored,
}

/// Turns data lines into value vectors for one header.
///
/// Nominal labels become category indices, `?` and string columns become
/// `NaN`.
#[derive(Debug)]
pub(super) struct RowDecoder {
    columns: Vec<Column>,
}

impl RowDecoder {
    pub(super) fn for_header(header: &InstanceHeader) -> Result<Self, Error> {
        let columns = header
            .attributes
            .iter()
            .enumerate()
            .map(|(index, attribute)| {
                let any = attribute.as_any();
                if any.is::<NumericAttribute>() {
                    Ok(Column::Numeric)
                } else if any.is::<StringAttribute>() {
                    Ok(Column::Ignored)
                } else if let Some(nominal) = any.downcast_ref::<NominalAttribute>() {
                    let lookup = nominal
                        .enumerate_values()
                        .map(|(i, label)| (label.clone(), i))
                        .collect();
                    Ok(Column::Nominal(lookup))
                } else {
                    Err(invalid(format!(
                        "attribute #{index} ('{}') has no ARFF column type",
                        attribute.name()
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }

    pub(super) fn decode(&self, line: &str) -> Result<Vec<f64>, Error> {
        let fields = split_csv_preserving_quotes(line);
        if fields.len() != self.columns.len() {
            return Err(invalid(format!(
                "expected {} columns, found {}",
                self.columns.len(),
                fields.len()
            )));
        }

        self.columns
            .iter()
            .zip(&fields)
            .enumerate()
            .map(|(index, (column, field))| match column {
                _ if field == "?" => Ok(f64::NAN),
                Column::Ignored => Ok(f64::NAN),
                Column::Numeric => field
                    .parse()
                    .map_err(|_| invalid(format!("column #{index}: '{field}' is not a number"))),
                Column::Nominal(lookup) => {
                    let label = strip_surrounding_quotes(field);
                    lookup.get(label).map(|&i| i as f64).ok_or_else(|| {
                        invalid(format!("column #{index}: unknown category '{label}'"))
                    })
                }
            })
            .collect()
    }
}
